//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetails, AuthorQuery},
        search::page_bounds,
    },
    AppState,
};

const AUTHORS_PAGE_SIZE: i64 = 50;

/// Paginated authors response
#[derive(Serialize, ToSchema)]
pub struct AuthorsListResponse {
    pub authors: Vec<Author>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// List authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Authors list", body = AuthorsListResponse),
        (status = 400, description = "Page out of range", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<AuthorsListResponse>> {
    let (page, limit) = page_bounds(query.page, query.limit, AUTHORS_PAGE_SIZE)?;
    let (authors, total) = state
        .services
        .authors
        .list(query.q.as_deref(), page, limit)
        .await?;
    Ok(Json(AuthorsListResponse {
        authors,
        total,
        page,
        limit,
    }))
}

/// Get an author with their articles
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.authors.get(&id).await?;
    Ok(Json(author))
}
