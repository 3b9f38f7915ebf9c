//! Article endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::article::{Article, CreateArticle},
    AppState,
};

use super::{validate, AdminUser};

/// Get article details by ID
#[utoipa::path(
    get,
    path = "/articles/{id}",
    tag = "articles",
    params(
        ("id" = String, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article with authors, categories, edition and submitter", body = Article),
        (status = 404, description = "Article not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Article>> {
    let article = state.services.articles.get(&id).await?;
    Ok(Json(article))
}

/// Submit a new article (admin only)
#[utoipa::path(
    post,
    path = "/articles",
    tag = "articles",
    security(("bearer_auth" = [])),
    request_body = CreateArticle,
    responses(
        (status = 201, description = "Article created", body = Article),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an admin", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Json(data): Json<CreateArticle>,
) -> AppResult<(StatusCode, Json<Article>)> {
    validate(&data)?;
    let article = state.services.articles.create(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(article)))
}
