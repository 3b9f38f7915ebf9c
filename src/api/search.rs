//! Article search endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::search::{SearchFilters, SearchQuery, SearchResponse},
    AppState,
};

/// Search articles with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/search",
    tag = "articles",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching articles", body = SearchResponse),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_articles(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let filters = SearchFilters::try_from(query)?;
    let (articles, total) = state.services.articles.search(&filters).await?;

    Ok(Json(SearchResponse {
        articles,
        total,
        page: filters.page,
        limit: filters.limit,
    }))
}
