//! Category endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::category::CategoryTree, AppState};

/// Category taxonomy
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Top-level categories with subcategories", body = Vec<CategoryTree>)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryTree>>> {
    let tree = state.services.categories.tree().await?;
    Ok(Json(tree))
}

/// Get a category with its subcategories
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryTree),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryTree>> {
    let category = state.services.categories.get(&id).await?;
    Ok(Json(category))
}
