//! Admin endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, AppState};

use super::{subscriptions::MessageResponse, AdminUser};

/// Seed the category taxonomy
#[utoipa::path(
    post,
    path = "/admin/seed",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Database seeded", body = MessageResponse),
        (status = 401, description = "Missing credential", body = crate::error::ErrorResponse),
        (status = 403, description = "Invalid credential or not an admin", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn seed(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
) -> AppResult<Json<MessageResponse>> {
    tracing::info!("Seeding requested by {}", claims.sub);
    state.services.seed.seed().await?;
    Ok(Json(MessageResponse {
        message: "Database seeded successfully".to_string(),
    }))
}
