//! Newsletter subscription endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::subscription::{CreateSubscription, TokenQuery},
    AppState,
};

use super::validate;

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Subscribe to the newsletter
#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = CreateSubscription,
    responses(
        (status = 201, description = "Pending subscription created, confirmation email sent", body = MessageResponse),
        (status = 400, description = "Invalid email", body = crate::error::ErrorResponse),
        (status = 409, description = "Already subscribed", body = crate::error::ErrorResponse)
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(data): Json<CreateSubscription>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    validate(&data)?;
    state.services.subscriptions.subscribe(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Subscription created. Please check your email to confirm.".to_string(),
        }),
    ))
}

/// Confirm a subscription from the emailed link
#[utoipa::path(
    get,
    path = "/subscriptions/confirm",
    tag = "subscriptions",
    params(("token" = String, Query, description = "Confirmation token")),
    responses(
        (status = 200, description = "Subscription confirmed", body = MessageResponse),
        (status = 404, description = "Unknown token", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> AppResult<Json<MessageResponse>> {
    state.services.subscriptions.confirm(&query.token).await?;
    Ok(Json(MessageResponse {
        message: "Subscription confirmed".to_string(),
    }))
}

/// Unsubscribe
#[utoipa::path(
    delete,
    path = "/subscriptions",
    tag = "subscriptions",
    params(("token" = String, Query, description = "Subscription token")),
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 404, description = "Unknown token", body = crate::error::ErrorResponse)
    )
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> AppResult<StatusCode> {
    state.services.subscriptions.unsubscribe(&query.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
