//! Newsletter subscription model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Subscription record
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub token: String,
    pub confirmed: bool,
    /// Categories of interest; empty means every category
    pub category_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Whether an article in the given categories is of interest to this subscriber
    pub fn wants(&self, article_categories: &[String]) -> bool {
        self.category_ids.is_empty()
            || self
                .category_ids
                .iter()
                .any(|c| article_categories.contains(c))
    }
}

/// Subscribe request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubscription {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Token query used by the confirm and unsubscribe links
#[derive(Debug, Deserialize, IntoParams)]
pub struct TokenQuery {
    pub token: String,
}
