//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::article::ArticleSummary;

/// Author record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub affiliation: String,
    pub email: Option<String>,
}

/// Author as attached to an article, with its position in the byline
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAuthor {
    pub id: String,
    pub name: String,
    pub affiliation: String,
    pub email: Option<String>,
    /// Zero-based position in the article's author list
    pub order: i32,
}

/// Author with their articles
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub articles: Vec<ArticleSummary>,
}

/// Query parameters for the author list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AuthorQuery {
    /// Case-insensitive substring of the author name
    pub q: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Authors per page
    pub limit: Option<i64>,
}
