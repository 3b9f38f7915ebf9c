//! Article model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author::ArticleAuthor,
    category::CategoryRef,
    event::EditionWithEvent,
    user::UserPublic,
};

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Published,
    Preprint,
    UnderReview,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Published => "published",
            ArticleStatus::Preprint => "preprint",
            ArticleStatus::UnderReview => "under_review",
        }
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "published" => Ok(ArticleStatus::Published),
            "preprint" => Ok(ArticleStatus::Preprint),
            "under_review" => Ok(ArticleStatus::UnderReview),
            _ => Err(format!("Invalid article status: {}", s)),
        }
    }
}

/// Kind of venue an article appeared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VenueType {
    Conference,
    Journal,
    Preprint,
}

impl VenueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueType::Conference => "conference",
            VenueType::Journal => "journal",
            VenueType::Preprint => "preprint",
        }
    }
}

impl std::str::FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conference" => Ok(VenueType::Conference),
            "journal" => Ok(VenueType::Journal),
            "preprint" => Ok(VenueType::Preprint),
            _ => Err(format!("Invalid venue type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub name: String,
    #[serde(rename = "type")]
    pub venue_type: VenueType,
    pub year: i32,
}

/// Internal row structure for article queries (enums as TEXT)
#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    pub id: String,
    pub title: String,
    #[sqlx(rename = "abstract")]
    pub abstract_: String,
    pub keywords: Vec<String>,
    pub published_date: DateTime<Utc>,
    pub submitted_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub pdf_url: String,
    pub citation_count: i32,
    pub downloads: i32,
    pub venue_name: Option<String>,
    pub venue_type: Option<String>,
    pub venue_year: Option<i32>,
    pub status: String,
    pub language: String,
    pub page_count: i32,
    pub version: i32,
    pub edition_id: Option<String>,
    pub user_id: String,
}

impl ArticleRow {
    /// Venue is present only when name, type and year are all set and the
    /// type is a known one.
    pub fn venue(&self) -> Option<Venue> {
        let name = self.venue_name.clone()?;
        let venue_type = self.venue_type.as_deref()?.parse().ok()?;
        let year = self.venue_year?;
        Some(Venue {
            name,
            venue_type,
            year,
        })
    }

    pub fn status(&self) -> ArticleStatus {
        self.status.parse().unwrap_or_else(|_| {
            tracing::warn!("Article {} has unknown status {:?}", self.id, self.status);
            ArticleStatus::Preprint
        })
    }
}

/// Full article with joined relations
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    /// Ordered by position in the byline
    pub authors: Vec<ArticleAuthor>,
    pub categories: Vec<CategoryRef>,
    pub keywords: Vec<String>,
    pub published_date: DateTime<Utc>,
    pub submitted_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub pdf_url: String,
    pub citation_count: i32,
    pub downloads: i32,
    pub venue: Option<Venue>,
    pub status: ArticleStatus,
    pub language: String,
    pub page_count: i32,
    pub version: i32,
    pub edition: Option<EditionWithEvent>,
    pub user: UserPublic,
}

impl Article {
    pub fn from_parts(
        row: ArticleRow,
        authors: Vec<ArticleAuthor>,
        categories: Vec<CategoryRef>,
        edition: Option<EditionWithEvent>,
        user: UserPublic,
    ) -> Self {
        let venue = row.venue();
        let status = row.status();
        Self {
            id: row.id,
            title: row.title,
            abstract_: row.abstract_,
            authors,
            categories,
            keywords: row.keywords,
            published_date: row.published_date,
            submitted_date: row.submitted_date,
            last_modified_date: row.last_modified_date,
            doi: row.doi,
            arxiv_id: row.arxiv_id,
            pdf_url: row.pdf_url,
            citation_count: row.citation_count,
            downloads: row.downloads,
            venue,
            status,
            language: row.language,
            page_count: row.page_count,
            version: row.version,
            edition,
            user,
        }
    }
}

/// Article list entry (search results, author pages)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    pub authors: Vec<ArticleAuthor>,
    pub keywords: Vec<String>,
    pub published_date: DateTime<Utc>,
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub citation_count: i32,
    pub downloads: i32,
    pub venue: Option<Venue>,
    pub status: ArticleStatus,
}

impl ArticleSummary {
    pub fn from_row(row: ArticleRow, authors: Vec<ArticleAuthor>) -> Self {
        let venue = row.venue();
        let status = row.status();
        Self {
            id: row.id,
            title: row.title,
            abstract_: row.abstract_,
            authors,
            keywords: row.keywords,
            published_date: row.published_date,
            doi: row.doi,
            arxiv_id: row.arxiv_id,
            citation_count: row.citation_count,
            downloads: row.downloads,
            venue,
            status,
        }
    }
}

/// Create article request (admin)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[serde(rename = "abstract")]
    #[validate(length(min = 1))]
    pub abstract_: String,
    /// Author ids in byline order
    #[validate(length(min = 1))]
    pub author_ids: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    #[validate(url)]
    pub pdf_url: String,
    pub venue: Option<Venue>,
    pub status: Option<ArticleStatus>,
    pub language: Option<String>,
    #[validate(range(min = 0))]
    pub page_count: Option<i32>,
    pub edition_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ArticleRow {
        let now = Utc::now();
        ArticleRow {
            id: "a1".into(),
            title: "Attention".into(),
            abstract_: "We propose...".into(),
            keywords: vec!["transformers".into()],
            published_date: now,
            submitted_date: now,
            last_modified_date: now,
            doi: None,
            arxiv_id: Some("1706.03762".into()),
            pdf_url: "https://arxiv.org/pdf/1706.03762".into(),
            citation_count: 10,
            downloads: 20,
            venue_name: Some("NeurIPS".into()),
            venue_type: Some("conference".into()),
            venue_year: Some(2017),
            status: "under_review".into(),
            language: "en".into(),
            page_count: 15,
            version: 1,
            edition_id: None,
            user_id: "u1".into(),
        }
    }

    #[test]
    fn test_venue_requires_all_fields() {
        let mut r = row();
        assert_eq!(
            r.venue(),
            Some(Venue {
                name: "NeurIPS".into(),
                venue_type: VenueType::Conference,
                year: 2017
            })
        );
        r.venue_year = None;
        assert_eq!(r.venue(), None);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(row().status(), ArticleStatus::UnderReview);
        assert_eq!("Published".parse::<ArticleStatus>(), Ok(ArticleStatus::Published));
        assert!("retracted".parse::<ArticleStatus>().is_err());
    }

    #[test]
    fn test_summary_json_uses_abstract_key() {
        let json = serde_json::to_value(ArticleSummary::from_row(row(), vec![])).unwrap();
        assert_eq!(json["abstract"], "We propose...");
        assert_eq!(json["status"], "under_review");
        assert_eq!(json["venue"]["type"], "conference");
        assert_eq!(json["citationCount"], 10);
    }
}
