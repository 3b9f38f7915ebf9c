//! Article search filters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::article::{ArticleStatus, ArticleSummary};
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Relevance,
    Date,
    Citations,
    Downloads,
}

impl std::str::FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortKey::Relevance),
            "date" => Ok(SortKey::Date),
            "citations" => Ok(SortKey::Citations),
            "downloads" => Ok(SortKey::Downloads),
            _ => Err(AppError::Validation(format!("Invalid sort key: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::Validation(format!("Invalid sort order: {}", s))),
        }
    }
}

/// Raw query string of `GET /search`; list parameters are comma separated
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free text matched against title, abstract and keywords
    pub q: Option<String>,
    /// Category ids, comma separated
    pub categories: Option<String>,
    /// Author ids, comma separated
    pub authors: Option<String>,
    /// Earliest publication date (YYYY-MM-DD, inclusive)
    pub date_from: Option<String>,
    /// Latest publication date (YYYY-MM-DD, inclusive)
    pub date_to: Option<String>,
    /// Venue names, comma separated
    pub venues: Option<String>,
    /// Statuses, comma separated (published, preprint, under_review)
    pub status: Option<String>,
    /// relevance | date | citations | downloads
    pub sort: Option<String>,
    /// asc | desc
    pub order: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Results per page (max 100)
    pub limit: Option<i64>,
}

/// Validated search request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub category_ids: Vec<String>,
    pub author_ids: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub venues: Vec<String>,
    pub statuses: Vec<ArticleStatus>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl SearchFilters {
    /// Row offset of the page. `try_from` guarantees it fits in an i64.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Validate 1-based pagination and return `(page, limit)`.
/// Pages whose row offset would not fit in an i64 are rejected.
pub fn page_bounds(
    page: Option<i64>,
    limit: Option<i64>,
    default_limit: i64,
) -> Result<(i64, i64), AppError> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
    (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::Validation(format!("Page {} is out of range", page)))?;
    Ok((page, limit))
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {}: {}", field, s))),
    }
}

impl TryFrom<SearchQuery> for SearchFilters {
    type Error = AppError;

    fn try_from(q: SearchQuery) -> Result<Self, Self::Error> {
        let statuses = split_list(q.status.as_deref())
            .iter()
            .map(|s| s.parse::<ArticleStatus>().map_err(AppError::Validation))
            .collect::<Result<Vec<_>, _>>()?;

        let date_from = parse_date(q.date_from.as_deref(), "dateFrom")?;
        let date_to = parse_date(q.date_to.as_deref(), "dateTo")?;
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                return Err(AppError::Validation("dateFrom is after dateTo".to_string()));
            }
        }

        let (page, limit) = page_bounds(q.page, q.limit, DEFAULT_PAGE_SIZE)?;

        Ok(SearchFilters {
            query: q
                .q
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            category_ids: split_list(q.categories.as_deref()),
            author_ids: split_list(q.authors.as_deref()),
            date_from,
            date_to,
            venues: split_list(q.venues.as_deref()),
            statuses,
            sort: q.sort.as_deref().map(str::parse::<SortKey>).transpose()?.unwrap_or_default(),
            order: q.order.as_deref().map(str::parse::<SortOrder>).transpose()?.unwrap_or_default(),
            page,
            limit,
        })
    }
}

/// Paginated search response
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub articles: Vec<ArticleSummary>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
