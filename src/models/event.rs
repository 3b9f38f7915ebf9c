//! Event model (recurring conferences and journals) and their editions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::category::CategoryRef;

/// Normalize an event short name for lookup. Short names are stored
/// uppercase, so lookups are case-insensitive through this function alone.
pub fn normalize_short_name(short_name: &str) -> String {
    short_name.trim().to_uppercase()
}

/// Event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// Uppercase short name, e.g. `NEURIPS`
    pub short_name: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Edition record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    pub id: String,
    pub event_id: String,
    pub year: i32,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EditionCount {
    pub articles: i64,
}

/// Edition annotated with its article count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditionWithCount {
    #[serde(flatten)]
    pub edition: Edition,
    #[serde(rename = "_count")]
    pub count: EditionCount,
}

/// Edition joined with its parent event (article lookup)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditionWithEvent {
    #[serde(flatten)]
    pub edition: Edition,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventCount {
    pub editions: i64,
}

/// Event with editions (year descending), categories and edition count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub editions: Vec<EditionWithCount>,
    pub categories: Vec<CategoryRef>,
    #[serde(rename = "_count")]
    pub count: EventCount,
}

/// Event list entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    #[serde(rename = "_count")]
    pub count: EventCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_short_name() {
        assert_eq!(normalize_short_name("neurips"), "NEURIPS");
        assert_eq!(normalize_short_name("NeurIPS"), "NEURIPS");
        assert_eq!(normalize_short_name("NEURIPS"), "NEURIPS");
        assert_eq!(normalize_short_name(" icml "), "ICML");
    }

    #[test]
    fn test_event_details_json_shape() {
        let details = EventDetails {
            event: Event {
                id: "evt-1".into(),
                short_name: "ICML".into(),
                name: "International Conference on Machine Learning".into(),
                description: None,
                website: None,
            },
            editions: vec![EditionWithCount {
                edition: Edition {
                    id: "ed-1".into(),
                    event_id: "evt-1".into(),
                    year: 2024,
                    location: Some("Vienna".into()),
                    start_date: None,
                    end_date: None,
                },
                count: EditionCount { articles: 3 },
            }],
            categories: vec![],
            count: EventCount { editions: 1 },
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["shortName"], "ICML");
        assert_eq!(json["_count"]["editions"], 1);
        assert_eq!(json["editions"][0]["year"], 2024);
        assert_eq!(json["editions"][0]["_count"]["articles"], 3);
    }
}
