//! Category model and the seed taxonomy types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Category row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parent_id: Option<String>,
}

/// Category with its direct subcategories
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<Category>,
}

impl CategoryTree {
    /// Assemble roots with their direct children. Rows whose parent is not a
    /// root are not attached: the taxonomy is two levels deep.
    pub fn build(mut categories: Vec<Category>) -> Vec<CategoryTree> {
        categories.sort_by(|a, b| a.id.cmp(&b.id));

        let (roots, children): (Vec<_>, Vec<_>) =
            categories.into_iter().partition(|c| c.parent_id.is_none());

        roots
            .into_iter()
            .map(|root| {
                let subcategories = children
                    .iter()
                    .filter(|c| c.parent_id.as_deref() == Some(root.id.as_str()))
                    .cloned()
                    .collect();
                CategoryTree {
                    category: root,
                    subcategories,
                }
            })
            .collect()
    }
}

/// Category reference embedded in other resources
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

/// Subcategory entry of the static taxonomy
#[derive(Debug, Clone, Copy)]
pub struct SeedSubcategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Top-level entry of the static taxonomy
#[derive(Debug, Clone, Copy)]
pub struct SeedCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub subcategories: &'static [SeedSubcategory],
}

/// Row written by a seeding upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUpsert {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parent_id: Option<String>,
}

impl From<CategoryUpsert> for Category {
    fn from(c: CategoryUpsert) -> Self {
        Category {
            id: c.id,
            name: c.name,
            description: c.description,
            parent_id: c.parent_id,
        }
    }
}
