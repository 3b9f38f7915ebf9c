//! Categories repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryTree, CategoryUpsert},
};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All categories, ordered by id
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, parent_id FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a category with its direct subcategories
    pub async fn get_by_id(&self, id: &str) -> AppResult<CategoryTree> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, parent_id FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let subcategories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, parent_id FROM categories WHERE parent_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CategoryTree {
            category,
            subcategories,
        })
    }

    /// Insert a category, or update it when the id exists.
    ///
    /// Top-level rows (`parent_id = None`) update name and description only;
    /// subcategories also re-point their parent.
    pub async fn upsert(&self, category: &CategoryUpsert) -> AppResult<()> {
        let query = if category.parent_id.is_none() {
            r#"
            INSERT INTO categories (id, name, description, parent_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#
        } else {
            r#"
            INSERT INTO categories (id, name, description, parent_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                parent_id = EXCLUDED.parent_id
            "#
        };

        sqlx::query(query)
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(&category.parent_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
