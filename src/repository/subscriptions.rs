//! Newsletter subscriptions repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::subscription::Subscription};

const COLUMNS: &str =
    "id, email, name, token, confirmed, category_ids, created_at, confirmed_at";

fn upsert_pending_sql() -> String {
    format!(
        r#"
        INSERT INTO subscriptions (id, email, name, token, confirmed, category_ids, created_at)
        VALUES ($1, $2, $3, $4, FALSE, $5, $6)
        ON CONFLICT (email) DO UPDATE SET
            name = COALESCE(EXCLUDED.name, subscriptions.name),
            token = EXCLUDED.token,
            category_ids = EXCLUDED.category_ids
        WHERE NOT subscriptions.confirmed
        RETURNING {}
        "#,
        COLUMNS
    )
}

#[derive(Clone)]
pub struct SubscriptionsRepository {
    pool: Pool<Postgres>,
}

impl SubscriptionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Subscription>> {
        let query = format!("SELECT {} FROM subscriptions WHERE LOWER(email) = LOWER($1)", COLUMNS);
        let row = sqlx::query_as::<_, Subscription>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Create an unconfirmed subscription, or reset an existing unconfirmed one
    /// with a fresh token and interests. Returns `None` when the address is
    /// already confirmed; a confirmed row is never touched.
    pub async fn upsert_pending(
        &self,
        email: &str,
        name: Option<&str>,
        category_ids: &[String],
        token: &str,
    ) -> AppResult<Option<Subscription>> {
        let query = upsert_pending_sql();
        let row = sqlx::query_as::<_, Subscription>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(email)
            .bind(name)
            .bind(token)
            .bind(category_ids)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Mark the subscription holding `token` as confirmed
    pub async fn confirm(&self, token: &str) -> AppResult<Option<Subscription>> {
        let query = format!(
            r#"
            UPDATE subscriptions
            SET confirmed = TRUE, confirmed_at = COALESCE(confirmed_at, $2)
            WHERE token = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, Subscription>(&query)
            .bind(token)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Delete the subscription holding `token`; returns whether one existed
    pub async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Confirmed subscribers
    pub async fn list_confirmed(&self) -> AppResult<Vec<Subscription>> {
        let query = format!(
            "SELECT {} FROM subscriptions WHERE confirmed ORDER BY created_at",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, Subscription>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_upsert_leaves_confirmed_rows_alone() {
        let sql = upsert_pending_sql();
        let update = &sql[sql.find("DO UPDATE").unwrap()..];
        let guard = update.find("WHERE NOT subscriptions.confirmed").unwrap();
        assert!(guard < update.find("RETURNING").unwrap());
        assert!(!update[..guard].contains("confirmed ="));
    }
}
