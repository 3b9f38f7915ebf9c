//! Events repository

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        category::CategoryRef,
        event::{
            Edition, EditionCount, EditionWithCount, EditionWithEvent, Event, EventCount,
            EventDetails, EventSummary,
        },
    },
};

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List events with their edition counts
    pub async fn list(&self) -> AppResult<Vec<EventSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT ev.id, ev.short_name, ev.name, ev.description, ev.website,
                   COUNT(ed.id) AS edition_count
            FROM events ev
            LEFT JOIN editions ed ON ed.event_id = ev.id
            GROUP BY ev.id
            ORDER BY ev.short_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| EventSummary {
                event: Event {
                    id: r.get("id"),
                    short_name: r.get("short_name"),
                    name: r.get("name"),
                    description: r.get("description"),
                    website: r.get("website"),
                },
                count: EventCount {
                    editions: r.get("edition_count"),
                },
            })
            .collect())
    }

    /// Get the first event whose stored short name equals `short_name`,
    /// with editions (year descending), categories and edition count.
    /// The caller passes an already-normalized short name.
    pub async fn get_by_short_name(&self, short_name: &str) -> AppResult<EventDetails> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, short_name, name, description, website
            FROM events
            WHERE short_name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(short_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let editions = self.get_editions_with_counts(&event.id).await?;

        let categories = sqlx::query_as::<_, CategoryRef>(
            r#"
            SELECT c.id, c.name
            FROM event_categories ec
            JOIN categories c ON c.id = ec.category_id
            WHERE ec.event_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(&event.id)
        .fetch_all(&self.pool)
        .await?;

        let count = EventCount {
            editions: editions.len() as i64,
        };

        Ok(EventDetails {
            event,
            editions,
            categories,
            count,
        })
    }

    /// Editions of an event, each with its article count, newest year first
    async fn get_editions_with_counts(&self, event_id: &str) -> AppResult<Vec<EditionWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT ed.id, ed.event_id, ed.year, ed.location, ed.start_date, ed.end_date,
                   COUNT(a.id) AS article_count
            FROM editions ed
            LEFT JOIN articles a ON a.edition_id = ed.id
            WHERE ed.event_id = $1
            GROUP BY ed.id
            ORDER BY ed.year DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| EditionWithCount {
                edition: Edition {
                    id: r.get("id"),
                    event_id: r.get("event_id"),
                    year: r.get("year"),
                    location: r.get("location"),
                    start_date: r.get("start_date"),
                    end_date: r.get("end_date"),
                },
                count: EditionCount {
                    articles: r.get("article_count"),
                },
            })
            .collect())
    }

    /// Get an edition joined with its parent event
    pub async fn get_edition_with_event(&self, edition_id: &str) -> AppResult<Option<EditionWithEvent>> {
        let row = sqlx::query(
            r#"
            SELECT ed.id, ed.event_id, ed.year, ed.location, ed.start_date, ed.end_date,
                   ev.short_name, ev.name, ev.description, ev.website
            FROM editions ed
            JOIN events ev ON ev.id = ed.event_id
            WHERE ed.id = $1
            "#,
        )
        .bind(edition_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| EditionWithEvent {
            edition: Edition {
                id: r.get("id"),
                event_id: r.get("event_id"),
                year: r.get("year"),
                location: r.get("location"),
                start_date: r.get("start_date"),
                end_date: r.get("end_date"),
            },
            event: Event {
                id: r.get("event_id"),
                short_name: r.get("short_name"),
                name: r.get("name"),
                description: r.get("description"),
                website: r.get("website"),
            },
        }))
    }
}
