//! Events service

use crate::{
    error::AppResult,
    models::event::{normalize_short_name, EventDetails, EventSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
}

impl EventsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<EventSummary>> {
        self.repository.events.list().await
    }

    /// Look up an event by short name, case-insensitively
    pub async fn get_by_short_name(&self, short_name: &str) -> AppResult<EventDetails> {
        let normalized = normalize_short_name(short_name);
        self.repository.events.get_by_short_name(&normalized).await
    }
}
