//! PaperHub Research Article Catalog
//!
//! REST JSON API for browsing and searching research articles, authors,
//! categories and conference/journal events, with newsletter subscriptions
//! and admin-only seeding.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
