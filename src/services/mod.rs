//! Business logic services

pub mod articles;
pub mod auth;
pub mod authors;
pub mod categories;
pub mod email;
pub mod events;
pub mod seed;
pub mod subscriptions;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub articles: articles::ArticlesService,
    pub authors: authors::AuthorsService,
    pub categories: categories::CategoriesService,
    pub events: events::EventsService,
    pub seed: seed::SeedService,
    pub email: email::EmailService,
    pub subscriptions: subscriptions::SubscriptionsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository, delivering email over SMTP
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let mailer = email::SmtpMailer::new(config.email.clone())?;
        Ok(Self::with_mailer(repository, config, Arc::new(mailer)))
    }

    /// Create all services with a custom email transport
    pub fn with_mailer(
        repository: Repository,
        config: &AppConfig,
        mailer: Arc<dyn email::Mailer>,
    ) -> Self {
        let email = email::EmailService::new(mailer, config.email.app_url.clone());
        let category_store: Arc<dyn seed::CategoryStore> =
            Arc::new(repository.categories.clone());

        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            articles: articles::ArticlesService::new(repository.clone(), email.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            events: events::EventsService::new(repository.clone()),
            seed: seed::SeedService::new(category_store, &config.seed),
            subscriptions: subscriptions::SubscriptionsService::new(repository.clone(), email.clone()),
            email,
            repository,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
