//! Articles service: lookup, search and submission

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        article::{Article, ArticleSummary, CreateArticle},
        search::SearchFilters,
        user::UserClaims,
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct ArticlesService {
    repository: Repository,
    email: EmailService,
}

impl ArticlesService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Get article by ID with authors, categories, edition and submitter
    pub async fn get(&self, id: &str) -> AppResult<Article> {
        self.repository.articles.get_by_id(id).await
    }

    /// Search articles with filters
    pub async fn search(&self, filters: &SearchFilters) -> AppResult<(Vec<ArticleSummary>, i64)> {
        self.repository.articles.search(filters).await
    }

    /// Create an article on behalf of `claims` and notify interested subscribers
    pub async fn create(&self, claims: &UserClaims, data: CreateArticle) -> AppResult<Article> {
        let unique_authors: HashSet<&String> = data.author_ids.iter().collect();
        if unique_authors.len() != data.author_ids.len() {
            return Err(AppError::Validation("Duplicate author id".to_string()));
        }
        let unique_categories: HashSet<&String> = data.category_ids.iter().collect();
        if unique_categories.len() != data.category_ids.len() {
            return Err(AppError::Validation("Duplicate category id".to_string()));
        }

        let id = self.repository.articles.create(&claims.sub, &data).await?;
        tracing::info!("Article {} created by {}", id, claims.sub);

        let article = self.repository.articles.get_by_id(&id).await?;

        let repository = self.repository.clone();
        let email = self.email.clone();
        let title = article.title.clone();
        let categories = data.category_ids;
        tokio::spawn(async move {
            notify_subscribers(repository, email, id, title, categories).await;
        });

        Ok(article)
    }
}

/// Email every confirmed subscriber interested in the article's categories.
/// Outcomes are logged only.
async fn notify_subscribers(
    repository: Repository,
    email: EmailService,
    article_id: String,
    title: String,
    categories: Vec<String>,
) {
    let subscribers = match repository.subscriptions.list_confirmed().await {
        Ok(subscribers) => subscribers,
        Err(e) => {
            tracing::error!("Could not load subscribers for article {}: {}", article_id, e);
            return;
        }
    };

    let mut sent = 0usize;
    let mut failed = 0usize;
    for subscriber in subscribers.iter().filter(|s| s.wants(&categories)) {
        let name = subscriber.name.as_deref().unwrap_or("reader");
        if email
            .send_new_article_notification(&subscriber.email, name, &title, &article_id)
            .await
        {
            sent += 1;
        } else {
            failed += 1;
        }
    }

    tracing::info!(
        "Article {} notifications: {} sent, {} failed",
        article_id,
        sent,
        failed
    );
}
