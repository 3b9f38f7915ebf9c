//! Authors service

use crate::{
    error::AppResult,
    models::author::{Author, AuthorDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Authors page with the total count
    pub async fn list(
        &self,
        name: Option<&str>,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(name, page, limit).await
    }

    /// Author with their articles, newest first
    pub async fn get(&self, id: &str) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let articles = self.repository.articles.list_by_author(id).await?;
        Ok(AuthorDetails { author, articles })
    }
}
