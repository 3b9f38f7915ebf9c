//! Categories service

use crate::{
    error::AppResult,
    models::category::CategoryTree,
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Full taxonomy as roots with their subcategories
    pub async fn tree(&self) -> AppResult<Vec<CategoryTree>> {
        let categories = self.repository.categories.list().await?;
        Ok(CategoryTree::build(categories))
    }

    pub async fn get(&self, id: &str) -> AppResult<CategoryTree> {
        self.repository.categories.get_by_id(id).await
    }
}
