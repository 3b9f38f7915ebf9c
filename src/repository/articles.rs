//! Articles repository: lookups with joined relations, search, creation

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        article::{Article, ArticleRow, ArticleStatus, ArticleSummary, CreateArticle},
        author::ArticleAuthor,
        category::CategoryRef,
        search::{SearchFilters, SortKey},
        user::UserPublic,
    },
    repository::events::EventsRepository,
};

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append the WHERE clause shared by the search count and select queries
fn push_search_conditions(builder: &mut QueryBuilder<'static, Postgres>, filters: &SearchFilters) {
    builder.push(" WHERE 1=1");

    if let Some(ref q) = filters.query {
        let pattern = like_pattern(q);
        builder.push(" AND (a.title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR a.abstract ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR EXISTS (SELECT 1 FROM unnest(a.keywords) k WHERE k ILIKE ");
        builder.push_bind(pattern);
        builder.push("))");
    }

    if !filters.category_ids.is_empty() {
        builder.push(
            " AND EXISTS (SELECT 1 FROM article_categories ac \
             WHERE ac.article_id = a.id AND ac.category_id = ANY(",
        );
        builder.push_bind(filters.category_ids.clone());
        builder.push("))");
    }

    if !filters.author_ids.is_empty() {
        builder.push(
            " AND EXISTS (SELECT 1 FROM article_authors aa \
             WHERE aa.article_id = a.id AND aa.author_id = ANY(",
        );
        builder.push_bind(filters.author_ids.clone());
        builder.push("))");
    }

    if let Some(from) = filters.date_from {
        builder.push(" AND a.published_date >= ");
        builder.push_bind(from);
    }

    if let Some(to) = filters.date_to {
        // inclusive upper bound
        builder.push(" AND a.published_date < (");
        builder.push_bind(to);
        builder.push("::date + 1)");
    }

    if !filters.venues.is_empty() {
        builder.push(" AND a.venue_name = ANY(");
        builder.push_bind(filters.venues.clone());
        builder.push(")");
    }

    if !filters.statuses.is_empty() {
        let statuses: Vec<String> = filters
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        builder.push(" AND a.status = ANY(");
        builder.push_bind(statuses);
        builder.push(")");
    }
}

/// ORDER BY clause for a search. `relevance` has no ranking behind it and
/// orders like `date`.
fn order_clause(filters: &SearchFilters) -> String {
    let dir = filters.order.as_sql();
    match filters.sort {
        SortKey::Relevance | SortKey::Date => {
            format!(" ORDER BY a.published_date {dir}, a.id")
        }
        SortKey::Citations => {
            format!(" ORDER BY a.citation_count {dir}, a.published_date DESC, a.id")
        }
        SortKey::Downloads => {
            format!(" ORDER BY a.downloads {dir}, a.published_date DESC, a.id")
        }
    }
}

fn search_count_query(filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM articles a");
    push_search_conditions(&mut builder, filters);
    builder
}

fn search_select_query(filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT a.* FROM articles a");
    push_search_conditions(&mut builder, filters);
    builder.push(order_clause(filters));
    builder.push(" LIMIT ");
    builder.push_bind(filters.limit);
    builder.push(" OFFSET ");
    builder.push_bind(filters.offset());
    builder
}

/// Unique violations on insert (a DOI or arXiv id taken concurrently) are conflicts
fn unique_violation_as_conflict(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("An article with this DOI or arXiv id already exists".to_string())
        }
        other => AppError::Database(other),
    }
}

#[derive(Clone)]
pub struct ArticlesRepository {
    pool: Pool<Postgres>,
    events: EventsRepository,
}

impl ArticlesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            events: EventsRepository::new(pool.clone()),
            pool,
        }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get an article with authors, categories, edition (with event) and submitter.
    /// Any failing sub-query fails the whole lookup.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Article> {
        let row = sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

        let authors = self.get_article_authors(id).await?;
        let categories = self.get_article_categories(id).await?;

        let edition = match row.edition_id {
            Some(ref edition_id) => self.events.get_edition_with_event(edition_id).await?,
            None => None,
        };

        let user = sqlx::query_as::<_, UserPublic>(
            "SELECT id, name, email FROM users WHERE id = $1",
        )
        .bind(&row.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Article::from_parts(row, authors, categories, edition, user))
    }

    /// Authors of one article, ascending by byline position
    async fn get_article_authors(&self, article_id: &str) -> AppResult<Vec<ArticleAuthor>> {
        let authors = sqlx::query_as::<_, ArticleAuthor>(
            r#"
            SELECT au.id, au.name, au.affiliation, au.email, aa.author_order AS "order"
            FROM article_authors aa
            JOIN authors au ON au.id = aa.author_id
            WHERE aa.article_id = $1
            ORDER BY aa.author_order
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn get_article_categories(&self, article_id: &str) -> AppResult<Vec<CategoryRef>> {
        let categories = sqlx::query_as::<_, CategoryRef>(
            r#"
            SELECT c.id, c.name
            FROM article_categories ac
            JOIN categories c ON c.id = ac.category_id
            WHERE ac.article_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Ordered authors for several articles at once, keyed by article id
    async fn get_authors_for_articles(
        &self,
        article_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<ArticleAuthor>>> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT aa.article_id, au.id, au.name, au.affiliation, au.email, aa.author_order
            FROM article_authors aa
            JOIN authors au ON au.id = aa.author_id
            WHERE aa.article_id = ANY($1)
            ORDER BY aa.article_id, aa.author_order
            "#,
        )
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_article: HashMap<String, Vec<ArticleAuthor>> = HashMap::new();
        for r in rows.iter() {
            by_article
                .entry(r.get("article_id"))
                .or_default()
                .push(ArticleAuthor {
                    id: r.get("id"),
                    name: r.get("name"),
                    affiliation: r.get("affiliation"),
                    email: r.get("email"),
                    order: r.get("author_order"),
                });
        }

        Ok(by_article)
    }

    async fn into_summaries(&self, rows: Vec<ArticleRow>) -> AppResult<Vec<ArticleSummary>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut authors = self.get_authors_for_articles(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let article_authors = authors.remove(&row.id).unwrap_or_default();
                ArticleSummary::from_row(row, article_authors)
            })
            .collect())
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Filtered, sorted and paginated article search
    pub async fn search(&self, filters: &SearchFilters) -> AppResult<(Vec<ArticleSummary>, i64)> {
        let mut count_query = search_count_query(filters);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select_query = search_select_query(filters);
        let rows = select_query
            .build_query_as::<ArticleRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((self.into_summaries(rows).await?, total))
    }

    /// All articles of an author, newest first
    pub async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<ArticleSummary>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT a.*
            FROM articles a
            JOIN article_authors aa ON aa.article_id = a.id
            WHERE aa.author_id = $1
            ORDER BY a.published_date DESC, a.id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        self.into_summaries(rows).await
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    /// Insert an article with its ordered authors and categories in one transaction.
    /// Returns the new article id.
    pub async fn create(&self, user_id: &str, data: &CreateArticle) -> AppResult<String> {
        let mut tx = self.pool.begin().await?;

        let known_authors: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE id = ANY($1)")
                .bind(&data.author_ids)
                .fetch_one(&mut *tx)
                .await?;
        if known_authors != data.author_ids.len() as i64 {
            return Err(AppError::BadRequest("Unknown author id".to_string()));
        }

        let known_categories: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ANY($1)")
                .bind(&data.category_ids)
                .fetch_one(&mut *tx)
                .await?;
        if known_categories != data.category_ids.len() as i64 {
            return Err(AppError::BadRequest("Unknown category id".to_string()));
        }

        if let Some(ref edition_id) = data.edition_id {
            let edition_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM editions WHERE id = $1)")
                    .bind(edition_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !edition_exists {
                return Err(AppError::BadRequest("Unknown edition id".to_string()));
            }
        }

        if let Some(ref doi) = data.doi {
            let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE doi = $1)")
                .bind(doi)
                .fetch_one(&mut *tx)
                .await?;
            if taken {
                return Err(AppError::Conflict(
                    "An article with this DOI already exists".to_string(),
                ));
            }
        }

        if let Some(ref arxiv_id) = data.arxiv_id {
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE arxiv_id = $1)")
                    .bind(arxiv_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if taken {
                return Err(AppError::Conflict(
                    "An article with this arXiv id already exists".to_string(),
                ));
            }
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let venue = data.venue.as_ref();

        sqlx::query(
            r#"
            INSERT INTO articles (
                id, title, abstract, keywords, published_date, submitted_date, last_modified_date,
                doi, arxiv_id, pdf_url, venue_name, venue_type, venue_year,
                status, language, page_count, edition_id, user_id
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17
            )
            "#,
        )
        .bind(&id)
        .bind(&data.title)
        .bind(&data.abstract_)
        .bind(&data.keywords)
        .bind(data.published_date.unwrap_or(now))
        .bind(now)
        .bind(&data.doi)
        .bind(&data.arxiv_id)
        .bind(&data.pdf_url)
        .bind(venue.map(|v| v.name.clone()))
        .bind(venue.map(|v| v.venue_type.as_str()))
        .bind(venue.map(|v| v.year))
        .bind(data.status.unwrap_or(ArticleStatus::Preprint).as_str())
        .bind(data.language.as_deref().unwrap_or("en"))
        .bind(data.page_count.unwrap_or(0))
        .bind(&data.edition_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(unique_violation_as_conflict)?;

        for (idx, author_id) in data.author_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO article_authors (article_id, author_id, author_order) VALUES ($1, $2, $3)",
            )
            .bind(&id)
            .bind(author_id)
            .bind(idx as i32)
            .execute(&mut *tx)
            .await?;
        }

        for category_id in &data.category_ids {
            sqlx::query(
                "INSERT INTO article_categories (article_id, category_id) VALUES ($1, $2)",
            )
            .bind(&id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::SortOrder;
    use chrono::NaiveDate;

    fn filters() -> SearchFilters {
        SearchFilters {
            page: 1,
            limit: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_other_insert_errors_stay_database_errors() {
        assert!(matches!(
            unique_violation_as_conflict(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("graph"), "%graph%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
    }

    #[test]
    fn test_unfiltered_search_sql() {
        let sql = search_select_query(&filters()).into_sql();
        assert_eq!(
            sql,
            "SELECT a.* FROM articles a WHERE 1=1 ORDER BY a.published_date DESC, a.id LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_all_filters_are_bound() {
        let f = SearchFilters {
            query: Some("transformer".into()),
            category_ids: vec!["cs.LG".into()],
            author_ids: vec!["au-1".into()],
            date_from: NaiveDate::from_ymd_opt(2020, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2020, 12, 31),
            venues: vec!["NeurIPS".into()],
            statuses: vec![ArticleStatus::Published],
            ..filters()
        };

        let sql = search_count_query(&f).into_sql();
        assert!(sql.starts_with("SELECT COUNT(*) FROM articles a WHERE 1=1"));
        assert!(sql.contains("a.title ILIKE $1 OR a.abstract ILIKE $2"));
        assert!(sql.contains("k ILIKE $3"));
        assert!(sql.contains("ac.category_id = ANY($4)"));
        assert!(sql.contains("aa.author_id = ANY($5)"));
        assert!(sql.contains("a.published_date >= $6"));
        assert!(sql.contains("a.published_date < ($7::date + 1)"));
        assert!(sql.contains("a.venue_name = ANY($8)"));
        assert!(sql.contains("a.status = ANY($9)"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn test_sort_orders() {
        let by_citations = SearchFilters {
            sort: SortKey::Citations,
            order: SortOrder::Asc,
            ..filters()
        };
        assert!(search_select_query(&by_citations)
            .into_sql()
            .contains("ORDER BY a.citation_count ASC, a.published_date DESC"));

        let by_downloads = SearchFilters {
            sort: SortKey::Downloads,
            ..filters()
        };
        assert!(order_clause(&by_downloads).starts_with(" ORDER BY a.downloads DESC"));

        let by_relevance = SearchFilters {
            sort: SortKey::Relevance,
            order: SortOrder::Asc,
            ..filters()
        };
        assert_eq!(order_clause(&by_relevance), " ORDER BY a.published_date ASC, a.id");
    }
}
