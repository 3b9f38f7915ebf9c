//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, articles, auth, authors, categories, events, health, search, subscriptions};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PaperHub API",
        version = "1.0.0",
        description = "Research article catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "PaperHub API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Articles
        articles::get_article,
        articles::create_article,
        search::search_articles,
        // Authors
        authors::list_authors,
        authors::get_author,
        // Categories
        categories::list_categories,
        categories::get_category,
        // Events
        events::list_events,
        events::get_event_by_short_name,
        // Newsletter
        subscriptions::subscribe,
        subscriptions::confirm,
        subscriptions::unsubscribe,
        // Admin
        admin::seed,
    ),
    components(
        schemas(
            auth::LoginResponse,
            auth::MeResponse,
            crate::models::user::LoginRequest,
            crate::models::user::UserPublic,
            crate::models::user::Role,
            crate::models::article::Article,
            crate::models::article::ArticleSummary,
            crate::models::article::ArticleStatus,
            crate::models::article::CreateArticle,
            crate::models::article::Venue,
            crate::models::article::VenueType,
            crate::models::search::SearchResponse,
            crate::models::author::Author,
            crate::models::author::ArticleAuthor,
            crate::models::author::AuthorDetails,
            authors::AuthorsListResponse,
            crate::models::category::Category,
            crate::models::category::CategoryRef,
            crate::models::category::CategoryTree,
            crate::models::event::Event,
            crate::models::event::Edition,
            crate::models::event::EditionCount,
            crate::models::event::EditionWithCount,
            crate::models::event::EditionWithEvent,
            crate::models::event::EventCount,
            crate::models::event::EventDetails,
            crate::models::event::EventSummary,
            crate::models::subscription::CreateSubscription,
            subscriptions::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "articles", description = "Article lookup, search and submission"),
        (name = "authors", description = "Author browsing"),
        (name = "categories", description = "Category taxonomy"),
        (name = "events", description = "Conferences and journals"),
        (name = "subscriptions", description = "Newsletter subscriptions"),
        (name = "admin", description = "Administration")
    )
)]
pub struct ApiDoc;

pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
