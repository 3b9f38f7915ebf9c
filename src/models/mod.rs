//! Data models for PaperHub

pub mod article;
pub mod author;
pub mod category;
pub mod event;
pub mod search;
pub mod subscription;
pub mod user;

// Re-export commonly used types
pub use article::{Article, ArticleStatus, ArticleSummary, Venue, VenueType};
pub use author::{ArticleAuthor, Author};
pub use category::{Category, CategoryTree};
pub use event::{Edition, Event, EventDetails};
pub use search::{SearchFilters, SortKey, SortOrder};
pub use subscription::Subscription;
pub use user::{Role, User, UserClaims};
