//! Concrete index schemas: field sets, builder registries and documents.

mod community_post;
mod job;
mod tech_blog;

pub use community_post::{CommunityPostDoc, CommunityPostIndexField, CommunityPosts};
pub use job::{JobDoc, JobIndexField, Jobs};
pub use tech_blog::{TechBlogDoc, TechBlogIndexField, TechBlogs};

use crate::backend::SortOption;
use crate::condition::Condition;
use crate::field::FieldName;
use crate::registry::FieldRegistries;
use serde::de::DeserializeOwned;

/// Everything the generic search facade needs to know about one index.
pub trait IndexSchema: Send + Sync + 'static {
    type Field: FieldName;
    type Document: DeserializeOwned + Send;

    /// Short name used in logs and on the command line.
    const NAME: &'static str;

    /// Shared, immutable builder lookups.
    fn registries() -> &'static FieldRegistries<Self::Field>;

    /// Fields whose presence switches sorting to relevance.
    fn relevance_fields() -> &'static [Self::Field];

    /// Conditions added to every search unless the caller already
    /// constrains the same field.
    fn default_conditions() -> Vec<Condition<Self::Field>> {
        Vec::new()
    }

    fn default_sort() -> SortOption {
        SortOption::desc("created_at")
    }
}
