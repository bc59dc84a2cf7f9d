use super::IndexSchema;
use crate::builder::BoolRole;
use crate::registry::{FieldRegistries, QueryBuilderRegistry, RangeBuilderRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

crate::index_fields! {
    /// Fields of the community post index.
    pub enum CommunityPostIndexField {
        DocId => "doc_id",
        CommunityPostId => "community_post_id",
        UserId => "user_id",
        Category => "category",
        Title => "title",
        MarkdownBody => "markdown_body",
        Company => "company",
        Location => "location",
        LinkedJobId => "linked_job_id",
        IsFromJobComment => "is_from_job_comment",
        PopularityViewCount => "popularity_view_count",
        PopularityCommentCount => "popularity_comment_count",
        PopularityLikeCount => "popularity_like_count",
        Deleted => "deleted",
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
    }
}

fn build_registries() -> FieldRegistries<CommunityPostIndexField> {
    use CommunityPostIndexField::*;

    let queries = QueryBuilderRegistry::builder()
        .term(DocId, BoolRole::Filter)
        .term(CommunityPostId, BoolRole::Filter)
        .term(UserId, BoolRole::Filter)
        .term(Category, BoolRole::Filter)
        .text(Title, BoolRole::Should)
        .text(MarkdownBody, BoolRole::Should)
        .term(Company, BoolRole::Filter)
        .term(Location, BoolRole::Filter)
        .term(LinkedJobId, BoolRole::Filter)
        .term(IsFromJobComment, BoolRole::Filter)
        .term(Deleted, BoolRole::Must)
        .build();

    let ranges = RangeBuilderRegistry::builder()
        .inclusive(PopularityViewCount, BoolRole::Filter)
        .inclusive(PopularityCommentCount, BoolRole::Filter)
        .inclusive(PopularityLikeCount, BoolRole::Filter)
        .inclusive(CreatedAt, BoolRole::Filter)
        .inclusive(UpdatedAt, BoolRole::Filter)
        .build();

    FieldRegistries::new(queries, ranges)
}

/// Community post index. Deleted posts are not filtered out implicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommunityPosts;

impl IndexSchema for CommunityPosts {
    type Field = CommunityPostIndexField;
    type Document = CommunityPostDoc;

    const NAME: &'static str = "community-posts";

    fn registries() -> &'static FieldRegistries<CommunityPostIndexField> {
        static REGISTRIES: OnceLock<FieldRegistries<CommunityPostIndexField>> = OnceLock::new();
        REGISTRIES.get_or_init(build_registries)
    }

    fn relevance_fields() -> &'static [CommunityPostIndexField] {
        &[
            CommunityPostIndexField::Title,
            CommunityPostIndexField::MarkdownBody,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityPostDoc {
    pub doc_id: Option<String>,
    pub community_post_id: Option<i64>,
    pub user_id: Option<i64>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub markdown_body: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub linked_job_id: Option<i64>,
    pub deleted: Option<bool>,
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
