use super::IndexSchema;
use crate::builder::BoolRole;
use crate::condition::Condition;
use crate::registry::{FieldRegistries, QueryBuilderRegistry, RangeBuilderRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

crate::index_fields! {
    /// Fields of the tech-blog article index.
    pub enum TechBlogIndexField {
        DocId => "doc_id",
        TechBlogId => "tech_blog_id",
        Url => "url",
        Company => "company",
        Title => "title",
        OneLiner => "one_liner",
        Summary => "summary",
        KoreanSummary => "korean_summary",
        MarkdownBody => "markdown_body",
        ThumbnailUrl => "thumbnail_url",
        TechCategories => "tech_categories",
        OriginalUrl => "original_url",
        PopularityViewCount => "popularity_view_count",
        PopularityCommentCount => "popularity_comment_count",
        PopularityLikeCount => "popularity_like_count",
        Deleted => "deleted",
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
        /// Indexed keyword text built from the article.
        SearchWord => "search_word",
    }
}

fn build_registries() -> FieldRegistries<TechBlogIndexField> {
    use TechBlogIndexField::*;

    let queries = [DocId, TechBlogId, Url, Company, ThumbnailUrl, TechCategories, OriginalUrl]
        .into_iter()
        .fold(QueryBuilderRegistry::builder(), |b, f| {
            b.term(f, BoolRole::Filter)
        });
    let queries = [Title, OneLiner, Summary, KoreanSummary, SearchWord, MarkdownBody]
        .into_iter()
        .fold(queries, |b, f| b.text(f, BoolRole::Should))
        .term(Deleted, BoolRole::Must)
        .build();

    let ranges = [
        PopularityViewCount,
        PopularityCommentCount,
        PopularityLikeCount,
        CreatedAt,
        UpdatedAt,
    ]
    .into_iter()
    .fold(RangeBuilderRegistry::builder(), |b, f| {
        b.inclusive(f, BoolRole::Filter)
    })
    .build();

    FieldRegistries::new(queries, ranges)
}

/// Tech-blog article index.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechBlogs;

impl IndexSchema for TechBlogs {
    type Field = TechBlogIndexField;
    type Document = TechBlogDoc;

    const NAME: &'static str = "tech-blogs";

    fn registries() -> &'static FieldRegistries<TechBlogIndexField> {
        static REGISTRIES: OnceLock<FieldRegistries<TechBlogIndexField>> = OnceLock::new();
        REGISTRIES.get_or_init(build_registries)
    }

    fn relevance_fields() -> &'static [TechBlogIndexField] {
        &[
            TechBlogIndexField::SearchWord,
            TechBlogIndexField::Title,
            TechBlogIndexField::Summary,
        ]
    }

    fn default_conditions() -> Vec<Condition<TechBlogIndexField>> {
        vec![Condition::flag(TechBlogIndexField::Deleted, false)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechBlogDoc {
    pub doc_id: Option<String>,
    pub tech_blog_id: Option<i64>,
    pub url: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub one_liner: Option<String>,
    pub summary: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tech_categories: Vec<String>,
    pub original_url: Option<String>,
    pub deleted: Option<bool>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldName;

    #[test]
    fn test_every_field_is_registered() {
        let r = TechBlogs::registries();
        for field in TechBlogIndexField::ALL {
            assert!(!r.is_unknown(*field), "{} is not registered", field.field_name());
        }
    }

    #[test]
    fn test_search_word_is_plain_match() {
        let r = TechBlogs::registries();
        let b = r.queries.get(TechBlogIndexField::SearchWord).unwrap();
        assert_eq!(b.role(), BoolRole::Should);
    }
}
