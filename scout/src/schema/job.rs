use super::IndexSchema;
use crate::builder::{BoolRole, FanOutMatchBuilder};
use crate::condition::Condition;
use crate::registry::{FieldRegistries, QueryBuilderRegistry, RangeBuilderRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

crate::index_fields! {
    /// Fields of the job posting index.
    pub enum JobIndexField {
        DocId => "doc_id",
        JobId => "job_id",
        Url => "url",
        Company => "company",
        Title => "title",
        Organization => "organization",
        OneLineSummary => "one_line_summary",
        MinYears => "min_years",
        MaxYears => "max_years",
        ExperienceRequired => "experience_required",
        CareerLevel => "career_level",
        EmploymentType => "employment_type",
        PositionCategory => "position_category",
        RemotePolicy => "remote_policy",
        TechCategories => "tech_categories",
        StartedAt => "started_at",
        EndedAt => "ended_at",
        IsOpenEnded => "is_open_ended",
        IsClosed => "is_closed",
        Locations => "locations",
        FullDescription => "full_description",
        HasAssignment => "has_assignment",
        HasCodingTest => "has_coding_test",
        HasLiveCoding => "has_live_coding",
        InterviewCount => "interview_count",
        InterviewDays => "interview_days",
        CompensationMinBasePay => "compensation_min_base_pay",
        CompensationMaxBasePay => "compensation_max_base_pay",
        CompensationCurrency => "compensation_currency",
        CompensationUnit => "compensation_unit",
        CompensationHasStockOption => "compensation_has_stock_option",
        PopularityViewCount => "popularity_view_count",
        PopularityCommentCount => "popularity_comment_count",
        PopularityLikeCount => "popularity_like_count",
        Deleted => "deleted",
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
        /// Virtual field: free text matched against title, summary and description.
        SearchWord => "search_word",
    }
}

const SEARCH_WORD_TARGETS: [&str; 3] = ["title", "one_line_summary", "full_description"];

fn build_registries() -> FieldRegistries<JobIndexField> {
    use JobIndexField::*;

    let term_filters = [
        DocId,
        JobId,
        Url,
        Company,
        Organization,
        CareerLevel,
        ExperienceRequired,
        EmploymentType,
        PositionCategory,
        RemotePolicy,
        TechCategories,
        IsOpenEnded,
        IsClosed,
        Locations,
        HasAssignment,
        HasCodingTest,
        HasLiveCoding,
        CompensationCurrency,
        CompensationUnit,
        CompensationHasStockOption,
    ];
    let ranges = [
        MinYears,
        MaxYears,
        StartedAt,
        EndedAt,
        InterviewCount,
        InterviewDays,
        CreatedAt,
        UpdatedAt,
        CompensationMinBasePay,
        CompensationMaxBasePay,
        PopularityViewCount,
        PopularityCommentCount,
        PopularityLikeCount,
    ];

    let queries = term_filters
        .into_iter()
        .fold(QueryBuilderRegistry::builder(), |b, f| {
            b.term(f, BoolRole::Filter)
        })
        .text(Title, BoolRole::Should)
        .text(OneLineSummary, BoolRole::Should)
        .text(FullDescription, BoolRole::Should)
        .term(Deleted, BoolRole::Must)
        .with(SearchWord, FanOutMatchBuilder::new(SEARCH_WORD_TARGETS))
        .build();

    let ranges = ranges
        .into_iter()
        .fold(RangeBuilderRegistry::builder(), |b, f| {
            b.inclusive(f, BoolRole::Filter)
        })
        .build();

    FieldRegistries::new(queries, ranges)
}

/// Job posting index.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jobs;

impl IndexSchema for Jobs {
    type Field = JobIndexField;
    type Document = JobDoc;

    const NAME: &'static str = "jobs";

    fn registries() -> &'static FieldRegistries<JobIndexField> {
        static REGISTRIES: OnceLock<FieldRegistries<JobIndexField>> = OnceLock::new();
        REGISTRIES.get_or_init(build_registries)
    }

    fn relevance_fields() -> &'static [JobIndexField] {
        &[
            JobIndexField::Title,
            JobIndexField::OneLineSummary,
            JobIndexField::FullDescription,
            JobIndexField::SearchWord,
        ]
    }

    fn default_conditions() -> Vec<Condition<JobIndexField>> {
        vec![Condition::flag(JobIndexField::Deleted, false)]
    }
}

/// Stored job document. Fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDoc {
    pub doc_id: Option<String>,
    pub job_id: Option<i64>,
    pub url: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub one_line_summary: Option<String>,
    pub min_years: Option<i32>,
    pub max_years: Option<i32>,
    pub experience_required: Option<bool>,
    pub career_level: Option<String>,
    pub employment_type: Option<String>,
    pub position_category: Option<String>,
    pub remote_policy: Option<String>,
    #[serde(default)]
    pub tech_categories: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    pub is_closed: Option<bool>,
    pub deleted: Option<bool>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::QueryCompiler;
    use crate::field::FieldName;
    use crate::query::Query;

    #[test]
    fn test_every_field_is_registered() {
        let r = Jobs::registries();
        for field in JobIndexField::ALL {
            assert!(!r.is_unknown(*field), "{} is not registered", field.field_name());
        }
    }

    #[test]
    fn test_roles() {
        let r = Jobs::registries();
        assert_eq!(r.queries.get(JobIndexField::Company).unwrap().role(), BoolRole::Filter);
        assert_eq!(r.queries.get(JobIndexField::Deleted).unwrap().role(), BoolRole::Must);
        assert_eq!(r.queries.get(JobIndexField::Title).unwrap().role(), BoolRole::Should);
        assert_eq!(r.ranges.get(JobIndexField::MinYears).unwrap().role(), BoolRole::Filter);
    }

    #[test]
    fn test_search_word_fans_out() {
        let r = Jobs::registries();
        let q = QueryCompiler::compile(
            &[Condition::new(JobIndexField::SearchWord, "kafka")],
            &r.queries,
            &r.ranges,
        )
        .unwrap();
        let inner = q.as_bool().unwrap().must[0].as_bool().unwrap();
        assert_eq!(inner.should[0], Query::text("title", "kafka"));
        assert_eq!(inner.should.len(), 3);
    }

    #[test]
    fn test_doc_keeps_unmodelled_fields() {
        let doc: JobDoc = serde_json::from_value(serde_json::json!({
            "doc_id": "job-1",
            "company": "META",
            "min_years": 3,
            "interview_count": 4
        }))
        .unwrap();
        assert_eq!(doc.company.as_deref(), Some("META"));
        assert_eq!(doc.min_years, Some(3));
        assert_eq!(doc.extra["interview_count"], 4);
    }
}
