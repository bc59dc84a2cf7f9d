//! Daily job statistics: one aggregation batch behind the job stats page.

use crate::aggregation::{AggregationResult, BucketRequest, MetricSpec};
use crate::condition::Condition;
use crate::schema::JobIndexField;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const BY_COMPANY: &str = "by_company";
pub const BY_POSITION_CATEGORY: &str = "by_position_category";
pub const JUNIOR_COUNT: &str = "junior_count";
pub const SENIOR_COUNT: &str = "senior_count";
pub const EXPERIENCE_REQUIRED_JUNIOR_COUNT: &str = "experience_required_junior_count";
pub const NO_EXPERIENCE_REQUIRED_COUNT: &str = "no_experience_required_count";
pub const RECENT_TREND: &str = "recent_trend";

const TREND_DAYS: i64 = 7;

/// Open, non-deleted postings plus `extra`.
fn open_jobs(extra: Vec<Condition<JobIndexField>>) -> Vec<Condition<JobIndexField>> {
    let mut conditions = extra;
    conditions.push(Condition::flag(JobIndexField::Deleted, false));
    conditions.push(Condition::flag(JobIndexField::IsClosed, false));
    conditions
}

fn count() -> Vec<MetricSpec<JobIndexField>> {
    vec![MetricSpec::count("count")]
}

/// Counting queries bucket on company with size 1; only the filter's
/// document count is read back.
fn counted(name: &str, extra: Vec<Condition<JobIndexField>>) -> BucketRequest<JobIndexField> {
    BucketRequest::terms(name, open_jobs(extra), JobIndexField::Company, 1, count())
}

/// Builds the seven daily stats requests relative to `now`.
pub fn daily_job_stats(now: DateTime<Utc>) -> Vec<BucketRequest<JobIndexField>> {
    use JobIndexField::*;

    let week_ago = now - Duration::days(TREND_DAYS);

    vec![
        BucketRequest::terms(BY_COMPANY, open_jobs(vec![]), Company, 10, count()),
        BucketRequest::terms(
            BY_POSITION_CATEGORY,
            open_jobs(vec![]),
            PositionCategory,
            100,
            count(),
        ),
        counted(JUNIOR_COUNT, vec![Condition::at_most(MinYears, 3)]),
        counted(SENIOR_COUNT, vec![Condition::at_least(MinYears, 5)]),
        counted(
            EXPERIENCE_REQUIRED_JUNIOR_COUNT,
            vec![
                Condition::flag(ExperienceRequired, true),
                Condition::at_most(MinYears, 2),
            ],
        ),
        counted(
            NO_EXPERIENCE_REQUIRED_COUNT,
            vec![Condition::flag(ExperienceRequired, false)],
        ),
        BucketRequest::date_histogram(
            RECENT_TREND,
            open_jobs(vec![Condition::time_range(CreatedAt, Some(week_ago), Some(now))]),
            CreatedAt,
            "1d",
            count(),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCount {
    pub key: String,
    pub count: u64,
}

/// Flattened view of a daily stats result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyJobStats {
    pub top_companies: Vec<KeyCount>,
    pub top_position_categories: Vec<KeyCount>,
    pub junior_count: u64,
    pub senior_count: u64,
    pub experience_required_junior_count: u64,
    pub no_experience_required_count: u64,
    pub recent_trend: Vec<KeyCount>,
}

impl DailyJobStats {
    pub fn from_result(result: &AggregationResult) -> Self {
        let key_counts = |name: &str| -> Vec<KeyCount> {
            result
                .entries(name)
                .iter()
                .map(|e| KeyCount {
                    key: e.key.clone(),
                    count: e.doc_count,
                })
                .collect()
        };

        Self {
            top_companies: key_counts(BY_COMPANY),
            top_position_categories: key_counts(BY_POSITION_CATEGORY),
            junior_count: result.total_count(JUNIOR_COUNT),
            senior_count: result.total_count(SENIOR_COUNT),
            experience_required_junior_count: result
                .total_count(EXPERIENCE_REQUIRED_JUNIOR_COUNT),
            no_experience_required_count: result.total_count(NO_EXPERIENCE_REQUIRED_COUNT),
            recent_trend: key_counts(RECENT_TREND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{BucketEntry, BucketKind, QueryResult};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    #[test]
    fn test_daily_requests() {
        let now = Utc.with_ymd_and_hms(2025, 10, 27, 0, 0, 0).unwrap();
        let requests = daily_job_stats(now);
        assert_eq!(requests.len(), 7);

        let names: Vec<_> = requests.iter().map(|r| r.query_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                BY_COMPANY,
                BY_POSITION_CATEGORY,
                JUNIOR_COUNT,
                SENIOR_COUNT,
                EXPERIENCE_REQUIRED_JUNIOR_COUNT,
                NO_EXPERIENCE_REQUIRED_COUNT,
                RECENT_TREND
            ]
        );

        for r in &requests {
            assert!(r.conditions.contains(&Condition::flag(JobIndexField::Deleted, false)));
            assert!(r.conditions.contains(&Condition::flag(JobIndexField::IsClosed, false)));
        }

        let trend = requests[6].clone().into_query().unwrap();
        let created = &trend.conditions()[0];
        assert_eq!(created.gte(), Some("1760918400000"));
        assert_eq!(created.lte(), Some("1761523200000"));
        assert_eq!(
            trend.bucket_spec().unwrap().kind(),
            &BucketKind::DateHistogram {
                calendar_interval: "1d".into()
            }
        );
    }

    #[test]
    fn test_flatten_result() {
        let mut results = BTreeMap::new();
        results.insert(
            BY_COMPANY.to_string(),
            QueryResult::Bucket {
                entries: vec![BucketEntry {
                    key: "META".into(),
                    doc_count: 40,
                    metrics: BTreeMap::new(),
                }],
                filter_doc_count: Some(71),
            },
        );
        results.insert(
            JUNIOR_COUNT.to_string(),
            QueryResult::Bucket {
                entries: vec![],
                filter_doc_count: Some(12),
            },
        );
        let stats = DailyJobStats::from_result(&AggregationResult { results });

        assert_eq!(
            stats.top_companies,
            vec![KeyCount {
                key: "META".into(),
                count: 40
            }]
        );
        assert_eq!(stats.junior_count, 12);
        assert_eq!(stats.senior_count, 0);
        assert!(stats.recent_trend.is_empty());
    }
}
