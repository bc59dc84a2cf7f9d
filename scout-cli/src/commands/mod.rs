pub mod compile;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};
use clap::ValueEnum;
use scout::config::{Config, IndexConfig};
use scout::{Condition, FieldName};
use scout_es::ElasticsearchClient;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    Jobs,
    TechBlogs,
    CommunityPosts,
}

impl SchemaArg {
    /// Configured index name for this schema.
    pub fn index<'a>(&self, indices: &'a IndexConfig) -> &'a str {
        match self {
            SchemaArg::Jobs => &indices.job,
            SchemaArg::TechBlogs => &indices.tech_blog,
            SchemaArg::CommunityPosts => &indices.community_post,
        }
    }
}

pub fn parse_conditions<F>(raw: &[String]) -> Result<Vec<Condition<F>>>
where
    F: FieldName + FromStr<Err = scout::Error>,
{
    raw.iter()
        .map(|s| s.parse().with_context(|| format!("Invalid --where '{}'", s)))
        .collect()
}

pub fn connect(config: &Config) -> Result<Arc<ElasticsearchClient>> {
    let client = ElasticsearchClient::new(&config.elasticsearch)
        .with_context(|| format!("Cannot create client for {}", config.elasticsearch.url))?;
    Ok(Arc::new(client))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout::schema::JobIndexField;

    #[test]
    fn test_parse_conditions() {
        let raw = vec!["company=META".to_string(), "min_years=..3".to_string()];
        let conditions = parse_conditions::<JobIndexField>(&raw).unwrap();

        assert_eq!(conditions[0], Condition::new(JobIndexField::Company, "META"));
        assert_eq!(conditions[1], Condition::at_most(JobIndexField::MinYears, 3));
    }

    #[test]
    fn test_unknown_field_names_the_argument() {
        let raw = vec!["salary=100".to_string()];
        let err = parse_conditions::<JobIndexField>(&raw).unwrap_err();
        assert!(err.to_string().contains("salary=100"));
    }

    #[test]
    fn test_schema_index_names() {
        let indices = IndexConfig::default();
        assert_eq!(SchemaArg::Jobs.index(&indices), "jobs");
        assert_eq!(SchemaArg::CommunityPosts.index(&indices), "community_posts");
    }
}
