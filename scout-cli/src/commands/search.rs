use super::{connect, parse_conditions, print_json};
use anyhow::Result;
use scout::config::Config;
use scout::schema::IndexSchema;
use scout::{DocumentSearch, QueryWindow};
use serde::Serialize;
use std::str::FromStr;

/// Run one page of a search and print it as JSON
pub async fn run_search<S>(
    config: &Config,
    index: &str,
    raw_conditions: &[String],
    from: Option<i64>,
    to: Option<i64>,
) -> Result<()>
where
    S: IndexSchema,
    S::Field: FromStr<Err = scout::Error>,
    S::Document: Serialize,
{
    let conditions = parse_conditions::<S::Field>(raw_conditions)?;
    let window = QueryWindow::with_defaults(conditions, from, to, config.search.default_page_size)?;

    tracing::info!(schema = S::NAME, index, from = window.from(), to = window.to(), "Searching");

    let search = DocumentSearch::<S>::new(connect(config)?, index);
    let page = search.search(window).await?;

    tracing::info!(
        returned = page.items.len(),
        total = page.total_hits,
        has_next = page.has_next,
        "Search complete"
    );
    print_json(&page)
}

/// Fetch one document and print it as JSON
pub async fn run_get<S>(config: &Config, index: &str, id: &str) -> Result<()>
where
    S: IndexSchema,
    S::Document: Serialize,
{
    let search = DocumentSearch::<S>::new(connect(config)?, index);
    let doc = search.get_by_id(id).await?;
    print_json(&doc)
}
