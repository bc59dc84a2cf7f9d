use super::{connect, parse_conditions, print_json};
use anyhow::Result;
use scout::config::Config;
use scout::schema::IndexSchema;
use scout::{DocumentSearch, QueryWindow};
use serde_json::json;
use std::str::FromStr;

/// Print the request body a search would send. No request is made.
pub fn run_compile<S>(
    config: &Config,
    index: &str,
    raw_conditions: &[String],
    from: Option<i64>,
    to: Option<i64>,
) -> Result<()>
where
    S: IndexSchema,
    S::Field: FromStr<Err = scout::Error>,
{
    let conditions = parse_conditions::<S::Field>(raw_conditions)?;
    let window = QueryWindow::with_defaults(conditions, from, to, config.search.default_page_size)?;

    let search = DocumentSearch::<S>::new(connect(config)?, index);
    let request = search.build_request(window, Vec::new())?;

    print_json(&json!({
        "index": index,
        "body": scout_es::dsl::search_body(&request),
    }))
}
