use super::{connect, print_json};
use anyhow::Result;
use chrono::{DateTime, Utc};
use scout::config::Config;
use scout::schema::Jobs;
use scout::stats::{daily_job_stats, DailyJobStats};
use scout::DocumentSearch;

/// Run the daily job statistics batch in one request
pub async fn run_daily(config: &Config, now: Option<DateTime<Utc>>) -> Result<()> {
    let now = now.unwrap_or_else(Utc::now);
    tracing::info!(index = %config.indices.job, %now, "Collecting daily job stats");

    let search = DocumentSearch::<Jobs>::new(connect(config)?, &config.indices.job);
    let result = search.aggregate_requests(daily_job_stats(now)).await?;

    print_json(&DailyJobStats::from_result(&result))
}
