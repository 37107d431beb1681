use std::error::Error;

use tracing_subscriber::EnvFilter;

use pr_reviewer::ReviewJobConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from a .env file when one is present.
    // CI runners inject everything directly, so a missing file is fine.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = ReviewJobConfig::from_env()?;
    let summary = pr_reviewer::run_review(cfg).await?;

    tracing::info!(
        files = summary.files_total,
        excluded = summary.files_excluded,
        comments = summary.comments_posted,
        tests = summary.tests_written,
        skipped = summary.files_skipped,
        "review job finished"
    );

    Ok(())
}
