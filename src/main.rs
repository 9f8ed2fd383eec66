use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guild_price_board::app;
use guild_price_board::infra::config::Config;
use guild_price_board::util::version::{version_label, APP_NAME};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("guild_price_board=info")),
        )
        .init();

    info!("{} {}", APP_NAME, version_label());

    let config = Config::from_env();
    let report = app::run_refresh(&config).await?;

    for error in &report.validation_errors {
        warn!(%error, "validation issue");
    }
    info!(
        companies = report.companies,
        goods = report.goods,
        quotes = report.quotes,
        imported = report.imported_from_sheet,
        changed_externally = report.dataset_changed_externally,
        "refresh cycle finished"
    );
    Ok(())
}
