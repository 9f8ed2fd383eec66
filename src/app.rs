//! One refresh cycle: import, validate, price, persist, export.
//!
//! The cycle is idempotent; an external scheduler may run it on any
//! cadence. All failure handling is local: a broken sheet download keeps
//! the stored dataset, a broken quote fetch keeps stored prices.

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::{Company, QuoteBook};
use crate::domain::fingerprint::{fingerprint, SessionVersion};
use crate::domain::validate::ValidationError;
use crate::domain::{import, reconcile, stats, validate};
use crate::infra::config::Config;
use crate::infra::exchange::{ExchangeClient, ExchangeError};
use crate::infra::export::{self, ExportError};
use crate::infra::sheets;
use crate::infra::store::{DatasetStore, StoreError};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error(transparent)]
    Fingerprint(#[from] serde_json::Error),
}

/// What one refresh cycle did; the scheduler logs this.
#[derive(Clone, Debug, Default)]
pub struct RefreshReport {
    pub companies: usize,
    pub goods: usize,
    pub quotes: usize,
    pub imported_from_sheet: bool,
    pub dataset_changed_externally: bool,
    pub validation_errors: Vec<ValidationError>,
}

pub async fn run_refresh(config: &Config) -> Result<RefreshReport, RefreshError> {
    let store = match &config.data_file {
        Some(path) => DatasetStore::at(path.clone()),
        None => DatasetStore::default_location()?,
    };

    let mut session = SessionVersion::new();
    let persisted = store.load_companies();
    session.observe(fingerprint(&persisted)?);

    // Prefer a fresh sheet import; fall back to whatever was persisted.
    let mut imported_from_sheet = false;
    let mut companies = match &config.sheet_url {
        Some(url) => match import_sheet(url, config).await {
            Some(imported) => {
                imported_from_sheet = true;
                imported
            }
            None => persisted,
        },
        None => persisted,
    };

    let validation_errors = validate::validate_dataset(&companies);
    for error in &validation_errors {
        warn!(%error, "company failed validation");
    }

    let quotes = fetch_quotes(config).await?;
    companies = reconcile::price_dataset(&companies, &quotes);

    // Another writer may have saved while we were fetching; their copy wins.
    let mut dataset_changed_externally = false;
    let reloaded = store.load_companies();
    let reloaded_token = fingerprint(&reloaded)?;
    if session.diverged_from(&reloaded_token) {
        warn!("dataset changed externally during refresh; adopting the stored copy");
        dataset_changed_externally = true;
        companies = reconcile::price_dataset(&reloaded, &quotes);
    }

    store.save(&companies)?;
    session.observe(fingerprint(&companies)?);
    export::export_snapshots(&companies, &config.export_dir)?;

    let summary = stats::dataset_stats(&companies);
    info!(
        companies = summary.companies,
        unique_goods = summary.unique_goods,
        average_discount = summary.average_discount,
        "refresh complete"
    );

    Ok(RefreshReport {
        companies: companies.len(),
        goods: companies.iter().map(|company| company.goods.len()).sum(),
        quotes: quotes.len(),
        imported_from_sheet,
        dataset_changed_externally,
        validation_errors,
    })
}

async fn import_sheet(share_url: &str, config: &Config) -> Option<Vec<Company>> {
    let grid = match sheets::fetch_sheet_grid(share_url).await {
        Ok(grid) => grid,
        Err(error) => {
            warn!(%error, "sheet download failed; keeping stored dataset");
            return None;
        }
    };
    match import::parse_sheet(&grid, &config.layout) {
        Ok(companies) => {
            info!(companies = companies.len(), "imported companies from sheet");
            Some(companies)
        }
        Err(error) => {
            warn!(%error, "sheet import failed; keeping stored dataset");
            None
        }
    }
}

async fn fetch_quotes(config: &Config) -> Result<QuoteBook, RefreshError> {
    let client = match &config.exchange_base_url {
        Some(base) => ExchangeClient::with_base_url(base)?,
        None => ExchangeClient::new()?,
    };
    match client.with_ttl(config.quote_ttl).get_quotes().await {
        Ok(payload) => Ok(payload.quotes),
        Err(error) => {
            warn!(%error, "quote fetch failed; stored prices stay as-is");
            Ok(QuoteBook::new())
        }
    }
}
