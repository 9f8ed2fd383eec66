//! I/O boundaries around the domain: price feed, sheet download,
//! persistence and snapshot publishing.

pub mod config;
pub mod exchange;
pub mod export;
pub mod sheets;
pub mod store;

pub use config::Config;
pub use exchange::{ExchangeClient, ExchangeError, QuoteFreshness, QuotePayload};
pub use export::{export_snapshots, ExportError, ExportSummary};
pub use sheets::{fetch_sheet_grid, split_csv, SheetFetchError};
pub use store::{DatasetStore, PersistedDataset, StoreError};
