//! Runtime configuration from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::import::SheetLayout;

pub const ENV_SHEET_URL: &str = "GUILD_SHEET_URL";
pub const ENV_EXCHANGE_URL: &str = "GUILD_EXCHANGE_URL";
pub const ENV_DATA_FILE: &str = "GUILD_DATA_FILE";
pub const ENV_EXPORT_DIR: &str = "GUILD_EXPORT_DIR";
pub const ENV_QUOTE_TTL_SECS: &str = "GUILD_QUOTE_TTL_SECS";

#[derive(Clone, Debug)]
pub struct Config {
    /// Share URL of the guild sheet; imports are skipped when unset.
    pub sheet_url: Option<String>,
    /// Base URL of the exchange price feed; `None` uses the client default.
    pub exchange_base_url: Option<String>,
    /// Dataset blob override; `None` uses the platform data directory.
    pub data_file: Option<PathBuf>,
    /// Where the public JSON snapshots land.
    pub export_dir: PathBuf,
    pub quote_ttl: Duration,
    pub layout: SheetLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            exchange_base_url: None,
            data_file: None,
            export_dir: PathBuf::from("api_exports"),
            quote_ttl: Duration::from_secs(600),
            layout: SheetLayout::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.sheet_url = non_empty(ENV_SHEET_URL);
        config.exchange_base_url = non_empty(ENV_EXCHANGE_URL);
        config.data_file = non_empty(ENV_DATA_FILE).map(PathBuf::from);
        if let Some(dir) = non_empty(ENV_EXPORT_DIR) {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(secs) = non_empty(ENV_QUOTE_TTL_SECS).and_then(|v| v.parse().ok()) {
            config.quote_ttl = Duration::from_secs(secs);
        }
        config
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
