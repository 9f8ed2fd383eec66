//! Thin asynchronous client for the exchange price feed.
//!
//! - Returns a quote book keyed by material name, in whole currency units.
//! - Maintains a short in-memory cache with a stale fallback so a flaky
//!   feed degrades to old quotes instead of none.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::entities::{Quote, QuoteBook};
use crate::util::version::user_agent;

const DEFAULT_BASE_URL: &str = "https://api.g2.galactictycoons.com/public/exchange/";
/// The feed refreshes on its own cadence; ten minutes keeps us polite.
const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteFreshness {
    Fresh,
    Cached,
    Stale,
}

/// Quotes plus how they were obtained.
#[derive(Clone, Debug)]
pub struct QuotePayload {
    pub quotes: QuoteBook,
    pub fetched_at: SystemTime,
    pub freshness: QuoteFreshness,
}

#[derive(Debug, Deserialize)]
struct PriceFeedDto {
    #[serde(default)]
    prices: Vec<MatPriceDto>,
}

/// One feed row. Prices arrive in cents.
#[derive(Debug, Deserialize)]
struct MatPriceDto {
    #[serde(rename = "matName")]
    mat_name: Option<String>,
    #[serde(rename = "currentPrice", default)]
    current_price: f64,
    #[serde(rename = "avgPrice", default)]
    avg_price: f64,
}

#[derive(Default)]
struct ExchangeCache {
    quotes: Option<(QuoteBook, SystemTime)>,
}

#[derive(Clone)]
pub struct ExchangeClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<ExchangeCache>>,
    ttl: Duration,
}

impl ExchangeClient {
    pub fn new() -> Result<Self, ExchangeError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, ExchangeError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(ExchangeCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Material quotes keyed by name. The feed reports cents; guild pricing
    /// works in whole currency units, so the conversion happens here and
    /// nothing past this boundary ever sees cents.
    pub async fn get_quotes(&self) -> Result<QuotePayload, ExchangeError> {
        if let Some(payload) = self.cached_quotes(false).await {
            return Ok(payload);
        }

        let url = self.base_url.join("mat-prices")?;
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(error) => return self.stale_or(error.into()).await,
        };

        let feed = match response.error_for_status() {
            Ok(response) => response.json::<PriceFeedDto>().await,
            Err(error) => Err(error),
        };

        match feed {
            Ok(feed) => {
                let quotes = quote_book(feed);
                info!(count = quotes.len(), "fetched exchange quotes");
                Ok(self.store_quotes(quotes).await)
            }
            Err(error) => {
                warn!(%error, "exchange quote fetch failed");
                self.stale_or(error.into()).await
            }
        }
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.quotes = None;
    }

    async fn cached_quotes(&self, allow_stale: bool) -> Option<QuotePayload> {
        let cache = self.cache.lock().await;
        let (quotes, fetched_at) = cache.quotes.as_ref()?;
        let age = fetched_at.elapsed().unwrap_or_default();
        if age <= self.ttl {
            Some(QuotePayload {
                quotes: quotes.clone(),
                fetched_at: *fetched_at,
                freshness: QuoteFreshness::Cached,
            })
        } else if allow_stale {
            Some(QuotePayload {
                quotes: quotes.clone(),
                fetched_at: *fetched_at,
                freshness: QuoteFreshness::Stale,
            })
        } else {
            None
        }
    }

    async fn stale_or(&self, error: ExchangeError) -> Result<QuotePayload, ExchangeError> {
        if let Some(stale) = self.cached_quotes(true).await {
            warn!("serving stale exchange quotes after fetch failure");
            return Ok(stale);
        }
        Err(error)
    }

    async fn store_quotes(&self, quotes: QuoteBook) -> QuotePayload {
        let fetched_at = SystemTime::now();
        let mut cache = self.cache.lock().await;
        cache.quotes = Some((quotes.clone(), fetched_at));
        QuotePayload {
            quotes,
            fetched_at,
            freshness: QuoteFreshness::Fresh,
        }
    }
}

fn quote_book(feed: PriceFeedDto) -> QuoteBook {
    let mut quotes = QuoteBook::new();
    for item in feed.prices {
        let Some(name) = item.mat_name.filter(|name| !name.is_empty()) else {
            continue;
        };
        quotes.insert(
            name,
            Quote {
                current_price: item.current_price / 100.0,
                average_price: item.avg_price / 100.0,
            },
        );
    }
    quotes
}
