//! The query client.
//!
//! Every query is one (or a short chain of) GET requests through the
//! [`Fetcher`], followed by a pure parse from [`crate::models`]. Queries live
//! in `store`, `users` and `market`; this module holds construction,
//! configuration and the helpers they share.

mod market;
mod store;
mod users;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::SteamCache;
use crate::config::SteamConfig;
use crate::currency::HttpRateProvider;
use crate::error::Result;
use crate::http::HttpFetcher;
use crate::models::AppRef;
use crate::traits::{Fetcher, RateProvider};

/// Builder for a [`SteamClient`].
///
/// Without an explicit fetcher the client uses [`HttpFetcher`] with the
/// configured timeout; without a rate provider it queries the configured
/// exchange endpoint through that same fetcher.
#[derive(Default)]
pub struct SteamClientBuilder {
    config: SteamConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    rates: Option<Arc<dyn RateProvider>>,
}

impl SteamClientBuilder {
    pub fn config(mut self, config: SteamConfig) -> Self {
        self.config = config;
        self
    }

    /// Route every request through `fetcher`.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Take exchange rates from `rates` instead of the HTTP endpoint.
    pub fn rate_provider(mut self, rates: Arc<dyn RateProvider>) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn build(self) -> Result<SteamClient> {
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(self.config.timeout)?),
        };
        let rates: Arc<dyn RateProvider> = match self.rates {
            Some(rates) => rates,
            None => Arc::new(HttpRateProvider::new(
                fetcher.clone(),
                self.config.exchange_url.clone(),
            )),
        };

        Ok(SteamClient {
            config: self.config,
            cache: SteamCache::new(),
            fetcher,
            rates,
        })
    }
}

/// Client for the Steam store, the community site and the Web API.
pub struct SteamClient {
    config: SteamConfig,
    cache: SteamCache,
    fetcher: Arc<dyn Fetcher>,
    rates: Arc<dyn RateProvider>,
}

impl SteamClient {
    pub fn builder() -> SteamClientBuilder {
        SteamClientBuilder::default()
    }

    /// Client with the default HTTP transport.
    pub fn new(config: SteamConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &SteamConfig {
        &self.config
    }

    /// Replace the credentials and toggles in one go.
    ///
    /// Disabling the cache stops reads and writes but keeps existing entries
    /// until [`clear_cache`](Self::clear_cache).
    pub fn set_key(
        &mut self,
        key: impl Into<String>,
        session: impl Into<String>,
        cache_enabled: bool,
        verbose: bool,
    ) {
        self.config.api_key = Some(key.into()).filter(|key| !key.is_empty());
        self.config.session = Some(session.into()).filter(|session| !session.is_empty());
        self.config.cache_enabled = cache_enabled;
        self.config.verbose = verbose;
    }

    /// Number of memoized resolutions.
    pub fn count_cache(&self) -> usize {
        self.cache.count()
    }

    /// Forget every memoized resolution, returning how many there were.
    pub fn clear_cache(&self) -> usize {
        let cleared = self.cache.clear();
        debug!("Cleared {} cached entries", cleared);
        cleared
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.fetcher.get_text(url, &[]).await
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        self.fetcher.get_json(url, &[]).await
    }

    fn caching(&self) -> bool {
        self.config.cache_enabled
    }

    /// Report a failure that was absorbed rather than returned.
    fn absorbed(&self, message: &str) {
        if self.config.verbose {
            warn!("{}", message);
        } else {
            debug!("{}", message);
        }
    }

    /// A numeric appid as-is, anything else through [`get_app`](Self::get_app).
    async fn resolve_app(&self, game: &str) -> Result<Option<AppRef>> {
        let game = game.trim();
        if is_numeric(game) {
            return Ok(Some(AppRef {
                id: game.to_string(),
                title: None,
            }));
        }
        self.get_app(game).await
    }
}

/// Non-empty and all ASCII digits, i.e. already an appid or steamid.
pub(crate) fn is_numeric(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_inputs() {
        assert!(is_numeric("76561197960287930"));
        assert!(is_numeric("440"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("gaben"));
        assert!(!is_numeric("-1"));
        assert!(!is_numeric("4 40"));
    }

    #[test]
    fn set_key_replaces_configuration() {
        let mut client = SteamClient::new(SteamConfig::default()).unwrap();
        assert!(client.config().require_key().is_err());

        client.set_key("KEY", "", false, true);
        assert_eq!(client.config().require_key().unwrap(), "KEY");
        assert!(client.config().require_session().unwrap_err().is_config());
        assert!(!client.config().cache_enabled);
        assert!(client.config().verbose);
    }
}
