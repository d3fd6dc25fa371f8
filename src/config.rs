//! Client configuration and endpoint constants.

use std::time::Duration;

use crate::error::{Result, SteamError};

pub const STORE_BASE: &str = "https://store.steampowered.com";
pub const COMMUNITY_BASE: &str = "https://steamcommunity.com";
pub const API_BASE: &str = "https://api.steampowered.com";
pub const EXCHANGE_URL: &str = "https://api.frankfurter.app/latest";

/// Prefix for market item images; the item's `icon_url` hash is appended.
pub const ECONOMY_IMAGE_BASE: &str = "https://steamcommunity-a.akamaihd.net/economy/image/";

/// Prefix for app icons and logos in owned-games responses.
pub const APP_IMAGE_BASE: &str = "https://media.steampowered.com/steamcommunity/public/images/apps";

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Cookies that get the store past the age gate on mature app pages.
pub const AGE_GATE_COOKIE: &str = "birthtime=0; lastagecheckage=1-0-1900; mature_content=1";

/// Settings for a [`SteamClient`](crate::SteamClient).
///
/// Constructed once by the caller and owned by the client. Credentials are
/// checked lazily: only the calls that need a key or session fail without them.
#[derive(Debug, Clone)]
pub struct SteamConfig {
    /// Steam Web API key, needed for profile, library, achievement and vanity calls.
    pub api_key: Option<String>,
    /// Community session id, needed for user search. Any alphanumeric string works.
    pub session: Option<String>,
    /// Memoize resolutions (usernames, app names, item names) for the client's lifetime.
    pub cache_enabled: bool,
    /// Log absorbed failures (currency conversion, missing market data) at `warn`
    /// instead of `debug`.
    pub verbose: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Currency code market prices are converted into.
    pub target_currency: String,
    /// Exchange-rate endpoint answering `?symbols=A,B` with `{"base": .., "rates": {..}}`.
    pub exchange_url: String,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            session: None,
            cache_enabled: true,
            verbose: false,
            timeout: Duration::from_secs(10),
            target_currency: "GBP".to_string(),
            exchange_url: EXCHANGE_URL.to_string(),
        }
    }
}

impl SteamConfig {
    /// Build a configuration from the environment, loading `.env` first if present.
    ///
    /// Reads `STEAM_API_KEY`, `STEAM_SESSION`, `STEAM_CACHE`, `STEAM_VERBOSE`,
    /// `STEAM_TIMEOUT_SECS`, `STEAM_CURRENCY` and `STEAM_EXCHANGE_URL`. Anything
    /// unset or unparsable keeps its default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.api_key = lookup("STEAM_API_KEY").filter(|s| !s.is_empty());
        config.session = lookup("STEAM_SESSION").filter(|s| !s.is_empty());
        if let Some(flag) = lookup("STEAM_CACHE").and_then(|v| parse_flag(&v)) {
            config.cache_enabled = flag;
        }
        if let Some(flag) = lookup("STEAM_VERBOSE").and_then(|v| parse_flag(&v)) {
            config.verbose = flag;
        }
        if let Some(secs) =
            lookup("STEAM_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(code) = lookup("STEAM_CURRENCY").filter(|s| !s.is_empty()) {
            config.target_currency = code;
        }
        if let Some(url) = lookup("STEAM_EXCHANGE_URL").filter(|s| !s.is_empty()) {
            config.exchange_url = url;
        }

        config
    }

    pub fn require_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(SteamError::KeyNotSet)
    }

    pub fn require_session(&self) -> Result<&str> {
        self.session
            .as_deref()
            .filter(|session| !session.is_empty())
            .ok_or(SteamError::SessionNotSet)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
