//! Async client for the Steam store, the Steam community site and the Steam Web API.
//!
//! Store and community pages are scraped; profiles, libraries and
//! achievements come from the Web API and need an API key. Fields that a page
//! does not carry come back as `None` instead of failing the whole query.
//!
//! ```no_run
//! use steamsearch::{SteamClient, SteamConfig};
//!
//! # async fn run() -> steamsearch::Result<()> {
//! let client = SteamClient::new(SteamConfig::from_env())?;
//!
//! for game in client.search_games("portal", 5).await? {
//!     println!("{}", game.title.as_deref().unwrap_or(steamsearch::models::SENTINEL));
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod currency;
pub mod error;
pub mod extract;
pub mod http;
pub mod models;
pub mod table;
pub mod traits;

pub use cache::SteamCache;
pub use client::{SteamClient, SteamClientBuilder};
pub use config::SteamConfig;
pub use currency::{HttpRateProvider, convert_amount, normalize_currency, split_price};
pub use error::{Result, SteamError};
pub use http::HttpFetcher;
pub use table::format_table;
pub use traits::{Fetcher, Priced, RateProvider};
