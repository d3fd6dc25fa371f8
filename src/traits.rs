//! Seams between the query layer and its collaborators

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::SENTINEL;

/// Transport used by every query.
///
/// The client only ever issues GETs; the default JSON method decodes the
/// text body, so implementors normally provide `get_text` alone.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` with the extra request headers and return the body text.
    ///
    /// # Returns
    /// * `Result<String>` - The body, or a transport/status error
    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String>;

    /// Fetch `url` and decode the body as JSON.
    async fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<Value> {
        let body = self.get_text(url, headers).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Source of exchange rates.
///
/// Failures are reported as `anyhow` errors since callers always absorb them
/// and fall back to the unconverted amount.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Rates for `codes` relative to the provider's base currency.
    ///
    /// # Arguments
    /// * `codes` - Currency codes the caller needs (e.g. `["USD", "GBP"]`)
    ///
    /// # Returns
    /// * `anyhow::Result<HashMap<String, f64>>` - code to rate
    async fn rates(&self, codes: &[&str]) -> anyhow::Result<HashMap<String, f64>>;
}

/// Records that carry store pricing in the plain/discounted layout.
pub trait Priced {
    fn price(&self) -> Option<&str>;
    fn discount(&self) -> Option<&str>;
    fn discount_price(&self) -> Option<&str>;

    /// Display price: `"<final> (<percent>)"` when discounted, the plain price otherwise.
    fn price_text(&self) -> String {
        match (self.discount(), self.discount_price()) {
            (Some(discount), Some(final_price)) => format!("{final_price} ({discount})"),
            _ => self.price().unwrap_or(SENTINEL).to_string(),
        }
    }
}
