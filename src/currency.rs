//! Currency symbols, price-text splitting and best-effort conversion.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::traits::{Fetcher, RateProvider};

/// Symbol (or short text) as it appears in market prices, and its currency code.
pub const CURRENCY_MAP: &[(&str, &str)] = &[
    ("lek", "ALL"),
    ("$", "USD"),
    ("ман", "AZN"),
    ("p.", "BYR"),
    ("BZ$", "BZD"),
    ("$b", "BOB"),
    ("KM", "BAM"),
    ("P", "BWP"),
    ("лв", "BGN"),
    ("R$", "BRL"),
    ("¥", "JPY"),
    ("₡", "CRC"),
    ("kn", "HRK"),
    ("₱", "CUP"),
    ("Kč", "CZK"),
    ("kr", "DKK"),
    ("RD$", "DOP"),
    ("£", "GBP"),
    ("€", "EUR"),
    ("¢", "GHS"),
    ("Q", "GTQ"),
    ("L", "HNL"),
    ("Ft", "HUF"),
    ("Rp", "IDR"),
    ("₪", "ILS"),
    ("J$", "JMD"),
    ("₩", "KRW"),
    ("₭", "LAK"),
    ("ден", "MKD"),
    ("RM", "MYR"),
    ("Rs", "MUR"),
    ("руб", "RUB"),
];

pub fn symbol_to_code(symbol: &str) -> Option<&'static str> {
    CURRENCY_MAP
        .iter()
        .find(|(sym, _)| *sym == symbol)
        .map(|(_, code)| *code)
}

/// First symbol mapped to `code`, used when rendering a converted price.
pub fn code_to_symbol(code: &str) -> Option<&'static str> {
    CURRENCY_MAP
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(sym, _)| *sym)
}

pub fn is_known_code(code: &str) -> bool {
    CURRENCY_MAP.iter().any(|(_, c)| *c == code)
}

/// Resolve the currency of a price from the text before and after its amount.
///
/// `before` is looked up first, then `after`; when neither is a known symbol,
/// `after` is returned verbatim on the assumption it is already a code. Never
/// fails, so callers wanting a real code must check [`is_known_code`].
pub fn normalize_currency(before: &str, after: &str) -> String {
    symbol_to_code(before)
        .or_else(|| symbol_to_code(after))
        .map_or_else(|| after.to_string(), str::to_string)
}

/// A raw price split around its numeric part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceParts {
    pub before: String,
    pub amount: String,
    pub after: String,
}

impl PriceParts {
    pub fn currency(&self) -> String {
        normalize_currency(&self.before, &self.after)
    }
}

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ','
}

/// Split `"$10.99"` / `"10,99€"` / `"1.234,00 pуб."` into prefix, amount and suffix.
///
/// Line breaks and tabs are dropped first; spaces are removed from the prefix
/// and suffix. Text with no digits at all ends up entirely in `before`.
pub fn split_price(raw: &str) -> PriceParts {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .collect();

    let start = cleaned.find(is_amount_char).unwrap_or(cleaned.len());
    let end = cleaned
        .rfind(is_amount_char)
        .map_or(start, |i| i + 1)
        .max(start);

    let strip = |s: &str| s.chars().filter(|c| *c != ' ' && *c != '\u{a0}').collect::<String>();

    PriceParts {
        before: strip(&cleaned[..start]),
        amount: cleaned[start..end].to_string(),
        after: strip(&cleaned[end..]),
    }
}

/// Parse a price amount, reading `,` as the decimal separator.
pub fn parse_amount(amount: &str) -> Option<f64> {
    amount.replace(',', ".").parse().ok()
}

/// Truncate (not round) to two decimals, after snapping float noise such as
/// `1098.9999999999998` back to `1099`.
fn truncate_cents(value: f64) -> f64 {
    let cents = (value * 100.0 * 1e6).round() / 1e6;
    cents.trunc() / 100.0
}

/// Convert `amount` between currency codes, reporting why it could not.
pub async fn try_convert(
    provider: &dyn RateProvider,
    amount: f64,
    from: &str,
    to: &str,
) -> anyhow::Result<f64> {
    if from == to {
        return Ok(truncate_cents(amount));
    }

    let rates = provider.rates(&[from, to]).await?;
    let from_rate = rates
        .get(from)
        .copied()
        .ok_or_else(|| anyhow!("no exchange rate for {from}"))?;
    let to_rate = rates
        .get(to)
        .copied()
        .ok_or_else(|| anyhow!("no exchange rate for {to}"))?;
    if from_rate == 0.0 {
        bail!("zero exchange rate for {from}");
    }

    Ok(truncate_cents(amount / from_rate * to_rate))
}

/// Best-effort conversion: any failure returns `amount` untouched.
pub async fn convert_amount(provider: &dyn RateProvider, amount: f64, from: &str, to: &str) -> f64 {
    match try_convert(provider, amount, from, to).await {
        Ok(converted) => converted,
        Err(e) => {
            debug!("Currency conversion {} -> {} failed: {}", from, to, e);
            amount
        }
    }
}

/// [`RateProvider`] for fixer-style endpoints (`?symbols=A,B` → `{"base", "rates"}`).
pub struct HttpRateProvider {
    fetcher: Arc<dyn Fetcher>,
    endpoint: String,
}

impl HttpRateProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn rates(&self, codes: &[&str]) -> anyhow::Result<HashMap<String, f64>> {
        let url = format!("{}?symbols={}", self.endpoint, codes.join(","));
        let data = self.fetcher.get_json(&url, &[]).await?;

        let rates = data
            .get("rates")
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow!("exchange response has no rates"))?;

        let mut out: HashMap<String, f64> = rates
            .iter()
            .filter_map(|(code, rate)| rate.as_f64().map(|r| (code.clone(), r)))
            .collect();

        // The base currency is implied rather than listed.
        if let Some(base) = data.get("base").and_then(Value::as_str) {
            out.entry(base.to_string()).or_insert(1.0);
        }

        Ok(out)
    }
}
