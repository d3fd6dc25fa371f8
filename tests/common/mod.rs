//! Shared fixtures for the integration tests.
//!
//! `MockFetcher` answers requests from canned bodies keyed by URL substring
//! and records every URL it is asked for, so tests can assert both what a
//! query returned and which requests it made.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use steamsearch::{Fetcher, RateProvider, Result, SteamClient, SteamConfig, SteamError};

pub const STEAMID: &str = "76561197960287930";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

enum Reply {
    Body(String),
    Status(u16),
}

#[derive(Default)]
pub struct MockFetcher {
    routes: Vec<(String, Reply)>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any URL containing `pattern` with `body`. First match wins.
    pub fn route(mut self, pattern: &str, body: impl Into<String>) -> Self {
        self.routes.push((pattern.to_string(), Reply::Body(body.into())));
        self
    }

    /// Answer any URL containing `pattern` with an error status.
    pub fn fail(mut self, pattern: &str, status: u16) -> Self {
        self.routes.push((pattern.to_string(), Reply::Status(status)));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests whose URL contains `pattern`.
    pub fn hits(&self, pattern: &str) -> usize {
        self.urls().iter().filter(|url| url.contains(pattern)).count()
    }

    /// Value of header `name` on the first request whose URL contains `pattern`.
    pub fn header(&self, pattern: &str, name: &str) -> Option<String> {
        let requests = self.requests.lock().unwrap();
        let (_, headers) = requests.iter().find(|(url, _)| url.contains(pattern))?;
        headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        self.requests.lock().unwrap().push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));

        match self.routes.iter().find(|(pattern, _)| url.contains(pattern.as_str())) {
            Some((_, Reply::Body(body))) => Ok(body.clone()),
            Some((_, Reply::Status(status))) => Err(SteamError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(SteamError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// Rates relative to EUR.
pub struct FixedRates(pub HashMap<String, f64>);

impl FixedRates {
    pub fn standard() -> Self {
        Self(HashMap::from([
            ("EUR".to_string(), 1.0),
            ("USD".to_string(), 1.25),
            ("GBP".to_string(), 0.5),
        ]))
    }
}

#[async_trait]
impl RateProvider for FixedRates {
    async fn rates(&self, codes: &[&str]) -> anyhow::Result<HashMap<String, f64>> {
        Ok(codes
            .iter()
            .filter_map(|code| self.0.get(*code).map(|rate| (code.to_string(), *rate)))
            .collect())
    }
}

pub struct FailingRates;

#[async_trait]
impl RateProvider for FailingRates {
    async fn rates(&self, _codes: &[&str]) -> anyhow::Result<HashMap<String, f64>> {
        anyhow::bail!("exchange service unavailable")
    }
}

pub fn config() -> SteamConfig {
    SteamConfig {
        api_key: Some("TESTKEY".to_string()),
        session: Some("abc123".to_string()),
        ..SteamConfig::default()
    }
}

pub fn client_with(
    fetcher: &Arc<MockFetcher>,
    rates: Arc<dyn RateProvider>,
    config: SteamConfig,
) -> SteamClient {
    init_tracing();
    SteamClient::builder()
        .config(config)
        .fetcher(fetcher.clone())
        .rate_provider(rates)
        .build()
        .unwrap()
}

pub fn client(fetcher: &Arc<MockFetcher>) -> SteamClient {
    client_with(fetcher, Arc::new(FixedRates::standard()), config())
}

pub fn search_page(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(id, title)| {
            format!(
                r#"<a href="https://store.steampowered.com/app/{id}/x/" class="search_result_row">
                     <span class="title">{title}</span>
                     <div class="col search_discount"></div>
                     <div class="col search_price">$9.99</div>
                   </a>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="search_result_container">{rows}</div></body></html>"#)
}

pub fn user_search(urls: &[&str]) -> String {
    let html: String = urls
        .iter()
        .map(|url| {
            format!(
                r#"<div class="search_row"><a class="searchPersonaName" href="{url}">someone</a></div>"#
            )
        })
        .collect();
    serde_json::json!({ "success": 1, "html": html }).to_string()
}

pub fn vanity(steamid: Option<&str>) -> String {
    match steamid {
        Some(id) => serde_json::json!({"response": {"steamid": id, "success": 1}}).to_string(),
        None => serde_json::json!({"response": {"success": 42, "message": "No match"}}).to_string(),
    }
}
