//! Storefront JSON API records (`api/featured`, `api/featuredcategories`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::json::{array_field, bool_field, string_field, u64_field};

use super::cap;

/// Platform lists of `api/featured`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    pub fn featured_key(self) -> &'static str {
        match self {
            Self::Windows => "featured_win",
            Self::Mac => "featured_mac",
            Self::Linux => "featured_linux",
        }
    }
}

/// Sections of `api/featuredcategories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedCategory {
    Specials,
    ComingSoon,
    TopSellers,
    NewReleases,
}

impl FeaturedCategory {
    pub fn key(self) -> &'static str {
        match self {
            Self::Specials => "specials",
            Self::ComingSoon => "coming_soon",
            Self::TopSellers => "top_sellers",
            Self::NewReleases => "new_releases",
        }
    }
}

/// A game as the storefront API describes it. Prices are in cents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteamGame {
    pub id: Option<String>,
    pub name: Option<String>,
    pub discounted: bool,
    pub discount_percent: u64,
    pub original_price: Option<u64>,
    pub final_price: Option<u64>,
    pub currency: Option<String>,
    pub large_capsule_image: Option<String>,
    pub small_capsule_image: Option<String>,
    pub header_image: Option<String>,
    pub windows_available: bool,
    pub mac_available: bool,
    pub linux_available: bool,
    pub streamingvideo_available: bool,
    pub controller_support: Option<String>,
}

impl SteamGame {
    pub fn from_json(data: &Value) -> Self {
        Self {
            id: string_field(data, "id"),
            name: string_field(data, "name"),
            discounted: bool_field(data, "discounted").unwrap_or(false),
            discount_percent: u64_field(data, "discount_percent").unwrap_or(0),
            original_price: u64_field(data, "original_price"),
            final_price: u64_field(data, "final_price"),
            currency: string_field(data, "currency"),
            large_capsule_image: string_field(data, "large_capsule_image"),
            small_capsule_image: string_field(data, "small_capsule_image"),
            header_image: string_field(data, "header_image"),
            windows_available: bool_field(data, "windows_available").unwrap_or(false),
            mac_available: bool_field(data, "mac_available").unwrap_or(false),
            linux_available: bool_field(data, "linux_available").unwrap_or(false),
            streamingvideo_available: bool_field(data, "streamingvideo_available")
                .unwrap_or(false),
            controller_support: string_field(data, "controller_support"),
        }
    }

    /// Final price as `"9.99 USD"`, with `" (-50%)"` appended when discounted.
    pub fn get_price_text(&self) -> Option<String> {
        let cents = self.final_price?;
        let mut text = format!("{}.{:02}", cents / 100, cents % 100);
        if let Some(currency) = &self.currency {
            text.push(' ');
            text.push_str(currency);
        }
        if self.discounted && self.discount_percent > 0 {
            text.push_str(&format!(" (-{}%)", self.discount_percent));
        }
        Some(text)
    }

    pub fn platforms(&self) -> Vec<Platform> {
        [
            (self.windows_available, Platform::Windows),
            (self.mac_available, Platform::Mac),
            (self.linux_available, Platform::Linux),
        ]
        .into_iter()
        .filter_map(|(available, platform)| available.then_some(platform))
        .collect()
    }
}

/// Games listed under `data[list_key]` (an array) or `data[list_key].items`.
pub fn parse_featured_list(data: &Value, list_key: &str, limit: usize) -> Vec<SteamGame> {
    let Some(section) = data.get(list_key) else {
        return Vec::new();
    };
    let items = match section {
        Value::Array(items) => items.as_slice(),
        _ => array_field(section, "items"),
    };

    items.iter().take(cap(limit)).map(SteamGame::from_json).collect()
}
