//! Community market listings.

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ECONOMY_IMAGE_BASE;
use crate::currency::{code_to_symbol, parse_amount, split_price};
use crate::extract::json::{embedded_json, first_tradable};
use crate::extract::{find, find_text, html_to_text};

/// An in-game action attached to an item (e.g. "Inspect in Game...").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAction {
    pub name: String,
    pub link: String,
}

/// A market listing page for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    /// Numeric part of the lowest listing price, e.g. `"10,99"`.
    pub price: Option<String>,
    /// Currency code resolved from the price symbol, or the raw suffix when unknown.
    pub currency: Option<String>,
    pub name: Option<String>,
    pub item_type: Option<String>,
    pub icon: Option<String>,
    pub game_icon: Option<String>,
    pub descriptions: Vec<String>,
    pub actions: Vec<ItemAction>,
}

impl ItemResult {
    /// Build from the raw listing page text.
    ///
    /// The price comes from the markup; everything else comes from the
    /// `g_rgAssets` assignment in the page's scripts.
    pub fn from_page(body: &str) -> Self {
        let (price, currency) = {
            let document = Html::parse_document(body);
            match find(
                document.root_element(),
                "span.market_listing_price_with_publisher_fee_only",
            ) {
                Some(el) => {
                    let parts = split_price(&el.text().collect::<String>());
                    let currency = Some(parts.currency()).filter(|c| !c.is_empty());
                    (Some(parts.amount).filter(|a| !a.is_empty()), currency)
                }
                None => {
                    debug!("Market page has no listing price");
                    (None, None)
                }
            }
        };

        let fallback_icon = scan_icon_url(body);

        let asset = embedded_json(body, "g_rgAssets")
            .and_then(|json| serde_json::from_str::<Value>(json).ok())
            .and_then(|data| first_tradable(&data).cloned());

        let Some(asset) = asset else {
            debug!("Market page has no tradable asset data");
            return Self {
                price,
                currency,
                icon: fallback_icon,
                ..Self::default()
            };
        };

        Self {
            price,
            currency,
            name: asset_string(&asset, "name"),
            item_type: asset_string(&asset, "type"),
            icon: asset_string(&asset, "icon_url")
                .map(|hash| format!("{ECONOMY_IMAGE_BASE}{hash}"))
                .or(fallback_icon),
            game_icon: asset_string(&asset, "app_icon"),
            descriptions: descriptions(&asset),
            actions: actions(&asset),
        }
    }

    /// Price amount as a number, reading `,` as the decimal separator.
    pub fn amount(&self) -> Option<f64> {
        parse_amount(self.price.as_deref()?)
    }

    /// Overwrite the price with a converted amount in `currency`.
    pub fn apply_conversion(&mut self, amount: f64, currency: &str) {
        self.price = Some(format!("{amount:.2}"));
        self.currency = Some(currency.to_string());
    }

    /// Price with its currency symbol when one is known, else with the code.
    pub fn price_text(&self) -> Option<String> {
        let price = self.price.as_deref()?;
        let text = match self.currency.as_deref() {
            Some(code) => match code_to_symbol(code) {
                Some(symbol) => format!("{symbol}{price}"),
                None => format!("{price} {code}"),
            },
            None => price.to_string(),
        };
        Some(text)
    }
}

fn asset_string(asset: &Map<String, Value>, key: &str) -> Option<String> {
    asset
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn descriptions(asset: &Map<String, Value>) -> Vec<String> {
    asset
        .get("descriptions")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("value").and_then(Value::as_str))
                .map(|value| html_to_text(value).trim().to_string())
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn actions(asset: &Map<String, Value>) -> Vec<ItemAction> {
    asset
        .get("actions")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    Some(ItemAction {
                        name: entry.get("name")?.as_str()?.to_string(),
                        link: entry.get("link")?.as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Textual fallback: the first `"icon_url":` value anywhere in the page.
fn scan_icon_url(body: &str) -> Option<String> {
    const KEY: &str = "\"icon_url\":";
    let start = body.find(KEY)? + KEY.len();
    let end = body[start..].find(',').map_or(body.len(), |i| start + i);
    let hash: String = body[start..end]
        .chars()
        .filter(|c| *c != ' ' && *c != '"')
        .collect();
    (!hash.is_empty()).then(|| format!("{ECONOMY_IMAGE_BASE}{hash}"))
}

/// Canonical item name from a market search page.
pub fn parse_item_name(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    find_text(document.root_element(), "span.market_listing_item_name")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><head><script type="text/javascript">
		var g_rgAppContextData = {"730":{"appid":730,"name":"Counter-Strike 2"}};
		var g_rgAssets = {"730":{"2":{"111":{"tradable":0,"name":"Locked Case","icon_url":"locked"},"222":{"tradable":1,"name":"Chroma Case","type":"Base Grade Container","icon_url":"abc123","app_icon":"https:\/\/cdn.example\/730.jpg","descriptions":[{"type":"html","value":" "},{"type":"html","value":"Container Series <b>#38<\/b>"}],"actions":[{"link":"steam:\/\/rungame\/730","name":"Inspect in Game..."},{"name":"no link"}]}}}};
		var g_rgListingInfo = [];
	</script></head><body>
	<span class="market_listing_price market_listing_price_with_publisher_fee_only">
		$0.41 USD
	</span>
	</body></html>"#;

    #[test]
    fn listing_with_tradable_asset() {
        let item = ItemResult::from_page(LISTING);

        assert_eq!(item.price.as_deref(), Some("0.41"));
        assert_eq!(item.currency.as_deref(), Some("USD"));
        assert_eq!(item.name.as_deref(), Some("Chroma Case"));
        assert_eq!(item.item_type.as_deref(), Some("Base Grade Container"));
        assert_eq!(
            item.icon.as_deref(),
            Some("https://steamcommunity-a.akamaihd.net/economy/image/abc123")
        );
        assert_eq!(item.game_icon.as_deref(), Some("https://cdn.example/730.jpg"));
        assert_eq!(item.descriptions, vec!["Container Series #38"]);
        assert_eq!(
            item.actions,
            vec![ItemAction {
                name: "Inspect in Game...".into(),
                link: "steam://rungame/730".into(),
            }]
        );
        assert_eq!(item.amount(), Some(0.41));
        assert_eq!(item.price_text().as_deref(), Some("$0.41"));
    }

    #[test]
    fn listing_with_suffix_currency() {
        let page = r#"<span class="market_listing_price_with_publisher_fee_only">10,99€</span>"#;
        let item = ItemResult::from_page(page);
        assert_eq!(item.price.as_deref(), Some("10,99"));
        assert_eq!(item.currency.as_deref(), Some("EUR"));
        assert_eq!(item.amount(), Some(10.99));
    }

    #[test]
    fn listing_without_asset_data_falls_back() {
        let page = r#"<html><body><script>var other = {"icon_url": "fallback", "x": 1};</script></body></html>"#;
        let item = ItemResult::from_page(page);

        assert_eq!(item.price, None);
        assert_eq!(item.currency, None);
        assert_eq!(item.name, None);
        assert_eq!(item.item_type, None);
        assert!(item.descriptions.is_empty());
        assert!(item.actions.is_empty());
        assert_eq!(
            item.icon.as_deref(),
            Some("https://steamcommunity-a.akamaihd.net/economy/image/fallback")
        );
        assert_eq!(item.price_text(), None);
    }

    #[test]
    fn listing_with_malformed_asset_json() {
        let page = "<script>\nvar g_rgAssets = {\"730\": {broken};\n</script>";
        let item = ItemResult::from_page(page);
        assert_eq!(item.name, None);
        assert!(item.actions.is_empty());
    }

    #[test]
    fn conversion_overwrites_price() {
        let mut item = ItemResult::from_page(LISTING);
        item.apply_conversion(0.3, "GBP");
        assert_eq!(item.price.as_deref(), Some("0.30"));
        assert_eq!(item.currency.as_deref(), Some("GBP"));
        assert_eq!(item.price_text().as_deref(), Some("£0.30"));

        item.apply_conversion(5.0, "CAD");
        assert_eq!(item.price_text().as_deref(), Some("5.00 CAD"));
    }

    #[test]
    fn item_name_from_search_page() {
        let body = r#"<html><body><a class="market_listing_row_link">
            <span class="market_listing_item_name" style="color: #D2D2D2;">Chroma Case</span>
        </a></body></html>"#;
        assert_eq!(parse_item_name(body).as_deref(), Some("Chroma Case"));
        assert_eq!(parse_item_name("<html></html>"), None);
    }
}
