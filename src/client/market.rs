use tracing::{debug, info};

use crate::config::COMMUNITY_BASE;
use crate::currency::{normalize_currency, try_convert};
use crate::error::Result;
use crate::models::market::parse_item_name;
use crate::models::{AppRef, ItemResult};

use super::SteamClient;

impl SteamClient {
    /// The store's best match for `name`.
    pub async fn get_app(&self, name: &str) -> Result<Option<AppRef>> {
        if self.caching()
            && let Some(app) = self.cache.app(name)
        {
            debug!("Cache hit for app {:?}", name);
            return Ok(Some(app));
        }

        let Some(hit) = self.search_games(name, 1).await?.into_iter().next() else {
            debug!("No app matches {:?}", name);
            return Ok(None);
        };
        let Some(id) = hit.id else {
            debug!("Top store hit for {:?} has no appid", name);
            return Ok(None);
        };

        let app = AppRef {
            id,
            title: hit.title,
        };
        if self.caching() {
            self.cache.insert_app(name, app.clone());
        }
        Ok(Some(app))
    }

    /// The market's canonical name for an item query, scoped to `appid`
    /// unless it is empty.
    pub async fn get_item_name(&self, name: &str, appid: &str) -> Result<Option<String>> {
        if self.caching()
            && let Some(item) = self.cache.item_name(appid, name)
        {
            debug!("Cache hit for item {:?} in {}", name, appid);
            return Ok(Some(item));
        }

        let query = urlencoding::encode(name);
        let url = if appid.is_empty() {
            format!("{COMMUNITY_BASE}/market/search?q={query}")
        } else {
            format!("{COMMUNITY_BASE}/market/search?appid={appid}&q={query}")
        };
        let body = self.fetch_text(&url).await?;

        let item = parse_item_name(&body);
        match &item {
            Some(item) if self.caching() => self.cache.insert_item_name(appid, name, item),
            Some(_) => {}
            None => debug!("No market item matches {:?}", name),
        }
        Ok(item)
    }

    /// A market listing, with its price converted to the configured target
    /// currency when possible.
    ///
    /// `app` is an appid or a game name; `item_name` is a free-text query.
    pub async fn get_item(&self, app: &str, item_name: &str) -> Result<Option<ItemResult>> {
        let Some(app) = self.resolve_app(app).await? else {
            return Ok(None);
        };
        let Some(name) = self.get_item_name(item_name, &app.id).await? else {
            return Ok(None);
        };

        let url = format!(
            "{COMMUNITY_BASE}/market/listings/{}/{}",
            app.id,
            urlencoding::encode(&name)
        );
        let body = self.fetch_text(&url).await?;

        let mut item = ItemResult::from_page(&body);
        self.convert_item_price(&mut item).await;
        info!("Fetched market item {:?} for app {}", name, app.id);
        Ok(Some(item))
    }

    /// Convert between currencies, given as codes (`"USD"`) or symbols (`"$"`).
    ///
    /// Best effort: any failure returns `amount` unchanged.
    pub async fn exchange(&self, amount: f64, from: &str, to: &str) -> f64 {
        let from = normalize_currency("", from.trim());
        let to = normalize_currency("", to.trim());

        match try_convert(self.rates.as_ref(), amount, &from, &to).await {
            Ok(converted) => converted,
            Err(e) => {
                self.absorbed(&format!("Failed to convert {from} to {to}: {e}"));
                amount
            }
        }
    }

    async fn convert_item_price(&self, item: &mut ItemResult) {
        let target = self.config.target_currency.as_str();
        let (Some(amount), Some(currency)) = (item.amount(), item.currency.clone()) else {
            self.absorbed("Market item has no readable price to convert");
            return;
        };

        match try_convert(self.rates.as_ref(), amount, &currency, target).await {
            Ok(converted) => item.apply_conversion(converted, target),
            Err(e) => self.absorbed(&format!("Failed to convert currency ({currency}): {e}")),
        }
    }
}
