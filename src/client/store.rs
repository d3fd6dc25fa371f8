use tracing::{debug, info};

use crate::config::{AGE_GATE_COOKIE, STORE_BASE};
use crate::error::Result;
use crate::models::stats::{parse_player_counts, parse_user_stats};
use crate::models::steam_game::parse_featured_list;
use crate::models::store::{
    parse_category, parse_category_capsules, parse_game_page, parse_search_page,
    parse_storefront_tab,
};
use crate::models::{
    CategoryResult, CategoryTab, FeaturedCategory, GamePageResult, NewCategoryResult,
    Platform, PlayerCount, SearchResult, SteamGame, StoreTab, TopResult, UserStats,
};

use super::SteamClient;

impl SteamClient {
    /// Search the store for `term`, in store ranking order.
    pub async fn search_games(&self, term: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let url = format!("{STORE_BASE}/search/?term={}", urlencoding::encode(term));
        let body = self.fetch_text(&url).await?;

        let results = parse_search_page(&body, limit);
        info!("Found {} store results for {:?}", results.len(), term);
        Ok(results)
    }

    /// One of the front page's tabbed lists.
    pub async fn storefront_tab(&self, tab: StoreTab, limit: usize) -> Result<Vec<TopResult>> {
        let body = self.fetch_text(&format!("{STORE_BASE}/")).await?;

        let results = parse_storefront_tab(&body, tab, limit);
        info!("Found {} results in {:?}", results.len(), tab);
        Ok(results)
    }

    pub async fn top_sellers(&self, limit: usize) -> Result<Vec<TopResult>> {
        self.storefront_tab(StoreTab::TopSellers, limit).await
    }

    pub async fn new_releases(&self, limit: usize) -> Result<Vec<TopResult>> {
        self.storefront_tab(StoreTab::NewReleases, limit).await
    }

    pub async fn upcoming(&self, limit: usize) -> Result<Vec<TopResult>> {
        self.storefront_tab(StoreTab::Upcoming, limit).await
    }

    pub async fn specials(&self, limit: usize) -> Result<Vec<TopResult>> {
        self.storefront_tab(StoreTab::Specials, limit).await
    }

    /// A tab of a tag page, e.g. `category("Roguelike", CategoryTab::TopSellers, 10)`.
    pub async fn category(
        &self,
        tag: &str,
        tab: CategoryTab,
        limit: usize,
    ) -> Result<Vec<CategoryResult>> {
        let body = self.fetch_text(&tag_url(tag)).await?;

        let results = parse_category(&body, tab, limit);
        info!("Found {} {:?} results for tag {:?}", results.len(), tab, tag);
        Ok(results)
    }

    /// The capsule carousel at the top of a tag page.
    pub async fn category_capsules(
        &self,
        tag: &str,
        limit: usize,
    ) -> Result<Vec<NewCategoryResult>> {
        let body = self.fetch_text(&tag_url(tag)).await?;

        let results = parse_category_capsules(&body, limit);
        info!("Found {} capsules for tag {:?}", results.len(), tag);
        Ok(results)
    }

    /// An app's store page, by appid or by name.
    ///
    /// Mature titles are fetched past the age gate.
    pub async fn get_game_page(&self, app: &str) -> Result<Option<GamePageResult>> {
        let Some(app) = self.resolve_app(app).await? else {
            debug!("No app found for game page lookup");
            return Ok(None);
        };

        let url = format!("{STORE_BASE}/app/{}/", app.id);
        let body = self
            .fetcher
            .get_text(&url, &[("Cookie", AGE_GATE_COOKIE)])
            .await?;

        Ok(Some(parse_game_page(&body)))
    }

    /// Featured games for one platform from the storefront API.
    pub async fn featured_games(&self, platform: Platform, limit: usize) -> Result<Vec<SteamGame>> {
        let data = self.fetch_json(&format!("{STORE_BASE}/api/featured/")).await?;

        let games = parse_featured_list(&data, platform.featured_key(), limit);
        info!("Found {} featured games for {:?}", games.len(), platform);
        Ok(games)
    }

    /// One section of the storefront API's featured categories.
    pub async fn featured_category(
        &self,
        category: FeaturedCategory,
        limit: usize,
    ) -> Result<Vec<SteamGame>> {
        let data = self
            .fetch_json(&format!("{STORE_BASE}/api/featuredcategories/"))
            .await?;

        let games = parse_featured_list(&data, category.key(), limit);
        info!("Found {} games in {:?}", games.len(), category);
        Ok(games)
    }

    /// Most played games right now, busiest first.
    pub async fn top_game_playercounts(&self, limit: usize) -> Result<Vec<PlayerCount>> {
        let body = self.fetch_text(&format!("{STORE_BASE}/stats/")).await?;

        let counts = parse_player_counts(&body, limit);
        info!("Found {} player count rows", counts.len());
        Ok(counts)
    }

    /// Online users over the last 48 hours; `None` when the series is empty.
    pub async fn steam_user_data(&self) -> Result<Option<UserStats>> {
        let data = self
            .fetch_json(&format!("{STORE_BASE}/stats/userdata.json"))
            .await?;

        let stats = parse_user_stats(&data);
        if stats.is_none() {
            debug!("User data series was empty");
        }
        Ok(stats)
    }
}

fn tag_url(tag: &str) -> String {
    format!("{STORE_BASE}/tags/en/{}/", urlencoding::encode(tag))
}
