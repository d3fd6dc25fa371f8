use serde_json::Value;
use tracing::{debug, info};

use crate::config::{API_BASE, COMMUNITY_BASE};
use crate::error::Result;
use crate::models::user::{parse_screenshots, parse_user_search};
use crate::models::wishlist::parse_wishlist;
use crate::models::{
    GlobalAchievements, UserAchievements, UserLibrary, UserResult, UserSearchHit, UserWishlist,
};

use super::{SteamClient, is_numeric};

impl SteamClient {
    /// Turn a steamid, vanity name or display name into a steamid.
    ///
    /// Numeric input is returned as-is. With `specific`, only the vanity URL
    /// API is asked. Otherwise the first community search hit wins, and the
    /// vanity URL API is the fallback when the search finds nobody.
    pub async fn resolve_user_id(&self, input: &str, specific: bool) -> Result<Option<String>> {
        let input = input.trim();
        if is_numeric(input) {
            return Ok(Some(input.to_string()));
        }
        if specific {
            return self.get_user_id(input).await;
        }
        if let Some(id) = self.cached_search(input) {
            return Ok(Some(id));
        }

        match self.first_user_hit(input).await? {
            Some(hit) => self.id_from_hit(input, &hit).await,
            None => {
                debug!("User search for {:?} found nobody, trying vanity URL", input);
                self.get_user_id(input).await
            }
        }
    }

    /// Resolve a vanity URL name through the Web API.
    pub async fn get_user_id(&self, vanity: &str) -> Result<Option<String>> {
        let key = self.config.require_key()?;
        if let Some(id) = self.cached_user(vanity) {
            return Ok(Some(id));
        }

        let url = format!(
            "{API_BASE}/ISteamUser/ResolveVanityURL/v0001/?key={key}&vanityurl={}",
            urlencoding::encode(vanity)
        );
        let data = self.fetch_json(&url).await?;

        let response = &data["response"];
        let id = match response["success"].as_u64() {
            Some(1) => response["steamid"].as_str().map(str::to_string),
            _ => None,
        };

        match &id {
            Some(id) => self.remember_user(vanity, id),
            None => debug!("Vanity URL {:?} did not resolve", vanity),
        }
        Ok(id)
    }

    /// Steamid of the first community search hit for `name`.
    pub async fn search_for_userid(&self, name: &str) -> Result<Option<String>> {
        if let Some(id) = self.cached_search(name) {
            return Ok(Some(id));
        }

        match self.first_user_hit(name).await? {
            Some(hit) => self.id_from_hit(name, &hit).await,
            None => Ok(None),
        }
    }

    /// Community user search. Needs a session id, sent as cookie and parameter.
    pub async fn search_for_users(&self, name: &str, limit: usize) -> Result<Vec<UserSearchHit>> {
        let session = self.config.require_session()?;

        let url = format!(
            "{COMMUNITY_BASE}/search/SearchCommunityAjax?text={}&filter=users&sessionid={session}&page=1",
            urlencoding::encode(name)
        );
        let cookie = format!("sessionid={session}");
        let data = self
            .fetcher
            .get_json(&url, &[("Cookie", cookie.as_str())])
            .await?;

        let hits = parse_user_search(data["html"].as_str().unwrap_or_default(), limit);
        info!("Found {} users matching {:?}", hits.len(), name);
        Ok(hits)
    }

    /// Steamid from a community profile URL.
    ///
    /// `/profiles/<steamid>` yields the id directly, `/id/<vanity>` goes
    /// through [`get_user_id`](Self::get_user_id); anything else is `None`.
    pub async fn extract_id_from_url(&self, url: &str) -> Result<Option<String>> {
        let path = url
            .trim()
            .strip_prefix("https://")
            .or_else(|| url.trim().strip_prefix("http://"))
            .and_then(|rest| rest.strip_prefix("steamcommunity.com/"));
        let Some(path) = path else {
            debug!("Not a community profile URL: {}", url);
            return Ok(None);
        };

        if let Some(id) = path.strip_prefix("profiles/") {
            let id = id.trim_end_matches('/');
            return Ok(Some(id.to_string()).filter(|id| !id.is_empty()));
        }
        if let Some(vanity) = path.strip_prefix("id/") {
            let vanity = vanity.trim_end_matches('/');
            if !vanity.is_empty() {
                return self.get_user_id(vanity).await;
            }
        }

        Ok(None)
    }

    /// Profile summary. The API key is checked before anything is requested.
    pub async fn get_user(&self, user: &str) -> Result<Option<UserResult>> {
        let key = self.config.require_key()?;
        let Some(steamid) = self.resolve_user_id(user, false).await? else {
            return Ok(None);
        };

        let url = format!(
            "{API_BASE}/ISteamUser/GetPlayerSummaries/v0002/?key={key}&steamids={steamid}"
        );
        let data = self.fetch_json(&url).await?;

        Ok(data["response"]["players"]
            .get(0)
            .map(UserResult::from_json))
    }

    /// Owned games, free-to-play titles included.
    pub async fn get_user_library(&self, user: &str) -> Result<Option<UserLibrary>> {
        let key = self.config.require_key()?;
        let Some(steamid) = self.resolve_user_id(user, false).await? else {
            return Ok(None);
        };

        let url = format!(
            "{API_BASE}/IPlayerService/GetOwnedGames/v0001/?key={key}&steamid={steamid}&format=json&include_appinfo=1&include_played_free_games=1"
        );
        let data = self.fetch_json(&url).await?;

        let library = data.get("response").map(UserLibrary::from_json);
        if let Some(library) = &library {
            info!("Library of {} holds {} games", steamid, library.games.len());
        }
        Ok(library)
    }

    /// A user's achievements in one game (appid or name).
    pub async fn get_user_achievements(
        &self,
        user: &str,
        game: &str,
    ) -> Result<Option<UserAchievements>> {
        let key = self.config.require_key()?;
        let Some(steamid) = self.resolve_user_id(user, false).await? else {
            return Ok(None);
        };
        let Some(app) = self.resolve_app(game).await? else {
            return Ok(None);
        };

        let url = format!(
            "{API_BASE}/ISteamUserStats/GetPlayerAchievements/v0001/?key={key}&steamid={steamid}&appid={}&l=english",
            app.id
        );
        let data = self.fetch_json(&url).await?;

        let stats = &data["playerstats"];
        if stats.is_null() || stats["success"] == Value::Bool(false) {
            debug!("No achievement stats for {} in {}", steamid, app.id);
            return Ok(None);
        }
        Ok(Some(UserAchievements::from_json(&app.id, stats)))
    }

    /// Global unlock percentages for a game (appid or name).
    pub async fn get_global_achievements(&self, game: &str) -> Result<Option<GlobalAchievements>> {
        let Some(app) = self.resolve_app(game).await? else {
            return Ok(None);
        };

        let url = format!(
            "{API_BASE}/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/?gameid={}",
            app.id
        );
        let data = self.fetch_json(&url).await?;

        let Some(percentages) = data.get("achievementpercentages") else {
            debug!("No global achievements for {}", app.id);
            return Ok(None);
        };
        Ok(Some(GlobalAchievements::from_json(
            &app.id,
            app.title.clone(),
            percentages,
        )))
    }

    pub async fn get_user_wishlist(
        &self,
        user: &str,
        limit: usize,
    ) -> Result<Option<UserWishlist>> {
        let Some(steamid) = self.resolve_user_id(user, false).await? else {
            return Ok(None);
        };

        let url = format!("{COMMUNITY_BASE}/profiles/{steamid}/wishlist/");
        let body = self.fetch_text(&url).await?;

        let wishlist = parse_wishlist(&steamid, &body, limit);
        info!("Wishlist of {} holds {} games", steamid, wishlist.len());
        Ok(Some(wishlist))
    }

    /// Most recent public screenshot URLs.
    ///
    /// A steamid goes straight to its profile; a name uses the first
    /// community search hit's profile. `None` when the search finds nobody.
    pub async fn get_screenshots(&self, user: &str, limit: usize) -> Result<Option<Vec<String>>> {
        let user = user.trim();
        let profile = if is_numeric(user) {
            format!("{COMMUNITY_BASE}/profiles/{user}")
        } else {
            match self.first_user_hit(user).await? {
                Some(hit) => hit.profile_url,
                None => return Ok(None),
            }
        };

        let url = format!("{}/screenshots/", profile.trim_end_matches('/'));
        let body = self.fetch_text(&url).await?;

        let screenshots = parse_screenshots(&body, limit);
        info!("Found {} screenshots for {:?}", screenshots.len(), user);
        Ok(Some(screenshots))
    }

    async fn first_user_hit(&self, name: &str) -> Result<Option<UserSearchHit>> {
        Ok(self.search_for_users(name, 1).await?.into_iter().next())
    }

    async fn id_from_hit(&self, name: &str, hit: &UserSearchHit) -> Result<Option<String>> {
        let id = self.extract_id_from_url(&hit.profile_url).await?;
        if let Some(id) = &id
            && self.caching()
        {
            self.cache.insert_search_hit(name, id);
        }
        Ok(id)
    }

    fn cached_user(&self, name: &str) -> Option<String> {
        if !self.caching() {
            return None;
        }
        let id = self.cache.user(name);
        if id.is_some() {
            debug!("Cache hit for vanity name {:?}", name);
        }
        id
    }

    fn cached_search(&self, term: &str) -> Option<String> {
        if !self.caching() {
            return None;
        }
        let id = self.cache.search_hit(term);
        if id.is_some() {
            debug!("Cache hit for user search {:?}", term);
        }
        id
    }

    fn remember_user(&self, name: &str, steamid: &str) {
        if self.caching() {
            self.cache.insert_user(name, steamid);
        }
    }
}
