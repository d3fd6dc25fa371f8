//! Profiles and libraries from the Steam Web API.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::APP_IMAGE_BASE;
use crate::extract::json::{array_field, string_field, u64_field};
use crate::extract::{attr, find_all, find_attr, text};

use super::{SENTINEL, cap};

/// A player summary (`ISteamUser/GetPlayerSummaries`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    pub steamid: Option<String>,
    pub name: Option<String>,
    pub visibility_state: Option<String>,
    pub profile_state: Option<String>,
    pub last_logoff: Option<String>,
    pub url: Option<String>,
    pub avatar: Option<String>,
    pub avatar_medium: Option<String>,
    pub avatar_full: Option<String>,
    pub persona_state: Option<String>,
    pub real_name: Option<String>,
    pub clan: Option<String>,
    pub created: Option<String>,
    pub country: Option<String>,
}

impl UserResult {
    pub fn from_json(data: &Value) -> Self {
        Self {
            steamid: string_field(data, "steamid"),
            name: string_field(data, "personaname"),
            visibility_state: string_field(data, "communityvisibilitystate"),
            profile_state: string_field(data, "profilestate"),
            last_logoff: string_field(data, "lastlogoff"),
            url: string_field(data, "profileurl"),
            avatar: string_field(data, "avatar"),
            avatar_medium: string_field(data, "avatarmedium"),
            avatar_full: string_field(data, "avatarfull"),
            persona_state: string_field(data, "personastate"),
            real_name: string_field(data, "realname"),
            clan: string_field(data, "primaryclanid"),
            created: string_field(data, "timecreated"),
            country: string_field(data, "loccountrycode"),
        }
    }

    pub fn last_logoff_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.last_logoff.as_deref())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created.as_deref())
    }

    /// Community visibility 3 is a public profile; anything else is restricted.
    pub fn is_public(&self) -> bool {
        self.visibility_state.as_deref() == Some("3")
    }

    pub fn persona_state_text(&self) -> Option<&'static str> {
        let label = match self.persona_state.as_deref()? {
            "0" => "Offline",
            "1" => "Online",
            "2" => "Busy",
            "3" => "Away",
            "4" => "Snooze",
            "5" => "Looking to trade",
            "6" => "Looking to play",
            _ => return None,
        };
        Some(label)
    }
}

fn timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let secs = raw?.parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// One owned game with playtime in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserGame {
    pub id: Option<String>,
    pub name: Option<String>,
    pub playtime_2weeks: Option<u64>,
    /// Total playtime in minutes, 0 when the API leaves it out.
    pub playtime_forever: u64,
    pub icon: Option<String>,
    pub logo: Option<String>,
}

impl UserGame {
    pub fn from_json(data: &Value) -> Self {
        Self {
            id: string_field(data, "appid"),
            name: string_field(data, "name"),
            playtime_2weeks: u64_field(data, "playtime_2weeks"),
            playtime_forever: u64_field(data, "playtime_forever").unwrap_or(0),
            icon: string_field(data, "img_icon_url").filter(|s| !s.is_empty()),
            logo: string_field(data, "img_logo_url").filter(|s| !s.is_empty()),
        }
    }

    pub fn icon_url(&self) -> Option<String> {
        self.image_url(self.icon.as_deref()?)
    }

    pub fn logo_url(&self) -> Option<String> {
        self.image_url(self.logo.as_deref()?)
    }

    fn image_url(&self, hash: &str) -> Option<String> {
        let id = self.id.as_deref()?;
        Some(format!("{APP_IMAGE_BASE}/{id}/{hash}.jpg"))
    }

    /// Minutes as hours with one decimal, truncated (`125` → `"2.0"`).
    pub fn format_playtime(minutes: u64) -> String {
        format!("{:.1}", (minutes / 6) as f64 / 10.0)
    }

    pub fn single_line_format(&self) -> String {
        let forever = Self::format_playtime(self.playtime_forever);
        match self.playtime_2weeks {
            Some(recent) => format!(
                "{forever} hours on record ({} hours in the last 2 weeks)",
                Self::format_playtime(recent)
            ),
            None => format!("{forever} hours on record"),
        }
    }
}

/// Owned games keyed by appid, in API order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLibrary {
    pub count: Option<u64>,
    pub games: IndexMap<String, UserGame>,
}

impl UserLibrary {
    /// Build from the `response` object of `IPlayerService/GetOwnedGames`.
    ///
    /// A repeated appid replaces the earlier entry but keeps its position.
    pub fn from_json(data: &Value) -> Self {
        let mut games = IndexMap::new();

        for game in array_field(data, "games").iter().map(UserGame::from_json) {
            match game.id.clone() {
                Some(id) => {
                    games.insert(id, game);
                }
                None => debug!("Skipping owned game without appid: {:?}", game.name),
            }
        }

        Self {
            count: u64_field(data, "game_count"),
            games,
        }
    }

    pub fn game(&self, appid: &str) -> Option<&UserGame> {
        self.games.get(appid)
    }

    /// Most played games first; 0 returns every game.
    pub fn top_games(&self, limit: usize) -> Vec<&UserGame> {
        let mut games: Vec<&UserGame> = self.games.values().collect();
        games.sort_by(|a, b| b.playtime_forever.cmp(&a.playtime_forever));
        games.truncate(cap(limit));
        games
    }

    /// Most played games as aligned `name   playtime` lines.
    pub fn get_game_list(&self, limit: usize) -> Vec<String> {
        let top = self.top_games(limit);
        let names: Vec<&str> = top
            .iter()
            .map(|game| game.name.as_deref().unwrap_or(SENTINEL))
            .collect();
        let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0) + 3;

        top.iter()
            .zip(names)
            .map(|(game, name)| format!("{name:<width$}{}", game.single_line_format()))
            .collect()
    }
}

/// A community user search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearchHit {
    pub profile_url: String,
    pub name: String,
}

/// Parse the `html` payload of `SearchCommunityAjax`.
pub fn parse_user_search(html: &str, limit: usize) -> Vec<UserSearchHit> {
    let fragment = Html::parse_fragment(html);

    find_all(fragment.root_element(), "a.searchPersonaName")
        .into_iter()
        .filter_map(|link| {
            Some(UserSearchHit {
                profile_url: attr(link, "href")?,
                name: text(link),
            })
        })
        .take(cap(limit))
        .collect()
}

/// Screenshot image URLs from a profile's screenshot wall.
pub fn parse_screenshots(body: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(body);

    find_all(document.root_element(), "a.profile_media_item")
        .into_iter()
        .filter_map(|item| find_attr(item, "img", "src"))
        .take(cap(limit))
        .collect()
}
