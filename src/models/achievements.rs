//! Per-user and global achievement lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::json::{array_field, bool_field, f64_field, string_field, u64_field};

/// Insert a space before every uppercase letter and drop the leading space.
///
/// `"killTheBoss"` becomes `"kill The Boss"`; this is purely lexical.
pub fn display_name(apiname: &str) -> String {
    let mut spaced = String::with_capacity(apiname.len() + 8);
    for c in apiname.chars() {
        if c.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    spaced.strip_prefix(' ').map(str::to_string).unwrap_or(spaced)
}

/// Lookup key: lowercase with spaces and hyphens removed.
pub fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub apiname: String,
    pub display_name: String,
    pub achieved: bool,
    pub unlock_time: Option<u64>,
    pub description: Option<String>,
}

impl UserAchievement {
    pub fn from_json(data: &Value) -> Self {
        let apiname = string_field(data, "apiname").unwrap_or_default();
        Self {
            display_name: display_name(&apiname),
            achieved: bool_field(data, "achieved").unwrap_or(false),
            unlock_time: u64_field(data, "unlocktime").filter(|t| *t > 0),
            description: string_field(data, "description").filter(|s| !s.is_empty()),
            apiname,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAchievement {
    pub apiname: String,
    pub display_name: String,
    /// Share of players who unlocked it, 0.0 when unknown.
    pub percent: f64,
}

impl GlobalAchievement {
    pub fn from_json(data: &Value) -> Self {
        let apiname = string_field(data, "name").unwrap_or_default();
        Self {
            display_name: display_name(&apiname),
            percent: f64_field(data, "percent").unwrap_or(0.0),
            apiname,
        }
    }
}

/// A user's achievements for one game, sorted by apiname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievements {
    pub gameid: String,
    pub gamename: Option<String>,
    pub achievements: Vec<UserAchievement>,
}

impl UserAchievements {
    /// Build from the `playerstats` object of `GetPlayerAchievements`.
    pub fn from_json(gameid: &str, data: &Value) -> Self {
        let mut achievements: Vec<UserAchievement> = array_field(data, "achievements")
            .iter()
            .map(UserAchievement::from_json)
            .collect();
        achievements.sort_by(|a, b| a.apiname.cmp(&b.apiname));

        Self {
            gameid: gameid.to_string(),
            gamename: string_field(data, "gameName").filter(|s| !s.is_empty()),
            achievements,
        }
    }

    /// Case-insensitive lookup ignoring spaces and hyphens, so the display
    /// name finds its achievement too.
    pub fn find(&self, name: &str) -> Option<&UserAchievement> {
        let key = lookup_key(name);
        self.achievements
            .iter()
            .find(|achievement| lookup_key(&achievement.apiname) == key)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &UserAchievement> {
        self.achievements.iter().filter(|achievement| achievement.achieved)
    }

    /// Unlocked share in percent; 0.0 for a game without achievements.
    pub fn completion(&self) -> f64 {
        if self.achievements.is_empty() {
            return 0.0;
        }
        self.unlocked().count() as f64 * 100.0 / self.achievements.len() as f64
    }
}

/// Global unlock percentages for one game, sorted by apiname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAchievements {
    pub gameid: String,
    pub gamename: Option<String>,
    pub achievements: Vec<GlobalAchievement>,
}

impl GlobalAchievements {
    /// Build from the `achievementpercentages` object.
    pub fn from_json(gameid: &str, gamename: Option<String>, data: &Value) -> Self {
        let mut achievements: Vec<GlobalAchievement> = array_field(data, "achievements")
            .iter()
            .map(GlobalAchievement::from_json)
            .collect();
        achievements.sort_by(|a, b| a.apiname.cmp(&b.apiname));

        Self {
            gameid: gameid.to_string(),
            gamename,
            achievements,
        }
    }

    pub fn find(&self, name: &str) -> Option<&GlobalAchievement> {
        let key = lookup_key(name);
        self.achievements
            .iter()
            .find(|achievement| lookup_key(&achievement.apiname) == key)
    }

    pub fn rarest(&self) -> Option<&GlobalAchievement> {
        self.achievements
            .iter()
            .min_by(|a, b| a.percent.total_cmp(&b.percent))
    }
}
