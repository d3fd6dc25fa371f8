//! Process-lifetime memo tables for identifier resolution.
//!
//! Entries are only ever inserted; nothing expires. The client decides whether
//! to consult the cache at all, so a disabled cache simply never sees a call.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::AppRef;

/// Vanity name → steamid, search term → steamid, query → app, and
/// `(appid, item query)` → market item name.
///
/// Vanity lookups and community search hits live in separate tables: the
/// same string can name one user by vanity URL and another by display name.
#[derive(Debug, Default)]
pub struct SteamCache {
    users: Mutex<HashMap<String, String>>,
    searches: Mutex<HashMap<String, String>>,
    apps: Mutex<HashMap<String, AppRef>>,
    items: Mutex<HashMap<(String, String), String>>,
}

// A poisoned map is still a valid map; entries are plain values.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn get<K, Q, V>(map: &Mutex<HashMap<K, V>>, key: &Q) -> Option<V>
where
    K: Eq + Hash + std::borrow::Borrow<Q>,
    Q: Eq + Hash + ?Sized,
    V: Clone,
{
    lock(map).get(key).cloned()
}

impl SteamCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, name: &str) -> Option<String> {
        get(&self.users, name)
    }

    pub fn insert_user(&self, name: &str, steamid: &str) {
        lock(&self.users).insert(name.to_string(), steamid.to_string());
    }

    pub fn search_hit(&self, term: &str) -> Option<String> {
        get(&self.searches, term)
    }

    pub fn insert_search_hit(&self, term: &str, steamid: &str) {
        lock(&self.searches).insert(term.to_string(), steamid.to_string());
    }

    pub fn app(&self, query: &str) -> Option<AppRef> {
        get(&self.apps, query)
    }

    pub fn insert_app(&self, query: &str, app: AppRef) {
        lock(&self.apps).insert(query.to_string(), app);
    }

    pub fn item_name(&self, appid: &str, query: &str) -> Option<String> {
        lock(&self.items)
            .get(&(appid.to_string(), query.to_string()))
            .cloned()
    }

    pub fn insert_item_name(&self, appid: &str, query: &str, name: &str) {
        lock(&self.items).insert((appid.to_string(), query.to_string()), name.to_string());
    }

    /// Entries across all tables.
    pub fn count(&self) -> usize {
        lock(&self.users).len()
            + lock(&self.searches).len()
            + lock(&self.apps).len()
            + lock(&self.items).len()
    }

    /// Empty every table, returning how many entries were dropped.
    pub fn clear(&self) -> usize {
        let mut cleared = 0;
        {
            let mut users = lock(&self.users);
            cleared += users.len();
            users.clear();
        }
        {
            let mut searches = lock(&self.searches);
            cleared += searches.len();
            searches.clear();
        }
        {
            let mut apps = lock(&self.apps);
            cleared += apps.len();
            apps.clear();
        }
        {
            let mut items = lock(&self.items);
            cleared += items.len();
            items.clear();
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_independent() {
        let cache = SteamCache::new();
        cache.insert_user("gaben", "76561197960287930");
        cache.insert_app(
            "portal",
            AppRef {
                id: "400".into(),
                title: Some("Portal".into()),
            },
        );
        cache.insert_item_name("730", "chroma", "Chroma Case");

        assert_eq!(cache.user("gaben").as_deref(), Some("76561197960287930"));
        assert_eq!(cache.user("portal"), None);
        assert_eq!(cache.app("portal").map(|app| app.id), Some("400".to_string()));
        assert_eq!(cache.item_name("730", "chroma").as_deref(), Some("Chroma Case"));
        assert_eq!(cache.item_name("440", "chroma"), None);
        assert_eq!(cache.count(), 3);
    }

    #[test]
    fn insert_overwrites_and_clear_reports_count() {
        let cache = SteamCache::new();
        cache.insert_user("a", "1");
        cache.insert_user("a", "2");
        cache.insert_user("b", "3");
        assert_eq!(cache.user("a").as_deref(), Some("2"));
        assert_eq!(cache.count(), 2);

        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.count(), 0);
        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn search_hits_do_not_answer_vanity_lookups() {
        let cache = SteamCache::new();
        cache.insert_search_hit("bob", "111");
        assert_eq!(cache.user("bob"), None);
        assert_eq!(cache.search_hit("bob").as_deref(), Some("111"));

        cache.insert_user("bob", "222");
        assert_eq!(cache.user("bob").as_deref(), Some("222"));
        assert_eq!(cache.search_hit("bob").as_deref(), Some("111"));
        assert_eq!(cache.count(), 2);
        assert_eq!(cache.clear(), 2);
    }
}
