//! Records built from store pages, community pages and Web API responses.
//!
//! Each record is constructed once from its source fragment and never fails:
//! any field that cannot be found is `None` (or an empty list, zero, `false`).

/// Implement [`Priced`](crate::traits::Priced) for a record with
/// `price`, `discount` and `discount_price` fields.
macro_rules! impl_priced {
    ($($record:ty),+ $(,)?) => {
        $(
            impl crate::traits::Priced for $record {
                fn price(&self) -> Option<&str> {
                    self.price.as_deref()
                }

                fn discount(&self) -> Option<&str> {
                    self.discount.as_deref()
                }

                fn discount_price(&self) -> Option<&str> {
                    self.discount_price.as_deref()
                }
            }
        )+
    };
}

pub mod achievements;
pub mod market;
pub mod stats;
pub mod steam_game;
pub mod store;
pub mod user;
pub mod wishlist;

pub use achievements::{GlobalAchievement, GlobalAchievements, UserAchievement, UserAchievements};
pub use market::{ItemAction, ItemResult};
pub use stats::{PlayerCount, UserStats};
pub use steam_game::{FeaturedCategory, Platform, SteamGame};
pub use store::{
    AppRef, CategoryResult, CategoryTab, GamePageResult, NewCategoryResult, SearchResult,
    StoreTab, TopResult,
};
pub use user::{UserGame, UserLibrary, UserResult, UserSearchHit};
pub use wishlist::{UserWishlist, UserWishlistDiscount, UserWishlistGame};

/// Placeholder shown for fields that could not be extracted.
pub const SENTINEL: &str = "???";

/// The field's value, or [`SENTINEL`] when absent.
pub fn or_sentinel(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(SENTINEL)
}

/// Maximum number of records to keep; 0 means unlimited.
pub(crate) fn cap(limit: usize) -> usize {
    if limit == 0 { usize::MAX } else { limit }
}
