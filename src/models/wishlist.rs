//! Community wishlist pages.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::extract::{
    attr, discount_block, find_all, find_attr, find_text, link_id, normalize_price,
};
use crate::traits::Priced;

use super::cap;

/// Percentage and final price of a discounted wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWishlistDiscount {
    pub percent: String,
    pub price: String,
}

/// One row of a wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWishlistGame {
    pub id: Option<String>,
    pub name: Option<String>,
    pub link: Option<String>,
    /// Full price (the original price when discounted).
    pub price: Option<String>,
    pub discount: Option<UserWishlistDiscount>,
    pub added_on: Option<String>,
}

impl UserWishlistGame {
    /// Build from a `div.wishlistRow` element.
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let link = find_attr(el, r#"a[href*="/app/"]"#, "href");
        let id = attr(el, "id")
            .and_then(|id| id.strip_prefix("game_").map(str::to_string))
            .filter(|id| !id.is_empty())
            .or_else(|| link.as_deref().and_then(link_id));

        let block = discount_block(el);
        let discount = match (block.discount, block.discount_price) {
            (Some(percent), Some(price)) => Some(UserWishlistDiscount { percent, price }),
            _ => None,
        };
        let price = block
            .price
            .or_else(|| find_text(el, "div.price").map(normalize_price));

        Self {
            id,
            name: find_text(el, "h4"),
            link,
            price,
            discount,
            added_on: find_text(el, "div.wishlist_added_on"),
        }
    }
}

impl Priced for UserWishlistGame {
    fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    fn discount(&self) -> Option<&str> {
        self.discount.as_ref().map(|d| d.percent.as_str())
    }

    fn discount_price(&self) -> Option<&str> {
        self.discount.as_ref().map(|d| d.price.as_str())
    }
}

/// A user's wishlist in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWishlist {
    pub steamid: String,
    pub games: Vec<UserWishlistGame>,
}

impl UserWishlist {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Entries currently on sale.
    pub fn discounted(&self) -> impl Iterator<Item = &UserWishlistGame> {
        self.games.iter().filter(|game| game.discount.is_some())
    }
}

pub fn parse_wishlist(steamid: &str, body: &str, limit: usize) -> UserWishlist {
    let document = Html::parse_document(body);
    let games = find_all(document.root_element(), "div.wishlistRow")
        .into_iter()
        .take(cap(limit))
        .map(UserWishlistGame::from_element)
        .collect();

    UserWishlist {
        steamid: steamid.to_string(),
        games,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><div id="wishlist_items">
        <div class="wishlistRow" id="game_620">
          <div class="gameLogo"><a href="https://store.steampowered.com/app/620/"><img src="620.jpg"></a></div>
          <div class="wishlistRowItem">
            <h4 class="ellipsis">Portal 2</h4>
            <div class="gameListPriceData">
              <div class="discount_block discount_block_inline">
                <div class="discount_pct">-80%</div>
                <div class="discount_prices">
                  <div class="discount_original_price">$9.99</div>
                  <div class="discount_final_price">$1.99</div>
                </div>
              </div>
            </div>
            <div class="wishlist_added_on">Added on 1 Jan, 2017</div>
          </div>
        </div>
        <div class="wishlistRow" id="game_">
          <div class="gameLogo"><a href="https://store.steampowered.com/app/400/Portal/"></a></div>
          <h4 class="ellipsis">Portal</h4>
          <div class="gameListPriceData"><div class="price">$9.99</div></div>
        </div>
        <div class="wishlistRow">
          <div class="discount_block"><div class="discount_pct">-50%</div></div>
        </div>
    </div></body></html>"#;

    #[test]
    fn discounted_row() {
        let wishlist = parse_wishlist("76561197960287930", PAGE, 0);
        assert_eq!(wishlist.len(), 3);

        let portal2 = &wishlist.games[0];
        assert_eq!(portal2.id.as_deref(), Some("620"));
        assert_eq!(portal2.name.as_deref(), Some("Portal 2"));
        assert_eq!(portal2.link.as_deref(), Some("https://store.steampowered.com/app/620/"));
        assert_eq!(portal2.price.as_deref(), Some("$9.99"));
        assert_eq!(
            portal2.discount,
            Some(UserWishlistDiscount {
                percent: "-80%".into(),
                price: "$1.99".into()
            })
        );
        assert_eq!(portal2.added_on.as_deref(), Some("Added on 1 Jan, 2017"));
        assert_eq!(portal2.price_text(), "$1.99 (-80%)");
    }

    #[test]
    fn plain_row_reads_id_from_link() {
        let wishlist = parse_wishlist("1", PAGE, 0);
        let portal = &wishlist.games[1];
        assert_eq!(portal.id.as_deref(), Some("400"));
        assert_eq!(portal.price.as_deref(), Some("$9.99"));
        assert_eq!(portal.discount, None);
        assert_eq!(portal.added_on, None);
    }

    #[test]
    fn discount_without_final_price_is_dropped() {
        let wishlist = parse_wishlist("1", PAGE, 0);
        let bare = &wishlist.games[2];
        assert_eq!(bare.id, None);
        assert_eq!(bare.name, None);
        assert_eq!(bare.discount, None);
        assert_eq!(bare.price, None);
        assert_eq!(wishlist.discounted().count(), 1);
    }

    #[test]
    fn limit_applies() {
        assert_eq!(parse_wishlist("1", PAGE, 2).len(), 2);
        assert!(parse_wishlist("1", "<html></html>", 0).is_empty());
    }
}
