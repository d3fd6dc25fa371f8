//! Store page records: search rows, front-page tabs, tag-page tiles and app pages.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::extract::{
    PriceBlock, attr, discount_block, find, find_all, find_attr, find_text, link_id,
    normalize_price, squash, text,
};

use super::cap;

fn squashed(el: ElementRef<'_>) -> Option<String> {
    Some(squash(&el.text().collect::<String>())).filter(|s| !s.is_empty())
}

/// One row of a store search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub released: Option<String>,
    pub review: Option<String>,
    pub review_long: Option<String>,
    pub discount: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
}

impl SearchResult {
    /// Build from an `a.search_result_row` element.
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let link = attr(el, "href");
        let id = link.as_deref().and_then(link_id);

        let (review, review_long) =
            match find_attr(el, "span.search_review_summary", "data-store-tooltip") {
                Some(tooltip) => {
                    let mut parts = tooltip
                        .split("<br>")
                        .map(|part| Some(part.trim().to_string()).filter(|part| !part.is_empty()));
                    (parts.next().flatten(), parts.next().flatten())
                }
                None => (None, None),
            };

        let discount = find(el, "div.search_discount span").and_then(squashed);

        // The two layouts keep their prices in different places.
        let (price, discount_price) = if discount.is_none() {
            (find(el, "div.search_price").and_then(squashed), None)
        } else if let Some(block) = find(el, "div.search_price.discounted") {
            let price = find(block, "span").and_then(squashed);
            let whole = squashed(block).unwrap_or_default();
            let final_price = match &price {
                Some(original) => whole.replace(original.as_str(), ""),
                None => whole,
            };
            (price, Some(final_price).filter(|s| !s.is_empty()))
        } else {
            (None, None)
        };

        Self {
            id,
            title: find_text(el, "span.title"),
            link,
            image: find_attr(el, "img", "src"),
            released: find_text(el, "div.search_released"),
            review,
            review_long,
            discount,
            price: price.map(normalize_price),
            discount_price,
        }
    }
}

/// Rows of a search results page, in page order.
pub fn parse_search_page(body: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(body);
    let Some(container) = find(document.root_element(), "#search_result_container") else {
        return Vec::new();
    };

    find_all(container, "a.search_result_row")
        .into_iter()
        .take(cap(limit))
        .map(SearchResult::from_element)
        .collect()
}

/// Front-page carousel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTab {
    TopSellers,
    NewReleases,
    Upcoming,
    Specials,
}

impl StoreTab {
    pub fn content_id(self) -> &'static str {
        match self {
            Self::TopSellers => "tab_topsellers_content",
            Self::NewReleases => "tab_newreleases_content",
            Self::Upcoming => "tab_upcoming_content",
            Self::Specials => "tab_specials_content",
        }
    }
}

/// One tile of a front-page tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopResult {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub discount: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
}

impl TopResult {
    /// Build from a `div.tab_item` element.
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let link = find_attr(el, "a.tab_item_overlay", "href");
        let PriceBlock {
            discount,
            price,
            discount_price,
        } = discount_block(el);

        Self {
            id: link.as_deref().and_then(link_id),
            title: find_text(el, "div.tab_item_name"),
            link,
            image: find_attr(el, "div.tab_item_cap img", "src"),
            discount,
            price,
            discount_price,
        }
    }
}

pub fn parse_storefront_tab(body: &str, tab: StoreTab, limit: usize) -> Vec<TopResult> {
    let document = Html::parse_document(body);
    let css = format!("#{} > div.tab_item", tab.content_id());

    find_all(document.root_element(), &css)
        .into_iter()
        .take(cap(limit))
        .map(TopResult::from_element)
        .collect()
}

/// Tabs of a tag (category) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTab {
    NewReleases,
    TopSellers,
    ConcurrentUsers,
    ComingSoon,
}

impl CategoryTab {
    pub fn rows_id(self) -> &'static str {
        match self {
            Self::NewReleases => "NewReleasesRows",
            Self::TopSellers => "TopSellersRows",
            Self::ConcurrentUsers => "ConcurrentUsersRows",
            Self::ComingSoon => "ComingSoonRows",
        }
    }
}

/// One `a.tab_item` row of a tag page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub discount: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
}

impl CategoryResult {
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let link = attr(el, "href");
        let id = link
            .as_deref()
            .and_then(link_id)
            .or_else(|| attr(el, "data-ds-appid"));
        let tags = find_all(el, "div.tab_item_top_tags span.top_tag")
            .into_iter()
            .map(|tag| text(tag).trim_start_matches(',').trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        let PriceBlock {
            discount,
            price,
            discount_price,
        } = discount_block(el);

        Self {
            id,
            title: find_text(el, "div.tab_item_name"),
            link,
            image: find_attr(el, "img.tab_item_cap_img", "src"),
            tags,
            discount,
            price,
            discount_price,
        }
    }
}

pub fn parse_category(body: &str, tab: CategoryTab, limit: usize) -> Vec<CategoryResult> {
    let document = Html::parse_document(body);
    let css = format!("#{} a.tab_item", tab.rows_id());

    find_all(document.root_element(), &css)
        .into_iter()
        .take(cap(limit))
        .map(CategoryResult::from_element)
        .collect()
}

/// One `a.store_capsule` tile of a tag page carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategoryResult {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub discount: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
}

impl NewCategoryResult {
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let link = attr(el, "href");
        let id = attr(el, "data-ds-appid").or_else(|| link.as_deref().and_then(link_id));
        let PriceBlock {
            discount,
            price,
            discount_price,
        } = discount_block(el);

        Self {
            id,
            title: find_attr(el, "img", "alt").filter(|alt| !alt.is_empty()),
            link,
            image: find_attr(el, "img", "src"),
            discount,
            price,
            discount_price,
        }
    }
}

pub fn parse_category_capsules(body: &str, limit: usize) -> Vec<NewCategoryResult> {
    let document = Html::parse_document(body);

    find_all(document.root_element(), "a.store_capsule")
        .into_iter()
        .take(cap(limit))
        .map(NewCategoryResult::from_element)
        .collect()
}

/// Details from an app's store page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePageResult {
    pub title: Option<String>,
    pub image: Option<String>,
    pub released: Option<String>,
    pub review: Option<String>,
    pub review_long: Option<String>,
    pub discount: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
}

impl GamePageResult {
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let review_long = find(el, "div.user_reviews_summary_row").and_then(|row| {
            attr(row, "data-tooltip-html").or_else(|| attr(row, "data-tooltip-text"))
        });

        // Pricing comes from the first purchase option on the page.
        let (discount, price, discount_price) = match find(el, "div.game_area_purchase_game") {
            Some(purchase) => {
                let block = discount_block(purchase);
                if block.discount.is_some() {
                    (block.discount, block.price, block.discount_price)
                } else {
                    let price = find_text(purchase, "div.game_purchase_price")
                        .or(block.price)
                        .map(normalize_price);
                    (None, price, None)
                }
            }
            None => (None, None, None),
        };

        Self {
            title: find_text(el, "div.apphub_AppName"),
            image: find_attr(el, "img.game_header_image_full", "src"),
            released: find_text(el, "div.release_date div.date"),
            review: find_text(el, "span.game_review_summary"),
            review_long: review_long.map(|s| s.trim().to_string()),
            discount,
            price,
            discount_price,
        }
    }
}

pub fn parse_game_page(body: &str) -> GamePageResult {
    let document = Html::parse_document(body);
    GamePageResult::from_element(document.root_element())
}

/// An app resolved from a free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRef {
    pub id: String,
    pub title: Option<String>,
}

impl_priced!(
    SearchResult,
    TopResult,
    CategoryResult,
    NewCategoryResult,
    GamePageResult
);
