//! Markup helpers shared by the record extractors.
//!
//! Every helper fails closed: an unparsable selector or a missing element
//! yields `None`/empty rather than an error, so extractors can chain them
//! without any error plumbing.

pub mod json;

use scraper::{ElementRef, Html, Selector};

/// First descendant of `el` matching `css`.
pub fn find<'a>(el: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    el.select(&selector).next()
}

/// All descendants of `el` matching `css`, in document order.
pub fn find_all<'a>(el: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => el.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value().attr(name).map(str::to_string)
}

/// Concatenated text of `el`, trimmed.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match, `None` when absent or blank.
pub fn find_text(el: ElementRef<'_>, css: &str) -> Option<String> {
    find(el, css).map(text).filter(|s| !s.is_empty())
}

pub fn find_attr(el: ElementRef<'_>, css: &str, name: &str) -> Option<String> {
    find(el, css).and_then(|found| attr(found, name))
}

/// Text with all spaces, tabs and line breaks removed.
pub fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\r' | '\t'))
        .collect()
}

/// Plain text of an HTML snippet.
pub fn html_to_text(snippet: &str) -> String {
    let fragment = Html::parse_fragment(snippet);
    fragment.root_element().text().collect()
}

/// Identifier at path segment 4 of a store link (`https://host/app/<id>/...`).
///
/// Links of any other shape yield `None`.
pub fn link_id(link: &str) -> Option<String> {
    link.split('/')
        .nth(4)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Replace any spelling of "free to play" with the display form.
pub fn normalize_price(price: String) -> String {
    if squash(&price).eq_ignore_ascii_case("freetoplay") {
        "Free to Play".to_string()
    } else {
        price
    }
}

/// Pricing read from a store `div.discount_block`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBlock {
    pub discount: Option<String>,
    pub price: Option<String>,
    pub discount_price: Option<String>,
}

/// Read the discount block inside `el`.
///
/// Without a percentage element the final price is the plain price; with one,
/// the original price is `price` and the final price is `discount_price`.
pub fn discount_block(el: ElementRef<'_>) -> PriceBlock {
    let Some(block) = find(el, "div.discount_block") else {
        return PriceBlock::default();
    };

    let discount = find_text(block, "div.discount_pct");
    let Some(prices) = find(block, "div.discount_prices") else {
        return PriceBlock {
            discount,
            ..PriceBlock::default()
        };
    };

    let (price, discount_price) = if discount.is_some() {
        (
            find_text(prices, "div.discount_original_price"),
            find_text(prices, "div.discount_final_price"),
        )
    } else {
        (find_text(prices, "div.discount_final_price"), None)
    };

    PriceBlock {
        discount,
        price: price.map(normalize_price),
        discount_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_id_reads_segment_four() {
        assert_eq!(
            link_id("https://store.steampowered.com/app/570/Dota_2/").as_deref(),
            Some("570")
        );
        assert_eq!(link_id("https://store.steampowered.com/app/"), None);
        assert_eq!(link_id("not a link"), None);
    }

    #[test]
    fn free_to_play_is_normalized() {
        assert_eq!(normalize_price("Free To Play".into()), "Free to Play");
        assert_eq!(normalize_price("\n  FREETOPLAY \t".into()), "Free to Play");
        assert_eq!(normalize_price("$9.99".into()), "$9.99");
    }

    #[test]
    fn squash_strips_whitespace_only() {
        assert_eq!(squash(" -50% \r\n\t"), "-50%");
    }

    #[test]
    fn html_to_text_drops_tags() {
        assert_eq!(html_to_text("<b>Rare</b> item<br>"), "Rare item");
    }

    #[test]
    fn discount_block_plain_layout() {
        let html = Html::parse_fragment(
            r#"<div class="discount_block"><div class="discount_prices">
                 <div class="discount_final_price">$19.99</div>
               </div></div>"#,
        );
        let block = discount_block(html.root_element());
        assert_eq!(block.discount, None);
        assert_eq!(block.price.as_deref(), Some("$19.99"));
        assert_eq!(block.discount_price, None);
    }

    #[test]
    fn discount_block_discounted_layout() {
        let html = Html::parse_fragment(
            r#"<div class="discount_block">
                 <div class="discount_pct">-75%</div>
                 <div class="discount_prices">
                   <div class="discount_original_price">$39.99</div>
                   <div class="discount_final_price">$9.99</div>
                 </div>
               </div>"#,
        );
        let block = discount_block(html.root_element());
        assert_eq!(block.discount.as_deref(), Some("-75%"));
        assert_eq!(block.price.as_deref(), Some("$39.99"));
        assert_eq!(block.discount_price.as_deref(), Some("$9.99"));
    }

    #[test]
    fn missing_discount_block_is_empty() {
        let html = Html::parse_fragment("<div class=\"tab_item\"></div>");
        assert_eq!(discount_block(html.root_element()), PriceBlock::default());
    }

    #[test]
    fn bad_selector_fails_closed() {
        let html = Html::parse_fragment("<p>x</p>");
        assert!(find(html.root_element(), "p[[").is_none());
        assert!(find_all(html.root_element(), "p[[").is_empty());
    }
}
