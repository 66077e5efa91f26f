//! HTML to `Product` extraction for category pages.
//!
//! Works on a fully populated document; whether that document came from a
//! plain GET or a browser session is decided upstream.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::models::Product;
use crate::selectors;

const NBSP: char = '\u{a0}';

/// Extract every product card from a page, in document order.
///
/// A page without cards yields an empty vec; a card with broken markup
/// fails the whole page.
pub fn products_from_page(html: &str) -> Result<Vec<Product>> {
    let document = Html::parse_document(html);
    document
        .select(&selectors::CARD)
        .map(product_from_card)
        .collect()
}

/// Extract one product from a card element.
pub fn product_from_card(card: ElementRef<'_>) -> Result<Product> {
    let title = card
        .select(&selectors::TITLE_LINK)
        .next()
        .ok_or(ScrapeError::MissingElement {
            field: "title",
            selector: "a",
        })?
        .value()
        .attr("title")
        .ok_or(ScrapeError::MissingAttribute {
            field: "title",
            attribute: "title",
        })?
        .to_string();

    // The site pads descriptions with non-breaking spaces.
    let description =
        text_of(card, &selectors::DESCRIPTION, ".description", "description")?.replace(NBSP, " ");

    let price = parse_price(&text_of(card, &selectors::PRICE, ".price", "price")?)?;

    let rating = card.select(&selectors::FILLED_STAR).count() as u32;

    let num_of_reviews =
        parse_review_count(&text_of(card, &selectors::REVIEW_COUNT, ".review-count", "num_of_reviews")?)?;

    Ok(Product {
        title,
        description,
        price,
        rating,
        num_of_reviews,
    })
}

/// Concatenated text of the first element matching `selector` inside `card`.
fn text_of(
    card: ElementRef<'_>,
    selector: &Selector,
    css: &'static str,
    field: &'static str,
) -> Result<String> {
    let element = card
        .select(selector)
        .next()
        .ok_or(ScrapeError::MissingElement {
            field,
            selector: css,
        })?;
    Ok(element.text().collect::<String>())
}

/// Parse a price tag like `$1139.54` into its numeric value.
fn parse_price(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let numeric = trimmed.strip_prefix('$').unwrap_or(trimmed);
    numeric.parse::<f64>().map_err(|e| ScrapeError::InvalidNumber {
        field: "price",
        value: text.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a caption like `14 reviews` into its leading count.
fn parse_review_count(text: &str) -> Result<u32> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| ScrapeError::InvalidNumber {
            field: "num_of_reviews",
            value: text.to_string(),
            reason: "empty caption".to_string(),
        })?;
    token.parse::<u32>().map_err(|e| ScrapeError::InvalidNumber {
        field: "num_of_reviews",
        value: text.to_string(),
        reason: e.to_string(),
    })
}
