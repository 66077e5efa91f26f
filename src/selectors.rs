//! CSS selectors for the webscraper.io e-commerce demo pages.
//!
//! Everything the crate knows about the site's markup lives here, so a
//! markup change on the demo site means touching exactly one file.

use scraper::Selector;
use std::sync::LazyLock;

/// Product card container on a category page.
pub static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".thumbnail").unwrap());

/// First anchor inside a card; the full product name is its `title`
/// attribute (the anchor text is truncated on the page).
pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Short description paragraph inside a card.
pub static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".description").unwrap());

/// Price tag, text like `$1139.54`.
pub static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".price").unwrap());

/// One filled star in the rating widget; the rating is the match count.
pub static FILLED_STAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ws-icon.ws-icon-star").unwrap());

/// Review count caption, text like `14 reviews`.
pub static REVIEW_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".review-count").unwrap());

/// "Load more" button, only present on pages paginated by script. The
/// class name (single `m` in `ecomerce`) is the site's own spelling.
pub static LOAD_MORE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(LOAD_MORE_CSS).unwrap());

/// Raw CSS for the load-more button, for element lookup over WebDriver.
pub const LOAD_MORE_CSS: &str = ".ecomerce-items-scroll-more";

/// Cookie consent accept button; its banner overlaps the page until
/// dismissed.
pub const ACCEPT_COOKIES_CSS: &str = ".acceptCookies";
