//! Decides, per page, between the plain HTTP fetch and the browser-driven
//! reveal, and says which one produced the HTML.

use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::browser;
use crate::config::Config;
use crate::error::Result;
use crate::selectors;

/// How a category page's full HTML was obtained.
#[derive(Debug)]
pub enum PageSource {
    /// The initial response already held every card; the body is passed
    /// through untouched.
    Static(String),
    /// A load-more control was present; this is the page source captured
    /// after the click loop finished.
    Expanded(String),
}

impl PageSource {
    pub fn html(&self) -> &str {
        match self {
            PageSource::Static(html) | PageSource::Expanded(html) => html,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            PageSource::Static(_) => "static",
            PageSource::Expanded(_) => "dynamic",
        }
    }
}

/// True when the page reveals further cards only through its scroll-more
/// button.
pub fn needs_browser(html: &str) -> bool {
    Html::parse_document(html)
        .select(&selectors::LOAD_MORE)
        .next()
        .is_some()
}

/// Fetch `url` and return its fully populated HTML.
///
/// The initial response body decides the branch: no load-more marker and
/// the body is complete as-is, otherwise the page goes through a browser
/// session that clicks the control to exhaustion.
pub async fn resolve_page(http: &Client, config: &Config, url: &str) -> Result<PageSource> {
    let body = http.get(url).send().await?.text().await?;

    if needs_browser(&body) {
        debug!("Load-more control present on {}, switching to a browser session", url);
        let html = browser::reveal_full_page(config, url).await?;
        Ok(PageSource::Expanded(html))
    } else {
        Ok(PageSource::Static(body))
    }
}
