//! Runs the configured targets in order: resolve the page, extract the
//! products, write the CSV.

use reqwest::Client;
use tracing::info;

use crate::config::{Config, Target};
use crate::error::Result;
use crate::extract;
use crate::http_client;
use crate::models::Product;
use crate::output;
use crate::pagination;

/// Scrapes one category page into its CSV file and returns its products.
pub async fn scrape_target(http: &Client, config: &Config, target: &Target) -> Result<Vec<Product>> {
    let url = config.target_url(target)?;
    let source = pagination::resolve_page(http, config, url.as_str()).await?;
    let products = extract::products_from_page(source.html())?;

    let path = config.output_path(target);
    output::write_products_to_path(&path, &products)?;
    info!(
        "Wrote {} products from {} ({} mode) to {}",
        products.len(),
        url,
        source.mode(),
        path.display()
    );

    Ok(products)
}

/// Scrapes every configured target, in order. The first failing target
/// aborts the run; files already written stay on disk.
pub async fn run(config: &Config) -> Result<()> {
    let http = http_client::create_http_client(&config.user_agent)?;
    std::fs::create_dir_all(&config.out_dir)?;

    for target in &config.targets {
        scrape_target(&http, config, target).await?;
    }
    Ok(())
}
