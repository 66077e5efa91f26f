use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "ecomscrape.yaml";

/// One category page to scrape and the CSV file its products land in.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Target {
    /// Joined onto `base_url`; may be absolute (`/test-sites/...`) or
    /// relative to the site root.
    pub path: String,
    /// CSV file name, relative to `out_dir`.
    pub output: String,
}

impl Target {
    fn new(path: &str, output: &str) -> Self {
        Self {
            path: path.to_string(),
            output: output.to_string(),
        }
    }
}

/// Which browser the WebDriver endpoint is driving.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Firefox,
    Chrome,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_browser")]
    pub browser: BrowserKind,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

fn default_base_url() -> String {
    "https://webscraper.io/".to_string()
}

fn default_targets() -> Vec<Target> {
    vec![
        Target::new("test-sites/e-commerce/more/", "home.csv"),
        Target::new("/test-sites/e-commerce/more/computers", "computers.csv"),
        Target::new("/test-sites/e-commerce/more/computers/laptops", "laptops.csv"),
        Target::new("/test-sites/e-commerce/more/computers/tablets", "tablets.csv"),
        Target::new("/test-sites/e-commerce/more/phones", "phones.csv"),
        Target::new("/test-sites/e-commerce/more/phones/touch", "touch.csv"),
    ]
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_browser() -> BrowserKind {
    BrowserKind::Firefox
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_tracing_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
            targets: default_targets(),
            out_dir: default_out_dir(),
            user_agent: default_user_agent(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            browser: default_browser(),
            wait_timeout_secs: default_wait_timeout_secs(),
            tracing_level: default_tracing_level(),
        }
    }
}

impl Config {
    /// Loads the config from `path` if given, else from `ecomscrape.yaml`
    /// if present, else the built-in defaults. Environment variables win
    /// over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config: Config = match path {
            Some(p) => {
                let config_str = fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file {}", p.display()))?;
                serde_yaml::from_str(&config_str)
                    .with_context(|| format!("Failed to parse config file {}", p.display()))?
            }
            None => {
                if let Ok(config_str) = fs::read_to_string(DEFAULT_CONFIG_PATH) {
                    serde_yaml::from_str(&config_str)
                        .with_context(|| format!("Failed to parse {DEFAULT_CONFIG_PATH}"))?
                } else {
                    Config::default()
                }
            }
        };

        // Override with environment variables if present
        if let Ok(webdriver_url) = env::var("ECOMSCRAPE_WEBDRIVER_URL") {
            config.webdriver_url = webdriver_url;
        }

        if let Ok(user_agent) = env::var("ECOMSCRAPE_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(out_dir) = env::var("ECOMSCRAPE_OUT_DIR") {
            config.out_dir = PathBuf::from(out_dir);
        }

        if config.targets.is_empty() {
            anyhow::bail!("At least one target is required (set targets in the config file)");
        }

        Ok(config)
    }

    /// Absolute URL for a target, joined against `base_url` the way a
    /// browser resolves a relative link.
    pub fn target_url(&self, target: &Target) -> std::result::Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join(&target.path)
    }

    /// Where a target's CSV file goes.
    pub fn output_path(&self, target: &Target) -> PathBuf {
        self.out_dir.join(&target.output)
    }
}
