//! Browser-driven retrieval for pages that reveal products through a
//! "load more" button.
//!
//! Talks to a WebDriver endpoint (geckodriver or chromedriver) through
//! fantoccini. Each page gets a fresh session which is closed before the
//! next one, whatever happened in between.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::{debug, warn};

use crate::config::{BrowserKind, Config};
use crate::error::{Result, ScrapeError};
use crate::selectors;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Outcome of one click attempt on the load-more control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click landed.
    Clicked,
    /// Another element swallowed the click, typically an overlay that has
    /// not finished going away.
    Intercepted,
    /// The control exists but refused the interaction.
    NotInteractable,
}

/// Why the click loop stopped. None of these abort the page; the items
/// revealed so far are still captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The control hid or disabled itself: every item is on the page.
    Exhausted,
    /// A click was intercepted by an overlapping element.
    Obstructed,
    /// The control stopped accepting interaction.
    NotInteractable,
}

/// The load-more control as the click loop sees it. The live WebDriver
/// element implements this; tests drive the loop with a scripted stand-in.
#[async_trait]
pub trait LoadMoreControl: Send {
    async fn is_displayed(&mut self) -> Result<bool>;
    async fn is_enabled(&mut self) -> Result<bool>;
    async fn click(&mut self) -> Result<ClickOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    /// Checking whether the control is still there to click.
    Polling,
    /// Control looked clickable; a click is in flight.
    Clicking,
    Stopped(StopReason),
}

/// Clicks the control until it reports itself exhausted or pushes back.
///
/// Transitions: `Polling` moves to `Clicking` while the control is both
/// displayed and enabled, else to `Stopped(Exhausted)`. A landed click goes
/// back to `Polling`; a refused one stops the loop with the matching
/// reason. Driver failures other than the two refusals propagate as errors.
pub async fn exhaust_load_more<C>(control: &mut C) -> Result<StopReason>
where
    C: LoadMoreControl + ?Sized,
{
    let mut state = LoopState::Polling;
    let mut clicks = 0u32;
    loop {
        state = match state {
            LoopState::Polling => {
                if control.is_displayed().await? && control.is_enabled().await? {
                    LoopState::Clicking
                } else {
                    LoopState::Stopped(StopReason::Exhausted)
                }
            }
            LoopState::Clicking => match control.click().await? {
                ClickOutcome::Clicked => {
                    clicks += 1;
                    LoopState::Polling
                }
                ClickOutcome::Intercepted => LoopState::Stopped(StopReason::Obstructed),
                ClickOutcome::NotInteractable => LoopState::Stopped(StopReason::NotInteractable),
            },
            LoopState::Stopped(reason) => {
                debug!("Load-more loop stopped after {} landed clicks: {:?}", clicks, reason);
                return Ok(reason);
            }
        };
    }
}

/// Fetch `url` through the browser, click "load more" until everything is
/// revealed and return the final page source.
pub async fn reveal_full_page(config: &Config, url: &str) -> Result<String> {
    let client = connect(config).await?;
    let outcome = reveal(&client, config, url).await;
    // The session is closed whatever happened during the reveal.
    if let Err(e) = client.close().await {
        warn!("Failed to close WebDriver session for {}: {}", url, e);
    }
    outcome
}

async fn reveal(client: &Client, config: &Config, url: &str) -> Result<String> {
    let timeout = Duration::from_secs(config.wait_timeout_secs);
    client.goto(url).await?;

    // The consent banner overlaps the page; dismiss it before anything else.
    let consent = clickable_element(
        client,
        selectors::ACCEPT_COOKIES_CSS,
        "cookie consent button",
        url,
        timeout,
    )
    .await?;
    consent.click().await?;

    let button = clickable_element(
        client,
        selectors::LOAD_MORE_CSS,
        "load-more button",
        url,
        timeout,
    )
    .await?;
    let mut control = DriverControl { element: button };

    match exhaust_load_more(&mut control).await? {
        StopReason::Exhausted => debug!("Load-more control exhausted on {}", url),
        StopReason::Obstructed => {
            warn!(
                "Click on load-more was intercepted by another element on {}; keeping the items revealed so far",
                url
            );
        }
        StopReason::NotInteractable => {
            warn!(
                "Load-more stopped accepting clicks on {}; keeping the items revealed so far",
                url
            );
        }
    }

    Ok(client.source().await?)
}

/// Waits for `css` to be present, displayed and enabled, all within one
/// `timeout` window.
async fn clickable_element(
    client: &Client,
    css: &'static str,
    control: &'static str,
    url: &str,
    timeout: Duration,
) -> Result<Element> {
    let started = Instant::now();
    let element = client
        .wait()
        .at_most(timeout)
        .for_element(Locator::Css(css))
        .await
        .map_err(|e| match e {
            CmdError::WaitTimeout => ScrapeError::InteractionTimeout {
                control,
                url: url.to_string(),
                secs: timeout.as_secs(),
            },
            other => other.into(),
        })?;

    loop {
        if element.is_displayed().await? && element.is_enabled().await? {
            return Ok(element);
        }
        if started.elapsed() >= timeout {
            return Err(ScrapeError::InteractionTimeout {
                control,
                url: url.to_string(),
                secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Live WebDriver element behind the `LoadMoreControl` seam.
struct DriverControl {
    element: Element,
}

#[async_trait]
impl LoadMoreControl for DriverControl {
    async fn is_displayed(&mut self) -> Result<bool> {
        Ok(self.element.is_displayed().await?)
    }

    async fn is_enabled(&mut self) -> Result<bool> {
        Ok(self.element.is_enabled().await?)
    }

    async fn click(&mut self) -> Result<ClickOutcome> {
        match self.element.click().await {
            Ok(()) => Ok(ClickOutcome::Clicked),
            Err(e) => match classify_click_error(&e) {
                Some(outcome) => Ok(outcome),
                None => Err(e.into()),
            },
        }
    }
}

/// Maps the two recoverable WebDriver click refusals to outcomes; anything
/// else stays an error.
fn classify_click_error(error: &CmdError) -> Option<ClickOutcome> {
    if let CmdError::Standard(w) = error {
        match w.error {
            ErrorStatus::ElementClickIntercepted => return Some(ClickOutcome::Intercepted),
            ErrorStatus::ElementNotInteractable => return Some(ClickOutcome::NotInteractable),
            _ => {}
        }
    }
    None
}

async fn connect(config: &Config) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config));
    let client = builder.connect(&config.webdriver_url).await?;
    Ok(client)
}

fn capabilities(config: &Config) -> serde_json::Map<String, serde_json::Value> {
    let mut caps = serde_json::Map::new();
    if config.headless {
        match config.browser {
            BrowserKind::Firefox => {
                caps.insert(
                    "moz:firefoxOptions".to_string(),
                    serde_json::json!({ "args": ["-headless"] }),
                );
            }
            BrowserKind::Chrome => {
                caps.insert(
                    "goog:chromeOptions".to_string(),
                    serde_json::json!({ "args": ["--headless=new"] }),
                );
            }
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Stand-in control that plays back a fixed list of click outcomes and
    /// reports itself hidden once the list runs out.
    struct ScriptedControl {
        script: VecDeque<ClickOutcome>,
        attempts: usize,
    }

    impl ScriptedControl {
        fn new(script: &[ClickOutcome]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                attempts: 0,
            }
        }
    }

    #[async_trait]
    impl LoadMoreControl for ScriptedControl {
        async fn is_displayed(&mut self) -> Result<bool> {
            Ok(!self.script.is_empty())
        }

        async fn is_enabled(&mut self) -> Result<bool> {
            Ok(!self.script.is_empty())
        }

        async fn click(&mut self) -> Result<ClickOutcome> {
            self.attempts += 1;
            Ok(self
                .script
                .pop_front()
                .expect("clicked a control with no scripted outcome"))
        }
    }

    /// Control whose status checks fail, to exercise error propagation.
    struct BrokenControl;

    #[async_trait]
    impl LoadMoreControl for BrokenControl {
        async fn is_displayed(&mut self) -> Result<bool> {
            Err(ScrapeError::InteractionTimeout {
                control: "load-more button",
                url: "http://example.invalid".to_string(),
                secs: 10,
            })
        }

        async fn is_enabled(&mut self) -> Result<bool> {
            Ok(true)
        }

        async fn click(&mut self) -> Result<ClickOutcome> {
            Ok(ClickOutcome::Clicked)
        }
    }

    #[tokio::test]
    async fn test_hidden_control_stops_without_clicking() {
        let mut control = ScriptedControl::new(&[]);
        let reason = exhaust_load_more(&mut control).await.unwrap();
        assert_eq!(reason, StopReason::Exhausted);
        assert_eq!(control.attempts, 0);
    }

    #[tokio::test]
    async fn test_clicks_until_control_hides() {
        let mut control = ScriptedControl::new(&[
            ClickOutcome::Clicked,
            ClickOutcome::Clicked,
            ClickOutcome::Clicked,
        ]);
        let reason = exhaust_load_more(&mut control).await.unwrap();
        assert_eq!(reason, StopReason::Exhausted);
        assert_eq!(control.attempts, 3, "every scripted click should land exactly once");
    }

    #[tokio::test]
    async fn test_intercepted_click_stops_the_loop() {
        let mut control = ScriptedControl::new(&[ClickOutcome::Clicked, ClickOutcome::Intercepted]);
        let reason = exhaust_load_more(&mut control).await.unwrap();
        assert_eq!(reason, StopReason::Obstructed);
        assert_eq!(control.attempts, 2, "the intercepted attempt is the last one");
    }

    #[tokio::test]
    async fn test_not_interactable_click_stops_the_loop() {
        let mut control =
            ScriptedControl::new(&[ClickOutcome::Clicked, ClickOutcome::NotInteractable]);
        let reason = exhaust_load_more(&mut control).await.unwrap();
        assert_eq!(reason, StopReason::NotInteractable);
        assert_eq!(control.attempts, 2);
    }

    #[tokio::test]
    async fn test_driver_errors_propagate() {
        let mut control = BrokenControl;
        let result = exhaust_load_more(&mut control).await;
        assert!(matches!(
            result,
            Err(ScrapeError::InteractionTimeout { .. })
        ));
    }

    #[test]
    fn test_wait_timeout_is_not_a_click_refusal() {
        assert_eq!(classify_click_error(&CmdError::WaitTimeout), None);
    }

    #[test]
    fn test_headless_firefox_capabilities() {
        let config = Config::default();
        let caps = capabilities(&config);
        let args = &caps["moz:firefoxOptions"]["args"];
        assert_eq!(args[0], "-headless");
    }

    #[test]
    fn test_headless_chrome_capabilities() {
        let config = Config {
            browser: BrowserKind::Chrome,
            ..Config::default()
        };
        let caps = capabilities(&config);
        let args = &caps["goog:chromeOptions"]["args"];
        assert_eq!(args[0], "--headless=new");
    }

    #[test]
    fn test_headful_sessions_need_no_capabilities() {
        let config = Config {
            headless: false,
            ..Config::default()
        };
        assert!(capabilities(&config).is_empty());
    }
}
