use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("no element matched `{selector}` while extracting {field}")]
    MissingElement {
        field: &'static str,
        selector: &'static str,
    },

    #[error("element for {field} has no `{attribute}` attribute")]
    MissingAttribute {
        field: &'static str,
        attribute: &'static str,
    },

    #[error("could not parse {field} from {value:?}: {reason}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{control} did not become clickable within {secs}s on {url}")]
    InteractionTimeout {
        control: &'static str,
        url: String,
        secs: u64,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not open a WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
