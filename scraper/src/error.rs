use thiserror::Error;

/// Failures while driving the browser or reading a page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("timed out after {timeout_secs}s waiting for `{selector}` on {url}")]
    RenderTimeout {
        url: String,
        selector: String,
        timeout_secs: u64,
    },

    #[error("could not read page count: {0}")]
    Pagination(String),
}

/// Failures of the external geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request timed out")]
    Timeout,

    #[error("geocoding service error: {0}")]
    Service(String),

    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
