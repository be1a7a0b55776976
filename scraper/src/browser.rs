//! Headless Chrome session and the driver seam the extractors work through.

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::pacing::Pacer;
use headless_chrome::util::Timeout;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The browser capabilities the scraper needs.
pub trait PageDriver {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Blocks until an element matching `selector` exists, or fails with
    /// [`ScrapeError::RenderTimeout`] once `timeout` has passed.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// Markup of the current page as rendered.
    fn page_source(&mut self) -> Result<String, ScrapeError>;
}

/// Owns one headless Chrome process and the single tab all navigation
/// goes through. Dropping the session closes the tab and kills the
/// browser, so it is released on every exit path.
pub struct BrowserSession {
    tab: Arc<Tab>,
    current_url: String,
    // Declared last so the tab handle goes before the process.
    browser: Browser,
}

impl BrowserSession {
    /// Launches headless, sandboxless Chrome. Failure here is fatal.
    pub fn open() -> Result<Self, ScrapeError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .args(vec![OsStr::new("--disable-dev-shm-usage")])
            // The connection must outlive long geocoding and pacing pauses.
            .idle_browser_timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| ScrapeError::BrowserLaunch(e.to_string()))?;

        let browser =
            Browser::new(options).map_err(|e| ScrapeError::BrowserLaunch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::BrowserLaunch(e.to_string()))?;

        info!("🌐 Headless browser started");
        Ok(Self {
            tab,
            current_url: String::new(),
            browser,
        })
    }

    /// Shuts the browser down at the end of a run.
    pub fn close(self) {
        info!("🛑 Closing headless browser");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!(pid = ?self.browser.get_process_id(), "Shutting down browser");
        if let Err(e) = self.tab.close(true) {
            warn!(error = %e, "Failed to close browser tab");
        }
        // `browser` is dropped after this, which kills the process.
    }
}

/// Sorts a failed element wait into a render timeout or a browser failure.
fn wait_error(url: &str, selector: &str, timeout: Duration, err: anyhow::Error) -> ScrapeError {
    if err.downcast_ref::<Timeout>().is_some() {
        ScrapeError::RenderTimeout {
            url: url.to_string(),
            selector: selector.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    } else {
        ScrapeError::Browser(format!("waiting for `{selector}` on {url} failed: {err}"))
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        debug!(url, "Navigating");
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| ScrapeError::Browser(format!("navigation to {url} failed: {e}")))?;
        self.current_url = url.to_string();
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| wait_error(&self.current_url, selector, timeout, e))
    }

    fn page_source(&mut self) -> Result<String, ScrapeError> {
        self.tab
            .get_content()
            .map_err(|e| ScrapeError::Browser(format!("could not read page source: {e}")))
    }
}

impl<D: PageDriver + ?Sized> PageDriver for &mut D {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        (**self).navigate(url)
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
        (**self).wait_for(selector, timeout)
    }

    fn page_source(&mut self) -> Result<String, ScrapeError> {
        (**self).page_source()
    }
}

/// Paced access to a [`PageDriver`]: every visit waits out the request
/// interval, navigates, lets the page settle and then waits for the element
/// that proves the content rendered.
pub struct Navigator<D> {
    driver: D,
    pacer: Pacer,
    settle_delay: Duration,
    render_timeout: Duration,
}

impl<D: PageDriver> Navigator<D> {
    pub fn new(driver: D, config: &ScrapeConfig) -> Self {
        Self {
            driver,
            pacer: Pacer::new(config.request_interval),
            settle_delay: config.settle_delay,
            render_timeout: config.render_timeout,
        }
    }

    /// Loads `url` and returns its markup once `selector` is present.
    pub fn visit(&mut self, url: &str, selector: &str) -> Result<String, ScrapeError> {
        self.pacer.wait();
        let result = self.load(url, selector);
        self.pacer.finish();
        result
    }

    fn load(&mut self, url: &str, selector: &str) -> Result<String, ScrapeError> {
        self.driver.navigate(url)?;
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        self.driver.wait_for(selector, self.render_timeout)?;
        self.driver.page_source()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> D {
        self.driver
    }
}
