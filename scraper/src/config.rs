//! Run settings. Everything is fixed at build time; tests override fields
//! through struct update syntax.

use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL: &str = "https://www.acc.gov/join/";
pub const OUTPUT_PATH: &str = "acc_gov_opportunities.csv";
pub const USER_AGENT: &str = "acc_gov_scraper";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Listing index; pages are addressed with a `page` query parameter.
    pub base_url: String,
    pub output_path: PathBuf,
    /// Upper bound on every wait-for-element call.
    pub render_timeout: Duration,
    /// Pause after each navigation so client-side rendering can settle.
    pub settle_delay: Duration,
    /// Minimum gap between two browser navigations.
    pub request_interval: Duration,
    /// Minimum gap between two geocoding requests.
    pub geocode_interval: Duration,
    pub geocode_timeout: Duration,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            output_path: PathBuf::from(OUTPUT_PATH),
            render_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(2),
            request_interval: Duration::from_secs(1),
            geocode_interval: Duration::from_secs(1),
            geocode_timeout: Duration::from_secs(10),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn page_url(&self, page: u32) -> String {
        format!("{}?page={}", self.base_url, page)
    }
}
