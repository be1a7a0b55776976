//! acc.gov Opportunity Scraper
//!
//! Walks the paginated listing index at acc.gov/join with a headless
//! browser, follows every listing to its detail page, geocodes locations
//! and saves the result to acc_gov_opportunities.csv

mod browser;
mod config;
mod detail;
mod error;
mod export;
mod geocode;
mod listing;
mod pacing;
mod pagination;
mod pipeline;
mod text;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use browser::BrowserSession;
use config::ScrapeConfig;
use geocode::NominatimGeocoder;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,acc_scraper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("🔍 Starting acc.gov Opportunity Scraper...");

    let config = ScrapeConfig::default();
    let geocoder = NominatimGeocoder::new(&config).context("Failed to build geocoding client")?;

    // Launch failure is fatal; everything after it runs with the session open.
    let mut session = BrowserSession::open().context("Failed to start headless browser")?;
    let result = pipeline::run(&mut session, geocoder, &config);
    session.close();

    let summary = result?;
    info!(
        pages = summary.pages_scraped,
        failed_pages = summary.pages_failed,
        geocode_failures = summary.geocoding.failures,
        "💾 Saved {} listings to {}",
        summary.listings,
        summary.output_path.display()
    );
    Ok(())
}
