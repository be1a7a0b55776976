use crate::browser::{Navigator, PageDriver};
use crate::config::ScrapeConfig;
use crate::export::export_csv;
use crate::geocode::{GeocodeOutcome, GeocodeStats, Geocoder, LocationResolver};
use crate::listing::scrape_page;
use crate::pagination::discover_total_pages;
use anyhow::{Context, Result};
use common::{Harvest, Listing};
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct RunSummary {
    pub pages_scraped: u32,
    pub pages_failed: u32,
    pub listings: usize,
    pub geocoding: GeocodeStats,
    pub output_path: PathBuf,
}

/// Discovers the page count, then scrapes every page in order.
pub fn collect_listings<D: PageDriver>(
    navigator: &mut Navigator<D>,
    config: &ScrapeConfig,
) -> Result<Harvest> {
    let base = Url::parse(&config.base_url)
        .with_context(|| format!("invalid base URL {}", config.base_url))?;

    let total_pages = discover_total_pages(navigator, &config.base_url);

    let mut harvest = Harvest::default();
    for page in 1..=total_pages {
        info!("📡 Scraping page {}/{}", page, total_pages);
        harvest.absorb(scrape_page(navigator, &base, page, &config.page_url(page)));
    }
    Ok(harvest)
}

/// Attaches coordinates to every listing. Listings whose location cannot be
/// resolved keep null coordinates and stay in the output.
pub fn geocode_listings<G: Geocoder>(listings: &mut [Listing], resolver: &mut LocationResolver<G>) {
    for listing in listings {
        let outcome = resolver.resolve(listing.location.as_deref());
        if let GeocodeOutcome::Unavailable(e) = &outcome {
            warn!(
                location = listing.location.as_deref().unwrap_or_default(),
                error = %e,
                "🌍 Geocoding error"
            );
        }
        listing.set_coordinates(outcome.coordinates());
    }
}

/// Scrape, geocode, export. Only an unusable base URL or a failed write
/// ends the run early; per-page and per-record failures are absorbed.
pub fn run<D: PageDriver, G: Geocoder>(
    driver: D,
    geocoder: G,
    config: &ScrapeConfig,
) -> Result<RunSummary> {
    let mut navigator = Navigator::new(driver, config);
    let mut harvest = collect_listings(&mut navigator, config)?;
    info!(
        pages = harvest.pages_scraped,
        failed = harvest.pages_failed,
        "📊 Collected {} listings",
        harvest.len()
    );

    info!("🌍 Geocoding locations...");
    let mut resolver = LocationResolver::new(geocoder, config.geocode_interval);
    geocode_listings(&mut harvest.listings, &mut resolver);
    let geocoding = resolver.stats();
    info!(
        lookups = geocoding.lookups,
        cache_hits = geocoding.cache_hits,
        no_match = geocoding.no_match,
        failures = geocoding.failures,
        skipped = geocoding.skipped,
        "Geocoding done"
    );

    info!("💾 Saving to CSV...");
    export_csv(&config.output_path, &harvest.listings)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;
    info!(
        "✨ Scraping complete. Data saved to {}",
        config.output_path.display()
    );

    Ok(RunSummary {
        pages_scraped: harvest.pages_scraped,
        pages_failed: harvest.pages_failed,
        listings: harvest.len(),
        geocoding,
        output_path: config.output_path.clone(),
    })
}
