//! Free-text location to coordinates, via Nominatim (OpenStreetMap).

use crate::config::ScrapeConfig;
use crate::error::GeocodeError;
use crate::pacing::Pacer;
use crate::text::clean_text;
use common::Coordinates;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// A geocoding service. `Ok(None)` means the query matched nothing.
pub trait Geocoder {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Nominatim search result; coordinates come back as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Best match from a Nominatim JSON response body.
pub fn parse_nominatim(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    let Some(place) = places.first() else {
        return Ok(None);
    };

    let latitude = place
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::Malformed(format!("latitude {:?}: {e}", place.lat)))?;
    let longitude = place
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::Malformed(format!("longitude {:?}: {e}", place.lon)))?;

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}

fn request_error(e: reqwest::Error) -> GeocodeError {
    if e.is_timeout() {
        GeocodeError::Timeout
    } else {
        GeocodeError::Service(e.to_string())
    }
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(config: &ScrapeConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.geocode_timeout)
            .build()
            .map_err(|e| GeocodeError::Service(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(request_error)?;

        parse_nominatim(&body)
    }
}

/// What happened when one record's location was resolved.
#[derive(Debug)]
pub enum GeocodeOutcome {
    Found(Coordinates),
    NoMatch,
    /// The record has no location text; nothing was queried.
    Skipped,
    /// The service failed; the record keeps null coordinates.
    Unavailable(GeocodeError),
}

impl GeocodeOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Found(coordinates) => Some(*coordinates),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GeocodeStats {
    /// Requests actually sent to the service.
    pub lookups: u32,
    pub cache_hits: u32,
    pub no_match: u32,
    pub failures: u32,
    pub skipped: u32,
}

/// Cache key: case and whitespace differences map to the same place.
pub fn cache_key(location: &str) -> String {
    clean_text(location).to_lowercase()
}

/// Resolves locations through a [`Geocoder`], remembering answers so a
/// location repeated across listings is only queried once. Failures are
/// not remembered.
pub struct LocationResolver<G> {
    geocoder: G,
    cache: HashMap<String, Option<Coordinates>>,
    pacer: Pacer,
    stats: GeocodeStats,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G, min_interval: Duration) -> Self {
        Self {
            geocoder,
            cache: HashMap::new(),
            pacer: Pacer::new(min_interval),
            stats: GeocodeStats::default(),
        }
    }

    pub fn resolve(&mut self, location: Option<&str>) -> GeocodeOutcome {
        let Some(query) = location.map(clean_text).filter(|q| !q.is_empty()) else {
            self.stats.skipped += 1;
            return GeocodeOutcome::Skipped;
        };

        let key = cache_key(&query);
        let answer = match self.cache.get(&key) {
            Some(cached) => {
                self.stats.cache_hits += 1;
                *cached
            }
            None => {
                self.pacer.wait();
                self.stats.lookups += 1;
                let result = self.geocoder.lookup(&query);
                self.pacer.finish();
                match result {
                    Ok(answer) => {
                        self.cache.insert(key, answer);
                        answer
                    }
                    Err(e) => {
                        self.stats.failures += 1;
                        return GeocodeOutcome::Unavailable(e);
                    }
                }
            }
        };

        match answer {
            Some(coordinates) => GeocodeOutcome::Found(coordinates),
            None => {
                debug!(location = %query, "No geocoding match");
                self.stats.no_match += 1;
                GeocodeOutcome::NoMatch
            }
        }
    }

    pub fn stats(&self) -> GeocodeStats {
        self.stats
    }
}
