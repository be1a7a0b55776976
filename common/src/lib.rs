//! Shared data model for scraped job listings.

use serde::{Deserialize, Serialize};

/// Placeholder written in place of any text field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// A resolved latitude/longitude pair.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The two categorical list fields read from a listing's detail page.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub focus_areas: Option<String>,
    pub work_environments: Option<String>,
}

/// One result card, enriched with its detail page and geocoded location.
///
/// `None` marks a field whose element was missing on the page. Every row
/// of the export carries the same columns either way.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Listing {
    pub title: Option<String>,
    pub project: Option<String>,
    pub location: Option<String>,
    pub hourly_pay: Option<String>,
    pub term_length: Option<String>,
    pub apply_by: Option<String>,
    pub detail_url: Option<String>,
    pub focus_areas: Option<String>,
    pub work_environments: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Listing {
    pub fn apply_details(&mut self, details: DetailFields) {
        self.focus_areas = details.focus_areas;
        self.work_environments = details.work_environments;
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.coordinates = coordinates;
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }

    /// Text of a field, or [`NOT_AVAILABLE`] when it is missing.
    pub fn text_or_sentinel(field: &Option<String>) -> &str {
        field.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Listings extracted from a single index page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResults {
    pub page: u32,
    pub listings: Vec<Listing>,
    /// The page never rendered its result cards, so it contributed nothing.
    pub failed: bool,
}

impl PageResults {
    pub fn new(page: u32, listings: Vec<Listing>) -> Self {
        Self {
            page,
            listings,
            failed: false,
        }
    }

    pub fn failed(page: u32) -> Self {
        Self {
            page,
            listings: Vec::new(),
            failed: true,
        }
    }
}

/// Everything collected over one run, in page order.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub listings: Vec<Listing>,
    pub pages_scraped: u32,
    pub pages_failed: u32,
}

impl Harvest {
    pub fn absorb(&mut self, page: PageResults) {
        self.pages_scraped += 1;
        if page.failed {
            self.pages_failed += 1;
        }
        self.listings.extend(page.listings);
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
