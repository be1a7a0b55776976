use crate::error::ExportError;
use common::Listing;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// Column headers, in output order.
pub const HEADERS: [&str; 11] = [
    "Title",
    "Project",
    "Location",
    "Hourly Pay",
    "Term Length",
    "Apply By",
    "Learn More URL",
    "Focus Areas",
    "Work Environments",
    "Latitude",
    "Longitude",
];

/// A listing flattened to one CSV row. Missing text becomes the sentinel,
/// missing coordinates an empty cell.
#[derive(Debug, Serialize)]
struct Row<'a> {
    title: &'a str,
    project: &'a str,
    location: &'a str,
    hourly_pay: &'a str,
    term_length: &'a str,
    apply_by: &'a str,
    detail_url: &'a str,
    focus_areas: &'a str,
    work_environments: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl<'a> From<&'a Listing> for Row<'a> {
    fn from(listing: &'a Listing) -> Self {
        let text = Listing::text_or_sentinel;
        Row {
            title: text(&listing.title),
            project: text(&listing.project),
            location: text(&listing.location),
            hourly_pay: text(&listing.hourly_pay),
            term_length: text(&listing.term_length),
            apply_by: text(&listing.apply_by),
            detail_url: text(&listing.detail_url),
            focus_areas: text(&listing.focus_areas),
            work_environments: text(&listing.work_environments),
            latitude: listing.latitude(),
            longitude: listing.longitude(),
        }
    }
}

/// Writes the header and one row per listing. The header is written even
/// when there are no listings.
pub fn write_listings<W: io::Write>(sink: W, listings: &[Listing]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);

    writer.write_record(HEADERS)?;
    for listing in listings {
        writer.serialize(Row::from(listing))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `listings` to `path`, replacing any existing file.
pub fn export_csv(path: &Path, listings: &[Listing]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_listings(file, listings)
}
