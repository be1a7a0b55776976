use crate::browser::{Navigator, PageDriver};
use crate::error::ScrapeError;
use crate::text::element_text;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{info, warn};

pub const PAGINATION_LIST: &str = ".usa-pagination__list";

static PAGE_NUMBER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".usa-pagination__list .usa-pagination__page-no")
        .expect("page number selector is valid")
});

/// Reads the last page-number label of the pagination control.
pub fn parse_total_pages(html: &str) -> Result<u32, ScrapeError> {
    let document = Html::parse_document(html);
    let last = document
        .select(&PAGE_NUMBER)
        .last()
        .map(|el| element_text(&el))
        .ok_or_else(|| ScrapeError::Pagination("no page number elements".to_string()))?;

    last.parse::<u32>()
        .map_err(|e| ScrapeError::Pagination(format!("label {last:?} is not a page number: {e}")))
}

/// Number of index pages to scrape.
///
/// Never fails: when the control does not render, or cannot be read, the
/// listing is treated as a single page.
pub fn discover_total_pages<D: PageDriver>(navigator: &mut Navigator<D>, index_url: &str) -> u32 {
    let html = match navigator.visit(index_url, PAGINATION_LIST) {
        Ok(html) => html,
        Err(ScrapeError::RenderTimeout { .. }) => {
            warn!("⏱️ Timed out waiting for pagination. Assuming only one page.");
            return 1;
        }
        Err(e) => {
            warn!(error = %e, "Error getting total pages. Assuming only one page.");
            return 1;
        }
    };

    match parse_total_pages(&html) {
        Ok(0) => 1,
        Ok(pages) => {
            info!("📄 Found {} pages to scrape", pages);
            pages
        }
        Err(e) => {
            warn!(error = %e, "Error getting total pages. Assuming only one page.");
            1
        }
    }
}
