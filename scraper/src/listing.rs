//! Result cards on the paginated listing index.

use crate::browser::{Navigator, PageDriver};
use crate::detail::scrape_details;
use crate::text::{element_text, non_empty_text};
use common::{Listing, PageResults};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

pub const RESULT_CARD: &str = "li.result-card-container";

const LOCATION: &str = "Location";
const HOURLY_PAY: &str = "Hourly pay equivalent";
const TERM_LENGTH: &str = "Term length";
const APPLY_BY: &str = "Apply by";

// Selectors are fixed, so parse failures are programming errors.
static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(RESULT_CARD).expect("card selector is valid"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("title selector is valid"));
static PROJECT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.result-card-container__project").expect("project selector is valid")
});
static LABEL_OR_VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span, p").expect("label selector is valid"));
static DETAIL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.usa-button").expect("link selector is valid"));

fn first_text(card: &ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector).next().and_then(|el| non_empty_text(&el))
}

/// Text of the first `<p>` following the `<span>` labeled exactly `label`.
fn labeled_value(card: &ElementRef, label: &str) -> Option<String> {
    let mut after_label = false;
    for el in card.select(&LABEL_OR_VALUE) {
        match el.value().name() {
            "span" if !after_label && element_text(&el) == label => after_label = true,
            "p" if after_label => return non_empty_text(&el),
            _ => {}
        }
    }
    None
}

/// Absolute URL of the card's call-to-action link.
fn detail_url(card: &ElementRef, base: &Url) -> Option<String> {
    let href = card
        .select(&DETAIL_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())?;

    match base.join(href) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            debug!(href, error = %e, "Unresolvable detail link");
            None
        }
    }
}

fn parse_card(card: &ElementRef, base: &Url) -> Listing {
    Listing {
        title: first_text(card, &TITLE),
        project: first_text(card, &PROJECT),
        location: labeled_value(card, LOCATION),
        hourly_pay: labeled_value(card, HOURLY_PAY),
        term_length: labeled_value(card, TERM_LENGTH),
        apply_by: labeled_value(card, APPLY_BY),
        detail_url: detail_url(card, base),
        ..Listing::default()
    }
}

/// One [`Listing`] per result card, in page order, without detail fields.
pub fn parse_listing_cards(html: &str, base: &Url) -> Vec<Listing> {
    let document = Html::parse_document(html);
    document
        .select(&CARD)
        .map(|card| parse_card(&card, base))
        .collect()
}

/// Scrapes one index page and the detail page of every card on it.
///
/// A page whose cards never render contributes no listings; the run goes on.
pub fn scrape_page<D: PageDriver>(
    navigator: &mut Navigator<D>,
    base: &Url,
    page: u32,
    url: &str,
) -> PageResults {
    let html = match navigator.visit(url, RESULT_CARD) {
        Ok(html) => html,
        Err(e) => {
            warn!(page, url, error = %e, "⏱️ Timed out waiting for page to load");
            return PageResults::failed(page);
        }
    };

    let mut listings = parse_listing_cards(&html, base);
    for listing in &mut listings {
        if let Some(detail_url) = listing.detail_url.clone() {
            let details = scrape_details(navigator, &detail_url);
            listing.apply_details(details);
        }
    }

    info!(page, "📋 Extracted {} listings", listings.len());
    PageResults::new(page, listings)
}
