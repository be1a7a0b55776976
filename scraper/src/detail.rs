use crate::browser::{Navigator, PageDriver};
use crate::text::{element_text, non_empty_text};
use common::DetailFields;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::warn;

pub const CONTENT_SECTION: &str = "section";

const FOCUS_AREA: &str = "Focus area";
const WORK_ENVIRONMENT: &str = "Work environment";

static HEADING_OR_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3, ul").expect("heading selector is valid"));
static LIST_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("list item selector is valid"));

/// Items of the first list following the `h3` labeled `heading`, joined
/// with `", "`. `None` when the heading or its items are missing.
fn list_after_heading(document: &Html, heading: &str) -> Option<String> {
    let mut after_heading = false;
    let list: ElementRef = document.select(&HEADING_OR_LIST).find(|el| {
        match el.value().name() {
            "h3" if element_text(el) == heading => after_heading = true,
            "ul" if after_heading => return true,
            _ => {}
        }
        false
    })?;

    let items: Vec<String> = list
        .select(&LIST_ITEM)
        .filter_map(|li| non_empty_text(&li))
        .collect();
    (!items.is_empty()).then(|| items.join(", "))
}

pub fn parse_detail_fields(html: &str) -> DetailFields {
    let document = Html::parse_document(html);
    DetailFields {
        focus_areas: list_after_heading(&document, FOCUS_AREA),
        work_environments: list_after_heading(&document, WORK_ENVIRONMENT),
    }
}

/// Visits a listing's detail page. A page that never renders yields two
/// missing fields rather than an error.
pub fn scrape_details<D: PageDriver>(navigator: &mut Navigator<D>, url: &str) -> DetailFields {
    match navigator.visit(url, CONTENT_SECTION) {
        Ok(html) => parse_detail_fields(&html),
        Err(e) => {
            warn!(url, error = %e, "⏱️ Timed out waiting for details page to load");
            DetailFields::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail_html, quick_config, FakeDriver};

    #[test]
    fn test_parse_detail_fields_joins_list_items() {
        let html = detail_html(&["Education", "Environment"], &["Outdoors"]);
        let fields = parse_detail_fields(&html);
        assert_eq!(fields.focus_areas.as_deref(), Some("Education, Environment"));
        assert_eq!(fields.work_environments.as_deref(), Some("Outdoors"));
    }

    #[test]
    fn test_missing_heading_is_missing_not_empty() {
        let html = r#"<section>
            <h3>Focus area</h3><ul><li> Disaster
                relief </li></ul>
        </section>"#;
        let fields = parse_detail_fields(html);
        assert_eq!(fields.focus_areas.as_deref(), Some("Disaster relief"));
        assert_eq!(fields.work_environments, None);
    }

    #[test]
    fn test_heading_with_empty_list_is_missing() {
        let html = detail_html(&[], &["Office"]);
        let fields = parse_detail_fields(&html);
        assert_eq!(fields.focus_areas, None);
        assert_eq!(fields.work_environments.as_deref(), Some("Office"));
    }

    #[test]
    fn test_list_is_taken_after_its_heading() {
        let html = r#"<section>
            <ul><li>Navigation</li></ul>
            <h3>Work environment</h3>
            <p>Varies by site</p>
            <ul><li>Rural</li><li>Urban</li></ul>
        </section>"#;
        let fields = parse_detail_fields(html);
        assert_eq!(fields.work_environments.as_deref(), Some("Rural, Urban"));
    }

    #[test]
    fn test_scrape_details_timeout_yields_missing_fields() {
        let url = "https://www.acc.gov/join/opportunity/1";
        let driver = FakeDriver::new().with_page(url, "<html><body><p>Loading</p></body></html>");
        let mut navigator = Navigator::new(driver, &quick_config());

        assert_eq!(scrape_details(&mut navigator, url), DetailFields::default());
    }

    #[test]
    fn test_scrape_details_reads_rendered_page() {
        let url = "https://www.acc.gov/join/opportunity/2";
        let driver = FakeDriver::new().with_page(url, detail_html(&["Health"], &["Clinic"]));
        let mut navigator = Navigator::new(driver, &quick_config());

        let fields = scrape_details(&mut navigator, url);
        assert_eq!(fields.focus_areas.as_deref(), Some("Health"));
        assert_eq!(fields.work_environments.as_deref(), Some("Clinic"));
    }
}
