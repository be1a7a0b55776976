use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Trims and collapses runs of whitespace (including newlines) to one space.
pub fn clean_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

/// Cleaned text content of an element.
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Cleaned text content, or `None` when the element holds no text.
pub fn non_empty_text(element: &ElementRef) -> Option<String> {
    Some(element_text(element)).filter(|text| !text.is_empty())
}
