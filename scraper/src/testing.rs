//! In-memory stand-ins for the browser and the geocoding service.

use crate::browser::PageDriver;
use crate::config::ScrapeConfig;
use crate::error::{GeocodeError, ScrapeError};
use crate::geocode::Geocoder;
use common::Coordinates;
use scraper::{Html, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

/// Config with every delay and timeout zeroed.
pub fn quick_config() -> ScrapeConfig {
    ScrapeConfig {
        render_timeout: Duration::ZERO,
        settle_delay: Duration::ZERO,
        request_interval: Duration::ZERO,
        geocode_interval: Duration::ZERO,
        ..ScrapeConfig::default()
    }
}

/// Serves fixed markup per URL. Unknown URLs render an empty page, so any
/// wait on them times out.
#[derive(Default)]
pub struct FakeDriver {
    pages: HashMap<String, String>,
    current: Option<String>,
    pub visited: Vec<String>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    fn current_html(&self) -> &str {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .map(String::as_str)
            .unwrap_or("<html><body></body></html>")
    }
}

impl PageDriver for FakeDriver {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.visited.push(url.to_string());
        self.current = Some(url.to_string());
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
        let parsed = Selector::parse(selector)
            .map_err(|e| ScrapeError::Browser(format!("bad selector {selector}: {e:?}")))?;
        let document = Html::parse_document(self.current_html());
        if document.select(&parsed).next().is_some() {
            Ok(())
        } else {
            Err(ScrapeError::RenderTimeout {
                url: self.current.clone().unwrap_or_default(),
                selector: selector.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        }
    }

    fn page_source(&mut self) -> Result<String, ScrapeError> {
        Ok(self.current_html().to_string())
    }
}

/// Scripted geocoding service that counts the queries it receives.
#[derive(Default)]
pub struct FakeGeocoder {
    answers: HashMap<String, Coordinates>,
    failing: Vec<String>,
    pub queries: RefCell<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, query: &str, latitude: f64, longitude: f64) -> Self {
        self.answers.insert(
            query.to_string(),
            Coordinates {
                latitude,
                longitude,
            },
        );
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl Geocoder for FakeGeocoder {
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.queries.borrow_mut().push(query.to_string());
        if self.failing.iter().any(|q| q == query) {
            return Err(GeocodeError::Timeout);
        }
        Ok(self.answers.get(query).copied())
    }
}

/// A result card as the listing index renders it.
pub fn card_html(title: &str, location: &str, apply_by: Option<&str>, href: Option<&str>) -> String {
    let apply_by = apply_by
        .map(|date| format!(r#"<div><span>Apply by</span><p>{date}</p></div>"#))
        .unwrap_or_default();
    let link = href
        .map(|href| format!(r#"<a class="usa-button" href="{href}">Learn more and apply</a>"#))
        .unwrap_or_default();
    format!(
        r#"<li class="result-card-container">
             <h2>{title}</h2>
             <span class="result-card-container__project">Project {title}</span>
             <div><span>Location</span><p>{location}</p></div>
             <div><span>Hourly pay equivalent</span><p>$17.50</p></div>
             <div><span>Term length</span><p>10 months</p></div>
             {apply_by}
             {link}
           </li>"#
    )
}

pub fn index_html(cards: &[String], last_page: Option<u32>) -> String {
    let pagination = last_page
        .map(|last| {
            let items: String = (1..=last)
                .map(|n| format!(r#"<li><a class="usa-pagination__page-no">{n}</a></li>"#))
                .collect();
            format!(r#"<nav><ul class="usa-pagination__list">{items}</ul></nav>"#)
        })
        .unwrap_or_default();
    format!(
        "<html><body><ul>{}</ul>{}</body></html>",
        cards.concat(),
        pagination
    )
}

pub fn detail_html(focus: &[&str], environments: &[&str]) -> String {
    let list = |items: &[&str]| -> String {
        items.iter().map(|item| format!("<li>{item}</li>")).collect()
    };
    format!(
        r#"<html><body><section>
             <h3>Focus area</h3><ul>{}</ul>
             <h3>Work environment</h3><ul>{}</ul>
           </section></body></html>"#,
        list(focus),
        list(environments)
    )
}
