//! Askama templates for the demo page.

use askama::Template;

use crate::types::{Departure, Route, Stop};

/// The single demo page (extends base.html).
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    /// Show the stop search form above the list.
    pub search_form: bool,
    pub items: Vec<ItemView>,
    /// Shown instead of the list when it is empty.
    pub empty_message: Option<String>,
}

impl IndexTemplate {
    pub fn new(title: impl Into<String>, items: Vec<ItemView>) -> Self {
        Self {
            title: title.into(),
            search_form: false,
            items,
            empty_message: None,
        }
    }

    pub fn with_search_form(mut self) -> Self {
        self.search_form = true;
        self
    }

    pub fn when_empty(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }
}

/// One list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub label: String,
    pub href: Option<String>,
    pub detail: Option<String>,
    /// Inline CSS for route-coloured entries.
    pub style: Option<String>,
}

impl ItemView {
    fn link(label: impl Into<String>, href: String) -> Self {
        Self {
            label: label.into(),
            href: Some(href),
            detail: None,
            style: None,
        }
    }

    /// A departure, coloured by its route and linking to the route.
    pub fn from_departure(departure: &Departure) -> Self {
        let route = &departure.route;
        let label = departure
            .headsign
            .clone()
            .unwrap_or_else(|| route.route_id.clone());

        let mut item = Self::link(label, route_href(&route.route_id));
        item.detail = departure
            .expected_mins
            .map(|mins| match mins {
                0 => "due".to_string(),
                1 => "arrives in 1 min".to_string(),
                n => format!("arrives in {n} min"),
            });
        item.style = route_style(route);
        item
    }

    /// A route on its own page: the long name, not linked.
    pub fn from_route(route: &Route) -> Self {
        Self {
            label: route
                .route_long_name
                .clone()
                .unwrap_or_else(|| route.route_id.clone()),
            href: None,
            detail: route.route_short_name.clone(),
            style: route_style(route),
        }
    }

    /// A route in the full listing: "short long", linking to the route.
    pub fn from_route_listing(route: &Route) -> Self {
        let label = [
            route.route_short_name.as_deref(),
            route.route_long_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        let label = if label.is_empty() {
            route.route_id.clone()
        } else {
            label
        };
        Self::link(label, route_href(&route.route_id))
    }

    /// A stop linking to its departures.
    pub fn from_stop(stop: &Stop) -> Self {
        let label = stop
            .stop_name
            .clone()
            .unwrap_or_else(|| stop.stop_id.clone());
        let mut item = Self::link(label, stop_href(&stop.stop_id));
        item.detail = stop.distance.map(|feet| format!("{feet:.0} ft"));
        item
    }
}

pub fn stop_href(stop_id: &str) -> String {
    format!("?stop_id={}", urlencoding::encode(stop_id))
}

pub fn route_href(route_id: &str) -> String {
    format!("?route_id={}", urlencoding::encode(route_id))
}

fn route_style(route: &Route) -> Option<String> {
    let background = route.route_color.as_deref().filter(|c| is_hex_color(c))?;
    let mut style = format!("background: #{background};");
    if let Some(text) = route.route_text_color.as_deref().filter(|c| is_hex_color(c)) {
        style.push_str(&format!(" color: #{text};"));
    }
    Some(style)
}

fn is_hex_color(s: &str) -> bool {
    matches!(s.len(), 3 | 6) && s.chars().all(|c| c.is_ascii_hexdigit())
}
