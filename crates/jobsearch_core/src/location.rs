//! Codec between [`FilterState`] and the addressable location string.
//!
//! Only non-default dimensions are written, in a fixed order, so that equal
//! states always produce identical locations.

use std::fmt;

use url::form_urlencoded;

use crate::filter::{DaysWindow, FilterState, SortMode};

pub const PARAM_TEXT: &str = "q";
pub const PARAM_CITY: &str = "city";
pub const PARAM_SKILL: &str = "skill";
pub const PARAM_DAYS: &str = "days";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_SORT: &str = "sort";

/// A location parameter whose value was rejected and replaced by the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub param: &'static str,
    pub raw: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value {:?} for `{}`, using default", self.raw, self.param)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLocation {
    pub filter: FilterState,
    pub corrections: Vec<ValidationError>,
}

/// Parse a location (`/jobs?skill=python&page=3`, `?q=x`, or a bare query)
/// into a filter state. Never fails: bad values fall back to defaults and are
/// reported in `corrections`.
pub fn parse_location(location: &str) -> ParsedLocation {
    let query = query_part(location);
    let mut text = None;
    let mut city = None;
    let mut skill = None;
    let mut days = None;
    let mut page = None;
    let mut sort = None;

    // First occurrence wins for repeated keys.
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match key.as_ref() {
            PARAM_TEXT => &mut text,
            PARAM_CITY => &mut city,
            PARAM_SKILL => &mut skill,
            PARAM_DAYS => &mut days,
            PARAM_PAGE => &mut page,
            PARAM_SORT => &mut sort,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let mut corrections = Vec::new();
    let mut filter = FilterState::default()
        .with_text(text.unwrap_or_default())
        .with_skill(skill.unwrap_or_default())
        .with_city(city);

    if let Some(raw) = days.filter(|raw| !raw.is_empty()) {
        match raw.trim().parse::<u32>().ok().and_then(DaysWindow::new) {
            Some(window) => filter = filter.with_days(window),
            None => corrections.push(ValidationError {
                param: PARAM_DAYS,
                raw,
            }),
        }
    }

    if let Some(raw) = sort.filter(|raw| !raw.is_empty()) {
        match SortMode::from_param(raw.trim()) {
            Some(mode) => filter = filter.with_sort(mode),
            None => corrections.push(ValidationError {
                param: PARAM_SORT,
                raw,
            }),
        }
    }

    // Page last: the other transitions reset it.
    if let Some(raw) = page.filter(|raw| !raw.is_empty()) {
        match raw.trim().parse::<u32>() {
            Ok(value) if value >= 1 => filter = filter.with_page(value),
            _ => corrections.push(ValidationError {
                param: PARAM_PAGE,
                raw,
            }),
        }
    }

    ParsedLocation {
        filter,
        corrections,
    }
}

/// Query string for `filter` without the leading `?`; empty when every
/// dimension holds its default.
pub fn serialize_query(filter: &FilterState) -> String {
    let defaults = FilterState::default();
    let mut out = form_urlencoded::Serializer::new(String::new());
    if !filter.text().is_empty() {
        out.append_pair(PARAM_TEXT, filter.text());
    }
    if let Some(city) = filter.city() {
        out.append_pair(PARAM_CITY, city);
    }
    if !filter.skill().is_empty() {
        out.append_pair(PARAM_SKILL, filter.skill());
    }
    if filter.days() != defaults.days() {
        out.append_pair(PARAM_DAYS, &filter.days().to_string());
    }
    if filter.page() != defaults.page() {
        out.append_pair(PARAM_PAGE, &filter.page().to_string());
    }
    if filter.sort() != defaults.sort() {
        out.append_pair(PARAM_SORT, filter.sort().as_param());
    }
    out.finish()
}

/// Full location for `route`, e.g. `/jobs?skill=python&page=3`, or just the
/// route when the state is all defaults.
pub fn serialize_location(route: &str, filter: &FilterState) -> String {
    let query = serialize_query(filter);
    if query.is_empty() {
        route.to_string()
    } else {
        format!("{route}?{query}")
    }
}

/// Path component of a location, without query or fragment. A bare query
/// has no path and yields `""`.
pub fn route_part(location: &str) -> &str {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((route, _)) => route,
        None if without_fragment.contains('=') => "",
        None => without_fragment,
    }
}

fn query_part(location: &str) -> &str {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if without_fragment.contains('=') => without_fragment,
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_query() {
        let parsed = parse_location("/jobs?skill=python&page=3");
        assert!(parsed.corrections.is_empty());
        assert_eq!(parsed.filter.skill(), "python");
        assert_eq!(parsed.filter.page(), 3);
        assert_eq!(parsed.filter.days(), DaysWindow::DEFAULT);
        assert_eq!(parsed.filter.city(), None);
    }

    #[test]
    fn ignores_fragment_and_unknown_keys() {
        let parsed = parse_location("/jobs?q=data+eng&utm=x#top");
        assert_eq!(parsed.filter.text(), "data eng");
        assert!(parsed.corrections.is_empty());
    }

    #[test]
    fn bare_query_is_accepted() {
        assert_eq!(parse_location("city=Austin").filter.city(), Some("Austin"));
    }

    #[test]
    fn route_part_strips_query() {
        assert_eq!(route_part("/jobs?q=x"), "/jobs");
        assert_eq!(route_part("/jobs#a"), "/jobs");
        assert_eq!(route_part(""), "");
        assert_eq!(route_part("city=Austin"), "");
        assert_eq!(route_part("city=Austin#top"), "");
    }

    #[test]
    fn special_characters_are_escaped() {
        let filter = FilterState::new().with_text("c++ & rust");
        let query = serialize_query(&filter);
        assert_eq!(parse_location(&query).filter, filter);
    }
}
