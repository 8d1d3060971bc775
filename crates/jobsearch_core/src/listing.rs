//! Derived values over a listing page: pagination bounds, local ordering and
//! row presentation.

use crate::filter::SortMode;
use crate::query::JobRecord;

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// One-based inclusive row range covered by `page`, or `None` when the page
/// holds no rows of `total`.
pub fn showing_range(page: u32, page_size: u32, total: u64) -> Option<(u64, u64)> {
    let first = u64::from(page.max(1) - 1) * u64::from(page_size) + 1;
    if total == 0 || page_size == 0 || first > total {
        return None;
    }
    let last = (u64::from(page.max(1)) * u64::from(page_size)).min(total);
    Some((first, last))
}

/// Rows as displayed: pure-remote postings are hidden while a city is
/// selected, then a stable case-insensitive sort for the title and company
/// modes. `Newest` keeps the API order.
pub fn arrange_rows(items: &[JobRecord], sort: SortMode, city_selected: bool) -> Vec<&JobRecord> {
    let mut rows: Vec<&JobRecord> = items
        .iter()
        .filter(|job| !(city_selected && job.remote_flag))
        .collect();
    match sort {
        SortMode::Newest => {}
        SortMode::TitleAsc => rows.sort_by_cached_key(|job| job.title.to_lowercase()),
        SortMode::CompanyAsc => rows.sort_by_cached_key(|job| job.company.to_lowercase()),
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkMode {
    Remote,
    Hybrid,
    InOffice,
}

impl WorkMode {
    pub fn label(self) -> &'static str {
        match self {
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::InOffice => "In-Office",
        }
    }
}

const IN_OFFICE_WORDS: [&str; 6] = ["office", "inoffice", "onsite", "on-site", "on site", "in office"];

pub fn work_mode(city: Option<&str>, remote: bool) -> Option<WorkMode> {
    if remote {
        return Some(WorkMode::Remote);
    }
    let lower = city.unwrap_or_default().to_ascii_lowercase();
    if find_word(&lower, "hybrid").is_some() {
        return Some(WorkMode::Hybrid);
    }
    IN_OFFICE_WORDS
        .iter()
        .any(|word| find_word(&lower, word).is_some())
        .then_some(WorkMode::InOffice)
}

/// Human place label. Strips "Home based -", "... office", "Remote - ..." and
/// "... hybrid" decorations from the city and falls back to region/country.
pub fn display_place(
    city: Option<&str>,
    region: Option<&str>,
    country: Option<&str>,
    remote: bool,
) -> String {
    let cleaned = city.map(strip_decorations).unwrap_or_default();
    if !cleaned.is_empty() {
        return cleaned.to_string();
    }
    if remote {
        return match country.filter(|c| !c.is_empty()) {
            Some(country) => format!("Remote - {country}"),
            None => "Remote".to_string(),
        };
    }
    let parts: Vec<&str> = [region, country]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        "N/A".to_string()
    } else {
        parts.join(", ")
    }
}

fn strip_decorations(city: &str) -> &str {
    let mut place = city.trim();

    // ASCII lowercasing keeps byte offsets aligned with `place`.
    let lower = place.to_ascii_lowercase();
    if let Some(rest) = lower
        .strip_prefix("home")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix("based"))
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('-'))
    {
        place = place[place.len() - rest.len()..].trim_start();
    }

    let lower = place.to_ascii_lowercase();
    let cut = [
        find_word(&lower, "office"),
        find_remote_dash(&lower),
        find_word(&lower, "hybrid"),
    ]
    .into_iter()
    .flatten()
    .min();
    match cut {
        Some(index) => place[..index].trim_end(),
        None => place,
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// First occurrence of `word` in `haystack` bounded by non-word characters.
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    haystack.match_indices(word).map(|(index, _)| index).find(|&index| {
        let end = index + word.len();
        let before_ok = index == 0 || !is_word_byte(bytes[index - 1]);
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        before_ok && after_ok
    })
}

/// First "remote" followed by optional spaces and a dash.
fn find_remote_dash(haystack: &str) -> Option<usize> {
    haystack
        .match_indices("remote")
        .map(|(index, _)| index)
        .find(|&index| haystack[index + "remote".len()..].trim_start().starts_with('-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_with_floor_of_one() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(1, 20), 1);
    }

    #[test]
    fn showing_range_covers_last_partial_page() {
        assert_eq!(showing_range(3, 20, 45), Some((41, 45)));
        assert_eq!(showing_range(1, 20, 45), Some((1, 20)));
        assert_eq!(showing_range(4, 20, 45), None);
        assert_eq!(showing_range(1, 20, 0), None);
    }

    #[test]
    fn clamp_page_stays_in_bounds() {
        assert_eq!(clamp_page(5, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 0), 1);
    }

    #[test]
    fn work_mode_from_flag_and_keywords() {
        assert_eq!(work_mode(Some("Berlin"), true), Some(WorkMode::Remote));
        assert_eq!(work_mode(Some("Austin (Hybrid)"), false), Some(WorkMode::Hybrid));
        assert_eq!(work_mode(Some("NYC Office"), false), Some(WorkMode::InOffice));
        assert_eq!(work_mode(Some("Denver, On-site"), false), Some(WorkMode::InOffice));
        assert_eq!(work_mode(Some("Officeville"), false), None);
        assert_eq!(work_mode(None, false), None);
    }

    #[test]
    fn display_place_strips_decorations() {
        assert_eq!(display_place(Some("Home based - Leeds"), None, None, false), "Leeds");
        assert_eq!(display_place(Some("London Office"), None, None, false), "London");
        assert_eq!(display_place(Some("Paris hybrid"), None, None, false), "Paris");
        assert_eq!(display_place(Some("Lisbon Remote - EU"), None, None, false), "Lisbon");
    }

    #[test]
    fn display_place_falls_back_to_region_and_country() {
        assert_eq!(display_place(None, Some("CA"), Some("US"), false), "CA, US");
        assert_eq!(display_place(Some("  "), None, Some("US"), true), "Remote - US");
        assert_eq!(display_place(Some("Remote - anywhere"), None, None, true), "Remote");
        assert_eq!(display_place(None, None, None, false), "N/A");
    }
}
