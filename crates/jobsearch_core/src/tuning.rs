use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFacetParams {
    pub min_count: u32,
    pub limit: u32,
}

impl Default for CityFacetParams {
    fn default() -> Self {
        Self {
            min_count: 5,
            limit: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RisingParams {
    pub weeks: u32,
    pub baseline_weeks: u32,
    pub min_support: u32,
}

impl Default for RisingParams {
    fn default() -> Self {
        Self {
            weeks: 2,
            baseline_weeks: 2,
            min_support: 20,
        }
    }
}

/// Timing and widget parameters of the jobs screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    pub text_quiet: Duration,
    pub typeahead_quiet: Duration,
    pub salary_quiet: Duration,
    /// Characters needed before the typeahead asks the server.
    pub typeahead_min_len: usize,
    pub city_facet: CityFacetParams,
    pub rising: RisingParams,
    /// Rows shown by the rising-skills card.
    pub rising_rows: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            text_quiet: Duration::from_millis(250),
            typeahead_quiet: Duration::from_millis(200),
            salary_quiet: Duration::from_millis(250),
            typeahead_min_len: 2,
            city_facet: CityFacetParams::default(),
            rising: RisingParams::default(),
            rising_rows: 8,
        }
    }
}
