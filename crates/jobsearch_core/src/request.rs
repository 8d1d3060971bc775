use std::fmt;

use crate::filter::FilterState;
use crate::tuning::{CityFacetParams, RisingParams};

pub const PATH_JOBS: &str = "/api/jobs";
pub const PATH_SKILL_SUGGEST: &str = "/api/skills/suggest";
pub const PATH_CITIES: &str = "/api/cities";
pub const PATH_RISING_SKILLS: &str = "/api/skills/rising";
pub const PATH_SALARY_BY_SKILL: &str = "/api/metrics/salary_by_skill";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(value) => f.write_str(value),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// A read-only API call: path plus named parameters. Absent parameters are
/// kept in the list so the request shape is visible, and are never sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
    pub path: &'static str,
    pub params: Vec<(&'static str, Option<ParamValue>)>,
}

impl ApiRequest {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: Option<ParamValue>) -> Self {
        self.params.push((name, value));
        self
    }

    /// Parameters that will actually be sent.
    pub fn present_params(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> + '_ {
        self.params
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (*name, value)))
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.present_params()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Primary listing. Sort is applied locally and is not sent.
    pub fn listing(filter: &FilterState) -> Self {
        Self::new(PATH_JOBS)
            .param("q", non_empty(filter.text()))
            .param("city", filter.city().map(ParamValue::from))
            .param("skill", non_empty(filter.skill()))
            .param("days", Some(filter.days().get().into()))
            .param("page", Some(filter.page().into()))
            .param("page_size", Some(filter.page_size().into()))
    }

    pub fn skill_suggestions(term: &str) -> Self {
        Self::new(PATH_SKILL_SUGGEST).param("term", Some(term.into()))
    }

    pub fn cities(facet: &CityFacetParams) -> Self {
        Self::new(PATH_CITIES)
            .param("min_count", Some(facet.min_count.into()))
            .param("limit", Some(facet.limit.into()))
    }

    pub fn rising_skills(rising: &RisingParams, city: Option<&str>) -> Self {
        Self::new(PATH_RISING_SKILLS)
            .param("weeks", Some(rising.weeks.into()))
            .param("baseline_weeks", Some(rising.baseline_weeks.into()))
            .param("min_support", Some(rising.min_support.into()))
            .param("city", city.map(ParamValue::from))
    }

    pub fn salary_by_skill(skill: &str, city: Option<&str>) -> Self {
        Self::new(PATH_SALARY_BY_SKILL)
            .param("skill", Some(skill.into()))
            .param("city", city.map(ParamValue::from))
    }
}

fn non_empty(value: &str) -> Option<ParamValue> {
    (!value.is_empty()).then(|| value.into())
}
