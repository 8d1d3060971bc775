use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::filter::PAGE_SIZE;

/// State of one fetch target. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryResult<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(ErrorKind),
}

impl<T> QueryResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryResult::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            QueryResult::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorKind> {
        match self {
            QueryResult::Failure(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-2xx status (`status` set) or a network-level failure.
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// Body did not have the expected shape.
    Parse(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport {
                status: Some(code),
                message,
            } => write!(f, "HTTP {code}: {message}"),
            ErrorKind::Transport {
                status: None,
                message,
            } => write!(f, "network error: {message}"),
            ErrorKind::Parse(message) => write!(f, "unexpected response: {message}"),
        }
    }
}

/// A response body type with an optional shape check beyond deserialization.
///
/// `Default` is the degraded value a sub-query falls back to on failure.
pub trait Payload: DeserializeOwned + Default {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn decode<T: Payload>(value: serde_json::Value) -> Result<T, ErrorKind> {
    let payload: T = serde_json::from_value(value).map_err(|err| ErrorKind::Parse(err.to_string()))?;
    payload.check().map_err(ErrorKind::Parse)?;
    Ok(payload)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingPage {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<JobRecord>,
}

impl Default for ListingPage {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            page_size: PAGE_SIZE,
            items: Vec::new(),
        }
    }
}

impl Payload for ListingPage {
    fn check(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be at least 1".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be positive".to_string());
        }
        if self.items.len() > self.page_size as usize {
            return Err(format!(
                "{} items exceed page_size {}",
                self.items.len(),
                self.page_size
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "job_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub remote_flag: bool,
}

/// Row of `/api/cities`; older servers call the count `n`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CityCount {
    pub city: String,
    #[serde(default, alias = "n")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RisingSkill {
    pub skill: String,
    pub current: u64,
    pub baseline: u64,
    /// Fractional change, `0.42` is +42%. Absent when the baseline is zero.
    #[serde(default)]
    pub delta: Option<f64>,
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SalaryPercentiles {
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    #[serde(default)]
    pub n: u64,
}

impl Payload for Vec<String> {}
impl Payload for Vec<CityCount> {}
impl Payload for Vec<RisingSkill> {}
impl Payload for SalaryPercentiles {}

mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// RFC 3339, then naive date-times and bare dates read as UTC.
    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub(super) fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp {raw:?}")))
    }

    pub(super) fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp {raw:?}"))),
        }
    }
}
