//! ISO 8601 timestamps as written in `check_time`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// A parsed `check_time`. Offsets are kept when given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTime {
    Date(NaiveDate),
    Local(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl CheckTime {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::Local(dt) => dt.date(),
            Self::Offset(dt) => dt.date_naive(),
        }
    }
}

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]` (`T` or space), with an optional
/// `Z` or `±HH:MM` suffix.
pub fn parse_iso8601(value: &str) -> Option<CheckTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(CheckTime::Offset(dt));
    }
    if let Some(naive) = value.strip_suffix('Z') {
        return parse_local(naive).map(|dt| CheckTime::Offset(dt.and_utc().fixed_offset()));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(CheckTime::Offset(dt));
    }
    if let Some(dt) = parse_local(value) {
        return Some(CheckTime::Local(dt));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(CheckTime::Date)
}

fn parse_local(value: &str) -> Option<NaiveDateTime> {
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
