//! Shared traits, enums and parsing helpers for finance records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::period::Period;

/// Category label applied to records saved without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Exposes the caller-generated identifier of a stored record.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a common contract for retrieving non-negative amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Records that can be placed in a calendar month.
pub trait Periodic {
    fn falls_in(&self, period: Period) -> bool;
}

/// Converts an entity into a one-line label for listings.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Direction of a money flow. Serialized as `income` / `expense`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowKind::Income => "income",
            FlowKind::Expense => "expense",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlowKind::Income => "Income",
            FlowKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(FlowKind::Income),
            "expense" => Ok(FlowKind::Expense),
            other => Err(format!("unknown flow type `{other}`")),
        }
    }
}

/// Returns `category` unless it is blank, in which case [`UNCATEGORIZED`].
pub fn effective_category(category: &str) -> &str {
    if category.trim().is_empty() {
        UNCATEGORIZED
    } else {
        category
    }
}

/// Parses a stored calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps. Anything else yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|stamp| stamp.date())
}

/// Reads an amount stored either as a JSON number or as numeric text.
///
/// Blank, null or unparseable text reads as `0.0`, as do non-finite values.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    let value = match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(number)) => number,
        Some(RawAmount::Text(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}
