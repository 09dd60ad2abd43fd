//! Order DTOs
//!
//! The cached domain object and the query used to look it up.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An order as accepted by `POST /Create` and returned by `GET /GetOrder`.
///
/// Serialized in camelCase. `orderDate` is written as RFC 3339 and read
/// leniently, see [`deserialize_order_date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    #[serde(deserialize_with = "deserialize_order_date")]
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Validates the order
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.order_number.trim().is_empty() {
            return Some("Order number cannot be empty".to_string());
        }
        None
    }
}

// == Order Date ==
const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an order date.
///
/// Accepts an RFC 3339 timestamp, a date-time without offset, or a bare
/// `YYYY-MM-DD` date. Values without an offset are taken as UTC, a bare date
/// as midnight.
pub fn parse_order_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_order_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_order_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid order date '{}'", raw)))
}

/// Query string for `GET /GetOrder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderQuery {
    pub order_id: i32,
}
