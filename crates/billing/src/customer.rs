use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use retail_core::{DomainError, DomainResult};

/// Customer classification driving the tier discount.
///
/// Parsed case-insensitively from free text. Values that match no known
/// category are kept verbatim in `Other` and earn no tier discount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomerType {
    Employee,
    Affiliate,
    Regular,
    Other(String),
}

impl CustomerType {
    /// Parse a raw customer type. Missing or blank input means `Regular`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return CustomerType::Regular;
        };

        match raw.to_uppercase().as_str() {
            "EMPLOYEE" => CustomerType::Employee,
            "AFFILIATE" => CustomerType::Affiliate,
            "REGULAR" => CustomerType::Regular,
            _ => CustomerType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CustomerType::Employee => "EMPLOYEE",
            CustomerType::Affiliate => "AFFILIATE",
            CustomerType::Regular => "REGULAR",
            CustomerType::Other(raw) => raw,
        }
    }
}

impl From<String> for CustomerType {
    fn from(value: String) -> Self {
        CustomerType::parse(Some(&value))
    }
}

impl From<CustomerType> for String {
    fn from(value: CustomerType) -> Self {
        match value {
            CustomerType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The customer a bill is issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub identity: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub customer_type: CustomerType,
    #[serde(rename = "registrationDate")]
    pub registered_at: DateTime<Utc>,
}

impl CustomerProfile {
    pub fn new(
        identity: impl Into<String>,
        display_name: impl Into<String>,
        customer_type: CustomerType,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            customer_type,
            registered_at,
        }
    }
}

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a customer registration date.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with an offset (`2021-03-01T10:00:00+03:00`)
/// - ISO-8601 local date-time, read as UTC (`2021-03-01T10:00:00.123`)
/// - bare date, read as midnight UTC (`2021-03-01`)
pub fn parse_registration_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            DomainError::invalid_date(format!(
                "registrationDate '{raw}' is not an ISO-8601 date-time (expected e.g. 2025-01-11T10:04:23)"
            ))
        })
}
