use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by requests, responses and the remote API (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Status tag the remote API uses for a bookable night
pub const AVAILABLE_STATUS: &str = "Available";

/// Reservation service tag the remote API uses for first-come-first-served sites
pub const FCFS_RESERVATION_SERVICE: &str = "fcfs";

/// Inclusive range of calendar dates requested by a caller.
///
/// Constructing one guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from two dates, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScanError> {
        if start > end {
            return Err(ScanError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, ScanError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// First night of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last night of the range (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range, both bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate, ScanError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ScanError::InvalidDate(value.to_string()))
}

/// How a site is booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationType {
    /// Bookable in advance through the online reservation system
    Online,
    /// First-come-first-served, not bookable in advance
    Fcfs,
}

/// Raw availability for one site over one month, as returned by the remote API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteAvailabilityRecord {
    /// Provider-assigned site identifier
    pub site_id: String,
    /// Reservation service declared for the site (`fcfs` for walk-up sites)
    pub reservation_service: Option<String>,
    /// Date (possibly with a time-of-day suffix) to status tag
    pub availabilities: HashMap<String, String>,
}

impl SiteAvailabilityRecord {
    /// Reservation type declared by this record
    pub fn reservation_type(&self) -> ReservationType {
        match self.reservation_service.as_deref() {
            Some(FCFS_RESERVATION_SERVICE) => ReservationType::Fcfs,
            _ => ReservationType::Online,
        }
    }
}

/// Outcome of fetching one month for one facility
#[derive(Debug, Clone)]
pub enum MonthOutcome {
    /// The month was fetched and parsed
    Fetched {
        /// First day of the month
        month: NaiveDate,
        /// Site records for the month
        records: Vec<SiteAvailabilityRecord>,
    },
    /// The fetch failed; nothing is recorded for this month
    FetchFailed {
        /// First day of the month
        month: NaiveDate,
        /// Why the fetch failed
        reason: FetchError,
    },
}

impl MonthOutcome {
    /// First day of the month this outcome covers
    pub fn month(&self) -> NaiveDate {
        match self {
            MonthOutcome::Fetched { month, .. } | MonthOutcome::FetchFailed { month, .. } => *month,
        }
    }
}

/// Failure to fetch one month of availability from the remote API
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The fetch did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Rate limited by the remote API
    #[error("Rate limited by external API")]
    RateLimited,

    /// The remote API does not know the facility or month
    #[error("Not found")]
    NotFound,

    /// Any other non-success status
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The response body could not be parsed
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Custom error type for scan operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A date string is not a well-formed `YYYY-MM-DD` calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Start date is after the end date
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start
        start: NaiveDate,
        /// Requested end
        end: NaiveDate,
    },

    /// Facility id cannot be queried
    #[error("Invalid facility id: {0:?}")]
    InvalidFacilityId(String),

    /// Every month of the range failed to fetch
    #[error("All {attempted} month fetches failed, last error: {last_error}")]
    AllMonthsFailed {
        /// Number of months attempted
        attempted: usize,
        /// Reason of the last failure
        last_error: FetchError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let err = DateRange::parse("2025-06-07", "2025-06-01").unwrap_err();
        assert_eq!(
            err,
            ScanError::InvalidDateRange {
                start: date("2025-06-07"),
                end: date("2025-06-01"),
            }
        );
    }

    #[test]
    fn test_date_range_rejects_malformed_dates() {
        assert_eq!(
            DateRange::parse("2025-13-01", "2025-12-31").unwrap_err(),
            ScanError::InvalidDate("2025-13-01".to_string())
        );
        assert!(DateRange::parse("2025-02-30", "2025-03-01").is_err());
        assert!(DateRange::parse("June 1st", "2025-06-02").is_err());
    }

    #[test]
    fn test_date_range_contains_is_inclusive() {
        let range = DateRange::parse("2025-06-01", "2025-06-07").unwrap();
        assert!(range.contains(date("2025-06-01")));
        assert!(range.contains(date("2025-06-07")));
        assert!(!range.contains(date("2025-05-31")));
        assert!(!range.contains(date("2025-06-08")));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::parse("2025-06-01", "2025-06-01").unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(range.to_string(), "2025-06-01..2025-06-01");
    }

    #[test]
    fn test_reservation_type_from_record() {
        let mut record = SiteAvailabilityRecord {
            site_id: "001".to_string(),
            ..Default::default()
        };
        assert_eq!(record.reservation_type(), ReservationType::Online);

        record.reservation_service = Some("fcfs".to_string());
        assert_eq!(record.reservation_type(), ReservationType::Fcfs);

        record.reservation_service = Some("Site-Specific".to_string());
        assert_eq!(record.reservation_type(), ReservationType::Online);
    }

    #[test]
    fn test_reservation_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationType::Fcfs).unwrap(),
            "\"fcfs\""
        );
        assert_eq!(
            serde_json::to_string(&ReservationType::Online).unwrap(),
            "\"online\""
        );
    }
}
