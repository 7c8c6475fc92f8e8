use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use campground_scan::{
    AggregateResponse, AvailabilityView, DATE_FORMAT, DateRange, FacilityReport, GroupBy,
    ReservationType, ScanError,
};
use serde::{Deserialize, Serialize, Serializer};
use validator::{Validate, ValidationErrors};

/// Request structure for checking availability across campgrounds
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    /// First night, `YYYY-MM-DD`
    #[validate(required, custom(function = "validate_iso_date"))]
    pub start_date: Option<String>,

    /// Last night (inclusive), `YYYY-MM-DD`
    #[validate(required, custom(function = "validate_iso_date"))]
    pub end_date: Option<String>,

    /// Facility ids to check, in display order
    #[validate(required)]
    pub campgrounds: Option<Vec<String>>,

    /// Layout of each availability map (`date` or `site`)
    #[serde(default)]
    pub group_by: GroupBy,
}

/// A validated availability request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    /// Requested nights
    pub range: DateRange,
    /// Facility ids to check
    pub campgrounds: Vec<String>,
    /// Layout of each availability map
    pub group_by: GroupBy,
}

impl CheckAvailabilityRequest {
    /// Validate the request and turn it into a query for the aggregator
    pub fn into_query(self) -> Result<AvailabilityQuery, ApiError> {
        self.validate().map_err(ApiError::from)?;

        let (Some(start_date), Some(end_date), Some(campgrounds)) =
            (self.start_date, self.end_date, self.campgrounds)
        else {
            return Err(ApiError::MissingParameter);
        };

        Ok(AvailabilityQuery {
            range: parse_range(&start_date, &end_date)?,
            campgrounds,
            group_by: self.group_by,
        })
    }
}

/// Request structure for validating a date selection
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatesRequest {
    /// First night, `YYYY-MM-DD`
    #[validate(required, custom(function = "validate_iso_date"))]
    pub start_date: Option<String>,

    /// Last night (inclusive), `YYYY-MM-DD`
    #[validate(required, custom(function = "validate_iso_date"))]
    pub end_date: Option<String>,
}

impl UpdateDatesRequest {
    /// Validate the request and return the selected range
    pub fn into_range(self) -> Result<DateRange, ApiError> {
        self.validate().map_err(ApiError::from)?;

        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(ApiError::MissingParameter);
        };

        parse_range(&start_date, &end_date)
    }
}

fn parse_range(start_date: &str, end_date: &str) -> Result<DateRange, ApiError> {
    DateRange::parse(start_date, end_date).map_err(|e| match e {
        ScanError::InvalidDateRange { .. } => ApiError::InvalidDateRange,
        _ => ApiError::InvalidDateFormat,
    })
}

/// Custom validation function for `YYYY-MM-DD` dates
fn validate_iso_date(value: &str) -> Result<(), validator::ValidationError> {
    chrono::NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_date_format"))
}

/// Per-facility entry of an availability response
#[derive(Debug, Serialize)]
pub struct FacilityAvailability {
    /// Display name of the campground
    pub name: String,

    /// Available nights in the requested layout
    pub availability: AvailabilityView,

    /// Reservation type of every site seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_types: Option<BTreeMap<String, ReservationType>>,

    /// Whether the campground has first-come-first-served sites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_come_first_served: Option<bool>,

    /// Why the check failed for this campground
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FacilityAvailability {
    fn from_report(report: FacilityReport, group_by: GroupBy) -> Self {
        match report.error {
            Some(error) => Self {
                name: report.name,
                availability: AvailabilityView::empty(group_by),
                reservation_types: None,
                is_first_come_first_served: None,
                error: Some(error),
            },
            None => Self {
                name: report.name,
                availability: report.result.view(group_by),
                is_first_come_first_served: Some(report.result.has_first_come_first_served_site),
                reservation_types: Some(report.result.reservation_type_by_site),
                error: None,
            },
        }
    }
}

/// Facility id to availability, serialized as an object in request order
#[derive(Debug, Default)]
pub struct FacilityResults(pub Vec<(String, FacilityAvailability)>);

impl FacilityResults {
    /// Entry for a facility id
    pub fn get(&self, facility_id: &str) -> Option<&FacilityAvailability> {
        self.0
            .iter()
            .find(|(id, _)| id == facility_id)
            .map(|(_, entry)| entry)
    }
}

impl Serialize for FacilityResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(id, entry)| (id, entry)))
    }
}

/// Response structure for an availability check
#[derive(Debug, Serialize)]
pub struct CheckAvailabilityResponse {
    /// Always true once the request passed validation
    pub success: bool,
    /// Per-campground availability
    pub results: FacilityResults,
    /// Whether any campground has an available night
    #[serde(rename = "foundAny")]
    pub found_any: bool,
}

impl CheckAvailabilityResponse {
    /// Shape an aggregate result for the wire
    pub fn from_aggregate(response: AggregateResponse, group_by: GroupBy) -> Self {
        let results = response
            .per_facility
            .into_iter()
            .map(|report| {
                let facility_id = report.facility_id.clone();
                (facility_id, FacilityAvailability::from_report(report, group_by))
            })
            .collect();

        Self {
            success: response.success,
            results: FacilityResults(results),
            found_any: response.found_any,
        }
    }
}

/// Errors rejected at the HTTP boundary before any availability check runs
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required field is absent
    #[error("Missing required parameters")]
    MissingParameter,

    /// A date is not `YYYY-MM-DD`
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDateFormat,

    /// Start date is after end date
    #[error("Invalid date range: startDate must not be after endDate")]
    InvalidDateRange,

    /// Body is not the expected JSON document
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl ApiError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingParameter => "missing-parameter",
            ApiError::InvalidDateFormat => "invalid-date-format",
            ApiError::InvalidDateRange => "invalid-date-range",
            ApiError::MalformedBody(_) => "malformed-body",
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let missing = errors
            .field_errors()
            .values()
            .flat_map(|field_errors| field_errors.iter())
            .any(|error| error.code == "required");

        if missing {
            ApiError::MissingParameter
        } else {
            ApiError::InvalidDateFormat
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
            "kind": self.kind()
        }))
    }
}
