use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::availability::AvailabilityResult;
use crate::campground_directory::CampgroundDirectory;
use crate::month_planner::months_in_range;
use crate::scan_types::*;

/// Source of one month of availability records for a facility
#[async_trait::async_trait]
pub trait MonthFetcher: Send + Sync {
    /// Fetch the site records for the month starting at `month`
    async fn fetch_month(
        &self,
        facility_id: &str,
        month: NaiveDate,
    ) -> Result<Vec<SiteAvailabilityRecord>, FetchError>;
}

/// Tuning for the availability aggregator
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Upper bound on a single month fetch (default: 30 seconds)
    pub fetch_timeout: Duration,

    /// Month fetches in flight per facility (default: 2)
    pub max_concurrent_fetches: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            max_concurrent_fetches: 2,
        }
    }
}

/// Result of checking one facility inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityReport {
    /// Facility identifier as requested
    pub facility_id: String,
    /// Display name from the campground directory
    pub name: String,
    /// Merged availability, empty when the check failed
    pub result: AvailabilityResult,
    /// Failure description when the check failed
    pub error: Option<String>,
}

/// Combined result of checking several facilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResponse {
    /// Batch-level success; per-facility failures are reported inline
    pub success: bool,
    /// One report per distinct facility, in request order
    pub per_facility: Vec<FacilityReport>,
    /// Whether any facility has at least one available night
    pub found_any: bool,
}

impl AggregateResponse {
    /// Report for a facility, if it was part of the batch
    pub fn get(&self, facility_id: &str) -> Option<&FacilityReport> {
        self.per_facility
            .iter()
            .find(|report| report.facility_id == facility_id)
    }
}

/// Drives month planning, fetching and merging for one or many facilities
pub struct AvailabilityAggregator {
    fetcher: Arc<dyn MonthFetcher>,
    directory: Arc<CampgroundDirectory>,
    config: AggregatorConfig,
}

impl AvailabilityAggregator {
    /// Create an aggregator over a month fetcher and a name directory
    pub fn new(
        fetcher: Arc<dyn MonthFetcher>,
        directory: CampgroundDirectory,
        config: Option<AggregatorConfig>,
    ) -> Self {
        Self {
            fetcher,
            directory: Arc::new(directory),
            config: config.unwrap_or_default(),
        }
    }

    /// The campground directory used for display names
    pub fn directory(&self) -> &CampgroundDirectory {
        &self.directory
    }

    /// Fetch every month covering `range`, returning outcomes in month order
    pub async fn fetch_months(&self, facility_id: &str, range: &DateRange) -> Vec<MonthOutcome> {
        let months = months_in_range(range);
        debug!(
            "Fetching {} month(s) for facility {} ({})",
            months.len(),
            facility_id,
            range
        );

        stream::iter(months)
            .map(|month| self.fetch_one(facility_id, month))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .collect::<Vec<_>>()
            .await
    }

    async fn fetch_one(&self, facility_id: &str, month: NaiveDate) -> MonthOutcome {
        let fetch = self.fetcher.fetch_month(facility_id, month);
        match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
            Ok(Ok(records)) => MonthOutcome::Fetched { month, records },
            Ok(Err(reason)) => MonthOutcome::FetchFailed { month, reason },
            Err(_) => MonthOutcome::FetchFailed {
                month,
                reason: FetchError::Timeout,
            },
        }
    }

    /// Availability of one facility over `range`.
    ///
    /// A month that fails to fetch contributes nothing; the check only fails
    /// when no month could be fetched at all.
    pub async fn check_facility(
        &self,
        facility_id: &str,
        range: &DateRange,
    ) -> Result<AvailabilityResult, ScanError> {
        if facility_id.trim().is_empty() {
            return Err(ScanError::InvalidFacilityId(facility_id.to_string()));
        }

        let outcomes = self.fetch_months(facility_id, range).await;
        let attempted = outcomes.len();
        let mut result = AvailabilityResult::new();
        let mut last_error = None;
        let mut failures = 0;

        for outcome in outcomes {
            match outcome {
                MonthOutcome::Fetched { month, records } => {
                    debug!(
                        "Merging {} site record(s) for facility {} month {}",
                        records.len(),
                        facility_id,
                        month
                    );
                    result.merge_month(&records, range);
                }
                MonthOutcome::FetchFailed { month, reason } => {
                    warn!(
                        "Failed to fetch facility {} month {}: {}",
                        facility_id, month, reason
                    );
                    failures += 1;
                    last_error = Some(reason);
                }
            }
        }

        match last_error {
            Some(last_error) if failures == attempted => {
                Err(ScanError::AllMonthsFailed {
                    attempted,
                    last_error,
                })
            }
            _ => Ok(result),
        }
    }

    /// Check every facility in order and fold the results.
    ///
    /// Each facility is attempted regardless of earlier outcomes; a failing
    /// facility is reported with an empty result and an error message.
    /// Repeated ids are checked once.
    pub async fn check_many(&self, facility_ids: &[String], range: &DateRange) -> AggregateResponse {
        let mut seen = HashSet::new();
        let mut per_facility = Vec::with_capacity(facility_ids.len());

        for facility_id in facility_ids {
            if !seen.insert(facility_id.as_str()) {
                continue;
            }

            let name = self.directory.name_for(facility_id);
            let report = match self.check_facility(facility_id, range).await {
                Ok(result) => FacilityReport {
                    facility_id: facility_id.clone(),
                    name,
                    result,
                    error: None,
                },
                Err(e) => {
                    warn!("Error checking availability for facility {}: {}", facility_id, e);
                    FacilityReport {
                        facility_id: facility_id.clone(),
                        name,
                        result: AvailabilityResult::new(),
                        error: Some(e.to_string()),
                    }
                }
            };
            per_facility.push(report);
        }

        let found_any = per_facility
            .iter()
            .any(|report| report.result.has_availability());

        info!(
            "Checked {} facilities for {}, availability found: {}",
            per_facility.len(),
            range,
            found_any
        );

        AggregateResponse {
            success: true,
            per_facility,
            found_any,
        }
    }
}
