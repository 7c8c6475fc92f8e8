use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scan_types::{
    AVAILABLE_STATUS, DATE_FORMAT, DateRange, ReservationType, SiteAvailabilityRecord,
};

/// Availability of one facility over a requested date range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityResult {
    /// Date to the set of sites bookable that night; every key lies inside the range
    pub available_by_date: BTreeMap<NaiveDate, BTreeSet<String>>,
    /// Reservation type of every site seen, first classification wins
    pub reservation_type_by_site: BTreeMap<String, ReservationType>,
    /// Whether any record declared a first-come-first-served site
    pub has_first_come_first_served_site: bool,
}

impl AvailabilityResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one month's site records, keeping only available nights inside `range`.
    ///
    /// Merging the same records twice leaves the result unchanged.
    pub fn merge_month(&mut self, records: &[SiteAvailabilityRecord], range: &DateRange) {
        for record in records {
            let reservation_type = record.reservation_type();
            if reservation_type == ReservationType::Fcfs {
                self.has_first_come_first_served_site = true;
            }
            self.reservation_type_by_site
                .entry(record.site_id.clone())
                .or_insert(reservation_type);

            for (raw_date, status) in &record.availabilities {
                if status != AVAILABLE_STATUS {
                    continue;
                }

                let Some(date) = normalize_date(raw_date) else {
                    warn!(
                        "Skipping unparseable date {:?} for site {}",
                        raw_date, record.site_id
                    );
                    continue;
                };

                if range.contains(date) {
                    self.available_by_date
                        .entry(date)
                        .or_default()
                        .insert(record.site_id.clone());
                }
            }
        }
    }

    /// Whether at least one night is available
    pub fn has_availability(&self) -> bool {
        !self.available_by_date.is_empty()
    }

    /// Site to the set of available nights
    pub fn available_by_site(&self) -> BTreeMap<String, BTreeSet<NaiveDate>> {
        let mut by_site: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for (date, sites) in &self.available_by_date {
            for site in sites {
                by_site.entry(site.clone()).or_default().insert(*date);
            }
        }
        by_site
    }

    /// Render the availability map in the requested layout
    pub fn view(&self, group_by: GroupBy) -> AvailabilityView {
        match group_by {
            GroupBy::Date => AvailabilityView::ByDate(self.available_by_date.clone()),
            GroupBy::Site => AvailabilityView::BySite(self.available_by_site()),
        }
    }
}

/// Calendar-date portion of a remote date key such as `2025-06-01T00:00:00Z`
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Layout of the availability map in responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// `{date: [site, ...]}`
    #[default]
    Date,
    /// `{site: [date, ...]}`
    Site,
}

/// Availability map keyed either by date or by site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AvailabilityView {
    /// Date to available sites
    ByDate(BTreeMap<NaiveDate, BTreeSet<String>>),
    /// Site to available dates
    BySite(BTreeMap<String, BTreeSet<NaiveDate>>),
}

impl AvailabilityView {
    /// An empty view in the given layout
    pub fn empty(group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Date => AvailabilityView::ByDate(BTreeMap::new()),
            GroupBy::Site => AvailabilityView::BySite(BTreeMap::new()),
        }
    }
}
