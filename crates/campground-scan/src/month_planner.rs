use chrono::{Datelike, NaiveDate};

use crate::scan_types::DateRange;

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one starting at `month`, rolling December into January
fn next_month(month: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = match month.month() {
        12 => (month.year() + 1, 1),
        m => (month.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Months (as their first day) that together cover `range`, in ascending order.
///
/// The first element is the month containing `range.start()` and the last
/// is the month containing `range.end()`; the sequence is never empty.
pub fn months_in_range(range: &DateRange) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = Some(first_of_month(range.start()));

    while let Some(month) = current {
        if month > range.end() {
            break;
        }
        months.push(month);
        current = next_month(month);
    }

    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn months(start: &str, end: &str) -> Vec<NaiveDate> {
        months_in_range(&DateRange::parse(start, end).unwrap())
    }

    #[test]
    fn test_single_month() {
        assert_eq!(months("2025-06-01", "2025-06-07"), vec![date("2025-06-01")]);
        assert_eq!(months("2025-06-15", "2025-06-15"), vec![date("2025-06-01")]);
    }

    #[test]
    fn test_year_rollover() {
        assert_eq!(
            months("2024-12-20", "2025-01-05"),
            vec![date("2024-12-01"), date("2025-01-01")]
        );
    }

    #[test]
    fn test_end_on_first_of_month_includes_that_month() {
        assert_eq!(
            months("2025-06-30", "2025-07-01"),
            vec![date("2025-06-01"), date("2025-07-01")]
        );
    }

    #[test]
    fn test_long_range_is_strictly_increasing_and_bounded() {
        let start = date("2024-02-29");
        let end = date("2026-03-03");
        let result = months_in_range(&DateRange::new(start, end).unwrap());

        assert_eq!(result.len(), 26);
        assert_eq!(result.first(), Some(&date("2024-02-01")));
        assert_eq!(result.last(), Some(&date("2026-03-01")));
        assert!(result.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(result.iter().all(|m| m.day() == 1));
    }

    #[test]
    fn test_first_and_last_month_match_range_bounds() {
        let cases = [
            ("2025-01-31", "2025-02-01"),
            ("2025-03-10", "2025-12-31"),
            ("2023-11-30", "2024-02-29"),
        ];
        for (start, end) in cases {
            let result = months(start, end);
            let (start, end) = (date(start), date(end));
            assert_eq!(result[0], first_of_month(start));
            assert_eq!(result[result.len() - 1], first_of_month(end));
        }
    }

    #[test]
    fn test_next_month_rolls_year() {
        assert_eq!(next_month(date("2024-12-01")), Some(date("2025-01-01")));
        assert_eq!(next_month(date("2025-01-01")), Some(date("2025-02-01")));
    }
}
