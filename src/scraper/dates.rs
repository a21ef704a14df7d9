use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// First day of every month in `[start, end]`, in ascending order.
///
/// The anchors are the fetch granularity of the historical endpoint: one
/// POST per (symbol, month). Fails with `InvalidRange` when `end < start`.
pub fn month_anchors(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    if end < start {
        return Err(Error::InvalidRange { start, end });
    }

    let months =
        (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);

    let mut anchors = Vec::with_capacity(months as usize + 1);
    let mut year = start.year();
    let mut month = start.month();
    for _ in 0..=months {
        anchors.push(first_of_month(year, month));
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    Ok(anchors)
}

/// `years` calendar years before `today`, clamping Feb 29 to Feb 28 on
/// non-leap target years.
pub fn years_ago(today: NaiveDate, years: u32) -> NaiveDate {
    let year = today.year() - years as i32;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        .expect("clamped day is a valid date")
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is a valid date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn anchor_count_matches_month_span() {
        let anchors = month_anchors(d(2023, 11, 15), d(2024, 2, 3)).unwrap();
        assert_eq!(
            anchors,
            vec![d(2023, 11, 1), d(2023, 12, 1), d(2024, 1, 1), d(2024, 2, 1)]
        );
    }

    #[test]
    fn full_year_yields_twelve_anchors() {
        let anchors = month_anchors(d(2024, 1, 1), d(2024, 12, 31)).unwrap();
        assert_eq!(anchors.len(), 12);
        assert!(anchors.windows(2).all(|w| w[0] < w[1]));
        assert!(anchors.iter().all(|a| a.day() == 1));
    }

    #[test]
    fn same_month_is_degenerate_single_anchor() {
        let anchors = month_anchors(d(2024, 6, 5), d(2024, 6, 25)).unwrap();
        assert_eq!(anchors, vec![d(2024, 6, 1)]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = month_anchors(d(2024, 3, 1), d(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn years_ago_clamps_leap_day() {
        assert_eq!(years_ago(d(2024, 2, 29), 1), d(2023, 2, 28));
        assert_eq!(years_ago(d(2025, 8, 7), 5), d(2020, 8, 7));
    }
}
