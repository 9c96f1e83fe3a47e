//! Calendar-date helpers for rate lookups.
//!
//! Everything works on [`NaiveDate`] calendar dates. "Today" is the UTC date,
//! so a browser in a far-off timezone never asks for a rate one day early or
//! late relative to the publication calendar.

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};

/// The current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a form date (`YYYY-MM-DD`).
///
/// Surrounding whitespace is ignored and the date part of an ISO timestamp
/// (`2024-03-15T10:00:00Z`) is accepted. Anything else yields `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    let date_part = match input.len() {
        10 => input,
        n if n > 10 && matches!(input.as_bytes()[10], b'T' | b' ') => input.get(..10)?,
        _ => return None,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Monday to Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The last weekday strictly before `reference` (or before `today` when no
/// reference date is available).
///
/// Holidays are not known here; a rate lookup walks further back when the
/// source has nothing for the returned day.
pub fn previous_business_day(reference: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    let mut day = reference.unwrap_or(today);
    loop {
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => return day,
        }
        if is_business_day(day) {
            return day;
        }
    }
}

/// Shift `date` by a signed number of calendar days, weekends included.
///
/// Returns `None` only when the result leaves chrono's supported range.
pub fn shift_date(date: NaiveDate, offset_days: i64) -> Option<NaiveDate> {
    if offset_days >= 0 {
        date.checked_add_days(Days::new(offset_days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(offset_days.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_plain_date() {
        assert_eq!(parse_date("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("  2024-03-15 "), Some(date(2024, 3, 15)));
    }

    #[test]
    fn parse_timestamp_date_part() {
        assert_eq!(parse_date("2024-03-15T23:30:00Z"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn parse_malformed_is_none() {
        for input in ["", "2024-13-01", "2024-02-30", "15.03.2024", "yesterday", "2024-3-5", "ąąąąąąąąąąą"] {
            assert_eq!(parse_date(input), None, "{input:?}");
        }
    }

    #[test]
    fn saturday_and_sunday_go_to_friday() {
        // 2024-03-16 is a Saturday
        assert_eq!(previous_business_day(Some(date(2024, 3, 16)), date(2000, 1, 1)), date(2024, 3, 15));
        assert_eq!(previous_business_day(Some(date(2024, 3, 17)), date(2000, 1, 1)), date(2024, 3, 15));
    }

    #[test]
    fn monday_goes_to_friday() {
        assert_eq!(previous_business_day(Some(date(2024, 3, 18)), date(2000, 1, 1)), date(2024, 3, 15));
    }

    #[test]
    fn midweek_goes_to_previous_day() {
        assert_eq!(previous_business_day(Some(date(2024, 3, 20)), date(2000, 1, 1)), date(2024, 3, 19));
    }

    #[test]
    fn missing_reference_uses_today() {
        // 2024-03-18 is a Monday
        assert_eq!(previous_business_day(None, date(2024, 3, 18)), date(2024, 3, 15));
    }

    #[test]
    fn shift_crosses_month_and_weekend() {
        assert_eq!(shift_date(date(2024, 3, 1), -1), Some(date(2024, 2, 29)));
        assert_eq!(shift_date(date(2024, 3, 15), 2), Some(date(2024, 3, 17)));
        assert_eq!(shift_date(date(2024, 3, 15), 0), Some(date(2024, 3, 15)));
    }

    #[test]
    fn shift_out_of_range_is_none() {
        assert_eq!(shift_date(NaiveDate::MIN, -1), None);
        assert_eq!(shift_date(NaiveDate::MAX, 1), None);
    }
}
