//! Due date parsing.
//!
//! Due dates are entered as compact `DDMM` strings and resolved to the next
//! occurrence of that day and month on or after "today". The caller supplies
//! "today" so the roll-forward is reproducible.

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// Check that `input` is a `DDMM` string naming a real date in today's year.
///
/// Never fails loudly: any malformed input yields `false`.
pub fn validate(input: &str, today: NaiveDate) -> bool {
    let Some((day, month)) = split_ddmm(input) else {
        return false;
    };
    NaiveDate::from_ymd_opt(today.year(), month, day).is_some()
}

/// Resolve a validated `DDMM` string to the first matching date not before `today`.
///
/// Call [`validate`] first. Unvalidated input yields `MalformedDate`.
pub fn convert(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let (day, month) = split_ddmm(input).ok_or_else(|| Error::MalformedDate(input.to_string()))?;
    let mut year = today.year();
    let mut due = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::MalformedDate(input.to_string()))?;

    // 29 Feb only exists in leap years; skip the years where it does not.
    while due < today {
        year += 1;
        if let Some(next) = NaiveDate::from_ymd_opt(year, month, day) {
            due = next;
        }
    }

    Ok(due)
}

/// Validate then convert an optional `DDMM` string.
pub fn resolve(input: Option<&str>, today: NaiveDate) -> Result<Option<NaiveDate>> {
    match input {
        None => Ok(None),
        Some(raw) => {
            if !validate(raw, today) {
                return Err(Error::InvalidDueDate(raw.to_string()));
            }
            convert(raw, today).map(Some)
        }
    }
}

fn split_ddmm(input: &str) -> Option<(u32, u32)> {
    if input.len() != 4 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = input[..2].parse().ok()?;
    let month = input[2..].parse().ok()?;
    Some((day, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn end_of_year_stays_in_current_year() {
        let today = date(2024, 6, 1);
        assert!(validate("3112", today));
        assert_eq!(convert("3112", today).expect("convert"), date(2024, 12, 31));
    }

    #[test]
    fn past_date_rolls_to_next_year() {
        let today = date(2024, 6, 1);
        assert_eq!(convert("0101", today).expect("convert"), date(2025, 1, 1));
        assert_eq!(convert("3105", today).expect("convert"), date(2025, 5, 31));
    }

    #[test]
    fn today_is_not_in_the_past() {
        let today = date(2024, 6, 1);
        assert_eq!(convert("0106", today).expect("convert"), today);
    }

    #[test]
    fn leap_day_rejected_in_common_year() {
        assert!(!validate("2902", date(2023, 3, 1)));
        assert!(matches!(
            resolve(Some("2902"), date(2023, 3, 1)),
            Err(Error::InvalidDueDate(_))
        ));
    }

    #[test]
    fn leap_day_rolls_to_next_leap_year() {
        let today = date(2024, 3, 1);
        assert!(validate("2902", today));
        assert_eq!(convert("2902", today).expect("convert"), date(2028, 2, 29));
    }

    #[test]
    fn malformed_inputs_fail_closed() {
        let today = date(2024, 6, 1);
        for input in [
            "", "1", "123", "12345", "abcd", "12a4", "3102", "3104", "0013", "0000", "3200",
            " 112", "+112", "-112", "１２１２",
        ] {
            assert!(!validate(input, today), "{input:?} should be invalid");
        }
    }

    #[test]
    fn convert_rejects_unvalidated_input() {
        let today = date(2024, 6, 1);
        assert!(matches!(convert("xx01", today), Err(Error::MalformedDate(_))));
        assert!(matches!(convert("3102", today), Err(Error::MalformedDate(_))));
    }

    #[test]
    fn converted_dates_match_input_and_never_precede_today() {
        for today in [date(2023, 1, 1), date(2024, 2, 29), date(2024, 7, 15), date(2025, 12, 31)] {
            for month in 1..=12u32 {
                for day in 1..=31u32 {
                    let input = format!("{day:02}{month:02}");
                    if !validate(&input, today) {
                        continue;
                    }
                    let due = convert(&input, today).expect("convert");
                    assert_eq!(due.day(), day);
                    assert_eq!(due.month(), month);
                    assert!(due >= today, "{input} resolved to {due} before {today}");
                }
            }
        }
    }

    #[test]
    fn resolve_passes_through_missing_due() {
        assert_eq!(resolve(None, date(2024, 6, 1)).expect("resolve"), None);
    }
}
