//! Due date parsing and formatting.
//!
//! Due dates are stored as strings. A draft's due date is normalised to ISO
//! `YYYY-MM-DD` when it parses; anything else is kept as typed and treated
//! as "no valid date" wherever the list is ordered.

use chrono::{Datelike, Duration, NaiveDate};

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "mon".."sun", "monday".."sunday", "this friday", "next monday"
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return add_days(today, 1),
        "yesterday" => return add_days(today, -1),
        "end of week" | "eow" => return Some(start_end_of_week(today).1),
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.pred_opt());
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d') {
            if let Ok(days) = n.trim().parse::<i64>() {
                return add_days(today, days);
            }
        }
        if let Some(n) = rest.strip_suffix('w') {
            if let Ok(weeks) = n.trim().parse::<i64>() {
                return weeks.checked_mul(7).and_then(|days| add_days(today, days));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return add_days(today, ahead);
        }
        if s == format!("next {name}") {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return add_days(today, days);
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// `today` shifted by `days`, or `None` when the result is out of range.
fn add_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| today.checked_add_signed(d))
}

/// Normalise a draft due date: parsable input becomes ISO form, blank input
/// becomes empty, anything else is kept trimmed as typed.
pub fn normalise_due_input(s: &str, today: NaiveDate) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_due_input(trimmed, today) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => trimmed.to_string(),
    }
}

/// Parse a stored due date. Only ISO dates are valid; empty means absent.
pub fn parse_stored_due(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Monday and Sunday of the ISO week containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
///
/// Stored values that are not valid dates are shown as typed.
pub fn format_due_relative(due_date: &str, today: NaiveDate) -> String {
    if due_date.trim().is_empty() {
        return "-".into();
    }
    let Some(d) = parse_stored_due(due_date) else {
        return due_date.to_string();
    };
    let days = (d - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {n}d"),
        n => format!("{}d late", -n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_parse_keywords() {
        let today = wednesday();
        assert_eq!(parse_due_input("today", today), Some(today));
        assert_eq!(parse_due_input("Tomorrow", today), NaiveDate::from_ymd_opt(2024, 5, 16));
        assert_eq!(parse_due_input("in 3d", today), NaiveDate::from_ymd_opt(2024, 5, 18));
        assert_eq!(parse_due_input("in 2w", today), NaiveDate::from_ymd_opt(2024, 5, 29));
        assert_eq!(parse_due_input("eom", today), NaiveDate::from_ymd_opt(2024, 5, 31));
        assert_eq!(parse_due_input("eow", today), NaiveDate::from_ymd_opt(2024, 5, 19));
    }

    #[test]
    fn test_parse_out_of_range_offsets() {
        let today = wednesday();
        assert_eq!(parse_due_input("in 1000000000d", today), None);
        assert_eq!(parse_due_input("in 99999999999999w", today), None);
        assert_eq!(parse_due_input("in -9223372036854775808d", today), None);
        assert_eq!(normalise_due_input("in 1000000000d", today), "in 1000000000d");
    }

    #[test]
    fn test_parse_weekdays() {
        let today = wednesday();
        assert_eq!(parse_due_input("fri", today), NaiveDate::from_ymd_opt(2024, 5, 17));
        assert_eq!(parse_due_input("wednesday", today), Some(today));
        assert_eq!(parse_due_input("next wed", today), NaiveDate::from_ymd_opt(2024, 5, 22));
        assert_eq!(parse_due_input("next monday", today), NaiveDate::from_ymd_opt(2024, 5, 27));
    }

    #[test]
    fn test_end_of_month_in_december() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
        assert_eq!(parse_due_input("end of month", today), NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_normalise() {
        let today = wednesday();
        assert_eq!(normalise_due_input("", today), "");
        assert_eq!(normalise_due_input("  ", today), "");
        assert_eq!(normalise_due_input("tomorrow", today), "2024-05-16");
        assert_eq!(normalise_due_input("2024-06-01", today), "2024-06-01");
        assert_eq!(normalise_due_input(" soonish ", today), "soonish");
    }

    #[test]
    fn test_format_relative() {
        let today = wednesday();
        assert_eq!(format_due_relative("", today), "-");
        assert_eq!(format_due_relative("2024-05-15", today), "today");
        assert_eq!(format_due_relative("2024-05-16", today), "tomorrow");
        assert_eq!(format_due_relative("2024-05-20", today), "in 5d");
        assert_eq!(format_due_relative("2024-05-13", today), "2d late");
        assert_eq!(format_due_relative("soonish", today), "soonish");
    }
}
