//! Purchase date parsing and range checks

use super::Reason;
use chrono::{Datelike, Duration, Local, NaiveDate};

/// Field order of a date layout
#[derive(Debug, Clone, Copy)]
enum Order {
    YearMonthDay,
    DayMonthYear,
    MonthDayYear,
}

/// Layouts tried in priority order; the first successful parse wins
const LAYOUTS: [(char, Order); 6] = [
    ('-', Order::YearMonthDay),
    ('-', Order::DayMonthYear),
    ('-', Order::MonthDayYear),
    ('/', Order::YearMonthDay),
    ('/', Order::DayMonthYear),
    ('/', Order::MonthDayYear),
];

const OLDEST_YEAR: i32 = 1990;
const MAX_AGE_DAYS: i64 = 365 * 10;

fn numeric(part: &str, min_width: usize, max_width: usize) -> Option<u32> {
    let width = part.len();
    if width < min_width || width > max_width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn parse_layout(input: &str, separator: char, order: Order) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split(separator).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let (year, month, day) = match order {
        Order::YearMonthDay => (a, b, c),
        Order::DayMonthYear => (c, b, a),
        Order::MonthDayYear => (c, a, b),
    };
    let year = i32::try_from(numeric(year, 4, 4)?).ok()?;
    NaiveDate::from_ymd_opt(year, numeric(month, 1, 2)?, numeric(day, 1, 2)?)
}

/// Parses a purchase date against today's local date
pub fn validate_purchase_date(input: &str) -> Result<NaiveDate, Reason> {
    validate_purchase_date_on(input, Local::now().date_naive())
}

/// Parses a purchase date and checks it against `today`
///
/// Accepts `Y-M-D`, `D-M-Y`, `M-D-Y` and the same with `/`, in that order.
/// The returned date displays as `YYYY-MM-DD`.
pub fn validate_purchase_date_on(input: &str, today: NaiveDate) -> Result<NaiveDate, Reason> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Reason::DateRequired);
    }

    let date = LAYOUTS
        .iter()
        .find_map(|(separator, order)| parse_layout(input, *separator, *order))
        .ok_or(Reason::DateFormat)?;

    if date.year() < OLDEST_YEAR {
        return Err(Reason::DateBefore1990(date.year()));
    }
    if date > today {
        return Err(Reason::DateInFuture(date));
    }
    if date <= today - Duration::days(MAX_AGE_DAYS) {
        return Err(Reason::DateTooOld(date));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn check(input: &str) -> Result<String, Reason> {
        validate_purchase_date_on(input, today()).map(|d| d.to_string())
    }

    #[test]
    fn test_layouts_normalize() {
        assert_eq!(check("2024-12-31").unwrap(), "2024-12-31");
        assert_eq!(check("31-12-2024").unwrap(), "2024-12-31");
        assert_eq!(check("12-31-2024").unwrap(), "2024-12-31");
        assert_eq!(check("2024/1/5").unwrap(), "2024-01-05");
        assert_eq!(check("31/12/2024").unwrap(), "2024-12-31");
        assert_eq!(check("12/31/2024").unwrap(), "2024-12-31");
    }

    #[test]
    fn test_day_month_takes_priority_over_month_day() {
        // ambiguous: D-M-Y is tried before M-D-Y
        assert_eq!(check("05-04-2024").unwrap(), "2024-04-05");
    }

    #[test]
    fn test_impossible_date_rejected_for_every_layout() {
        assert_eq!(check("2024-13-40"), Err(Reason::DateFormat));
        assert_eq!(check("2024/13/40"), Err(Reason::DateFormat));
        assert_eq!(check("yesterday"), Err(Reason::DateFormat));
        assert_eq!(check(""), Err(Reason::DateRequired));
    }

    #[test]
    fn test_range_checks() {
        assert_eq!(check("1989-05-01"), Err(Reason::DateBefore1990(1989)));

        let tomorrow = today() + Duration::days(1);
        assert_eq!(
            check(&tomorrow.to_string()),
            Err(Reason::DateInFuture(tomorrow))
        );

        let eleven_years = today() - Duration::days(365 * 11);
        assert_eq!(
            check(&eleven_years.to_string()),
            Err(Reason::DateTooOld(eleven_years))
        );

        assert_eq!(check(&today().to_string()).unwrap(), "2025-06-01");
    }
}
