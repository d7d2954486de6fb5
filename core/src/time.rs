use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use anyhow::{anyhow, Result};

/// Resolves a human day expression against `today`.
///
/// Accepts `today`, `yesterday`, `+Nd`/`-Nd`/`+Nw`/`-Nw`, weekday names
/// (`fri` is the most recent Friday, today included; `2:fri` the one a week
/// before) and plain `YYYY-MM-DD`.
pub fn parse_day(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" | "now" => return Ok(today),
        "yesterday" | "yes" => {
            return today.pred_opt().ok_or_else(|| anyhow!("Date out of range: {}", input))
        }
        _ => {}
    }

    // 2. Relative offsets
    if input.starts_with('+') || input.starts_with('-') {
        let offset = parse_offset(input)?;
        return today
            .checked_add_signed(offset)
            .ok_or_else(|| anyhow!("Date out of range: {}", input));
    }

    // 3. Plain dates
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }

    // 4. Weekdays, looking backwards
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_weekday_str(day_str) {
            if count < 1 {
                return Err(anyhow!("Weekday count must be at least 1: {}", input));
            }
            let mut days_back = today.weekday().num_days_from_sunday() as i64
                - target.num_days_from_sunday() as i64;
            if days_back < 0 {
                days_back += 7;
            }
            return (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_back))
                .and_then(Duration::try_days)
                .and_then(|back| today.checked_sub_signed(back))
                .ok_or_else(|| anyhow!("Date out of range: {}", input));
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

/// Range bounds treat an empty string as unbounded.
pub fn parse_range_bound(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_day(input, today).map(Some)
}

/// Combines a calendar day with a local clock time.
pub fn stamp(date: NaiveDate, time_of_day: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time_of_day);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Falls inside a DST gap
        None => Utc.from_utc_datetime(&naive),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn time_of_day() -> NaiveTime {
    Local::now().time()
}

fn parse_offset(input: &str) -> Result<Duration> {
    let sign = if input.starts_with('-') { -1 } else { 1 };
    let body = &input[1..];
    if body.is_empty() {
        return Err(anyhow!("Invalid relative format: {}", input));
    }

    let unit = body.chars().last().ok_or_else(|| anyhow!("Invalid relative format: {}", input))?;
    let num_str = &body[..body.len() - unit.len_utf8()];
    let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;

    let count = count
        .checked_mul(sign)
        .ok_or_else(|| anyhow!("Date out of range: {}", input))?;
    let offset = match unit.to_ascii_lowercase() {
        'd' => Duration::try_days(count),
        'w' => Duration::try_weeks(count),
        _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
    };
    offset.ok_or_else(|| anyhow!("Date out of range: {}", input))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                return Some((count, parts[1]));
            }
        }
    } else {
        // Just "fri" means 1:fri
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 2024-03-13 is a Wednesday
    const TODAY: &str = "2024-03-13";

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("10:mon"), Some((10, "mon")));
        assert_eq!(parse_weekday_token("invalid"), Some((1, "invalid"))); // will fail later at weekday parse
    }

    #[test]
    fn test_keywords_and_offsets() {
        let today = day(TODAY);
        assert_eq!(parse_day("today", today).unwrap(), today);
        assert_eq!(parse_day("Yesterday", today).unwrap(), day("2024-03-12"));
        assert_eq!(parse_day("-3d", today).unwrap(), day("2024-03-10"));
        assert_eq!(parse_day("+1w", today).unwrap(), day("2024-03-20"));
        assert!(parse_day("-3x", today).is_err());
        assert!(parse_day("+", today).is_err());
    }

    #[test]
    fn test_weekdays_look_backwards() {
        let today = day(TODAY);
        assert_eq!(parse_day("wed", today).unwrap(), today);
        assert_eq!(parse_day("mon", today).unwrap(), day("2024-03-11"));
        assert_eq!(parse_day("fri", today).unwrap(), day("2024-03-08"));
        assert_eq!(parse_day("2:fri", today).unwrap(), day("2024-03-01"));
    }

    #[test]
    fn test_huge_offsets_are_errors() {
        let today = day(TODAY);
        assert!(parse_day("+999999999d", today).is_err());
        assert!(parse_day("-99999999999999999d", today).is_err());
        assert!(parse_day("+9999999999999w", today).is_err());
        assert!(parse_day("--9223372036854775808d", today).is_err());
        assert!(parse_day("99999999999:fri", today).is_err());
        assert!(parse_day("9223372036854775807:fri", today).is_err());
        assert!(parse_day("yesterday", NaiveDate::MIN).is_err());
    }

    #[test]
    fn test_plain_dates() {
        let today = day(TODAY);
        assert_eq!(parse_day("2024-01-31", today).unwrap(), day("2024-01-31"));
        assert!(parse_day("2024-02-30", today).is_err());
        assert!(parse_day("", today).is_err());
    }

    #[test]
    fn test_range_bound_empty_is_unbounded() {
        let today = day(TODAY);
        assert_eq!(parse_range_bound("", today).unwrap(), None);
        assert_eq!(parse_range_bound("2024-01-01", today).unwrap(), Some(day("2024-01-01")));
    }

    #[test]
    fn test_stamp_keeps_calendar_day_locally() {
        let date = day("2024-03-10");
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let ts = stamp(date, time);
        let local: DateTime<Local> = DateTime::from(ts);
        assert_eq!(local.date_naive(), date);
        assert!(stamp(date, NaiveTime::from_hms_opt(9, 30, 1).unwrap()) > ts);
    }
}
