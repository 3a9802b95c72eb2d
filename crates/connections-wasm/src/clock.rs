use chrono::{NaiveDate, NaiveDateTime};

/// Browser local time
pub fn now() -> NaiveDateTime {
    let date = js_sys::Date::new_0();
    from_parts(
        date.get_full_year() as i32,
        date.get_month(),
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds(),
    )
}

/// Build a local timestamp from JavaScript `Date` fields (0-based month)
pub fn from_parts(
    year: i32,
    month0: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_is_zero_based() {
        let at = from_parts(2025, 0, 1, 9, 30, 5);
        assert_eq!(at.to_string(), "2025-01-01 09:30:05");

        let at = from_parts(2025, 11, 31, 23, 59, 59);
        assert_eq!(at.to_string(), "2025-12-31 23:59:59");
    }

    #[test]
    fn test_out_of_range_fields_fall_back() {
        assert_eq!(from_parts(2025, 1, 30, 0, 0, 0), NaiveDateTime::default());
    }
}
