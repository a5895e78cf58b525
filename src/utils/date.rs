use chrono::{Datelike, Days, NaiveDate, Weekday};

pub fn is_monday(d: NaiveDate) -> bool {
    d.weekday() == Weekday::Mon
}

/// Last day of the week opened by `week_start` (start + 6 days).
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start
        .checked_add_days(Days::new(6))
        .expect("week_end overflow")
}

/// Monday of the ISO week containing `d`.
pub fn week_of(d: NaiveDate) -> NaiveDate {
    let back = d.weekday().num_days_from_monday() as u64;
    d.checked_sub_days(Days::new(back)).expect("week_of underflow")
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
