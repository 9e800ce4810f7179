use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Hours (24h clock) of the bookable slots: 9:00 AM through 8:00 PM.
pub const SLOT_HOURS: std::ops::RangeInclusive<u32> = 9..=20;

/// The slot labels in display order, as the booking form shows them.
pub fn slot_labels() -> Vec<String> {
    SLOT_HOURS
        .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
        .map(|t| to_label(&t))
        .collect()
}

/// Parses a 12-hour slot label ("9:00 AM") into a time, if it is one of the
/// bookable slots.
pub fn parse_label(label: &str) -> Option<NaiveTime> {
    let time = NaiveTime::parse_from_str(label.trim(), "%I:%M %p").ok()?;
    if time.minute() != 0 || time.second() != 0 || !SLOT_HOURS.contains(&time.hour()) {
        return None;
    }
    Some(time)
}

/// "10:00:00" -> "10:00 AM"
pub fn to_label(time: &NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Storage form of a slot time.
pub fn to_storage(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Maps a stored `HH:MM:SS` value back to its label. Values that are not
/// parseable are returned as stored.
pub fn storage_to_label(stored: &str) -> String {
    match NaiveTime::parse_from_str(stored, "%H:%M:%S") {
        Ok(t) => to_label(&t),
        Err(_) => stored.to_string(),
    }
}

/// Normalizes a date as sent by a client into a calendar date.
///
/// Timestamps resolve to the calendar date in their own offset, so a `Z`
/// timestamp yields its UTC date regardless of the server's timezone. Clients
/// that care about the local day send a plain `YYYY-MM-DD`.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

pub fn date_to_storage(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
