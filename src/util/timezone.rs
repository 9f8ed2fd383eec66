//! Timezone labels and derived local times.
//!
//! The sheet records company timezones as display labels like "UTC +01:00"
//! or "UTC-5". Offsets are stored as minutes; the label and the local time
//! are derived back on demand and never persisted as authoritative.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const LOCAL_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// Parse labels like "UTC +01:00", "UTC-5" or "UTC +00:00 (Berlin)" into a
/// UTC offset in minutes. Anything unrecognized is treated as UTC.
pub fn parse_offset_minutes(label: &str) -> i32 {
    let trimmed = label.trim();
    let Some(prefix) = trimmed.get(..3) else {
        return 0;
    };
    if !prefix.eq_ignore_ascii_case("utc") {
        return 0;
    }
    let rest = trimmed[3..].trim_start();
    let (sign, rest) = match rest.as_bytes().first() {
        Some(b'+') => (1, &rest[1..]),
        Some(b'-') => (-1, &rest[1..]),
        _ => (1, rest),
    };

    let mut parts = rest.splitn(2, ':');
    let hours = match parts.next().and_then(leading_number) {
        Some(hours) => sign * hours,
        None => return 0,
    };
    let minutes = parts.next().and_then(leading_number).unwrap_or(0);

    if hours >= 0 {
        hours * 60 + minutes
    } else {
        hours * 60 - minutes
    }
}

/// Format an offset back into the sheet's "UTC +01:00" label shape.
pub fn format_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let total = offset_minutes.abs();
    format!("UTC {sign}{:02}:{:02}", total / 60, total % 60)
}

/// Current wall-clock time at the given offset, e.g. "2:30 PM".
pub fn local_time_display(offset_minutes: i32) -> String {
    local_time_at(OffsetDateTime::now_utc(), offset_minutes)
}

/// Wall-clock time of `utc` shifted by the offset; "N/A" for offsets the
/// time crate rejects (beyond ±24h).
pub fn local_time_at(utc: OffsetDateTime, offset_minutes: i32) -> String {
    let Ok(offset) = UtcOffset::from_whole_seconds(offset_minutes.saturating_mul(60)) else {
        return "N/A".to_string();
    };
    utc.to_offset(offset)
        .format(LOCAL_TIME_FORMAT)
        .unwrap_or_else(|_| "N/A".to_string())
}

fn leading_number(text: &str) -> Option<i32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
