// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Timestamp wire formats.
//
// Two formats are in play and they are NOT interchangeable:
//   - JDF audit / envelope stamps: `YYYYMMDD'T'HHmmss'Z'` (e.g. 20180615T143000Z)
//   - JMF queue-filter bounds:     ISO-8601 with offset (e.g. 2018-06-15T14:30:00+00:00)
//
// All timestamps are carried as integer epoch seconds (UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Compact JDF timestamp layout.
pub const JDF_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Layouts accepted on input besides RFC 3339, tried in order.
const NAIVE_INPUT_FORMATS: &[&str] = &[
    JDF_TIMESTAMP_FORMAT,
    "%Y%m%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Date-only layouts, read as midnight UTC.
const DATE_INPUT_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d"];

/// Bare epoch seconds need at least this many digits (September 2001 on),
/// so compact dates are never mistaken for them.
const MIN_EPOCH_DIGITS: usize = 10;

/// Current time as epoch seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

fn to_utc(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

/// Format epoch seconds in the compact JDF layout, e.g. `20231114T221320Z`.
pub fn format_jdf(timestamp: i64) -> String {
    to_utc(timestamp).format(JDF_TIMESTAMP_FORMAT).to_string()
}

/// Format epoch seconds as ISO-8601 with a numeric offset,
/// e.g. `2023-11-14T22:13:20+00:00`.
pub fn format_iso8601(timestamp: i64) -> String {
    to_utc(timestamp).to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a date/time string into epoch seconds.
///
/// Accepts both wire formats above, the colon-separated variant some
/// controllers emit, RFC 3339 with any offset, plain dates, and bare epoch
/// seconds of at least ten digits.
/// Parsing is calendar based and independent of the process locale.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }

    for format in NAIVE_INPUT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp());
        }
    }

    for format in DATE_INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
    }

    if value.len() >= MIN_EPOCH_DIGITS && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<i64>().ok();
    }
    None
}
