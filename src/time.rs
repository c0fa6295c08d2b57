//! Allocation-free timestamp formatting for log lines and cookie dates.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 9999-12-31T23:59:59Z, the last instant with a four-digit year.
const MAX_SECS: u64 = 253_402_300_799;

/// Calendar breakdown of a UTC instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Civil {
    year: u16,
    month: u8,
    day: u8,
    hours: u8,
    minutes: u8,
    seconds: u8,
    /// 0 = Sunday
    weekday: u8,
}

impl Civil {
    /// Instants past year 9999 are clamped to its last second.
    fn from_secs(secs: u64) -> Self {
        let secs = secs.min(MAX_SECS);
        let day_secs = secs % 86400;
        let days = secs / 86400;

        let mut year = 1970u16;
        let mut remaining = days as i64;
        loop {
            let year_days = if is_leap_year(year) { 366 } else { 365 };
            if remaining < year_days {
                break;
            }
            remaining -= year_days;
            year += 1;
        }

        let month_days: [u8; 12] = if is_leap_year(year) {
            [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        } else {
            [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        };

        let mut month = 1u8;
        for &days_in_month in &month_days {
            if remaining < days_in_month as i64 {
                break;
            }
            remaining -= days_in_month as i64;
            month += 1;
        }

        Self {
            year,
            month,
            day: (remaining + 1) as u8,
            hours: (day_secs / 3600) as u8,
            minutes: ((day_secs % 3600) / 60) as u8,
            seconds: (day_secs % 60) as u8,
            // 1970-01-01 was a Thursday
            weekday: ((days + 4) % 7) as u8,
        }
    }
}

/// ISO 8601 timestamp with milliseconds (`2024-12-28T15:04:05.123Z`).
///
/// Stack-allocated, no heap allocation.
#[derive(Clone, Copy)]
pub struct Iso8601Timestamp {
    buf: [u8; 24],
}

impl Iso8601Timestamp {
    /// Create a new timestamp for the current time.
    #[inline]
    pub fn now() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_duration(now)
    }

    /// Create from a Duration since UNIX_EPOCH.
    pub fn from_duration(duration: Duration) -> Self {
        let c = Civil::from_secs(duration.as_secs());

        let mut buf = [0u8; 24];
        write_u16_padded(&mut buf[0..4], c.year);
        buf[4] = b'-';
        write_u8_padded(&mut buf[5..7], c.month);
        buf[7] = b'-';
        write_u8_padded(&mut buf[8..10], c.day);
        buf[10] = b'T';
        write_u8_padded(&mut buf[11..13], c.hours);
        buf[13] = b':';
        write_u8_padded(&mut buf[14..16], c.minutes);
        buf[16] = b':';
        write_u8_padded(&mut buf[17..19], c.seconds);
        buf[19] = b'.';
        write_u16_padded_3(&mut buf[20..23], duration.subsec_millis() as u16);
        buf[23] = b'Z';

        Self { buf }
    }

    /// Get the timestamp as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Buffer only ever holds ASCII digits and separators
        std::str::from_utf8(&self.buf).unwrap_or("")
    }
}

impl AsRef<str> for Iso8601Timestamp {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Iso8601Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Iso8601Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format an instant as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
///
/// Instants before the epoch are clamped to it, and instants past year 9999
/// to its last second.
pub fn http_date(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let c = Civil::from_secs(secs);

    format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        WEEKDAYS[c.weekday as usize],
        c.day,
        MONTHS[(c.month - 1) as usize],
        c.year,
        c.hours,
        c.minutes,
        c.seconds
    )
}

/// Check if a year is a leap year.
#[inline]
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Write a 4-digit year to buffer (0000-9999).
#[inline]
fn write_u16_padded(buf: &mut [u8], val: u16) {
    buf[0] = b'0' + ((val / 1000) % 10) as u8;
    buf[1] = b'0' + ((val / 100) % 10) as u8;
    buf[2] = b'0' + ((val / 10) % 10) as u8;
    buf[3] = b'0' + (val % 10) as u8;
}

/// Write a 2-digit value to buffer (00-99).
#[inline]
fn write_u8_padded(buf: &mut [u8], val: u8) {
    buf[0] = b'0' + (val / 10);
    buf[1] = b'0' + (val % 10);
}

/// Write a 3-digit milliseconds value to buffer (000-999).
#[inline]
fn write_u16_padded_3(buf: &mut [u8], val: u16) {
    buf[0] = b'0' + ((val / 100) % 10) as u8;
    buf[1] = b'0' + ((val / 10) % 10) as u8;
    buf[2] = b'0' + (val % 10) as u8;
}
