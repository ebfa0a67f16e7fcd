//! Formatting helpers for entry attributes in g.
//!
//! Turns raw metadata (mode bits, sizes, timestamps) into the strings shown by the
//! long view, the table and the machine readable layouts.

use crate::core::entry::{Entry, EntryKind};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use humansize::{DECIMAL, format_size};
use unicode_width::UnicodeWidthChar;

use std::time::{SystemTime, UNIX_EPOCH};

/// Default `strftime` format of the time column.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats the mode bits in a unix-like format, e.g. `drwxr-xr-x`.
///
/// The first character is the entry type (`d`, `l`, `-`, or `p`/`s`/`c`/`b` for
/// specials). setuid, setgid and sticky bits show as `s`/`S` and `t`/`T`.
pub fn format_attributes(entry: &Entry) -> String {
    let mode = entry.mode();
    let first = match entry.kind() {
        EntryKind::Directory => 'd',
        EntryKind::Symlink => 'l',
        EntryKind::File => '-',
        EntryKind::Other => special_type_char(mode),
    };

    let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1u32 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1u32 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1u32 != 0 {
            chars[base + 2] = 'x';
        }
    }

    // setuid, setgid, sticky
    let specials = [(0o4000, 3, 's'), (0o2000, 6, 's'), (0o1000, 9, 't')];
    for (bit, idx, lower) in specials {
        if mode & bit != 0 {
            chars[idx] = if chars[idx] == 'x' {
                lower
            } else {
                lower.to_ascii_uppercase()
            };
        }
    }
    chars.iter().collect()
}

fn special_type_char(mode: u32) -> char {
    match mode & 0o170000 {
        0o010000 => 'p',
        0o140000 => 's',
        0o020000 => 'c',
        0o060000 => 'b',
        _ => '?',
    }
}

/// Permission bits in octal with a leading zero, e.g. `0755`.
pub fn format_octal_permissions(entry: &Entry) -> String {
    format!("0{:o}", entry.mode() & 0o777)
}

/// Formats the file size into a human-readable string.
/// # Returns
/// A string representing the formatted file size or "-" for directories
/// whose recursive size was not measured.
pub fn format_file_size(entry: &Entry) -> String {
    if entry.is_dir() && !entry.has_measured_size() {
        "-".into()
    } else {
        format_size(entry.size(), DECIMAL)
    }
}

/// Same as [format_file_size] for a plain byte count.
pub fn format_byte_count(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Converts a timestamp to UTC. `None` when it lies outside what chrono can represent,
/// which happens for bogus mtimes far in the future or past.
fn to_utc(time: SystemTime) -> Option<DateTime<Utc>> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
        Err(e) => {
            let before = e.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => (-secs, 0),
                n => (-secs - 1, 1_000_000_000 - n),
            }
        }
    };
    DateTime::<Utc>::from_timestamp(secs, nanos)
}

/// Formats a timestamp in local time with the given `strftime` format.
/// Returns "-" for unknown or unrepresentable times.
pub fn format_file_time(time: Option<SystemTime>, format: &str) -> String {
    time.and_then(to_utc)
        .map(|utc| utc.with_timezone(&Local).format(format).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// RFC 3339 timestamp in UTC, used by the JSON layout.
pub fn format_rfc3339(time: Option<SystemTime>) -> Option<String> {
    time.and_then(to_utc)
        .map(|utc| utc.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Checks that a `strftime` format is usable. chrono reports bad specifiers only when
/// formatting, so this formats a fixed time and catches the error.
pub fn is_valid_time_format(format: &str) -> bool {
    use std::fmt::Write;
    let mut out = String::new();
    write!(out, "{}", Utc::now().format(format)).is_ok()
}

/// Replaces control characters so a name cannot break the terminal or the layout.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}

/// Display width of a string, counting control characters as zero.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}
