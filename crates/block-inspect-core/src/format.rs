//! Cell formatting and the matching parsers used by the sorter.
//!
//! Every formatter here has a parser counterpart so the sorter can compare
//! rendered cells by value instead of by text.

use chrono::{DateTime, NaiveDateTime, TimeDelta};

/// Display format of timestamp cells (`DD-MM-YYYY HH:MM:SS`, UTC).
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Suffix of size cells.
pub const SIZE_UNIT: &str = "MiB";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Render epoch milliseconds with [`TIMESTAMP_FORMAT`], truncated to the
/// second. Out-of-range values fall back to the raw number.
pub fn format_timestamp_millis(millis: i64) -> String {
    DateTime::from_timestamp(millis.div_euclid(MS_PER_SECOND), 0)
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Parse a cell produced by [`format_timestamp_millis`].
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

/// Insert `,` between groups of three digits, e.g. `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render a byte estimate as MiB with two decimals and a grouped integer
/// part, e.g. `1,024.00MiB`.
pub fn format_mib(bytes: f64) -> String {
    let mib = format!("{:.2}", bytes / (1024.0 * 1024.0));
    let (int_part, frac_part) = mib.split_once('.').unwrap_or((mib.as_str(), "00"));
    format!("{}.{frac_part}{SIZE_UNIT}", group_digits(int_part))
}

/// Parse a grouped integer or size cell (`1,234` or `1,024.50MiB`).
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.strip_suffix(SIZE_UNIT).unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `true`/`false` cell.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Render a signed millisecond duration the way Go's `time.Duration` prints
/// it: `0s`, `500ms`, `1.5s`, `5m0s`, `40h0m0s`, `-10h0m0s`.
pub fn format_duration_millis(millis: i64) -> String {
    if millis == 0 {
        return "0s".to_string();
    }

    let sign = if millis < 0 { "-" } else { "" };
    let abs = millis.unsigned_abs();

    if abs < MS_PER_SECOND as u64 {
        return format!("{sign}{abs}ms");
    }

    let hours = abs / MS_PER_HOUR as u64;
    let minutes = (abs / MS_PER_MINUTE as u64) % 60;
    let seconds = (abs / MS_PER_SECOND as u64) % 60;
    let frac = abs % MS_PER_SECOND as u64;

    let mut secs = seconds.to_string();
    if frac > 0 {
        let frac = format!("{frac:03}");
        secs.push('.');
        secs.push_str(frac.trim_end_matches('0'));
    }

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs}s")
    } else {
        format!("{sign}{secs}s")
    }
}

/// [`format_duration_millis`] for a [`TimeDelta`].
pub fn format_time_delta(delta: TimeDelta) -> String {
    format_duration_millis(delta.num_milliseconds())
}

/// Parse a Go-style duration (`1h30m`, `-10h0m0s`, `1.5s`, `250ms`) into
/// milliseconds. A `d` (24h) unit is accepted as well. Returns `None` for
/// anything else.
pub fn parse_duration_millis(s: &str) -> Option<i64> {
    let (negative, mut rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    if rest == "0" {
        return Some(0);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return None;
        }
        let value: f64 = rest[..num_len].parse().ok()?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = match &rest[..unit_len] {
            "ms" => 1,
            "s" => MS_PER_SECOND,
            "m" => MS_PER_MINUTE,
            "h" => MS_PER_HOUR,
            "d" => MS_PER_DAY,
            _ => return None,
        };
        rest = &rest[unit_len..];

        total += value * unit as f64;
    }

    if !total.is_finite() || total > i64::MAX as f64 {
        return None;
    }
    let millis = total.round() as i64;
    Some(if negative { -millis } else { millis })
}

/// [`parse_duration_millis`] as a [`TimeDelta`].
pub fn parse_time_delta(s: &str) -> Option<TimeDelta> {
    parse_duration_millis(s).and_then(TimeDelta::try_milliseconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_in_fixed_format() {
        // 2019-01-01T00:00:00Z
        assert_eq!(format_timestamp_millis(1_546_300_800_000), "01-01-2019 00:00:00");
        // Sub-second part is dropped.
        assert_eq!(format_timestamp_millis(1_546_300_800_999), "01-01-2019 00:00:00");
        assert_eq!(format_timestamp_millis(0), "01-01-1970 00:00:00");
    }

    #[test]
    fn timestamps_parse_back() {
        let ts = parse_timestamp("02-01-2024 10:00:00").unwrap();
        assert_eq!(ts.to_string(), "2024-01-02 10:00:00");
        assert!(parse_timestamp("2024-01-02 10:00:00").is_none());
        assert!(parse_timestamp("abc").is_none());
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_digits("-1234"), "-1,234");
    }

    #[test]
    fn mib_formatting() {
        assert_eq!(format_mib(0.0), "0.00MiB");
        assert_eq!(format_mib(1024.0 * 1024.0 * 1024.0), "1,024.00MiB");
        assert_eq!(format_mib(1.5 * 1024.0 * 1024.0), "1.50MiB");
    }

    #[test]
    fn numbers_parse_with_grouping_and_unit() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("1,024.50MiB"), Some(1024.5));
        assert_eq!(parse_number("MiB"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("r1"), None);
    }

    #[test]
    fn durations_match_go_text() {
        assert_eq!(format_duration_millis(0), "0s");
        assert_eq!(format_duration_millis(500), "500ms");
        assert_eq!(format_duration_millis(1_500), "1.5s");
        assert_eq!(format_duration_millis(1_250), "1.25s");
        assert_eq!(format_duration_millis(5 * MS_PER_MINUTE), "5m0s");
        assert_eq!(format_duration_millis(MS_PER_HOUR), "1h0m0s");
        assert_eq!(format_duration_millis(40 * MS_PER_HOUR), "40h0m0s");
        assert_eq!(format_duration_millis(-10 * MS_PER_HOUR), "-10h0m0s");
        assert_eq!(
            format_duration_millis(2 * MS_PER_HOUR + 3 * MS_PER_MINUTE + 4 * MS_PER_SECOND),
            "2h3m4s"
        );
        assert_eq!(format_duration_millis(-250), "-250ms");
    }

    #[test]
    fn durations_parse_back() {
        for ms in [
            0,
            500,
            1_500,
            5 * MS_PER_MINUTE,
            40 * MS_PER_HOUR,
            -10 * MS_PER_HOUR,
            2 * MS_PER_HOUR + 3 * MS_PER_MINUTE + 4 * MS_PER_SECOND,
        ] {
            let text = format_duration_millis(ms);
            assert_eq!(parse_duration_millis(&text), Some(ms), "{text}");
        }

        assert_eq!(parse_duration_millis("10d"), Some(10 * MS_PER_DAY));
        assert_eq!(parse_duration_millis("1h30m"), Some(90 * MS_PER_MINUTE));
        assert_eq!(parse_duration_millis("0"), Some(0));
        assert_eq!(parse_duration_millis("-"), None);
        assert_eq!(parse_duration_millis(""), None);
        assert_eq!(parse_duration_millis("10"), None);
        assert_eq!(parse_duration_millis("h"), None);
        assert_eq!(parse_duration_millis("3w"), None);
    }
}
