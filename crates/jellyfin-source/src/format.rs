//! Text formatting helpers for catalog metadata.

use chrono::NaiveDateTime;
use scraper::Html;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Placeholder that carries `<br>` line breaks through HTML text extraction
const LINE_BREAK_SENTINEL: &str = "br2n";

/// Server ticks per second (100ns ticks)
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Human-readable byte count using decimal units
pub fn format_bytes(bytes: i64) -> String {
    match bytes {
        b if b >= 1_000_000_000 => format!("{:.2} GB", b as f64 / 1_000_000_000.0),
        b if b >= 1_000_000 => format!("{:.2} MB", b as f64 / 1_000_000.0),
        b if b >= 1_000 => format!("{:.2} KB", b as f64 / 1_000.0),
        b if b > 1 => format!("{} bytes", b),
        1 => "1 byte".to_string(),
        _ => String::new(),
    }
}

/// Format seconds as `1h 2m 5s`.
///
/// Hours and minutes are left out when zero; seconds are always shown.
pub fn format_seconds(total_seconds: i64) -> String {
    let minutes = total_seconds / 60;
    let hours = minutes / 60;
    let seconds = total_seconds % 60;
    let minutes = minutes % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ").trim().to_string()
}

/// Parse a server timestamp into milliseconds since the Unix epoch (UTC).
///
/// A trailing `Z` and anything after the seconds field are ignored.
/// Unparsable input yields 0.
pub fn parse_date_time(date: &str) -> i64 {
    let date = date.strip_suffix('Z').unwrap_or(date);
    NaiveDateTime::parse_and_remainder(date, DATE_TIME_FORMAT)
        .map(|(parsed, _)| parsed.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Date portion of a timestamp (text before the first `T`)
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Plain text of an HTML fragment, keeping `<br>` as a newline
pub fn html_to_text(html: &str) -> String {
    let marked = html.replace("<br>", LINE_BREAK_SENTINEL);
    let fragment = Html::parse_fragment(&marked);
    let text = fragment.root_element().text().collect::<String>();

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(LINE_BREAK_SENTINEL, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(-5), "");
        assert_eq!(format_bytes(0), "");
        assert_eq!(format_bytes(1), "1 byte");
        assert_eq!(format_bytes(2), "2 bytes");
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(999), "999 bytes");
        assert_eq!(format_bytes(1500), "1.50 KB");
        assert_eq!(format_bytes(2_500_000), "2.50 MB");
        assert_eq!(format_bytes(3_000_000_000), "3.00 GB");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0s");
        assert_eq!(format_seconds(45), "45s");
        assert_eq!(format_seconds(125), "2m 5s");
        assert_eq!(format_seconds(3725), "1h 2m 5s");
        assert_eq!(format_seconds(3600), "1h 0s");
        assert_eq!(format_seconds(3605), "1h 5s");
        assert_eq!(format_seconds(90_000), "25h 0s");
    }

    #[test]
    fn test_parse_date_time() {
        assert_eq!(parse_date_time("1970-01-01T00:00:01"), 1_000);
        assert_eq!(parse_date_time("2020-01-02T03:04:05Z"), 1_577_934_245_000);
        assert_eq!(
            parse_date_time("2020-01-02T03:04:05.0000000Z"),
            1_577_934_245_000
        );
    }

    #[test]
    fn test_parse_date_time_failure_is_epoch() {
        assert_eq!(parse_date_time(""), 0);
        assert_eq!(parse_date_time("2020-01-02"), 0);
        assert_eq!(parse_date_time("yesterday"), 0);
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2021-04-09T00:00:00.0000000Z"), "2021-04-09");
        assert_eq!(date_part("2021-04-09"), "2021-04-09");
        assert_eq!(date_part(""), "");
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(
            html_to_text("First line.<br>Second <b>bold</b> line."),
            "First line.\nSecond bold line."
        );
        assert_eq!(html_to_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_to_text("  spaced\n\n  out  "), "spaced out");
    }
}
