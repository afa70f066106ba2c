//! Status-line formatting shared by every provider.
//!
//! Chat clients render text between two [`BOLD`] bytes in bold. Labels are
//! wrapped in that pair; everything else is plain text.

/// Control byte that toggles bold in IRC-style chat clients.
pub const BOLD: char = '\x02';

/// Canonical sentence for a well-formed response with nothing to show.
pub fn no_results(label: &str) -> String {
    format!("{BOLD}{label}: No results found.{BOLD}")
}

/// Rendering for a non-success HTTP status with nothing else to go on.
pub fn query_returned(label: &str, status: u16) -> String {
    format!("{BOLD}{label}: Query returned {status}")
}

/// Rendering for an application error reported by the provider.
pub fn query_error(label: &str, message: &str) -> String {
    format!("{BOLD}{label}: Query error {message}")
}

// ─────────────────────────────────────────────
// Durations
// ─────────────────────────────────────────────

/// Parse an ISO-8601 duration (`PT2M51S`, `P1DT2H`) into whole seconds.
///
/// Supports weeks and days in the date part and hours, minutes, seconds in
/// the time part. Components must appear in order. Years and months are
/// rejected because they have no fixed length.
pub fn parse_iso8601_duration(input: &str) -> Option<u64> {
    let rest = input.trim().strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    if date.is_empty() && time.map_or(true, str::is_empty) {
        return None;
    }

    let mut total = sum_components(date, &[('W', 604_800), ('D', 86_400)])?;
    if let Some(time) = time {
        if time.is_empty() {
            return None;
        }
        total = total.checked_add(sum_components(time, &[('H', 3_600), ('M', 60), ('S', 1)])?)?;
    }
    Some(total)
}

/// Sum `<digits><unit>` pairs, enforcing the order given in `units`.
fn sum_components(part: &str, units: &[(char, u64)]) -> Option<u64> {
    let mut total = 0u64;
    let mut next_unit = 0;
    let mut num_start = 0;

    for (i, ch) in part.char_indices() {
        if ch.is_ascii_digit() {
            continue;
        }
        let value: u64 = part[num_start..i].parse().ok()?;
        let pos = units[next_unit..].iter().position(|(u, _)| *u == ch)? + next_unit;
        total = total.checked_add(value.checked_mul(units[pos].1)?)?;
        next_unit = pos + 1;
        num_start = i + ch.len_utf8();
    }

    // Trailing digits with no unit.
    if num_start != part.len() {
        return None;
    }
    Some(total)
}

/// Render seconds compactly: `45s`, `2m51s`, `1h0m0s`.
pub fn humanize_seconds(secs: u64) -> String {
    let hours = secs / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Parse and humanize an ISO-8601 duration in one step.
pub fn humanize_iso8601(input: &str) -> Option<String> {
    parse_iso8601_duration(input).map(humanize_seconds)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_is_bold_wrapped() {
        assert_eq!(no_results("Bing"), "\x02Bing: No results found.\x02");
    }

    #[test]
    fn test_query_returned() {
        assert_eq!(query_returned("Google", 503), "\x02Google: Query returned 503");
    }

    #[test]
    fn test_query_error() {
        assert_eq!(
            query_error("Bing", "Parameter has invalid value."),
            "\x02Bing: Query error Parameter has invalid value."
        );
    }

    #[test]
    fn test_parse_minutes_seconds() {
        assert_eq!(parse_iso8601_duration("PT2M51S"), Some(171));
        assert_eq!(parse_iso8601_duration("PT37M51S"), Some(2271));
    }

    #[test]
    fn test_parse_hours_and_days() {
        assert_eq!(parse_iso8601_duration("PT1H"), Some(3600));
        assert_eq!(parse_iso8601_duration("P1DT2H"), Some(93_600));
        assert_eq!(parse_iso8601_duration("P0D"), Some(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_iso8601_duration(""), None);
        assert_eq!(parse_iso8601_duration("P"), None);
        assert_eq!(parse_iso8601_duration("PT"), None);
        assert_eq!(parse_iso8601_duration("2M51S"), None);
        assert_eq!(parse_iso8601_duration("PT51S2M"), None);
        assert_eq!(parse_iso8601_duration("PT12"), None);
        assert_eq!(parse_iso8601_duration("P1Y"), None);
    }

    #[test]
    fn test_humanize_seconds() {
        assert_eq!(humanize_seconds(0), "0s");
        assert_eq!(humanize_seconds(45), "45s");
        assert_eq!(humanize_seconds(171), "2m51s");
        assert_eq!(humanize_seconds(3600), "1h0m0s");
        assert_eq!(humanize_seconds(3723), "1h2m3s");
    }

    #[test]
    fn test_humanize_iso8601() {
        assert_eq!(humanize_iso8601("PT2M51S").as_deref(), Some("2m51s"));
        assert_eq!(humanize_iso8601("P1DT1S").as_deref(), Some("24h0m1s"));
        assert_eq!(humanize_iso8601("bogus"), None);
    }
}
