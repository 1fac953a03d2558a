/// ISO 8601 validTime parsing for gridded forecast periods.
///
/// NWS gridpoint series encode each period as `"<ISO start>/<duration>"`
/// where the duration uses a simplified grammar:
///
///   P[<days>D][T[<hours>H][<minutes>M]]
///
/// Only whole-number components are accepted. Text that does not match the
/// grammar parses to 0 hours, which causes the aggregator to skip the
/// period; callers that care (the NWS ingest client) count those failures.

use chrono::{DateTime, Utc};

/// Parses a duration string to fractional hours. Returns 0.0 for any text
/// outside the grammar, including an empty string or a bare "P".
pub fn parse_duration_hours(duration: &str) -> f64 {
    let rest = match duration.strip_prefix('P') {
        Some(r) => r,
        None => return 0.0,
    };

    let (days, rest) = take_component(rest, 'D');
    let (hours, minutes, rest) = match rest.strip_prefix('T') {
        Some(t) => {
            let (h, r) = take_component(t, 'H');
            let (m, r) = take_component(r, 'M');
            (h, m, r)
        }
        None => (None, None, rest),
    };

    // Leftover text means the string was not pure P/D/T/H/M grammar.
    if !rest.is_empty() {
        return 0.0;
    }

    let days = days.unwrap_or(0) as f64;
    let hours = hours.unwrap_or(0) as f64;
    let minutes = minutes.unwrap_or(0) as f64;
    days * 24.0 + hours + minutes / 60.0
}

/// Reads an optional `<digits><marker>` component. When the digits are not
/// followed by the expected marker the input is returned unconsumed, so a
/// later component (or the trailing-garbage check) can claim it.
fn take_component(input: &str, marker: char) -> (Option<u64>, &str) {
    let digits_len = input.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits_len == 0 {
        return (None, input);
    }
    let after_digits = &input[digits_len..];
    match after_digits.strip_prefix(marker) {
        Some(rest) => {
            // Component lengths are bounded by the grammar; a value too
            // large for u64 is not a real duration.
            match input[..digits_len].parse::<u64>() {
                Ok(n) => (Some(n), rest),
                Err(_) => (None, input),
            }
        }
        None => (None, input),
    }
}

/// Splits a `"<ISO start>/<duration>"` validTime into a UTC start instant
/// and a duration in hours. Returns `None` when the separator is missing
/// or the start timestamp does not parse; an unparsable duration still
/// yields `Some` with 0 hours, matching [`parse_duration_hours`].
pub fn parse_valid_time(valid_time: &str) -> Option<(DateTime<Utc>, f64)> {
    let (start_str, duration_str) = valid_time.split_once('/')?;
    let start = DateTime::parse_from_rfc3339(start_str).ok()?.with_timezone(&Utc);
    Some((start, parse_duration_hours(duration_str)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
