use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid duration '{0}'; expected an unsigned integer followed by one of 'ismh'")]
pub struct ParseDurationError(String);

/// Parse a compact duration literal such as `600i`, `2s`, `1m` or `24h`.
///
/// `i` is milliseconds. A bare integer is seconds. Case and surrounding
/// whitespace are ignored.
pub fn parse_duration(literal: &str) -> Result<Duration, ParseDurationError> {
    let s = literal.trim().to_ascii_lowercase();
    let invalid = || ParseDurationError(literal.to_owned());

    let Some(last) = s.chars().last() else {
        return Err(invalid());
    };

    let (digits, unit) = if last.is_ascii_digit() {
        (s.as_str(), 's')
    } else {
        (&s[..s.len() - last.len_utf8()], last)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    let duration = match unit {
        'i' => Some(Duration::from_millis(value)),
        's' => Some(Duration::from_secs(value)),
        'm' => value.checked_mul(60).map(Duration::from_secs),
        'h' => value.checked_mul(3600).map(Duration::from_secs),
        _ => None,
    };
    duration.ok_or_else(invalid)
}

/// clap `value_parser` adapter.
pub fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}
