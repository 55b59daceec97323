//! Go-style duration strings: `"300ms"`, `"5s"`, `"1m30s"`, `"1.5h"`.
//!
//! Merchants configure their retry interval in this notation, and
//! [`SandboxConfig`](crate::lifecycle::SandboxConfig) reuses it for its own durations.

use super::PolicyError;
use std::time::Duration;

const NANOS_PER_UNIT: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000), // U+00B5
    ("μs", 1_000), // U+03BC
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

/// Parses a Go-style duration.
///
/// A duration is a sequence of decimal numbers, each with an optional fraction and a mandatory
/// unit (`ns`, `us`, `µs`, `ms`, `s`, `m`, `h`). The bare string `"0"` is also accepted.
/// Negative durations are rejected since they cannot be slept.
pub fn parse_go_duration(input: &str) -> Result<Duration, PolicyError> {
    let invalid = |reason: &str| PolicyError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let int_part = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("expected a number"));
        }

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        if unit.is_empty() {
            return Err(invalid("missing unit"));
        }
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| invalid(&format!("unknown unit {unit:?}")))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid("number too large"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| invalid("overflow"))?;

        if !frac_part.is_empty() {
            // Digits beyond nanosecond precision do not change the result.
            let digits = &frac_part[..frac_part.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| invalid("bad fraction"))?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos += numerator * scale / denominator;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| invalid("overflow"))?;
    }

    if total > u64::MAX as u128 {
        return Err(invalid("overflow"));
    }
    if negative && total > 0 {
        return Err(PolicyError::NegativeDuration(input.to_string()));
    }
    Ok(Duration::from_nanos(total as u64))
}
