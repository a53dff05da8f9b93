//! Caller deadlines carried in the `grpc-timeout` header.
//!
//! tonic's server already cancels a handler once the caller's deadline passes. Handlers also
//! read the deadline themselves so any call they make downstream gets no more time than the
//! caller has left.

use std::time::Duration;
use tonic::Request;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Returns the deadline the caller attached to `request`, if any.
///
/// A malformed header is treated as absent.
pub fn request_deadline<T>(request: &Request<T>) -> Option<Duration> {
    let value = request.metadata().get(GRPC_TIMEOUT_HEADER)?.to_str().ok()?;
    parse_grpc_timeout(value)
}

/// The deadline from `request`, or `fallback` when the caller sent none.
pub fn budget<T>(request: &Request<T>, fallback: Duration) -> Duration {
    request_deadline(request).unwrap_or(fallback)
}

/// Parses a `grpc-timeout` value: at most eight ASCII digits followed by one unit letter.
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 || value.len() > 9 || !value.is_ascii() {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(amount.checked_mul(3600)?),
        "M" => Duration::from_secs(amount.checked_mul(60)?),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(duration)
}
