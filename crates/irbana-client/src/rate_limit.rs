//! User-facing messages for rate-limited (429) responses.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Window assumed when the server does not say how long to wait.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Parse a `Retry-After` header: delta-seconds or an HTTP date.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    let delta = (at - now).num_seconds().max(0);
    Some(Duration::from_secs(delta as u64))
}

/// Whole minutes to wait, rounded up, never less than one.
pub fn minutes_to_wait(retry_after: Option<Duration>) -> u64 {
    let seconds = retry_after.unwrap_or(DEFAULT_WINDOW).as_secs();
    seconds.div_ceil(60).max(1)
}

/// The message shown to the user for a 429.
pub fn message(retry_after: Option<Duration>) -> String {
    match minutes_to_wait(retry_after) {
        1 => "Too many attempts. Try again in 1 minute.".to_string(),
        n => format!("Too many attempts. Try again in {n} minutes."),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_seconds_round_up() {
        assert_eq!(minutes_to_wait(Some(Duration::from_secs(120))), 2);
        assert_eq!(minutes_to_wait(Some(Duration::from_secs(121))), 3);
        assert_eq!(minutes_to_wait(Some(Duration::from_secs(0))), 1);
        assert_eq!(minutes_to_wait(None), 15);
    }

    #[test]
    fn test_message() {
        assert_eq!(
            message(Some(Duration::from_secs(120))),
            "Too many attempts. Try again in 2 minutes."
        );
        assert_eq!(
            message(Some(Duration::from_secs(30))),
            "Too many attempts. Try again in 1 minute."
        );
    }

    #[test]
    fn test_http_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let parsed = parse_retry_after("Wed, 01 May 2024 12:05:00 GMT", now).unwrap();
        assert_eq!(parsed, Duration::from_secs(300));
        let past = parse_retry_after("Wed, 01 May 2024 11:00:00 GMT", now).unwrap();
        assert_eq!(past, Duration::ZERO);
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert!(parse_retry_after("soon", Utc::now()).is_none());
    }
}
