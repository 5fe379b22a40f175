//! Bounded retries with exponential backoff
//!
//! Transient failures (transport errors, timeouts, 5xx responses) are
//! retried with a doubling, capped delay. Anything else fails immediately:
//! a 404 will not become a 200 by asking again.

use crate::config::FetchConfig;
use crate::output;

/// Outcome of one download attempt.
pub(crate) enum AttemptError {
    /// Worth retrying: the failure may not repeat.
    Transient(String),
    /// Retrying cannot help; fail the fetch now.
    Fatal(String),
}

/// Map an HTTP error onto the retry taxonomy.
pub(crate) fn classify_http(err: ureq::Error) -> AttemptError {
    match err {
        ureq::Error::Status(code, _) if (500..600).contains(&code) => {
            AttemptError::Transient(format!("server returned {}", code))
        }
        ureq::Error::Status(code, _) => AttemptError::Fatal(format!("server returned {}", code)),
        ureq::Error::Transport(t) => AttemptError::Transient(format!("transport error: {}", t)),
    }
}

/// Run `attempt` up to the configured number of times.
///
/// Returns the last failure reason once attempts are exhausted or a fatal
/// error is hit.
pub(crate) fn with_backoff<T>(
    config: &FetchConfig,
    what: &str,
    mut attempt: impl FnMut() -> std::result::Result<T, AttemptError>,
) -> std::result::Result<T, String> {
    let attempts = config.retry_attempts.max(1);
    let mut delay = config.retry_base_delay;

    for n in 1..=attempts {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(reason)) => return Err(reason),
            Err(AttemptError::Transient(reason)) => {
                if n == attempts {
                    return Err(format!("{} (after {} attempts)", reason, attempts));
                }
                output::warning(&format!("{}: {}, retrying in {:?}", what, reason, delay));
                std::thread::sleep(delay);
                delay = (delay * 2).min(config.retry_max_delay);
            }
        }
    }

    unreachable!("attempt loop runs at least once")
}
