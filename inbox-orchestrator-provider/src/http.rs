//! Shared HTTP request plumbing.
//!
//! One place for the request/response cycle: sending, timeout and
//! connectivity error mapping, rate-limit handling, and response logging.
//! Retry is opt-in per call site — status polls must never retry
//! automatically, so the retry helper is only used for job submission.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Maximum response-body length echoed into debug logs.
const LOG_BODY_LIMIT: usize = 2048;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response body for logging.
///
/// Bodies are arbitrary provider output, so the cut must land on a char
/// boundary; a malformed response must never take the process down while
/// being logged.
fn truncate_for_log(body: &str) -> &str {
    if body.len() <= LOG_BODY_LIMIT {
        body
    } else {
        &body[..floor_char_boundary(body, LOG_BODY_LIMIT)]
    }
}

/// HTTP tool function set.
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Perform an HTTP request and return `(status_code, response_text)`.
    ///
    /// Connectivity failures map to [`ProviderError::Unavailable`], timeouts
    /// to [`ProviderError::Timeout`]. HTTP 429 maps to
    /// [`ProviderError::RateLimited`] with the `Retry-After` hint; 502–504
    /// map to `Unavailable` so callers can treat them as transient.
    /// All other status codes are returned to the caller for mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[inboxing] {method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ProviderError::Unavailable {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[inboxing] Response Status: {status_code}");

        // Extract Retry-After before consuming the body
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[inboxing] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[inboxing] Gateway error (HTTP {status_code})");
            return Err(ProviderError::Unavailable {
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Unavailable {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[inboxing] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[inboxing] JSON parse failed: {e}");
            log::error!(
                "[inboxing] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// Perform an HTTP request, retrying transient failures with exponential
    /// backoff.
    ///
    /// Only transient errors ([`ProviderError::is_transient`]) are retried;
    /// business errors surface immediately. `max_retries == 0` executes once.
    ///
    /// Backoff: 100ms, 200ms, 400ms, … capped at 10s. A `Retry-After` hint
    /// from rate limiting is honored, capped at 30s.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, method_name, path).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use, so retry needs a clone
            let Some(req) = request_builder.try_clone() else {
                // Streaming bodies cannot be cloned; fall back to a single attempt
                log::warn!("[inboxing] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, method_name, path).await;
            };

            match Self::execute_request(req, method_name, path).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_transient() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[inboxing] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Unavailable {
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Pick the delay before the next attempt.
///
/// A `Retry-After` hint wins (capped at 30s); otherwise exponential backoff.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff delay: 100ms, 200ms, 400ms, … capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // keep 2^attempt in range
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    let delay_ms = delay_ms.min(10_000);
    Duration::from_millis(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // ---- retry_delay ----

    #[test]
    fn retry_after_hint_wins() {
        let e = ProviderError::RateLimited {
            retry_after: Some(5),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(5));
    }

    #[test]
    fn retry_after_hint_capped_at_30s() {
        let e = ProviderError::RateLimited {
            retry_after: Some(300),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(30));
    }

    #[test]
    fn retry_without_hint_uses_backoff() {
        let e = ProviderError::Unavailable {
            detail: "err".into(),
        };
        assert_eq!(retry_delay(&e, 2), Duration::from_millis(400));
    }

    // ---- backoff_delay ----

    #[test]
    fn backoff_attempt_0() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
    }

    #[test]
    fn backoff_attempt_1() {
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
    }

    #[test]
    fn backoff_attempt_3() {
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        // attempt 7: 100 * 2^7 = 12800ms, capped to 10000ms
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
    }

    // ---- truncate_for_log ----

    #[test]
    fn truncate_short_body_unchanged() {
        let body = "hello";
        assert_eq!(truncate_for_log(body), body);
    }

    #[test]
    fn truncate_exactly_at_limit() {
        let body = "a".repeat(LOG_BODY_LIMIT);
        assert_eq!(truncate_for_log(&body), body);
    }

    #[test]
    fn truncate_over_limit() {
        let body = "a".repeat(LOG_BODY_LIMIT + 100);
        assert_eq!(truncate_for_log(&body).len(), LOG_BODY_LIMIT);
    }

    #[test]
    fn truncate_backs_off_to_char_boundary() {
        // Byte LOG_BODY_LIMIT lands inside the first euro sign (3 bytes each)
        let mut body = "a".repeat(LOG_BODY_LIMIT - 1);
        body.push_str("€€€");
        let truncated = truncate_for_log(&body);
        assert_eq!(truncated.len(), LOG_BODY_LIMIT - 1);
        assert!(truncated.chars().all(|c| c == 'a'));
    }

    #[test]
    fn parse_json_survives_long_multibyte_body() {
        let mut body = "a".repeat(LOG_BODY_LIMIT - 1);
        body.push_str("€€€");
        let result: Result<serde_json::Value, ProviderError> = HttpUtils::parse_json(&body);
        assert!(matches!(result, Err(ProviderError::ParseError { .. })));
    }

    // ---- parse_json ----

    #[test]
    fn parse_json_valid() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo, ProviderError> = HttpUtils::parse_json(r#"{"x":42}"#);
        assert!(
            matches!(&result, Ok(Foo { x: 42 })),
            "unexpected parse result: {result:?}"
        );
    }

    #[test]
    fn parse_json_invalid() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo, ProviderError> = HttpUtils::parse_json("not json");
        assert!(
            matches!(&result, Err(ProviderError::ParseError { .. })),
            "unexpected parse result: {result:?}"
        );
    }

    // ---- truncate_for_log ----

    #[test]
    fn truncate_short_body_unchanged_2() {
        assert_eq!(truncate_for_log("ok"), "ok");
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(LOG_BODY_LIMIT + 100);
        assert_eq!(truncate_for_log(&body).len(), LOG_BODY_LIMIT);
    }
}
