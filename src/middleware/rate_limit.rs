use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::Error;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    start: Instant,
    count: u32,
}

/// Fixed one-second window shared by every request routed through one group.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        Self::starting_at(rps, Instant::now())
    }

    fn starting_at(rps: u32, start: Instant) -> Self {
        Self {
            rps: rps.max(1),
            window: Arc::new(Mutex::new(Window { start, count: 0 })),
        }
    }

    /// `Err` carries the time left until the window resets.
    fn acquire_at(&self, now: Instant) -> Result<(), Duration> {
        let mut guard = match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let elapsed = now.saturating_duration_since(guard.start);
        if elapsed >= WINDOW {
            guard.start = now;
            guard.count = 0;
        }
        if guard.count < self.rps {
            guard.count += 1;
            Ok(())
        } else {
            Err(WINDOW.saturating_sub(elapsed))
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Err(retry_in) = limiter.acquire_at(Instant::now()) {
        tracing::warn!(path = %req.uri().path(), "rate limit exceeded");
        let mut resp = Error::TooManyRequests.into_response();
        let secs = retry_in.as_secs_f64().ceil().max(1.0) as u64;
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            resp.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return resp;
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_rps_then_blocks_until_window_resets() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(2, t0);
        assert!(limiter.acquire_at(t0).is_ok());
        assert!(limiter.acquire_at(t0).is_ok());
        let retry = limiter.acquire_at(t0 + Duration::from_millis(400)).unwrap_err();
        assert_eq!(retry, Duration::from_millis(600));
        assert!(limiter.acquire_at(t0 + Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn zero_rps_still_lets_one_through() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(0, t0);
        assert!(limiter.acquire_at(t0).is_ok());
        assert!(limiter.acquire_at(t0).is_err());
    }

    #[test]
    fn retry_hint_is_measured_from_the_window_start() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(1, t0);
        assert!(limiter.acquire_at(t0 + Duration::from_millis(250)).is_ok());
        let retry = limiter.acquire_at(t0 + Duration::from_millis(900)).unwrap_err();
        assert_eq!(retry, Duration::from_millis(100));
    }
}
