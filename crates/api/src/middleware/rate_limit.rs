//! Fixed-window, per-IP rate limiting for the `/api` routes.
//!
//! Each client IP gets `max_requests` requests per window. The window starts
//! at the first request and resets once it has fully elapsed.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::response::ApiResponse;
use crate::state::AppState;

const RATE_LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Limiter settings.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window (default: `100`).
    pub max_requests: u32,
    /// Window length in seconds (default: `900`).
    pub window_secs: u64,
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Outcome of an allowed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the current window resets.
    pub reset_after: u64,
}

/// Thread-safe per-IP counter map.
#[derive(Debug)]
pub struct RateLimiter {
    entries: DashMap<IpAddr, WindowEntry>,
    config: RateLimitConfig,
    window: Duration,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: DashMap::new(),
            window: Duration::from_secs(config.window_secs),
            config,
        }
    }

    /// Count a request from `ip`.
    ///
    /// Returns the remaining allowance, or `Err(retry_after_secs)` when the
    /// window is exhausted.
    pub fn check(&self, ip: IpAddr) -> Result<RateLimitInfo, u64> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<RateLimitInfo, u64> {
        let mut entry = self.entries.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        let reset_after = self
            .window
            .saturating_sub(now.duration_since(entry.window_start))
            .as_secs()
            .max(1);

        if entry.count >= self.config.max_requests {
            return Err(reset_after);
        }

        entry.count += 1;
        Ok(RateLimitInfo {
            limit: self.config.max_requests,
            remaining: self.config.max_requests - entry.count,
            reset_after,
        })
    }

    /// Drop entries whose window has expired.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < self.window);
    }

    /// Number of tracked IPs.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Spawn a background task that periodically purges expired entries.
pub fn spawn_cleanup_task(
    rate_limiter: Arc<RateLimiter>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            rate_limiter.cleanup_expired();
            tracing::debug!(
                entries = rate_limiter.entry_count(),
                "Rate limiter cleanup complete"
            );
        }
    })
}

/// Resolve the client IP: the socket peer when the server was started with
/// connect info, then proxy headers, then loopback.
fn client_ip(request: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    forwarded_ip(request.headers()).unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let first_forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    first_forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    })
}

/// Middleware applied to the `/api` router.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = client_ip(&request);

    match state.rate_limiter.check(ip) {
        Ok(info) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(info.limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(info.remaining));
            headers.insert("x-ratelimit-reset", HeaderValue::from(info.reset_after));
            response
        }
        Err(retry_after) => {
            tracing::warn!(%ip, retry_after, "Rate limit exceeded");
            let mut response =
                ApiResponse::failure(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE, None)
                    .into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
            response
        }
    }
}
