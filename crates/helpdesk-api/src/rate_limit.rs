//! Fixed-window admission control keyed by caller address.
//!
//! State is process-local: counters are lost on restart and are not shared
//! between instances. A shared counter service would implement
//! [`RateLimiter`] instead of [`FixedWindowRateLimiter`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Bucket shared by every caller that sends no address header.
pub const UNKNOWN_IDENTITY: &str = "unknown";

pub trait RateLimiter: Send + Sync {
    /// Record one call for `identity`; `false` means the call is rejected.
    fn check(&self, identity: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    window: Duration,
    max_requests: u32,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl FixedWindowRateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Same as [`RateLimiter::check`] with an explicit clock reading.
    pub fn check_at(&self, identity: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get_mut(identity) {
            Some(entry) if now.saturating_duration_since(entry.window_start) <= self.window => {
                if entry.count >= self.max_requests {
                    return false;
                }
                entry.count += 1;
                true
            }
            // first sight, or the window has elapsed
            _ => {
                entries.insert(
                    identity.to_string(),
                    WindowEntry {
                        count: 1,
                        window_start: now,
                    },
                );
                true
            }
        }
    }
}

impl Default for FixedWindowRateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), 20)
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn check(&self, identity: &str) -> bool {
        self.check_at(identity, Instant::now())
    }
}

/// Caller identity: `x-forwarded-for`, else `x-real-ip`, else `"unknown"`.
///
/// Header values are used verbatim, so a proxy chain in `x-forwarded-for`
/// forms its own bucket. An empty or non-ASCII header counts as absent and
/// falls through to the next source.
pub fn client_identity(headers: &HeaderMap) -> String {
    ["x-forwarded-for", "x-real-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_IDENTITY)
        .to_string()
}
