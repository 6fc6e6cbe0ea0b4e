//! Fixed-window request counter keyed by `scope:identifier`.
//!
//! One counter map is shared by every request of a process. Each key owns a
//! window that opens on its first hit and closes `window` later; inside the
//! window at most `limit` hits pass. Hits that are refused do not extend the
//! window or bump the count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Window applied when a caller passes a zero-length window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

const UNKNOWN_IDENTIFIER: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub limited: bool,
    /// Whole seconds until the current window closes (never 0 while a window is open).
    pub retry_after_secs: u64,
}

impl RateLimitDecision {
    fn allowed(retry_after_secs: u64) -> Self {
        Self {
            limited: false,
            retry_after_secs,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(
        &self,
        scope: &str,
        identifier: &str,
        limit: u32,
        window: Duration,
    ) -> RateLimitDecision {
        self.check_at(scope, identifier, limit, window, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(
        &self,
        scope: &str,
        identifier: &str,
        limit: u32,
        window: Duration,
        now: Instant,
    ) -> RateLimitDecision {
        if limit == 0 {
            return RateLimitDecision::allowed(0);
        }
        let window = if window.is_zero() {
            DEFAULT_WINDOW
        } else {
            window
        };
        let fresh = Window {
            count: 1,
            expires_at: now + window,
        };

        // The entry guard holds the shard lock for the whole read-modify-write.
        match self.windows.entry(window_key(scope, identifier)) {
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                RateLimitDecision::allowed(window.as_secs().max(1))
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                if current.expires_at <= now {
                    *current = fresh;
                    return RateLimitDecision::allowed(window.as_secs().max(1));
                }
                let remaining = current.expires_at.duration_since(now).as_secs().max(1);
                if current.count >= limit {
                    return RateLimitDecision {
                        limited: true,
                        retry_after_secs: remaining,
                    };
                }
                current.count += 1;
                RateLimitDecision::allowed(remaining)
            }
        }
    }

    /// Drop every window that has already closed.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.windows.retain(|_, w| w.expires_at > now);
    }

    /// Forget all windows.
    pub fn reset(&self) {
        self.windows.clear();
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

fn window_key(scope: &str, identifier: &str) -> String {
    let identifier = if identifier.is_empty() {
        UNKNOWN_IDENTIFIER
    } else {
        identifier
    };
    format!("{scope}:{identifier}")
}
