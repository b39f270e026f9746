use std::time::{Duration, Instant};
use log::warn;

use crate::config::anti_spam::{BAN_DURATION_SECONDS, MAX_REJECTIONS_PER_SECOND, MAX_REQUESTS_PER_SECOND};

/// Flood protection for a single WebSocket connection.
pub struct AntiSpamState {
    // Start of the current one-second window
    last_tick: Instant,
    requests_this_tick: u32,
    rejections_this_tick: u32,
    banned_until: Option<Instant>,
}

impl Default for AntiSpamState {
    fn default() -> Self {
        Self::new()
    }
}

impl AntiSpamState {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            requests_this_tick: 0,
            rejections_this_tick: 0,
            banned_until: None,
        }
    }

    /// Call for every incoming frame.
    /// Returns true if the connection is (now) banned.
    pub fn record_request(&mut self, label: &str) -> bool {
        self.tick();
        self.requests_this_tick += 1;
        if self.requests_this_tick > MAX_REQUESTS_PER_SECOND {
            self.ban(label, "Too many requests per second");
            return true;
        }
        self.is_banned()
    }

    /// Call for every `ERROR` sent back to the connection.
    /// Returns true if the connection is (now) banned.
    pub fn record_rejection(&mut self, label: &str) -> bool {
        self.tick();
        self.rejections_this_tick += 1;
        if self.rejections_this_tick > MAX_REJECTIONS_PER_SECOND {
            self.ban(label, "Too many rejected requests per second");
            return true;
        }
        self.is_banned()
    }

    pub fn is_banned(&self) -> bool {
        self.banned_until.is_some_and(|until| Instant::now() < until)
    }

    /// Remaining ban duration in seconds, or 0 if not banned.
    pub fn ban_remaining_secs(&self) -> u64 {
        match self.banned_until {
            Some(until) => until.saturating_duration_since(Instant::now()).as_secs(),
            None => 0,
        }
    }

    fn ban(&mut self, label: &str, reason: &str) {
        let until = Instant::now() + Duration::from_secs(BAN_DURATION_SECONDS);
        self.banned_until = Some(until);
        warn!("[AntiSpam] Banned connection={} for {}s: {}", label, BAN_DURATION_SECONDS, reason);
    }

    /// Reset per-second counters if a new second has started.
    fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= Duration::from_secs(1) {
            self.last_tick = now;
            self.requests_this_tick = 0;
            self.rejections_this_tick = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_flood_bans() {
        let mut state = AntiSpamState::new();
        for _ in 0..MAX_REQUESTS_PER_SECOND {
            assert!(!state.record_request("test"));
        }
        assert!(state.record_request("test"));
        assert!(state.is_banned());
        assert!(state.ban_remaining_secs() > 0);
    }

    #[test]
    fn test_rejection_flood_bans() {
        let mut state = AntiSpamState::new();
        for _ in 0..MAX_REJECTIONS_PER_SECOND {
            assert!(!state.record_rejection("test"));
        }
        assert!(state.record_rejection("test"));
        assert!(state.is_banned());
    }

    #[test]
    fn test_fresh_state_is_not_banned() {
        let state = AntiSpamState::default();
        assert!(!state.is_banned());
        assert_eq!(state.ban_remaining_secs(), 0);
    }
}
