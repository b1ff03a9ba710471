//! Signal loss detection
//!
//! A receiver that stops sending (or holds a line high) produces no new
//! samples. Each channel's watchdog notices the silence after the configured
//! timeout; [`StalenessPolicy`] decides what happens to the outputs.

use crate::channel::ChannelId;
use crate::support::{elapsed, Ticks};

/// Wrapped distances above this are timestamps later than `now`.
const AHEAD_OF_NOW: Ticks = Ticks::MAX / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalenessPolicy {
    /// Keep driving the last value.
    Freeze,
    /// Apply the neutral pulse width once when the signal is lost.
    RevertToNeutral,
    /// Keep the last value, raise an alarm line on the diagnostic output.
    Alarm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStatus {
    /// Armed, no sample yet.
    Waiting,
    Active,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEventKind {
    Lost,
    Restored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalEvent {
    pub channel: ChannelId,
    pub kind: SignalEventKind,
}

impl SignalEvent {
    pub fn is_loss(&self) -> bool {
        self.kind == SignalEventKind::Lost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWatchdog {
    status: SignalStatus,
    last_seen: Ticks,
    timeout: Ticks,
}

impl SignalWatchdog {
    pub const fn new(timeout: Ticks, now: Ticks) -> Self {
        Self {
            status: SignalStatus::Waiting,
            last_seen: now,
            timeout,
        }
    }

    pub fn status(&self) -> SignalStatus {
        self.status
    }

    /// Records a fresh sample, `Restored` if the signal was lost before.
    pub fn feed(&mut self, at: Ticks) -> Option<SignalEventKind> {
        let previous = self.status;
        self.status = SignalStatus::Active;
        self.last_seen = at;
        (previous == SignalStatus::Lost).then_some(SignalEventKind::Restored)
    }

    /// `Lost` once, when the silence first exceeds the timeout.
    ///
    /// A sample stamped after `now` (an edge interrupt that fired while the
    /// pass was running) counts as fresh.
    pub fn check(&mut self, now: Ticks) -> Option<SignalEventKind> {
        if self.status == SignalStatus::Lost {
            return None;
        }
        let silence = elapsed(self.last_seen, now);
        if silence <= self.timeout || silence > AHEAD_OF_NOW {
            return None;
        }
        self.status = SignalStatus::Lost;
        Some(SignalEventKind::Lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_until_first_sample() {
        let mut dog = SignalWatchdog::new(1_000, 0);
        assert_eq!(dog.status(), SignalStatus::Waiting);
        assert_eq!(dog.check(1_000), None);
        assert_eq!(dog.feed(900), None);
        assert_eq!(dog.status(), SignalStatus::Active);
    }

    #[test]
    fn never_connected_times_out() {
        let mut dog = SignalWatchdog::new(1_000, 0);
        assert_eq!(dog.check(1_001), Some(SignalEventKind::Lost));
        assert_eq!(dog.status(), SignalStatus::Lost);
    }

    #[test]
    fn lost_reported_once() {
        let mut dog = SignalWatchdog::new(1_000, 0);
        dog.feed(500);
        assert_eq!(dog.check(1_500), None);
        assert_eq!(dog.check(1_501), Some(SignalEventKind::Lost));
        assert_eq!(dog.check(9_000), None);
        assert_eq!(dog.check(90_000), None);
    }

    #[test]
    fn restored_after_loss() {
        let mut dog = SignalWatchdog::new(1_000, 0);
        dog.check(5_000);
        assert_eq!(dog.feed(5_100), Some(SignalEventKind::Restored));
        assert_eq!(dog.feed(5_200), None);
        assert_eq!(dog.status(), SignalStatus::Active);
    }

    #[test]
    fn sample_newer_than_now_is_fresh() {
        let mut dog = SignalWatchdog::new(1_000, 0);
        dog.feed(10_005);
        assert_eq!(dog.check(10_000), None);
        assert_eq!(dog.status(), SignalStatus::Active);
        assert_eq!(dog.check(11_005), None);
        assert_eq!(dog.check(11_006), Some(SignalEventKind::Lost));
    }

    #[test]
    fn loss_events() {
        let lost = SignalEvent {
            channel: ChannelId::Color,
            kind: SignalEventKind::Lost,
        };
        let restored = SignalEvent {
            kind: SignalEventKind::Restored,
            ..lost
        };
        assert!(lost.is_loss());
        assert!(!restored.is_loss());
    }

    #[test]
    fn timeout_across_counter_wrap() {
        let mut dog = SignalWatchdog::new(1_000, 0);
        dog.feed(u32::MAX - 100);
        assert_eq!(dog.check(800), None);
        assert_eq!(dog.check(900), Some(SignalEventKind::Lost));
    }
}
