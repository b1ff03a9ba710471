use crate::support::{elapsed, TickRate, Ticks};

/// Level change seen by the input interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// The interrupt fires on both edges; the level read inside the
    /// handler tells which one it was.
    pub const fn from_level(is_high: bool) -> Self {
        if is_high {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Measuring { started_at: Ticks },
}

/// What to do with a finished measurement while the previous one was not
/// consumed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePolicy {
    /// Latest measurement wins.
    Overwrite,
    /// Drop new measurements until the pending one is taken.
    HoldUntilConsumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Falling edge without a preceding rising edge.
    NotMeasuring,
    /// Previous value still pending under [`DebouncePolicy::HoldUntilConsumed`].
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Started,
    /// Second rising edge, the start timestamp was replaced.
    Restarted,
    /// Pulse width in microseconds.
    Captured(u32),
    Ignored(IgnoreReason),
}

/// `Idle -> Measuring -> Idle` state machine of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseCapture {
    state: CaptureState,
    debounce: DebouncePolicy,
    rate: TickRate,
}

impl PulseCapture {
    pub const fn new(debounce: DebouncePolicy, rate: TickRate) -> Self {
        Self {
            state: CaptureState::Idle,
            debounce,
            rate,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// `pending` - an earlier measurement has not been consumed yet.
    pub fn on_edge(&mut self, edge: Edge, now: Ticks, pending: bool) -> EdgeOutcome {
        match (edge, self.state) {
            (Edge::Rising, CaptureState::Idle) => {
                self.state = CaptureState::Measuring { started_at: now };
                EdgeOutcome::Started
            }
            (Edge::Rising, CaptureState::Measuring { .. }) => {
                self.state = CaptureState::Measuring { started_at: now };
                EdgeOutcome::Restarted
            }
            (Edge::Falling, CaptureState::Idle) => EdgeOutcome::Ignored(IgnoreReason::NotMeasuring),
            (Edge::Falling, CaptureState::Measuring { started_at }) => {
                self.state = CaptureState::Idle;
                if pending && self.debounce == DebouncePolicy::HoldUntilConsumed {
                    EdgeOutcome::Ignored(IgnoreReason::Pending)
                } else {
                    EdgeOutcome::Captured(self.rate.ticks_to_micros(elapsed(started_at, now)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(debounce: DebouncePolicy) -> PulseCapture {
        PulseCapture::new(debounce, TickRate::MICROS)
    }

    #[test]
    fn level_to_edge() {
        assert_eq!(Edge::from_level(true), Edge::Rising);
        assert_eq!(Edge::from_level(false), Edge::Falling);
    }

    #[test]
    fn measures_high_time() {
        let mut c = capture(DebouncePolicy::Overwrite);
        assert_eq!(c.on_edge(Edge::Rising, 10_000, false), EdgeOutcome::Started);
        assert_eq!(
            c.state(),
            CaptureState::Measuring { started_at: 10_000 }
        );
        assert_eq!(c.on_edge(Edge::Falling, 11_600, false), EdgeOutcome::Captured(1_600));
        assert_eq!(c.state(), CaptureState::Idle);
    }

    #[test]
    fn zero_start_is_a_valid_timestamp() {
        let mut c = capture(DebouncePolicy::HoldUntilConsumed);
        c.on_edge(Edge::Rising, 0, false);
        assert_eq!(c.on_edge(Edge::Falling, 1_234, false), EdgeOutcome::Captured(1_234));
    }

    #[test]
    fn width_across_counter_wrap() {
        let mut c = capture(DebouncePolicy::Overwrite);
        c.on_edge(Edge::Rising, u32::MAX - 499, false);
        assert_eq!(c.on_edge(Edge::Falling, 1_000, false), EdgeOutcome::Captured(1_500));
    }

    #[test]
    fn scales_ticks() {
        let mut c = PulseCapture::new(DebouncePolicy::Overwrite, TickRate::new(72));
        c.on_edge(Edge::Rising, 720, false);
        assert_eq!(
            c.on_edge(Edge::Falling, 720 + 72 * 1_987, false),
            EdgeOutcome::Captured(1_987)
        );
    }

    #[test]
    fn falling_edge_without_rising_is_ignored() {
        for policy in [DebouncePolicy::Overwrite, DebouncePolicy::HoldUntilConsumed] {
            let mut c = capture(policy);
            assert_eq!(
                c.on_edge(Edge::Falling, 5_000, false),
                EdgeOutcome::Ignored(IgnoreReason::NotMeasuring)
            );
            assert_eq!(c.state(), CaptureState::Idle);
        }
    }

    #[test]
    fn second_rising_edge_restarts() {
        let mut c = capture(DebouncePolicy::Overwrite);
        c.on_edge(Edge::Rising, 100, false);
        assert_eq!(c.on_edge(Edge::Rising, 400, false), EdgeOutcome::Restarted);
        assert_eq!(c.on_edge(Edge::Falling, 1_900, false), EdgeOutcome::Captured(1_500));
    }

    #[test]
    fn hold_policy_drops_while_pending() {
        let mut c = capture(DebouncePolicy::HoldUntilConsumed);
        c.on_edge(Edge::Rising, 0, true);
        assert_eq!(
            c.on_edge(Edge::Falling, 1_500, true),
            EdgeOutcome::Ignored(IgnoreReason::Pending)
        );
        assert_eq!(c.state(), CaptureState::Idle);

        c.on_edge(Edge::Rising, 20_000, false);
        assert_eq!(c.on_edge(Edge::Falling, 21_700, false), EdgeOutcome::Captured(1_700));
    }

    #[test]
    fn overwrite_policy_ignores_pending() {
        let mut c = capture(DebouncePolicy::Overwrite);
        c.on_edge(Edge::Rising, 0, true);
        assert_eq!(c.on_edge(Edge::Falling, 1_200, true), EdgeOutcome::Captured(1_200));
    }
}
