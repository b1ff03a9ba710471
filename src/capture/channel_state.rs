use crate::channel::ChannelId;
use crate::config::{ControllerConfig, PULSE_NEUTRAL_US};
use crate::support::{TickRate, Ticks};

use super::{DebouncePolicy, Edge, EdgeOutcome, PulseCapture};

/// One finished measurement handed to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseSample {
    pub width_us: u32,
    /// Counter value at the falling edge.
    pub captured_at: Ticks,
}

impl PulseSample {
    /// Width as a converter input, saturated to `i32::MAX`.
    pub fn width(&self) -> i32 {
        i32::try_from(self.width_us).unwrap_or(i32::MAX)
    }
}

/// Single slot mailbox between the edge interrupt (producer) and the main
/// loop (consumer).
///
/// The owner must serialize access: on the target every `ChannelState` is a
/// separate RTIC resource and the main loop only touches it under `lock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    capture: PulseCapture,
    width_us: u32,
    captured_at: Ticks,
    pending: bool,
}

impl ChannelState {
    pub const fn new(debounce: DebouncePolicy, rate: TickRate) -> Self {
        Self {
            capture: PulseCapture::new(debounce, rate),
            width_us: PULSE_NEUTRAL_US as u32,
            captured_at: 0,
            pending: false,
        }
    }

    pub fn for_channel(config: &ControllerConfig, id: ChannelId) -> Self {
        Self::new(config.channel(id).debounce, config.tick_rate)
    }

    /// Interrupt side.
    pub fn on_edge(&mut self, edge: Edge, now: Ticks) -> EdgeOutcome {
        let outcome = self.capture.on_edge(edge, now, self.pending);
        if let EdgeOutcome::Captured(width_us) = outcome {
            self.width_us = width_us;
            self.captured_at = now;
            self.pending = true;
        }
        outcome
    }

    /// Main loop side: snapshot of the pending value, clears the ready flag.
    pub fn take(&mut self) -> Option<PulseSample> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(PulseSample {
            width_us: self.width_us,
            captured_at: self.captured_at,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// All three channels behind one owner, for hosts without per-channel
/// interrupt resources.
#[derive(Debug, Clone)]
pub struct Channels {
    states: [ChannelState; 3],
}

impl Channels {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            states: ChannelId::ALL.map(|id| ChannelState::for_channel(config, id)),
        }
    }

    pub fn on_edge(&mut self, id: ChannelId, edge: Edge, now: Ticks) -> EdgeOutcome {
        self.states[id.index()].on_edge(edge, now)
    }

    pub fn take(&mut self, id: ChannelId) -> Option<PulseSample> {
        self.states[id.index()].take()
    }

    pub fn is_pending(&self, id: ChannelId) -> bool {
        self.states[id.index()].is_pending()
    }
}
