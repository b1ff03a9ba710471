//! Pulse width capture
//!
//! Interrupt handlers feed edges into a [`ChannelState`]; the main loop
//! drains finished measurements with [`ChannelState::take`].

mod channel_state;
mod pulse_capture;

pub use channel_state::{ChannelState, Channels, PulseSample};
pub use pulse_capture::{CaptureState, DebouncePolicy, Edge, EdgeOutcome, IgnoreReason, PulseCapture};
