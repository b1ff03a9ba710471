#![cfg_attr(not(test), no_std)]

//! Remote control receiver to LED decoder.
//!
//! Three PWM channels from an RC receiver are timed by edge interrupts
//! ([`capture`]), picked up by the main loop ([`dispatcher`]) and turned into
//! a power LED state, a brightness duty and an RGB hue ([`convert`]).

pub mod capture;
pub mod channel;
pub mod config;
pub mod convert;
pub mod dispatcher;
pub mod pwm;
pub mod report;
pub mod watchdog;

mod support;

#[cfg(feature = "stm32f103")]
mod serial_interface;

pub use capture::{ChannelState, Channels, Edge, PulseSample};
pub use channel::ChannelId;
pub use config::{ConfigError, ControllerConfig};
pub use dispatcher::{Dispatcher, PassReport, SampleSource};
pub use pwm::{Actuators, PinActuators};
pub use support::{TickRate, Ticks};

#[cfg(feature = "stm32f103")]
pub use serial_interface::SerialConsole;
