//! Actuator outputs

mod duty;
mod pin_actuators;

pub use duty::scale_duty;
pub use pin_actuators::PinActuators;

use crate::convert::{PowerState, Rgb};

/// Write side of the hardware: one binary line and four PWM lines.
pub trait Actuators {
    type Error;

    fn set_power(&mut self, state: PowerState) -> Result<(), Self::Error>;
    fn set_brightness(&mut self, duty: u8) -> Result<(), Self::Error>;
    fn set_color(&mut self, color: Rgb) -> Result<(), Self::Error>;
}

/// Last values written to the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorOutputs {
    pub power: PowerState,
    pub brightness: u8,
    pub color: Rgb,
}
