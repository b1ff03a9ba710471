//! Pulse width to actuator value conversions.
//!
//! Converters are pure: the same width always gives the same output.

mod brightness;
mod color;
mod power;

pub use brightness::BrightnessDriver;
pub use color::{hue_to_rgb, ColorMixer, Rgb};
pub use power::{PowerState, PowerSwitch};

pub trait Converter {
    type Output;

    fn convert(&self, width_us: i32) -> Self::Output;
}
