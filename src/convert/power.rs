use crate::config::POWER_THRESHOLD_US;

use super::Converter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    #[default]
    Off,
    On,
}

/// Two position switch, no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSwitch {
    threshold_us: i32,
}

impl PowerSwitch {
    pub const fn new(threshold_us: i32) -> Self {
        Self { threshold_us }
    }
}

impl Default for PowerSwitch {
    fn default() -> Self {
        Self::new(POWER_THRESHOLD_US)
    }
}

impl Converter for PowerSwitch {
    type Output = PowerState;

    fn convert(&self, width_us: i32) -> PowerState {
        if width_us < self.threshold_us {
            PowerState::Off
        } else {
            PowerState::On
        }
    }
}
