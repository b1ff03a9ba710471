use crate::config::{PulseRange, OUTPUT_MAX};
use crate::support;

use super::Converter;

/// Linear map of the pulse range onto an 8-bit duty, saturating outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrightnessDriver {
    range: PulseRange,
}

impl BrightnessDriver {
    pub const fn new(range: PulseRange) -> Self {
        Self { range }
    }
}

impl Converter for BrightnessDriver {
    type Output = u8;

    fn convert(&self, width_us: i32) -> u8 {
        support::to_u8(support::map(
            width_us,
            self.range.min_us,
            self.range.max_us,
            0,
            i32::from(OUTPUT_MAX),
        ))
    }
}
