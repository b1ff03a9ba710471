use crate::config::{PulseRange, HUE_SEGMENT, OUTPUT_MAX};
use crate::support;

use super::Converter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Full saturation, full value hue wheel in three 85 step segments:
/// red -> green -> blue -> red.
pub fn hue_to_rgb(hue: u8) -> Rgb {
    // 3 * 85 = 255, so every segment ramps over the whole output range
    let ramp = |step: u8| support::to_u8(3 * i64::from(step));
    let fall = |step: u8| support::to_u8(i64::from(OUTPUT_MAX) - 3 * i64::from(step));

    if hue < HUE_SEGMENT {
        Rgb::new(fall(hue), ramp(hue), 0)
    } else if hue < 2 * HUE_SEGMENT {
        let h = hue - HUE_SEGMENT;
        Rgb::new(0, fall(h), ramp(h))
    } else {
        let h = hue - 2 * HUE_SEGMENT;
        Rgb::new(ramp(h), 0, fall(h))
    }
}

/// Pulse width -> hue -> RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorMixer {
    range: PulseRange,
}

impl ColorMixer {
    pub const fn new(range: PulseRange) -> Self {
        Self { range }
    }

    pub fn hue(&self, width_us: i32) -> u8 {
        support::to_u8(support::map(
            width_us,
            self.range.min_us,
            self.range.max_us,
            0,
            i32::from(OUTPUT_MAX),
        ))
    }
}

impl Converter for ColorMixer {
    type Output = Rgb;

    fn convert(&self, width_us: i32) -> Rgb {
        hue_to_rgb(self.hue(width_us))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors() {
        assert_eq!(hue_to_rgb(0), Rgb::new(255, 0, 0));
        assert_eq!(hue_to_rgb(85), Rgb::new(0, 255, 0));
        assert_eq!(hue_to_rgb(170), Rgb::new(0, 0, 255));
    }

    #[test]
    fn segment_edges() {
        assert_eq!(hue_to_rgb(84), Rgb::new(3, 252, 0));
        assert_eq!(hue_to_rgb(169), Rgb::new(0, 3, 252));
        assert_eq!(hue_to_rgb(255), Rgb::new(255, 0, 0));
    }

    #[test]
    fn channel_sum_is_constant() {
        for hue in 0..=u8::MAX {
            let c = hue_to_rgb(hue);
            let sum = u16::from(c.r) + u16::from(c.g) + u16::from(c.b);
            assert_eq!(sum, 255, "hue {}", hue);
        }
    }

    #[test]
    fn pulse_widths() {
        let mixer = ColorMixer::default();
        assert_eq!(mixer.convert(1_000), Rgb::new(255, 0, 0));

        assert_eq!(mixer.hue(1_500), 127);
        assert_eq!(mixer.convert(1_500), Rgb::new(0, 129, 126));

        assert_eq!(mixer.hue(2_000), 255);
        assert_eq!(mixer.convert(2_000), Rgb::new(255, 0, 0));
    }

    #[test]
    fn clamps_hue() {
        let mixer = ColorMixer::default();
        assert_eq!(mixer.hue(200), 0);
        assert_eq!(mixer.hue(-5), 0);
        assert_eq!(mixer.hue(3_000), 255);
    }

    #[test]
    fn same_input_same_output() {
        let mixer = ColorMixer::default();
        assert_eq!(mixer.convert(1_321), mixer.convert(1_321));
    }
}
