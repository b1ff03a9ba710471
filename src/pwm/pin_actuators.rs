use embedded_hal::digital::v2::OutputPin;
use embedded_hal::PwmPin;

use crate::convert::{PowerState, Rgb};

use super::{scale_duty, Actuators};

/// Actuators on plain `embedded-hal` pins.
pub struct PinActuators<PWR, BR, R, G, B> {
    power: PWR,
    brightness: BR,
    red: R,
    green: G,
    blue: B,
}

impl<PWR, BR, R, G, B> PinActuators<PWR, BR, R, G, B>
where
    PWR: OutputPin,
    BR: PwmPin<Duty = u16>,
    R: PwmPin<Duty = u16>,
    G: PwmPin<Duty = u16>,
    B: PwmPin<Duty = u16>,
{
    /// Enables the PWM channels, all outputs start dark.
    pub fn new(power: PWR, brightness: BR, red: R, green: G, blue: B) -> Result<Self, PWR::Error> {
        let mut res = Self {
            power,
            brightness,
            red,
            green,
            blue,
        };

        res.power.set_low()?;
        set_level(&mut res.brightness, 0);
        set_level(&mut res.red, 0);
        set_level(&mut res.green, 0);
        set_level(&mut res.blue, 0);

        res.brightness.enable();
        res.red.enable();
        res.green.enable();
        res.blue.enable();

        Ok(res)
    }

    pub fn release(self) -> (PWR, BR, R, G, B) {
        (self.power, self.brightness, self.red, self.green, self.blue)
    }
}

fn set_level<P: PwmPin<Duty = u16>>(pin: &mut P, level: u8) {
    let duty = scale_duty(level, pin.get_max_duty());
    pin.set_duty(duty);
}

impl<PWR, BR, R, G, B> Actuators for PinActuators<PWR, BR, R, G, B>
where
    PWR: OutputPin,
    BR: PwmPin<Duty = u16>,
    R: PwmPin<Duty = u16>,
    G: PwmPin<Duty = u16>,
    B: PwmPin<Duty = u16>,
{
    type Error = PWR::Error;

    fn set_power(&mut self, state: PowerState) -> Result<(), Self::Error> {
        match state {
            PowerState::On => self.power.set_high(),
            PowerState::Off => self.power.set_low(),
        }
    }

    fn set_brightness(&mut self, duty: u8) -> Result<(), Self::Error> {
        set_level(&mut self.brightness, duty);
        Ok(())
    }

    fn set_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        set_level(&mut self.red, color.r);
        set_level(&mut self.green, color.g);
        set_level(&mut self.blue, color.b);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestPin {
        high: bool,
        fail: bool,
    }

    #[derive(Debug, PartialEq)]
    struct PinFault;

    impl OutputPin for TestPin {
        type Error = PinFault;

        fn set_low(&mut self) -> Result<(), PinFault> {
            if self.fail {
                return Err(PinFault);
            }
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), PinFault> {
            if self.fail {
                return Err(PinFault);
            }
            self.high = true;
            Ok(())
        }
    }

    struct TestPwm {
        duty: u16,
        max: u16,
        enabled: bool,
    }

    impl TestPwm {
        fn new(max: u16) -> Self {
            Self {
                duty: 0xAAAA,
                max,
                enabled: false,
            }
        }
    }

    impl PwmPin for TestPwm {
        type Duty = u16;

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn enable(&mut self) {
            self.enabled = true;
        }

        fn get_duty(&self) -> u16 {
            self.duty
        }

        fn get_max_duty(&self) -> u16 {
            self.max
        }

        fn set_duty(&mut self, duty: u16) {
            self.duty = duty;
        }
    }

    type Outputs = PinActuators<TestPin, TestPwm, TestPwm, TestPwm, TestPwm>;

    fn outputs() -> Outputs {
        PinActuators::new(
            TestPin::default(),
            TestPwm::new(1_000),
            TestPwm::new(u16::MAX),
            TestPwm::new(u16::MAX),
            TestPwm::new(255),
        )
        .unwrap()
    }

    #[test]
    fn starts_dark_and_enabled() {
        let (power, brightness, r, g, b) = outputs().release();
        assert!(!power.high);
        for pwm in [&brightness, &r, &g, &b] {
            assert_eq!(pwm.get_duty(), 0);
            assert!(pwm.enabled);
        }
    }

    #[test]
    fn writes_levels() {
        let mut out = outputs();
        out.set_power(PowerState::On).unwrap();
        out.set_brightness(255).unwrap();
        out.set_color(Rgb::new(255, 0, 51)).unwrap();

        let (power, brightness, r, g, b) = out.release();
        assert!(power.high);
        assert_eq!(brightness.get_duty(), 1_000);
        assert_eq!(r.get_duty(), u16::MAX);
        assert_eq!(g.get_duty(), 0);
        assert_eq!(b.get_duty(), 51);
    }

    #[test]
    fn propagates_pin_error() {
        let mut out = outputs();
        let (mut power, brightness, r, g, b) = out.release();
        power.fail = true;
        out = PinActuators {
            power,
            brightness,
            red: r,
            green: g,
            blue: b,
        };
        assert_eq!(out.set_power(PowerState::Off), Err(PinFault));

        let (power, ..) = out.release();
        let res = PinActuators::new(
            power,
            TestPwm::new(1),
            TestPwm::new(1),
            TestPwm::new(1),
            TestPwm::new(1),
        );
        assert!(res.is_err());
    }
}
