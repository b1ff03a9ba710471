//! Main loop: turns published samples into actuator writes.

use heapless::Vec;

use crate::capture::{Channels, PulseSample};
use crate::channel::ChannelId;
use crate::config::{ConfigError, ControllerConfig, PULSE_NEUTRAL_US};
use crate::convert::{BrightnessDriver, ColorMixer, Converter, PowerSwitch};
use crate::pwm::{ActuatorOutputs, Actuators};
use crate::support::Ticks;
use crate::watchdog::{SignalEvent, SignalStatus, SignalWatchdog, StalenessPolicy};

/// Where the dispatcher takes samples from. `take` must snapshot the value
/// and clear the ready flag as one step.
pub trait SampleSource {
    fn take(&mut self, channel: ChannelId) -> Option<PulseSample>;
}

impl SampleSource for Channels {
    fn take(&mut self, channel: ChannelId) -> Option<PulseSample> {
        Channels::take(self, channel)
    }
}

impl<F> SampleSource for F
where
    F: FnMut(ChannelId) -> Option<PulseSample>,
{
    fn take(&mut self, channel: ChannelId) -> Option<PulseSample> {
        self(channel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumed {
    pub channel: ChannelId,
    /// Snapshot fed to the converter.
    pub width_us: i32,
}

/// What one pass did, in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub consumed: Vec<Consumed, 3>,
    pub events: Vec<SignalEvent, 6>,
    /// Policy in effect when the events were raised.
    pub policy: Option<StalenessPolicy>,
}

impl PassReport {
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.events.is_empty()
    }

    pub fn width(&self, channel: ChannelId) -> Option<i32> {
        self.consumed
            .iter()
            .find(|c| c.channel == channel)
            .map(|c| c.width_us)
    }
}

pub struct Dispatcher {
    power: PowerSwitch,
    brightness: BrightnessDriver,
    color: ColorMixer,
    watchdogs: [SignalWatchdog; 3],
    staleness: StalenessPolicy,
    outputs: ActuatorOutputs,
}

impl Dispatcher {
    pub fn new(config: &ControllerConfig, now: Ticks) -> Result<Self, ConfigError> {
        config.validate()?;
        let timeout = config.stale_timeout_ticks()?;

        log::info!(
            "pulse range {}..{} us, power threshold {} us, stale timeout {} us ({:?})",
            config.pulse_range.min_us,
            config.pulse_range.max_us,
            config.power_threshold_us,
            config.stale_timeout.to_micros(),
            config.staleness
        );

        Ok(Self {
            power: PowerSwitch::new(config.power_threshold_us),
            brightness: BrightnessDriver::new(config.pulse_range),
            color: ColorMixer::new(config.pulse_range),
            watchdogs: [SignalWatchdog::new(timeout, now); 3],
            staleness: config.staleness,
            outputs: ActuatorOutputs::default(),
        })
    }

    pub fn outputs(&self) -> &ActuatorOutputs {
        &self.outputs
    }

    pub fn status(&self, channel: ChannelId) -> SignalStatus {
        self.watchdogs[channel.index()].status()
    }

    /// One loop iteration over Power, Color and Brightness.
    ///
    /// An actuator error ends the pass. The failing sample and every sample
    /// already taken in this pass are dropped together with their report;
    /// outputs keep the last value written successfully.
    pub fn run_pass<S, A>(
        &mut self,
        source: &mut S,
        actuators: &mut A,
        now: Ticks,
    ) -> Result<PassReport, A::Error>
    where
        S: SampleSource,
        A: Actuators,
    {
        let mut report = PassReport::default();

        for channel in ChannelId::ALL {
            let Some(sample) = source.take(channel) else {
                continue;
            };

            let width_us = sample.width();
            if let Some(kind) = self.watchdogs[channel.index()].feed(sample.captured_at) {
                log::info!("{} signal restored", channel.label());
                let _ = report.events.push(SignalEvent { channel, kind });
            }

            log::trace!("{} PWM: {}", channel.label(), width_us);
            self.apply(channel, width_us, actuators)?;
            let _ = report.consumed.push(Consumed { channel, width_us });
        }

        for channel in ChannelId::ALL {
            if let Some(kind) = self.watchdogs[channel.index()].check(now) {
                log::warn!("{} signal lost", channel.label());
                if self.staleness == StalenessPolicy::RevertToNeutral {
                    self.apply(channel, PULSE_NEUTRAL_US, actuators)?;
                }
                let _ = report.events.push(SignalEvent { channel, kind });
            }
        }

        if !report.events.is_empty() {
            report.policy = Some(self.staleness);
        }

        Ok(report)
    }

    fn apply<A: Actuators>(
        &mut self,
        channel: ChannelId,
        width_us: i32,
        actuators: &mut A,
    ) -> Result<(), A::Error> {
        match channel {
            ChannelId::Power => {
                let state = self.power.convert(width_us);
                actuators.set_power(state)?;
                self.outputs.power = state;
            }
            ChannelId::Color => {
                let color = self.color.convert(width_us);
                actuators.set_color(color)?;
                self.outputs.color = color;
            }
            ChannelId::Brightness => {
                let duty = self.brightness.convert(width_us);
                actuators.set_brightness(duty)?;
                self.outputs.brightness = duty;
            }
        }
        Ok(())
    }
}
