use core::fmt;

use fugit_timer::ExtU32;

use crate::capture::DebouncePolicy;
use crate::channel::ChannelId;
use crate::support::TickRate;
use crate::watchdog::StalenessPolicy;

pub const MCU_XTAL_HZ: u32 = 8_000_000;
pub const SYSCLK_HZ: u32 = 72_000_000;

//-----------------------------------------------------------------------------

pub const SERIAL_BAUD_RATE: u32 = 9_600;

//-----------------------------------------------------------------------------

pub const PULSE_MIN_US: i32 = 1_000;
pub const PULSE_MAX_US: i32 = 2_000;
pub const PULSE_NEUTRAL_US: i32 = 1_500;

pub const POWER_THRESHOLD_US: i32 = PULSE_NEUTRAL_US;

//-----------------------------------------------------------------------------

pub const OUTPUT_MAX: u8 = u8::MAX;
pub const HUE_SEGMENT: u8 = 85;

pub const OUTPUT_PWM_FREQ_HZ: u32 = 1_000;

//-----------------------------------------------------------------------------

pub const DEFAULT_STALE_TIMEOUT_MS: u32 = 500;

/// Microsecond duration, same resolution as the pulse widths.
pub type Micros = fugit_timer::Duration<u32, 1, 1_000_000>;

/// GPIO port letter of a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
}

/// Physical line identifier, e.g. `PA0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineId {
    pub port: Port,
    pub pin: u8,
}

impl LineId {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }

    /// External interrupt line the pin is routed to.
    pub const fn exti_line(&self) -> u8 {
        self.pin
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let port = match self.port {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
        };
        write!(f, "P{}{}", port, self.pin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseRange {
    pub min_us: i32,
    pub max_us: i32,
}

impl PulseRange {
    pub const fn new(min_us: i32, max_us: i32) -> Self {
        Self { min_us, max_us }
    }

    pub const fn contains(&self, width_us: i32) -> bool {
        width_us >= self.min_us && width_us <= self.max_us
    }
}

impl Default for PulseRange {
    fn default() -> Self {
        Self::new(PULSE_MIN_US, PULSE_MAX_US)
    }
}

/// Input side of one logical channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub input: LineId,
    pub debounce: DebouncePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputWiring {
    pub power: LineId,
    pub brightness: LineId,
    pub red: LineId,
    pub green: LineId,
    pub blue: LineId,
}

impl OutputWiring {
    fn lines(&self) -> [LineId; 5] {
        [self.power, self.brightness, self.red, self.green, self.blue]
    }
}

/// Lines a firmware image is built for, inputs in [`ChannelId::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardWiring {
    pub inputs: [LineId; 3],
    pub outputs: OutputWiring,
}

/// Blue pill: receiver on PA0..PA2, power LED on PB12, brightness on
/// TIM3 CH1 (PA6), RGB on TIM4 CH1..CH3 (PB6..PB8).
pub const BLUE_PILL: BoardWiring = BoardWiring {
    inputs: [
        LineId::new(Port::A, 0),
        LineId::new(Port::A, 1),
        LineId::new(Port::A, 2),
    ],
    outputs: OutputWiring {
        power: LineId::new(Port::B, 12),
        brightness: LineId::new(Port::A, 6),
        red: LineId::new(Port::B, 6),
        green: LineId::new(Port::B, 7),
        blue: LineId::new(Port::B, 8),
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub pulse_range: PulseRange,
    pub power_threshold_us: i32,
    pub power: ChannelConfig,
    pub color: ChannelConfig,
    pub brightness: ChannelConfig,
    pub outputs: OutputWiring,
    pub staleness: StalenessPolicy,
    pub stale_timeout: Micros,
    pub tick_rate: TickRate,
}

impl Default for ControllerConfig {
    /// [`BLUE_PILL`] wiring.
    ///
    /// The power channel keeps overwriting unconsumed values: it is a two
    /// position switch, only the latest state matters.
    fn default() -> Self {
        let [power, color, brightness] = BLUE_PILL.inputs;
        Self {
            pulse_range: PulseRange::default(),
            power_threshold_us: POWER_THRESHOLD_US,
            power: ChannelConfig {
                input: power,
                debounce: DebouncePolicy::Overwrite,
            },
            color: ChannelConfig {
                input: color,
                debounce: DebouncePolicy::HoldUntilConsumed,
            },
            brightness: ChannelConfig {
                input: brightness,
                debounce: DebouncePolicy::HoldUntilConsumed,
            },
            outputs: BLUE_PILL.outputs,
            staleness: StalenessPolicy::Freeze,
            stale_timeout: DEFAULT_STALE_TIMEOUT_MS.millis(),
            tick_rate: TickRate::new(SYSCLK_HZ / 1_000_000),
        }
    }
}

impl ControllerConfig {
    pub fn channel(&self, id: ChannelId) -> &ChannelConfig {
        match id {
            ChannelId::Power => &self.power,
            ChannelId::Color => &self.color,
            ChannelId::Brightness => &self.brightness,
        }
    }

    /// Same policy for every input channel.
    pub fn with_debounce(mut self, debounce: DebouncePolicy) -> Self {
        self.power.debounce = debounce;
        self.color.debounce = debounce;
        self.brightness.debounce = debounce;
        self
    }

    pub fn stale_timeout_ticks(&self) -> Result<u32, ConfigError> {
        self.tick_rate
            .micros_to_ticks(self.stale_timeout.to_micros())
            .ok_or(ConfigError::TimeoutOverflow)
    }

    /// Checks the configured lines against the ones a firmware image drives.
    pub fn ensure_wiring(&self, board: &BoardWiring) -> Result<(), ConfigError> {
        let inputs = ChannelId::ALL.map(|id| self.channel(id).input);
        let outputs = self.outputs.lines();
        let board_outputs = board.outputs.lines();
        let pairs = inputs
            .iter()
            .chain(outputs.iter())
            .zip(board.inputs.iter().chain(board_outputs.iter()));

        for (&configured, &expected) in pairs {
            if configured != expected {
                return Err(ConfigError::WiringMismatch {
                    expected,
                    configured,
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.pulse_range;
        if range.min_us >= range.max_us {
            return Err(ConfigError::EmptyPulseRange {
                min_us: range.min_us,
                max_us: range.max_us,
            });
        }
        if !range.contains(self.power_threshold_us) {
            return Err(ConfigError::ThresholdOutsideRange(self.power_threshold_us));
        }
        if self.tick_rate.ticks_per_us() == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        self.stale_timeout_ticks()?;

        for line in ChannelId::ALL
            .iter()
            .map(|&id| self.channel(id).input)
            .chain(self.outputs.lines())
        {
            if line.pin > 15 {
                return Err(ConfigError::InvalidPin(line));
            }
        }

        for (i, &a) in ChannelId::ALL.iter().enumerate() {
            for &b in &ChannelId::ALL[i + 1..] {
                if self.channel(a).input.exti_line() == self.channel(b).input.exti_line() {
                    return Err(ConfigError::SharedInterruptLine(a, b));
                }
            }
        }

        let outputs = self.outputs.lines();
        for (i, line) in outputs.iter().enumerate() {
            let reused = outputs[i + 1..].contains(line)
                || ChannelId::ALL
                    .iter()
                    .any(|&id| self.channel(id).input == *line);
            if reused {
                return Err(ConfigError::OutputConflict(*line));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPulseRange { min_us: i32, max_us: i32 },
    ThresholdOutsideRange(i32),
    InvalidPin(LineId),
    SharedInterruptLine(ChannelId, ChannelId),
    OutputConflict(LineId),
    WiringMismatch { expected: LineId, configured: LineId },
    ZeroTickRate,
    TimeoutOverflow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPulseRange { min_us, max_us } => {
                write!(f, "empty pulse range {}..{} us", min_us, max_us)
            }
            ConfigError::ThresholdOutsideRange(t) => {
                write!(f, "power threshold {} us outside pulse range", t)
            }
            ConfigError::InvalidPin(line) => write!(f, "no such pin {}", line),
            ConfigError::SharedInterruptLine(a, b) => write!(
                f,
                "{} and {} inputs share one interrupt line",
                a.label(),
                b.label()
            ),
            ConfigError::OutputConflict(line) => write!(f, "line {} used twice", line),
            ConfigError::WiringMismatch {
                expected,
                configured,
            } => write!(f, "line {} configured, firmware drives {}", configured, expected),
            ConfigError::ZeroTickRate => write!(f, "tick rate must be non-zero"),
            ConfigError::TimeoutOverflow => write!(f, "stale timeout does not fit the tick counter"),
        }
    }
}
