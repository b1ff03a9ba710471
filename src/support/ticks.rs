/// Raw value of a free-running wrapping counter.
pub type Ticks = u32;

/// Time between two counter readings, correct across one counter wrap.
#[inline]
pub fn elapsed(since: Ticks, now: Ticks) -> Ticks {
    now.wrapping_sub(since)
}

/// Counter frequency in ticks per microsecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRate {
    ticks_per_us: u32,
}

impl TickRate {
    pub const MICROS: TickRate = TickRate::new(1);

    pub const fn new(ticks_per_us: u32) -> Self {
        Self { ticks_per_us }
    }

    pub const fn ticks_per_us(&self) -> u32 {
        self.ticks_per_us
    }

    pub fn ticks_to_micros(&self, ticks: Ticks) -> u32 {
        ticks.checked_div(self.ticks_per_us).unwrap_or(ticks)
    }

    pub fn micros_to_ticks(&self, us: u32) -> Option<Ticks> {
        us.checked_mul(self.ticks_per_us)
    }
}
