//! Text diagnostics after each dispatcher pass.

use core::fmt::{self, Write};

use crate::dispatcher::PassReport;
use crate::watchdog::StalenessPolicy;

/// Writes `"<Label> PWM: <value>"` for every consumed channel and, under
/// [`StalenessPolicy::Alarm`], `"<Label> SIGNAL LOST"` for every lost one.
pub fn report<W: Write>(pass: &PassReport, out: &mut W) -> fmt::Result {
    for consumed in &pass.consumed {
        write!(out, "{} PWM: {}\r\n", consumed.channel.label(), consumed.width_us)?;
    }

    if pass.policy == Some(StalenessPolicy::Alarm) {
        for event in pass.events.iter().filter(|e| e.is_loss()) {
            write!(out, "{} SIGNAL LOST\r\n", event.channel.label())?;
        }
    }

    Ok(())
}
