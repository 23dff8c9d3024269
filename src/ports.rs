//! Port trait for the mux select and routing lines.
//!
//! ```text
//!   HAL pin ──▶ MuxLine ──▶ SelectBank (shared line ownership)
//! ```
//!
//! The select/routing lines need one capability `embedded-hal`'s
//! [`OutputPin`] cannot express: direction release. While no probe sub-driver
//! is active the carrier expects the lines floating (input, latch low), and
//! they only become push-pull outputs for the first `begin`. HALs with
//! dynamic pin modes implement [`MuxLine`] directly; everything else gets the
//! blanket [`OutputPin`] impl, where claim/release degrade to driving the
//! idle-low level.

use embedded_hal::digital::OutputPin;

// ───────────────────────────────────────────────────────────────
// Mux line port (driven adapter: driver → carrier GPIO)
// ───────────────────────────────────────────────────────────────

/// A digital line of the probe mux: three one-hot channel selects plus the
/// TC/RTD routing line.
pub trait MuxLine {
    /// Configure the line as a push-pull output, driven low.
    fn claim_output(&mut self);

    /// Return the line to high-impedance input, level latch low.
    fn release(&mut self);

    /// Drive the output level.
    fn set_level(&mut self, high: bool);
}

/// Level-only fallback for HALs without runtime direction control.
///
/// Pin errors are ignored: carrier GPIO writes are infallible on every HAL
/// this driver targets, and the select protocol has no error path.
impl<P: OutputPin> MuxLine for P {
    fn claim_output(&mut self) {
        let _ = self.set_low();
    }

    fn release(&mut self) {
        let _ = self.set_low();
    }

    fn set_level(&mut self, high: bool) {
        if high {
            let _ = self.set_high();
        } else {
            let _ = self.set_low();
        }
    }
}
