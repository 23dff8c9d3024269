//! Probe subsystem configuration.
//!
//! Board and calibration parameters for one three-channel probe carrier.
//! The host assembles this (from its own storage or provisioning surface)
//! and hands it to [`ProbeSelector::new`](crate::selector::ProbeSelector::new);
//! nothing here is persisted by the driver itself.

use serde::{Deserialize, Serialize};

use crate::max31855;

/// Core probe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    // --- RTD conversion ---
    /// Reference resistor on the RTD converter, in ohms.
    pub reference_resistance: f32,
    /// Nominal RTD resistance at 0 °C, in ohms (100 for PT100).
    pub nominal_resistance: f32,
    /// Use the 50 Hz mains rejection filter instead of 60 Hz.
    pub filter_50hz: bool,

    // --- TC conversion ---
    /// Cold-junction offset subtracted from the reference sensor, in °C.
    pub cold_junction_offset: f32,
    /// Which TC fault bits latch and poison readings (see
    /// [`max31855::FAULT_ALL`]).
    pub tc_fault_mask: u8,

    // --- Carrier ---
    /// This carrier revision wires channels 0 and 2 swapped.
    pub swap_outer_channels: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            // RTD: PT100 against the carrier's 400 Ω reference
            reference_resistance: 400.0,
            nominal_resistance: 100.0,
            filter_50hz: false,

            // TC
            cold_junction_offset: 2.10,
            tc_fault_mask: max31855::FAULT_ALL,

            // Carrier
            swap_outer_channels: false,
        }
    }
}
