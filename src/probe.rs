//! Probe identity types.
//!
//! A connector channel carries at most one probe, and the attached probe's
//! type decides everything downstream: which converter chip the mux routes
//! the channel to, which decode path runs, and which polynomial table (for
//! thermocouples) or wire-count configuration (for RTDs) applies.

/// Probe attached to a connector channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeType {
    /// No probe attached.
    #[default]
    NotConnected,
    /// Type K thermocouple (chromel/alumel).
    TcK,
    /// Type J thermocouple (iron/constantan).
    TcJ,
    /// Type T thermocouple (copper/constantan).
    TcT,
    /// PT100 RTD, 2-wire hookup.
    Rtd2Wire,
    /// PT100 RTD, 3-wire hookup.
    Rtd3Wire,
}

/// The two converter families a probe can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFamily {
    Thermocouple,
    Rtd,
}

impl ProbeType {
    /// Converter family for this probe, `None` when nothing is attached.
    pub const fn family(self) -> Option<ProbeFamily> {
        match self {
            Self::TcK | Self::TcJ | Self::TcT => Some(ProbeFamily::Thermocouple),
            Self::Rtd2Wire | Self::Rtd3Wire => Some(ProbeFamily::Rtd),
            Self::NotConnected => None,
        }
    }

    pub const fn is_thermocouple(self) -> bool {
        matches!(self.family(), Some(ProbeFamily::Thermocouple))
    }

    pub const fn is_rtd(self) -> bool {
        matches!(self.family(), Some(ProbeFamily::Rtd))
    }
}
