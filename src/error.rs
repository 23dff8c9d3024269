//! Unified error type for the probe driver.
//!
//! One generic `Error` enum that every fallible operation funnels into,
//! keeping the caller's error handling uniform. `E` is the HAL's SPI error
//! type; the `From<E>` impl lets bus calls propagate with `?`. Sensor faults
//! are deliberately *not* errors: they latch into a per-engine fault byte and
//! readings taken under an active fault come back as NaN (see the decode
//! engines).

use core::fmt;

/// Every fallible operation in the driver funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// SPI transaction failed at the HAL level.
    Spi(E),
    /// The converter answered the init read with the all-ones sentinel:
    /// no chip on the bus (or the probe carrier is unpowered).
    NotDetected,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "spi: {e:?}"),
            Self::NotDetected => write!(f, "converter not detected"),
        }
    }
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::Spi(e)
    }
}
