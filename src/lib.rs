//! Multiplexed temperature-probe driver for a three-connector carrier:
//! thermocouples (types J, K, T) through a MAX31855-style converter
//! and PT100 RTDs (2- and 3-wire) through a MAX31865-style converter,
//! both reached over SPI behind shared analog mux select lines.
//!
//! [`ProbeSelector`] is the usual entry point; the converter drivers
//! in [`max31855`] and [`max31865`] also work on their own when no mux
//! sits in front of the chips. Everything is `no_std` and generic over
//! `embedded-hal` traits.

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod config;
pub mod error;
pub mod max31855;
pub mod max31865;
pub mod mux;
pub mod ports;
pub mod probe;
pub mod selector;
pub mod settle;

mod bus;

pub use config::ProbeConfig;
pub use error::Error;
pub use probe::{ProbeFamily, ProbeType};
pub use selector::ProbeSelector;
