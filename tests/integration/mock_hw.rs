//! Mock hardware for integration tests.
//!
//! Scripted SPI chips, recording mux lines and a recording delay, all
//! built on shared `Rc<RefCell<..>>` state so tests keep a handle on
//! the recorded history after moving the other handle into the driver.
//! All tests run on the host with no real hardware.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};
use std::convert::Infallible;

use thermomux::ports::MuxLine;
use thermomux::{ProbeConfig, ProbeSelector};

/// Frame the thermocouple converter answers when absent.
pub const ABSENT_FRAME: u32 = 0x00FF_FFFF;

/// Pack junction codes and fault flags into a thermocouple frame.
///
/// `hot_code` is the 14-bit hot-junction code (0.25 °C per unit),
/// `cold_code` the 12-bit cold-junction code (0.0625 °C per unit).
pub fn tc_frame(hot_code: i32, cold_code: i32, faults: u8) -> u32 {
    let mut raw = ((hot_code as u32) & 0x3FFF) << 18;
    raw |= ((cold_code as u32) & 0x0FFF) << 4;
    if faults != 0 {
        raw |= 1 << 16;
        raw |= u32::from(faults & 0x07);
    }
    raw
}

// ── Recording mux line ────────────────────────────────────────

#[derive(Default)]
pub struct LineState {
    pub configured: bool,
    pub claims: usize,
    pub high: bool,
    pub level_writes: usize,
}

/// Shared-handle select/routing line.
#[derive(Clone, Default)]
pub struct SharedLine(Rc<RefCell<LineState>>);

#[allow(dead_code)]
impl SharedLine {
    pub fn configured(&self) -> bool {
        self.0.borrow().configured
    }

    pub fn claims(&self) -> usize {
        self.0.borrow().claims
    }

    pub fn high(&self) -> bool {
        self.0.borrow().high
    }

    pub fn level_writes(&self) -> usize {
        self.0.borrow().level_writes
    }
}

impl MuxLine for SharedLine {
    fn claim_output(&mut self) {
        let mut s = self.0.borrow_mut();
        s.configured = true;
        s.claims += 1;
        s.high = false;
    }

    fn release(&mut self) {
        self.0.borrow_mut().configured = false;
    }

    fn set_level(&mut self, high: bool) {
        let mut s = self.0.borrow_mut();
        s.high = high;
        s.level_writes += 1;
    }
}

// ── Thermocouple chip (canned frames) ─────────────────────────

pub struct TcState {
    frames: Vec<u32>,
    cursor: usize,
    pub reads: usize,
}

/// MAX31855 stand-in replaying queued frames, repeating the last one
/// once the queue runs dry.
#[derive(Clone)]
pub struct TcChip(Rc<RefCell<TcState>>);

#[allow(dead_code)]
impl TcChip {
    pub fn with_frames(frames: &[u32]) -> Self {
        Self(Rc::new(RefCell::new(TcState {
            frames: frames.to_vec(),
            cursor: 0,
            reads: 0,
        })))
    }

    /// A live chip reading 100 °C hot against a 25 °C cold junction.
    pub fn healthy() -> Self {
        Self::with_frames(&[tc_frame(400, 400, 0)])
    }

    /// No chip fitted: the bus reads back all ones.
    pub fn absent() -> Self {
        Self::with_frames(&[ABSENT_FRAME])
    }

    pub fn reads(&self) -> usize {
        self.0.borrow().reads
    }

    /// Replace the frame script, rewinding to its start.
    pub fn set_frames(&self, frames: &[u32]) {
        let mut s = self.0.borrow_mut();
        s.frames = frames.to_vec();
        s.cursor = 0;
    }
}

impl ErrorType for TcChip {
    type Error = Infallible;
}

impl SpiDevice for TcChip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        for op in operations {
            if let Operation::Read(buf) = op {
                let raw = s.frames[s.cursor];
                if s.cursor + 1 < s.frames.len() {
                    s.cursor += 1;
                }
                s.reads += 1;
                buf.copy_from_slice(&raw.to_be_bytes());
            }
        }
        Ok(())
    }
}

// ── RTD chip (register map simulation) ────────────────────────

#[derive(Default)]
pub struct RtdState {
    pub regs: [u8; 8],
    /// Every register write as (address, value), in order.
    pub writes: Vec<(u8, u8)>,
    /// Every register address read, in order.
    pub reads: Vec<u8>,
}

/// MAX31865 stand-in backed by an 8-register map.
#[derive(Clone, Default)]
pub struct RtdChip(Rc<RefCell<RtdState>>);

#[allow(dead_code)]
impl RtdChip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the 16-bit RTD data register (fault bit included).
    pub fn set_raw(&self, raw: u16) {
        let mut s = self.0.borrow_mut();
        s.regs[1] = (raw >> 8) as u8;
        s.regs[2] = (raw & 0xFF) as u8;
    }

    pub fn set_reg(&self, addr: u8, value: u8) {
        self.0.borrow_mut().regs[addr as usize] = value;
    }

    pub fn reg(&self, addr: u8) -> u8 {
        self.0.borrow().regs[addr as usize]
    }

    /// Values written to the config register, in order.
    pub fn config_writes(&self) -> Vec<u8> {
        let s = self.0.borrow();
        s.writes
            .iter()
            .filter(|(addr, _)| *addr == 0)
            .map(|(_, value)| *value)
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.0.borrow().writes.len()
    }
}

impl ErrorType for RtdChip {
    type Error = Infallible;
}

impl SpiDevice for RtdChip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        for op in operations {
            match op {
                Operation::TransferInPlace(buf) => {
                    let addr = (buf[0] & 0x7F) as usize;
                    s.reads.push(buf[0] & 0x7F);
                    for i in 1..buf.len() {
                        buf[i] = s.regs[(addr + i - 1) % 8];
                    }
                }
                Operation::Write(buf) => {
                    let addr = buf[0] & 0x7F;
                    s.regs[addr as usize] = buf[1];
                    s.writes.push((addr, buf[1]));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

// ── Recording delay ───────────────────────────────────────────

/// Delay provider that records instead of sleeping.
#[derive(Default)]
pub struct SpyDelay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for SpyDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }
}

// ── Assembled rig ─────────────────────────────────────────────

pub type MockSelector = ProbeSelector<TcChip, RtdChip, SharedLine, SharedLine, SharedLine, SharedLine>;

/// A full driver wired to mocks, with the recording handles kept out.
pub struct Rig {
    pub selector: MockSelector,
    pub tc_chip: TcChip,
    pub rtd_chip: RtdChip,
    pub selects: [SharedLine; 3],
    pub routing: SharedLine,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_chips(TcChip::healthy(), RtdChip::new(), config)
    }

    pub fn with_chips(tc: TcChip, rtd: RtdChip, config: ProbeConfig) -> Self {
        let selects = [
            SharedLine::default(),
            SharedLine::default(),
            SharedLine::default(),
        ];
        let routing = SharedLine::default();
        let selector = ProbeSelector::new(
            tc.clone(),
            rtd.clone(),
            selects[0].clone(),
            selects[1].clone(),
            selects[2].clone(),
            routing.clone(),
            config,
        );
        Self {
            selector,
            tc_chip: tc,
            rtd_chip: rtd,
            selects,
            routing,
        }
    }

    /// Indices of select lines currently driven high.
    pub fn high_lines(&self) -> Vec<usize> {
        self.selects
            .iter()
            .enumerate()
            .filter(|(_, line)| line.high())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn lines_configured(&self) -> bool {
        self.selects.iter().all(SharedLine::configured) && self.routing.configured()
    }
}
