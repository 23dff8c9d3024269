//! Probe-facing facade over the two converter drivers and the mux.
//!
//! [`ProbeSelector`] owns one [`Max31855`], one [`Max31865`] and the
//! [`InputMux`], and is the only place the three meet:
//!
//! * **Lifecycle**: `begin_tc`/`begin_rtd` gate each converter's
//!   activation independently and share the select-line bank through
//!   acquire/release counting. A failed begin rolls its acquisition
//!   back, so a board with only one converter fitted keeps working and
//!   the absent one can be retried later.
//! * **Selection**: `select_channel` (blocking) and
//!   `select_channel_poll` (non-blocking) validate and remap the
//!   logical channel, route the analog path, reprogram whichever
//!   converter serves the probe family when the mux reports a cache
//!   miss, and serve the switch-settle delay.
//!
//! Reads go straight to the engines via [`tc_mut`](ProbeSelector::tc_mut)
//! and [`rtd_mut`](ProbeSelector::rtd_mut) once a channel is selected.
//!
//! Both SPI devices must share one error type; in practice they sit on
//! the same bus behind the same HAL, so they do.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use log::warn;

use crate::config::ProbeConfig;
use crate::error::Error;
use crate::max31855::Max31855;
use crate::max31865::Max31865;
use crate::mux::{self, InputMux, SelectBank};
use crate::ports::MuxLine;
use crate::probe::{ProbeFamily, ProbeType};

pub struct ProbeSelector<TcSpi, RtdSpi, S0, S1, S2, R> {
    tc: Max31855<TcSpi>,
    rtd: Max31865<RtdSpi>,
    mux: InputMux<S0, S1, S2, R>,
    config: ProbeConfig,
    tc_active: bool,
    rtd_active: bool,
}

impl<TcSpi, RtdSpi, S0, S1, S2, R> ProbeSelector<TcSpi, RtdSpi, S0, S1, S2, R>
where
    TcSpi: SpiDevice,
    RtdSpi: SpiDevice<Error = TcSpi::Error>,
    S0: MuxLine,
    S1: MuxLine,
    S2: MuxLine,
    R: MuxLine,
{
    /// Wire up both converters and the select lines.
    ///
    /// `tc_spi` must run at 4 MHz mode 0 and `rtd_spi` at 1 MHz mode 1;
    /// both settings ride on the `SpiDevice` implementations. The
    /// config's cold-junction offset and fault mask land in the TC
    /// engine here; the 50 Hz filter needs bus traffic and is applied
    /// by [`begin_rtd`](Self::begin_rtd).
    pub fn new(
        tc_spi: TcSpi,
        rtd_spi: RtdSpi,
        select0: S0,
        select1: S1,
        select2: S2,
        routing: R,
        config: ProbeConfig,
    ) -> Self {
        let mut tc = Max31855::new(tc_spi);
        tc.set_cold_offset(f64::from(config.cold_junction_offset));
        tc.set_fault_mask(config.tc_fault_mask);
        let bank = SelectBank::new(select0, select1, select2, routing);
        let mux = InputMux::new(bank, config.swap_outer_channels);
        Self {
            tc,
            rtd: Max31865::new(rtd_spi),
            mux,
            config,
            tc_active: false,
            rtd_active: false,
        }
    }

    // ───────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────

    /// Activate the thermocouple side. A no-op reporting success when
    /// already active.
    pub fn begin_tc(&mut self) -> Result<(), Error<TcSpi::Error>> {
        if self.tc_active {
            return Ok(());
        }
        self.mux.acquire();
        if let Err(e) = self.tc.begin() {
            warn!("thermocouple begin failed: {e}");
            self.mux.release();
            return Err(e);
        }
        self.tc_active = true;
        Ok(())
    }

    /// Activate the RTD side. A no-op reporting success when already
    /// active.
    pub fn begin_rtd(&mut self) -> Result<(), Error<TcSpi::Error>> {
        if self.rtd_active {
            return Ok(());
        }
        self.mux.acquire();
        if let Err(e) = self.start_rtd() {
            warn!("rtd begin failed: {e}");
            self.mux.release();
            return Err(e);
        }
        self.rtd_active = true;
        Ok(())
    }

    /// Activate both converters. TC first; an RTD failure leaves the
    /// TC side active so the caller can retry just `begin_rtd`.
    pub fn begin(&mut self) -> Result<(), Error<TcSpi::Error>> {
        self.begin_tc()?;
        self.begin_rtd()
    }

    pub fn end_tc(&mut self) {
        if self.tc_active {
            self.tc.end();
            self.tc_active = false;
            self.mux.release();
        }
    }

    pub fn end_rtd(&mut self) {
        if self.rtd_active {
            self.rtd.end();
            self.rtd_active = false;
            self.mux.release();
        }
    }

    pub fn end(&mut self) {
        self.end_tc();
        self.end_rtd();
    }

    pub fn tc_active(&self) -> bool {
        self.tc_active
    }

    pub fn rtd_active(&self) -> bool {
        self.rtd_active
    }

    fn start_rtd(&mut self) -> Result<(), Error<TcSpi::Error>> {
        self.rtd.begin()?;
        self.rtd.set_filter_50hz(self.config.filter_50hz)
    }

    // ───────────────────────────────────────────────────────────
    // Channel selection
    // ───────────────────────────────────────────────────────────

    /// Select `channel` for `probe`, blocking for the settle delay
    /// when the select lines change. Out-of-range channels are ignored.
    ///
    /// Answers whether a channel is selected and stable.
    pub fn select_channel(
        &mut self,
        channel: u8,
        probe: ProbeType,
        delay: &mut impl DelayNs,
    ) -> Result<bool, Error<TcSpi::Error>> {
        if let Some(physical) = self.mux.remap(channel) {
            if self.mux.switch_probe(physical, probe) {
                self.reprogram(probe)?;
            }
            if self.mux.switch_channel(physical) {
                delay.delay_ms(mux::settle_ms(probe));
                self.mux.settle_done();
            }
        }
        Ok(self.mux.selected())
    }

    /// Non-blocking [`select_channel`](Self::select_channel): a line
    /// change arms the settle countdown and answers false; later calls
    /// with the same arguments poll it and answer true from the settle
    /// deadline onward. Out-of-range channels are ignored.
    pub fn select_channel_poll(
        &mut self,
        channel: u8,
        probe: ProbeType,
        now_ms: u32,
    ) -> Result<bool, Error<TcSpi::Error>> {
        if let Some(physical) = self.mux.remap(channel) {
            if self.mux.switch_probe(physical, probe) {
                self.reprogram(probe)?;
            }
            if self.mux.switch_channel(physical) {
                self.mux.arm_settle(now_ms, mux::settle_ms(probe));
            } else {
                self.mux.poll_settle(now_ms);
            }
        }
        Ok(self.mux.selected())
    }

    /// Point the converter serving `probe` at the right alloy or wire
    /// count. Empty channels leave both engines alone.
    fn reprogram(&mut self, probe: ProbeType) -> Result<(), Error<TcSpi::Error>> {
        match probe.family() {
            Some(ProbeFamily::Thermocouple) => {
                self.tc.set_probe_type(probe);
                Ok(())
            }
            Some(ProbeFamily::Rtd) => self.rtd.set_rtd_type(probe),
            None => Ok(()),
        }
    }

    // ───────────────────────────────────────────────────────────
    // Access
    // ───────────────────────────────────────────────────────────

    pub fn tc(&self) -> &Max31855<TcSpi> {
        &self.tc
    }

    pub fn tc_mut(&mut self) -> &mut Max31855<TcSpi> {
        &mut self.tc
    }

    pub fn rtd(&self) -> &Max31865<RtdSpi> {
        &self.rtd
    }

    pub fn rtd_mut(&mut self) -> &mut Max31865<RtdSpi> {
        &mut self.rtd
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Physical channel currently driven, after board remap.
    pub fn current_channel(&self) -> Option<u8> {
        self.mux.current_channel()
    }

    /// True when no channel switch is settling.
    pub fn selected(&self) -> bool {
        self.mux.selected()
    }
}
