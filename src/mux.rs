//! Input multiplexer for the three probe connectors.
//!
//! The carrier routes each connector through an analog mux into one of
//! two converter chips. Three one-hot select lines pick the connector
//! and a routing line picks the converter family:
//!
//! ```text
//!               select0/1/2 (one-hot)
//!                      │
//!  connector 0 ──┐     ▼
//!  connector 1 ──┼── analog mux ──┬── routing low  ──▶ TC converter
//!  connector 2 ──┘                └── routing high ──▶ RTD converter
//! ```
//!
//! ## Shared line ownership
//!
//! Both converter drivers need the same four lines, so [`SelectBank`]
//! reference-counts them: the first `acquire` configures the lines as
//! outputs idling low, the last `release` lets go of them again.
//!
//! ## Switch settle
//!
//! Changing connector disturbs the analog path, so a freshly switched
//! channel is not trustworthy until a settle delay has passed (the RTD
//! path recovers faster than the TC path). [`InputMux`] tracks that
//! with a two-state machine the caller drives either blockingly or by
//! polling with a millisecond timestamp.
//!
//! ## Board revisions
//!
//! One carrier revision wires the outer connectors in reverse order.
//! The mux hides that: callers always address logical channels 0..2
//! and [`InputMux::remap`] swaps 0 and 2 when the reversed layout is
//! flagged. The per-channel probe cache is indexed by the physical
//! channel after remapping.

use log::debug;

use crate::ports::MuxLine;
use crate::probe::{ProbeFamily, ProbeType};
use crate::settle::SettleTimer;

/// Number of probe connectors on the carrier.
pub const CHANNEL_COUNT: usize = 3;

/// Settle delay after switching onto the thermocouple path, ms.
pub const SETTLE_TC_MS: u32 = 150;
/// Settle delay after switching onto the RTD path, ms.
pub const SETTLE_RTD_MS: u32 = 75;

/// Settle delay for a probe type. Channels without a probe attached
/// settle on the slower thermocouple schedule.
pub fn settle_ms(probe: ProbeType) -> u32 {
    match probe.family() {
        Some(ProbeFamily::Rtd) => SETTLE_RTD_MS,
        _ => SETTLE_TC_MS,
    }
}

// ───────────────────────────────────────────────────────────────
// Shared select lines
// ───────────────────────────────────────────────────────────────

/// Reference-counted owner of the select and routing lines.
///
/// The TC and RTD sub-drivers activate independently; the bank
/// configures the lines when the first one arrives and releases them
/// when the last one leaves.
pub struct SelectBank<S0, S1, S2, R> {
    select0: S0,
    select1: S1,
    select2: S2,
    routing: R,
    users: u8,
}

impl<S0, S1, S2, R> SelectBank<S0, S1, S2, R>
where
    S0: MuxLine,
    S1: MuxLine,
    S2: MuxLine,
    R: MuxLine,
{
    pub fn new(select0: S0, select1: S1, select2: S2, routing: R) -> Self {
        Self {
            select0,
            select1,
            select2,
            routing,
            users: 0,
        }
    }

    /// Register a user, configuring the lines on the first call.
    pub fn acquire(&mut self) {
        if self.users == 0 {
            self.select0.claim_output();
            self.select1.claim_output();
            self.select2.claim_output();
            self.routing.claim_output();
        }
        self.users += 1;
        debug!("select bank acquired ({} users)", self.users);
    }

    /// Drop a user, releasing the lines when the last one leaves.
    /// Answers true when the bank just became inactive.
    pub fn release(&mut self) -> bool {
        self.users = self.users.saturating_sub(1);
        debug!("select bank released ({} users)", self.users);
        if self.users == 0 {
            self.select0.release();
            self.select1.release();
            self.select2.release();
            self.routing.release();
            return true;
        }
        false
    }

    pub fn active(&self) -> bool {
        self.users > 0
    }

    /// Drive the one-hot select pattern for a physical channel. Always
    /// rewrites all three lines so a glitched line recovers on the
    /// next selection.
    fn drive(&mut self, channel: u8) {
        self.select0.set_level(channel == 0);
        self.select1.set_level(channel == 1);
        self.select2.set_level(channel == 2);
    }

    /// Point the analog path at the converter for a probe family.
    fn route(&mut self, family: ProbeFamily) {
        self.routing.set_level(matches!(family, ProbeFamily::Rtd));
    }
}

// ───────────────────────────────────────────────────────────────
// Channel switching
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwitchState {
    /// A line change is settling out; the payload knows when it is done.
    Switching(SettleTimer),
    /// The selected channel (if any) is stable.
    Selected,
}

/// Connector selection, probe-type cache and switch-settle tracking.
///
/// The mux only moves lines and bookkeeping; reprogramming a converter
/// for a new probe type is signalled to the caller through the return
/// value of [`switch_probe`](InputMux::switch_probe).
pub struct InputMux<S0, S1, S2, R> {
    bank: SelectBank<S0, S1, S2, R>,
    /// Physical channel currently driven, None before the first
    /// selection and after teardown.
    current: Option<u8>,
    /// Last probe type staged per physical channel.
    cache: [ProbeType; CHANNEL_COUNT],
    /// Carrier revision wires connectors 0 and 2 in reverse order.
    swap_outer: bool,
    state: SwitchState,
}

impl<S0, S1, S2, R> InputMux<S0, S1, S2, R>
where
    S0: MuxLine,
    S1: MuxLine,
    S2: MuxLine,
    R: MuxLine,
{
    pub fn new(bank: SelectBank<S0, S1, S2, R>, swap_outer: bool) -> Self {
        Self {
            bank,
            current: None,
            cache: [ProbeType::NotConnected; CHANNEL_COUNT],
            swap_outer,
            state: SwitchState::Selected,
        }
    }

    pub fn acquire(&mut self) {
        self.bank.acquire();
    }

    /// Release the bank; when the last user leaves, forget the current
    /// selection so the next activation starts from a clean slate.
    pub fn release(&mut self) {
        if self.bank.release() {
            self.current = None;
            self.state = SwitchState::Selected;
        }
    }

    pub fn active(&self) -> bool {
        self.bank.active()
    }

    /// Map a logical channel to the physical connector, honouring the
    /// reversed-layout revision. Out-of-range channels answer None.
    pub fn remap(&self, channel: u8) -> Option<u8> {
        if channel as usize >= CHANNEL_COUNT {
            return None;
        }
        if self.swap_outer {
            Some(2 - channel)
        } else {
            Some(channel)
        }
    }

    /// Route the analog path for `probe` and refresh the channel
    /// cache. Answers true when the caller must reprogram a converter,
    /// which is whenever the channel or its cached probe type changed.
    ///
    /// Channels without a probe leave the routing line untouched.
    pub fn switch_probe(&mut self, physical: u8, probe: ProbeType) -> bool {
        if let Some(family) = probe.family() {
            self.bank.route(family);
        }
        let reprogram =
            self.current != Some(physical) || self.cache[physical as usize] != probe;
        self.cache[physical as usize] = probe;
        reprogram
    }

    /// Drive the select lines for `physical` and answer whether the
    /// pattern changed (a change needs a settle delay).
    pub fn switch_channel(&mut self, physical: u8) -> bool {
        self.bank.drive(physical);
        let changed = self.current != Some(physical);
        self.current = Some(physical);
        changed
    }

    /// Start the settle countdown after a line change.
    pub fn arm_settle(&mut self, now_ms: u32, settle_ms: u32) {
        self.state = SwitchState::Switching(SettleTimer::start(now_ms, settle_ms));
    }

    /// Advance the settle machine; answers [`selected`](Self::selected).
    pub fn poll_settle(&mut self, now_ms: u32) -> bool {
        if let SwitchState::Switching(timer) = self.state {
            if timer.elapsed(now_ms) {
                self.state = SwitchState::Selected;
            }
        }
        self.selected()
    }

    /// Mark the settle delay as served (blocking path).
    pub fn settle_done(&mut self) {
        self.state = SwitchState::Selected;
    }

    /// True when no switch is settling. Holds before the first
    /// selection too; [`current_channel`](Self::current_channel)
    /// distinguishes "stable on a channel" from "nothing selected".
    pub fn selected(&self) -> bool {
        self.state == SwitchState::Selected
    }

    pub fn current_channel(&self) -> Option<u8> {
        self.current
    }

    pub fn cached_probe(&self, physical: u8) -> ProbeType {
        self.cache
            .get(physical as usize)
            .copied()
            .unwrap_or_default()
    }
}
