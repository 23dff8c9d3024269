//! Integration tests for channel selection through the full driver:
//! remap, one-hot select lines, probe-cache hits, routing and both
//! settle protocols, all against recorded mock hardware.

use crate::mock_hw::{Rig, SpyDelay};
use thermomux::max31865::regs;
use thermomux::{ProbeConfig, ProbeType};

#[test]
fn select_drives_exactly_one_line_per_channel() {
    let mut rig = Rig::new(ProbeConfig::default());
    let mut delay = SpyDelay::default();
    rig.selector.begin_tc().unwrap();

    for channel in 0..3u8 {
        let stable = rig
            .selector
            .select_channel(channel, ProbeType::TcK, &mut delay)
            .unwrap();
        assert!(stable);
        assert_eq!(rig.high_lines(), vec![channel as usize]);
    }
}

#[test]
fn reversed_carrier_swaps_outer_channels() {
    let config = ProbeConfig {
        swap_outer_channels: true,
        ..ProbeConfig::default()
    };
    let mut rig = Rig::new(config);
    let mut delay = SpyDelay::default();
    rig.selector.begin_tc().unwrap();

    rig.selector
        .select_channel(0, ProbeType::TcK, &mut delay)
        .unwrap();
    assert_eq!(rig.high_lines(), vec![2]);

    rig.selector
        .select_channel(1, ProbeType::TcK, &mut delay)
        .unwrap();
    assert_eq!(rig.high_lines(), vec![1]);

    rig.selector
        .select_channel(2, ProbeType::TcK, &mut delay)
        .unwrap();
    assert_eq!(rig.high_lines(), vec![0]);
}

#[test]
fn repeat_selection_hits_cache_but_rewrites_lines() {
    let mut rig = Rig::new(ProbeConfig::default());
    let mut delay = SpyDelay::default();
    rig.selector.begin_rtd().unwrap();

    rig.selector
        .select_channel(1, ProbeType::Rtd3Wire, &mut delay)
        .unwrap();
    let chip_writes = rig.rtd_chip.write_count();
    let line_writes = rig.selects[1].level_writes();
    assert_eq!(delay.waits_ms, vec![75]);

    // same channel, same probe: no chip traffic, lines re-asserted,
    // no settle
    rig.selector
        .select_channel(1, ProbeType::Rtd3Wire, &mut delay)
        .unwrap();
    assert_eq!(rig.rtd_chip.write_count(), chip_writes);
    assert_eq!(rig.selects[1].level_writes(), line_writes + 1);
    assert_eq!(delay.waits_ms, vec![75]);
}

#[test]
fn probe_change_on_same_channel_reprograms_without_settle() {
    let mut rig = Rig::new(ProbeConfig::default());
    let mut delay = SpyDelay::default();
    rig.selector.begin_rtd().unwrap();

    rig.selector
        .select_channel(0, ProbeType::Rtd2Wire, &mut delay)
        .unwrap();
    assert_eq!(rig.rtd_chip.reg(regs::CONFIG) & regs::CFG_THREE_WIRE, 0);
    assert_eq!(delay.waits_ms, vec![75]);

    rig.selector
        .select_channel(0, ProbeType::Rtd3Wire, &mut delay)
        .unwrap();
    assert_ne!(rig.rtd_chip.reg(regs::CONFIG) & regs::CFG_THREE_WIRE, 0);
    // lines did not change, so no second settle
    assert_eq!(delay.waits_ms, vec![75]);
}

#[test]
fn settle_delay_follows_probe_family() {
    let mut delay = SpyDelay::default();

    let mut rig = Rig::new(ProbeConfig::default());
    rig.selector.begin_tc().unwrap();
    rig.selector
        .select_channel(0, ProbeType::TcJ, &mut delay)
        .unwrap();
    assert_eq!(delay.waits_ms, vec![150]);

    let mut rig = Rig::new(ProbeConfig::default());
    let mut delay = SpyDelay::default();
    rig.selector.begin_rtd().unwrap();
    rig.selector
        .select_channel(0, ProbeType::Rtd2Wire, &mut delay)
        .unwrap();
    assert_eq!(delay.waits_ms, vec![75]);
}

#[test]
fn poll_select_turns_true_at_the_settle_deadline() {
    let mut rig = Rig::new(ProbeConfig::default());
    rig.selector.begin_tc().unwrap();

    assert!(
        !rig.selector
            .select_channel_poll(0, ProbeType::TcK, 1_000)
            .unwrap()
    );
    assert!(
        !rig.selector
            .select_channel_poll(0, ProbeType::TcK, 1_149)
            .unwrap()
    );
    assert!(
        rig.selector
            .select_channel_poll(0, ProbeType::TcK, 1_150)
            .unwrap()
    );
    // stays selected on further polls
    assert!(
        rig.selector
            .select_channel_poll(0, ProbeType::TcK, 1_151)
            .unwrap()
    );
}

#[test]
fn poll_select_uses_the_rtd_settle_for_rtd_probes() {
    let mut rig = Rig::new(ProbeConfig::default());
    rig.selector.begin_rtd().unwrap();

    assert!(
        !rig.selector
            .select_channel_poll(2, ProbeType::Rtd2Wire, 0)
            .unwrap()
    );
    assert!(
        !rig.selector
            .select_channel_poll(2, ProbeType::Rtd2Wire, 74)
            .unwrap()
    );
    assert!(
        rig.selector
            .select_channel_poll(2, ProbeType::Rtd2Wire, 75)
            .unwrap()
    );
}

#[test]
fn out_of_range_channel_changes_nothing() {
    let mut rig = Rig::new(ProbeConfig::default());
    let mut delay = SpyDelay::default();
    rig.selector.begin_tc().unwrap();

    rig.selector
        .select_channel(7, ProbeType::TcK, &mut delay)
        .unwrap();
    assert_eq!(rig.selector.current_channel(), None);
    assert!(rig.high_lines().is_empty());
    assert!(delay.waits_ms.is_empty());

    // a bad channel after a good one keeps the good selection
    rig.selector
        .select_channel(1, ProbeType::TcK, &mut delay)
        .unwrap();
    let stable = rig
        .selector
        .select_channel(9, ProbeType::Rtd2Wire, &mut delay)
        .unwrap();
    assert!(stable, "previous selection still stands");
    assert_eq!(rig.selector.current_channel(), Some(1));
    assert_eq!(rig.high_lines(), vec![1]);
}

#[test]
fn routing_line_tracks_probe_family() {
    let mut rig = Rig::new(ProbeConfig::default());
    let mut delay = SpyDelay::default();
    rig.selector.begin().unwrap();

    rig.selector
        .select_channel(0, ProbeType::TcK, &mut delay)
        .unwrap();
    assert!(!rig.routing.high(), "TC path routes low");

    rig.selector
        .select_channel(1, ProbeType::Rtd2Wire, &mut delay)
        .unwrap();
    assert!(rig.routing.high(), "RTD path routes high");

    // an empty channel leaves the routing wherever it was
    let routing_writes = rig.routing.level_writes();
    rig.selector
        .select_channel(2, ProbeType::NotConnected, &mut delay)
        .unwrap();
    assert!(rig.routing.high());
    assert_eq!(rig.routing.level_writes(), routing_writes);
}
