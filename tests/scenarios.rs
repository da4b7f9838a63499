//! End-to-end behaviour of the driver against the simulated peripheral.

use samd_rtc::{
    Error,
    clocks::ClockSource,
    regs::{Hardware, Reg, rcause, rtc as bits},
    rtc::{AlarmMatch, CalendarTime, EPOCH_OFFSET, IntSource, Prescaler, Rtc, RtcConfig, RtcMode},
    sim::SimRtc,
    sync::SyncPolicy,
};

const MODES: [RtcMode; 3] = [RtcMode::Count32, RtcMode::Count16, RtcMode::Clock];

fn begin(sim: SimRtc, config: RtcConfig) -> Rtc<SimRtc> {
    let mut rtc = Rtc::new(sim);
    rtc.begin(config).unwrap();
    rtc
}

fn fresh(mode: RtcMode) -> Rtc<SimRtc> {
    begin(SimRtc::new(), RtcConfig::default().mode(mode).reset_time(true))
}

/// Everything a mutator could touch, to compare before and after.
fn snapshot(rtc: &mut Rtc<SimRtc>) -> [u32; 8] {
    let hw = rtc.hardware();
    [
        hw.read(Reg::RtcCtrl),
        hw.read(Reg::Mode0Count),
        hw.read(Reg::Mode1Per),
        hw.read(Reg::Mode0Comp0),
        hw.read(Reg::Mode2Mask0),
        hw.interrupt_enables(),
        hw.interrupt_flags(),
        hw.read(Reg::GclkGenDiv),
    ]
}

#[test]
fn calls_for_other_modes_are_no_ops() {
    for mode in MODES {
        let mut rtc = fresh(mode);
        let before = snapshot(&mut rtc);

        if mode != RtcMode::Count32 {
            rtc.set_count_32(1234);
            assert_eq!(rtc.get_compare(), 0);
        }
        if mode != RtcMode::Count16 {
            rtc.set_count_16(1234);
            rtc.set_period(77);
            rtc.enable_counter_16(3, 4);
            assert_eq!(rtc.get_period(), 0);
            assert_eq!(rtc.get_compare_16(0), 0);
        }
        if mode == RtcMode::Clock {
            rtc.enable_counter(99);
            rtc.disable_counter();
            assert_eq!(rtc.get_count(), 0);
        } else {
            rtc.set_time(1, 2, 3);
            rtc.set_date(4, 5, 6);
            rtc.set_alarm_time(7, 8, 9);
            rtc.set_alarm_date(10, 11, 12);
            rtc.enable_alarm(AlarmMatch::YearMonthDayHoursMinutesSeconds);
            rtc.disable_alarm();
            rtc.set_epoch(1_500_000_000);
            rtc.set_alarm_epoch(1_500_000_000);
            rtc.set_y2k_epoch(1_000);
            assert_eq!(rtc.get_date_time(), CalendarTime::default());
            assert_eq!(rtc.get_alarm(), CalendarTime::default());
        }

        assert_eq!(snapshot(&mut rtc), before, "{mode:?}");
    }
}

#[test]
fn calls_before_begin_are_no_ops() {
    let mut rtc = Rtc::new(SimRtc::new());
    let before = snapshot(&mut rtc);

    rtc.set_count_32(5);
    rtc.set_count_16(5);
    rtc.enable_counter(5);
    rtc.enable_overflow();
    rtc.set_time(1, 1, 1);
    rtc.enable_alarm(AlarmMatch::Seconds);
    rtc.set_epoch(1_600_000_000);

    assert_eq!(snapshot(&mut rtc), before);
    assert_eq!(rtc.get_count(), 0);
    assert_eq!(rtc.get_seconds(), 0);
    assert_eq!(rtc.get_day(), 1);
    assert_eq!(rtc.get_month(), 1);
    assert_eq!(rtc.get_int_source(), IntSource::Unknown);
    assert_eq!(rtc.hardware().read_requests(), 0);
}

#[test]
fn calls_before_begin_never_wait_on_an_unclocked_rtc() {
    let mut sim = SimRtc::new();
    sim.hang_sync(true);
    let mut rtc = Rtc::new(sim);

    rtc.set_count_32(5);
    rtc.enable_overflow();
    rtc.set_time(1, 1, 1);
    rtc.set_epoch(1_600_000_000);
    rtc.on_interrupt();

    assert_eq!(rtc.get_count(), 0);
    assert_eq!(rtc.get_epoch(), EPOCH_OFFSET);
    assert_eq!(rtc.get_int_source(), IntSource::Unknown);
    assert_eq!(rtc.hardware().read_requests(), 0);
    assert_eq!(rtc.hardware().status_polls(), 0);
}

#[test]
fn date_and_time_round_trip() {
    let mut rtc = fresh(RtcMode::Clock);
    for (d, m, y, h, mi, s) in [
        (1, 1, 0, 0, 0, 0),
        (31, 12, 63, 23, 59, 59),
        (29, 2, 24, 12, 30, 45),
        (15, 6, 7, 9, 5, 1),
    ] {
        rtc.set_date(d, m, y);
        rtc.set_time(h, mi, s);

        assert_eq!(
            (
                rtc.get_day(),
                rtc.get_month(),
                rtc.get_year(),
                rtc.get_hours(),
                rtc.get_minutes(),
                rtc.get_seconds()
            ),
            (d, m, y, h, mi, s)
        );
    }
}

#[test]
fn epoch_round_trip_and_y2k_identity() {
    let mut rtc = fresh(RtcMode::Clock);
    let mut ts = EPOCH_OFFSET;
    // Roughly every 97 days up to 2063.
    while ts < 2_966_371_199 {
        rtc.set_epoch(ts);
        assert_eq!(rtc.get_epoch(), ts);
        assert_eq!(rtc.get_y2k_epoch(), rtc.get_epoch() - EPOCH_OFFSET);
        ts += 8_388_607;
    }
}

#[test]
fn epochs_before_2000_clamp() {
    for ts in [0, 1, 946_684_799, 500_000_000] {
        let mut a = fresh(RtcMode::Clock);
        let mut b = fresh(RtcMode::Clock);
        a.set_epoch(ts);
        b.set_epoch(EPOCH_OFFSET);
        assert_eq!(a.get_date_time(), b.get_date_time());
        assert_eq!(a.get_epoch(), EPOCH_OFFSET);
    }
}

#[test]
fn disabled_alarm_is_never_reported() {
    let mut rtc = fresh(RtcMode::Clock);
    rtc.set_alarm_time(0, 0, 3);
    rtc.enable_alarm(AlarmMatch::Seconds);
    rtc.disable_alarm();

    // Clock and alarm fields are equal after three seconds.
    rtc.hardware().tick(3);
    assert_eq!(rtc.get_seconds(), rtc.get_alarm_seconds());
    assert_ne!(rtc.get_int_source(), IntSource::Alarm0);

    // Even with the flag forced.
    rtc.hardware().raise(bits::INT_ALARM0);
    assert_ne!(rtc.get_int_source(), IntSource::Alarm0);
}

#[test]
fn alarm_fires_and_clears() {
    let mut rtc = fresh(RtcMode::Clock);
    rtc.set_epoch(EPOCH_OFFSET + 3_600);
    rtc.set_alarm_epoch(EPOCH_OFFSET + 3_600 + 90);
    rtc.enable_alarm(AlarmMatch::HoursMinutesSeconds);

    rtc.hardware().tick(89);
    assert!(!rtc.hardware().interrupt_pending());
    rtc.hardware().tick(1);
    assert_eq!(rtc.get_int_source(), IntSource::Alarm0);

    rtc.on_interrupt();
    assert!(!rtc.hardware().interrupt_pending());
}

#[test]
fn warm_reset_preserves_value() {
    for mode in [RtcMode::Count32, RtcMode::Count16] {
        let mut rtc = fresh(mode);
        match mode {
            RtcMode::Count32 => rtc.set_count_32(123_456),
            _ => rtc.set_count_16(4_321),
        }
        let expected = rtc.get_count();

        for cause in [rcause::SYST, rcause::WDT, rcause::EXT] {
            let mut sim = Rtc::free(rtc);
            sim.warm_reset(cause);
            rtc = begin(sim, RtcConfig::default().mode(mode));
            assert_eq!(rtc.get_count(), expected);
        }
    }
}

#[test]
fn warm_reset_preserves_calendar() {
    let mut rtc = fresh(RtcMode::Clock);
    rtc.set_epoch(1_700_000_000);

    let mut sim = rtc.free();
    sim.warm_reset(rcause::WDT);
    let mut rtc = begin(sim, RtcConfig::default());

    assert_eq!(rtc.get_epoch(), 1_700_000_000);
}

#[test]
fn warm_reset_with_zeroed_calendar_writes_default() {
    let mut rtc = fresh(RtcMode::Clock);
    rtc.hardware().write(Reg::Mode2Clock, 0);

    let mut sim = rtc.free();
    sim.warm_reset(rcause::WDT);
    let mut rtc = begin(sim, RtcConfig::default());

    assert_eq!(rtc.get_date_time(), CalendarTime::default());
    assert_eq!(rtc.get_epoch(), EPOCH_OFFSET);
}

#[test]
fn power_on_writes_default() {
    let mut rtc = fresh(RtcMode::Count32);
    rtc.set_count_32(777);

    for cause in [rcause::POR, rcause::BOD12, rcause::BOD33] {
        let mut sim = rtc.free();
        sim.warm_reset(cause);
        rtc = begin(sim, RtcConfig::default().mode(RtcMode::Count32));
        assert_eq!(rtc.get_count(), 0);
        rtc.set_count_32(777);
    }
}

#[test]
fn reset_time_discards_value() {
    let mut rtc = fresh(RtcMode::Clock);
    rtc.set_epoch(1_700_000_000);

    let mut sim = rtc.free();
    sim.warm_reset(rcause::SYST);
    let mut rtc = begin(sim, RtcConfig::default().reset_time(true));

    assert_eq!(rtc.get_seconds(), 0);
    assert_eq!(rtc.get_minutes(), 0);
    assert_eq!(rtc.get_hours(), 0);
    assert_eq!(rtc.get_day(), 1);
    assert_eq!(rtc.get_month(), 1);
    assert_eq!(rtc.get_year(), 0);
}

#[test]
fn count32_compare_match_scenario() {
    let mut rtc = fresh(RtcMode::Count32);
    rtc.set_count_32(100);
    rtc.enable_counter(150);

    rtc.hardware().tick(50);

    assert_eq!(rtc.get_int_source(), IntSource::Compare0);
    rtc.on_interrupt();
    assert!(!rtc.hardware().interrupt_pending());
    assert_eq!(rtc.hardware().interrupt_flags() & bits::INT_CMP0, 0);
    // The counter keeps running past the compare value.
    assert_eq!(rtc.get_count(), 150);
}

#[test]
fn clear_on_match_restarts_count() {
    let mut rtc = begin(
        SimRtc::new(),
        RtcConfig::default()
            .mode(RtcMode::Count32)
            .clear_on_match(true)
            .reset_time(true),
    );
    rtc.enable_counter(10);

    rtc.hardware().tick(10);
    assert_eq!(rtc.get_count(), 0);
    rtc.hardware().tick(3);
    assert_eq!(rtc.get_count(), 3);
}

#[test]
fn count16_period_overflow() {
    let mut rtc = fresh(RtcMode::Count16);
    rtc.set_period(9);
    // Out of reach, so only the overflow fires.
    rtc.enable_counter_16(100, 200);
    rtc.enable_overflow();

    rtc.hardware().tick(10);

    assert_eq!(rtc.get_count(), 0);
    assert_eq!(rtc.get_int_source(), IntSource::Overflow);
}

#[test]
fn software_reset_removed_once() {
    for mode in MODES {
        let mut rtc = fresh(mode);
        let writes = rtc.hardware().ctrl_writes();

        let set = writes.iter().position(|w| w & bits::CTRL_SWRST != 0);
        assert!(set.is_some(), "{mode:?}");
        let after: Vec<_> = writes[set.unwrap() + 1..].to_vec();
        assert_eq!(
            after.iter().filter(|w| *w & bits::CTRL_SWRST != 0).count(),
            0
        );
        assert!(after.iter().all(|w| bits::CTRL_MODE.get(*w) == mode as u32));
    }
}

#[test]
fn crystalless_source() {
    let mut rtc = begin(
        SimRtc::new(),
        RtcConfig::default().clock_source(ClockSource::UltraLowPower32k),
    );
    assert_eq!(rtc.hardware().writes(Reg::SysctrlXosc32k), 0);
    assert_eq!(rtc.prescaler(), 32_768);
}

#[test]
fn rebegin_switches_mode() {
    let mut rtc = fresh(RtcMode::Clock);
    rtc.begin(
        RtcConfig::default()
            .mode(RtcMode::Count16)
            .prescaler(Prescaler::Div1)
            .clock_divisor(0),
    )
    .unwrap();

    assert_eq!(rtc.mode(), Some(RtcMode::Count16));
    assert_eq!(rtc.prescaler(), 2);
    assert_eq!(rtc.get_hours(), 0);
    rtc.set_count_16(12);
    assert_eq!(rtc.get_count(), 12);
}

#[test]
fn bounded_sync_records_fault_after_begin() {
    let mut rtc = begin(
        SimRtc::new(),
        RtcConfig::default()
            .mode(RtcMode::Count32)
            .sync_policy(SyncPolicy::Bounded(1_000)),
    );
    assert_eq!(rtc.take_fault(), None);

    rtc.hardware().hang_sync(true);
    rtc.set_count_32(5);

    assert_eq!(rtc.take_fault(), Some(Error::RegisterUnchanged));
    assert_eq!(rtc.take_fault(), None);
    assert!(rtc.is_configured());
}

#[test]
fn interrupt_priority_forwarded() {
    let mut rtc = begin(SimRtc::new(), RtcConfig::default().irq_priority(2));
    assert_eq!(rtc.hardware().irq_priority(), Some(2));
}
