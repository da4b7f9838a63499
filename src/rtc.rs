//! Real Time Counter
//!
//! Interface to the RTC. See SAM D21 datasheet, section 19.
//!
//! The peripheral runs in one of three modes, chosen once by [`Rtc::begin`]:
//! - [`RtcMode::Count32`]: a free-running 32-bit counter with one compare register,
//! - [`RtcMode::Count16`]: a 16-bit counter with a period register and two compare registers,
//! - [`RtcMode::Clock`]: a calendar with packed date/time fields and one alarm.
//!
//! Every method is usable at any time, but only acts when addressed to the active mode.
//! Anything else, including calls made before `begin`, does nothing and reads back a
//! default value.
//!
//! Register access is slow: each write waits for the RTC clock domain to acknowledge it, and
//! each counter/clock read first synchronizes the value. Don't call these methods from the
//! RTC interrupt handler; use [`Rtc::on_interrupt`] there.

mod calendar;
mod counter;
mod dispatch;
mod epoch;

pub use calendar::{AlarmMatch, CalendarTime};
pub use dispatch::{Handler, IntSource};
pub use epoch::EPOCH_OFFSET;

use crate::{
    clocks::{self, CALENDAR_GCLK_DIV, ClockSource, gclk_division},
    error::{Error, Result},
    regs::{Hardware, Reg, rtc},
    reset_cause::ResetCause,
    sync::{SyncGate, SyncPolicy},
    util,
};

/// RTC operating mode. CTRL register, MODE field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RtcMode {
    /// Mode 0: 32-bit counter.
    Count32 = 0,
    /// Mode 1: 16-bit counter.
    Count16 = 1,
    /// Mode 2: clock/calendar.
    Clock = 2,
}

impl RtcMode {
    fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::Count32),
            1 => Some(Self::Count16),
            2 => Some(Self::Clock),
            _ => None,
        }
    }

    /// The register holding this mode's running value.
    pub(crate) fn value_reg(self) -> Reg {
        match self {
            Self::Count32 => Reg::Mode0Count,
            Self::Count16 => Reg::Mode1Count,
            Self::Clock => Reg::Mode2Clock,
        }
    }

    /// Every event flag this mode can raise. The interrupt handler clears all of them.
    pub(crate) fn event_flags(self) -> u32 {
        match self {
            Self::Count32 => rtc::INT_CMP0 | rtc::INT_OVF,
            Self::Count16 => rtc::INT_CMP0 | rtc::INT_CMP1 | rtc::INT_OVF,
            Self::Clock => rtc::INT_ALARM0 | rtc::INT_OVF,
        }
    }

    /// Value written after a reset that doesn't preserve the previous one.
    fn default_value(self) -> u32 {
        match self {
            Self::Count32 | Self::Count16 => 0,
            Self::Clock => CalendarTime::default().to_bits(),
        }
    }

    /// CTRL contents for this mode. Clear-on-match only exists in 32-bit counter mode here;
    /// the clock mode is forced to 24-hour representation.
    fn ctrl_bits(self, prescaler: Prescaler, clear_on_match: bool) -> u32 {
        let base = rtc::CTRL_PRESCALER.set(rtc::CTRL_MODE.set(0, self as u32), prescaler as u32);
        match self {
            Self::Count32 if clear_on_match => base | rtc::CTRL_MATCHCLR,
            Self::Count32 | Self::Count16 => base,
            Self::Clock => base & !(rtc::CTRL_MATCHCLR | rtc::CTRL_CLKREP),
        }
    }
}

/// Division of the RTC's generic clock. CTRL register, PRESCALER field.
/// Identical encoding in all three modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
    Div256 = 8,
    Div512 = 9,
    Div1024 = 10,
}

impl Prescaler {
    fn from_exp(exp: u32) -> Self {
        match exp {
            0 => Self::Div1,
            1 => Self::Div2,
            2 => Self::Div4,
            3 => Self::Div8,
            4 => Self::Div16,
            5 => Self::Div32,
            6 => Self::Div64,
            7 => Self::Div128,
            8 => Self::Div256,
            9 => Self::Div512,
            _ => Self::Div1024,
        }
    }

    /// The division factor, eg 1024 for `Div1024`.
    pub fn division(self) -> u32 {
        1 << self as u32
    }
}

/// Settings applied by [`Rtc::begin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RtcConfig {
    /// Always start from the mode's default value, even after a reset that kept the RTC
    /// running.
    pub reset_time: bool,
    pub mode: RtcMode,
    /// In 32-bit counter mode, clear the counter when it matches COMP0. Ignored otherwise.
    pub clear_on_match: bool,
    /// `None` selects `Div1024`.
    pub prescaler: Option<Prescaler>,
    /// Generic clock generator `DIV` value; the source is divided by 2^(`clock_divisor` + 1).
    /// Calendar mode overrides this to get a 1 Hz calendar tick.
    pub clock_divisor: u8,
    pub clock_source: ClockSource,
    /// NVIC priority, 0 (most urgent) through 3.
    pub irq_priority: u8,
    pub sync_policy: SyncPolicy,
}

impl Default for RtcConfig {
    /// Calendar mode, 1 Hz, keeping the time across warm resets.
    fn default() -> Self {
        Self {
            reset_time: false,
            mode: RtcMode::Clock,
            clear_on_match: false,
            prescaler: None,
            clock_divisor: CALENDAR_GCLK_DIV,
            clock_source: ClockSource::default(),
            irq_priority: 0,
            sync_policy: SyncPolicy::Unbounded,
        }
    }
}

impl RtcConfig {
    pub fn mode(mut self, mode: RtcMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn reset_time(mut self, reset_time: bool) -> Self {
        self.reset_time = reset_time;
        self
    }

    pub fn clear_on_match(mut self, clear_on_match: bool) -> Self {
        self.clear_on_match = clear_on_match;
        self
    }

    pub fn prescaler(mut self, prescaler: Prescaler) -> Self {
        self.prescaler = Some(prescaler);
        self
    }

    pub fn clock_divisor(mut self, clock_divisor: u8) -> Self {
        self.clock_divisor = clock_divisor;
        self
    }

    /// Choose the RTC prescaler and generator divider from one overall division of the
    /// 32.768 kHz source, eg `32_768` for a 1 Hz count. Rounded down to a power of two.
    pub fn total_prescale(mut self, total: u32) -> Self {
        let (prescaler_exp, gclk_div) = util::compute_divider(total);
        self.prescaler = Some(Prescaler::from_exp(prescaler_exp));
        self.clock_divisor = gclk_div;
        self
    }

    pub fn clock_source(mut self, clock_source: ClockSource) -> Self {
        self.clock_source = clock_source;
        self
    }

    pub fn irq_priority(mut self, irq_priority: u8) -> Self {
        self.irq_priority = irq_priority;
        self
    }

    pub fn sync_policy(mut self, sync_policy: SyncPolicy) -> Self {
        self.sync_policy = sync_policy;
        self
    }
}

/// What the driver knows about the peripheral's configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcState {
    /// Set once `begin` completes.
    pub configured: bool,
    /// The mode last requested from `begin`.
    pub mode: Option<RtcMode>,
    /// Generator divider times RTC prescaler.
    pub prescaler: u32,
}

impl RtcState {
    /// The mode operations are routed to: `None` until `begin` completes.
    fn active(&self) -> Option<RtcMode> {
        if self.configured { self.mode } else { None }
    }
}

/// Real Time Counter peripheral.
pub struct Rtc<H> {
    hw: H,
    gate: SyncGate,
    state: RtcState,
    handler: Option<Handler>,
    fault: Option<Error>,
}

impl<H: Hardware> Rtc<H> {
    /// Wrap the hardware. The RTC is left untouched until [`Rtc::begin`].
    pub fn new(hw: H) -> Self {
        Self {
            hw,
            gate: SyncGate::default(),
            state: RtcState::default(),
            handler: None,
            fault: None,
        }
    }

    /// Configure the clock tree and bring the RTC up in `config.mode`.
    ///
    /// When `reset_time` is false, the last reset was a system, watchdog or external reset,
    /// and the RTC was already running in the requested mode, a non-zero count or time is
    /// kept. Otherwise the counter starts at 0, or the calendar at 2000-01-01 00:00:00.
    ///
    /// Only fails with `SyncPolicy::Bounded`, if the peripheral doesn't acknowledge a write.
    pub fn begin(&mut self, config: RtcConfig) -> Result<()> {
        let mode = config.mode;

        self.state = RtcState {
            configured: false,
            mode: Some(mode),
            prescaler: 0,
        };
        self.gate = SyncGate::new(config.sync_policy);

        clocks::enable_bus_clock(&mut self.hw);
        clocks::enable_oscillator(&mut self.hw, config.clock_source);

        // The generator isn't running again yet after a reset, so a read request would never
        // complete; the value register still holds the last synchronized value.
        let cause = ResetCause::read(&mut self.hw);
        let mut preserved = None;
        if !config.reset_time && cause.preserves_rtc() {
            let ctrl = self.hw.read(Reg::RtcCtrl);
            if RtcMode::from_bits(rtc::CTRL_MODE.get(ctrl)) == Some(mode) {
                preserved = Some(self.hw.read(mode.value_reg()));
            }
        }

        let gclk_div = match mode {
            RtcMode::Clock => CALENDAR_GCLK_DIV,
            RtcMode::Count32 | RtcMode::Count16 => config.clock_divisor,
        };
        clocks::configure_generator(&mut self.hw, &self.gate, config.clock_source, gclk_div)?;

        self.gate
            .modify_then_sync(&mut self.hw, Reg::RtcCtrl, |v| v & !rtc::CTRL_ENABLE)?;
        self.gate
            .modify_then_sync(&mut self.hw, Reg::RtcCtrl, |v| v | rtc::CTRL_SWRST)?;

        let prescaler = config.prescaler.unwrap_or(Prescaler::Div1024);
        self.hw.modify(Reg::RtcReadReq, |v| v & !rtc::READREQ_RCONT);
        self.gate.write_then_sync(
            &mut self.hw,
            Reg::RtcCtrl,
            mode.ctrl_bits(prescaler, config.clear_on_match),
        )?;

        self.hw.enable_interrupt(config.irq_priority);

        // Compare interrupts can't be masked independently of the comparator, so the counter
        // modes enable them in `enable_counter`.
        if mode == RtcMode::Clock {
            self.hw.write(Reg::RtcIntEnSet, rtc::INT_ALARM0);
            self.gate.write_then_sync(
                &mut self.hw,
                Reg::Mode2Mask0,
                rtc::MASK_SEL.set(0, AlarmMatch::Off as u32),
            )?;
        }

        self.gate
            .modify_then_sync(&mut self.hw, Reg::RtcCtrl, |v| v | rtc::CTRL_ENABLE)?;
        // One reset removal, whatever the mode.
        self.gate
            .modify_then_sync(&mut self.hw, Reg::RtcCtrl, |v| v & !rtc::CTRL_SWRST)?;

        let value = match preserved {
            Some(v) if v != 0 => {
                debug!("RTC: keeping value {} across reset", v);
                v
            }
            _ => mode.default_value(),
        };
        self.gate
            .write_then_sync(&mut self.hw, mode.value_reg(), value)?;

        self.state.prescaler = gclk_division(gclk_div) * prescaler.division();
        self.state.configured = true;

        info!(
            "RTC configured: mode {:?}, prescaler {}",
            mode, self.state.prescaler
        );

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.state.configured
    }

    /// The active mode, once configured.
    pub fn mode(&self) -> Option<RtcMode> {
        self.state.active()
    }

    pub fn state(&self) -> RtcState {
        self.state
    }

    /// Overall division of the 32.768 kHz source: generator divider times RTC prescaler.
    /// 0 before `begin`.
    pub fn prescaler(&self) -> u32 {
        self.state.prescaler
    }

    /// Return and clear the error recorded when a synchronization timed out, under
    /// `SyncPolicy::Bounded`.
    pub fn take_fault(&mut self) -> Option<Error> {
        self.fault.take()
    }

    /// Enter standby until the next interrupt. Enable an RTC interrupt first, or the
    /// wake-up has to come from elsewhere.
    pub fn standby_mode(&mut self) {
        self.hw.standby();
    }

    /// Access the underlying hardware, eg to advance a simulated peripheral.
    pub fn hardware(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Release the hardware.
    pub fn free(self) -> H {
        self.hw
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!("RTC: register synchronization timed out");
            self.fault = Some(e);
        }
    }

    /// Write, then wait for synchronization.
    fn write_synced(&mut self, reg: Reg, value: u32) {
        let result = self.gate.write_then_sync(&mut self.hw, reg, value);
        self.record(result);
    }

    /// Write-one-to-set/clear registers, followed by a synchronization wait.
    fn set_bits_synced(&mut self, reg: Reg, bits: u32) {
        self.hw.write(reg, bits);
        let result = self.gate.wait(&mut self.hw);
        self.record(result);
    }

    /// Read a counter/clock register after a read request.
    fn read_synced(&mut self, reg: Reg) -> u32 {
        match self.gate.read_synchronized(&mut self.hw, reg) {
            Ok(v) => v,
            Err(e) => {
                self.record(Err(e));
                self.hw.read(reg)
            }
        }
    }

    fn read_request(&mut self) {
        let result = self.gate.read_request(&mut self.hw);
        self.record(result);
    }
}
