//! Interrupt dispatch: a single registered handler, called with the event that fired.

use super::{AlarmMatch, Rtc, RtcMode};
use crate::regs::{Hardware, Reg, rtc};

/// The event behind an RTC interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntSource {
    /// Compare 0 matched, in either counter mode.
    Compare0,
    /// Compare 1 matched, in 16-bit counter mode.
    Compare1,
    /// The alarm matched, in calendar mode.
    Alarm0,
    /// The counter wrapped, or the calendar's year rolled over.
    Overflow,
    Unknown,
}

/// Called from the interrupt handler with the event that fired. Keep it short, and don't
/// call back into the driver from it.
pub type Handler = fn(IntSource);

/// Every event flag, for clearing when no mode is active.
const ALL_EVENTS: u32 = rtc::INT_CMP0 | rtc::INT_CMP1 | rtc::INT_OVF;

impl<H: Hardware> Rtc<H> {
    /// Register the function run on every RTC interrupt, replacing any previous one.
    pub fn attach_interrupt(&mut self, handler: Handler) {
        self.handler = Some(handler);
    }

    pub fn detach_interrupt(&mut self) {
        self.handler = None;
    }

    pub fn is_attached(&self) -> bool {
        self.handler.is_some()
    }

    /// The highest-priority pending event, after synchronizing the flags.
    pub fn get_int_source(&mut self) -> IntSource {
        // Before `begin` the RTC may be unclocked, and a read request would never complete.
        if self.state.active().is_none() {
            return IntSource::Unknown;
        }
        self.read_request();
        let flags = self.hw.read(Reg::RtcIntFlag);
        self.classify(flags)
    }

    /// Run from the `RTC` interrupt handler: call the registered handler, if any, then clear
    /// the active mode's event flags so the line deasserts. Flags are cleared even without a
    /// handler.
    ///
    /// Doesn't wait for synchronization, so it's safe to call while a foreground operation is
    /// mid-sync.
    pub fn on_interrupt(&mut self) {
        let flags = self.hw.read(Reg::RtcIntFlag);
        let source = self.classify(flags);
        trace!("RTC interrupt: {:?}", source);

        if let Some(handler) = self.handler {
            handler(source);
        }

        let clear = match self.state.active() {
            Some(mode) => mode.event_flags(),
            None => ALL_EVENTS,
        };
        self.hw.write(Reg::RtcIntFlag, clear);
    }

    /// Pick an event from the flags, in priority order: compare 0, compare 1, alarm,
    /// overflow.
    fn classify(&mut self, flags: u32) -> IntSource {
        let mode = match self.state.active() {
            Some(mode) => mode,
            None => return IntSource::Unknown,
        };

        let source = match mode {
            RtcMode::Count32 if flags & rtc::INT_CMP0 != 0 => Some(IntSource::Compare0),
            RtcMode::Count16 if flags & rtc::INT_CMP0 != 0 => Some(IntSource::Compare0),
            RtcMode::Count16 if flags & rtc::INT_CMP1 != 0 => Some(IntSource::Compare1),
            RtcMode::Clock if flags & rtc::INT_ALARM0 != 0 => {
                let sel = rtc::MASK_SEL.get(self.hw.read(Reg::Mode2Mask0));
                (sel != AlarmMatch::Off as u32).then_some(IntSource::Alarm0)
            }
            RtcMode::Count32 | RtcMode::Count16 | RtcMode::Clock => None,
        };

        match source {
            Some(s) => s,
            None if flags & rtc::INT_OVF != 0 => IntSource::Overflow,
            None => IntSource::Unknown,
        }
    }
}
