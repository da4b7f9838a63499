//! Driver for the Real Time Counter of SAM D21-class microcontrollers.
//!
//! The RTC runs in one of three modes, selected by [`Rtc::begin`]: a 32-bit counter, a 16-bit
//! counter with a period, or a calendar with an alarm. Register access goes through the
//! [`regs::Hardware`] trait: [`mmio::Samd21`] on the device, [`sim::SimRtc`] on the host.
//!
//! Example, on the device:
//! ```rust,ignore
//! use samd_rtc::{make_globals, init_globals, make_rtc_interrupt_handler};
//! use samd_rtc::{mmio::Samd21, rtc::{AlarmMatch, IntSource, Rtc, RtcConfig}};
//! use atsamd21g::interrupt;
//!
//! make_globals!((RTC, Rtc<Samd21>));
//! make_rtc_interrupt_handler!(RTC);
//!
//! fn on_alarm(_source: IntSource) {
//!     // ...
//! }
//!
//! let mut rtc = Rtc::new(unsafe { Samd21::steal() });
//! rtc.begin(RtcConfig::default()).unwrap();
//! rtc.set_epoch(1_700_000_000);
//! rtc.set_alarm_seconds(30);
//! rtc.enable_alarm(AlarmMatch::Seconds);
//! rtc.attach_interrupt(on_alarm);
//! init_globals!((RTC, rtc));
//! ```

#![cfg_attr(not(test), no_std)]

// Must come first: the logging macros are textually scoped.
#[macro_use]
mod macros;

pub mod clocks;
pub mod error;
pub mod low_power;
pub mod mmio;
pub mod regs;
pub mod reset_cause;
pub mod rtc;
pub mod sim;
pub mod sync;

mod util;

pub use crate::{
    error::{Error, Result},
    rtc::{AlarmMatch, CalendarTime, IntSource, Prescaler, Rtc, RtcConfig, RtcMode},
    sync::SyncPolicy,
};
