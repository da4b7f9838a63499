//! Counter modes: the 32-bit counter with one compare register, and the 16-bit counter with
//! a period register and two compare registers.

use super::{Rtc, RtcMode};
use crate::regs::{Hardware, Reg, rtc};

impl<H: Hardware> Rtc<H> {
    /// Set the 32-bit count. No effect outside `Count32`.
    pub fn set_count_32(&mut self, count: u32) {
        if let Some(RtcMode::Count32) = self.state.active() {
            self.write_synced(Reg::Mode0Count, count);
        }
    }

    /// Set the 16-bit count. No effect outside `Count16`.
    pub fn set_count_16(&mut self, count: u16) {
        if let Some(RtcMode::Count16) = self.state.active() {
            self.write_synced(Reg::Mode1Count, count as u32);
        }
    }

    /// The current count, synchronized from the RTC clock domain. 0 in calendar mode or
    /// before `begin`.
    pub fn get_count(&mut self) -> u32 {
        match self.state.active() {
            Some(mode @ (RtcMode::Count32 | RtcMode::Count16)) => {
                self.read_synced(mode.value_reg())
            }
            Some(RtcMode::Clock) | None => 0,
        }
    }

    /// Load compare register 0 and enable its interrupt. In `Count16`, only the low 16 bits
    /// are used.
    pub fn enable_counter(&mut self, compare: u32) {
        let reg = match self.state.active() {
            Some(RtcMode::Count32) => Reg::Mode0Comp0,
            Some(RtcMode::Count16) => Reg::Mode1Comp0,
            Some(RtcMode::Clock) | None => return,
        };
        self.write_synced(reg, compare);
        self.set_bits_synced(Reg::RtcIntEnSet, rtc::INT_CMP0);
    }

    /// Load both compare registers and enable both compare interrupts. `Count16` only.
    pub fn enable_counter_16(&mut self, compare0: u16, compare1: u16) {
        if let Some(RtcMode::Count16) = self.state.active() {
            self.write_synced(Reg::Mode1Comp0, compare0 as u32);
            self.write_synced(Reg::Mode1Comp1, compare1 as u32);
            self.set_bits_synced(Reg::RtcIntEnSet, rtc::INT_CMP0 | rtc::INT_CMP1);
        }
    }

    /// Set the value the 16-bit counter wraps after. `Count16` only.
    pub fn set_period(&mut self, period: u16) {
        if let Some(RtcMode::Count16) = self.state.active() {
            self.write_synced(Reg::Mode1Per, period as u32);
        }
    }

    /// Disable the compare interrupts. The compare values are kept.
    pub fn disable_counter(&mut self) {
        let bits = match self.state.active() {
            Some(RtcMode::Count32) => rtc::INT_CMP0,
            Some(RtcMode::Count16) => rtc::INT_CMP0 | rtc::INT_CMP1,
            Some(RtcMode::Clock) | None => return,
        };
        self.set_bits_synced(Reg::RtcIntEnClr, bits);
    }

    /// Enable the overflow interrupt. Any mode: the counters overflow on wrap-around, the
    /// calendar when its year field rolls over.
    pub fn enable_overflow(&mut self) {
        if self.state.active().is_some() {
            self.set_bits_synced(Reg::RtcIntEnSet, rtc::INT_OVF);
        }
    }

    pub fn disable_overflow(&mut self) {
        if self.state.active().is_some() {
            self.set_bits_synced(Reg::RtcIntEnClr, rtc::INT_OVF);
        }
    }

    /// Compare register 0 in `Count32`; 0 otherwise.
    pub fn get_compare(&mut self) -> u32 {
        match self.state.active() {
            Some(RtcMode::Count32) => self.hw.read(Reg::Mode0Comp0),
            _ => 0,
        }
    }

    /// Compare register 0 or 1 in `Count16`; 0 otherwise, or for any other index.
    pub fn get_compare_16(&mut self, index: u8) -> u16 {
        let reg = match (self.state.active(), index) {
            (Some(RtcMode::Count16), 0) => Reg::Mode1Comp0,
            (Some(RtcMode::Count16), 1) => Reg::Mode1Comp1,
            _ => return 0,
        };
        self.hw.read(reg) as u16
    }

    /// The period register in `Count16`; 0 otherwise.
    pub fn get_period(&mut self) -> u16 {
        match self.state.active() {
            Some(RtcMode::Count16) => self.hw.read(Reg::Mode1Per) as u16,
            _ => 0,
        }
    }
}
