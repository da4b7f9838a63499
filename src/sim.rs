//! A behavioural model of the RTC and the slices of PM, SYSCTRL and GCLK it depends on.
//!
//! [`SimRtc`] implements [`Hardware`], so the driver runs unmodified on the host. It models
//! the mode overlays sharing storage, write-one-to-set/clear interrupt registers, software
//! reset, the `SYNCBUSY` handshake, read requests, counting, compare matches, period
//! wrap-around, calendar rollover and alarm masking.

use crate::regs::{Field, Hardware, Reg, gclk, rtc};

const NUM_REGS: usize = 32;
const CTRL_HISTORY: usize = 32;

/// Simulated peripheral state. All fields power up as zero, like the real registers.
#[derive(Clone, Debug)]
pub struct SimRtc {
    apbamask: u32,
    rcause: u32,
    xosc32k: u32,
    clkctrl: u32,
    genctrl: u32,
    gendiv: u32,

    ctrl: u32,
    readreq: u32,
    inten: u32,
    intflag: u32,
    /// Offset 0x10: COUNT (modes 0 and 1) or CLOCK (mode 2).
    value: u32,
    /// Offset 0x14: PER (mode 1).
    per: u32,
    /// Offset 0x18: COMP0 (mode 0), COMP0/COMP1 (mode 1) or ALARM0 (mode 2).
    comp: u32,
    /// Offset 0x1C: MASK0 (mode 2).
    mask: u32,

    sync_latency: u32,
    rtc_sync_remaining: u32,
    gclk_sync_remaining: u32,
    hang: bool,

    status_polls: u32,
    read_requests: u32,
    writes: [u32; NUM_REGS],
    ctrl_history: [u32; CTRL_HISTORY],
    ctrl_history_len: usize,

    irq_priority: Option<u8>,
    standby_entries: u32,
}

impl Default for SimRtc {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRtc {
    /// A peripheral straight out of power-on reset, with a one-poll synchronization delay.
    pub const fn new() -> Self {
        Self {
            apbamask: 0,
            rcause: crate::regs::rcause::POR,
            xosc32k: 0,
            clkctrl: 0,
            genctrl: 0,
            gendiv: 0,
            ctrl: 0,
            readreq: 0,
            inten: 0,
            intflag: 0,
            value: 0,
            per: 0,
            comp: 0,
            mask: 0,
            sync_latency: 1,
            rtc_sync_remaining: 0,
            gclk_sync_remaining: 0,
            hang: false,
            status_polls: 0,
            read_requests: 0,
            writes: [0; NUM_REGS],
            ctrl_history: [0; CTRL_HISTORY],
            ctrl_history_len: 0,
            irq_priority: None,
            standby_entries: 0,
        }
    }

    /// Set the `PM.RCAUSE` bits seen by the next `begin`.
    pub fn set_reset_cause(&mut self, bits: u32) {
        self.rcause = bits & 0xFF;
    }

    /// Simulate a device reset that leaves the RTC running, as happens after a watchdog or
    /// external reset: the RTC registers keep their contents and only the reset cause and
    /// the bookkeeping counters change.
    pub fn warm_reset(&mut self, cause: u32) {
        self.set_reset_cause(cause);
        self.irq_priority = None;
        self.writes = [0; NUM_REGS];
        self.ctrl_history_len = 0;
        self.read_requests = 0;
        self.status_polls = 0;
    }

    /// Number of status polls a synchronization stays busy for.
    pub fn set_sync_latency(&mut self, polls: u32) {
        self.sync_latency = polls;
    }

    /// Make every synchronization hang forever, as with an unclocked peripheral.
    pub fn hang_sync(&mut self, hang: bool) {
        self.hang = hang;
    }

    pub fn status_polls(&self) -> u32 {
        self.status_polls
    }

    pub fn read_requests(&self) -> u32 {
        self.read_requests
    }

    /// How many times `reg` has been written.
    pub fn writes(&self, reg: Reg) -> u32 {
        self.writes[reg as usize]
    }

    /// Every value written to `CTRL`, oldest first. Holds the first 32 writes.
    pub fn ctrl_writes(&self) -> &[u32] {
        &self.ctrl_history[..self.ctrl_history_len]
    }

    /// NVIC priority the RTC line was unmasked at, if it was.
    pub fn irq_priority(&self) -> Option<u8> {
        self.irq_priority
    }

    pub fn standby_entries(&self) -> u32 {
        self.standby_entries
    }

    pub fn interrupt_enables(&self) -> u32 {
        self.inten
    }

    pub fn interrupt_flags(&self) -> u32 {
        self.intflag
    }

    /// Whether the RTC drives its interrupt line: an enabled event flag is pending.
    pub fn interrupt_pending(&self) -> bool {
        self.intflag & self.inten != 0
    }

    /// Force event flags, as if the events had happened.
    pub fn raise(&mut self, flags: u32) {
        self.intflag |= flags & 0xFF;
    }

    fn mode(&self) -> u32 {
        rtc::CTRL_MODE.get(self.ctrl)
    }

    fn enabled(&self) -> bool {
        self.ctrl & rtc::CTRL_ENABLE != 0
    }

    fn start_rtc_sync(&mut self) {
        self.rtc_sync_remaining = self.sync_latency;
    }

    fn software_reset(&mut self) {
        self.ctrl = 0;
        self.readreq = 0;
        self.inten = 0;
        self.intflag = 0;
        self.value = 0;
        self.per = 0;
        self.comp = 0;
        self.mask = 0;
    }

    /// Advance the peripheral by `ticks` prescaled counter clocks. Nothing happens while the
    /// RTC is disabled.
    pub fn tick(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if !self.enabled() {
                return;
            }
            match self.mode() {
                0 => self.tick_count32(),
                1 => self.tick_count16(),
                _ => self.tick_clock(),
            }
        }
    }

    fn tick_count32(&mut self) {
        let (next, wrapped) = self.value.overflowing_add(1);
        self.value = next;
        if wrapped {
            self.intflag |= rtc::INT_OVF;
        }
        if self.value == self.comp {
            self.intflag |= rtc::INT_CMP0;
            if self.ctrl & rtc::CTRL_MATCHCLR != 0 {
                self.value = 0;
            }
        }
    }

    fn tick_count16(&mut self) {
        let count = self.value & 0xFFFF;
        let per = self.per & 0xFFFF;
        if count == per {
            self.value = 0;
            self.intflag |= rtc::INT_OVF;
        } else {
            self.value = (count + 1) & 0xFFFF;
        }
        if self.value == self.comp & 0xFFFF {
            self.intflag |= rtc::INT_CMP0;
        }
        if self.value == self.comp >> 16 {
            self.intflag |= rtc::INT_CMP1;
        }
    }

    fn tick_clock(&mut self) {
        use rtc::{CLOCK_DAY, CLOCK_HOUR, CLOCK_MINUTE, CLOCK_MONTH, CLOCK_SECOND, CLOCK_YEAR};

        let mut c = self.value;
        let bump = |c: u32, field: Field| field.set(c, field.get(c) + 1);

        c = bump(c, CLOCK_SECOND);
        if CLOCK_SECOND.get(c) >= 60 {
            c = bump(CLOCK_SECOND.set(c, 0), CLOCK_MINUTE);
        }
        if CLOCK_MINUTE.get(c) >= 60 {
            c = bump(CLOCK_MINUTE.set(c, 0), CLOCK_HOUR);
        }
        if CLOCK_HOUR.get(c) >= 24 {
            c = bump(CLOCK_HOUR.set(c, 0), CLOCK_DAY);
        }
        let year = CLOCK_YEAR.get(c);
        let month = CLOCK_MONTH.get(c);
        if CLOCK_DAY.get(c) > days_in_month(year, month) {
            c = bump(CLOCK_DAY.set(c, 1), CLOCK_MONTH);
        }
        if CLOCK_MONTH.get(c) > 12 {
            c = CLOCK_MONTH.set(c, 1);
            if CLOCK_YEAR.get(c) == CLOCK_YEAR.max() {
                c = CLOCK_YEAR.set(c, 0);
                self.intflag |= rtc::INT_OVF;
            } else {
                c = bump(c, CLOCK_YEAR);
            }
        }
        self.value = c;

        if self.alarm_matches() {
            self.intflag |= rtc::INT_ALARM0;
        }
    }

    fn alarm_matches(&self) -> bool {
        use rtc::{CLOCK_DAY, CLOCK_HOUR, CLOCK_MINUTE, CLOCK_MONTH, CLOCK_SECOND, CLOCK_YEAR};

        let compared: &[Field] = match rtc::MASK_SEL.get(self.mask) {
            0 => return false,
            1 => &[CLOCK_SECOND],
            2 => &[CLOCK_SECOND, CLOCK_MINUTE],
            3 => &[CLOCK_SECOND, CLOCK_MINUTE, CLOCK_HOUR],
            4 => &[CLOCK_SECOND, CLOCK_MINUTE, CLOCK_HOUR, CLOCK_DAY],
            5 => &[CLOCK_SECOND, CLOCK_MINUTE, CLOCK_HOUR, CLOCK_DAY, CLOCK_MONTH],
            6 => &[
                CLOCK_SECOND,
                CLOCK_MINUTE,
                CLOCK_HOUR,
                CLOCK_DAY,
                CLOCK_MONTH,
                CLOCK_YEAR,
            ],
            _ => return false,
        };
        compared
            .iter()
            .all(|f| f.get(self.value) == f.get(self.comp))
    }
}

/// `year` is the offset from 2000.
fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 => 29,
        2 => 28,
        _ => 31,
    }
}

impl Hardware for SimRtc {
    fn read(&mut self, reg: Reg) -> u32 {
        let value = match reg {
            Reg::PmApbAMask => self.apbamask,
            Reg::PmRcause => self.rcause,
            Reg::SysctrlXosc32k => self.xosc32k,
            Reg::GclkStatus => {
                self.status_polls += 1;
                if self.hang {
                    gclk::SYNCBUSY
                } else if self.gclk_sync_remaining > 0 {
                    self.gclk_sync_remaining -= 1;
                    gclk::SYNCBUSY
                } else {
                    0
                }
            }
            Reg::GclkClkCtrl => self.clkctrl,
            Reg::GclkGenCtrl => self.genctrl,
            Reg::GclkGenDiv => self.gendiv,
            Reg::RtcCtrl => self.ctrl,
            Reg::RtcReadReq => self.readreq,
            Reg::RtcIntEnClr | Reg::RtcIntEnSet => self.inten,
            Reg::RtcIntFlag => self.intflag,
            Reg::RtcStatus => {
                self.status_polls += 1;
                if self.hang {
                    rtc::SYNCBUSY
                } else if self.rtc_sync_remaining > 0 {
                    self.rtc_sync_remaining -= 1;
                    rtc::SYNCBUSY
                } else {
                    0
                }
            }
            Reg::Mode0Count | Reg::Mode1Count | Reg::Mode2Clock => self.value,
            Reg::Mode0Comp0 | Reg::Mode2Alarm0 => self.comp,
            Reg::Mode1Per => self.per,
            Reg::Mode1Comp0 => self.comp,
            Reg::Mode1Comp1 => self.comp >> 16,
            Reg::Mode2Mask0 => self.mask,
        };
        value & reg.mask()
    }

    fn write(&mut self, reg: Reg, value: u32) {
        let value = value & reg.mask();
        self.writes[reg as usize] += 1;

        match reg {
            Reg::PmApbAMask => self.apbamask = value,
            Reg::PmRcause => (),
            Reg::SysctrlXosc32k => self.xosc32k = value,
            Reg::GclkStatus => (),
            Reg::GclkClkCtrl | Reg::GclkGenCtrl | Reg::GclkGenDiv => {
                match reg {
                    Reg::GclkClkCtrl => self.clkctrl = value,
                    Reg::GclkGenCtrl => self.genctrl = value,
                    _ => self.gendiv = value,
                }
                self.gclk_sync_remaining = self.sync_latency;
            }
            Reg::RtcCtrl => {
                if self.ctrl_history_len < CTRL_HISTORY {
                    self.ctrl_history[self.ctrl_history_len] = value;
                    self.ctrl_history_len += 1;
                }
                if value & rtc::CTRL_SWRST != 0 {
                    self.software_reset();
                } else {
                    self.ctrl = value;
                }
                self.start_rtc_sync();
            }
            Reg::RtcReadReq => {
                self.readreq = value;
                if value & rtc::READREQ_RREQ != 0 {
                    self.read_requests += 1;
                    self.start_rtc_sync();
                }
            }
            Reg::RtcIntEnClr => self.inten &= !value,
            Reg::RtcIntEnSet => self.inten |= value,
            Reg::RtcIntFlag => self.intflag &= !value,
            Reg::RtcStatus => (),
            Reg::Mode0Count | Reg::Mode2Clock => {
                self.value = value;
                self.start_rtc_sync();
            }
            Reg::Mode1Count => {
                self.value = value;
                self.start_rtc_sync();
            }
            Reg::Mode0Comp0 | Reg::Mode2Alarm0 => {
                self.comp = value;
                self.start_rtc_sync();
            }
            Reg::Mode1Per => {
                self.per = value;
                self.start_rtc_sync();
            }
            Reg::Mode1Comp0 => {
                self.comp = (self.comp & 0xFFFF_0000) | value;
                self.start_rtc_sync();
            }
            Reg::Mode1Comp1 => {
                self.comp = (self.comp & 0x0000_FFFF) | (value << 16);
                self.start_rtc_sync();
            }
            Reg::Mode2Mask0 => {
                self.mask = value;
                self.start_rtc_sync();
            }
        }
    }

    fn enable_interrupt(&mut self, priority: u8) {
        self.irq_priority = Some(priority);
    }

    fn standby(&mut self) {
        self.standby_entries += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::rcause;

    #[test]
    fn powers_up_with_por_cause() {
        let mut sim = SimRtc::new();
        assert_eq!(sim.read(Reg::PmRcause), rcause::POR);
    }

    #[test]
    fn software_reset_clears_rtc_registers() {
        let mut sim = SimRtc::new();
        sim.write(Reg::Mode0Count, 1234);
        sim.write(Reg::RtcIntEnSet, rtc::INT_OVF);
        sim.write(Reg::RtcCtrl, rtc::CTRL_SWRST);

        assert_eq!(sim.read(Reg::Mode0Count), 0);
        assert_eq!(sim.interrupt_enables(), 0);
        assert_eq!(sim.read(Reg::RtcCtrl), 0);
    }

    #[test]
    fn overlays_share_storage() {
        let mut sim = SimRtc::new();
        sim.write(Reg::Mode1Comp0, 0x1111);
        sim.write(Reg::Mode1Comp1, 0x2222);
        assert_eq!(sim.read(Reg::Mode0Comp0), 0x2222_1111);
        assert_eq!(sim.read(Reg::Mode1Comp1), 0x2222);
    }

    #[test]
    fn count16_wraps_at_period() {
        let mut sim = SimRtc::new();
        sim.write(Reg::RtcCtrl, rtc::CTRL_MODE.set(rtc::CTRL_ENABLE, 1));
        sim.write(Reg::Mode1Per, 3);
        sim.write(Reg::Mode1Count, 2);

        sim.tick(1);
        assert_eq!(sim.read(Reg::Mode1Count), 3);
        assert_eq!(sim.interrupt_flags() & rtc::INT_OVF, 0);

        sim.tick(1);
        assert_eq!(sim.read(Reg::Mode1Count), 0);
        assert_ne!(sim.interrupt_flags() & rtc::INT_OVF, 0);
    }

    #[test]
    fn clock_rolls_over_end_of_february() {
        use rtc::{CLOCK_DAY, CLOCK_HOUR, CLOCK_MINUTE, CLOCK_MONTH, CLOCK_SECOND, CLOCK_YEAR};

        let mut sim = SimRtc::new();
        sim.write(Reg::RtcCtrl, rtc::CTRL_MODE.set(rtc::CTRL_ENABLE, 2));
        let mut c = CLOCK_YEAR.set(0, 23);
        c = CLOCK_MONTH.set(c, 2);
        c = CLOCK_DAY.set(c, 28);
        c = CLOCK_HOUR.set(c, 23);
        c = CLOCK_MINUTE.set(c, 59);
        c = CLOCK_SECOND.set(c, 59);
        sim.write(Reg::Mode2Clock, c);

        sim.tick(1);

        let c = sim.read(Reg::Mode2Clock);
        assert_eq!(CLOCK_MONTH.get(c), 3);
        assert_eq!(CLOCK_DAY.get(c), 1);
        assert_eq!(CLOCK_HOUR.get(c), 0);
    }

    #[test]
    fn disabled_rtc_does_not_count() {
        let mut sim = SimRtc::new();
        sim.tick(10);
        assert_eq!(sim.read(Reg::Mode0Count), 0);
    }
}
