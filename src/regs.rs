//! Register map for the peripherals the RTC driver touches, and the [`Hardware`] trait the
//! driver uses to reach them.
//!
//! Offsets and bit positions follow the SAM D21 datasheet: PM (section 16), SYSCTRL
//! (section 17), GCLK (section 15) and RTC (section 19). The RTC block is overlaid three
//! ways depending on `CTRL.MODE`; each overlay gets its own [`Reg`] variants so register
//! widths stay correct.

/// A named hardware register. Mode-specific RTC registers are prefixed with their mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
    /// PM.APBAMASK: APBA bus clock masks. 32 bits.
    PmApbAMask,
    /// PM.RCAUSE: reset cause. 8 bits, read-only.
    PmRcause,
    /// SYSCTRL.XOSC32K: external 32 kHz oscillator control. 16 bits.
    SysctrlXosc32k,
    /// GCLK.STATUS. 8 bits.
    GclkStatus,
    /// GCLK.CLKCTRL: generic clock to peripheral channel routing. 16 bits.
    GclkClkCtrl,
    /// GCLK.GENCTRL: generator control. 32 bits.
    GclkGenCtrl,
    /// GCLK.GENDIV: generator division factor. 32 bits.
    GclkGenDiv,
    /// RTC.CTRL. 16 bits, shared layout apart from the mode-specific bits.
    RtcCtrl,
    /// RTC.READREQ. 16 bits.
    RtcReadReq,
    /// RTC.INTENCLR. 8 bits, write-one-to-clear.
    RtcIntEnClr,
    /// RTC.INTENSET. 8 bits, write-one-to-set.
    RtcIntEnSet,
    /// RTC.INTFLAG. 8 bits, write-one-to-clear.
    RtcIntFlag,
    /// RTC.STATUS. 8 bits.
    RtcStatus,
    /// Mode 0 COUNT. 32 bits.
    Mode0Count,
    /// Mode 0 COMP0. 32 bits.
    Mode0Comp0,
    /// Mode 1 COUNT. 16 bits.
    Mode1Count,
    /// Mode 1 PER. 16 bits.
    Mode1Per,
    /// Mode 1 COMP0. 16 bits.
    Mode1Comp0,
    /// Mode 1 COMP1. 16 bits.
    Mode1Comp1,
    /// Mode 2 CLOCK. 32 bits of packed date/time fields.
    Mode2Clock,
    /// Mode 2 ALARM0. Same layout as CLOCK.
    Mode2Alarm0,
    /// Mode 2 MASK0. 8 bits.
    Mode2Mask0,
}

/// Register width, in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

pub const PM_BASE: usize = 0x4000_0400;
pub const SYSCTRL_BASE: usize = 0x4000_0800;
pub const GCLK_BASE: usize = 0x4000_0C00;
pub const RTC_BASE: usize = 0x4000_1400;

impl Reg {
    /// Absolute address and width of the register.
    pub const fn location(self) -> (usize, Width) {
        match self {
            Self::PmApbAMask => (PM_BASE + 0x18, Width::W32),
            Self::PmRcause => (PM_BASE + 0x38, Width::W8),
            Self::SysctrlXosc32k => (SYSCTRL_BASE + 0x14, Width::W16),
            Self::GclkStatus => (GCLK_BASE + 0x01, Width::W8),
            Self::GclkClkCtrl => (GCLK_BASE + 0x02, Width::W16),
            Self::GclkGenCtrl => (GCLK_BASE + 0x04, Width::W32),
            Self::GclkGenDiv => (GCLK_BASE + 0x08, Width::W32),
            Self::RtcCtrl => (RTC_BASE, Width::W16),
            Self::RtcReadReq => (RTC_BASE + 0x02, Width::W16),
            Self::RtcIntEnClr => (RTC_BASE + 0x06, Width::W8),
            Self::RtcIntEnSet => (RTC_BASE + 0x07, Width::W8),
            Self::RtcIntFlag => (RTC_BASE + 0x08, Width::W8),
            Self::RtcStatus => (RTC_BASE + 0x0A, Width::W8),
            Self::Mode0Count => (RTC_BASE + 0x10, Width::W32),
            Self::Mode0Comp0 => (RTC_BASE + 0x18, Width::W32),
            Self::Mode1Count => (RTC_BASE + 0x10, Width::W16),
            Self::Mode1Per => (RTC_BASE + 0x14, Width::W16),
            Self::Mode1Comp0 => (RTC_BASE + 0x18, Width::W16),
            Self::Mode1Comp1 => (RTC_BASE + 0x1A, Width::W16),
            Self::Mode2Clock => (RTC_BASE + 0x10, Width::W32),
            Self::Mode2Alarm0 => (RTC_BASE + 0x18, Width::W32),
            Self::Mode2Mask0 => (RTC_BASE + 0x1C, Width::W8),
        }
    }

    /// Mask covering the implemented bits, given the register width.
    pub const fn mask(self) -> u32 {
        match self.location().1 {
            Width::W8 => 0xFF,
            Width::W16 => 0xFFFF,
            Width::W32 => 0xFFFF_FFFF,
        }
    }
}

/// A contiguous bit-field within a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub offset: u32,
    pub width: u32,
}

impl Field {
    pub const fn new(offset: u32, width: u32) -> Self {
        Self { offset, width }
    }

    /// Unshifted mask for the field's width.
    pub const fn max(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    pub const fn get(self, word: u32) -> u32 {
        (word >> self.offset) & self.max()
    }

    /// Replace the field in `word`. Bits of `value` beyond the field width are dropped.
    pub const fn set(self, word: u32, value: u32) -> u32 {
        let mask = self.max() << self.offset;
        (word & !mask) | ((value << self.offset) & mask)
    }
}

/// PM.APBAMASK bits.
pub mod apbamask {
    pub const RTC: u32 = 1 << 5;
}

/// PM.RCAUSE bits.
pub mod rcause {
    pub const POR: u32 = 1 << 0;
    pub const BOD12: u32 = 1 << 1;
    pub const BOD33: u32 = 1 << 2;
    pub const EXT: u32 = 1 << 4;
    pub const WDT: u32 = 1 << 5;
    pub const SYST: u32 = 1 << 6;
}

/// SYSCTRL.XOSC32K bits.
pub mod xosc32k {
    use super::Field;

    pub const ENABLE: u32 = 1 << 1;
    pub const XTALEN: u32 = 1 << 2;
    pub const EN32K: u32 = 1 << 3;
    pub const RUNSTDBY: u32 = 1 << 6;
    pub const ONDEMAND: u32 = 1 << 7;
    pub const STARTUP: Field = Field::new(8, 3);
}

/// GCLK register bits.
pub mod gclk {
    use super::Field;

    /// STATUS.SYNCBUSY
    pub const SYNCBUSY: u32 = 1 << 7;

    pub const GENDIV_ID: Field = Field::new(0, 4);
    pub const GENDIV_DIV: Field = Field::new(8, 16);

    pub const GENCTRL_ID: Field = Field::new(0, 4);
    pub const GENCTRL_SRC: Field = Field::new(8, 5);
    pub const GENCTRL_GENEN: u32 = 1 << 16;
    pub const GENCTRL_DIVSEL: u32 = 1 << 20;

    pub const CLKCTRL_ID: Field = Field::new(0, 6);
    pub const CLKCTRL_GEN: Field = Field::new(8, 4);
    pub const CLKCTRL_CLKEN: u32 = 1 << 14;

    /// Clock source selection values for GENCTRL.SRC.
    pub const SRC_OSCULP32K: u32 = 0x03;
    pub const SRC_XOSC32K: u32 = 0x05;

    /// Peripheral channel of the RTC.
    pub const RTC_GCLK_ID: u32 = 0x04;
}

/// RTC register bits.
pub mod rtc {
    use super::Field;

    pub const CTRL_SWRST: u32 = 1 << 0;
    pub const CTRL_ENABLE: u32 = 1 << 1;
    pub const CTRL_MODE: Field = Field::new(2, 2);
    /// Modes 0 and 2 only.
    pub const CTRL_MATCHCLR: u32 = 1 << 7;
    /// Mode 2 only. Cleared for 24-hour representation.
    pub const CTRL_CLKREP: u32 = 1 << 6;
    pub const CTRL_PRESCALER: Field = Field::new(8, 4);

    pub const READREQ_ADDR: Field = Field::new(0, 6);
    pub const READREQ_RCONT: u32 = 1 << 14;
    pub const READREQ_RREQ: u32 = 1 << 15;

    /// STATUS.SYNCBUSY
    pub const SYNCBUSY: u32 = 1 << 7;

    /// Interrupt enable and flag bits. CMP0 and ALARM0 share a position.
    pub const INT_CMP0: u32 = 1 << 0;
    pub const INT_CMP1: u32 = 1 << 1;
    pub const INT_ALARM0: u32 = 1 << 0;
    pub const INT_SYNCRDY: u32 = 1 << 6;
    pub const INT_OVF: u32 = 1 << 7;

    pub const CLOCK_SECOND: Field = Field::new(0, 6);
    pub const CLOCK_MINUTE: Field = Field::new(6, 6);
    pub const CLOCK_HOUR: Field = Field::new(12, 5);
    pub const CLOCK_DAY: Field = Field::new(17, 5);
    pub const CLOCK_MONTH: Field = Field::new(22, 4);
    pub const CLOCK_YEAR: Field = Field::new(26, 6);

    pub const MASK_SEL: Field = Field::new(0, 3);
}

/// Access to the hardware the driver depends on.
///
/// `Samd21` in the `mmio` module drives the real registers; `SimRtc` in the `sim` module is
/// a behavioural model for host tests.
pub trait Hardware {
    /// Read a register. Only the bits covered by the register's width are meaningful.
    fn read(&mut self, reg: Reg) -> u32;

    /// Write a register. Bits beyond the register's width are ignored.
    fn write(&mut self, reg: Reg, value: u32);

    /// Read-modify-write.
    fn modify<F>(&mut self, reg: Reg, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Unmask the RTC interrupt line in the NVIC at the given priority. Lower is more urgent.
    fn enable_interrupt(&mut self, priority: u8);

    /// Enter deep sleep until the next interrupt.
    fn standby(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_set_truncates_to_width() {
        let word = rtc::CLOCK_HOUR.set(0, 0xFF);
        assert_eq!(rtc::CLOCK_HOUR.get(word), 0x1F);
        // Neighbouring fields untouched.
        assert_eq!(rtc::CLOCK_MINUTE.get(word), 0);
        assert_eq!(rtc::CLOCK_DAY.get(word), 0);
    }

    #[test]
    fn clock_fields_tile_the_register() {
        let fields = [
            rtc::CLOCK_SECOND,
            rtc::CLOCK_MINUTE,
            rtc::CLOCK_HOUR,
            rtc::CLOCK_DAY,
            rtc::CLOCK_MONTH,
            rtc::CLOCK_YEAR,
        ];
        let mut covered = 0u32;
        for f in fields {
            let m = f.max() << f.offset;
            assert_eq!(covered & m, 0);
            covered |= m;
        }
        assert_eq!(covered, u32::MAX);
    }

    #[test]
    fn overlays_share_offsets() {
        assert_eq!(Reg::Mode0Count.location().0, Reg::Mode2Clock.location().0);
        assert_eq!(Reg::Mode1Count.mask(), 0xFFFF);
        assert_eq!(Reg::Mode0Count.mask(), u32::MAX);
    }
}
