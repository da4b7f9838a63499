//! Decoding of the power manager's reset cause register.

use crate::regs::{Hardware, Reg, rcause};

/// Why the device last restarted, as recorded in `PM.RCAUSE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetCause(u8);

impl ResetCause {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn read<H: Hardware>(hw: &mut H) -> Self {
        Self(hw.read(Reg::PmRcause) as u8)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    fn has(self, bit: u32) -> bool {
        self.0 as u32 & bit != 0
    }

    pub fn is_power_on(self) -> bool {
        self.has(rcause::POR)
    }

    pub fn is_brown_out(self) -> bool {
        self.has(rcause::BOD12) || self.has(rcause::BOD33)
    }

    pub fn is_external(self) -> bool {
        self.has(rcause::EXT)
    }

    pub fn is_watchdog(self) -> bool {
        self.has(rcause::WDT)
    }

    /// Reset requested by software, through `AIRCR.SYSRESETREQ`.
    pub fn is_system(self) -> bool {
        self.has(rcause::SYST)
    }

    /// Whether the RTC kept running through this reset, so its value is worth keeping.
    /// Power-on and brown-out resets clear the RTC anyway.
    pub fn preserves_rtc(self) -> bool {
        self.is_system() || self.is_watchdog() || self.is_external()
    }
}
