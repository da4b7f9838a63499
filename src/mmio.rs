//! Direct register access on a real SAM D21.

use core::ptr::{read_volatile, write_volatile};

use cortex_m::{interrupt::InterruptNumber, peripheral::NVIC};

use crate::{
    low_power,
    regs::{Hardware, Reg, Width},
};

/// The RTC's line in the SAM D21 NVIC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RtcInterrupt;

// SAFETY: 3 is the RTC's interrupt number on every SAM D21 variant.
unsafe impl InterruptNumber for RtcInterrupt {
    fn number(self) -> u16 {
        3
    }
}

/// Cortex-M0+ implements the top two bits of each priority byte.
const NVIC_PRIO_BITS: u8 = 2;

/// Volatile access to the PM, SYSCTRL, GCLK and RTC registers of a SAM D21, and to the
/// Cortex-M0+ NVIC and SCB.
pub struct Samd21 {
    _private: (),
}

impl Samd21 {
    /// # Safety
    /// The caller must make sure nothing else configures the RTC or generic clock generator
    /// 2 while this handle is alive. Other code may keep using the PM, SYSCTRL and GCLK
    /// registers this driver doesn't touch.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl Hardware for Samd21 {
    fn read(&mut self, reg: Reg) -> u32 {
        let (addr, width) = reg.location();
        // SAFETY: `addr` is a valid, aligned peripheral register of the given width.
        unsafe {
            match width {
                Width::W8 => read_volatile(addr as *const u8) as u32,
                Width::W16 => read_volatile(addr as *const u16) as u32,
                Width::W32 => read_volatile(addr as *const u32),
            }
        }
    }

    fn write(&mut self, reg: Reg, value: u32) {
        let (addr, width) = reg.location();
        // SAFETY: as above; narrowing drops bits the register doesn't implement.
        unsafe {
            match width {
                Width::W8 => write_volatile(addr as *mut u8, value as u8),
                Width::W16 => write_volatile(addr as *mut u16, value as u16),
                Width::W32 => write_volatile(addr as *mut u32, value),
            }
        }
    }

    fn enable_interrupt(&mut self, priority: u8) {
        let prio = priority << (8 - NVIC_PRIO_BITS);
        // SAFETY: priority changes and unmasking are only unsafe with priority-based
        // critical sections, which this crate doesn't use.
        unsafe {
            let mut cp = cortex_m::Peripherals::steal();
            cp.NVIC.set_priority(RtcInterrupt, prio);
            NVIC::unmask(RtcInterrupt);
        }
    }

    fn standby(&mut self) {
        low_power::standby();
    }
}
