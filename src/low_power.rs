//! This module contains code used to place the MCU in low power modes.
//! See section 16.6.2.8: `Sleep Mode Operation` of the SAM D21 datasheet.

use cortex_m::{
    Peripherals,
    asm::{dsb, wfi},
};

/// Enter `Standby` mode: the deepest sleep state available. Clocks stop unless configured to
/// run in standby; the RTC keeps counting from its 32 kHz source when the oscillator and
/// generator have `RUNSTDBY` set, and any enabled RTC interrupt wakes the core.
///
/// Entering standby while attached through the native USB port can cause issues with the
/// host connection.
pub fn standby() {
    let mut scb = unsafe { Peripherals::steal().SCB };

    // SLEEPDEEP = 1 selects standby rather than idle.
    scb.set_sleepdeep();

    dsb();
    wfi();
}
