//! Clock tree setup for the RTC: the APB bus clock, the 32.768 kHz source oscillator, and
//! generic clock generator 2 feeding the RTC's peripheral channel.
//!
//! See the SAM D21 datasheet, sections 15 (GCLK), 16 (PM) and 17 (SYSCTRL).

use cfg_if::cfg_if;

use crate::{
    error::Result,
    regs::{Hardware, Reg, apbamask, gclk, xosc32k},
    sync::SyncGate,
};

/// Generic clock generator dedicated to the RTC.
pub const RTC_GENERATOR: u32 = 2;

/// Generator `DIV` used in calendar mode. With `DIVSEL` set the generator divides by
/// 2^(4 + 1) = 32, giving 1.024 kHz; the RTC's 1024 prescaler then yields 1 Hz.
pub const CALENDAR_GCLK_DIV: u8 = 4;

/// XOSC32K start-up time selection: 2048 cycles, about 63 ms.
const XOSC32K_STARTUP: u32 = 6;

/// 32.768 kHz source for the RTC's generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// External crystal oscillator, XOSC32K.
    Xosc32k,
    /// Internal ultra-low-power oscillator, OSCULP32K. For boards without a crystal.
    UltraLowPower32k,
}

impl Default for ClockSource {
    fn default() -> Self {
        cfg_if! {
            if #[cfg(xosc32k)] {
                Self::Xosc32k
            } else {
                Self::UltraLowPower32k
            }
        }
    }
}

impl ClockSource {
    /// GENCTRL.SRC value.
    fn src(self) -> u32 {
        match self {
            Self::Xosc32k => gclk::SRC_XOSC32K,
            Self::UltraLowPower32k => gclk::SRC_OSCULP32K,
        }
    }
}

/// Turn on the RTC's digital interface clock.
pub(crate) fn enable_bus_clock<H: Hardware>(hw: &mut H) {
    hw.modify(Reg::PmApbAMask, |v| v | apbamask::RTC);
}

/// Start the 32 kHz oscillator, if the source needs one. OSCULP32K is always running.
pub(crate) fn enable_oscillator<H: Hardware>(hw: &mut H, source: ClockSource) {
    match source {
        ClockSource::Xosc32k => hw.write(
            Reg::SysctrlXosc32k,
            xosc32k::ONDEMAND
                | xosc32k::RUNSTDBY
                | xosc32k::EN32K
                | xosc32k::XTALEN
                | xosc32k::STARTUP.set(0, XOSC32K_STARTUP)
                | xosc32k::ENABLE,
        ),
        ClockSource::UltraLowPower32k => (),
    }
}

/// Route `source` through generator 2, divided by 2^(`div` + 1), to the RTC.
pub(crate) fn configure_generator<H: Hardware>(
    hw: &mut H,
    gate: &SyncGate,
    source: ClockSource,
    div: u8,
) -> Result<()> {
    hw.write(
        Reg::GclkGenDiv,
        gclk::GENDIV_DIV.set(gclk::GENDIV_ID.set(0, RTC_GENERATOR), div as u32),
    );
    gate.wait_gclk(hw)?;

    hw.write(
        Reg::GclkGenCtrl,
        gclk::GENCTRL_GENEN
            | gclk::GENCTRL_DIVSEL
            | gclk::GENCTRL_SRC.set(gclk::GENCTRL_ID.set(0, RTC_GENERATOR), source.src()),
    );
    gate.wait_gclk(hw)?;

    hw.write(
        Reg::GclkClkCtrl,
        gclk::CLKCTRL_CLKEN
            | gclk::CLKCTRL_GEN.set(gclk::CLKCTRL_ID.set(0, gclk::RTC_GCLK_ID), RTC_GENERATOR),
    );
    gate.wait_gclk(hw)
}

/// Total division applied by the generator for a given `DIV` value.
pub const fn gclk_division(div: u8) -> u32 {
    1 << (div as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRtc;

    #[test]
    fn generator_routes_source_to_rtc() {
        let mut sim = SimRtc::new();
        let gate = SyncGate::default();

        configure_generator(&mut sim, &gate, ClockSource::Xosc32k, 4).unwrap();

        let gendiv = sim.read(Reg::GclkGenDiv);
        assert_eq!(gclk::GENDIV_ID.get(gendiv), RTC_GENERATOR);
        assert_eq!(gclk::GENDIV_DIV.get(gendiv), 4);

        let genctrl = sim.read(Reg::GclkGenCtrl);
        assert_eq!(gclk::GENCTRL_SRC.get(genctrl), gclk::SRC_XOSC32K);
        assert_ne!(genctrl & gclk::GENCTRL_DIVSEL, 0);

        let clkctrl = sim.read(Reg::GclkClkCtrl);
        assert_eq!(gclk::CLKCTRL_ID.get(clkctrl), gclk::RTC_GCLK_ID);
        assert_eq!(gclk::CLKCTRL_GEN.get(clkctrl), RTC_GENERATOR);
        assert_ne!(clkctrl & gclk::CLKCTRL_CLKEN, 0);
    }

    #[test]
    fn crystalless_source_leaves_xosc32k_alone() {
        let mut sim = SimRtc::new();
        enable_oscillator(&mut sim, ClockSource::UltraLowPower32k);
        assert_eq!(sim.writes(Reg::SysctrlXosc32k), 0);

        enable_oscillator(&mut sim, ClockSource::Xosc32k);
        assert_ne!(sim.read(Reg::SysctrlXosc32k) & xosc32k::ENABLE, 0);
    }

    #[test]
    fn calendar_divider_is_32() {
        assert_eq!(gclk_division(CALENDAR_GCLK_DIV), 32);
    }
}
