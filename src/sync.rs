//! Register synchronization.
//!
//! The RTC and GCLK register interfaces live in a slow clock domain. A write only takes effect
//! once `STATUS.SYNCBUSY` clears, and a read of a counter/clock register only returns a fresh
//! value after a read request has been synchronized. Every access in this crate goes through
//! [`SyncGate`] so that ordering holds.
//!
//! The three RTC modes share the `STATUS` register, so a single gate serves all of them.

use crate::{
    error::{Error, Result},
    regs::{Hardware, Reg, gclk, rtc},
    util::bounded_loop,
};

/// How long to wait for a synchronization to complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPolicy {
    /// Spin until the hardware acknowledges. If the peripheral's clock isn't running, this
    /// never returns.
    #[default]
    Unbounded,
    /// Give up with `Error::RegisterUnchanged` after this many polls of the status register.
    Bounded(u32),
}

/// Performs register writes and reads with the synchronization discipline the RTC requires.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncGate {
    policy: SyncPolicy,
}

impl SyncGate {
    pub const fn new(policy: SyncPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Whether an RTC register synchronization is in progress.
    pub fn is_syncing<H: Hardware>(hw: &mut H) -> bool {
        hw.read(Reg::RtcStatus) & rtc::SYNCBUSY != 0
    }

    /// Wait for `bit` of `status` to clear.
    fn wait_on<H: Hardware>(&self, hw: &mut H, status: Reg, bit: u32) -> Result<()> {
        match self.policy {
            SyncPolicy::Unbounded => {
                while hw.read(status) & bit != 0 {}
            }
            SyncPolicy::Bounded(max_iters) => {
                bounded_loop!(
                    hw.read(status) & bit != 0,
                    Error::RegisterUnchanged,
                    max_iters
                );
            }
        }
        Ok(())
    }

    /// Wait until the RTC's `SYNCBUSY` bit clears.
    pub fn wait<H: Hardware>(&self, hw: &mut H) -> Result<()> {
        self.wait_on(hw, Reg::RtcStatus, rtc::SYNCBUSY)
    }

    /// Wait until the generic clock controller's `SYNCBUSY` bit clears.
    pub fn wait_gclk<H: Hardware>(&self, hw: &mut H) -> Result<()> {
        self.wait_on(hw, Reg::GclkStatus, gclk::SYNCBUSY)
    }

    /// Write a register, then wait for the write to synchronize.
    pub fn write_then_sync<H: Hardware>(&self, hw: &mut H, reg: Reg, value: u32) -> Result<()> {
        hw.write(reg, value);
        self.wait(hw)
    }

    /// Read-modify-write a register, then wait for the write to synchronize.
    pub fn modify_then_sync<H, F>(&self, hw: &mut H, reg: Reg, f: F) -> Result<()>
    where
        H: Hardware,
        F: FnOnce(u32) -> u32,
    {
        hw.modify(reg, f);
        self.wait(hw)
    }

    /// Strobe a one-shot read request (continuous mode off) and wait for it to complete.
    pub fn read_request<H: Hardware>(&self, hw: &mut H) -> Result<()> {
        hw.write(Reg::RtcReadReq, rtc::READREQ_RREQ);
        self.wait(hw)
    }

    /// Read a register after synchronizing it from the RTC clock domain.
    pub fn read_synchronized<H: Hardware>(&self, hw: &mut H, reg: Reg) -> Result<u32> {
        self.read_request(hw)?;
        Ok(hw.read(reg))
    }
}
