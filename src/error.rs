//! Common error definitions.

/// Alias for Result<T, Error>.
pub type Result<T> = core::result::Result<T, Error>;

/// Collection of all errors that can occur.
///
/// Most operations in this crate never fail: calls addressed to an inactive mode are silently
/// ignored. Errors only surface when the bounded synchronization policy is selected.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Occurs when an expected change of a register does happen in time.
    ///
    /// This is returned when a bounded loop exceeds its alotted iteration count, eg the
    /// RTC's `SYNCBUSY` bit never clearing because its generic clock isn't running.
    RegisterUnchanged,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RegisterUnchanged => f.write_str("register did not change in time"),
        }
    }
}

impl core::error::Error for Error {}
