//! This is an internal module that contains utility functionality used by other modules.

/// Spin while `$cond` holds, giving up with `Err($err)` after `$max` polls.
///
/// Example: `bounded_loop!(hw.read(Reg::RtcStatus) & SYNCBUSY != 0, Error::RegisterUnchanged, 10_000);`
macro_rules! bounded_loop {
    ($cond:expr, $err:expr, $max:expr) => {{
        let mut i: u32 = 0;
        while $cond {
            i += 1;
            if i >= $max {
                return Err($err);
            }
        }
    }};
}

pub(crate) use bounded_loop;

/// Largest RTC prescaler exponent: `CTRL.PRESCALER = 10` divides by 1024.
const MAX_PRESCALER_EXP: u32 = 10;
/// Largest GCLK divider exponent we use with `DIVSEL` set (divides by 2^(DIV + 1)).
const MAX_GCLK_EXP: u32 = 15;

/// Split an overall division factor of the 32.768 kHz source into an RTC prescaler exponent
/// and a GCLK generator `DIV` value (used with `DIVSEL`, so the generator divides by
/// `2^(DIV + 1)`).
///
/// The factor is rounded down to a power of two and clamped to the achievable range
/// (2 through 2^26). The RTC prescaler takes as much of the division as it can, since
/// it keeps the counter's input clock fast and its resolution fine-grained.
pub(crate) fn compute_divider(total: u32) -> (u32, u8) {
    let exp = if total < 2 { 1 } else { 31 - total.leading_zeros() };
    let exp = exp.min(MAX_PRESCALER_EXP + MAX_GCLK_EXP + 1);

    // The generator divides by at least 2 once DIVSEL is set.
    let gclk_exp = exp.saturating_sub(MAX_PRESCALER_EXP).max(1);
    let prescaler_exp = exp - gclk_exp;

    (prescaler_exp, (gclk_exp - 1) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_for_one_hz() {
        // 32768 = 2^15: 1024 in the RTC, 32 in the generator.
        assert_eq!(compute_divider(32_768), (10, 4));
    }

    #[test]
    fn small_divisions_use_the_generator_minimum() {
        assert_eq!(compute_divider(0), (0, 0));
        assert_eq!(compute_divider(2), (0, 0));
        assert_eq!(compute_divider(8), (2, 0));
        assert_eq!(compute_divider(2048), (10, 0));
    }

    #[test]
    fn non_powers_round_down() {
        assert_eq!(compute_divider(1000), compute_divider(512));
    }

    #[test]
    fn huge_divisions_clamp() {
        assert_eq!(compute_divider(u32::MAX), (10, 15));
    }

    fn poll(n: u32, max: u32) -> Result<u32, ()> {
        let mut remaining = n;
        bounded_loop!(
            {
                remaining = remaining.saturating_sub(1);
                remaining > 0
            },
            (),
            max
        );
        Ok(remaining)
    }

    #[test]
    fn bounded_loop_gives_up() {
        assert_eq!(poll(3, 10), Ok(0));
        assert_eq!(poll(100, 10), Err(()));
    }
}
