//! Pulse-count to frequency conversion
//!
//! One gate window collects `count` external clock edges; the reading in MHz
//! is `count * 8 / 499` (prescaler-corrected counts over the fixed 499 us
//! window). The value is carried as integer micro-MHz so the fixed six-digit
//! rendering needs no floating point.

use crate::config::{FREQ_PRESCALER, FREQ_STR_CAPACITY, GATE_WINDOW_US};

/// One frequency measurement, recomputed and discarded every cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyReading {
    micro_mhz: u32,
}

impl FrequencyReading {
    pub fn from_count(count: u16) -> Self {
        let scaled = u64::from(count) * u64::from(FREQ_PRESCALER) * 1_000_000;
        let divisor = u64::from(GATE_WINDOW_US);
        // round half up at the last rendered digit
        let micro_mhz = ((scaled + divisor / 2) / divisor) as u32;
        Self { micro_mhz }
    }

    /// Reading in millionths of a MHz.
    pub fn micro_mhz(&self) -> u32 {
        self.micro_mhz
    }

    /// Render as a sign-less fixed-point decimal with exactly six fractional
    /// digits, e.g. `8.000000`.
    pub fn render<'a>(&self, buf: &'a mut [u8; FREQ_STR_CAPACITY]) -> &'a str {
        let whole = self.micro_mhz / 1_000_000;
        let frac = self.micro_mhz % 1_000_000;

        let mut pos = write_decimal(&mut buf[..], whole, 1);
        buf[pos] = b'.';
        pos += 1;
        pos += write_decimal(&mut buf[pos..], frac, 6);

        // SAFETY: only ASCII digits and '.' were written to buf[..pos]
        unsafe { core::str::from_utf8_unchecked(&buf[..pos]) }
    }
}

/// Writes `value` in decimal, zero-padded to `min_digits`, returning the
/// number of bytes written.
fn write_decimal(out: &mut [u8], mut value: u32, min_digits: usize) -> usize {
    let mut digits = [0u8; 10];
    let mut n = 0;
    while value > 0 {
        digits[n] = b'0' + (value % 10) as u8;
        value /= 10;
        n += 1;
    }
    while n < min_digits {
        digits[n] = b'0';
        n += 1;
    }
    for (i, slot) in out[..n].iter_mut().enumerate() {
        *slot = digits[n - 1 - i];
    }
    n
}
