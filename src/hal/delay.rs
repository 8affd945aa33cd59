//! Busy-wait delay provider.
//!
//! A calibrated nop loop: coarse, but the firmware only needs short settle
//! pauses, not timekeeping, and the measurement timers stay free for the
//! gate. Timer0 must not be borrowed for delays here.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::CPU_FREQ_HZ;

pub struct BusyDelay;

// loop body is roughly four cycles on AVR
const ITERS_PER_US: u32 = CPU_FREQ_HZ / 4_000_000;

impl DelayUs<u16> for BusyDelay {
    fn delay_us(&mut self, us: u16) {
        for _ in 0..u32::from(us) * ITERS_PER_US {
            avr_device::asm::nop();
        }
    }
}

impl DelayMs<u16> for BusyDelay {
    fn delay_ms(&mut self, ms: u16) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }
}
