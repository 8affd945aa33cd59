//! The three measurement timers.
//!
//! Timer0 bounds the sampling period, Timer2 bounds the gate window, Timer1
//! counts external clock edges on the T1 pin. All three are driven through
//! raw control-register writes; the compare-match interrupts for Timer0 and
//! Timer2 land in the handlers wired up in `main.rs`.

use avr_device::atmega328p::{TC0, TC1, TC2};

use crate::config::{GATE_DURATION_TOP, SAMPLE_PERIOD_TOP};
use crate::gate::{GateTimer, PulseCounter};

/// Timer0: sampling-period timer. CTC on OCR0A, sysclk/64, 1 kHz.
pub struct SamplePeriodTimer;

impl SamplePeriodTimer {
    pub fn init() -> Self {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0a.write(|w| w.bits(0x02)); // CTC mode
            (*p).tccr0b.write(|w| w.bits(0x00)); // clock held off until armed
            (*p).ocr0a.write(|w| w.bits(SAMPLE_PERIOD_TOP));
            (*p).tifr0.write(|w| w.bits(0x02)); // drop any stale compare match
            (*p).timsk0.write(|w| w.bits(0x02)); // OCIE0A
        }
        Self
    }

    /// Handle for interrupt context. Only valid after [`init`](Self::init).
    pub const unsafe fn steal() -> Self {
        Self
    }
}

impl GateTimer for SamplePeriodTimer {
    fn start(&mut self) {
        unsafe { (*TC0::ptr()).tccr0b.write(|w| w.bits(0x03)) } // sysclk/64
    }

    fn stop(&mut self) {
        unsafe { (*TC0::ptr()).tccr0b.write(|w| w.bits(0x00)) }
    }

    fn reset(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt0.write(|w| w.bits(0));
            (*p).tifr0.write(|w| w.bits(0x02));
        }
    }
}

/// Timer1: 16-bit pulse counter clocked by the external signal on T1.
pub struct ExternalPulseCounter;

impl ExternalPulseCounter {
    pub fn init() -> Self {
        unsafe {
            let p = TC1::ptr();
            (*p).tccr1a.write(|w| w.bits(0x00)); // normal mode
            (*p).tccr1b.write(|w| w.bits(0x00)); // no clock until the gate opens
            (*p).tcnt1.write(|w| w.bits(0));
            (*p).tifr1.write(|w| w.bits(0x02));
            (*p).timsk1.write(|w| w.bits(0x00)); // counts silently, no interrupt
        }
        Self
    }

    /// Handle for interrupt context. Only valid after [`init`](Self::init).
    pub const unsafe fn steal() -> Self {
        Self
    }
}

impl GateTimer for ExternalPulseCounter {
    fn start(&mut self) {
        // external clock on T1, rising edge
        unsafe { (*TC1::ptr()).tccr1b.write(|w| w.bits(0x07)) }
    }

    fn stop(&mut self) {
        unsafe { (*TC1::ptr()).tccr1b.write(|w| w.bits(0x00)) }
    }

    fn reset(&mut self) {
        unsafe {
            let p = TC1::ptr();
            (*p).tcnt1.write(|w| w.bits(0));
            (*p).tifr1.write(|w| w.bits(0x02));
        }
    }
}

impl PulseCounter for ExternalPulseCounter {
    fn read_count(&self) -> u16 {
        // 16-bit read goes through the hardware TEMP register; the counter
        // is stopped before the latch so the halves cannot tear
        unsafe { (*TC1::ptr()).tcnt1.read().bits() }
    }

    fn zero(&mut self) {
        unsafe { (*TC1::ptr()).tcnt1.write(|w| w.bits(0)) }
    }
}

/// Timer2: gate-duration timer. CTC on OCR2A, sysclk/64, 2 kHz.
pub struct GateWindowTimer;

impl GateWindowTimer {
    pub fn init() -> Self {
        unsafe {
            let p = TC2::ptr();
            (*p).tccr2a.write(|w| w.bits(0x02)); // CTC mode
            (*p).tccr2b.write(|w| w.bits(0x00));
            (*p).ocr2a.write(|w| w.bits(GATE_DURATION_TOP));
            (*p).tifr2.write(|w| w.bits(0x02));
            (*p).timsk2.write(|w| w.bits(0x02)); // OCIE2A
        }
        Self
    }

    /// Handle for interrupt context. Only valid after [`init`](Self::init).
    pub const unsafe fn steal() -> Self {
        Self
    }
}

impl GateTimer for GateWindowTimer {
    fn start(&mut self) {
        // Timer2 prescaler table differs from Timer0: 0x04 selects /64
        unsafe { (*TC2::ptr()).tccr2b.write(|w| w.bits(0x04)) }
    }

    fn stop(&mut self) {
        unsafe { (*TC2::ptr()).tccr2b.write(|w| w.bits(0x00)) }
    }

    fn reset(&mut self) {
        unsafe {
            let p = TC2::ptr();
            (*p).tcnt2.write(|w| w.bits(0));
            (*p).tifr2.write(|w| w.bits(0x02));
        }
    }
}
