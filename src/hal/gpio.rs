use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use core::marker::PhantomData;

use crate::gate::StatusPin;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8> Pin<PORT, P, Input> {
    /// Fresh pin handle in the reset state (input, no pull-up assumed).
    pub const fn new() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<PORT, const P: u8> Pin<PORT, P, Output> {
    /// Handle for interrupt context without reconfiguring the DDR.
    /// Only valid after the pin was put into output mode at init.
    pub const unsafe fn steal() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $ddr:ident, $port:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit and disable pull-up
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }

        impl<const P: u8, MODE> PinOps for Pin<$PORT, P, MODE> {
            fn modify_port(f: impl FnOnce(u8) -> u8) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(f(r.bits())));
                }
            }

            fn read_pins() -> u8 {
                unsafe { (*$PORT::ptr()).$pin.read().bits() }
            }
        }
    };
}

// ATmega328P ports
impl_port!(PORTB, ddrb, portb, pinb);
impl_port!(PORTC, ddrc, portc, pinc);
impl_port!(PORTD, ddrd, portd, pind);

// Internal trait for port register access
trait PinOps {
    fn modify_port(f: impl FnOnce(u8) -> u8);
    fn read_pins() -> u8;
}

// Output pin implementation
impl<PORT, const P: u8> Pin<PORT, P, Output>
where
    Self: PinOps,
{
    #[inline]
    pub fn set_high(&mut self) {
        Self::modify_port(|bits| bits | (1 << P));
    }

    #[inline]
    pub fn set_low(&mut self) {
        Self::modify_port(|bits| bits & !(1 << P));
    }
}

// Input pin implementation
impl<PORT, const P: u8> Pin<PORT, P, Input>
where
    Self: PinOps,
{
    #[inline]
    pub fn is_high(&self) -> bool {
        Self::read_pins() & (1 << P) != 0
    }

    #[inline]
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<PORT, const P: u8> StatusPin for Pin<PORT, P, Output>
where
    Self: PinOps,
{
    fn set(&mut self) {
        self.set_high();
    }

    fn clear(&mut self) {
        self.set_low();
    }
}

// Board-specific pin definitions
pub mod board {
    use super::*;

    /// Raised while a sampling period is in flight (PC1).
    pub type PeriodActivePin = Pin<PORTC, 1, Output>;
    /// Raised while the counting gate is open (PC0).
    pub type GateActivePin = Pin<PORTC, 0, Output>;
}
