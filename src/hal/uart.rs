//! Blocking USART0 driver.
//!
//! The reporting path busy-waits on the hardware ready bits; everything is
//! called from the main loop only, never from a handler (a stalled receiver
//! blocks the loop indefinitely, which is accepted for this device).

use core::convert::Infallible;

use avr_device::atmega328p::USART0;
use embedded_hal::serial;

use crate::transport::ByteTransport;

// UCSR0A status bits
const UDRE0: u8 = 1 << 5;
const RXC0: u8 = 1 << 7;

pub struct Uart;

impl Uart {
    /// Derive and program the divisor for `baud` at `clock_hz`.
    /// Framing is fixed: 8 data bits, 1 stop bit, no parity, normal speed.
    pub fn new(baud: u32, clock_hz: u32) -> Self {
        let ubrr = (clock_hz / 16 / baud).saturating_sub(1) as u16;
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0.write(|w| w.bits(ubrr));
            (*p).ucsr0b.write(|w| w.bits(0x18)); // RXEN0 | TXEN0
            (*p).ucsr0c.write(|w| w.bits(0x06)); // 8 data bits, 1 stop bit
            (*p).ucsr0a.modify(|r, w| w.bits(r.bits() & !0x02)); // no double speed
        }
        Self
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        unsafe {
            let p = USART0::ptr();
            if (*p).ucsr0a.read().bits() & UDRE0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
            (*p).udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        // UDRE0, not TXC0: TXC0 is 0 from reset until a first frame
        // completes, so waiting on it before any transmission never returns
        unsafe {
            if (*USART0::ptr()).ucsr0a.read().bits() & UDRE0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
        }
        Ok(())
    }
}

impl serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        unsafe {
            let p = USART0::ptr();
            if (*p).ucsr0a.read().bits() & RXC0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
            Ok((*p).udr0.read().bits())
        }
    }
}

impl ByteTransport for Uart {
    fn send_byte(&mut self, byte: u8) {
        nb::block!(serial::Write::write(self, byte)).ok();
    }

    fn recv_byte(&mut self) -> u8 {
        match nb::block!(serial::Read::read(self)) {
            Ok(byte) => byte,
            Err(e) => match e {},
        }
    }

    fn has_data(&self) -> bool {
        unsafe { (*USART0::ptr()).ucsr0a.read().bits() & RXC0 != 0 }
    }
}
