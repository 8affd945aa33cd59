//! Byte-level serial transport interface
//!
//! The measurement loop only ever pushes single bytes; everything above that
//! (labels, hex dumps, the frequency string) goes through [`TransportWriter`]
//! so `ufmt` can be used for the text parts.

use core::convert::Infallible;
use ufmt::uWrite;

/// Blocking byte transport over a UART-like link.
///
/// `send_byte` and `recv_byte` busy-wait on the hardware ready bits and must
/// only be called from the main loop, never from an interrupt handler.
pub trait ByteTransport {
    fn send_byte(&mut self, byte: u8);
    fn recv_byte(&mut self) -> u8;
    /// Non-blocking poll for pending receive data.
    fn has_data(&self) -> bool;
}

/// `ufmt` adapter over any byte transport.
pub struct TransportWriter<'a, T: ByteTransport> {
    transport: &'a mut T,
}

impl<'a, T: ByteTransport> TransportWriter<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }
}

impl<T: ByteTransport> uWrite for TransportWriter<'_, T> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.transport.send_byte(byte);
        }
        Ok(())
    }
}
