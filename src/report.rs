//! Serial measurement report
//!
//! One framed report per completed cycle, byte for byte:
//! `Freq. Measured: <freq>MHz` NL CR `TCNT1: <hex>` NL CR, a short pause,
//! then a single form-feed delimiter so a dumb terminal starts a fresh page.

use embedded_hal::blocking::delay::DelayMs;
use ufmt::uwrite;

use crate::config::{REPORT_DELIMITER, REPORT_TAIL_MS};
use crate::transport::{ByteTransport, TransportWriter};

const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";

/// Hex rendering of one raw byte, upper nibble first.
pub fn send_hex_byte<T: ByteTransport>(transport: &mut T, value: u8) {
    transport.send_byte(HEX_CHARS[(value >> 4) as usize]);
    transport.send_byte(HEX_CHARS[(value & 0x0F) as usize]);
}

/// Emit one full report for a rendered frequency string and the raw latched
/// counter halves. The high register byte goes on the wire first; downstream
/// tooling parses the four hex digits as one big-endian 16-bit value.
pub fn send_report<T, D>(
    transport: &mut T,
    delay: &mut D,
    freq_str: &str,
    count_lo: u8,
    count_hi: u8,
) where
    T: ByteTransport,
    D: DelayMs<u16>,
{
    {
        let mut w = TransportWriter::new(transport);
        uwrite!(w, "Freq. Measured: {}MHz\n\r", freq_str).ok();
        uwrite!(w, "TCNT1: ").ok();
    }
    send_hex_byte(transport, count_hi);
    send_hex_byte(transport, count_lo);
    transport.send_byte(b'\n');
    transport.send_byte(b'\r');

    delay.delay_ms(REPORT_TAIL_MS);
    transport.send_byte(REPORT_DELIMITER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimTransport;
    use embedded_hal_mock::delay::MockNoop;

    #[test]
    fn hex_nibble_mapping() {
        let mut transport = SimTransport::new();
        send_hex_byte(&mut transport, 0x00);
        send_hex_byte(&mut transport, 0x0F);
        send_hex_byte(&mut transport, 0xA5);
        send_hex_byte(&mut transport, 0xFF);
        assert_eq!(transport.sent, b"000FA5FF");
    }

    #[test]
    fn report_byte_stream_is_exact() {
        let mut transport = SimTransport::new();
        let mut delay = MockNoop::new();

        send_report(&mut transport, &mut delay, "12.345678", 0xAB, 0xCD);

        let mut expected = b"Freq. Measured: 12.345678MHz\n\rTCNT1: CDAB\n\r".to_vec();
        expected.push(12);
        assert_eq!(transport.sent, expected);
    }

    #[test]
    fn zero_count_report() {
        let mut transport = SimTransport::new();
        let mut delay = MockNoop::new();

        send_report(&mut transport, &mut delay, "0.000000", 0x00, 0x00);

        let mut expected = b"Freq. Measured: 0.000000MHz\n\rTCNT1: 0000\n\r".to_vec();
        expected.push(12);
        assert_eq!(transport.sent, expected);
    }
}
