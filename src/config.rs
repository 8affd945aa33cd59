//! Configuration constants for the gated frequency counter

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 38_400;

/// Timer0 compare TOP for the sampling-period timer.
/// 16 MHz / 64 / (249 + 1) = 1 kHz, one period every 1000 us.
pub const SAMPLE_PERIOD_TOP: u8 = 249;

/// Timer2 compare TOP for the gate-duration timer.
/// 16 MHz / 64 / (124 + 1) = 2 kHz, the gate closes after ~500 us.
pub const GATE_DURATION_TOP: u8 = 124;

/// Prescaler correction applied to the raw pulse count.
pub const FREQ_PRESCALER: u32 = 8;

/// Effective gate width in microseconds used for the MHz conversion.
pub const GATE_WINDOW_US: u32 = 499;

/// Settle time between resetting the timers and rearming them.
pub const TIMER_SETTLE_US: u16 = 10;

/// Settle time before each serial report.
pub const REPORT_SETTLE_MS: u16 = 1;

/// Pause between the report text and the trailing delimiter byte.
pub const REPORT_TAIL_MS: u16 = 50;

/// Form-feed sentinel separating reports on a terminal consumer.
pub const REPORT_DELIMITER: u8 = 12;

/// Rendered frequency strings never exceed "1050.661323" plus slack.
pub const FREQ_STR_CAPACITY: usize = 16;
