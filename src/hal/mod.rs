//! ATmega328P register-level backends for the gate capabilities.
//! Compiled only for AVR targets; host tests substitute the sim doubles.

pub mod delay;
pub mod gpio;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use delay::BusyDelay;
pub use gpio::board;
pub use gpio::{Input, Output, Pin};
pub use timer::{ExternalPulseCounter, GateWindowTimer, SamplePeriodTimer};
pub use uart::Uart;
