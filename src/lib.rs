//! Gated frequency counter for the ATmega328P.
//!
//! Three hardware timers implement a fixed sampling gate around an external
//! clock signal: Timer0 bounds the 1000 us sampling period, Timer2 closes
//! the ~500 us counting gate, Timer1 counts the signal edges in between.
//! Each completed cycle is converted to MHz and reported over the USART.
//!
//! The control logic is written against small capability traits so it runs
//! unchanged on the host under test, with simulated timers standing in for
//! the AVR peripherals.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod freq;
pub mod gate;
pub mod measure;
pub mod report;
pub mod transport;

#[cfg(target_arch = "avr")]
pub mod hal;

#[cfg(test)]
mod sim;

pub use freq::FrequencyReading;
pub use gate::{CycleContext, CyclePhase, GateController};
pub use transport::ByteTransport;
