//! Simulated hardware doubles for host-side tests
//!
//! Handles are cheap clones over shared state, so a test can hold one view
//! of a timer while the controller under test holds another - the same
//! register-sharing shape the real firmware has between main loop and ISRs.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::gate::{GateTimer, PulseCounter, StatusPin};
use crate::transport::ByteTransport;

#[derive(Clone, Default)]
pub struct SimTimer {
    running: Rc<Cell<bool>>,
}

impl SimTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl GateTimer for SimTimer {
    fn start(&mut self) {
        self.running.set(true);
    }

    fn stop(&mut self) {
        self.running.set(false);
    }

    fn reset(&mut self) {}
}

#[derive(Clone, Default)]
pub struct SimCounter {
    running: Rc<Cell<bool>>,
    count: Rc<Cell<u16>>,
}

impl SimCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn value(&self) -> u16 {
        self.count.get()
    }

    /// Edges arriving from the external clock; counted only while running,
    /// wrapping at 16 bits like the hardware register.
    pub fn feed(&self, edges: u32) {
        if self.running.get() {
            let next = (u32::from(self.count.get()) + edges) % 65536;
            self.count.set(next as u16);
        }
    }
}

impl GateTimer for SimCounter {
    fn start(&mut self) {
        self.running.set(true);
    }

    fn stop(&mut self) {
        self.running.set(false);
    }

    fn reset(&mut self) {
        self.count.set(0);
    }
}

impl PulseCounter for SimCounter {
    fn read_count(&self) -> u16 {
        self.count.get()
    }

    fn zero(&mut self) {
        self.count.set(0);
    }
}

#[derive(Clone, Default)]
pub struct SimPin {
    level: Rc<Cell<bool>>,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.level.get()
    }
}

impl StatusPin for SimPin {
    fn set(&mut self) {
        self.level.set(true);
    }

    fn clear(&mut self) {
        self.level.set(false);
    }
}

#[derive(Default)]
pub struct SimTransport {
    pub sent: Vec<u8>,
    pub rx: VecDeque<u8>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteTransport for SimTransport {
    fn send_byte(&mut self, byte: u8) {
        self.sent.push(byte);
    }

    fn recv_byte(&mut self) -> u8 {
        self.rx.pop_front().expect("recv_byte on empty sim queue")
    }

    fn has_data(&self) -> bool {
        !self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_receive_side() {
        let mut t = SimTransport::new();
        assert!(!t.has_data());
        t.rx.extend([0x41, 0x42]);
        assert!(t.has_data());
        assert_eq!(t.recv_byte(), 0x41);
        assert_eq!(t.recv_byte(), 0x42);
        assert!(!t.has_data());
    }

    #[test]
    fn counter_ignores_edges_while_stopped() {
        let counter = SimCounter::new();
        counter.feed(10);
        assert_eq!(counter.value(), 0);

        let mut handle = counter.clone();
        handle.start();
        counter.feed(10);
        handle.stop();
        counter.feed(10);
        assert_eq!(counter.value(), 10);
    }
}
