//! Timing gate controller
//!
//! Three timers cooperate around one measurement cycle: the sampling-period
//! timer bounds the whole cycle (1000 us), the gate-duration timer bounds the
//! counting window (~500 us), and the pulse counter accumulates external
//! clock edges while the gate is open. Timer expiry fires asynchronously
//! (compare-match interrupts on hardware, the simulated clock in tests) and
//! lands in [`GateController::on_gate_expiry`] / [`on_period_expiry`].
//!
//! Flag discipline: the expiry handlers are the only setters of the two
//! status flags, the main loop is the only clearer. Atomic load/store is
//! enough; nothing here may block.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Countdown/overflow timer capability.
pub trait GateTimer {
    /// Gate the clock on; counting resumes from the current count.
    fn start(&mut self);
    /// Gate the clock off.
    fn stop(&mut self);
    /// Zero the count register and clear any pending expiry condition.
    fn reset(&mut self);
}

/// Edge counter capability on top of a gateable timer.
pub trait PulseCounter: GateTimer {
    /// Current count. Only meaningful while the counter is stopped.
    fn read_count(&self) -> u16;
    fn zero(&mut self);
}

/// Indicator line driven by the controller.
pub trait StatusPin {
    fn set(&mut self);
    fn clear(&mut self);
}

/// Where the controller is within one measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CyclePhase {
    Idle = 0,
    Armed = 1,
    GateOpen = 2,
    GateClosedWaitingPeriod = 3,
    PeriodClosed = 4,
}

impl CyclePhase {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => CyclePhase::Armed,
            2 => CyclePhase::GateOpen,
            3 => CyclePhase::GateClosedWaitingPeriod,
            4 => CyclePhase::PeriodClosed,
            _ => CyclePhase::Idle,
        }
    }
}

/// Shared state between the expiry handlers and the main loop.
///
/// Lives as a `static` on hardware; the controller and the measurement loop
/// both hold it by reference.
pub struct CycleContext {
    period_elapsed: AtomicBool,
    gate_elapsed: AtomicBool,
    count_lo: AtomicU8,
    count_hi: AtomicU8,
    phase: AtomicU8,
}

impl CycleContext {
    pub const fn new() -> Self {
        Self {
            period_elapsed: AtomicBool::new(false),
            gate_elapsed: AtomicBool::new(false),
            count_lo: AtomicU8::new(0),
            count_hi: AtomicU8::new(0),
            phase: AtomicU8::new(CyclePhase::Idle as u8),
        }
    }

    pub fn period_elapsed(&self) -> bool {
        self.period_elapsed.load(Ordering::SeqCst)
    }

    pub fn gate_elapsed(&self) -> bool {
        self.gate_elapsed.load(Ordering::SeqCst)
    }

    /// Main-loop side: both flags down at the top of a cycle.
    pub fn clear_flags(&self) {
        self.period_elapsed.store(false, Ordering::SeqCst);
        self.gate_elapsed.store(false, Ordering::SeqCst);
    }

    pub fn phase(&self) -> CyclePhase {
        CyclePhase::from_raw(self.phase.load(Ordering::SeqCst))
    }

    /// Latched counter snapshot as (low, high) register halves.
    pub fn latched_halves(&self) -> (u8, u8) {
        (
            self.count_lo.load(Ordering::SeqCst),
            self.count_hi.load(Ordering::SeqCst),
        )
    }

    pub fn latched_count(&self) -> u16 {
        let (lo, hi) = self.latched_halves();
        u16::from(lo) | (u16::from(hi) << 8)
    }

    fn latch(&self, count: u16) {
        self.count_lo.store(count as u8, Ordering::SeqCst);
        self.count_hi.store((count >> 8) as u8, Ordering::SeqCst);
    }

    fn set_phase(&self, phase: CyclePhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }
}

impl Default for CycleContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the three timers and the two indicator lines for one gate.
///
/// On hardware two views of this exist over the same registers: the one the
/// main loop owns and a handler-side one rebuilt inside each ISR. The split
/// is safe because the two sides never drive the same timer operation at the
/// same point of the cycle.
pub struct GateController<'a, P, G, C, PP, GP>
where
    P: GateTimer,
    G: GateTimer,
    C: PulseCounter,
    PP: StatusPin,
    GP: StatusPin,
{
    period_timer: P,
    gate_timer: G,
    counter: C,
    period_pin: PP,
    gate_pin: GP,
    ctx: &'a CycleContext,
}

impl<'a, P, G, C, PP, GP> GateController<'a, P, G, C, PP, GP>
where
    P: GateTimer,
    G: GateTimer,
    C: PulseCounter,
    PP: StatusPin,
    GP: StatusPin,
{
    pub fn new(
        period_timer: P,
        gate_timer: G,
        counter: C,
        period_pin: PP,
        gate_pin: GP,
        ctx: &'a CycleContext,
    ) -> Self {
        Self {
            period_timer,
            gate_timer,
            counter,
            period_pin,
            gate_pin,
            ctx,
        }
    }

    pub fn context(&self) -> &'a CycleContext {
        self.ctx
    }

    /// Stop and reset everything. Idempotent; absorbs whatever a truncated
    /// previous cycle left behind.
    pub fn disarm(&mut self) {
        self.period_timer.stop();
        self.counter.stop();
        self.gate_timer.stop();
        self.period_timer.reset();
        self.counter.reset();
        self.gate_timer.reset();
        self.ctx.clear_flags();
        self.ctx.set_phase(CyclePhase::Idle);
    }

    /// Zero all three timers and clear pending expiry state, then start them
    /// together and raise both indicator lines.
    pub fn arm(&mut self) {
        self.period_timer.stop();
        self.counter.stop();
        self.gate_timer.stop();
        self.period_timer.reset();
        self.counter.reset();
        self.gate_timer.reset();
        self.ctx.clear_flags();
        self.ctx.set_phase(CyclePhase::Armed);

        self.period_timer.start();
        self.period_pin.set();
        self.counter.start();
        self.gate_timer.start();
        self.gate_pin.set();
        self.ctx.set_phase(CyclePhase::GateOpen);
    }

    /// Main-loop side stop once `gate_elapsed` is observed. The handler
    /// already stopped both; repeating the stop is harmless.
    pub fn close_gate(&mut self) {
        self.counter.stop();
        self.gate_timer.stop();
    }

    /// Gate-duration expiry. Handler context: stop the counting pair, latch
    /// and zero the counter, drop the gate line, raise the flag. Nothing in
    /// here blocks.
    pub fn on_gate_expiry(&mut self) {
        self.counter.stop();
        self.gate_timer.stop();
        self.ctx.latch(self.counter.read_count());
        self.counter.zero();
        self.gate_pin.clear();
        self.ctx.gate_elapsed.store(true, Ordering::SeqCst);
        self.ctx.set_phase(CyclePhase::GateClosedWaitingPeriod);
    }

    /// Sampling-period expiry. Handler context: flag only.
    pub fn on_period_expiry(&mut self) {
        self.ctx.period_elapsed.store(true, Ordering::SeqCst);
        self.ctx.set_phase(CyclePhase::PeriodClosed);
    }

    /// Main-loop side close of the whole cycle.
    pub fn complete(&mut self) {
        self.period_timer.stop();
        self.period_pin.clear();
        self.ctx.set_phase(CyclePhase::Idle);
    }
}
