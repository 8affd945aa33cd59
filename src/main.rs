#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use atmega328_freqmeter::config::{CPU_FREQ_HZ, UART_BAUD};
    use atmega328_freqmeter::gate::CycleContext;
    use atmega328_freqmeter::hal::gpio::{board, Input, Pin};
    use atmega328_freqmeter::hal::{
        BusyDelay, ExternalPulseCounter, GateWindowTimer, SamplePeriodTimer, Uart,
    };
    use atmega328_freqmeter::{measure, GateController};
    use avr_device::atmega328p::PORTC;

    /// Flag pair and latched count shared between the main loop and the two
    /// compare-match handlers. Handlers set, the loop clears.
    static CYCLE: CycleContext = CycleContext::new();

    type Gate = GateController<
        'static,
        SamplePeriodTimer,
        GateWindowTimer,
        ExternalPulseCounter,
        board::PeriodActivePin,
        board::GateActivePin,
    >;

    /// Handler-side controller view over the same registers as the one the
    /// main loop owns. All handles are zero-sized; only valid once `main`
    /// has run the init path.
    fn handler_gate() -> Gate {
        unsafe {
            GateController::new(
                SamplePeriodTimer::steal(),
                GateWindowTimer::steal(),
                ExternalPulseCounter::steal(),
                board::PeriodActivePin::steal(),
                board::GateActivePin::steal(),
                &CYCLE,
            )
        }
    }

    #[avr_device::entry]
    fn main() -> ! {
        let mut uart = Uart::new(UART_BAUD, CPU_FREQ_HZ);

        let period_timer = SamplePeriodTimer::init();
        let counter = ExternalPulseCounter::init();
        let gate_timer = GateWindowTimer::init();

        let period_pin = Pin::<PORTC, 1, Input>::new().into_output();
        let gate_pin = Pin::<PORTC, 0, Input>::new().into_output();

        let mut gate = GateController::new(
            period_timer,
            gate_timer,
            counter,
            period_pin,
            gate_pin,
            &CYCLE,
        );
        let mut delay = BusyDelay;

        // Timers are configured and held stopped; expiry interrupts may fire
        // only once the loop arms a cycle.
        unsafe { avr_device::interrupt::enable() };

        measure::run_forever(&mut gate, &mut uart, &mut delay, avr_device::asm::nop)
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER2_COMPA() {
        // gate window closed: latch the pulse count
        handler_gate().on_gate_expiry();
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER0_COMPA() {
        // sampling period over
        handler_gate().on_period_expiry();
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    // firmware entry point exists only for the AVR target
}
