use std::env;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    // MCU-specific flags only apply to the firmware build; the library and
    // its tests also build for the host, where none of this is wanted.
    if target.contains("avr") {
        // Configure for ATmega328P
        println!("cargo:rustc-link-arg=-mmcu=atmega328p");

        // Pass CPU frequency for timing calculations
        println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");
    }
}
