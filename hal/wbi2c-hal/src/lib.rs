//! Hardware abstraction traits for the Wishbone I2C terminal
//!
//! This crate defines the capability traits the protocol core and the
//! operator console need from their surroundings, so both can be tested
//! on the host against simulated implementations:
//!
//! - [`bus::RegisterBus`] - byte access to the bridge's register window
//! - [`delay::DelayTicks`] - calibrated busy-wait used for bus timing
//! - [`uart::UartTx`], [`uart::UartRx`] - serial console I/O
//! - [`system::SystemControl`] - capability probe and soft reset
//!
//! Hardware implementations live in `wbi2c-hal-mmio` (memory-mapped
//! register access) and in board support code; test doubles live next
//! to the code they test.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod delay;
pub mod system;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use bus::RegisterBus;
pub use delay::DelayTicks;
pub use system::SystemControl;
pub use uart::{Uart, UartRx, UartTx};
