//! Operator console for the Wishbone I2C terminal
//!
//! Everything between the UART and the protocol core: bounded line input
//! with echo, keyword dispatch, text formatting, and the command handlers
//! that drive [`wbi2c_core`]. The console is generic over the HAL traits,
//! so it runs unchanged on hardware and against the simulated bus.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod console;
pub mod fmt;
pub mod line;

pub use command::Command;
pub use console::Console;
