//! I2C bus-master protocol core for the Wishbone register bridge
//!
//! This crate turns the bridge's five register primitives into reliable
//! I2C transactions:
//!
//! - [`regs`] - register map and command/status bit layouts
//! - [`master`] - the transaction engine (address phase, byte-at-a-time
//!   transfer, ACK polling, STOP framing)
//! - [`eeprom`] - sub-address read/write composition for EEPROM slaves,
//!   unique-ID and PROM-word access patterns
//! - [`bridge`] - the Enclustra bridge enable sequence
//! - [`sim`] - simulated bridge + slave model for host-side testing
//!
//! The core is single-threaded and blocking throughout; see
//! [`master::PollPolicy`] for the polling and timeout model.

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod eeprom;
pub mod master;
pub mod regs;
pub mod sim;

pub use eeprom::EepromClient;
pub use master::{BusConfig, Error, I2cMaster, PollPolicy};
