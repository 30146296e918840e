//! EEPROM-style slave access
//!
//! EEPROM slaves address their memory through a one-byte sub-address sent
//! as the first payload byte of a write phase. Reads use the
//! repeated-start composition: write the sub-address without STOP, then
//! read with a fresh address phase while the bus is still held.
//!
//! On top of the two region operations sit the fixed access patterns the
//! terminal exposes: the 24AA025E48's factory unique ID at the top of the
//! array, and a 4-byte big-endian "PROM word" at offset 0 that boards use
//! to store a packed IP address.

use wbi2c_hal::{DelayTicks, RegisterBus};

use crate::master::{Error, I2cMaster};

/// Bus address of the UID EEPROM on the TLU
pub const EEPROM_ADDRESS: u8 = 0x50;

/// Start of the factory-programmed unique ID (24AA025E48)
pub const UNIQUE_ID_OFFSET: u8 = 0xFA;

/// Length of the factory unique ID
pub const UNIQUE_ID_LEN: usize = 6;

/// Offset of the general-purpose PROM word
pub const PROM_WORD_OFFSET: u8 = 0x00;

/// Largest payload `write_region` accepts
pub const MAX_PAYLOAD: usize = 16;

/// Client for one EEPROM-style slave, borrowing the bus master.
pub struct EepromClient<'a, B, D> {
    master: &'a mut I2cMaster<B, D>,
    address: u8,
}

impl<'a, B: RegisterBus, D: DelayTicks> EepromClient<'a, B, D> {
    pub fn new(master: &'a mut I2cMaster<B, D>, address: u8) -> Self {
        Self { master, address }
    }

    /// Read `buf.len()` bytes starting at `start_offset`.
    ///
    /// Writes the sub-address with the bus held open, then reads with a
    /// repeated start. A failed sub-address write propagates [`Error::NoAck`]
    /// without issuing any read commands.
    pub fn read_region(&mut self, start_offset: u8, buf: &mut [u8]) -> Result<(), Error> {
        let written = self.master.write(self.address, &[start_offset], false)?;
        if written < 1 {
            // The slave acknowledged its address but rejected the
            // sub-address byte; the write phase has already issued STOP
            return Err(Error::NoAck);
        }
        self.master.read(self.address, buf)
    }

    /// Write `payload` starting at `start_offset`.
    ///
    /// Sends `[start_offset] ++ payload` as one write with STOP. The
    /// returned count follows [`I2cMaster::write`]'s convention, so the
    /// sub-address byte counts toward the total and a full success
    /// returns `payload.len() + 1`.
    pub fn write_region(&mut self, start_offset: u8, payload: &[u8]) -> Result<u8, Error> {
        if payload.len() > MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge);
        }
        let mut scratch = [0u8; MAX_PAYLOAD + 1];
        scratch[0] = start_offset;
        scratch[1..=payload.len()].copy_from_slice(payload);
        self.master
            .write(self.address, &scratch[..=payload.len()], true)
    }

    /// Low 16 bits of the factory unique ID.
    pub fn read_unique_id(&mut self) -> Result<u16, Error> {
        let mut id = [0u8; UNIQUE_ID_LEN];
        self.read_region(UNIQUE_ID_OFFSET, &mut id)?;
        Ok(u16::from_be_bytes([id[4], id[5]]))
    }

    /// The 4-byte big-endian PROM word at offset 0.
    pub fn read_prom_word(&mut self) -> Result<u32, Error> {
        let mut word = [0u8; 4];
        self.read_region(PROM_WORD_OFFSET, &mut word)?;
        Ok(u32::from_be_bytes(word))
    }

    /// Store `value` as the big-endian PROM word at offset 0.
    pub fn write_prom_word(&mut self, value: u32) -> Result<u8, Error> {
        self.write_region(PROM_WORD_OFFSET, &value.to_be_bytes())
    }
}
