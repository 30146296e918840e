//! Enclustra I2C bridge enable sequence
//!
//! On Enclustra carrier boards the I2C lines reach the peripherals
//! through a GPIO expander at 0x21; driving its IO[7] line as an output
//! switches the bridge on. The sequence writes the direction register,
//! then reads it back through the write-sub-address/repeated-start
//! pattern to confirm the expander took the value.

use wbi2c_hal::{DelayTicks, RegisterBus};

use crate::master::{Error, I2cMaster};

/// Bus address of the bridge GPIO expander
pub const BRIDGE_ADDRESS: u8 = 0x21;

/// Direction register of the expander
const DIRECTION_REGISTER: u8 = 0x01;

/// IO[7] output, IO[0..7] inputs
const DIRECTION_VALUE: u8 = 0x7F;

/// Enable the bridge and return the direction register readback.
pub fn enable_bridge<B: RegisterBus, D: DelayTicks>(
    master: &mut I2cMaster<B, D>,
) -> Result<u8, Error> {
    let written = master.write(
        BRIDGE_ADDRESS,
        &[DIRECTION_REGISTER, DIRECTION_VALUE],
        true,
    )?;
    if written < 2 {
        return Err(Error::NoAck);
    }

    // Point the expander back at the direction register, bus held open
    let written = master.write(BRIDGE_ADDRESS, &[DIRECTION_REGISTER], false)?;
    if written < 1 {
        return Err(Error::NoAck);
    }

    let mut readback = [0u8; 1];
    master.read(BRIDGE_ADDRESS, &mut readback)?;
    Ok(readback[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master::BusConfig;
    use crate::sim::{NoDelay, SimBus};

    #[test]
    fn test_enable_bridge_reads_back_direction_value() {
        let mut master = I2cMaster::new(SimBus::new(), NoDelay);
        master.configure(BusConfig::default());

        let readback = enable_bridge(&mut master).unwrap();
        assert_eq!(readback, DIRECTION_VALUE);
    }

    #[test]
    fn test_enable_bridge_without_expander_fails() {
        let mut sim = SimBus::new();
        sim.set_slaves(&[0x50]);
        let mut master = I2cMaster::new(sim, NoDelay);
        master.configure(BusConfig::default());

        assert_eq!(enable_bridge(&mut master), Err(Error::NoAck));
    }
}
