//! Host terminal for the Wishbone I2C console
//!
//! Wires the operator console to stdin/stdout and runs it against the
//! simulated bridge, so the whole command surface can be exercised
//! without hardware. On a real board the same console runs over the
//! board UART with `wbi2c_hal_mmio::MmioRegisterBus` as the transport.
//!
//! Note that stdin is line-buffered on most terminals, so the console's
//! own echo appears after the newline rather than per keystroke.

use std::io::{Read, Write};

use wbi2c_console::Console;
use wbi2c_core::sim::{NoDelay, SimBus};
use wbi2c_core::I2cMaster;
use wbi2c_hal::{SystemControl, UartRx, UartTx};

/// Byte-wise UART receiver over stdin.
struct StdinRx {
    stdin: std::io::Stdin,
}

impl UartRx for StdinRx {
    type Error = std::io::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stdin.read_exact(buf)?;
        Ok(buf.len())
    }
}

/// UART transmitter over stdout.
struct StdoutTx {
    stdout: std::io::Stdout,
}

impl UartTx for StdoutTx {
    type Error = std::io::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.stdout.write_all(data)?;
        self.stdout.flush()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stdout.flush()
    }
}

/// Host stand-in for the platform capabilities.
struct HostSystem;

impl SystemControl for HostSystem {
    fn bus_adapter_present(&self) -> bool {
        true
    }

    fn reset(&mut self) -> ! {
        // A soft reset on the host simply ends the session
        std::process::exit(0);
    }
}

fn main() -> Result<(), std::io::Error> {
    let mut sim = SimBus::new();
    // Give the simulated EEPROM a recognizable factory ID and a stored
    // address word so `id` and `read` show something meaningful
    sim.load(wbi2c_core::eeprom::UNIQUE_ID_OFFSET, &[0x00, 0x04, 0xA3, 0x01, 0xAB, 0xCD]);
    sim.load(wbi2c_core::eeprom::PROM_WORD_OFFSET, &[0xC0, 0xA8, 0x01, 0x05]);

    let master = I2cMaster::new(sim, NoDelay);
    let tx = StdoutTx {
        stdout: std::io::stdout(),
    };
    let rx = StdinRx {
        stdin: std::io::stdin(),
    };

    let mut console = Console::new(tx, rx, master, HostSystem);
    match console.run() {
        // EOF on stdin ends the session like a dropped serial line
        Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => Ok(()),
        result => result,
    }
}
