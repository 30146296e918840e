//! The operator console
//!
//! Owns the UART pair, the bus master and the platform capabilities, and
//! runs the prompt/dispatch loop. Command handlers translate between the
//! operator's text world and the protocol core; bus failures surface as
//! one-line messages and never terminate the loop.

use wbi2c_core::bridge::enable_bridge;
use wbi2c_core::eeprom::{EepromClient, EEPROM_ADDRESS};
use wbi2c_core::{BusConfig, Error, I2cMaster};
use wbi2c_hal::{DelayTicks, RegisterBus, SystemControl, UartRx, UartTx};

use crate::command::Command;
use crate::fmt::{decimal_u8, hex_u16, hex_u32, hex_u8, parse_hex_u32};
use crate::line::read_line;

const BANNER: &str = "\r\n--------------------------------------\r\n\
                      ---  I2C Wishbone Explorer Terminal  --\r\n\
                      --------------------------------------\r\n";

const PROMPT: &str = "\r\nEnter a command:> ";

const HELP_TEXT: &str = "Available commands:\r\n\
                         \x20help   - show this text\r\n\
                         \x20enable - enable I2C bridge on Enclustra\r\n\
                         \x20id     - read the E24AA025E48T unique ID\r\n\
                         \x20write  - write to the E24AA025E48T PROM area\r\n\
                         \x20read   - read from the E24AA025E48T PROM area\r\n\
                         \x20reset  - reset CPU\r\n";

/// The interactive terminal.
pub struct Console<TX, RX, B, D, S> {
    tx: TX,
    rx: RX,
    master: I2cMaster<B, D>,
    system: S,
}

impl<TX, RX, B, D, S> Console<TX, RX, B, D, S>
where
    TX: UartTx,
    RX: UartRx<Error = TX::Error>,
    B: RegisterBus,
    D: DelayTicks,
    S: SystemControl,
{
    pub fn new(tx: TX, rx: RX, master: I2cMaster<B, D>, system: S) -> Self {
        Self {
            tx,
            rx,
            master,
            system,
        }
    }

    /// Take the console apart again (used by tests to inspect state)
    pub fn into_parts(self) -> (TX, RX, I2cMaster<B, D>, S) {
        (self.tx, self.rx, self.master, self.system)
    }

    /// Banner, capability check and bus setup.
    ///
    /// Returns `false` when the Wishbone adapter is absent from the
    /// design; the register window must not be touched in that case.
    pub fn init(&mut self) -> Result<bool, TX::Error> {
        self.print(BANNER)?;
        if !self.system.bus_adapter_present() {
            self.print("Error! No Wishbone adapter synthesized!\r\n")?;
            return Ok(false);
        }
        self.print("Setting up I2C core\r\n")?;
        self.master.configure(BusConfig::default());
        self.print("Setup done.\r\n")?;
        Ok(true)
    }

    /// Run the terminal until the UART fails.
    pub fn run(&mut self) -> Result<(), TX::Error> {
        if !self.init()? {
            return Ok(());
        }
        loop {
            self.step()?;
        }
    }

    /// One prompt/read/dispatch iteration.
    pub fn step(&mut self) -> Result<(), TX::Error> {
        self.print(PROMPT)?;
        let line = read_line(&mut self.tx, &mut self.rx)?;
        if line.is_empty() {
            return Ok(());
        }
        match Command::parse(&line) {
            Some(command) => self.execute(command),
            None => self.print("Invalid command. Type 'help' to see all commands.\r\n"),
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), TX::Error> {
        match command {
            Command::Help => self.print(HELP_TEXT),
            Command::Enable => {
                self.print("Enabling I2C bridge:\r\n")?;
                match enable_bridge(&mut self.master) {
                    Ok(value) => {
                        self.print("Post RegDir: 0x")?;
                        self.print(&hex_u8(value))?;
                        self.print("\r\n")
                    }
                    Err(error) => self.report(error),
                }
            }
            Command::Id => {
                let result = EepromClient::new(&mut self.master, EEPROM_ADDRESS).read_unique_id();
                match result {
                    Ok(uid) => {
                        self.print("UID from E24AA025E48T = 0x")?;
                        self.print(&hex_u16(uid))?;
                        self.print("\r\n")
                    }
                    Err(error) => self.report(error),
                }
            }
            Command::Write => {
                self.print("Enter hexadecimal data to write to PROM: 0x")?;
                let line = read_line(&mut self.tx, &mut self.rx)?;
                let value = parse_hex_u32(&line);
                let result =
                    EepromClient::new(&mut self.master, EEPROM_ADDRESS).write_prom_word(value);
                match result {
                    Ok(_) => self.print("PROM written.\r\n"),
                    Err(error) => self.report(error),
                }
            }
            Command::Read => {
                let result = EepromClient::new(&mut self.master, EEPROM_ADDRESS).read_prom_word();
                match result {
                    Ok(word) => {
                        self.print("Data from PROM = 0x")?;
                        self.print(&hex_u32(word))?;
                        // The word's low half doubles as the host part of
                        // the board's address on the lab network
                        self.print("\r\nIP Address = 192.168.")?;
                        self.print(&decimal_u8((word >> 8) as u8))?;
                        self.print(".")?;
                        self.print(&decimal_u8(word as u8))?;
                        self.print("\r\n")
                    }
                    Err(error) => self.report(error),
                }
            }
            Command::Reset => {
                self.tx.flush()?;
                self.system.reset()
            }
        }
    }

    fn report(&mut self, error: Error) -> Result<(), TX::Error> {
        match error {
            Error::NoAck => self.print("No ACK from slave.\r\n"),
            Error::Timeout => self.print("Bus timeout.\r\n"),
            Error::PayloadTooLarge => self.print("Payload too large.\r\n"),
        }
    }

    fn print(&mut self, text: &str) -> Result<(), TX::Error> {
        self.tx.write_blocking(text.as_bytes())
    }
}
