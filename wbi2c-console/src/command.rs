//! Command keywords
//!
//! The console's fixed command set; exact keyword matching, nothing
//! cleverer. Unknown input is reported to the operator and never reaches
//! the bus.

/// One operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Show the command summary
    Help,
    /// Enable the Enclustra I2C bridge
    Enable,
    /// Read the EEPROM unique ID
    Id,
    /// Write the PROM word
    Write,
    /// Read the PROM word
    Read,
    /// Soft-reset the CPU
    Reset,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "help" => Some(Self::Help),
            "enable" => Some(Self::Enable),
            "id" => Some(Self::Id),
            "write" => Some(Self::Write),
            "read" => Some(Self::Read),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}
