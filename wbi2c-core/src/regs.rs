//! Register map of the I2C core behind the Wishbone bridge
//!
//! The core is an OpenCores-style I2C master with five byte-wide
//! registers, word-strided on the bridge. Command and status share one
//! offset: writes carry command bits, reads carry status bits.
//!
//! All bit layouts are defined in this module only; the transaction
//! engine composes commands through the named constructors below instead
//! of spelling out bit masks at call sites.

/// Byte offsets of the core's registers within the bridge window
pub mod offset {
    /// Clock prescale, low byte
    pub const PRESCALE_LO: u8 = 0x00;
    /// Clock prescale, high byte
    pub const PRESCALE_HI: u8 = 0x04;
    /// Control (bit 7 enables the core)
    pub const CONTROL: u8 = 0x08;
    /// Data in/out (address byte and payload bytes)
    pub const DATA: u8 = 0x0C;
    /// Command on write, status on read
    pub const CMD_STAT: u8 = 0x10;
}

/// Control register: core enable bit
pub const CONTROL_ENABLE: u8 = 1 << 7;

const CMD_START: u8 = 1 << 7;
const CMD_STOP: u8 = 1 << 6;
const CMD_READ: u8 = 1 << 5;
const CMD_WRITE: u8 = 1 << 4;
const CMD_ACK_SUPPRESS: u8 = 1 << 3;
const CMD_INT_ACK: u8 = 1 << 0;

const STAT_NACK: u8 = 1 << 7;
const STAT_BUS_BUSY: u8 = 1 << 6;
const STAT_ARB_LOST: u8 = 1 << 5;
const STAT_IN_PROGRESS: u8 = 1 << 1;
const STAT_INT_PENDING: u8 = 1 << 0;

/// One write to the command register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(u8);

impl Command {
    /// Address phase: transmit the byte in DATA with a START condition
    pub const fn start_write() -> Self {
        Self(CMD_START | CMD_WRITE)
    }

    /// Transmit the byte in DATA
    pub const fn write_byte() -> Self {
        Self(CMD_WRITE)
    }

    /// Clock one byte in from the slave, acknowledging it
    pub const fn read_byte() -> Self {
        Self(CMD_READ)
    }

    /// Clock the final byte in, suppress the master ACK and issue STOP
    ///
    /// The NACK tells the slave this was the last byte; folding STOP into
    /// the same command write is required, a separate STOP afterwards
    /// leaves the slave holding the bus.
    pub const fn final_read() -> Self {
        Self(CMD_READ | CMD_ACK_SUPPRESS | CMD_STOP)
    }

    /// Release the bus with a STOP condition
    pub const fn stop() -> Self {
        Self(CMD_STOP)
    }

    /// Acknowledge a pending core interrupt (unused by the polled driver)
    pub const fn interrupt_ack() -> Self {
        Self(CMD_INT_ACK)
    }

    /// Reconstruct a command from raw register bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn has_start(self) -> bool {
        self.0 & CMD_START != 0
    }

    pub const fn has_stop(self) -> bool {
        self.0 & CMD_STOP != 0
    }

    pub const fn has_read(self) -> bool {
        self.0 & CMD_READ != 0
    }

    pub const fn has_write(self) -> bool {
        self.0 & CMD_WRITE != 0
    }

    pub const fn suppresses_ack(self) -> bool {
        self.0 & CMD_ACK_SUPPRESS != 0
    }
}

/// One read of the status register.
///
/// Transient by design: the driver reads a fresh value on every poll
/// iteration and never stores one across commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Compose a status value (used by the simulated bus)
    pub const fn compose(in_progress: bool, ack_received: bool) -> Self {
        let mut bits = 0;
        if in_progress {
            bits |= STAT_IN_PROGRESS;
        }
        if !ack_received {
            bits |= STAT_NACK;
        }
        Self(bits)
    }

    /// Whether the last command is still being clocked out
    ///
    /// The core exposes two candidate flags: bit 6 is bus-busy, asserted
    /// from START until STOP and therefore set across a whole
    /// transaction, and bit 1 is transfer-in-progress, deasserted as each
    /// command completes. Only bit 1 works as a per-command completion
    /// flag, so it is the canonical one; bit 6 is exposed read-only as
    /// [`Status::bus_busy`].
    pub const fn in_progress(self) -> bool {
        self.0 & STAT_IN_PROGRESS != 0
    }

    /// Whether the slave acknowledged the last transferred byte
    ///
    /// Inverted polarity on the wire: the bit reads 0 on ACK, 1 on NACK.
    pub const fn ack_received(self) -> bool {
        self.0 & STAT_NACK == 0
    }

    /// Bus-busy flag (set between START and STOP)
    pub const fn bus_busy(self) -> bool {
        self.0 & STAT_BUS_BUSY != 0
    }

    /// Arbitration lost (unused by this single-master driver)
    pub const fn arbitration_lost(self) -> bool {
        self.0 & STAT_ARB_LOST != 0
    }

    /// Core interrupt pending (unused by the polled driver)
    pub const fn interrupt_pending(self) -> bool {
        self.0 & STAT_INT_PENDING != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bit_layout() {
        assert_eq!(Command::start_write().bits(), 0x90);
        assert_eq!(Command::write_byte().bits(), 0x10);
        assert_eq!(Command::read_byte().bits(), 0x20);
        assert_eq!(Command::final_read().bits(), 0x20 | 0x08 | 0x40);
        assert_eq!(Command::stop().bits(), 0x40);
        assert_eq!(Command::interrupt_ack().bits(), 0x01);
    }

    #[test]
    fn test_final_read_folds_stop_and_nack() {
        let cmd = Command::final_read();
        assert!(cmd.has_read());
        assert!(cmd.has_stop());
        assert!(cmd.suppresses_ack());
        assert!(!cmd.has_start());
    }

    #[test]
    fn test_status_ack_polarity_is_inverted() {
        // Bit 7 clear means the slave acknowledged
        assert!(Status::from_bits(0x00).ack_received());
        assert!(!Status::from_bits(0x80).ack_received());
    }

    #[test]
    fn test_status_in_progress_uses_bit1() {
        assert!(Status::from_bits(0x02).in_progress());
        // Bus-busy (bit 6) alone does not mean a command is in flight
        assert!(!Status::from_bits(0x40).in_progress());
        assert!(Status::from_bits(0x40).bus_busy());
    }

    #[test]
    fn test_status_compose_roundtrip() {
        let s = Status::compose(true, false);
        assert!(s.in_progress());
        assert!(!s.ack_received());

        let s = Status::compose(false, true);
        assert!(!s.in_progress());
        assert!(s.ack_received());
    }
}
