//! Serial console I/O traits
//!
//! The console talks to its operator one byte at a time: keystrokes are
//! echoed as they arrive and responses go out as short text lines. These
//! traits capture exactly that blocking, byte-level surface, so a board
//! UART and the host terminal's stdin/stdout adapters fit behind the
//! same console code.

/// Transmit side of the console UART.
pub trait UartTx {
    /// Transmit failure reported by the implementation
    type Error;

    /// Send `data`, blocking until the last byte has been accepted
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Push out anything the implementation has buffered
    ///
    /// Called before a CPU reset so pending output is not lost.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Receive side of the console UART.
pub trait UartRx {
    /// Receive failure reported by the implementation
    type Error;

    /// Fill `buf`, blocking until every byte has arrived
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Block for the next single byte; the line reader's input path
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_blocking(&mut buf)?;
        Ok(buf[0])
    }
}

/// Both directions on one peripheral.
pub trait Uart: UartTx + UartRx {}

impl<T: UartTx + UartRx> Uart for T {}
