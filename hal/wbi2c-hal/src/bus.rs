//! Register bus abstraction
//!
//! The I2C core is reached through a small window of byte-wide registers
//! exposed by a Wishbone-style bridge. This trait is the protocol core's
//! only view of that window, which keeps the transaction engine testable
//! against a simulated slave model.

/// Byte-wide access to the bridge's register window.
///
/// Offsets are byte addresses relative to the start of the window; the
/// bridge strides registers on word boundaries, so valid offsets are
/// multiples of four.
pub trait RegisterBus {
    /// Write one byte to the register at `offset`
    fn write_register(&mut self, offset: u8, value: u8);

    /// Read one byte from the register at `offset`
    fn read_register(&mut self, offset: u8) -> u8;
}

// Allow passing a bus by mutable reference without giving up ownership.
impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn write_register(&mut self, offset: u8, value: u8) {
        (**self).write_register(offset, value)
    }

    fn read_register(&mut self, offset: u8) -> u8 {
        (**self).read_register(offset)
    }
}
