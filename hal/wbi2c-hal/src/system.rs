//! System bootstrap and reset capabilities
//!
//! The terminal needs two things from the platform beyond the bus and the
//! UART: a way to check that the Wishbone adapter was actually synthesized
//! into the design before touching its registers, and a way to restart the
//! CPU on operator request.

/// Platform capability probe and soft reset.
pub trait SystemControl {
    /// Whether the Wishbone bus adapter is present in this design
    ///
    /// Touching the register window when the adapter is absent is
    /// undefined; callers must check this before any bus operation.
    fn bus_adapter_present(&self) -> bool;

    /// Restart the CPU. Does not return.
    fn reset(&mut self) -> !;
}
