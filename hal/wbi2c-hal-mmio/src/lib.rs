//! Memory-mapped implementations of the `wbi2c-hal` traits
//!
//! On real hardware the bridge's register window is a block of
//! memory-mapped addresses. [`MmioRegisterBus`] performs volatile word
//! accesses against a caller-supplied base address; [`SpinDelay`] is a
//! no-op spin loop matching the tick model the protocol core is
//! calibrated against.
//!
//! This is the only crate in the workspace that uses `unsafe`.

#![no_std]

use wbi2c_hal::{DelayTicks, RegisterBus};

/// Register bus over a memory-mapped window.
///
/// The bridge exposes its registers word-strided on a 32-bit bus; only
/// the low byte of each word carries register content, the upper bits
/// read back undefined and are ignored on write.
pub struct MmioRegisterBus {
    base: *mut u32,
}

impl MmioRegisterBus {
    /// Create a register bus at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the word-aligned start of the bridge's register
    /// window, mapped readable and writable for at least 0x14 bytes, and
    /// no other context may access the window while this value exists.
    pub const unsafe fn new(base: *mut u32) -> Self {
        Self { base }
    }

    fn register_ptr(&self, offset: u8) -> *mut u32 {
        // Offsets are byte addresses of word-strided registers.
        self.base.wrapping_add(offset as usize / 4)
    }
}

impl RegisterBus for MmioRegisterBus {
    fn write_register(&mut self, offset: u8, value: u8) {
        unsafe { core::ptr::write_volatile(self.register_ptr(offset), value as u32) }
    }

    fn read_register(&mut self, offset: u8) -> u8 {
        unsafe { core::ptr::read_volatile(self.register_ptr(offset)) as u8 }
    }
}

// The window is a hardware resource, not thread-local state; exclusive
// access is guaranteed by ownership of the single instance.
unsafe impl Send for MmioRegisterBus {}

/// Busy-wait delay over a spin loop.
///
/// One tick is one `spin_loop` hint; the protocol core's tick budgets
/// (poll spacing, settle time) were calibrated against this.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinDelay;

impl DelayTicks for SpinDelay {
    fn delay_ticks(&mut self, ticks: u32) {
        for _ in 0..ticks {
            core::hint::spin_loop();
        }
    }
}
