//! Busy-wait delay abstraction
//!
//! The protocol core paces its status polling and the post-enable settle
//! time with a calibrated busy-wait rather than a real clock. The tick
//! duration is platform-defined; implementations should aim for roughly
//! one tick per CPU cycle-scale no-op so existing tick budgets carry over
//! between targets.

/// Blocking delay in calibrated ticks.
pub trait DelayTicks {
    /// Busy-wait for `ticks` ticks
    fn delay_ticks(&mut self, ticks: u32);
}

impl<T: DelayTicks + ?Sized> DelayTicks for &mut T {
    fn delay_ticks(&mut self, ticks: u32) {
        (**self).delay_ticks(ticks)
    }
}
