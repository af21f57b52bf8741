//! Tick counting for the nv6 kernel fragment.
//!
//! The timer interrupt (owned by the surrounding kernel) calls [`tick`]
//! once per period; [`get_ticks`] backs the `uptime` syscall.

use core::sync::atomic::{AtomicU64, Ordering};

/// Global tick counter
static TICKS: AtomicU64 = AtomicU64::new(0);

/// Timer frequency in Hz
pub const TIMER_FREQ: u64 = 100; // 100 Hz = 10ms per tick

/// Advance the tick counter. Called from the timer interrupt path.
pub fn tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Clock tick interrupts since boot
pub fn get_ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_advance() {
        let before = get_ticks();
        tick();
        tick();
        // other tests may tick concurrently; only the lower bound holds
        assert!(get_ticks() >= before + 2);
    }
}
