// Synchronization primitives for the nv6 kernel
// Provides RawSpinLock and Mutex with RAII guards.
//
// SMP-safe: acquire/release orderings, plus interrupt masking while a
// Mutex is held so a timer interrupt on the holding CPU cannot deadlock
// against its own lock. Critical sections never suspend; holders spin.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::cpu;

// ============================================================================
// Interrupt control
// ============================================================================

#[cfg(feature = "baremetal")]
mod intr {
    /// Check if interrupts are enabled on this CPU
    #[inline]
    pub fn enabled() -> bool {
        #[cfg(target_arch = "riscv64")]
        unsafe {
            let sstatus: usize;
            core::arch::asm!("csrr {}, sstatus", out(reg) sstatus);
            (sstatus & 0x2) != 0 // SIE bit
        }

        #[cfg(target_arch = "aarch64")]
        unsafe {
            let daif: u64;
            core::arch::asm!("mrs {}, daif", out(reg) daif);
            (daif & 0x80) == 0 // IRQ not masked
        }

        #[cfg(target_arch = "x86_64")]
        unsafe {
            let flags: u64;
            core::arch::asm!("pushfq; pop {}", out(reg) flags);
            (flags & 0x200) != 0 // IF flag
        }
    }

    /// Disable interrupts
    #[inline]
    pub fn disable() {
        #[cfg(target_arch = "riscv64")]
        unsafe {
            core::arch::asm!("csrc sstatus, {}", in(reg) 0x2usize); // Clear SIE
        }

        #[cfg(target_arch = "aarch64")]
        unsafe {
            core::arch::asm!("msr daifset, #2"); // Mask IRQ
        }

        #[cfg(target_arch = "x86_64")]
        unsafe {
            core::arch::asm!("cli");
        }
    }

    /// Enable interrupts
    #[inline]
    pub fn enable() {
        #[cfg(target_arch = "riscv64")]
        unsafe {
            core::arch::asm!("csrs sstatus, {}", in(reg) 0x2usize); // Set SIE
        }

        #[cfg(target_arch = "aarch64")]
        unsafe {
            core::arch::asm!("msr daifclr, #2"); // Unmask IRQ
        }

        #[cfg(target_arch = "x86_64")]
        unsafe {
            core::arch::asm!("sti");
        }
    }
}

#[cfg(not(feature = "baremetal"))]
mod intr {
    // Hosted builds have no interrupt state to mask.
    #[inline]
    pub fn enabled() -> bool {
        false
    }

    #[inline]
    pub fn disable() {}

    #[inline]
    pub fn enable() {}
}

/// Disable interrupts and return the previous interrupt state
#[inline]
pub fn push_off() -> bool {
    let was_enabled = intr::enabled();
    intr::disable();
    was_enabled
}

/// Restore the interrupt state saved by [`push_off`]
#[inline]
pub fn pop_off(was_enabled: bool) {
    if was_enabled {
        intr::enable();
    }
}

// ============================================================================
// RawSpinLock
// ============================================================================

/// Raw test-and-set spinlock.
///
/// Tracks the owning CPU for diagnostics; callers that need interrupt
/// masking bracket their acquisition with [`push_off`]/[`pop_off`] (the
/// [`Mutex`] guard does this).
pub struct RawSpinLock {
    locked: AtomicBool,
    // owning CPU ID + 1, so 0 means unowned
    owner_cpu: AtomicUsize,
}

impl RawSpinLock {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
            owner_cpu: AtomicUsize::new(0),
        }
    }

    /// Spin until the lock is acquired
    pub fn lock(&self) {
        while self.locked.swap(true, Ordering::Acquire) {
            core::hint::spin_loop();
        }
        self.owner_cpu.store(cpu::cpuid() + 1, Ordering::Relaxed);
    }

    /// Release the lock
    pub fn unlock(&self) {
        self.owner_cpu.store(0, Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
    }

    /// Acquire the lock if it is free
    pub fn try_lock(&self) -> bool {
        if !self.locked.swap(true, Ordering::Acquire) {
            self.owner_cpu.store(cpu::cpuid() + 1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Check if the lock is currently held
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Check if the current CPU is holding the lock.
    ///
    /// Acquiring a lock this CPU already holds spins forever; embedding
    /// code can assert `!holding()` before nested acquisitions.
    pub fn holding(&self) -> bool {
        self.is_locked() && self.owner_cpu.load(Ordering::Relaxed) == cpu::cpuid() + 1
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Mutex<T> - Spinlock protecting data with RAII guard
// ============================================================================

/// A mutual exclusion primitive protecting data of type T.
///
/// The protected data is only reachable through a [`MutexGuard`], so every
/// exit path - early returns included - releases the lock when the guard
/// drops. Interrupts are masked for the lifetime of the guard.
pub struct Mutex<T: ?Sized> {
    lock: RawSpinLock,
    data: UnsafeCell<T>,
}

// Safety: Mutex provides synchronized access
unsafe impl<T: ?Sized + Send> Sync for Mutex<T> {}
unsafe impl<T: ?Sized + Send> Send for Mutex<T> {}

impl<T> Mutex<T> {
    /// Creates a new mutex protecting the given data
    pub const fn new(data: T) -> Self {
        Self {
            lock: RawSpinLock::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// Consumes the mutex and returns the inner data
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Acquires the mutex, spinning until available
    pub fn lock(&self) -> MutexGuard<'_, T> {
        let intena = push_off();
        self.lock.lock();
        MutexGuard { mutex: self, intena }
    }

    /// Attempts to acquire the mutex without spinning
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        let intena = push_off();
        if self.lock.try_lock() {
            Some(MutexGuard { mutex: self, intena })
        } else {
            pop_off(intena);
            None
        }
    }

    /// Returns a mutable reference to the underlying data.
    /// Safe because `&mut self` proves there are no guards.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Check if the mutex is currently locked
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Check if the current CPU is holding the mutex
    pub fn holding(&self) -> bool {
        self.lock.holding()
    }
}

impl<T: ?Sized + Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

/// RAII guard for [`Mutex`]
pub struct MutexGuard<'a, T: ?Sized> {
    mutex: &'a Mutex<T>,
    // interrupt state to restore on release
    intena: bool,
}

impl<T: ?Sized> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: We hold the lock
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T: ?Sized> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: We hold the lock exclusively
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T: ?Sized> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.lock.unlock();
        pop_off(self.intena);
    }
}
