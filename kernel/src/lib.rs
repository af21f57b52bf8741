//! NV6 Kernel Fragment
//!
//! The process-table subsystem of a teaching kernel's syscall layer:
//! a fixed-capacity process table behind a single table-wide spinlock,
//! and the system calls that query and update it while the scheduler and
//! other CPUs touch the same table concurrently.
//!
//! # Architecture
//!
//! - **Synchronization** (`sync`): spinlock and data-carrying mutex with
//!   RAII guards and interrupt masking
//! - **CPU** (`cpu`): CPU identity for per-CPU state and lock diagnostics
//! - **Time** (`time`): global tick counter fed by the timer interrupt
//! - **Process Management** (`process`): the process table, its accessor
//!   functions, and the slot claim/release contract used by the
//!   lifecycle subsystem
//! - **System Calls** (`syscall`): argument validation, dispatch, and the
//!   integer return convention
//!
//! Process creation/destruction beyond slot claim/release, virtual-memory
//! growth, sleep/wake scheduling, and trap entry live in the surrounding
//! kernel; this crate only defines how the table they all share is
//! accessed safely.

#![cfg_attr(not(test), no_std)]

/// CPU identity and per-CPU constants
pub mod cpu;

/// Process table and accessors
pub mod process;

/// Synchronization primitives
pub mod sync;

/// System call dispatch
pub mod syscall;

/// Tick counting
pub mod time;
