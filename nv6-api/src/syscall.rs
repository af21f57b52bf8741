//! System call numbers (xv6-compatible numbering).
//!
//! The classic table occupies 1..=21; the process-table operations this
//! kernel fragment adds are appended after it. User-space wrappers place
//! the number in the syscall register and the arguments in the argument
//! block; the kernel's dispatcher maps the number back through `SysNum`.

/// Mark a process killed.
pub const SYS_KILL: usize = 6;
/// Get the calling process's PID.
pub const SYS_GETPID: usize = 11;
/// Clock ticks since boot.
pub const SYS_UPTIME: usize = 14;
/// Set the scheduling class of a process.
pub const SYS_SETPRI: usize = 22;
/// Get the scheduling class of a process.
pub const SYS_GETPRI: usize = 23;
/// Copy a full process-table status snapshot to user space.
pub const SYS_GETPINFO: usize = 24;
