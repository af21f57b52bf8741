//! Process types and the status-snapshot ABI.

use core::mem::{align_of, size_of};

use static_assertions::const_assert_eq;

/// Process ID type
pub type Pid = usize;

/// Maximum number of processes the kernel tracks simultaneously.
///
/// This is also the slot count of a [`ProcStat`] snapshot, so user space
/// can size its buffer without asking the kernel.
pub const NPROC: usize = 64;

/// Process lifecycle state.
///
/// Owned and transitioned by the process-lifecycle subsystem; the table
/// accessors only read it to decide whether a slot is in use.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    Unused = 0,
    Used = 1,
    Sleeping = 2,
    Runnable = 3,
    Running = 4,
    Zombie = 5,
}

impl ProcState {
    /// A slot is in use unless it is `Unused`.
    pub fn in_use(self) -> bool {
        self != ProcState::Unused
    }
}

impl TryFrom<u32> for ProcState {
    type Error = ();

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(ProcState::Unused),
            1 => Ok(ProcState::Used),
            2 => Ok(ProcState::Sleeping),
            3 => Ok(ProcState::Runnable),
            4 => Ok(ProcState::Running),
            5 => Ok(ProcState::Zombie),
            _ => Err(()),
        }
    }
}

/// Scheduling class of a process.
///
/// The scheduler understands exactly four classes, encoded 0..=3 on the
/// syscall boundary. Conversion from a raw argument goes through
/// [`TryFrom`], so an out-of-range class cannot exist past validation.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Idle = 0,
    Low = 1,
    Normal = 2,
    High = 3,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl TryFrom<usize> for Priority {
    type Error = ();

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Priority::Idle),
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Normal),
            3 => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

/// Per-slot record of a [`ProcStat`] snapshot.
///
/// Fixed-width fields only; `_pad` keeps the layout free of implicit
/// padding so the kernel never copies uninitialized bytes to user space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcInfo {
    /// Process ID, 0 for a slot that is not in use.
    pub pid: u64,
    /// Memory image size in bytes.
    pub sz: u64,
    /// Scheduling class, encoded as in [`Priority`].
    pub priority: u32,
    /// Lifecycle state, encoded as in [`ProcState`].
    pub state: u32,
    /// 1 if the slot held a process when the snapshot was taken.
    pub inuse: u32,
    pub _pad: u32,
}

impl ProcInfo {
    pub const fn zeroed() -> Self {
        Self {
            pid: 0,
            sz: 0,
            priority: 0,
            state: 0,
            inuse: 0,
            _pad: 0,
        }
    }
}

/// Point-in-time copy of the whole process table, one record per slot.
///
/// Produced by the kernel under a single table-lock acquisition and handed
/// to the caller by value: a consistent snapshot, not a live view.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcStat {
    pub procs: [ProcInfo; NPROC],
}

impl ProcStat {
    pub const fn zeroed() -> Self {
        Self {
            procs: [ProcInfo::zeroed(); NPROC],
        }
    }
}

// ABI pins: user space allocates these buffers, so the layout must not
// drift between separately-built kernel and user binaries.
const_assert_eq!(size_of::<ProcInfo>(), 32);
const_assert_eq!(align_of::<ProcInfo>(), 8);
const_assert_eq!(size_of::<ProcStat>(), 32 * NPROC);
