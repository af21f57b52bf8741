//! Process table management
//!
//! The single source of truth for process existence, identity, and
//! scheduling priority: one statically-allocated table of [`NPROC`] slots
//! behind one table-wide lock. Descriptor fields are only reachable
//! through the [`PROC_TABLE`] guard, so every read and write happens with
//! the lock held and every exit path releases it.
//!
//! Slot lifecycle (claim on create, release on reap) belongs to the
//! process-lifecycle subsystem; it enters through [`alloc`] and [`free`].
//! The scheduler reads and this module's accessors mutate the same table,
//! possibly from several CPUs at once.

use heapless::Vec;
use nv6_api::process::{NPROC, Pid, Priority, ProcStat, ProcState};

use crate::cpu;
use crate::sync::Mutex;

/// Maximum process name length in bytes
pub const NAME_MAX: usize = 16;

/// Process control block
pub struct Proc {
    pub pid: Pid,
    pub state: ProcState,
    pub parent: Option<Pid>,
    pub priority: Priority,
    pub killed: bool,
    /// Memory image size in bytes, grown by the VM subsystem
    pub sz: usize,
    name: Vec<u8, NAME_MAX>,
}

impl Proc {
    pub(crate) const fn new() -> Self {
        Self {
            pid: 0,
            state: ProcState::Unused,
            parent: None,
            priority: Priority::Normal,
            killed: false,
            sz: 0,
            name: Vec::new(),
        }
    }

    /// Process name for diagnostics. Empty or non-UTF-8 names render as "?".
    pub fn name(&self) -> &str {
        match core::str::from_utf8(&self.name) {
            Ok(name) if !name.is_empty() => name,
            _ => "?",
        }
    }

    fn set_name(&mut self, name: &str) {
        self.name.clear();
        // truncate to capacity; names are ASCII in practice
        let len = name.len().min(NAME_MAX);
        let _ = self.name.extend_from_slice(&name.as_bytes()[..len]);
    }
}

/// Process table: a fixed array of slots with linear-scan lookup.
///
/// Construction is crate-private: the one [`PROC_TABLE`] static is the
/// only instance, so no caller can scan or update a disconnected copy of
/// the table that the scheduler never sees.
pub struct ProcTable {
    procs: [Proc; NPROC],
    next_pid: Pid,
}

impl ProcTable {
    pub(crate) const fn const_new() -> Self {
        const INIT_PROC: Proc = Proc::new();
        Self {
            procs: [INIT_PROC; NPROC],
            next_pid: 1,
        }
    }

    /// Find an in-use process by PID.
    ///
    /// Linear scan; the unique-pid invariant makes the first match the
    /// only one. Holding the guard is what makes the scan sound - a slot
    /// cannot be reclaimed mid-scan.
    pub fn find(&mut self, pid: Pid) -> Option<&mut Proc> {
        if pid == 0 {
            return None;
        }
        self.procs
            .iter_mut()
            .find(|p| p.state.in_use() && p.pid == pid)
    }

    /// Find an in-use process by PID (immutable)
    pub fn find_ref(&self, pid: Pid) -> Option<&Proc> {
        if pid == 0 {
            return None;
        }
        self.procs
            .iter()
            .find(|p| p.state.in_use() && p.pid == pid)
    }

    /// Iterate every slot in table order, in-use or not
    pub fn iter(&self) -> impl Iterator<Item = &Proc> {
        self.procs.iter()
    }

    /// Number of in-use slots
    pub fn active(&self) -> usize {
        self.procs.iter().filter(|p| p.state.in_use()).count()
    }

    /// Claim the first unused slot for a new process.
    /// Returns `None` when the table is full.
    pub(crate) fn alloc(&mut self, name: &str, parent: Option<Pid>) -> Option<&mut Proc> {
        let slot = self
            .procs
            .iter_mut()
            .find(|p| p.state == ProcState::Unused)?;

        slot.pid = self.next_pid;
        self.next_pid += 1;
        slot.state = ProcState::Used;
        slot.parent = parent;
        slot.priority = Priority::default();
        slot.killed = false;
        slot.sz = 0;
        slot.set_name(name);
        Some(slot)
    }

    /// Return a slot to the unused pool (reap).
    pub(crate) fn free(&mut self, pid: Pid) -> bool {
        match self.find(pid) {
            Some(slot) => {
                *slot = Proc::new();
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Global State
// ============================================================================

/// Global process table - the kernel's single instance
pub static PROC_TABLE: Mutex<ProcTable> = Mutex::new(ProcTable::const_new());

/// Current process PID for each CPU (indexed by CPU ID)
static mut CURRENT_PID: [Option<Pid>; cpu::NCPU] = [None; cpu::NCPU];

static INIT_ONCE: spin::Once<()> = spin::Once::new();

// ============================================================================
// Public API
// ============================================================================

/// Initialize the process subsystem: create the init process (PID 1).
/// Safe to call more than once; only the first call takes effect.
pub fn init() {
    INIT_ONCE.call_once(|| {
        let mut table = PROC_TABLE.lock();
        if let Some(proc) = table.alloc("init", None) {
            proc.state = ProcState::Runnable;
            log::info!("process: init process created (pid={})", proc.pid);
        }
    });
}

/// Get current process PID
pub fn myproc() -> Option<Pid> {
    let cpu_id = cpu::cpuid();
    unsafe { CURRENT_PID[cpu_id] }
}

/// Set current process PID. Called by the scheduler when it switches the
/// CPU to (or away from) a process.
pub fn set_current(pid: Option<Pid>) {
    let cpu_id = cpu::cpuid();
    unsafe {
        CURRENT_PID[cpu_id] = pid;
    }
}

/// Claim a table slot for a new process (lifecycle subsystem entry).
pub fn alloc(name: &str, parent: Option<Pid>) -> Option<Pid> {
    let mut table = PROC_TABLE.lock();
    let proc = table.alloc(name, parent)?;
    let pid = proc.pid;
    log::debug!("process: allocated pid={} ({})", pid, proc.name());
    Some(pid)
}

/// Release a process slot back to the table (reap).
pub fn free(pid: Pid) -> bool {
    let mut table = PROC_TABLE.lock();
    let freed = table.free(pid);
    if freed {
        log::debug!("process: freed pid={}", pid);
    }
    freed
}

/// Mark a process killed, waking it if it sleeps.
pub fn kill(pid: Pid) -> bool {
    let mut table = PROC_TABLE.lock();
    if let Some(proc) = table.find(pid) {
        proc.killed = true;
        if proc.state == ProcState::Sleeping {
            proc.state = ProcState::Runnable;
        }
        true
    } else {
        false
    }
}

/// Set the scheduling class of `pid`. `false` if no such process - an
/// expected outcome when racing against exit/reap, not an error.
pub fn set_priority(pid: Pid, priority: Priority) -> bool {
    let mut table = PROC_TABLE.lock();
    match table.find(pid) {
        Some(proc) => {
            proc.priority = priority;
            true
        }
        None => false,
    }
}

/// Read the scheduling class of `pid`
pub fn priority(pid: Pid) -> Option<Priority> {
    let table = PROC_TABLE.lock();
    table.find_ref(pid).map(|p| p.priority)
}

/// Copy the status of every table slot into an owned snapshot.
///
/// One lock acquisition covers the whole copy: the caller observes a
/// consistent point-in-time view, never a partially-updated or
/// repeatedly-relocked one. Entries may be stale by the time the caller
/// looks - that is inherent in handing out a copy.
pub fn snapshot() -> ProcStat {
    let table = PROC_TABLE.lock();
    let mut stat = ProcStat::zeroed();
    for (info, proc) in stat.procs.iter_mut().zip(table.iter()) {
        info.inuse = proc.state.in_use() as u32;
        info.pid = proc.pid as u64;
        info.priority = proc.priority as u32;
        info.state = proc.state as u32;
        info.sz = proc.sz as u64;
    }
    stat
}
