//! ABI tests for the shared nv6 types.
//!
//! The kernel writes `ProcStat` into caller-provided memory, so these
//! layouts are a wire format between separately-built binaries.

use core::mem::{align_of, offset_of, size_of};

use nv6_api::{NPROC, Priority, ProcInfo, ProcStat, ProcState};

#[test]
fn test_procinfo_layout() {
    assert_eq!(size_of::<ProcInfo>(), 32);
    assert_eq!(align_of::<ProcInfo>(), 8);
    assert_eq!(offset_of!(ProcInfo, pid), 0);
    assert_eq!(offset_of!(ProcInfo, sz), 8);
    assert_eq!(offset_of!(ProcInfo, priority), 16);
    assert_eq!(offset_of!(ProcInfo, state), 20);
    assert_eq!(offset_of!(ProcInfo, inuse), 24);
}

#[test]
fn test_procstat_layout() {
    // Records are dense: user space may index the snapshot as a flat
    // array of 32-byte entries.
    assert_eq!(size_of::<ProcStat>(), NPROC * size_of::<ProcInfo>());
    assert_eq!(align_of::<ProcStat>(), align_of::<ProcInfo>());
}

#[test]
fn test_priority_encoding_is_stable() {
    assert_eq!(Priority::Idle as u32, 0);
    assert_eq!(Priority::Low as u32, 1);
    assert_eq!(Priority::Normal as u32, 2);
    assert_eq!(Priority::High as u32, 3);
}

#[test]
fn test_state_encoding_is_stable() {
    assert_eq!(ProcState::Unused as u32, 0);
    assert_eq!(ProcState::Zombie as u32, 5);
}

#[test]
fn test_priority_rejects_all_out_of_range() {
    for n in 4..64usize {
        assert_eq!(Priority::try_from(n), Err(()));
    }
}
