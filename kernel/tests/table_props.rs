//! Property tests for the process table and its syscall surface.
//!
//! Slots claimed by a property are released before its assertions run, so
//! shrinking and parallel properties cannot starve the fixed-size table.

use kernel::{process, syscall};
use nv6_api::syscall as abi;
use proptest::prelude::*;

proptest! {
    /// No out-of-range class is ever stored, whatever the raw argument.
    #[test]
    fn prop_invalid_priority_never_stored(bogus in 4usize..10_000) {
        let pid = process::alloc("prop-invalid", None).unwrap();
        let set = syscall::dispatch(abi::SYS_SETPRI, &[pid, 2]);
        let rejected = syscall::dispatch(abi::SYS_SETPRI, &[pid, bogus]);
        let got = syscall::dispatch(abi::SYS_GETPRI, &[pid]);
        process::free(pid);

        prop_assert_eq!(set, 1);
        prop_assert_eq!(rejected, -1);
        prop_assert_eq!(got, 2);
    }

    /// Read-after-write: any sequence of valid updates ends with the last
    /// one observable.
    #[test]
    fn prop_last_write_wins(classes in proptest::collection::vec(0usize..4, 1..32)) {
        let pid = process::alloc("prop-writes", None).unwrap();
        let mut all_ok = true;
        for &class in &classes {
            all_ok &= syscall::dispatch(abi::SYS_SETPRI, &[pid, class]) == 1;
        }
        let got = syscall::dispatch(abi::SYS_GETPRI, &[pid]);
        process::free(pid);

        prop_assert!(all_ok);
        prop_assert_eq!(got, *classes.last().unwrap() as isize);
    }

    /// Snapshots reflect claims and releases, and an in-use pid appears in
    /// exactly one slot.
    #[test]
    fn prop_snapshot_tracks_alloc_free(count in 1usize..8) {
        let pids: Vec<_> = (0..count)
            .map(|i| process::alloc(&format!("prop-{}", i), None).unwrap())
            .collect();

        let stat = process::snapshot();
        let each_present_once = pids.iter().all(|&pid| {
            stat.procs
                .iter()
                .filter(|e| e.inuse == 1 && e.pid == pid as u64)
                .count()
                == 1
        });

        for &pid in &pids {
            process::free(pid);
        }
        let after = process::snapshot();
        let all_gone = pids.iter().all(|&pid| {
            !after.procs.iter().any(|e| e.inuse == 1 && e.pid == pid as u64)
        });

        prop_assert!(each_present_once);
        prop_assert!(all_gone);
    }
}
