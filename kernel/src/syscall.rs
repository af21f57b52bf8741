//! System call dispatcher for nv6
//! Implements the process-table system calls (xv6-compatible numbering).
//!
//! Return convention: non-negative value on success, [`E_FAIL`] on
//! failure. This fragment carries no errno channel - the cause of a
//! failure is not distinguished beyond each operation's documented
//! failure conditions. Argument problems are caught before any lock is
//! taken, so a failed call never leaves the table partially updated.

use core::mem::size_of;

use nv6_api::process::{NPROC, Pid, Priority, ProcInfo, ProcStat};
use nv6_api::syscall as abi;
use static_assertions::const_assert_eq;

use crate::process;
use crate::time;

/// System call numbers handled by this fragment. The rest of the classic
/// table (fork, exec, file I/O, ...) is dispatched by the surrounding
/// kernel's modules.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysNum {
    Kill = abi::SYS_KILL,
    Getpid = abi::SYS_GETPID,
    Uptime = abi::SYS_UPTIME,
    Setpri = abi::SYS_SETPRI,
    Getpri = abi::SYS_GETPRI,
    Getpinfo = abi::SYS_GETPINFO,
}

impl TryFrom<usize> for SysNum {
    type Error = ();

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            abi::SYS_KILL => Ok(SysNum::Kill),
            abi::SYS_GETPID => Ok(SysNum::Getpid),
            abi::SYS_UPTIME => Ok(SysNum::Uptime),
            abi::SYS_SETPRI => Ok(SysNum::Setpri),
            abi::SYS_GETPRI => Ok(SysNum::Getpri),
            abi::SYS_GETPINFO => Ok(SysNum::Getpinfo),
            _ => Err(()),
        }
    }
}

/// Success return for syscalls with no payload
pub const E_OK: isize = 0;

/// Failure sentinel. Valid results of every operation here are
/// non-negative (priorities are 0..=3, pids and tick counts are
/// unsigned), so the sentinel is unambiguous.
pub const E_FAIL: isize = -1;

/// Extract `count` arguments from the raw argument block.
/// A missing argument fails the call before any kernel state is touched.
fn extract_args(args: &[usize], count: usize) -> Option<&[usize]> {
    if args.len() < count {
        None
    } else {
        Some(&args[..count])
    }
}

/// Handle a system call from trap entry
pub fn dispatch(num: usize, args: &[usize]) -> isize {
    let syscall = match SysNum::try_from(num) {
        Ok(s) => s,
        Err(_) => {
            log::warn!("syscall: unknown syscall {}", num);
            return E_FAIL;
        }
    };
    log::trace!("syscall: {:?} args={:?}", syscall, args);

    match syscall {
        SysNum::Kill => sys_kill(args),
        SysNum::Getpid => sys_getpid(),
        SysNum::Uptime => sys_uptime(),
        SysNum::Setpri => sys_setpri(args),
        SysNum::Getpri => sys_getpri(args),
        SysNum::Getpinfo => sys_getpinfo(args),
    }
}

// ============================================================================
// System call implementations
// ============================================================================

/// Set the scheduling class of a process.
/// Arguments: [pid, priority]
/// Returns: 1 on success; failure if the priority is not one of the four
/// classes or the pid names no process.
fn sys_setpri(args: &[usize]) -> isize {
    let args = match extract_args(args, 2) {
        Some(a) => a,
        None => return E_FAIL,
    };
    let pid = args[0] as Pid;
    // reject out-of-range classes without touching the table
    let priority = match Priority::try_from(args[1]) {
        Ok(p) => p,
        Err(()) => return E_FAIL,
    };

    if process::set_priority(pid, priority) {
        1
    } else {
        E_FAIL
    }
}

/// Get the scheduling class of a process.
/// Arguments: [pid]
/// Returns: the class (0..=3) - disjoint from the failure sentinel, so a
/// legitimate class 0 is distinguishable from "no such process".
fn sys_getpri(args: &[usize]) -> isize {
    let args = match extract_args(args, 1) {
        Some(a) => a,
        None => return E_FAIL,
    };

    match process::priority(args[0] as Pid) {
        Some(priority) => priority as isize,
        None => E_FAIL,
    }
}

// The user copy below writes the snapshot as one object; dense records
// are part of the ABI contract.
const_assert_eq!(size_of::<ProcStat>(), NPROC * size_of::<ProcInfo>());

/// Copy a status snapshot of the whole table to user space.
/// Arguments: [dst] - pointer to a `ProcStat` sized for the full table.
/// Returns: 0 on success; failure for a null or misaligned destination.
fn sys_getpinfo(args: &[usize]) -> isize {
    let args = match extract_args(args, 1) {
        Some(a) => a,
        None => return E_FAIL,
    };
    let dst = args[0] as *mut ProcStat;
    if dst.is_null() || !dst.is_aligned() {
        return E_FAIL;
    }

    // The accessor hands out an owned copy; only this boundary touches
    // the caller-supplied destination, and only after validating it.
    // Reachability of the destination range is the VM subsystem's check
    // on targets with paging.
    let stat = process::snapshot();
    unsafe { dst.write(stat) };
    E_OK
}

/// Get the calling process's PID. 0 when no process is current.
fn sys_getpid() -> isize {
    process::myproc().unwrap_or(0) as isize
}

/// Mark a process killed.
/// Arguments: [pid]
fn sys_kill(args: &[usize]) -> isize {
    let args = match extract_args(args, 1) {
        Some(a) => a,
        None => return E_FAIL,
    };

    if process::kill(args[0] as Pid) {
        E_OK
    } else {
        E_FAIL
    }
}

/// Clock tick interrupts since boot
fn sys_uptime() -> isize {
    time::get_ticks() as isize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysnum_roundtrip() {
        for num in [
            SysNum::Kill,
            SysNum::Getpid,
            SysNum::Uptime,
            SysNum::Setpri,
            SysNum::Getpri,
            SysNum::Getpinfo,
        ] {
            assert_eq!(SysNum::try_from(num as usize), Ok(num));
        }
    }

    #[test]
    fn test_unknown_syscall_fails() {
        assert_eq!(dispatch(0, &[]), E_FAIL);
        assert_eq!(dispatch(99, &[1, 2, 3]), E_FAIL);
        // holes in the classic table are not ours to answer either
        assert_eq!(dispatch(7, &[]), E_FAIL);
    }

    #[test]
    fn test_missing_arguments_fail() {
        assert_eq!(dispatch(abi::SYS_SETPRI, &[]), E_FAIL);
        assert_eq!(dispatch(abi::SYS_SETPRI, &[5]), E_FAIL);
        assert_eq!(dispatch(abi::SYS_GETPRI, &[]), E_FAIL);
        assert_eq!(dispatch(abi::SYS_GETPINFO, &[]), E_FAIL);
        assert_eq!(dispatch(abi::SYS_KILL, &[]), E_FAIL);
    }

    #[test]
    fn test_getpinfo_rejects_bad_destination() {
        assert_eq!(dispatch(abi::SYS_GETPINFO, &[0]), E_FAIL);
        // misaligned for ProcStat
        assert_eq!(dispatch(abi::SYS_GETPINFO, &[1]), E_FAIL);
    }

    #[test]
    fn test_extract_args_truncates() {
        assert_eq!(extract_args(&[1, 2, 3], 2), Some(&[1usize, 2][..]));
        assert_eq!(extract_args(&[1], 2), None);
        assert_eq!(extract_args(&[], 0), Some(&[][..]));
    }
}
