//! Non-blocking collection of finished background children.
//!
//! The shell keeps no job table of its own; the operating system's
//! process table is the single source of truth, queried with wait-any
//! polls after every dispatched command.

use log::warn;
use nix::errno::Errno;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::shell::TerminationStatus;

/// Polls for finished children of any pid and reports each one, without
/// ever blocking on a child that is still running.
pub fn reap_finished_children() {
    // pid -1: poll children of any pid, not one particular job.
    let any_child = Pid::from_raw(-1);

    loop {
        match wait::waitpid(any_child, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, code)) => {
                report(pid, TerminationStatus::Exited(i32::from(code) & 0xff));
            }
            Ok(WaitStatus::Signaled(pid, sig, _)) => {
                report(pid, TerminationStatus::Signaled(sig as i32));
            }
            // No finished child remains in this poll.
            Ok(WaitStatus::StillAlive) => break,
            Ok(_) => break,
            // ECHILD: no children at all.
            Err(nix::Error::Sys(Errno::ECHILD)) => break,
            Err(nix::Error::Sys(Errno::EINTR)) => continue,
            Err(e) => {
                warn!("waitpid: {}", e);
                break;
            }
        }
    }
}

fn report(pid: Pid, status: TerminationStatus) {
    println!("Background pid {} is done: {}", pid, status);
}
