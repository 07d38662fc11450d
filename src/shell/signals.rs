//! Msh - Signal Policy Module
//!
//! The shell ignores the interactive interrupt signal and turns the
//! interactive stop signal into a toggle of foreground-only mode, in
//! which the `&` marker is ignored. Handlers run with every other signal
//! masked and touch nothing but one atomic and one raw write.

use std::sync::atomic::{AtomicBool, Ordering};

use failure::ResultExt;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::errors::{ErrorKind, Result};

static FOREGROUND_ONLY_MODE: AtomicBool = AtomicBool::new(false);

const ENTER_NOTICE: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_NOTICE: &[u8] = b"\nExiting foreground-only mode\n";

/// Installs the shell-process dispositions: ignore the interrupt signal,
/// toggle foreground-only mode on the stop signal.
pub fn install_interpreter_dispositions() -> Result<()> {
    let ignore_action = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::all());
    let toggle_action = SigAction::new(
        SigHandler::Handler(handle_stop_signal),
        SaFlags::empty(),
        SigSet::all(),
    );

    unsafe {
        signal::sigaction(Signal::SIGINT, &ignore_action).context(ErrorKind::Nix)?;
        signal::sigaction(Signal::SIGTSTP, &toggle_action).context(ErrorKind::Nix)?;
    }

    Ok(())
}

/// Returns `true` while the background marker is being ignored.
pub fn foreground_only_mode() -> bool {
    FOREGROUND_ONLY_MODE.load(Ordering::SeqCst)
}

/// Flips the mode and returns the notice describing the transition.
fn toggle_foreground_only_mode() -> &'static [u8] {
    let was_enabled = FOREGROUND_ONLY_MODE.fetch_xor(true, Ordering::SeqCst);
    if was_enabled {
        EXIT_NOTICE
    } else {
        ENTER_NOTICE
    }
}

/// Stop-signal handler. Runs in signal-delivery context: one atomic flip
/// and one raw write, nothing else is async-signal-safe here.
extern "C" fn handle_stop_signal(_signal: libc::c_int) {
    let notice = toggle_foreground_only_mode();
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            notice.as_ptr() as *const libc::c_void,
            notice.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_round_trips_with_ordered_notices() {
        let initial = foreground_only_mode();
        let first = toggle_foreground_only_mode();
        let second = toggle_foreground_only_mode();

        assert_eq!(foreground_only_mode(), initial);
        if initial {
            assert_eq!(first, EXIT_NOTICE);
            assert_eq!(second, ENTER_NOTICE);
        } else {
            assert_eq!(first, ENTER_NOTICE);
            assert_eq!(second, EXIT_NOTICE);
        }
    }
}
