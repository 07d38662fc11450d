//! Process creation for external commands.
//!
//! Everything the child must do between fork and exec — signal
//! dispositions, redirection, image replacement — is captured in a
//! `ChildPlan` built before the fork, so the parent only ever sees the
//! child as an opaque pid.

use std::ffi::CString;
use std::os::unix::io::RawFd;
use std::path::Path;
use std::process;
use std::result;

use failure::{Fail, ResultExt};
use log::debug;
use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use crate::core::parser::Command;
use crate::errors::{ErrorKind, Result};
use crate::shell::{signals, Shell, TerminationStatus};

const CHILD_FAILURE_EXIT_CODE: i32 = 1;
const DEV_NULL: &str = "/dev/null";

/// Runs an external command: blocks until termination for foreground
/// commands, prints the start notice and returns immediately for
/// background ones.
pub fn execute(shell: &mut Shell, command: &Command) -> Result<()> {
    let run_in_background = command.background && !signals::foreground_only_mode();
    let plan = ChildPlan::new(shell, command, run_in_background)?;

    debug!("spawning external command: {:?}", command.argv);
    match unistd::fork() {
        Ok(ForkResult::Child) => plan.exec(),
        Ok(ForkResult::Parent { child }) => {
            if run_in_background {
                println!("Background pid is {}", child);
            } else {
                let status = wait_for_process(child)?;
                if let TerminationStatus::Signaled(_) = status {
                    println!("{}", status);
                }
                shell.set_last_status(status);
            }
            Ok(())
        }
        Err(e) => {
            // Process-creation failure is unrecoverable; the whole shell
            // goes down with it.
            eprintln!("msh: fork: {}", e);
            process::exit(CHILD_FAILURE_EXIT_CODE);
        }
    }
}

/// The child side of a launch, applied between fork and exec, in order:
/// signal dispositions, input redirect, output redirect, image
/// replacement.
#[derive(Debug)]
struct ChildPlan {
    argv: Vec<CString>,
    stdin: Option<String>,
    stdout: Option<String>,
    background: bool,
    restore_default_interrupt: bool,
    reset_stop_signal: bool,
}

impl ChildPlan {
    /// Builds the plan in the parent so that argument conversion failures
    /// surface as ordinary errors before any process is created.
    fn new(shell: &Shell, command: &Command, run_in_background: bool) -> Result<ChildPlan> {
        let argv = command
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<result::Result<Vec<_>, _>>()
            .context(ErrorKind::Io)?;

        Ok(ChildPlan {
            argv,
            stdin: command.stdin.clone(),
            stdout: command.stdout.clone(),
            background: command.background,
            restore_default_interrupt: !run_in_background,
            reset_stop_signal: shell.config.reset_stop_signal_in_children,
        })
    }

    /// Runs in the forked child and never returns: every failure path
    /// reports to stderr and exits the child with code 1.
    fn exec(&self) -> ! {
        self.apply_signal_dispositions();
        self.redirect_stdin();
        self.redirect_stdout();

        let program = &self.argv[0];
        if let Err(e) = unistd::execvp(program, &self.argv) {
            let diagnostic = match e {
                nix::Error::Sys(Errno::ENOENT) => "command not found".to_string(),
                nix::Error::Sys(Errno::EACCES) => "permission denied".to_string(),
                other => other.to_string(),
            };
            child_failure(&format!("{}: {}", program.to_string_lossy(), diagnostic));
        }
        unreachable!();
    }

    fn apply_signal_dispositions(&self) {
        // signal(3) failing here is programmer error (bad signal number).
        let default_action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        unsafe {
            if self.restore_default_interrupt {
                signal::sigaction(Signal::SIGINT, &default_action)
                    .expect("failed to reset SIGINT disposition");
            }
            if self.reset_stop_signal {
                signal::sigaction(Signal::SIGTSTP, &default_action)
                    .expect("failed to reset SIGTSTP disposition");
            }
        }
    }

    fn redirect_stdin(&self) {
        if let Some(ref path) = self.stdin {
            match fcntl::open(Path::new(path), OFlag::O_RDONLY, Mode::empty()) {
                Ok(fd) => redirect_descriptor(fd, libc::STDIN_FILENO),
                Err(e) => child_failure(&format!("Input Error: {}: {}", path, e)),
            }
        } else if self.background {
            // Background children read end-of-file instead of the terminal.
            if let Ok(fd) = fcntl::open(Path::new(DEV_NULL), OFlag::O_RDONLY, Mode::empty()) {
                redirect_descriptor(fd, libc::STDIN_FILENO);
            }
        }
    }

    fn redirect_stdout(&self) {
        if let Some(ref path) = self.stdout {
            let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
            match fcntl::open(Path::new(path), flags, Mode::from_bits_truncate(0o644)) {
                Ok(fd) => redirect_descriptor(fd, libc::STDOUT_FILENO),
                Err(e) => child_failure(&format!("Output Error: {}: {}", path, e)),
            }
        } else if self.background {
            if let Ok(fd) = fcntl::open(Path::new(DEV_NULL), OFlag::O_WRONLY, Mode::empty()) {
                redirect_descriptor(fd, libc::STDOUT_FILENO);
            }
        }
    }
}

/// Duplicates `fd` onto `target` and closes the original, so the child
/// holds no descriptor beyond the standard ones at exec time.
fn redirect_descriptor(fd: RawFd, target: RawFd) {
    // dup2/close failing on a freshly opened descriptor is programmer error.
    unistd::dup2(fd, target).expect("failed to duplicate descriptor");
    unistd::close(fd).expect("failed to close descriptor");
}

/// Reports a child-side failure and exits the child with code 1.
fn child_failure(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(CHILD_FAILURE_EXIT_CODE);
}

/// Blocks until the given child terminates, retrying when a signal
/// interrupts the wait.
fn wait_for_process(pid: Pid) -> Result<TerminationStatus> {
    loop {
        match wait::waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                // Exit codes are one byte; normalize the sign the raw wait
                // encoding may carry.
                return Ok(TerminationStatus::Exited(i32::from(code) & 0xff));
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                return Ok(TerminationStatus::Signaled(sig as i32));
            }
            Ok(_) => continue,
            Err(nix::Error::Sys(Errno::EINTR)) => continue,
            Err(e) => return Err(e.context(ErrorKind::Nix).into()),
        }
    }
}
