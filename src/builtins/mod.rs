//! Msh builtins
//!
//! This module includes the implementations of the shell builtin
//! commands. Builtins run inside the shell process itself: they never
//! fork, ignore redirection and the background marker, and leave the
//! last foreground status untouched.

use crate::errors::Result;
use crate::shell::Shell;

use self::cd::Cd;
use self::exit::Exit;
use self::status::Status;

mod cd;
mod exit;
mod status;

const CD_NAME: &str = "cd";
const EXIT_NAME: &str = "exit";
const STATUS_NAME: &str = "status";

/// Represents a builtin command such as cd or status.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// The help string to display to the user.
    const HELP: &'static str;
    /// The usage string to display to the user.
    fn usage() -> String {
        Self::HELP.lines().nth(0).unwrap().to_owned()
    }
    /// Runs the command with the given arguments in the `shell` environment.
    fn run(shell: &mut Shell, args: Vec<String>) -> Result<()>;
}

/// Is the command name a shell builtin?
pub fn is_builtin<T: AsRef<str>>(argv: &[T]) -> bool {
    [CD_NAME, EXIT_NAME, STATUS_NAME].contains(&(program(argv).as_str()))
}

/// Runs the builtin named by `argv[0]`.
///
/// precondition: the command is a builtin.
pub fn run<T: AsRef<str>>(shell: &mut Shell, argv: &[T]) -> Result<()> {
    assert!(is_builtin(argv));
    match &*program(argv) {
        CD_NAME => Cd::run(shell, args(argv)),
        EXIT_NAME => Exit::run(shell, args(argv)),
        STATUS_NAME => Status::run(shell, args(argv)),
        _ => unreachable!(),
    }
}

fn program<T: AsRef<str>>(argv: &[T]) -> String {
    argv[0].as_ref().to_string()
}

fn args<T: AsRef<str>>(argv: &[T]) -> Vec<String> {
    argv[1..].iter().map(|s| s.as_ref().to_string()).collect()
}
