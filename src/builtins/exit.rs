//! The `exit` builtin.

use crate::builtins::{self, BuiltinCommand};
use crate::errors::Result;
use crate::shell::Shell;

/// Terminate the shell immediately.
#[derive(Debug)]
pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = builtins::EXIT_NAME;

    const HELP: &'static str = "\
exit: exit
    Exit the shell immediately with a status of 0. Arguments are ignored.";

    fn run(shell: &mut Shell, _args: Vec<String>) -> Result<()> {
        shell.exit(Some(0))
    }
}
