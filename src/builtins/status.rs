//! The `status` builtin.

use crate::builtins::{self, BuiltinCommand};
use crate::errors::Result;
use crate::shell::Shell;

/// Report how the last foreground command ended.
#[derive(Debug)]
pub struct Status;

impl BuiltinCommand for Status {
    const NAME: &'static str = builtins::STATUS_NAME;

    const HELP: &'static str = "\
status: status
    Print the exit value of the last foreground command, or the number of
    the signal that terminated it.";

    fn run(shell: &mut Shell, _args: Vec<String>) -> Result<()> {
        println!("{}", shell.last_status());
        Ok(())
    }
}
