//! Expansion of the pid sentinel.

use nix::unistd::Pid;

/// The two-character token replaced by the shell's process id.
pub const SENTINEL: &str = "$$";

/// Replaces every non-overlapping occurrence of the sentinel with the
/// decimal rendering of `pid`.
///
/// Scanning is a single left-to-right pass; a matched occurrence consumes
/// both of its characters before scanning resumes, so three consecutive
/// sentinel characters yield one substitution plus one literal character.
pub fn expand_pid(input: &str, pid: Pid) -> String {
    input.replace(SENTINEL, &pid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid() -> Pid {
        Pid::from_raw(4242)
    }

    #[test]
    fn identity_without_sentinel() {
        let input = "ls -la /tmp/$HOME money$";
        assert_eq!(expand_pid(input, pid()), input);
    }

    #[test]
    fn single_occurrence_grows_by_pid_len_minus_two() {
        let input = "echo $$ done";
        let expanded = expand_pid(input, pid());
        assert_eq!(expanded, "echo 4242 done");
        assert_eq!(expanded.len(), input.len() + pid().to_string().len() - 2);
    }

    #[test]
    fn consecutive_sentinels_do_not_overlap() {
        assert_eq!(expand_pid("$$$", pid()), "4242$");
        assert_eq!(expand_pid("$$$$", pid()), "42424242");
    }

    #[test]
    fn expands_every_occurrence() {
        assert_eq!(expand_pid("a$$b $$", pid()), "a4242b 4242");
    }
}
