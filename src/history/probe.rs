//! Subprocess-backed capabilities used by history capture.
//!
//! [`ShellProbe`] is the seam between [`super::HistorySource`] and the
//! operating system, so capture logic can be tested without spawning shells.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::trace;

use super::{parse, ShellKind};
use crate::error::{Error, Result};

/// Capabilities history capture needs from the environment.
pub trait ShellProbe {
    /// Ask the shell to list its most recent history entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be run or exits unsuccessfully.
    fn list_recent_history(
        &self,
        shell: ShellKind,
        history_file: &Path,
        limit: usize,
    ) -> Result<Vec<String>>;

    /// Whether a program name resolves to an executable on `PATH`.
    ///
    /// The program is only looked up, never run.
    fn executable_exists(&self, program: &str) -> bool;
}

/// Probe that spawns the real shell and searches `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl SystemProbe {
    /// Script loading the history file into a non-interactive shell and
    /// listing it with event numbers. `$1` is the history file, `$2` the
    /// entry limit.
    ///
    /// With `HISTFILE` unset nothing is written back on exit. With
    /// `HISTTIMEFORMAT` unset bash prints no timestamps.
    const fn listing_script(shell: ShellKind) -> &'static str {
        match shell {
            ShellKind::Zsh => r#"unset HISTFILE; HISTSIZE="$2"; fc -R "$1" && fc -l 1"#,
            ShellKind::Bash => {
                r#"unset HISTFILE HISTTIMEFORMAT; HISTSIZE="$2"; set -o history; history -r "$1" && history"#
            }
        }
    }

    fn listing_command(shell: ShellKind, history_file: &Path, limit: usize) -> Command {
        let mut cmd = Command::new(shell.program());
        match shell {
            ShellKind::Zsh => cmd.arg("-f"),
            ShellKind::Bash => cmd.args(["--norc", "--noprofile"]),
        };

        cmd.arg("-c")
            .arg(Self::listing_script(shell))
            .arg(shell.program())
            .arg(history_file)
            .arg(limit.to_string())
            .env_remove("HISTTIMEFORMAT")
            .stdin(Stdio::null());
        cmd
    }

    fn run_listing(mut cmd: Command, shell: ShellKind) -> Result<Vec<String>> {
        let output = cmd.output()?;

        if !output.status.success() {
            return Err(Error::Other(format!(
                "{} history listing exited with {}",
                shell.program(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!(shell = shell.program(), bytes = stdout.len(), "Shell history listing");

        Ok(parse::parse_listing(&stdout))
    }
}

impl ShellProbe for SystemProbe {
    fn list_recent_history(
        &self,
        shell: ShellKind,
        history_file: &Path,
        limit: usize,
    ) -> Result<Vec<String>> {
        Self::run_listing(Self::listing_command(shell, history_file, limit), shell)
    }

    fn executable_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use std::fs;
    #[cfg(unix)]
    use tempfile::TempDir;

    #[cfg(unix)]
    fn has_bash() -> bool {
        which::which("bash").is_ok()
    }

    #[cfg(unix)]
    fn bash_history(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".bash_history");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_listing_scripts_take_positional_arguments() {
        for shell in [ShellKind::Zsh, ShellKind::Bash] {
            let script = SystemProbe::listing_script(shell);
            assert!(script.contains("\"$1\""));
            assert!(script.contains("\"$2\""));
            assert!(script.starts_with("unset HISTFILE"));
        }
    }

    #[test]
    fn test_missing_executable() {
        assert!(!SystemProbe.executable_exists("definitely-not-a-real-program-9f3a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_bash_listing_keeps_newest_entries() {
        if !has_bash() {
            return;
        }
        let (_dir, path) = bash_history("a\nb\nc\nd\ne\n");

        let entries = SystemProbe
            .list_recent_history(ShellKind::Bash, &path, 3)
            .unwrap();
        assert_eq!(entries, vec!["c", "d", "e"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_bash_listing_ignores_histtimeformat() {
        if !has_bash() {
            return;
        }
        let (_dir, path) = bash_history("make build\nls -la\n");

        let mut cmd = SystemProbe::listing_command(ShellKind::Bash, &path, 10);
        cmd.env("HISTTIMEFORMAT", "%F %T ");
        let entries = SystemProbe::run_listing(cmd, ShellKind::Bash).unwrap();
        assert_eq!(entries, vec!["make build", "ls -la"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_bash_listing_leaves_history_file_untouched() {
        if !has_bash() {
            return;
        }
        let content = "#1700000000\ngit status\n#1700000001\nls -la\nmake\n";
        let (_dir, path) = bash_history(content);

        let entries = SystemProbe
            .list_recent_history(ShellKind::Bash, &path, 1)
            .unwrap();
        assert_eq!(entries, vec!["make"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}
