//! Host command execution utilities for cfgmgr daemons.
//!
//! Commands are spawned directly (no intermediate `/bin/sh`), so arguments
//! never go through shell expansion. [`shellquote`] is only used to render
//! a copy-pastable command line for logs and error messages.
//!
//! # Example
//!
//! ```ignore
//! use sriov_cfgmgr_common::shell::{self, OVS_VSCTL_CMD};
//!
//! let out = shell::run_or_fail(OVS_VSCTL_CMD, &["show"]).await?;
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{CfgMgrError, CfgMgrResult};

/// Path to the `ovs-vsctl` Open vSwitch database client.
pub const OVS_VSCTL_CMD: &str = "/usr/bin/ovs-vsctl";

/// Characters that need escaping inside shell double-quotes.
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Arguments made only of these characters are rendered unquoted.
static SHELL_SAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_./:=+,@%-]+$").expect("Invalid regex pattern"));

/// Quotes a string for safe use in a shell command line.
///
/// Wraps the string in double quotes and escapes `$`, `` ` ``, `"`, `\`
/// and newline.
///
/// ```
/// use sriov_cfgmgr_common::shell::shellquote;
///
/// assert_eq!(shellquote("simple"), "\"simple\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Renders `program` and `args` as a single command line.
///
/// Plain arguments are left as-is, anything else goes through [`shellquote`].
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if SHELL_SAFE_RE.is_match(arg) {
            line.push_str(arg);
        } else {
            line.push_str(&shellquote(arg));
        }
    }
    line
}

/// Output of a finished host command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (0 = success, -1 if killed by a signal).
    pub exit_code: i32,
    /// Trimmed stdout.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns true if the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns stdout and stderr joined, for error messages.
    pub fn combined_output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }
}

/// Runs `program` with `args` and collects its output.
///
/// Only a spawn failure is an error; a non-zero exit is reported through
/// [`CommandOutput::exit_code`].
pub async fn run(program: &str, args: &[&str]) -> CfgMgrResult<CommandOutput> {
    let line = command_line(program, args);
    tracing::debug!(command = %line, "Executing host command");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CfgMgrError::ShellExec {
            command: line.clone(),
            source: e,
        })?;

    let result = CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    if result.success() {
        tracing::trace!(command = %line, "Command succeeded");
    } else {
        tracing::warn!(
            command = %line,
            exit_code = result.exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Runs `program` and returns its stdout, failing on a non-zero exit.
pub async fn run_or_fail(program: &str, args: &[&str]) -> CfgMgrResult<String> {
    let result = run(program, args).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        Err(CfgMgrError::ShellCommandFailed {
            command: command_line(program, args),
            exit_code: result.exit_code,
            output: result.combined_output(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellquote_special_chars() {
        assert_eq!(shellquote("$HOME"), "\"\\$HOME\"");
        assert_eq!(shellquote("`whoami`"), "\"\\`whoami\\`\"");
        assert_eq!(shellquote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(shellquote("path\\to"), "\"path\\\\to\"");
        assert_eq!(shellquote(""), "\"\"");
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line(
                OVS_VSCTL_CMD,
                &["--timeout=15", "get", "Open_vSwitch", ".", "other_config:hw-offload"]
            ),
            "/usr/bin/ovs-vsctl --timeout=15 get Open_vSwitch . other_config:hw-offload"
        );
        assert_eq!(command_line("echo", &["a b", "$x"]), "echo \"a b\" \"\\$x\"");
    }

    #[test]
    fn test_combined_output() {
        let mut out = CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "error message".to_string(),
        };
        assert!(!out.success());
        assert_eq!(out.combined_output(), "error message");

        out.stdout = "stdout".to_string();
        assert_eq!(out.combined_output(), "stdout\nerror message");

        out.stderr.clear();
        assert_eq!(out.combined_output(), "stdout");
    }

    #[tokio::test]
    async fn test_run_echo() {
        let result = run("echo", &["hello"]).await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello");
    }

    #[tokio::test]
    async fn test_run_args_are_not_expanded() {
        let result = run("echo", &["$HOME"]).await.unwrap();
        assert_eq!(result.stdout, "$HOME");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let err = run("/nonexistent/ovs-vsctl", &["show"]).await.unwrap_err();
        assert!(matches!(err, CfgMgrError::ShellExec { .. }));
    }

    #[tokio::test]
    async fn test_run_or_fail_failure() {
        match run_or_fail("sh", &["-c", "echo oops >&2; exit 3"]).await {
            Err(CfgMgrError::ShellCommandFailed {
                exit_code, output, ..
            }) => {
                assert_eq!(exit_code, 3);
                assert_eq!(output, "oops");
            }
            other => panic!("Expected ShellCommandFailed error, got {:?}", other),
        }
    }
}
