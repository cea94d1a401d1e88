//! Execution of the external cf binary

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::error::{CfError, Result};

/// Trimmed output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Build output from raw streams, trimming both
    pub fn new(stdout: &str, stderr: &str) -> Self {
        Self {
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Something that can run cf with a list of arguments
///
/// Implementations must fail with [`CfError::Execution`] when the command
/// cannot be started or exits non-zero.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<CommandOutput>;
}

/// Runs the real cf executable
pub struct CfCli {
    binary: String,
}

impl CfCli {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for CfCli {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let cmd_line = command_line(&self.binary, args);
        debug!(">>> {}", cmd_line);
        let started = Instant::now();

        // Arguments are passed as a vector, so every entry reaches cf as one token.
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CfError::Execution {
                command: cmd_line.clone(),
                stdout: String::new(),
                stderr: format!("Failed to start '{}': {}", self.binary, e),
                status: None,
            })?;

        debug!("{}: {:?}", cmd_line, started.elapsed());

        let result = CommandOutput::new(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        );

        if !output.status.success() {
            return Err(CfError::Execution {
                command: cmd_line,
                stdout: result.stdout,
                stderr: result.stderr,
                status: output.status.code(),
            });
        }

        Ok(result)
    }
}

/// Quote a single argument, escaping characters a POSIX shell would expand
/// inside double quotes
pub fn quote_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Render the full command line with every argument quoted
pub fn command_line(binary: &str, args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|a| quote_arg(a)).collect();
    if quoted.is_empty() {
        binary.to_string()
    } else {
        format!("{} {}", binary, quoted.join(" "))
    }
}
