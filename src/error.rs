use std::fmt;

/// Custom error type for cf operations
#[derive(Debug)]
pub enum CfError {
    /// External command failed to start or exited non-zero
    Execution {
        command: String,
        stdout: String,
        stderr: String,
        status: Option<i32>,
    },
    /// API response carried an `errors` payload
    Api(String),
    /// Named org, space, plan or resource does not exist
    NotFound(String),
    /// Target field could not be resolved from config file or CLI
    Configuration(String),
    /// Polling gave up while the resource was still non-terminal
    Timeout(String),
    /// Resource reported a failed last operation
    RemoteFailure {
        kind: String,
        name: String,
        payload: String,
    },
    /// Output was not valid JSON
    Json(String),
    /// JSON did not have the expected shape
    Parse(String),
    /// Result could not be rendered
    Output(String),
    /// Operation was interrupted by the user
    Cancelled,
}

impl fmt::Display for CfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfError::Execution {
                command,
                stdout,
                stderr,
                status,
            } => {
                let exit = status
                    .map(|code| format!("exit code {}", code))
                    .unwrap_or_else(|| "no exit code".to_string());
                write!(f, "Command '{}' failed ({})", command, exit)?;
                let output = if stderr.is_empty() { stdout } else { stderr };
                if !output.is_empty() {
                    write!(f, ":\n{}", output)?;
                }
                Ok(())
            }
            CfError::Api(msg) => write!(f, "API error: {}", msg),
            CfError::NotFound(msg) => write!(f, "{}", msg),
            CfError::Configuration(msg) => write!(f, "{}", msg),
            CfError::Timeout(msg) => write!(f, "{}", msg),
            CfError::RemoteFailure {
                kind,
                name,
                payload,
            } => write!(
                f,
                "The returned {} '{}' reported state 'failed'.\n{}",
                kind, name, payload
            ),
            CfError::Json(msg) => write!(f, "JSON error: {}", msg),
            CfError::Parse(msg) => write!(f, "Unexpected response: {}", msg),
            CfError::Output(msg) => write!(f, "Output error: {}", msg),
            CfError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for CfError {}

impl From<serde_json::Error> for CfError {
    fn from(err: serde_json::Error) -> Self {
        CfError::Json(err.to_string())
    }
}

impl From<serde_yml::Error> for CfError {
    fn from(err: serde_yml::Error) -> Self {
        CfError::Output(err.to_string())
    }
}

/// Result type alias for cf operations
pub type Result<T> = std::result::Result<T, CfError>;
