//! Scripted command runner for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::runner::{command_line, CommandOutput, CommandRunner};
use crate::error::{CfError, Result};

/// A canned reply: stdout, stderr and exit code
#[derive(Debug, Clone)]
pub struct Reply {
    stdout: String,
    stderr: String,
    code: i32,
}

impl Reply {
    pub fn stdout(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            stderr: String::new(),
            code: 0,
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::stdout(&value.to_string())
    }

    pub fn stderr(stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            code: 0,
        }
    }

    pub fn fail(code: i32, stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            code,
        }
    }
}

/// Replies for invocations whose leading arguments start with `prefix`
struct Rule {
    prefix: Vec<String>,
    replies: VecDeque<Reply>,
}

impl Rule {
    fn matches(&self, args: &[String]) -> bool {
        args.len() >= self.prefix.len()
            && self
                .prefix
                .iter()
                .zip(args)
                .all(|(expected, actual)| actual.starts_with(expected.as_str()))
    }

    /// Pop the next reply; the last one repeats forever
    fn next_reply(&mut self) -> Reply {
        if self.replies.len() > 1 {
            self.replies.pop_front().unwrap()
        } else {
            self.replies.front().cloned().unwrap()
        }
    }
}

/// Runner answering from scripted rules and recording every call
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register replies for calls starting with `prefix`; first match wins
    pub fn on(&self, prefix: &[&str], replies: Vec<Reply>) -> &Self {
        assert!(!replies.is_empty(), "a rule needs at least one reply");
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            replies: replies.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|args| {
                args.len() >= prefix.len()
                    && prefix
                        .iter()
                        .zip(args.iter())
                        .all(|(expected, actual)| actual.starts_with(expected))
            })
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        let reply = {
            let mut rules = self.rules.lock().unwrap();
            match rules.iter_mut().find(|rule| rule.matches(args)) {
                Some(rule) => rule.next_reply(),
                None => panic!("unexpected cf invocation: {:?}", args),
            }
        };

        let output = CommandOutput::new(&reply.stdout, &reply.stderr);
        if reply.code != 0 {
            return Err(CfError::Execution {
                command: command_line("cf", args),
                stdout: output.stdout,
                stderr: output.stderr,
                status: Some(reply.code),
            });
        }
        Ok(output)
    }
}

/// Typical `cf target` output
pub const TARGET_OUTPUT: &str = "\
API endpoint:   https://api.cf.example.com
API version:    3.150.0
user:           dev@example.com
org:            my-org
space:          dev
";

/// Register replies for a logged-in cf 9 client without a usable config file
pub fn logged_in(runner: &ScriptedRunner) {
    runner
        .on(&["-v"], vec![Reply::stdout("cf version 9.1.0+abc.2024-01-01")])
        .on(&["oauth-token"], vec![Reply::stdout("bearer token-123")])
        .on(&["target"], vec![Reply::stdout(TARGET_OUTPUT)]);
}

/// Register org and space lookups resolving to `org-guid` / `space-guid`
pub fn org_and_space(runner: &ScriptedRunner) {
    runner
        .on(
            &["curl", "/v3/organizations?"],
            vec![Reply::json(serde_json::json!({
                "resources": [{"guid": "org-guid", "name": "my-org"}]
            }))],
        )
        .on(
            &["curl", "/v3/spaces?"],
            vec![Reply::json(serde_json::json!({
                "resources": [{"guid": "space-guid", "name": "dev"}]
            }))],
        );
}

/// A list response holding one resource in the given state
pub fn resource_list(guid: &str, name: &str, state: &str) -> Reply {
    Reply::json(serde_json::json!({
        "resources": [{
            "guid": guid,
            "name": name,
            "last_operation": {"type": "create", "state": state}
        }]
    }))
}

/// An empty list response
pub fn empty_list() -> Reply {
    Reply::json(serde_json::json!({"resources": []}))
}
