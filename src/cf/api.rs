//! Cloud Controller requests tunnelled through `cf curl`

use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::runner::{CommandOutput, CommandRunner};
use super::traits::ListResponse;
use crate::error::{CfError, Result};

/// Single entry of an `errors` payload
#[derive(Deserialize, Debug, Default)]
struct ApiErrorEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// API requester on top of a [`CommandRunner`]
#[derive(Clone)]
pub struct CfApi {
    runner: Arc<dyn CommandRunner>,
}

impl CfApi {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run cf with plain arguments
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(&args).await
    }

    /// Issue a request and return the parsed JSON body
    ///
    /// A body turns the request into a POST (`cf curl -d`).
    pub async fn request(
        &self,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let url = match query {
            Some(pairs) => format!("{}?{}", path, build_query(pairs)),
            None => path.to_string(),
        };

        let mut args = vec!["curl".to_string(), url];
        if let Some(body) = body {
            args.push("-d".to_string());
            args.push(serde_json::to_string(body)?);
        }

        let output = self.runner.run(&args).await?;
        let response = parse_response(&output)?;
        check_errors(&response)?;
        Ok(response)
    }

    /// Issue a GET and parse the body into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T> {
        let raw = self.request(path, query, None).await?;
        serde_json::from_value(raw).map_err(|e| CfError::Parse(format!("{}: {}", path, e)))
    }

    /// Fetch a list and return its resources
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let response: ListResponse<T> = self.get(path, Some(query)).await?;
        Ok(response.into_resources())
    }

    /// Fetch a list and return its first resource, typed and raw
    pub async fn find_first<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<(T, serde_json::Value)>> {
        let resources: Vec<serde_json::Value> = self.list(path, query).await?;
        let Some(raw) = resources.into_iter().next() else {
            debug!("No resources at {} for {:?}", path, query);
            return Ok(None);
        };
        let item: T = serde_json::from_value(raw.clone())
            .map_err(|e| CfError::Parse(format!("{}: {}", path, e)))?;
        Ok(Some((item, raw)))
    }
}

/// Build `key=value&...` preserving order
///
/// Commas are encoded twice; cf curl otherwise splits values on them.
pub fn build_query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            let value = value.replace(',', "%2C");
            format!("{}={}", key, urlencoding::encode(&value))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Turn command output into a JSON value
fn parse_response(output: &CommandOutput) -> Result<serde_json::Value> {
    if !output.stdout.is_empty() {
        return Ok(serde_json::from_str(&output.stdout)?);
    }
    if !output.stderr.is_empty() {
        return Ok(serde_json::json!({ "errors": [{ "title": output.stderr }] }));
    }
    Ok(serde_json::json!({}))
}

/// Fail with [`CfError::Api`] when the response has a non-empty `errors` list
fn check_errors(response: &serde_json::Value) -> Result<()> {
    let Some(errors) = response.get("errors").and_then(|e| e.as_array()) else {
        return Ok(());
    };
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|raw| {
            let entry: ApiErrorEntry = serde_json::from_value(raw.clone()).unwrap_or_default();
            let code = match entry.code {
                Some(serde_json::Value::String(s)) => s,
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            format!(
                "{}: {} ({})",
                entry.title.unwrap_or_default(),
                entry.detail.unwrap_or_default(),
                code
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Err(CfError::Api(message))
}
