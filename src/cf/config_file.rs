//! Reading the cf CLI's own config file (`~/.cf/config.json`)

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use log::debug;
use serde::Deserialize;

use super::target::{messages, Target};
use crate::config::cf;
use crate::error::{CfError, Result};

/// Subset of the cf config file we care about
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct CfConfig {
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    organization_fields: Option<NamedFields>,
    #[serde(default)]
    space_fields: Option<NamedFields>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct NamedFields {
    #[serde(default)]
    name: Option<String>,
}

/// Claims of the UAA access token that identify the user
#[derive(Deserialize, Debug)]
struct TokenClaims {
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Resolve the CF home directory:
/// 1. CF_HOME / cf_home environment variables (in order)
/// 2. The user's home directory
pub fn resolve_cf_home() -> PathBuf {
    for env_var in cf::HOME_ENV_VARS {
        if let Ok(home) = std::env::var(env_var) {
            if !home.is_empty() {
                debug!("Using CF home from {}: {}", env_var, home);
                return PathBuf::from(home);
            }
        }
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Path of the config file below a CF home directory
pub fn config_path(cf_home: &Path) -> PathBuf {
    cf_home.join(cf::CONFIG_DIR).join(cf::CONFIG_FILE)
}

/// Read the target from the config file
///
/// Any problem (missing file, bad JSON, missing field) is an error; the
/// caller falls back to `cf target`.
pub fn read_target(path: &Path) -> Result<Target> {
    let content = fs::read_to_string(path).map_err(|e| {
        CfError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let config: CfConfig = serde_json::from_str(&content).map_err(|e| {
        CfError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    let org = config.organization_fields.unwrap_or_default().name;
    let space = config.space_fields.unwrap_or_default().name;

    Ok(Target {
        api_endpoint: required(config.target, messages::API_ENDPOINT_MISSING)?,
        user: required(
            config.access_token.as_deref().and_then(user_from_token),
            messages::USER_MISSING,
        )?,
        org: required(org, messages::ORG_MISSING)?,
        space: required(space, messages::SPACE_MISSING)?,
    })
}

fn required(value: Option<String>, missing: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CfError::Configuration(missing.to_string()))
}

/// Extract the user name from a `bearer <jwt>` access token
pub fn user_from_token(token: &str) -> Option<String> {
    let jwt = token
        .trim()
        .strip_prefix("bearer ")
        .or_else(|| token.trim().strip_prefix("Bearer "))
        .unwrap_or(token.trim());
    let payload = jwt.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.user_name.or(claims.email)
}
