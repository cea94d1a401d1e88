//! Target resolution: CLI version, authorization, org/space lookup

use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;

use super::config_file::{config_path, read_target};
use super::models::{Organization, Space};
use super::session::CfSession;
use crate::config::{api, cf};
use crate::error::{CfError, Result};

/// Error messages naming the command that fixes the problem
pub mod messages {
    pub const API_ENDPOINT_MISSING: &str = "CF API endpoint is missing. Use 'cf login' to login.";
    pub const USER_MISSING: &str = "CF user is missing. Use 'cf login' to login.";
    pub const ORG_MISSING: &str = "CF org is missing. Use 'cf target -o <ORG>' to specify.";
    pub const SPACE_MISSING: &str = "CF space is missing. Use 'cf target -s <SPACE>' to specify.";
}

/// Where cf commands currently point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub api_endpoint: String,
    pub user: String,
    pub org: String,
    pub space: String,
}

/// Target plus the GUIDs of its org and space
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceInfo {
    #[serde(flatten)]
    pub target: Target,
    pub org_guid: String,
    pub space_guid: String,
}

/// Version reported by `cf -v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CliVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl CliVersion {
    pub fn is_supported(&self) -> bool {
        self.major >= cf::MINIMUM_VERSION
    }
}

impl std::fmt::Display for CliVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)version\D*?(\d+)\.(\d+)\.(\d+)").expect("static regex must compile")
});
static API_ENDPOINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*api endpoint[ \t]*:[ \t]*(\S+)").expect("static regex must compile")
});
static USER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*user[ \t]*:[ \t]*(.+)$").expect("static regex must compile")
});
static ORG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*org[ \t]*:[ \t]*(.+)$").expect("static regex must compile")
});
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*space[ \t]*:[ \t]*(.+)$").expect("static regex must compile")
});

/// Parse `cf version 8.7.10+5b7ce3c.2024-04-04`
pub fn parse_cli_version(output: &str) -> Option<CliVersion> {
    let caps = VERSION_RE.captures(output)?;
    Some(CliVersion {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
        patch: caps[3].parse().ok()?,
    })
}

/// First capture group of `re` in `text`, or a configuration error
fn extract(text: &str, re: &Regex, missing: &str) -> Result<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CfError::Configuration(missing.to_string()))
}

pub fn extract_api_endpoint(text: &str) -> Result<String> {
    extract(text, &API_ENDPOINT_RE, messages::API_ENDPOINT_MISSING)
}

pub fn extract_user(text: &str) -> Result<String> {
    extract(text, &USER_RE, messages::USER_MISSING)
}

pub fn extract_org(text: &str) -> Result<String> {
    extract(text, &ORG_RE, messages::ORG_MISSING)
}

pub fn extract_space(text: &str) -> Result<String> {
    extract(text, &SPACE_RE, messages::SPACE_MISSING)
}

/// Parse the output of `cf target`
pub fn parse_target_output(text: &str) -> Result<Target> {
    Ok(Target {
        api_endpoint: extract_api_endpoint(text)?,
        user: extract_user(text)?,
        org: extract_org(text)?,
        space: extract_space(text)?,
    })
}

impl CfSession {
    /// Detected cf CLI version, `None` when the output is not understood
    pub async fn cli_version(&self) -> Result<Option<CliVersion>> {
        info!("Getting cf CLI version");
        let output = self.api().run(&["-v"]).await?;
        let version = parse_cli_version(&output.stdout);
        if version.is_none() {
            debug!("Could not parse cf version from: {}", output.stdout);
        }
        Ok(version)
    }

    /// Warn (without failing) when the cf CLI is older than supported
    pub async fn check_cli_version(&self) -> Result<Option<CliVersion>> {
        let version = self.cli_version().await?;
        if let Some(v) = version.filter(|v| !v.is_supported()) {
            warn!("cf CLI version {} is below {}", v, cf::MINIMUM_VERSION);
            eprintln!(
                "\n\x1b[1;33m[Warning] You are using Cloud Foundry client version {}. \
                 We recommend version {} or higher.\x1b[0m\n\
                 Deployment will stop in the near future for Cloud Foundry client versions < {}.\n",
                v,
                cf::MINIMUM_VERSION,
                cf::MINIMUM_VERSION
            );
        }
        Ok(version)
    }

    /// Current OAuth token; fails when the user is not logged in
    pub async fn oauth_token(&self) -> Result<String> {
        info!("Getting authorization");
        let output = self.api().run(&["oauth-token"]).await?;
        Ok(output.stdout)
    }

    /// Resolve the target once per session
    ///
    /// Checks the CLI version and authorization first, then reads the cf
    /// config file, falling back to `cf target` output.
    pub async fn resolve_target(&self) -> Result<Target> {
        self.target
            .get_or_try_init(|| async {
                self.check_cli_version().await?;
                self.oauth_token().await?;

                let target = match self.target_from_config_file() {
                    Some(target) => target,
                    None => self.target_from_cli().await?,
                };
                Ok::<Target, CfError>(target)
            })
            .await
            .cloned()
    }

    fn target_from_config_file(&self) -> Option<Target> {
        let path = config_path(self.cf_home());
        info!("Getting cf target from {}", path.display());
        match read_target(&path) {
            Ok(target) => Some(target),
            Err(e) => {
                debug!("Config file not usable, falling back to 'cf target': {}", e);
                None
            }
        }
    }

    /// Target parsed from `cf target` output
    pub async fn target_from_cli(&self) -> Result<Target> {
        info!("Getting cf target from CLI");
        let output = self.api().run(&["target"]).await?;
        parse_target_output(&output.stdout)
    }

    /// Resolve target plus org and space GUIDs once per session
    pub async fn resolve_space_info(&self) -> Result<SpaceInfo> {
        self.space_info
            .get_or_try_init(|| async {
                info!("Getting space info");
                let target = self.resolve_target().await?;

                let orgs: Vec<Organization> = self
                    .api()
                    .list(api::ORGANIZATIONS, &[("names", target.org.as_str())])
                    .await?;
                let org_guid = orgs
                    .into_iter()
                    .next()
                    .map(|o| o.guid)
                    .ok_or_else(|| {
                        CfError::NotFound(format!("CF org '{}' not found!", target.org))
                    })?;

                let spaces: Vec<Space> = self
                    .api()
                    .list(
                        api::SPACES,
                        &[
                            ("names", target.space.as_str()),
                            ("organization_guids", org_guid.as_str()),
                        ],
                    )
                    .await?;
                let space_guid = spaces
                    .into_iter()
                    .next()
                    .map(|s| s.guid)
                    .ok_or_else(|| {
                        CfError::NotFound(format!(
                            "CF space '{}' not found in org '{}'!",
                            target.space, target.org
                        ))
                    })?;

                debug!("Resolved org {} / space {}", org_guid, space_guid);
                Ok::<SpaceInfo, CfError>(SpaceInfo {
                    target,
                    org_guid,
                    space_guid,
                })
            })
            .await
            .cloned()
    }
}
