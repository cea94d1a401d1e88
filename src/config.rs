/// Configuration constants for the external cf binary
pub mod cf {
    /// Default executable name
    pub const BINARY: &str = "cf";

    /// Lowest major version that is not warned about
    pub const MINIMUM_VERSION: u32 = 9;

    /// Environment variables pointing at the CF home directory (checked in order)
    pub const HOME_ENV_VARS: &[&str] = &["CF_HOME", "cf_home"];

    /// Directory below CF home holding the config file
    pub const CONFIG_DIR: &str = ".cf";

    /// Config file name
    pub const CONFIG_FILE: &str = "config.json";

    /// Environment variable overriding the binary path
    pub const BINARY_ENV_VAR: &str = "CFCTL_CF_BIN";
}

/// Cloud Controller v3 endpoints
pub mod api {
    pub const ORGANIZATIONS: &str = "/v3/organizations";
    pub const SPACES: &str = "/v3/spaces";
    pub const SERVICE_PLANS: &str = "/v3/service_plans";
    pub const SERVICE_INSTANCES: &str = "/v3/service_instances";
    pub const SERVICE_CREDENTIAL_BINDINGS: &str = "/v3/service_credential_bindings";
}

/// Polling defaults for asynchronous operations
pub mod poll {
    /// Polls per pass before giving up
    pub const MAX_ATTEMPTS: u32 = 40;

    /// Delay between polls in milliseconds
    pub const DELAY_MS: u64 = 2500;

    /// Suffix appended to the instance name for its service key
    pub const KEY_SUFFIX: &str = "-key";
}

/// Logger presets
pub mod logging {
    /// Environment variable selecting the preset
    pub const ENV_VAR: &str = "CFCTL_ENV";

    /// Service name attached to production log records
    pub const SERVICE_NAME: &str = "cfctl";

    /// Timestamp format of the development preset
    pub const DEV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "info";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths_are_v3() {
        for path in [
            api::ORGANIZATIONS,
            api::SPACES,
            api::SERVICE_PLANS,
            api::SERVICE_INSTANCES,
            api::SERVICE_CREDENTIAL_BINDINGS,
        ] {
            assert!(path.starts_with("/v3/"));
        }
    }

    #[test]
    fn test_home_env_vars_order() {
        assert_eq!(cf::HOME_ENV_VARS, &["CF_HOME", "cf_home"]);
    }

    #[test]
    fn test_poll_budget() {
        assert_eq!(poll::MAX_ATTEMPTS, 40);
        assert_eq!(poll::DELAY_MS, 2500);
    }
}
