//! Dispatcher configuration.
//!
//! Everything here is presentation or diagnostics. Nothing in the config
//! changes which operations exist or how parameters are validated.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`DispatcherConfig::tool_name`].
pub const TOOL_NAME_ENV: &str = "KC_MCP_TOOL_NAME";
/// Environment variable enabling [`DispatcherConfig::log_params`].
pub const LOG_PARAMS_ENV: &str = "KC_MCP_LOG_PARAMS";

/// Settings for an [`OperationDispatcher`](crate::OperationDispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Name reported in the tool descriptor
    pub server_name: String,
    pub server_version: String,
    /// Name agents use to invoke the unified tool
    pub tool_name: String,
    /// Log bound parameter values at debug level, secrets masked
    pub log_params: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            server_name: "Keycloak Operations".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            tool_name: "executeKeycloakOperation".to_string(),
            log_params: false,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `KC_MCP_TOOL_NAME` and `KC_MCP_LOG_PARAMS` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(name) = lookup(TOOL_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            config.tool_name = name.trim().to_string();
        }
        if let Some(flag) = lookup(LOG_PARAMS_ENV) {
            config.log_params = parse_flag(&flag);
        }
        config
    }

    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = version.into();
        self
    }

    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = name.into();
        self
    }

    pub fn with_log_params(mut self, enabled: bool) -> Self {
        self.log_params = enabled;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
