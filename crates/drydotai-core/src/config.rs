//! Client configuration.
//!
//! Each setting resolves in order: explicit value, environment variable,
//! built-in default. `DRY_AI_SERVER` overrides the server, `DRY_AI_TOKEN`
//! supplies a bearer token and `DRY_AI_VERBOSE` turns on per-call
//! confirmations in the log.

use std::time::Duration;

/// Server used when nothing else is configured
pub const DEFAULT_SERVER: &str = "https://dry.ai";

/// Environment variable overriding the server base URL
pub const ENV_SERVER_KEY: &str = "DRY_AI_SERVER";

/// Environment variable holding the bearer token
pub const ENV_TOKEN_KEY: &str = "DRY_AI_TOKEN";

/// Environment variable enabling verbose call logging
pub const ENV_VERBOSE_KEY: &str = "DRY_AI_VERBOSE";

/// Path of the CRUD API below the server root
const API_PATH: &str = "/api/crud-gpt";

const USER_AGENT: &str = concat!("drydotai-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: String,
    pub token: Option<String>,
    pub verbose: bool,
    pub user_agent: String,
    /// Per-request timeout. `None` leaves the transport default (no limit),
    /// since natural-language calls can run long on the server.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            token: None,
            verbose: false,
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Build a config from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment, a parsed file)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server = lookup(ENV_SERVER_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        let token = lookup(ENV_TOKEN_KEY).filter(|t| !t.is_empty());

        let verbose = lookup(ENV_VERBOSE_KEY)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            server,
            token,
            verbose,
            ..Self::default()
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL of the CRUD API, e.g. `https://dry.ai/api/crud-gpt`
    pub fn api_base(&self) -> String {
        format!("{}{}", self.server.trim_end_matches('/'), API_PATH)
    }
}

/// Interpret an environment flag the way shells usually spell "on"
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
