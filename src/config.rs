// src/config.rs
use std::fmt::Debug;
use std::net::SocketAddr;

use thiserror::Error;

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const UPSTREAM_URL_VAR: &str = "GROQ_API_URL";
pub const BIND_ADDR_VAR: &str = "RELAY_ADDR";
pub const REQUIRE_API_KEY_VAR: &str = "RELAY_REQUIRE_API_KEY";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub bind_addr: SocketAddr,
    pub require_api_key: bool,
}

impl Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_url", &self.upstream_url)
            .field("bind_addr", &self.bind_addr)
            .field("require_api_key", &self.require_api_key)
            .finish()
    }
}

impl RelayConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// An empty credential counts as absent. Missing optional values fall back
    /// to the Groq endpoint and `0.0.0.0:3000`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let upstream_url = lookup(UPSTREAM_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: raw_addr.clone(),
        })?;

        let require_api_key = match lookup(REQUIRE_API_KEY_VAR) {
            None => false,
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid {
                var: REQUIRE_API_KEY_VAR,
                value: v,
            })?,
        };

        Ok(Self {
            api_key,
            upstream_url,
            bind_addr,
            require_api_key,
        })
    }

    /// Checks that the upstream credential is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(ConfigError::MissingApiKey(API_KEY_VAR)),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "" | "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
