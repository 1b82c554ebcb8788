//! Client configuration.
//!
//! `ClientConfig` can be deserialized from any serde format or read from the
//! environment (`REST_BASE_URL`, `REST_TIMEOUT_SECS`).

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_VAR: &str = "REST_BASE_URL";
pub const TIMEOUT_VAR: &str = "REST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Headers set on every request.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headers: Vec::new(),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from a variable lookup, e.g. `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{BASE_URL_VAR} is not set")))?;

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got `{raw}`")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
            headers: Vec::new(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
