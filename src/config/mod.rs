mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the target service base URL.
pub const ENV_BASE_URL: &str = "HARNESS_BASE_URL";

/// Environment variable overriding the per-request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "HARNESS_TIMEOUT_SECS";

/// Environment variable pointing at an optional TOML config file.
pub const ENV_CONFIG_FILE: &str = "HARNESS_CONFIG";

const DEFAULT_BASE_URL: &str = "http://localhost:8085";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Values gathered from the environment before resolution. Kept separate
/// from resolution itself so tests can exercise the merge without touching
/// process state.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl EnvConfig {
    pub fn gather() -> Result<Self> {
        let request_timeout_secs = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => bail!("{} is not a valid number of seconds: {:?}", ENV_TIMEOUT_SECS, raw),
            },
            Err(_) => None,
        };
        Ok(Self {
            base_url: std::env::var(ENV_BASE_URL).ok(),
            request_timeout_secs,
        })
    }
}

/// Resolved harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the service under test, without a trailing path.
    pub base_url: String,
    /// Fixed timeout applied to every request. Expiry is a fatal transport
    /// error for the current test, never a retry trigger.
    pub request_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HarnessConfig {
    /// Merges defaults, environment values, and an optional TOML file.
    /// File values override environment values where present.
    pub fn resolve(env: &EnvConfig, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let base_url = file
            .base_url
            .or_else(|| env.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("base_url must be an http(s) URL: {:?}", base_url);
        }

        let timeout_secs = file
            .request_timeout_secs
            .or(env.request_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Resolves from the process environment, loading the TOML file named
    /// by `HARNESS_CONFIG` when set.
    pub fn from_env() -> Result<Self> {
        let env = EnvConfig::gather()?;
        let file = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => Some(FileConfig::load(Path::new(&path))?),
            Err(_) => None,
        };
        Self::resolve(&env, file)
    }
}
