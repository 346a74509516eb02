//! Configuration module
//!
//! Environment-driven settings for the engine and the HTTP client. The engine
//! itself only consumes `EngineSettings`; `EngineConfig` adds transport settings.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Common constants
const SUCCESS_STATUS: u16 = 200;
const MAX_FILE_SIZE_MB: usize = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const ALLOWED_EXTENSIONS: &str = "pdf,png,jpg,jpeg,pkpass";
const API_VERSION: &str = "v1";

/// What to do with an optimistic local delete when the remote delete call fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteFailurePolicy {
    /// Keep the local `deleted` record; the next submit proceeds without the file.
    #[default]
    KeepLocal,
    /// Restore the baseline artifact and drop the `deleted` record.
    Rollback,
}

impl Display for DeleteFailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DeleteFailurePolicy::KeepLocal => write!(f, "keep_local"),
            DeleteFailurePolicy::Rollback => write!(f, "rollback"),
        }
    }
}

impl FromStr for DeleteFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_local" => Ok(DeleteFailurePolicy::KeepLocal),
            "rollback" => Ok(DeleteFailurePolicy::Rollback),
            _ => Err(anyhow::anyhow!("Invalid delete failure policy: {}", s)),
        }
    }
}

/// How the API key is presented to the backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiAuthScheme {
    /// `Authorization: Bearer {key}`
    #[default]
    Bearer,
    /// `X-API-Key: {key}`
    ApiKey,
}

impl Display for ApiAuthScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ApiAuthScheme::Bearer => write!(f, "bearer"),
            ApiAuthScheme::ApiKey => write!(f, "api_key"),
        }
    }
}

impl FromStr for ApiAuthScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bearer" => Ok(ApiAuthScheme::Bearer),
            "api_key" | "x-api-key" => Ok(ApiAuthScheme::ApiKey),
            _ => Err(anyhow::anyhow!("Invalid API auth scheme: {}", s)),
        }
    }
}

/// Settings consumed by the slot engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSettings {
    /// Status code the submission endpoint returns on success
    pub success_status: u16,
    pub delete_failure_policy: DeleteFailurePolicy,
    /// Upper bound for pending binaries, in bytes
    pub max_file_size_bytes: usize,
    /// Accepted pending file extensions, lowercase without leading dot
    pub allowed_extensions: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            success_status: SUCCESS_STATUS,
            delete_failure_policy: DeleteFailurePolicy::default(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: split_list(ALLOWED_EXTENSIONS),
        }
    }
}

/// Full configuration: engine settings plus backend transport.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub engine: EngineSettings,
    pub api_url: String,
    pub api_key: Option<String>,
    pub api_auth: ApiAuthScheme,
    /// Path segment after `/api/`, e.g. `v1`
    pub api_version: String,
    pub request_timeout_secs: u64,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let success_status = env::var("TIXPROOF_SUCCESS_STATUS")
            .unwrap_or_else(|_| SUCCESS_STATUS.to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("TIXPROOF_SUCCESS_STATUS must be a valid status code"))?;

        let delete_failure_policy = env::var("TIXPROOF_DELETE_FAILURE_POLICY")
            .unwrap_or_else(|_| DeleteFailurePolicy::default().to_string())
            .to_lowercase()
            .parse::<DeleteFailurePolicy>()?;

        let max_file_size_bytes = env::var("TIXPROOF_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB)
            * 1024
            * 1024;

        let allowed_extensions = split_list(
            &env::var("TIXPROOF_ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| ALLOWED_EXTENSIONS.to_string()),
        );

        let api_auth = env::var("TIXPROOF_API_AUTH")
            .unwrap_or_else(|_| ApiAuthScheme::default().to_string())
            .to_lowercase()
            .parse::<ApiAuthScheme>()?;

        let config = EngineConfig {
            engine: EngineSettings {
                success_status,
                delete_failure_policy,
                max_file_size_bytes,
                allowed_extensions,
            },
            api_url: env::var("TIXPROOF_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            api_key: env::var("TIXPROOF_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok(),
            api_auth,
            api_version: env::var("TIXPROOF_API_VERSION")
                .unwrap_or_else(|_| API_VERSION.to_string()),
            request_timeout_secs: env::var("TIXPROOF_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.engine.success_status == 0 {
            return Err(anyhow::anyhow!(
                "TIXPROOF_SUCCESS_STATUS must be a non-zero status code"
            ));
        }

        if self.engine.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "TIXPROOF_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!("TIXPROOF_API_URL must be an http(s) URL"));
        }

        let version = self.api_version.trim();
        if version.is_empty() || version.contains('/') {
            return Err(anyhow::anyhow!(
                "TIXPROOF_API_VERSION must be a single path segment"
            ));
        }

        Ok(())
    }
}
