#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::inference::{DEFAULT_ENDPOINT, DEFAULT_MODEL_ID};
use crate::core::session::DEFAULT_MAX_NEW_TOKENS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const MAX_NEW_TOKENS_LIMIT: usize = 4096;

/// 合併預設值、TOML 檔與命令列之後的最終設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub endpoint: String,
    pub model_id: String,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub max_new_tokens: usize,
    pub timeout_secs: Option<u64>,
    pub warm_up: bool,
    pub output_path: String,
    pub monitor: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_token: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            timeout_secs: None,
            warm_up: true,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            monitor: false,
        }
    }
}

impl From<&TomlConfig> for GeneratorSettings {
    fn from(file: &TomlConfig) -> Self {
        Self {
            endpoint: file.endpoint().to_string(),
            model_id: file.model_id().to_string(),
            api_token: file.api_token().map(str::to_string),
            max_new_tokens: file.max_new_tokens(),
            timeout_secs: file.timeout_secs(),
            warm_up: file.warm_up(),
            output_path: file.output_path().to_string(),
            monitor: file.monitoring_enabled(),
        }
    }
}

impl ConfigProvider for GeneratorSettings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    fn max_new_tokens(&self) -> usize {
        self.max_new_tokens
    }

    fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }

    fn warm_up(&self) -> bool {
        self.warm_up
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for GeneratorSettings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("endpoint", &self.endpoint)?;
        validate_model_id("model_id", &self.model_id)?;
        validate_range("max_new_tokens", self.max_new_tokens, 1, MAX_NEW_TOKENS_LIMIT)?;
        if let Some(timeout) = self.timeout_secs {
            validate_positive_number("timeout_secs", timeout, 1)?;
        }
        validate_path("output_path", &self.output_path)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
