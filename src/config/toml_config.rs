use crate::adapters::inference::{DEFAULT_ENDPOINT, DEFAULT_MODEL_ID};
use crate::config::{DEFAULT_OUTPUT_PATH, MAX_NEW_TOKENS_LIMIT};
use crate::core::session::DEFAULT_MAX_NEW_TOKENS;
use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub endpoint: Option<String>,
    pub model_id: Option<String>,
    pub api_token: Option<String>,
    pub max_new_tokens: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub warm_up: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR_NAME}；未設定的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(endpoint) = &self.model.endpoint {
            validate_url("model.endpoint", endpoint)?;
        }

        if let Some(model_id) = &self.model.model_id {
            validate_model_id("model.model_id", model_id)?;
        }

        if let Some(max_new_tokens) = self.model.max_new_tokens {
            validate_range("model.max_new_tokens", max_new_tokens, 1, MAX_NEW_TOKENS_LIMIT)?;
        }

        if let Some(timeout) = self.model.timeout_secs {
            validate_positive_number("model.timeout_secs", timeout, 1)?;
        }

        if let Some(output_path) = &self.export.output_path {
            validate_path("export.output_path", output_path)?;
        }

        // 未替換的 ${VAR} 代表環境變數沒設定
        if let Some(token) = &self.model.api_token {
            if token.starts_with("${") {
                return Err(AppError::MissingConfigError {
                    field: format!("model.api_token ({})", token),
                });
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        self.model.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn model_id(&self) -> &str {
        self.model.model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID)
    }

    fn api_token(&self) -> Option<&str> {
        self.model.api_token.as_deref()
    }

    fn max_new_tokens(&self) -> usize {
        self.model.max_new_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS)
    }

    fn timeout_secs(&self) -> Option<u64> {
        self.model.timeout_secs
    }

    fn warm_up(&self) -> bool {
        self.model.warm_up.unwrap_or(true)
    }

    fn output_path(&self) -> &str {
        self.export.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
