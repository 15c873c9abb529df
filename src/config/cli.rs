use crate::config::toml_config::TomlConfig;
use crate::config::GeneratorSettings;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "testcase-gen")]
#[command(about = "AI requirement-to-test case generator")]
pub struct CliConfig {
    /// Requirement or user story to generate test cases for
    #[arg(short, long, conflicts_with = "input")]
    pub requirement: Option<String>,

    /// Read the requirement from a text file
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL of the text2text inference endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Pretrained model identifier
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    #[arg(long)]
    pub max_new_tokens: Option<usize>,

    /// Abort a generation after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory the exported test_cases.txt is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Export the generated test cases after a successful run
    #[arg(long)]
    pub download: bool,

    /// Skip the warm-up request at startup
    #[arg(long)]
    pub no_warm_up: bool,

    #[arg(long, help = "Log CPU and memory usage around model load and generation")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 預設值 < TOML 檔 < 命令列
    pub fn resolve(&self) -> Result<GeneratorSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let file = TomlConfig::from_file(path)?;
                crate::utils::validation::Validate::validate(&file)?;
                GeneratorSettings::from(&file)
            }
            None => GeneratorSettings::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            settings.model_id = model.clone();
        }
        if let Some(token) = &self.api_token {
            settings.api_token = Some(token.clone());
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            settings.max_new_tokens = max_new_tokens;
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_secs = Some(timeout);
        }
        if let Some(output_path) = &self.output_path {
            settings.output_path = output_path.clone();
        }
        if self.no_warm_up {
            settings.warm_up = false;
        }
        if self.monitor {
            settings.monitor = true;
        }

        Ok(settings)
    }
}
