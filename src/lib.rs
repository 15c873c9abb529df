pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::TomlConfig, GeneratorSettings};

pub use adapters::{InferenceApiLoader, LocalStorage};
pub use core::{model_service::ModelService, prompt::PromptBuilder, session::SessionController};
pub use domain::model::{ExportArtifact, GenerationResult, Outcome};
pub use utils::error::{AppError, GenerationError, Result};
