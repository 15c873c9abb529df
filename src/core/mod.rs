pub mod model_service;
pub mod prompt;
pub mod session;

pub use crate::domain::model::{ExportArtifact, GenerationResult, Outcome, ProgressEvent};
pub use crate::domain::ports::{
    ConfigProvider, ModelLoader, ProgressReporter, Storage, TextGenerator,
};
pub use crate::utils::error::{GenerationError, Result};
