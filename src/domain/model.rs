use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const EXPORT_FILE_NAME: &str = "test_cases.txt";
pub const EXPORT_MIME_TYPE: &str = "text/plain";

/// 單次成功生成的結果，會覆蓋前一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 每次請求恰好落在其中一種終態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ValidationWarning(String),
    Success(String),
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportArtifact {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE.to_string(),
            content: content.into(),
        }
    }
}

/// 給呈現層的進度通知
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    LoadStarted { model_id: String },
    LoadFinished { model_id: String, elapsed: Duration },
    LoadFailed { model_id: String, message: String },
    GenerationStarted { prompt_chars: usize },
    GenerationFinished { elapsed: Duration, success: bool },
}
