use crate::core::model_service::ModelService;
use crate::core::prompt::PromptBuilder;
use crate::domain::model::{ExportArtifact, GenerationResult, Outcome};
use crate::domain::ports::{ModelLoader, Storage};
use crate::utils::error::Result;
use std::sync::Arc;

pub const DEFAULT_MAX_NEW_TOKENS: usize = 700;

pub const EMPTY_INPUT_WARNING: &str = "Please enter a valid user story or requirement.";

/// 一次「輸入 -> 生成 -> 呈現」循環；只保留最近一次成功結果
pub struct SessionController<L: ModelLoader> {
    model: Arc<ModelService<L>>,
    max_new_tokens: usize,
    last_result: Option<GenerationResult>,
}

impl<L: ModelLoader> SessionController<L> {
    pub fn new(model: Arc<ModelService<L>>) -> Self {
        Self {
            model,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            last_result: None,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: usize) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn model(&self) -> &ModelService<L> {
        &self.model
    }

    pub async fn handle_request(&mut self, raw_input: &str) -> Outcome {
        if raw_input.trim().is_empty() {
            tracing::warn!("⚠️ Empty requirement, skipping generation");
            return Outcome::ValidationWarning(EMPTY_INPUT_WARNING.to_string());
        }

        let prompt = PromptBuilder::build(raw_input);
        tracing::info!(
            "🧠 Generating test cases ({} requirement characters)",
            raw_input.chars().count()
        );

        match self.model.generate(&prompt, self.max_new_tokens).await {
            Ok(text) => {
                tracing::info!("✅ Generated {} characters", text.len());
                self.last_result = Some(GenerationResult::new(text.clone()));
                Outcome::Success(text)
            }
            Err(e) => {
                tracing::error!("❌ Error generating test cases: {}", e);
                Outcome::Failure(format!("Error generating test cases: {}", e))
            }
        }
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    /// 第一次成功生成前沒有可匯出的內容
    pub fn export(&self) -> Option<ExportArtifact> {
        self.last_result
            .as_ref()
            .map(|result| ExportArtifact::text(result.text.clone()))
    }

    pub async fn export_to<S: Storage>(&self, storage: &S) -> Result<Option<String>> {
        let Some(artifact) = self.export() else {
            return Ok(None);
        };

        let location = storage
            .write_file(&artifact.file_name, artifact.content.as_bytes())
            .await?;
        tracing::info!("📁 Test cases exported to {} ({})", location, artifact.mime_type);
        Ok(Some(location))
    }
}
