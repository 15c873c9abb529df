use crate::domain::model::ProgressEvent;
use crate::domain::ports::{ModelLoader, ProgressReporter, TextGenerator};
use crate::utils::error::GenerationError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

/// 不輸出任何進度
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn notify(&self, _event: ProgressEvent) {}
}

/// 以 tracing 事件回報進度
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn notify(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::LoadStarted { model_id } => {
                tracing::info!("⏳ Loading model {}", model_id)
            }
            ProgressEvent::LoadFinished { model_id, elapsed } => {
                tracing::info!("✅ Model {} loaded in {:?}", model_id, elapsed)
            }
            ProgressEvent::LoadFailed { model_id, message } => {
                tracing::error!("❌ Model {} failed to load: {}", model_id, message)
            }
            ProgressEvent::GenerationStarted { prompt_chars } => {
                tracing::debug!("Generating with {} prompt characters", prompt_chars)
            }
            ProgressEvent::GenerationFinished { elapsed, success } => {
                tracing::debug!("Generation finished in {:?} (success: {})", elapsed, success)
            }
        }
    }
}

/// 持有唯一的模型 handle，第一次使用時才建構
pub struct ModelService<L: ModelLoader> {
    loader: L,
    handle: OnceCell<L::Model>,
    progress: Arc<dyn ProgressReporter>,
    timeout: Option<Duration>,
}

impl<L: ModelLoader> ModelService<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            handle: OnceCell::new(),
            progress: Arc::new(SilentProgress),
            timeout: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model_id(&self) -> &str {
        self.loader.model_id()
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.initialized()
    }

    /// 冪等；併發呼叫時只有一個會真正執行 load，載入失敗則保持未初始化以便重試
    pub async fn ensure_loaded(&self) -> Result<&L::Model, GenerationError> {
        self.handle
            .get_or_try_init(|| async move {
                let model_id = self.loader.model_id().to_string();
                self.progress.notify(ProgressEvent::LoadStarted {
                    model_id: model_id.clone(),
                });

                let started = Instant::now();
                match self.loader.load().await {
                    Ok(model) => {
                        self.progress.notify(ProgressEvent::LoadFinished {
                            model_id,
                            elapsed: started.elapsed(),
                        });
                        Ok(model)
                    }
                    Err(e) => {
                        self.progress.notify(ProgressEvent::LoadFailed {
                            model_id,
                            message: e.to_string(),
                        });
                        Err(e)
                    }
                }
            })
            .await
    }

    pub async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidInput {
                message: "prompt cannot be empty".to_string(),
            });
        }
        if max_new_tokens == 0 {
            return Err(GenerationError::InvalidInput {
                message: "max_new_tokens must be a positive integer".to_string(),
            });
        }

        let model = self.ensure_loaded().await?;

        self.progress.notify(ProgressEvent::GenerationStarted {
            prompt_chars: prompt.chars().count(),
        });
        let started = Instant::now();

        let result = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, model.generate(prompt, max_new_tokens)).await {
                    Ok(result) => result,
                    Err(_) => Err(GenerationError::Timeout {
                        seconds: limit.as_secs(),
                    }),
                }
            }
            None => model.generate(prompt, max_new_tokens).await,
        };

        let elapsed = started.elapsed();
        self.progress.notify(ProgressEvent::GenerationFinished {
            elapsed,
            success: result.is_ok(),
        });

        match &result {
            Ok(text) => tracing::debug!(
                "Generated {} characters in {:?} (max_new_tokens={})",
                text.len(),
                elapsed,
                max_new_tokens
            ),
            Err(e) => tracing::warn!("Generation failed after {:?}: {}", elapsed, e),
        }

        result
    }
}
