use crate::domain::model::ProgressEvent;
use crate::utils::error::{GenerationError, Result};
use async_trait::async_trait;

/// 已載入的生成後端
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> std::result::Result<String, GenerationError>;
}

/// 建構生成後端，昂貴且只應執行一次
#[async_trait]
pub trait ModelLoader: Send + Sync {
    type Model: TextGenerator;

    fn model_id(&self) -> &str;

    async fn load(&self) -> std::result::Result<Self::Model, GenerationError>;
}

pub trait ProgressReporter: Send + Sync {
    fn notify(&self, event: ProgressEvent);
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn model_id(&self) -> &str;
    fn api_token(&self) -> Option<&str>;
    fn max_new_tokens(&self) -> usize;
    fn timeout_secs(&self) -> Option<u64>;
    fn warm_up(&self) -> bool;
    fn output_path(&self) -> &str;
}
