// Adapters layer: 外部系統的具體實作（生成後端 HTTP、檔案儲存）

pub mod inference;
pub mod storage;

pub use inference::{InferenceApiLoader, InferenceApiModel};
pub use storage::LocalStorage;
