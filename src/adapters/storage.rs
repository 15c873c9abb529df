use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    /// 寫入 base_path 底下，必要時建立目錄，回傳完整路徑
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("output");
        let storage = LocalStorage::new(base.to_str().unwrap());

        let location = storage
            .write_file("test_cases.txt", b"Scenario 1: ...")
            .await
            .unwrap();

        assert!(location.ends_with("test_cases.txt"));
        let content = std::fs::read_to_string(base.join("test_cases.txt")).unwrap();
        assert_eq!(content, "Scenario 1: ...");
    }

    #[tokio::test]
    async fn test_write_file_overwrites_previous_export() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

        tokio_test::assert_ok!(storage.write_file("test_cases.txt", b"first").await);
        tokio_test::assert_ok!(storage.write_file("test_cases.txt", b"second").await);

        let content = std::fs::read_to_string(temp_dir.path().join("test_cases.txt")).unwrap();
        assert_eq!(content, "second");
    }
}
