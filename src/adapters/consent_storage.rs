use crate::core::ConsentStorage;
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct MemoryConsentStorage {
    values: BTreeMap<String, String>,
}

impl MemoryConsentStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsentStorage for MemoryConsentStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// 以 JSON 檔保存的 key/value，每次寫入都整份落盤
#[derive(Debug, Clone)]
pub struct FileConsentStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileConsentStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let data = fs::read(&path)?;
            if data.is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_slice(&data)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&self.values)?)?;
        Ok(())
    }
}

impl ConsentStorage for FileConsentStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile").join("consent.json");

        let mut storage = FileConsentStorage::open(&path).unwrap();
        storage.set("cookie-consent", r#"{"analytics":true}"#).unwrap();
        assert!(path.exists());

        let reopened = FileConsentStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get("cookie-consent").unwrap().as_deref(),
            Some(r#"{"analytics":true}"#)
        );

        let mut reopened = reopened;
        reopened.remove("cookie-consent").unwrap();
        let again = FileConsentStorage::open(&path).unwrap();
        assert!(again.get("cookie-consent").unwrap().is_none());
    }
}
