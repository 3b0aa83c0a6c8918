use crate::core::{NewWaitlistEntry, WaitlistEntry, WaitlistStore};
use crate::utils::error::{LandingError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// 行程內的報名存放區，email 為唯一鍵
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, WaitlistEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, email: &str) -> Option<WaitlistEntry> {
        self.entries.lock().ok()?.get(email).cloned()
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry> {
        let mut entries = self.entries.lock().map_err(|_| LandingError::DatastoreError {
            code: None,
            message: "memory store lock poisoned".to_string(),
        })?;

        if entries.contains_key(&entry.email) {
            return Err(LandingError::conflict("Email already registered for waitlist"));
        }

        let created = WaitlistEntry::from_new(Uuid::new_v4().to_string(), entry, Utc::now());
        entries.insert(created.email.clone(), created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WaitlistSubmission;

    fn entry(email: &str) -> NewWaitlistEntry {
        NewWaitlistEntry::try_from(WaitlistSubmission {
            name: Some("Jane".to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_unique_email() {
        let store = MemoryStore::new();
        let first = tokio_test::block_on(store.insert(entry("jane@example.com"))).unwrap();
        let second = tokio_test::block_on(store.insert(entry("john@example.com"))).unwrap();
        assert_ne!(first.id, second.id);

        let err = tokio_test::block_on(store.insert(entry("jane@example.com"))).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(store.len(), 2);
    }
}
