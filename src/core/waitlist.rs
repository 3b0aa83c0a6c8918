use crate::core::{NewWaitlistEntry, WaitlistEntry, WaitlistStore, WaitlistSubmission};
use crate::utils::error::{ErrorCategory, Result};
use std::sync::Arc;

/// 伺服器端的報名流程：重新驗證、寫入一次，不重試
#[derive(Clone)]
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
}

impl WaitlistService {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self { store }
    }

    pub async fn join(&self, submission: WaitlistSubmission) -> Result<WaitlistEntry> {
        let entry = match NewWaitlistEntry::try_from(submission) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("❌ Waitlist submission rejected: {}", e);
                return Err(e);
            }
        };

        tracing::debug!(
            role = ?entry.role,
            interests = entry.interests.len(),
            "📝 Inserting waitlist entry"
        );

        match self.store.insert(entry).await {
            Ok(created) => {
                tracing::info!("✅ Waitlist entry created: {}", created.id);
                Ok(created)
            }
            Err(e) if e.category() == ErrorCategory::Conflict => {
                tracing::warn!("⚠️ Duplicate waitlist email");
                Err(e)
            }
            Err(e) => {
                tracing::error!("❌ Waitlist insert failed: {}", e);
                Err(e)
            }
        }
    }
}
