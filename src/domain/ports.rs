use crate::domain::model::{NewWaitlistEntry, ScriptTag, WaitlistEntry};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 報名資料的持久層。email 重複必須回傳 `LandingError::Conflict`
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry>;
}

/// 瀏覽器端 key/value 儲存 (localStorage 的抽象)
pub trait ConsentStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// 可以插入 script 的文件 head
pub trait ScriptHost {
    fn contains_script(&self, id: &str) -> bool;
    fn append_script(&mut self, script: ScriptTag);
}

/// 資料庫連線設定的來源 (TOML 檔或 Lambda 環境變數)
pub trait ConfigProvider: Send + Sync {
    fn datastore_url(&self) -> &str;
    fn datastore_key(&self) -> &str;
    fn waitlist_table(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}
