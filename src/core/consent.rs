//! Cookie 同意閘門
//!
//! 啟動時讀取已儲存的偏好；沒有紀錄、紀錄壞掉或超過一年就重新顯示 banner。
//! analytics 只有在偏好允許時才會透過 [`AnalyticsLoader`] 注入，而且只注入一次。

use crate::core::analytics::AnalyticsLoader;
use crate::core::{
    ConsentRecord, ConsentStorage, CookieCategory, CookiePreference, ScriptHost, CONSENT_DATE_KEY,
    CONSENT_KEY,
};
use crate::utils::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};

pub struct ConsentGate<S: ConsentStorage, H: ScriptHost> {
    storage: S,
    host: H,
    analytics: AnalyticsLoader,
    preference: CookiePreference,
    banner_visible: bool,
    preferences_open: bool,
}

impl<S: ConsentStorage, H: ScriptHost> ConsentGate<S, H> {
    pub fn new(storage: S, host: H, analytics: AnalyticsLoader) -> Self {
        Self {
            storage,
            host,
            analytics,
            preference: CookiePreference::default(),
            banner_visible: false,
            preferences_open: false,
        }
    }

    /// 讀取儲存的同意紀錄並決定是否顯示 banner
    pub fn load(&mut self, now: DateTime<Utc>) -> Result<()> {
        match self.read_record()? {
            Some(record) if !record.is_expired(now) => {
                self.preference = record.preference;
                self.banner_visible = false;
                if record.preference.analytics {
                    self.analytics.ensure_loaded(&mut self.host);
                }
                tracing::debug!("Restored cookie preference: {:?}", record.preference);
            }
            Some(record) => {
                tracing::info!("Cookie consent from {} expired, prompting again", record.granted_at);
                self.prompt();
            }
            None => self.prompt(),
        }
        Ok(())
    }

    fn prompt(&mut self) {
        self.preference = CookiePreference::default();
        self.banner_visible = true;
        self.preferences_open = false;
    }

    /// 讀取紀錄。格式錯誤視為沒有紀錄；儲存層本身的錯誤往上拋
    pub fn read_record(&self) -> Result<Option<ConsentRecord>> {
        let (Some(blob), Some(date)) = (
            self.storage.get(CONSENT_KEY)?,
            self.storage.get(CONSENT_DATE_KEY)?,
        ) else {
            return Ok(None);
        };

        let preference = match serde_json::from_str::<CookiePreference>(&blob) {
            Ok(preference) => preference,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cookie preference: {}", e);
                return Ok(None);
            }
        };

        let granted_at = match DateTime::parse_from_rfc3339(&date) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!("Ignoring unreadable consent date {:?}: {}", date, e);
                return Ok(None);
            }
        };

        Ok(Some(ConsentRecord {
            preference,
            granted_at,
        }))
    }

    pub fn accept_all(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.save(CookiePreference::accept_all(), now)?;
        tracing::debug!("All cookies accepted");
        Ok(())
    }

    pub fn reject_all(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.save(CookiePreference::reject_all(), now)?;
        tracing::debug!("Non-essential cookies rejected");
        Ok(())
    }

    pub fn open_preferences(&mut self) {
        self.preferences_open = true;
    }

    /// 取消自訂面板，已儲存的偏好不受影響
    pub fn close_preferences(&mut self) {
        self.preferences_open = false;
    }

    pub fn toggle(&mut self, category: CookieCategory) {
        self.preference.toggle(category);
    }

    pub fn save_custom(&mut self, now: DateTime<Utc>) -> Result<()> {
        let preference = self.preference;
        self.save(preference, now)?;
        tracing::debug!("Custom preferences saved: {:?}", preference);
        Ok(())
    }

    fn save(&mut self, preference: CookiePreference, now: DateTime<Utc>) -> Result<()> {
        let blob = serde_json::to_string(&preference)?;
        self.storage.set(CONSENT_KEY, &blob)?;
        self.storage
            .set(CONSENT_DATE_KEY, &now.to_rfc3339_opts(SecondsFormat::Millis, true))?;

        self.preference = preference;
        if preference.analytics {
            self.analytics.ensure_loaded(&mut self.host);
        }
        self.banner_visible = false;
        self.preferences_open = false;
        Ok(())
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    pub fn preferences_open(&self) -> bool {
        self.preferences_open
    }

    pub fn preference(&self) -> CookiePreference {
        self.preference
    }

    pub fn analytics_allowed(&self) -> bool {
        !self.banner_visible && self.preference.analytics
    }

    pub fn marketing_allowed(&self) -> bool {
        !self.banner_visible && self.preference.marketing
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_parts(self) -> (S, H) {
        (self.storage, self.host)
    }
}
