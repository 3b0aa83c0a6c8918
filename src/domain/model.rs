use crate::utils::error::{LandingError, Result};
use crate::utils::validation::{is_blank, validate_email};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Waitlist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Therapist,
    Counselor,
    Psychologist,
    SocialWorker,
    PracticeManager,
    Admin,
    Other,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Therapist,
        Role::Counselor,
        Role::Psychologist,
        Role::SocialWorker,
        Role::PracticeManager,
        Role::Admin,
        Role::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Therapist => "therapist",
            Role::Counselor => "counselor",
            Role::Psychologist => "psychologist",
            Role::SocialWorker => "social-worker",
            Role::PracticeManager => "practice-manager",
            Role::Admin => "admin",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LandingError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| LandingError::validation("role", "Invalid role"))
    }
}

/// 表單送進來的原始資料，欄位都可能缺少
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitlistSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

/// 通過驗證、準備寫入資料庫的報名
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWaitlistEntry {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub interests: BTreeSet<String>,
}

impl TryFrom<WaitlistSubmission> for NewWaitlistEntry {
    type Error = LandingError;

    fn try_from(submission: WaitlistSubmission) -> Result<Self> {
        if is_blank(submission.name.as_deref()) || is_blank(submission.email.as_deref()) {
            return Err(LandingError::validation(
                "name,email",
                "Name and email are required",
            ));
        }

        let name = submission.name.unwrap_or_default().trim().to_string();
        let email = submission.email.unwrap_or_default().trim().to_lowercase();
        validate_email("email", &email)?;

        let role = match submission.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<Role>()?),
        };

        let practice = submission
            .practice
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let interests = submission
            .interests
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        Ok(Self {
            name,
            email,
            practice,
            role,
            interests,
        })
    }
}

/// 資料庫中的一筆報名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub practice: Option<String>,
    pub role: Option<Role>,
    pub interests: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub source: String,
}

pub const DEFAULT_SOURCE: &str = "website";

impl WaitlistEntry {
    pub fn from_new(id: String, entry: NewWaitlistEntry, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: entry.name,
            email: entry.email,
            practice: entry.practice,
            role: entry.role,
            interests: entry.interests,
            created_at,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cookie consent
// ---------------------------------------------------------------------------

pub const CONSENT_KEY: &str = "cookie-consent";
pub const CONSENT_DATE_KEY: &str = "cookie-consent-date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieCategory {
    Necessary,
    Analytics,
    Marketing,
}

#[derive(Deserialize)]
struct StoredPreference {
    #[serde(default)]
    analytics: bool,
    #[serde(default)]
    marketing: bool,
}

impl From<StoredPreference> for CookiePreference {
    fn from(stored: StoredPreference) -> Self {
        Self {
            necessary: true,
            analytics: stored.analytics,
            marketing: stored.marketing,
        }
    }
}

/// `necessary` 永遠是 true，反序列化時也會強制回 true
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPreference")]
pub struct CookiePreference {
    pub necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
}

impl CookiePreference {
    pub fn accept_all() -> Self {
        Self {
            necessary: true,
            analytics: true,
            marketing: true,
        }
    }

    pub fn reject_all() -> Self {
        Self {
            necessary: true,
            analytics: false,
            marketing: false,
        }
    }

    pub fn with(analytics: bool, marketing: bool) -> Self {
        Self {
            necessary: true,
            analytics,
            marketing,
        }
    }

    pub fn toggle(&mut self, category: CookieCategory) {
        match category {
            CookieCategory::Necessary => {}
            CookieCategory::Analytics => self.analytics = !self.analytics,
            CookieCategory::Marketing => self.marketing = !self.marketing,
        }
    }
}

impl Default for CookiePreference {
    fn default() -> Self {
        Self::reject_all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentRecord {
    pub preference: CookiePreference,
    pub granted_at: DateTime<Utc>,
}

impl ConsentRecord {
    /// 同意超過一年 (12 個月) 視為過期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match now.checked_sub_months(Months::new(12)) {
            Some(one_year_ago) => self.granted_at < one_year_ago,
            None => false,
        }
    }
}

/// 注入到 `<head>` 的 script 標籤
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub id: String,
    pub src: Option<String>,
    pub is_async: bool,
    pub inline: Option<String>,
}
