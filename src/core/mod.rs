pub mod analytics;
pub mod client;
pub mod consent;
pub mod sitemap;
pub mod waitlist;

pub use crate::domain::model::{
    ConsentRecord, CookieCategory, CookiePreference, NewWaitlistEntry, Role, ScriptTag,
    WaitlistEntry, WaitlistSubmission, CONSENT_DATE_KEY, CONSENT_KEY,
};
pub use crate::domain::ports::{ConfigProvider, ConsentStorage, ScriptHost, WaitlistStore};
pub use crate::utils::error::Result;
