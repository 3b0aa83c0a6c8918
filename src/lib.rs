pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::{
    consent_storage::{FileConsentStorage, MemoryConsentStorage},
    document::DocumentHead,
    memory::MemoryStore,
    supabase::SupabaseStore,
};
pub use config::LandingConfig;
pub use crate::core::{
    analytics::AnalyticsLoader,
    client::{WaitlistClient, WaitlistForm},
    consent::ConsentGate,
    sitemap::Sitemap,
    waitlist::WaitlistService,
};
pub use utils::error::{LandingError, Result};
