use crate::core::sitemap::{Sitemap, DEFAULT_DOMAIN};
use crate::core::ConfigProvider;
use crate::utils::error::{LandingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub supabase_url: String,
    pub supabase_key: String,
    pub waitlist_table: String,
    pub timeout_seconds: u64,
    pub site_domain: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            supabase_url: env::var("SUPABASE_URL").map_err(|_| LandingError::ConfigError {
                message: "SUPABASE_URL environment variable is required".to_string(),
            })?,
            supabase_key: env::var("SUPABASE_KEY").map_err(|_| LandingError::ConfigError {
                message: "SUPABASE_KEY environment variable is required".to_string(),
            })?,
            waitlist_table: env::var("WAITLIST_TABLE").unwrap_or_else(|_| "waitlist".to_string()),
            timeout_seconds: env::var("DATASTORE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            site_domain: env::var("SITE_DOMAIN").unwrap_or_else(|_| DEFAULT_DOMAIN.to_string()),
        })
    }

    pub fn sitemap(&self) -> Sitemap {
        Sitemap::new(self.site_domain.clone(), crate::core::sitemap::default_pages())
    }
}

impl ConfigProvider for LambdaConfig {
    fn datastore_url(&self) -> &str {
        &self.supabase_url
    }

    fn datastore_key(&self) -> &str {
        &self.supabase_key
    }

    fn waitlist_table(&self) -> &str {
        &self.waitlist_table
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_url("SUPABASE_URL", &self.supabase_url)?;
        validate_non_empty_string("SUPABASE_KEY", &self.supabase_key)?;
        validate_non_empty_string("WAITLIST_TABLE", &self.waitlist_table)?;
        validate_range("DATASTORE_TIMEOUT_SECONDS", self.timeout_seconds, 1, 120)?;
        validate_url("SITE_DOMAIN", &self.site_domain)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = LambdaConfig {
            supabase_url: "not a url".to_string(),
            supabase_key: "key".to_string(),
            waitlist_table: "waitlist".to_string(),
            timeout_seconds: 10,
            site_domain: DEFAULT_DOMAIN.to_string(),
        };
        assert!(config.validate().is_err());

        let config = LambdaConfig {
            supabase_url: "https://abc.supabase.co".to_string(),
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
