use crate::core::sitemap::{default_pages, Sitemap, SitemapPage, DEFAULT_DOMAIN};
use crate::core::ConfigProvider;
use crate::utils::error::{LandingError, Result};
use crate::utils::validation::{
    validate_measurement_id, validate_non_empty_string, validate_path, validate_priority,
    validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

pub const DEFAULT_CONFIG_PATH: &str = "landing.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandingConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub datastore: Option<DatastoreConfig>,
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub consent: ConsentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
    pub pages: Option<Vec<SitemapPage>>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            pages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_measurement_id")]
    pub measurement_id: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            measurement_id: default_measurement_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentConfig {
    #[serde(default = "default_consent_path")]
    pub storage_path: PathBuf,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            storage_path: default_consent_path(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_table() -> String {
    "waitlist".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_measurement_id() -> String {
    "G-XXXXXXXXXX".to_string()
}

fn default_consent_path() -> PathBuf {
    PathBuf::from("./.landing/consent.json")
}

impl LandingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在就用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LandingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn datastore(&self) -> Result<&DatastoreConfig> {
        self.datastore
            .as_ref()
            .ok_or_else(|| LandingError::MissingConfigError {
                field: "datastore".to_string(),
            })
    }

    pub fn build_sitemap(&self) -> Sitemap {
        let pages = self.sitemap.pages.clone().unwrap_or_else(default_pages);
        Sitemap::new(self.sitemap.domain.clone(), pages)
    }
}

impl ConfigProvider for DatastoreConfig {
    fn datastore_url(&self) -> &str {
        &self.url
    }

    fn datastore_key(&self) -> &str {
        &self.api_key
    }

    fn waitlist_table(&self) -> &str {
        &self.table
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for DatastoreConfig {
    fn validate(&self) -> Result<()> {
        validate_url("datastore.url", &self.url)?;
        validate_non_empty_string("datastore.api_key", &self.api_key)?;
        if self.api_key.starts_with("${") {
            return Err(LandingError::ConfigValidationError {
                field: "datastore.api_key".to_string(),
                message: format!("environment variable {} is not set", self.api_key),
            });
        }
        validate_non_empty_string("datastore.table", &self.table)?;
        validate_range("datastore.timeout_seconds", self.timeout_seconds, 1, 120)?;
        Ok(())
    }
}

impl Validate for LandingConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.listen_addr", &self.server.listen_addr)?;
        if let Some(datastore) = &self.datastore {
            datastore.validate()?;
        }

        validate_url("sitemap.domain", &self.sitemap.domain)?;
        if let Some(pages) = &self.sitemap.pages {
            for page in pages {
                validate_priority("sitemap.pages.priority", page.priority)?;
                if !page.path.is_empty() && !page.path.starts_with('/') {
                    return Err(LandingError::InvalidConfigValueError {
                        field: "sitemap.pages.path".to_string(),
                        value: page.path.clone(),
                        reason: "Path must be empty or start with '/'".to_string(),
                    });
                }
            }
        }

        validate_measurement_id("analytics.measurement_id", &self.analytics.measurement_id)?;
        validate_path(
            "consent.storage_path",
            &self.consent.storage_path.to_string_lossy(),
        )?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
