use crate::utils::error::{LandingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub const DEFAULT_DOMAIN: &str = "https://www.theranotepro.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapPage {
    pub path: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl SitemapPage {
    pub fn new(path: &str, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            path: path.to_string(),
            changefreq,
            priority,
        }
    }
}

pub fn default_pages() -> Vec<SitemapPage> {
    vec![
        SitemapPage::new("", ChangeFreq::Weekly, 1.0),
        SitemapPage::new("/features", ChangeFreq::Weekly, 0.9),
        SitemapPage::new("/pricing", ChangeFreq::Weekly, 0.9),
        SitemapPage::new("/security", ChangeFreq::Monthly, 0.8),
        SitemapPage::new("/privacy", ChangeFreq::Monthly, 0.5),
        SitemapPage::new("/terms", ChangeFreq::Monthly, 0.5),
        SitemapPage::new("/contact", ChangeFreq::Monthly, 0.7),
    ]
}

#[derive(Debug, Clone)]
pub struct Sitemap {
    domain: String,
    pages: Vec<SitemapPage>,
}

impl Sitemap {
    pub fn new(domain: impl Into<String>, pages: Vec<SitemapPage>) -> Self {
        let domain: String = domain.into();
        Self {
            domain: domain.trim_end_matches('/').to_string(),
            pages,
        }
    }

    pub fn pages(&self) -> &[SitemapPage] {
        &self.pages
    }

    /// 所有頁面的 lastmod 都用同一天
    pub fn generate(&self, lastmod: NaiveDate) -> String {
        let lastmod = lastmod.format("%Y-%m-%d").to_string();
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n        \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n        \
             xsi:schemaLocation=\"http://www.sitemaps.org/schemas/sitemap/0.9\n        \
             http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd\">\n",
        );

        for page in &self.pages {
            let loc = escape_xml(&format!("{}{}", self.domain, page.path));
            // 寫入 String 不會失敗
            let _ = write!(
                xml,
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
                 <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
                loc,
                lastmod,
                page.changefreq.as_str(),
                page.priority
            );
        }

        xml.push_str("</urlset>");
        xml
    }

    /// 產生並驗證，回傳 XML 與 URL 數量
    pub fn render(&self, lastmod: NaiveDate) -> Result<(String, usize)> {
        let xml = self.generate(lastmod);
        let count = validate_sitemap(&xml)?;
        Ok((xml, count))
    }
}

impl Default for Sitemap {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN, default_pages())
    }
}

pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// 基本結構檢查，回傳 `<url>` 數量
pub fn validate_sitemap(xml: &str) -> Result<usize> {
    if !xml.starts_with("<?xml version=\"1.0\"") {
        return Err(LandingError::SitemapError {
            message: "Missing XML declaration".to_string(),
        });
    }
    if !xml.contains("<urlset") {
        return Err(LandingError::SitemapError {
            message: "Missing urlset element".to_string(),
        });
    }
    if !xml.trim_end().ends_with("</urlset>") {
        return Err(LandingError::SitemapError {
            message: "Unclosed urlset element".to_string(),
        });
    }

    let opened = xml.matches("<url>").count();
    let closed = xml.matches("</url>").count();
    if opened != closed {
        return Err(LandingError::SitemapError {
            message: format!("Mismatched url elements: {} opened, {} closed", opened, closed),
        });
    }

    Ok(opened)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn test_default_sitemap() {
        let (xml, count) = Sitemap::default().render(date()).unwrap();
        assert_eq!(count, 7);
        assert!(xml.contains("<loc>https://www.theranotepro.com</loc>"));
        assert!(xml.contains("<loc>https://www.theranotepro.com/pricing</loc>"));
        assert!(xml.contains("<lastmod>2026-10-15</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
    }

    #[test]
    fn test_domain_trailing_slash_and_escaping() {
        let sitemap = Sitemap::new(
            "https://example.com/",
            vec![SitemapPage::new("/search?a=1&b=2", ChangeFreq::Daily, 0.3)],
        );
        let xml = sitemap.generate(date());
        assert!(xml.contains("<loc>https://example.com/search?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn test_validate_sitemap_rejects_broken_xml() {
        assert!(validate_sitemap("<urlset></urlset>").is_err());
        assert!(validate_sitemap("<?xml version=\"1.0\"?><urlset>").is_err());
        assert!(validate_sitemap("<?xml version=\"1.0\"?><root></root>").is_err());
        assert_eq!(
            validate_sitemap("<?xml version=\"1.0\"?><urlset></urlset>").unwrap(),
            0
        );
    }
}
