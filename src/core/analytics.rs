use crate::core::{ScriptHost, ScriptTag};
use serde_json::{json, Value};

pub const GTAG_SCRIPT_ID: &str = "ga4-gtag";
pub const GTAG_BOOTSTRAP_ID: &str = "ga4-bootstrap";
pub const SIGNUP_EVENT: &str = "waitlist_signup";

/// 報名成功的轉換事件參數
pub fn signup_event_params() -> Value {
    json!({
        "event_category": "engagement",
        "event_label": "hero_cta",
        "value": 1,
    })
}

/// GA4 gtag 載入器。只在同意 analytics 後使用
#[derive(Debug, Clone)]
pub struct AnalyticsLoader {
    measurement_id: String,
}

impl AnalyticsLoader {
    pub fn new(measurement_id: impl Into<String>) -> Self {
        Self {
            measurement_id: measurement_id.into(),
        }
    }

    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    pub fn script_src(&self) -> String {
        format!(
            "https://www.googletagmanager.com/gtag/js?id={}",
            self.measurement_id
        )
    }

    pub fn bootstrap(&self) -> String {
        format!(
            "window.dataLayer = window.dataLayer || [];\n\
             function gtag(){{dataLayer.push(arguments);}}\n\
             gtag('js', new Date());\n\
             gtag('config', '{}', {{ anonymize_ip: true, cookie_flags: 'SameSite=None;Secure' }});",
            self.measurement_id
        )
    }

    pub fn tags(&self) -> [ScriptTag; 2] {
        [
            ScriptTag {
                id: GTAG_SCRIPT_ID.to_string(),
                src: Some(self.script_src()),
                is_async: true,
                inline: None,
            },
            ScriptTag {
                id: GTAG_BOOTSTRAP_ID.to_string(),
                src: None,
                is_async: false,
                inline: Some(self.bootstrap()),
            },
        ]
    }

    /// 已經載入就不再注入；回傳這次是否有注入
    pub fn ensure_loaded<H: ScriptHost + ?Sized>(&self, host: &mut H) -> bool {
        if host.contains_script(GTAG_SCRIPT_ID) {
            tracing::debug!("GA4 already present, skipping injection");
            return false;
        }

        for tag in self.tags() {
            host.append_script(tag);
        }
        tracing::debug!("GA4 initialized with consent ({})", self.measurement_id);
        true
    }

    /// 送出 GA4 事件。gtag 沒載入（沒有同意 analytics）時什麼都不做
    pub fn track_event<H: ScriptHost + ?Sized>(host: &mut H, name: &str, params: &Value) -> bool {
        if !host.contains_script(GTAG_SCRIPT_ID) {
            tracing::debug!("GA4 not loaded, dropping event {}", name);
            return false;
        }

        host.append_script(ScriptTag {
            id: format!("ga4-event-{}", name),
            src: None,
            is_async: false,
            inline: Some(format!("gtag('event', {}, {});", Value::from(name), params)),
        });
        tracing::debug!("📈 GA4 event sent: {}", name);
        true
    }
}
