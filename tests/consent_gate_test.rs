use chrono::{DateTime, Duration, TimeZone, Utc};
use landing_gate::core::analytics::GTAG_SCRIPT_ID;
use landing_gate::core::{
    ConsentStorage, CookieCategory, CookiePreference, CONSENT_DATE_KEY, CONSENT_KEY,
};
use landing_gate::{
    AnalyticsLoader, ConsentGate, DocumentHead, FileConsentStorage, MemoryConsentStorage,
};
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
}

fn gate_with(storage: MemoryConsentStorage) -> ConsentGate<MemoryConsentStorage, DocumentHead> {
    ConsentGate::new(storage, DocumentHead::new(), AnalyticsLoader::new("G-TEST123"))
}

/// 模擬重新整理頁面：保留 storage，換一個新的 document
fn reload(
    gate: ConsentGate<MemoryConsentStorage, DocumentHead>,
    at: DateTime<Utc>,
) -> ConsentGate<MemoryConsentStorage, DocumentHead> {
    let (storage, _) = gate.into_parts();
    let mut gate = gate_with(storage);
    gate.load(at).unwrap();
    gate
}

#[test]
fn test_accept_all_loads_analytics_exactly_once() {
    let mut gate = gate_with(MemoryConsentStorage::new());
    gate.load(now()).unwrap();
    assert!(gate.banner_visible());

    gate.accept_all(now()).unwrap();
    assert!(!gate.banner_visible());
    assert!(gate.analytics_allowed());
    assert!(gate.marketing_allowed());
    assert_eq!(gate.host().count(GTAG_SCRIPT_ID), 1);

    // 再按一次或再存一次都不會重複注入
    gate.accept_all(now()).unwrap();
    gate.save_custom(now()).unwrap();
    gate.load(now()).unwrap();
    assert_eq!(gate.host().count(GTAG_SCRIPT_ID), 1);

    let gate = reload(gate, now() + Duration::days(30));
    assert!(!gate.banner_visible());
    assert_eq!(gate.host().count(GTAG_SCRIPT_ID), 1);
}

#[test]
fn test_reject_all_loads_nothing() {
    let mut gate = gate_with(MemoryConsentStorage::new());
    gate.load(now()).unwrap();
    gate.reject_all(now()).unwrap();

    assert!(!gate.banner_visible());
    assert_eq!(gate.preference(), CookiePreference::reject_all());
    assert!(gate.host().scripts().is_empty());

    let gate = reload(gate, now() + Duration::days(1));
    assert!(!gate.banner_visible());
    assert!(gate.host().scripts().is_empty());
    assert!(!gate.analytics_allowed());
}

#[test]
fn test_custom_preferences() {
    let mut gate = gate_with(MemoryConsentStorage::new());
    gate.load(now()).unwrap();
    gate.open_preferences();
    gate.toggle(CookieCategory::Marketing);
    gate.toggle(CookieCategory::Necessary);
    gate.save_custom(now()).unwrap();

    assert!(!gate.preferences_open());
    assert_eq!(gate.preference(), CookiePreference::with(false, true));
    assert!(gate.host().scripts().is_empty());

    let stored = gate.storage().get(CONSENT_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(
        stored,
        serde_json::json!({"necessary": true, "analytics": false, "marketing": true})
    );

    let mut gate = reload(gate, now());
    gate.open_preferences();
    gate.toggle(CookieCategory::Analytics);
    gate.save_custom(now()).unwrap();
    assert_eq!(gate.host().count(GTAG_SCRIPT_ID), 1);
}

#[test]
fn test_consent_older_than_one_year_reprompts() {
    let mut gate = gate_with(MemoryConsentStorage::new());
    gate.load(now()).unwrap();
    gate.accept_all(now()).unwrap();

    let gate = reload(gate, now() + Duration::days(364));
    assert!(!gate.banner_visible());

    let gate = reload(gate, now() + Duration::days(366));
    assert!(gate.banner_visible());
    assert_eq!(gate.preference(), CookiePreference::reject_all());
    assert!(gate.host().scripts().is_empty());
}

#[test]
fn test_missing_date_reprompts() {
    let mut storage = MemoryConsentStorage::new();
    storage
        .set(CONSENT_KEY, r#"{"necessary":true,"analytics":true,"marketing":false}"#)
        .unwrap();

    let mut gate = gate_with(storage);
    gate.load(now()).unwrap();
    assert!(gate.banner_visible());
    assert!(gate.host().scripts().is_empty());

    let mut storage = MemoryConsentStorage::new();
    storage
        .set(CONSENT_KEY, r#"{"necessary":true,"analytics":true,"marketing":false}"#)
        .unwrap();
    storage.set(CONSENT_DATE_KEY, "yesterday").unwrap();
    let mut gate = gate_with(storage);
    gate.load(now()).unwrap();
    assert!(gate.banner_visible());
}

#[test]
fn test_file_backed_profile_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("consent.json");

    let mut gate = ConsentGate::new(
        FileConsentStorage::open(&path).unwrap(),
        DocumentHead::new(),
        AnalyticsLoader::new("G-TEST123"),
    );
    gate.load(now()).unwrap();
    gate.accept_all(now()).unwrap();

    let mut gate = ConsentGate::new(
        FileConsentStorage::open(&path).unwrap(),
        DocumentHead::new(),
        AnalyticsLoader::new("G-TEST123"),
    );
    gate.load(now() + Duration::days(10)).unwrap();
    assert!(!gate.banner_visible());
    assert!(gate
        .host()
        .render()
        .contains("https://www.googletagmanager.com/gtag/js?id=G-TEST123"));
}
