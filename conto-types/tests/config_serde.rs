use std::time::Duration;

use conto_types::{BackoffConfig, CacheConfig, ClientConfig};

#[test]
fn cache_defaults_match_the_documented_policy() {
    let cfg = CacheConfig::default();
    assert_eq!(cfg.cache_name, "conto");
    assert!(cfg.cache_dir.is_none());
    assert!(cfg.expire_after.is_zero(), "default is never-expire");
    assert!(cfg.stale_if_error);
    assert!(!cfg.match_headers);
    assert!(!cfg.respect_cache_control);
}

#[test]
fn backoff_defaults() {
    let cfg = BackoffConfig::default();
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.base_delay, Duration::from_secs(1));
}

#[test]
fn client_config_round_trips_through_serde() {
    let cfg = ClientConfig {
        max_pages: 7,
        ..ClientConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: ClientConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.max_pages, 7);
    assert_eq!(back.base_url, ClientConfig::DEFAULT_BASE_URL);
    assert_eq!(back.token_expiry_margin, Duration::from_secs(30));
}

#[test]
fn one_or_many_normalizes_shapes() {
    #[derive(serde::Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "conto_types::list::one_or_many")]
        items: Option<Vec<u32>>,
    }

    let single: Holder = serde_json::from_str(r#"{"items": 3}"#).unwrap();
    assert_eq!(single.items, Some(vec![3]));

    let many: Holder = serde_json::from_str(r#"{"items": [3, 4]}"#).unwrap();
    assert_eq!(many.items, Some(vec![3, 4]));

    let absent: Holder = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.items, None);

    let null: Holder = serde_json::from_str(r#"{"items": null}"#).unwrap();
    assert_eq!(null.items, None);
}
