/// Integration tests for loading and validating settings files
use prebid_line_items::config::{load_config, InventoryTarget};
use prebid_line_items::error::SetupError;
use prebid_line_items::price_buckets::expand;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const BASE_SETTINGS: &str = r#"
[dfp]
order_name = "Prebid appnexus"
user_email_address = "trafficker@example.com"
advertiser_name = "AppNexus"
use_placement_names = true
targeted_placement_names = ["OnlineNowLeaderboard"]
placement_sizes = [{ width = "728", height = "90" }]
num_creatives_per_line_item = 4
line_item_prefix = "AppNexus_728x90_$"

[ad_server]
base_url = "https://ads.example.com/v1"
network_code = "98765"
access_token = "ya29.testtokenvalue"
"#;

fn write_settings(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn settings_error(contents: &str) -> SetupError {
    let file = write_settings(contents);
    let err = load_config(file.path()).unwrap_err();
    err.downcast::<SetupError>()
        .expect("expected a settings validation error")
}

#[test]
fn test_load_settings_file() {
    let file = write_settings(&format!(
        "{}\n{}",
        BASE_SETTINGS,
        r#"
[prebid]
bidder_code = "appnexus"
price_precision = 2
price_buckets = [
    { min = 0, max = 3, increment = 0.01 },
    { min = 3, max = 8, increment = 0.05 },
    { min = 8, max = 20, increment = 0.5 },
]
"#
    ));

    let cfg = load_config(file.path()).unwrap();

    assert_eq!(
        cfg.dfp.inventory,
        InventoryTarget::Placements(vec!["OnlineNowLeaderboard".to_string()])
    );
    assert_eq!(cfg.dfp.num_creatives, 4);
    assert_eq!(cfg.dfp.line_item_prefix.as_deref(), Some("AppNexus_728x90_$"));
    assert_eq!(cfg.ad_server.access_token.as_deref(), Some("ya29.testtokenvalue"));

    let prices = expand(&cfg.prebid.price_buckets, cfg.prebid.price_precision).unwrap();
    assert_eq!(prices.len(), 301 + 101 + 25);
    assert_eq!(prices[0], 0);
    assert_eq!(*prices.last().unwrap(), 20_000_000);
}

#[test]
fn test_missing_price_buckets() {
    let err = settings_error(&format!("{}\n[prebid]\nbidder_code = \"appnexus\"\n", BASE_SETTINGS));
    match err {
        SetupError::MissingSetting(key) => assert_eq!(key, "prebid.price_buckets"),
        other => panic!("Expected MissingSetting, got {:?}", other),
    }
}

#[test]
fn test_non_numeric_bucket_bound() {
    let err = settings_error(&format!(
        "{}\n{}",
        BASE_SETTINGS,
        r#"
[prebid]
bidder_code = "appnexus"
price_buckets = [{ min = "a", max = 3, increment = 0.01 }]
"#
    ));
    assert!(matches!(err, SetupError::BadSetting(_)));
}

#[test]
fn test_missing_bidder_code() {
    let err = settings_error(&format!(
        "{}\n{}",
        BASE_SETTINGS,
        r#"
[prebid]
price_buckets = [{ min = 0, max = 3, increment = 0.01 }]
"#
    ));
    match err {
        SetupError::MissingSetting(key) => assert_eq!(key, "prebid.bidder_code"),
        other => panic!("Expected MissingSetting, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_not_a_settings_error() {
    let err = load_config(std::path::Path::new("/nonexistent/settings.toml")).unwrap_err();
    assert!(err.downcast_ref::<SetupError>().is_none());
}
