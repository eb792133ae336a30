//! Settings loading and validation
//!
//! Settings come from a TOML file layered with `PREBID_SETUP__*` environment
//! overrides. They are first read into [`RawSettings`], where every field is
//! optional and loosely typed, then validated once into an immutable
//! [`SetupConfig`] that the rest of the program borrows. A missing required
//! key is a [`SetupError::MissingSetting`]; a key that is present but
//! malformed is a [`SetupError::BadSetting`].

use crate::error::{SetupError, SetupResult};
use crate::models::Size;
use crate::price_buckets::{PriceBucket, DEFAULT_PRECISION, MAX_PRECISION, MAX_PRICE_UNITS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

/// Environment variable prefix for overrides, e.g. `PREBID_SETUP__DFP__ORDER_NAME`
pub const ENV_PREFIX: &str = "PREBID_SETUP";

const DEFAULT_CURRENCY_CODE: &str = "USD";
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

const PRICE_BUCKETS_KEY: &str = "prebid.price_buckets";
const PRICE_BUCKETS_SHAPE: &str = "The setting \"prebid.price_buckets\" must be a list of price \
     buckets containing \"min\", \"max\", and \"increment\", and optionally \"precision\"";

// ============================================================
// Raw settings, as read from file and environment
// ============================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSettings {
    #[serde(default)]
    pub dfp: RawDfpSettings,
    #[serde(default)]
    pub prebid: RawPrebidSettings,
    #[serde(default)]
    pub ad_server: RawAdServerSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDfpSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertiser_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_placement_names: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeted_placement_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeted_ad_unit_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_sizes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_advertiser_if_does_not_exist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_existing_order_if_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_creatives_per_line_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_item_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_hb_size: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPrebidSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_buckets: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_precision: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAdServerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

// ============================================================
// Validated configuration
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SetupConfig {
    pub dfp: DfpSettings,
    pub prebid: PrebidSettings,
    pub ad_server: AdServerSettings,
}

/// What the line items target: placements or ad units, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryTarget {
    Placements(Vec<String>),
    AdUnits(Vec<String>),
}

impl InventoryTarget {
    pub fn names(&self) -> &[String] {
        match self {
            Self::Placements(names) | Self::AdUnits(names) => names,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Placements(_) => "placements",
            Self::AdUnits(_) => "ad_units",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DfpSettings {
    pub order_name: String,
    pub user_email_address: String,
    pub advertiser_name: String,
    pub inventory: InventoryTarget,
    pub sizes: Vec<Size>,
    pub create_advertiser_if_missing: bool,
    pub use_existing_order: bool,
    pub num_creatives: usize,
    /// Line items are named `{prefix}{price}` when set
    pub line_item_prefix: Option<String>,
    pub currency_code: String,
    pub target_hb_size: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrebidSettings {
    pub bidder_code: String,
    pub price_buckets: Vec<PriceBucket>,
    pub price_precision: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdServerSettings {
    pub base_url: String,
    pub network_code: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
}

// ============================================================
// Loading
// ============================================================

/// Load and validate settings from `path` plus environment overrides
pub fn load_config(path: &Path) -> anyhow::Result<SetupConfig> {
    let raw = load_raw_settings(path)?;
    Ok(raw.validate()?)
}

/// Read settings without validating them
pub fn load_raw_settings(path: &Path) -> anyhow::Result<RawSettings> {
    let settings = config::Config::builder()
        .add_source(config::File::new(
            &path.to_string_lossy(),
            config::FileFormat::Toml,
        ))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

impl RawSettings {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate everything up front; nothing downstream re-checks settings
    pub fn validate(&self) -> SetupResult<SetupConfig> {
        let dfp = validate_dfp(&self.dfp)?;
        let prebid = validate_prebid(&self.prebid)?;
        let ad_server = validate_ad_server(&self.ad_server)?;

        Ok(SetupConfig {
            dfp,
            prebid,
            ad_server,
        })
    }
}

fn validate_dfp(raw: &RawDfpSettings) -> SetupResult<DfpSettings> {
    let user_email_address = required_string(&raw.user_email_address, "dfp.user_email_address")?;
    let advertiser_name = required_string(&raw.advertiser_name, "dfp.advertiser_name")?;
    let order_name = required_string(&raw.order_name, "dfp.order_name")?;

    let inventory = if raw.use_placement_names.unwrap_or(false) {
        InventoryTarget::Placements(required_names(
            &raw.targeted_placement_names,
            "dfp.targeted_placement_names",
            "DFP placement name",
        )?)
    } else {
        InventoryTarget::AdUnits(required_names(
            &raw.targeted_ad_unit_names,
            "dfp.targeted_ad_unit_names",
            "DFP ad unit name",
        )?)
    };

    let sizes = parse_sizes(raw.placement_sizes.as_ref())?;

    // Each creative serves at most once per page, so default to one per targeted slot.
    let num_creatives = match raw.num_creatives_per_line_item {
        Some(n) if n > 0 => n as usize,
        _ => inventory.names().len(),
    };

    let line_item_prefix = raw
        .line_item_prefix
        .as_ref()
        .filter(|prefix| !prefix.is_empty())
        .cloned();

    let currency_code = raw
        .currency_code
        .clone()
        .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
    if currency_code.len() != 3 || !currency_code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(SetupError::BadSetting(format!(
            "The setting \"dfp.currency_code\" must be a three-letter ISO code, got \"{}\"",
            currency_code
        )));
    }

    Ok(DfpSettings {
        order_name,
        user_email_address,
        advertiser_name,
        inventory,
        sizes,
        create_advertiser_if_missing: raw.create_advertiser_if_does_not_exist.unwrap_or(false),
        use_existing_order: raw.use_existing_order_if_exists.unwrap_or(false),
        num_creatives,
        line_item_prefix,
        currency_code,
        target_hb_size: raw.target_hb_size.unwrap_or(false),
    })
}

fn validate_prebid(raw: &RawPrebidSettings) -> SetupResult<PrebidSettings> {
    let bidder_code = required_string(&raw.bidder_code, "prebid.bidder_code")?;

    let price_precision = match &raw.price_precision {
        Some(value) => parse_precision(value, "prebid.price_precision")?,
        None => DEFAULT_PRECISION,
    };

    let price_buckets = parse_price_buckets(raw.price_buckets.as_ref())?;

    Ok(PrebidSettings {
        bidder_code,
        price_buckets,
        price_precision,
    })
}

fn validate_ad_server(raw: &RawAdServerSettings) -> SetupResult<AdServerSettings> {
    let base_url = required_string(&raw.base_url, "ad_server.base_url")?;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(SetupError::BadSetting(format!(
            "The setting \"ad_server.base_url\" must be an http(s) URL, got \"{}\"",
            base_url
        )));
    }

    let timeout_seconds = raw.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout_seconds == 0 {
        return Err(SetupError::BadSetting(
            "The setting \"ad_server.timeout_seconds\" must be positive".to_string(),
        ));
    }

    Ok(AdServerSettings {
        base_url: base_url.trim_end_matches('/').to_string(),
        network_code: required_string(&raw.network_code, "ad_server.network_code")?,
        access_token: raw.access_token.clone().filter(|t| !t.is_empty()),
        timeout_seconds,
    })
}

// ============================================================
// Field validators
// ============================================================

fn required_string(value: &Option<String>, key: &str) -> SetupResult<String> {
    match value {
        None => Err(SetupError::MissingSetting(key.to_string())),
        Some(s) if s.trim().is_empty() => Err(SetupError::BadSetting(format!(
            "The setting \"{}\" must not be empty",
            key
        ))),
        Some(s) => Ok(s.clone()),
    }
}

fn required_names(value: &Option<Vec<String>>, key: &str, what: &str) -> SetupResult<Vec<String>> {
    match value {
        None => Err(SetupError::MissingSetting(key.to_string())),
        Some(names) if names.is_empty() => Err(SetupError::BadSetting(format!(
            "The setting \"{}\" must contain at least one {}.",
            key, what
        ))),
        Some(names) => Ok(names.clone()),
    }
}

/// Validate `prebid.price_buckets`.
///
/// Absent is a missing setting; present but empty, not a list, or with a
/// malformed entry is a bad setting.
pub fn parse_price_buckets(value: Option<&Value>) -> SetupResult<Vec<PriceBucket>> {
    let value = value.ok_or_else(|| SetupError::MissingSetting(PRICE_BUCKETS_KEY.to_string()))?;

    let entries = value
        .as_array()
        .ok_or_else(|| SetupError::BadSetting(PRICE_BUCKETS_SHAPE.to_string()))?;
    if entries.is_empty() {
        return Err(SetupError::BadSetting(format!(
            "The setting \"{}\" must contain at least one price bucket.",
            PRICE_BUCKETS_KEY
        )));
    }

    entries.iter().map(parse_price_bucket).collect()
}

fn parse_price_bucket(entry: &Value) -> SetupResult<PriceBucket> {
    let table = entry
        .as_object()
        .ok_or_else(|| SetupError::BadSetting(PRICE_BUCKETS_SHAPE.to_string()))?;

    let (Some(min), Some(max), Some(increment)) =
        (table.get("min"), table.get("max"), table.get("increment"))
    else {
        return Err(SetupError::BadSetting(format!(
            "The setting \"{}\" must contain keys \"min\", \"max\", and \"increment\".",
            PRICE_BUCKETS_KEY
        )));
    };

    let min = parse_bucket_number(min, "min")?;
    let max = parse_bucket_number(max, "max")?;
    let increment = parse_bucket_number(increment, "increment")?;

    if min.is_sign_negative() || max.is_sign_negative() {
        return Err(SetupError::BadSetting(format!(
            "The \"min\" and \"max\" keys in \"{}\" must not be negative.",
            PRICE_BUCKETS_KEY
        )));
    }
    if increment.is_sign_negative() && !increment.is_zero() {
        return Err(SetupError::BadSetting(format!(
            "The \"increment\" key in \"{}\" must not be negative.",
            PRICE_BUCKETS_KEY
        )));
    }

    let limit = Decimal::from(MAX_PRICE_UNITS);
    if min > limit || max > limit || increment > limit {
        return Err(SetupError::BadSetting(format!(
            "The \"min\", \"max\", and \"increment\" keys in \"{}\" must not exceed {}.",
            PRICE_BUCKETS_KEY, MAX_PRICE_UNITS
        )));
    }

    let mut bucket = PriceBucket::new(min, max, increment);
    if let Some(precision) = table.get("precision") {
        bucket.precision = Some(parse_precision(precision, "prebid.price_buckets.precision")?);
    }
    Ok(bucket)
}

fn parse_bucket_number(value: &Value, field: &str) -> SetupResult<Decimal> {
    let not_a_number = || {
        SetupError::BadSetting(format!(
            "The \"{}\" key in \"{}\" must be a number.",
            field, PRICE_BUCKETS_KEY
        ))
    };

    let Value::Number(number) = value else {
        return Err(not_a_number());
    };
    if let Some(i) = number.as_i64() {
        return Ok(Decimal::from(i));
    }
    // f64 Display is the shortest round-tripping form, so 0.01 stays 0.01
    let f = number.as_f64().ok_or_else(not_a_number)?;
    Decimal::from_str(&f.to_string()).map_err(|_| not_a_number())
}

fn parse_precision(value: &Value, key: &str) -> SetupResult<u32> {
    value
        .as_u64()
        .filter(|p| *p <= MAX_PRECISION as u64)
        .map(|p| p as u32)
        .ok_or_else(|| {
            SetupError::BadSetting(format!(
                "The setting \"{}\" must be an integer between 0 and {}.",
                key, MAX_PRECISION
            ))
        })
}

/// Validate `dfp.placement_sizes`: a non-empty list of `{ width, height }`.
/// Dimensions may be integers or numeric strings.
fn parse_sizes(value: Option<&Value>) -> SetupResult<Vec<Size>> {
    const KEY: &str = "dfp.placement_sizes";

    let value = value.ok_or_else(|| SetupError::MissingSetting(KEY.to_string()))?;
    let bad_shape = || {
        SetupError::BadSetting(format!(
            "The setting \"{}\" must be a list of objects with \"width\" and \"height\".",
            KEY
        ))
    };

    let entries = value.as_array().ok_or_else(bad_shape)?;
    if entries.is_empty() {
        return Err(SetupError::BadSetting(format!(
            "The setting \"{}\" must contain at least one size object.",
            KEY
        )));
    }

    entries
        .iter()
        .map(|entry| {
            let table = entry.as_object().ok_or_else(bad_shape)?;
            let width = table.get("width").and_then(parse_dimension).ok_or_else(bad_shape)?;
            let height = table.get("height").and_then(parse_dimension).ok_or_else(bad_shape)?;
            Ok(Size::new(width, height))
        })
        .collect()
}

fn parse_dimension(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}
