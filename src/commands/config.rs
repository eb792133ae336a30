use anyhow::Result;
use colored::Colorize;
use prebid_line_items::config::{self, RawSettings};
use prebid_line_items::logging::SensitiveToken;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the settings as read, with the access token masked
pub fn show(path: &Path) -> Result<()> {
    println!("{}", "Loading settings...".yellow());
    info!(path = %path.display(), "Loading settings for display");

    let raw = config::load_raw_settings(path)?;
    let sanitized = sanitize_secrets(&raw);

    println!("{}", "Current Settings:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(path: &Path) -> Result<()> {
    println!("{}", "Validating settings...".yellow());
    info!(path = %path.display(), "Validating settings file");

    let cfg = config::load_config(path)?;

    println!("{}", "✓ Settings are valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}", "Order".cyan(), cfg.dfp.order_name);
    println!("  {}: {}", "Advertiser".cyan(), cfg.dfp.advertiser_name);
    println!("  {}: {}", "Bidder".cyan(), cfg.prebid.bidder_code);
    println!(
        "  {}: {} ({})",
        "Inventory".cyan(),
        cfg.dfp.inventory.names().len(),
        cfg.dfp.inventory.label()
    );
    println!("  {}: {}", "Price Buckets".cyan(), cfg.prebid.price_buckets.len());
    println!("  {}: {}", "Creatives per Line Item".cyan(), cfg.dfp.num_creatives);
    println!("  {}: {}", "Ad Server".cyan(), cfg.ad_server.base_url);

    info!("Settings validation successful");
    Ok(())
}

fn sanitize_secrets(raw: &RawSettings) -> RawSettings {
    let mut sanitized = raw.clone();
    if let Some(token) = &raw.ad_server.access_token {
        sanitized.ad_server.access_token = Some(SensitiveToken::new(token).to_string());
    }
    sanitized
}
