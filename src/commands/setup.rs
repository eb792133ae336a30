use anyhow::Result;
use colored::Colorize;
use prebid_line_items::ad_server::HttpAdServer;
use prebid_line_items::config::{self, SetupConfig};
use prebid_line_items::setup::{setup_partner, SetupPlan};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::info;

/// Execute the setup command
///
/// Validates the settings, shows what will be created and asks for
/// confirmation before touching the ad server.
pub async fn execute(path: &Path, assume_yes: bool) -> Result<()> {
    let cfg = config::load_config(path)?;
    let plan = SetupPlan::from_config(&cfg)?;

    print_plan(&cfg, &plan);

    if !assume_yes && !confirm("Is this correct? (y/n)")? {
        println!("Exiting.");
        return Ok(());
    }

    let server = HttpAdServer::new(&cfg.ad_server)?;
    let report = setup_partner(&server, &cfg, &plan).await?;
    info!(
        order_id = report.order_id,
        line_items = report.line_item_ids.len(),
        creatives = report.creative_ids.len(),
        "Setup finished"
    );

    println!();
    println!("{}", "Done!".green().bold());
    println!(
        "Please review your order, line items, and creatives to make sure they are correct. \
         Then, approve the order in Ad Manager."
    );
    println!();
    println!("Happy bidding!");
    Ok(())
}

fn print_plan(cfg: &SetupConfig, plan: &SetupPlan) {
    println!();
    println!(
        "Going to create {} new line items.",
        plan.line_item_count().to_string().bold()
    );
    println!("  {}: {}", "Order".bold(), cfg.dfp.order_name.blue());
    println!("  {}: {}", "Advertiser".bold(), cfg.dfp.advertiser_name.blue());
    println!();
    println!("Line items will have targeting:");
    println!("  {} = {}", "hb_pb".bold(), plan.summary.blue());
    println!("  {} = {}", "hb_bidder".bold(), cfg.prebid.bidder_code.blue());
    println!(
        "  {} = {}",
        cfg.dfp.inventory.label().bold(),
        cfg.dfp.inventory.names().join(", ").blue()
    );
    if cfg.dfp.target_hb_size {
        let sizes: Vec<String> = cfg.dfp.sizes.iter().map(|s| s.to_string()).collect();
        println!("  {} = {}", "hb_size".bold(), sizes.join(", ").blue());
    }
    println!();
}

fn confirm(prompt: &str) -> Result<bool> {
    println!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Only an explicit `y` proceeds
fn is_yes(answer: &str) -> bool {
    answer.trim() == "y"
}
