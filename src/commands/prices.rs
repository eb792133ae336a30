use anyhow::Result;
use colored::Colorize;
use prebid_line_items::config;
use prebid_line_items::setup::SetupPlan;
use std::path::Path;

/// Execute the prices command
///
/// Prints the price points the configured buckets expand to
pub fn execute(path: &Path, all: bool) -> Result<()> {
    let cfg = config::load_config(path)?;
    let plan = SetupPlan::from_config(&cfg)?;

    println!(
        "{} {}",
        plan.line_item_count().to_string().bold(),
        "price points".cyan()
    );

    if all {
        for price in &plan.prices {
            println!("  {:>12}  {}", price.micro_amount, price.label());
        }
    } else {
        println!("  {}", plan.summary);
    }

    Ok(())
}
