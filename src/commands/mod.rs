//! Command implementations for the CLI
//!
//! - setup: Create the order, creatives and line items for a partner
//! - prices: Print the configured price ladder
//! - config: Settings display and validation

pub mod config;
pub mod prices;
pub mod setup;

use prebid_line_items::error::SetupError;
use std::path::Path;

/// Pointer back to the settings file when a command failed on its settings
pub fn settings_hint(err: &anyhow::Error, path: &Path) -> Option<String> {
    err.downcast_ref::<SetupError>()
        .filter(|err| err.is_settings_error())
        .map(|_| format!("Fix the settings in {} and run again.", path.display()))
}
