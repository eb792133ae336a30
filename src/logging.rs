//! Logging setup and masking of secrets for display

use std::fmt;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};

/// Set `DISABLE_LOGGING=true` to silence all log output
pub const DISABLE_LOGGING_ENV: &str = "DISABLE_LOGGING";

/// Initialize tracing/logging
///
/// Honours `RUST_LOG`, defaulting to `info`. Can only be called once.
pub fn init_tracing() {
    let filter = if logging_disabled(std::env::var(DISABLE_LOGGING_ENV).ok().as_deref()) {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer::layer().with_target(false))
        .init();
}

fn logging_disabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Masked access token
///
/// Shows the first 6 characters followed by `***`
#[derive(Clone, Debug)]
pub struct SensitiveToken<'a> {
    inner: &'a str,
}

impl<'a> SensitiveToken<'a> {
    pub fn new(token: &'a str) -> Self {
        Self { inner: token }
    }
}

impl fmt::Display for SensitiveToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 6;
        match self.inner.get(..visible_len) {
            Some(prefix) if self.inner.len() > visible_len * 2 => write!(f, "{}***", prefix),
            // too short to show any of it
            _ => write!(f, "***"),
        }
    }
}
