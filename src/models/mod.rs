//! Request and response types for the ad server API
//!
//! Field names follow the Ad Manager object model (camelCase on the wire).

pub mod creative;
pub mod inventory;
pub mod line_item;
pub mod targeting;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ad server object id
pub type ObjectId = i64;

/// Creative or placeholder size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Currency amount in micros
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub micro_amount: i64,
}
