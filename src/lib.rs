pub mod ad_server;
pub mod config;
pub mod creatives;
pub mod error;
pub mod line_items;
pub mod logging;
pub mod models;
pub mod price_buckets;
pub mod setup;
pub mod targeting;

pub use logging::init_tracing;
