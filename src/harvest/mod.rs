//! Harvest module for catalog walking and item processing
//!
//! This module contains the run orchestration, including:
//! - HTTP fetching with retry logic
//! - Incremental diff detection against known titles
//! - Per-item extraction and image caching
//! - The single end-of-run merge and persist

mod controller;
mod detector;
mod fetcher;

pub use controller::{Controller, ItemFailure, RunReport};
pub use detector::{all_item_paths, new_item_paths};
pub use fetcher::{build_http_client, fetch_catalog_page, fetch_detail_page};

use crate::config::Config;

/// Runs a complete harvest pass
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `full` - Ignore the prior dataset for discovery
///
/// # Returns
///
/// * `Ok(RunReport)` - Harvest completed
/// * `Err(HarvestError)` - Harvest failed
pub async fn harvest(config: Config, full: bool) -> crate::Result<RunReport> {
    let controller = Controller::new(config)?;
    controller.run(full).await
}
