//! Harvest controller - main run orchestration
//!
//! One run walks the descending page sequence, diffs each catalog page
//! against the titles already in the dataset, extracts every new item,
//! caches its image, and merges the accumulated records into the persisted
//! snapshot exactly once at the end. Item fetches are strictly sequential
//! with a fixed delay in between to bound the request rate on the source.

use crate::assets::AssetStore;
use crate::config::Config;
use crate::dataset::{merge, DatasetStore};
use crate::extract::{extract_item, ItemRecord};
use crate::harvest::detector::{all_item_paths, new_item_paths};
use crate::harvest::fetcher::{build_http_client, fetch_catalog_page, fetch_detail_page};
use chrono::Utc;
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// A per-item hard failure recorded in the run report
#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of one harvest run
#[derive(Debug)]
pub struct RunReport {
    /// Number of records accumulated and merged this run
    pub new_records: usize,

    /// Items that hard-failed (missing price/title, fetch exhausted)
    pub failures: Vec<ItemFailure>,

    /// Whether the dataset file was rewritten
    pub updated: bool,
}

/// Main harvest controller
pub struct Controller {
    config: Config,
    client: Client,
    store: DatasetStore,
    assets: AssetStore,
}

impl Controller {
    /// Creates a controller, opening the asset directory and dataset store
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client()?;
        let store = DatasetStore::new(Path::new(&config.output.save_path));
        let assets = AssetStore::new(Path::new(&config.output.img_dir))?;

        Ok(Self {
            config,
            client,
            store,
            assets,
        })
    }

    /// Runs one harvest pass
    ///
    /// # Arguments
    ///
    /// * `full` - Ignore the prior dataset for discovery and re-walk every
    ///   item on every page. The merge still upserts by title, so a full
    ///   pass refreshes rather than duplicates.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run completed; per-item failures are in the
    ///   report, not errors
    /// * `Err(HarvestError)` - Loading or persisting the dataset failed
    pub async fn run(&self, full: bool) -> crate::Result<RunReport> {
        let prior = self.store.load()?;
        let incremental = prior.is_some() && !full;
        let existing = prior.unwrap_or_default();
        let known_titles: HashSet<String> = existing.iter().map(|r| r.title.clone()).collect();

        tracing::info!(
            "Starting {} harvest against {} ({} known titles)",
            if incremental { "incremental" } else { "full" },
            self.config.catalog.hostname,
            known_titles.len()
        );

        let retry_delay = Duration::from_millis(self.config.catalog.retry_delay_ms);
        let item_delay = Duration::from_millis(self.config.catalog.request_delay_ms);
        let hostname = self.config.catalog.hostname.trim_end_matches('/');

        let mut accumulated: Vec<ItemRecord> = Vec::new();
        let mut failures: Vec<ItemFailure> = Vec::new();

        for page in self.config.catalog.page_sequence() {
            let body = match fetch_catalog_page(
                &self.client,
                &self.config.catalog.hostname,
                page,
                retry_delay,
            )
            .await
            {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Skipping catalog page {}: {}", page, e);
                    continue;
                }
            };

            let paths = {
                let document = Html::parse_document(&body);
                if incremental {
                    new_item_paths(&document, &known_titles)
                } else {
                    all_item_paths(&document)
                }
            };

            if paths.is_empty() {
                tracing::debug!("Page {}: nothing new", page);
                continue;
            }
            tracing::info!("Page {}: {} new item(s)", page, paths.len());

            for path in paths {
                let url = format!("{}/{}", hostname, path.trim_start_matches('/'));

                match self.process_item(&url, retry_delay).await {
                    Ok(record) => {
                        tracing::info!("Harvested {:?} at {}", record.title, record.price);
                        accumulated.push(record);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping item {}: {}", url, e);
                        failures.push(ItemFailure {
                            url: url.clone(),
                            reason: e.to_string(),
                        });
                    }
                }

                // Fixed inter-request throttle against the source
                tokio::time::sleep(item_delay).await;
            }
        }

        let updated = !accumulated.is_empty();
        let new_records = accumulated.len();

        if updated {
            let merged = merge(existing, accumulated);
            self.store.persist(&merged)?;
        } else {
            tracing::info!("No new records, dataset left untouched");
        }

        for failure in &failures {
            tracing::warn!("Failed item {}: {}", failure.url, failure.reason);
        }

        tracing::info!(
            "Harvest complete: {} new record(s), {} failure(s)",
            new_records,
            failures.len()
        );

        Ok(RunReport {
            new_records,
            failures,
            updated,
        })
    }

    /// Fetches, extracts, and completes one item record
    async fn process_item(&self, url: &str, retry_delay: Duration) -> crate::Result<ItemRecord> {
        let body = fetch_detail_page(&self.client, url, retry_delay).await?;
        let extracted = extract_item(&body, url)?;

        let item_id = url.rsplit('/').next().unwrap_or(url);
        let mut unresolved = extracted.unresolved;

        let image_ref = match &extracted.image_url {
            Some(image_url) => match self.assets.ensure(&self.client, image_url, item_id).await {
                Ok(path) => format!(
                    r#"=HYPERLINK("{}", "{}")"#,
                    path.display(),
                    self.assets.label_for(item_id)
                ),
                Err(e) => {
                    // Image retrieval is soft; the record still goes out
                    tracing::warn!("Image fetch failed for {}: {}", url, e);
                    unresolved.push("image".to_string());
                    String::new()
                }
            },
            None => String::new(),
        };

        if !unresolved.is_empty() {
            tracing::warn!(
                "Trouble fields ({}) for {:?} at {}",
                unresolved.join(" "),
                extracted.title,
                url
            );
        }

        Ok(ItemRecord {
            title: extracted.title,
            fields: extracted.fields,
            producer: extracted.producer,
            price: extracted.price,
            detail_link: url.to_string(),
            image_ref,
            observed_at: Utc::now(),
        })
    }
}
