//! Incremental diff detection on catalog pages
//!
//! A catalog page lists item summaries. In full mode every listed item is
//! returned. In incremental mode only items whose title is absent from the
//! known-titles set are returned, and the detail link is only resolved for
//! those, which saves a detail-page fetch per already-known item.
//!
//! The title block and the link block are adjacent but not nested on the
//! source markup, with whitespace text nodes in between, so resolution walks
//! forward through siblings until the first element node.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Selector for the title heading of each item summary
const TITLE_BLOCK: &str = "h1.bti.ml10";

/// Selector for the item blocks carrying the detail link in full mode
const ITEM_BLOCK: &str = "dt.fl";

/// Returns every item detail path on the page (full-harvest mode)
pub fn all_item_paths(document: &Html) -> Vec<String> {
    let Ok(block_selector) = Selector::parse(ITEM_BLOCK) else {
        return Vec::new();
    };

    document
        .select(&block_selector)
        .filter_map(embedded_href)
        .collect()
}

/// Returns the detail paths of items whose title is not yet known
/// (incremental mode)
pub fn new_item_paths(document: &Html, known_titles: &HashSet<String>) -> Vec<String> {
    let Ok(title_selector) = Selector::parse(TITLE_BLOCK) else {
        return Vec::new();
    };
    let Ok(dt_selector) = Selector::parse("dt") else {
        return Vec::new();
    };

    let mut paths = Vec::new();

    for title_block in document.select(&title_selector) {
        let title = title_block.text().collect::<String>().trim().to_string();
        if known_titles.contains(&title) {
            tracing::debug!("Skipping known title {:?}", title);
            continue;
        }

        // The link lives in the first element sibling after the title block;
        // text nodes in between are skipped.
        let Some(link_block) = title_block.next_siblings().find_map(ElementRef::wrap) else {
            tracing::debug!("No sibling block after title {:?}", title);
            continue;
        };

        let href = link_block
            .select(&dt_selector)
            .next()
            .and_then(embedded_href);

        match href {
            Some(path) => paths.push(path),
            None => tracing::debug!("No detail link in sibling block of {:?}", title),
        }
    }

    paths
}

/// First `a[href]` inside the given block
fn embedded_href(block: ElementRef) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    block
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
