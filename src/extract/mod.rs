//! Item extraction module
//!
//! Turns a detail-page document into an [`ExtractedItem`] using the tiered
//! fallback algorithm, and defines the record types the rest of the crate
//! works with.

mod extractor;
mod record;

pub use extractor::extract_item;
pub use record::{ExtractedItem, Field, FieldValues, ItemRecord, VALUE_SEPARATOR};
