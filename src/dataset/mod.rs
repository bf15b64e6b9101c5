//! Dataset persistence module
//!
//! One CSV snapshot per catalog, loaded once at run start and written at
//! most once at run end. Merging is an upsert keyed by title.

mod store;

pub use store::{merge, DatasetStore, COLUMNS, TIMESTAMP_FORMAT};
