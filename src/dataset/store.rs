//! CSV dataset persistence and merge
//!
//! The dataset is one CSV file, one row per harvested item, sorted
//! descending by observation time. Loading tolerates a missing file (first
//! run); persisting writes a temp file next to the target and renames it
//! into place so a crashed run can never leave a half-written snapshot.

use crate::extract::ItemRecord;
use crate::{FieldValues, HarvestError};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Column order of the persisted dataset
pub const COLUMNS: [&str; 11] = [
    "title",
    "name",
    "region",
    "varietal",
    "type",
    "volume",
    "producer",
    "price",
    "detail_link",
    "image_ref",
    "observed_at",
];

/// On-disk timestamp format; lexical order matches chronological order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load/persist access to the dataset file
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the prior dataset
    ///
    /// # Returns
    ///
    /// * `Ok(Some(records))` - A prior snapshot exists and parsed cleanly
    /// * `Ok(None)` - No snapshot file; this is a first (full) harvest
    /// * `Err(HarvestError)` - The file exists but could not be parsed
    pub fn load(&self) -> crate::Result<Option<Vec<ItemRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();

        for (index, row) in reader.records().enumerate() {
            let row = row?;
            records.push(parse_row(index + 1, &row)?);
        }

        Ok(Some(records))
    }

    /// Persists the snapshot atomically (temp file + rename)
    pub fn persist(&self, records: &[ItemRecord]) -> crate::Result<()> {
        let tmp_path = self.path.with_extension("tmp");

        {
            let mut writer = csv::Writer::from_path(&tmp_path)?;
            writer.write_record(COLUMNS)?;
            for record in records {
                writer.write_record(record_row(record))?;
            }
            writer.flush()?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        tracing::info!(
            "Persisted {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Merges new records into the existing dataset
///
/// Upsert keyed by title: a new record replaces an existing one with the
/// same title (the collision is logged), so duplicate titles can never
/// accumulate. The result is sorted descending by `observed_at`; the sort
/// is stable for equal timestamps.
pub fn merge(existing: Vec<ItemRecord>, new_records: Vec<ItemRecord>) -> Vec<ItemRecord> {
    let mut merged = existing;

    for record in new_records {
        if let Some(slot) = merged.iter_mut().find(|r| r.title == record.title) {
            tracing::info!("Title collision on {:?}, replacing prior record", slot.title);
            *slot = record;
        } else {
            merged.push(record);
        }
    }

    merged.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
    merged
}

fn record_row(record: &ItemRecord) -> [String; 11] {
    [
        record.title.clone(),
        record.fields.name.clone(),
        record.fields.region.clone(),
        record.fields.varietal.clone(),
        record.fields.kind.clone(),
        record.fields.volume.clone(),
        record.producer.clone(),
        record.price.to_string(),
        record.detail_link.clone(),
        record.image_ref.clone(),
        record.observed_at.format(TIMESTAMP_FORMAT).to_string(),
    ]
}

fn parse_row(row_number: usize, row: &csv::StringRecord) -> crate::Result<ItemRecord> {
    if row.len() != COLUMNS.len() {
        return Err(HarvestError::DatasetRow {
            row: row_number,
            message: format!("expected {} columns, got {}", COLUMNS.len(), row.len()),
        });
    }

    let field = |i: usize| row[i].to_string();

    let price = row[7].parse::<f64>().map_err(|e| HarvestError::DatasetRow {
        row: row_number,
        message: format!("bad price {:?}: {}", &row[7], e),
    })?;

    let observed_at = NaiveDateTime::parse_from_str(&row[10], TIMESTAMP_FORMAT)
        .map_err(|e| HarvestError::DatasetRow {
            row: row_number,
            message: format!("bad timestamp {:?}: {}", &row[10], e),
        })?
        .and_utc();

    Ok(ItemRecord {
        title: field(0),
        fields: FieldValues {
            name: field(1),
            region: field(2),
            varietal: field(3),
            kind: field(4),
            volume: field(5),
        },
        producer: field(6),
        price,
        detail_link: field(8),
        image_ref: field(9),
        observed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(title: &str, hour: u32) -> ItemRecord {
        ItemRecord {
            title: title.to_string(),
            fields: FieldValues {
                name: format!("{} name", title),
                region: "Bordeaux".to_string(),
                varietal: "Merlot".to_string(),
                kind: "红葡萄酒".to_string(),
                volume: "750ml".to_string(),
            },
            producer: "Chateau Test".to_string(),
            price: 368.0,
            detail_link: format!("http://test/goods/{}", title),
            image_ref: format!(r#"=HYPERLINK("./imgs/{}.png", "{}.png")"#, title, title),
            observed_at: Utc.with_ymd_and_hms(2026, 8, 23, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::new(&dir.path().join("absent.csv"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_persist_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::new(&dir.path().join("wines.csv"));

        let records = vec![record("a", 10), record("b", 9)];
        store.persist(&records).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "a");
        assert_eq!(loaded[0].fields.volume, "750ml");
        assert_eq!(loaded[0].price, 368.0);
        assert_eq!(loaded[0].image_ref, records[0].image_ref);
        assert_eq!(loaded[0].observed_at, records[0].observed_at);
    }

    #[test]
    fn test_persist_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("wines.csv");
        let store = DatasetStore::new(&target);
        store.persist(&[record("a", 10)]).unwrap();

        assert!(target.exists());
        assert!(!target.with_extension("tmp").exists());
    }

    #[test]
    fn test_merge_orders_descending_by_observed_at() {
        let existing = vec![record("t1", 1), record("t3", 3)];
        let new_records = vec![record("t2", 2), record("t4", 4)];

        let merged = merge(existing, new_records);
        let titles: Vec<&str> = merged.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["t4", "t3", "t2", "t1"]);
    }

    #[test]
    fn test_merge_upserts_on_title_collision() {
        let existing = vec![record("dup", 1), record("other", 2)];
        let mut newer = record("dup", 5);
        newer.price = 999.0;

        let merged = merge(existing, vec![newer]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "dup");
        assert_eq!(merged[0].price, 999.0);
    }

    #[test]
    fn test_load_rejects_malformed_price() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("wines.csv");
        let mut content = COLUMNS.join(",");
        content.push_str("\nT,n,r,v,k,vol,p,not-a-price,link,img,2026-08-23 10:00:00\n");
        std::fs::write(&target, content).unwrap();

        let store = DatasetStore::new(&target);
        assert!(matches!(
            store.load(),
            Err(HarvestError::DatasetRow { row: 1, .. })
        ));
    }
}
