//! Record types for harvested items
//!
//! The attribute schema is fixed: five fields read from the detail page's
//! attribute table (or recovered from bundle free text), plus producer,
//! price, link, image reference, and the observation timestamp. The schema
//! is a fixed-shape struct rather than an open map so the persisted column
//! set is guaranteed.

use chrono::{DateTime, Utc};

/// Separator used when the bundle tier joins multiple values for one field
pub const VALUE_SEPARATOR: &str = " && ";

/// The five fixed attribute fields extracted per item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Region,
    Varietal,
    Kind,
    Volume,
}

impl Field {
    /// All fields, in extraction and column order
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Region,
        Field::Varietal,
        Field::Kind,
        Field::Volume,
    ];

    /// Canonical label of the table cell on the source site
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "品名",
            Field::Region => "产区",
            Field::Varietal => "品种",
            Field::Kind => "类型",
            Field::Volume => "容量",
        }
    }

    /// Known synonym label, where the source uses an alternate cell text
    pub fn synonym(self) -> Option<&'static str> {
        match self {
            Field::Varietal => Some("种类"),
            _ => None,
        }
    }

    /// Column name in the persisted dataset
    pub fn column(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Region => "region",
            Field::Varietal => "varietal",
            Field::Kind => "type",
            Field::Volume => "volume",
        }
    }
}

/// Values for the fixed attribute fields; empty string = unresolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub name: String,
    pub region: String,
    pub varietal: String,
    pub kind: String,
    pub volume: String,
}

impl FieldValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Region => &self.region,
            Field::Varietal => &self.varietal,
            Field::Kind => &self.kind,
            Field::Volume => &self.volume,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Region => self.region = value,
            Field::Varietal => self.varietal = value,
            Field::Kind => self.kind = value,
            Field::Volume => self.volume = value,
        }
    }
}

/// One harvested item, immutable once built
#[derive(Debug, Clone)]
pub struct ItemRecord {
    /// Page title, the best-effort dedup key
    pub title: String,

    /// The fixed attribute schema
    pub fields: FieldValues,

    /// Producer/winery name; empty if unresolved
    pub producer: String,

    /// Unit price; extraction fails hard without it
    pub price: f64,

    /// Canonical detail-page URL
    pub detail_link: String,

    /// Spreadsheet hyperlink cell pointing at the cached image; empty on
    /// soft image failure
    pub image_ref: String,

    /// Extraction time
    pub observed_at: DateTime<Utc>,
}

/// Extractor output before the controller completes it into an [`ItemRecord`]
#[derive(Debug, Clone)]
pub struct ExtractedItem {
    pub title: String,
    pub fields: FieldValues,
    pub producer: String,
    pub price: f64,

    /// Source URL of the item image, if the page exposes one
    pub image_url: Option<String>,

    /// Names of the fields no tier could resolve ("trouble" fields)
    pub unresolved: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_labels_and_columns() {
        assert_eq!(Field::Name.label(), "品名");
        assert_eq!(Field::Kind.column(), "type");
        assert_eq!(Field::Varietal.synonym(), Some("种类"));
        assert_eq!(Field::Region.synonym(), None);
    }

    #[test]
    fn test_field_values_roundtrip() {
        let mut values = FieldValues::default();
        for field in Field::ALL {
            assert_eq!(values.get(field), "");
        }
        values.set(Field::Volume, "750ml".to_string());
        assert_eq!(values.get(Field::Volume), "750ml");
        assert_eq!(values.volume, "750ml");
    }
}
