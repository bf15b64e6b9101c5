//! Tiered item extraction from detail pages
//!
//! Extraction runs in tiers. The table tier reads each attribute from a
//! labeled table cell (with one known synonym label for the varietal field).
//! When almost nothing resolves that way the page is assumed to be a
//! multi-product bundle and the bundle tier takes over: product names come
//! from the inline spans (or the first paragraph) of the wine section, and
//! the other attributes are recovered from labeled free text. Whatever is
//! still unresolved stays empty and is reported as a trouble field; only a
//! missing title or price fails the item.

use crate::extract::record::{ExtractedItem, Field, FieldValues, VALUE_SEPARATOR};
use crate::HarvestError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Bundle tier triggers when more than this many fields are unresolved
const BUNDLE_TRIGGER: usize = 4;

fn price_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"unitprice="(.*?)""#).expect("hard-coded regex"))
}

/// Extracts one item from a detail page
///
/// # Arguments
///
/// * `body` - Raw HTML of the detail page
/// * `detail_url` - Canonical URL of the page, used in diagnostics
///
/// # Returns
///
/// * `Ok(ExtractedItem)` - Extraction succeeded, possibly with trouble fields
/// * `Err(HarvestError)` - The title or price could not be extracted
pub fn extract_item(body: &str, detail_url: &str) -> crate::Result<ExtractedItem> {
    let document = Html::parse_document(body);

    let title = extract_title(&document).ok_or_else(|| HarvestError::MissingTitle {
        url: detail_url.to_string(),
    })?;

    // Price lives in an embedded attribute token, not in the visible layout.
    // Its absence is a hard failure: the record is useless downstream
    // without it.
    let price = extract_price(body, detail_url)?;

    let mut fields = FieldValues::default();
    let mut trouble: Vec<Field> = Vec::new();

    // Tier 1: labeled table cells
    for field in Field::ALL {
        match table_cell_value(&document, field) {
            Some(value) => fields.set(field, value),
            None => trouble.push(field),
        }
    }

    // Tier 2: the page is probably a bundle of several wines
    if trouble.len() > BUNDLE_TRIGGER {
        if let Some(section) = find_wine_section(&document) {
            apply_bundle_tier(section, &mut fields, &mut trouble);
        }
    }

    let mut unresolved: Vec<String> = trouble.iter().map(|f| f.column().to_string()).collect();

    let producer = match extract_producer(&document) {
        Some(name) => name,
        None => {
            unresolved.push("producer".to_string());
            String::new()
        }
    };

    let image_url = extract_image_url(&document);
    if image_url.is_none() {
        unresolved.push("image".to_string());
    }

    Ok(ExtractedItem {
        title,
        fields,
        producer,
        price,
        image_url,
        unresolved,
    })
}

/// Reads the page title from the document head
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("head title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Finds the embedded price token in the raw page body
fn extract_price(body: &str, detail_url: &str) -> crate::Result<f64> {
    let captures = price_pattern()
        .captures(body)
        .ok_or_else(|| HarvestError::MissingPrice {
            url: detail_url.to_string(),
        })?;

    let raw = captures[1].to_string();
    raw.parse::<f64>().map_err(|_| HarvestError::BadPrice {
        url: detail_url.to_string(),
        value: raw,
    })
}

/// Table tier: looks up a `td` whose text equals the field's label and reads
/// the adjacent cell. Retries with the synonym label where one exists.
fn table_cell_value(document: &Html, field: Field) -> Option<String> {
    labeled_cell_value(document, field.label())
        .or_else(|| field.synonym().and_then(|s| labeled_cell_value(document, s)))
}

fn labeled_cell_value(document: &Html, label: &str) -> Option<String> {
    let selector = Selector::parse("td").ok()?;

    let label_cell = document
        .select(&selector)
        .find(|td| td.text().collect::<String>().trim() == label)?;

    let value_cell = next_element_sibling(label_cell)?;
    Some(value_cell.text().collect::<String>().trim().to_string())
}

/// Walks forward through siblings, skipping non-element nodes
fn next_element_sibling(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn find_wine_section(document: &Html) -> Option<ElementRef> {
    let selector = Selector::parse("section#wine").ok()?;
    document.select(&selector).next()
}

/// Bundle tier: recovers the name from inline spans (or the first paragraph)
/// of the wine section, and the other fields from labeled free text.
fn apply_bundle_tier(section: ElementRef, fields: &mut FieldValues, trouble: &mut Vec<Field>) {
    if let Some(name) = bundle_name(section) {
        fields.set(Field::Name, name);
        trouble.retain(|f| *f != Field::Name);
    }

    let section_text = section.text().collect::<String>();
    for field in Field::ALL.iter().skip(1).copied() {
        if let Some(value) = labeled_text_values(&section_text, field.label()) {
            fields.set(field, value);
            trouble.retain(|f| *f != field);
        }
    }
}

/// Resolves the combined product name inside a bundle section
///
/// Prefers the inline spans (one per product, joined with the fixed
/// separator) and falls back to the first paragraph. Some bundle pages are
/// one undivided block with neither; those leave the name unresolved.
fn bundle_name(section: ElementRef) -> Option<String> {
    if let Ok(span_selector) = Selector::parse("span") {
        let names: Vec<String> = section
            .select(&span_selector)
            .map(collapsed_text)
            .collect();
        if !names.is_empty() {
            return Some(names.join(VALUE_SEPARATOR));
        }
    }

    let p_selector = Selector::parse("p").ok()?;
    section.select(&p_selector).next().map(collapsed_text)
}

/// Scans free text for `<label>：<value>` lines; multiple matches join with
/// the fixed separator
fn labeled_text_values(text: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!("{}：(.*?)\n", regex::escape(label))).ok()?;

    let values: Vec<&str> = re
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(VALUE_SEPARATOR))
    }
}

/// Reads the producer name from the winery section, if present
fn extract_producer(document: &Html) -> Option<String> {
    let section_selector = Selector::parse("section#winery").ok()?;
    let link_selector = Selector::parse(r#"a[target="_blank"]"#).ok()?;

    let section = document.select(&section_selector).next()?;
    section
        .select(&link_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

/// Reads the image URL from the fixed image-identifier element
fn extract_image_url(document: &Html) -> Option<String> {
    let selector = Selector::parse("img#showimgurl0").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(|src| src.to_string())
}

/// Element text with newlines collapsed to spaces and ends trimmed
fn collapsed_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\n', " ")
        .trim()
        .to_string()
}
