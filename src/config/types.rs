use serde::Deserialize;

/// Main configuration structure for Cuvée
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

/// Catalog source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the paginated catalog
    pub hostname: String,

    /// Highest page token; the harvest walks it down to 0
    #[serde(rename = "page-start", default = "default_page_start")]
    pub page_start: u32,

    /// Page token decrement per catalog page
    #[serde(rename = "page-step", default = "default_page_step")]
    pub page_step: u32,

    /// Delay between item detail fetches (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Delay between retry attempts for a failed fetch (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV dataset file
    #[serde(rename = "save-path")]
    pub save_path: String,

    /// Directory for cached item images
    #[serde(rename = "img-dir")]
    pub img_dir: String,
}

fn default_page_start() -> u32 {
    240
}

fn default_page_step() -> u32 {
    40
}

fn default_request_delay() -> u64 {
    1000
}

fn default_retry_delay() -> u64 {
    5000
}

impl CatalogConfig {
    /// Returns the descending page token sequence for one harvest pass.
    ///
    /// With `page_start = 240` and `page_step = 40` this yields
    /// `[240, 200, 160, 120, 80, 40, 0]`. Page 0 is always last and is
    /// fetched with a plain GET; the others carry a POST page token.
    pub fn page_sequence(&self) -> Vec<u32> {
        let mut pages = Vec::new();
        let mut token = self.page_start;
        loop {
            pages.push(token);
            if token < self.page_step {
                break;
            }
            token -= self.page_step;
        }
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(start: u32, step: u32) -> CatalogConfig {
        CatalogConfig {
            hostname: "http://catalog.test/".to_string(),
            page_start: start,
            page_step: step,
            request_delay_ms: 0,
            retry_delay_ms: 0,
        }
    }

    #[test]
    fn test_page_sequence_default_bounds() {
        let pages = catalog(240, 40).page_sequence();
        assert_eq!(pages, vec![240, 200, 160, 120, 80, 40, 0]);
    }

    #[test]
    fn test_page_sequence_single_page() {
        let pages = catalog(0, 40).page_sequence();
        assert_eq!(pages, vec![0]);
    }
}
