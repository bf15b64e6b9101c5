use crate::config::types::{CatalogConfig, Config, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_catalog_config(&config.catalog)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates catalog source configuration
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.hostname)
        .map_err(|e| ConfigError::Validation(format!("Invalid hostname: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "hostname must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.page_step == 0 {
        return Err(ConfigError::Validation(
            "page-step must be >= 1".to_string(),
        ));
    }

    if config.page_start % config.page_step != 0 {
        return Err(ConfigError::Validation(format!(
            "page-start ({}) must be a multiple of page-step ({})",
            config.page_start, config.page_step
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.save_path.is_empty() {
        return Err(ConfigError::Validation(
            "save-path cannot be empty".to_string(),
        ));
    }

    if config.img_dir.is_empty() {
        return Err(ConfigError::Validation(
            "img-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            catalog: CatalogConfig {
                hostname: "http://www.wineyun.com/".to_string(),
                page_start: 240,
                page_step: 40,
                request_delay_ms: 1000,
                retry_delay_ms: 5000,
            },
            output: OutputConfig {
                save_path: "./wineyun.csv".to_string(),
                img_dir: "./imgs".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_bad_hostname() {
        let mut config = valid_config();
        config.catalog.hostname = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = valid_config();
        config.catalog.hostname = "ftp://www.wineyun.com/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_page_step() {
        let mut config = valid_config();
        config.catalog.page_step = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_unaligned_page_start() {
        let mut config = valid_config();
        config.catalog.page_start = 230;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_save_path() {
        let mut config = valid_config();
        config.output.save_path = String::new();
        assert!(validate(&config).is_err());
    }
}
