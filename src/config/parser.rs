use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use cuvee::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Catalog: {}", config.catalog.hostname);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[catalog]
hostname = "http://www.wineyun.com/"
page-start = 240
page-step = 40
request-delay-ms = 1000
retry-delay-ms = 5000

[output]
save-path = "./wineyun.csv"
img-dir = "./imgs"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.catalog.hostname, "http://www.wineyun.com/");
        assert_eq!(config.catalog.page_start, 240);
        assert_eq!(config.catalog.page_step, 40);
        assert_eq!(config.output.save_path, "./wineyun.csv");
    }

    #[test]
    fn test_defaults_applied_when_omitted() {
        let config_content = r#"
[catalog]
hostname = "http://www.wineyun.com/"

[output]
save-path = "./wineyun.csv"
img-dir = "./imgs"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.catalog.page_start, 240);
        assert_eq!(config.catalog.page_step, 40);
        assert_eq!(config.catalog.request_delay_ms, 1000);
        assert_eq!(config.catalog.retry_delay_ms, 5000);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[catalog]
hostname = "http://www.wineyun.com/"
page-step = 0

[output]
save-path = "./wineyun.csv"
img-dir = "./imgs"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
