use chrono::format::{Item, StrftimeItems};

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Template and output extensions are non-empty and start with '.'
/// - Render subfolder is a single non-empty path component
/// - Date format is non-empty and a valid chrono format string
/// - Input delimiter is a single ASCII character other than a quote or newline
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let delimiter = config.input.delimiter;
    if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
        return Err(ConfigError::ValidationError(format!(
            "input.delimiter must be a single ASCII character, got {:?}",
            delimiter
        )));
    }

    check_extension("templates.extension", &config.templates.extension)?;
    check_extension("output.extension", &config.output.extension)?;

    let subfolder = config.render.subfolder.trim();
    if subfolder.is_empty() || subfolder.contains(['/', '\\']) || subfolder == ".." {
        return Err(ConfigError::ValidationError(format!(
            "render.subfolder must be a plain folder name, got {:?}",
            config.render.subfolder
        )));
    }

    if config.output.date_format.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.date_format cannot be empty".to_string(),
        ));
    }
    if StrftimeItems::new(&config.output.date_format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::ValidationError(format!(
            "output.date_format is not a valid date format: {:?}",
            config.output.date_format
        )));
    }

    Ok(())
}

fn check_extension(key: &str, extension: &str) -> Result<(), ConfigError> {
    if extension.len() < 2 || !extension.starts_with('.') {
        return Err(ConfigError::ValidationError(format!(
            "{} must look like \".dxf\", got {:?}",
            key, extension
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_extension_without_dot_fails() {
        let mut config = Config::default();
        config.templates.extension = "dxf".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_output_extension_fails() {
        let mut config = Config::default();
        config.output.extension = ".".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nested_render_subfolder_fails() {
        let mut config = Config::default();
        config.render.subfolder = "out/pdf".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_date_format_fails() {
        let mut config = Config::default();
        config.output.date_format = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_date_format_fails() {
        let mut config = Config::default();
        config.output.date_format = "%d/%m/%".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_ascii_delimiter_fails() {
        let mut config = Config::default();
        config.input.delimiter = '§';
        assert!(validate_config(&config).is_err());

        config.input.delimiter = ',';
        assert!(validate_config(&config).is_ok());
    }
}
