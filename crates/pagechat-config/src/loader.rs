//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;
use crate::validator::ConfigValidator;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    ///
    /// The first validation error, if any, is returned as
    /// [`ConfigError::InvalidValue`].
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;

        let result = ConfigValidator::validate(&config);
        if let Some(error) = result.errors.into_iter().next() {
            return Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            });
        }

        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.engine.readiness_interval_secs, 5);
        assert_eq!(config.default_vendor, "duckduckgo");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            default_vendor = "gemini"

            [engine]
            readiness_interval_secs = 2
            readiness_deadline_secs = 600
            poll_interval_ms = 100

            [cdp]
            endpoint = "http://localhost:9333"

            [vendors.gemini]
            completion_timeout_secs = 1000
            url = "https://gemini.google.com/app"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.default_vendor, "gemini");
        assert_eq!(config.engine.readiness_interval_secs, 2);
        assert_eq!(config.engine.readiness_deadline_secs, Some(600));
        assert_eq!(config.cdp.endpoint, "http://localhost:9333");
        let gemini = &config.vendors["gemini"];
        assert_eq!(gemini.completion_timeout_secs, Some(1000));
        assert!(gemini.submit_timeout_secs.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[engine]").unwrap();
        writeln!(file, "paste_settle_ms = 900").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.engine.paste_settle_ms, 900);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/pagechat.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("engine = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let content = r#"
            [engine]
            poll_interval_ms = 0
        "#;
        let err = ConfigLoader::load_str(content).unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "engine.poll_interval_ms"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: unique test-only variable name
        unsafe {
            std::env::set_var("PAGECHAT_TEST_ENDPOINT", "http://10.0.0.5:9222");
        }
        let content = "[cdp]\nendpoint = \"${PAGECHAT_TEST_ENDPOINT}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.cdp.endpoint, "http://10.0.0.5:9222");
        unsafe {
            std::env::remove_var("PAGECHAT_TEST_ENDPOINT");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "default_vendor = \"${PAGECHAT_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "default_vendor = \"kimi\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }
}
