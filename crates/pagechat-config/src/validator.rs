//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_engine(config, &mut result);
        Self::validate_cdp(config, &mut result);
        Self::validate_vendors(config, &mut result);

        result
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        let engine = &config.engine;

        if engine.readiness_interval_secs == 0 {
            result.add_error(ValidationError::new(
                "engine.readiness_interval_secs",
                "readiness_interval_secs must be greater than 0",
            ));
        }

        if engine.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "engine.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        if engine.readiness_deadline_secs == Some(0) {
            result.add_error(ValidationError::new(
                "engine.readiness_deadline_secs",
                "readiness_deadline_secs must be greater than 0 when set",
            ));
        }

        if engine.readiness_deadline_secs.is_none() {
            result.add_warning(ValidationWarning::new(
                "engine.readiness_deadline_secs",
                "no readiness deadline, initialization waits until the chat page is ready",
            ));
        }
    }

    fn validate_cdp(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.cdp.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "cdp.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }
    }

    fn validate_vendors(config: &Config, result: &mut ValidationResult) {
        if config.default_vendor.trim().is_empty() {
            result.add_error(ValidationError::new(
                "default_vendor",
                "default_vendor cannot be empty",
            ));
        }

        for (name, vendor) in &config.vendors {
            if vendor.completion_timeout_secs == Some(0) {
                result.add_error(ValidationError::new(
                    format!("vendors.{}.completion_timeout_secs", name),
                    "completion_timeout_secs must be greater than 0",
                ));
            }

            if vendor.submit_timeout_secs == Some(0) {
                result.add_error(ValidationError::new(
                    format!("vendors.{}.submit_timeout_secs", name),
                    "submit_timeout_secs must be greater than 0",
                ));
            }

            if let Some(ref url) = vendor.url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("vendors.{}.url", name),
                        "url must start with http:// or https://",
                    ));
                }
            }

            if vendor.dwell_ms == Some(0) {
                result.add_warning(ValidationWarning::new(
                    format!("vendors.{}.dwell_ms", name),
                    "a zero dwell may report completion before generation starts",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
