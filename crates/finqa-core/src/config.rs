use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::validation::ValidationRules;

pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;

/// Form behavior settings, loadable from JSON.
///
/// Missing keys fall back to their defaults:
///
/// ```json
/// { "submitDelayMs": 250, "requireComplete": true, "rules": { "dedupePii": false } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    pub rules: ValidationRules,
    /// Simulated latency between hand-off and form reset
    pub submit_delay_ms: u64,
    /// Block submission while any input is empty (the markup's `required`)
    pub require_complete: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            rules: ValidationRules::default(),
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            require_complete: false,
        }
    }
}

impl FormConfig {
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let config: FormConfig =
            serde_json::from_str(json).map_err(|e| FormError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.rules.sec_link_prefix.is_empty() {
            return Err(FormError::Config("secLinkPrefix must not be empty".to_string()));
        }
        if self.rules.min_text_length == 0 {
            return Err(FormError::Config("minTextLength must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(FormConfig::from_json("{}").unwrap(), FormConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            FormConfig::from_json(r#"{"submitDelayMs": 250, "rules": {"dedupePii": false}}"#)
                .unwrap();
        assert_eq!(config.submit_delay(), Duration::from_millis(250));
        assert!(!config.rules.dedupe_pii);
        assert_eq!(config.rules.min_text_length, 10);
        assert!(!config.require_complete);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            FormConfig::from_json(r#"{"rules": {"secLinkPrefix": ""}}"#),
            Err(FormError::Config(_))
        ));
        assert!(matches!(
            FormConfig::from_json(r#"{"rules": {"minTextLength": 0}}"#),
            Err(FormError::Config(_))
        ));
        assert!(matches!(
            FormConfig::from_json("not json"),
            Err(FormError::Config(_))
        ));
    }
}
