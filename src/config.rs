//! Generator configuration.

use crate::error::GeneratorError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How rendered events are written to the observation sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `Timestamp: ...` followed by one `Name: value` line per field
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// What `exit` does with the background loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExitMode {
    /// Signal the loop, join its thread, then exit
    #[default]
    Graceful,
    /// Terminate the process without waiting for the loop
    Immediate,
}

/// Generator configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Lower bound of the initial interval in ms (default: 4000)
    pub min_interval_ms: u64,
    /// Upper bound of the initial interval in ms (default: 4000)
    pub max_interval_ms: u64,
    /// Initial verbosity level (default: 1)
    pub verbosity_level: i32,
    /// Sink format (default: pretty)
    pub format: OutputFormat,
    /// Fixed RNG seed, OS entropy when unset
    pub seed: Option<u64>,
    /// Shutdown behaviour of `exit` (default: graceful)
    pub exit_mode: ExitMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 4000,
            max_interval_ms: 4000,
            verbosity_level: 1,
            format: OutputFormat::Pretty,
            seed: None,
            exit_mode: ExitMode::Graceful,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        validate_range(self.min_interval_ms, self.max_interval_ms)
    }
}

/// An interval range is usable when it is non-empty and strictly positive.
pub(crate) fn validate_range(min_ms: u64, max_ms: u64) -> Result<(), GeneratorError> {
    if min_ms > max_ms {
        return Err(GeneratorError::EmptyRange { min_ms, max_ms });
    }
    if min_ms == 0 {
        return Err(GeneratorError::ZeroInterval);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_interval_ms, 4000);
        assert_eq!(config.verbosity_level, 1);
        assert_eq!(config.exit_mode, ExitMode::Graceful);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(matches!(
            validate_range(5000, 4000),
            Err(GeneratorError::EmptyRange { min_ms: 5000, max_ms: 4000 })
        ));
        assert!(matches!(
            validate_range(0, 10),
            Err(GeneratorError::ZeroInterval)
        ));
        assert!(validate_range(1, 1).is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = GeneratorConfig {
            format: OutputFormat::Json,
            seed: Some(9),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"format\":\"json\""));

        let parsed: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.format, OutputFormat::Json);
        assert_eq!(parsed.seed, Some(9));
    }
}
