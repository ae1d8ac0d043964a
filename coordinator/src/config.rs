use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainingError};

/// Recognized training options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Synchronize after every single local iteration instead of once per
    /// pass. Trades communication overhead for tighter consistency.
    pub average_each_iteration: bool,

    /// Learn by summing per-partition gradients into the previous global
    /// parameters instead of averaging re-trained parameter vectors.
    pub accumulate_gradient: bool,

    /// Normalize the accumulated gradient by the partition count. Only
    /// meaningful together with `accumulate_gradient`.
    pub divide_accumulated_gradient: bool,

    /// Number of parallel compute partitions per round.
    pub partitions: NonZeroUsize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            average_each_iteration: false,
            accumulate_gradient: false,
            divide_accumulated_gradient: false,
            partitions: NonZeroUsize::MIN,
        }
    }
}

impl TrainingConfig {
    /// Checks option consistency.
    ///
    /// # Errors
    /// Returns `TrainingError::InvalidConfig` for contradictory options.
    pub fn validate(&self) -> Result<()> {
        if self.divide_accumulated_gradient && !self.accumulate_gradient {
            return Err(TrainingError::InvalidConfig(
                "divide_accumulated_gradient requires accumulate_gradient".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns `TrainingError::InvalidConfig` if the JSON cannot be parsed or
    /// the options are contradictory.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TrainingError::InvalidConfig(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_averaging_with_one_partition() {
        let config = TrainingConfig::default();
        assert!(!config.average_each_iteration);
        assert!(!config.accumulate_gradient);
        assert!(!config.divide_accumulated_gradient);
        assert_eq!(config.partitions.get(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn divide_without_accumulate_is_rejected() {
        let config = TrainingConfig {
            divide_accumulated_gradient: true,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let config = TrainingConfig::from_json(
            r#"{"accumulate_gradient": true, "divide_accumulated_gradient": true, "partitions": 8}"#,
        )
        .unwrap();
        assert!(config.accumulate_gradient);
        assert!(config.divide_accumulated_gradient);
        assert_eq!(config.partitions.get(), 8);
    }

    #[test]
    fn malformed_json_fails_fast() {
        assert!(TrainingConfig::from_json("{nope").is_err());
        assert!(TrainingConfig::from_json(r#"{"partitions": 0}"#).is_err());
    }
}
