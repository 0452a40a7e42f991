// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Tunables for one pipeline run. Worker counts and chunk sizes bound
/// resource use only; they never change the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Size of the mapper pool
    pub map_workers: usize,
    /// Size of the reducer pool
    pub reduce_workers: usize,
    /// Shortest key (in characters) that survives ranking
    pub min_key_length: usize,
    /// Maximum number of ranked entries
    pub top_n: usize,
    /// Inputs per map assignment
    pub partition_size: usize,
    /// Buckets per reduce assignment
    pub keys_per_reducer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            map_workers: 8,
            reduce_workers: 8,
            min_key_length: 6,
            top_n: 10,
            partition_size: 1024,
            keys_per_reducer: 64,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("map_workers", self.map_workers),
            ("reduce_workers", self.reduce_workers),
            ("partition_size", self.partition_size),
            ("keys_per_reducer", self.keys_per_reducer),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1",
                });
            }
        }
        Ok(())
    }

    pub fn print_summary(&self) {
        info!(
            map_workers = self.map_workers,
            reduce_workers = self.reduce_workers,
            partition_size = self.partition_size,
            keys_per_reducer = self.keys_per_reducer,
            min_key_length = self.min_key_length,
            top_n = self.top_n,
            "pipeline configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.map_workers, 8);
        assert_eq!(config.reduce_workers, 8);
        assert_eq!(config.min_key_length, 6);
        assert_eq!(config.top_n, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PipelineConfig {
            reduce_workers: 0,
            ..PipelineConfig::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "reduce_workers"),
            other => panic!("expected invalid reduce_workers, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_top_n_and_min_length_allowed() {
        let config = PipelineConfig {
            top_n: 0,
            min_key_length: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "map_workers": 12, "top_n": 3 }}"#).unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.map_workers, 12);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.reduce_workers, 8);
        assert_eq!(config.min_key_length, 6);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "num_mappers": 12 }}"#).unwrap();

        assert!(matches!(
            PipelineConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            PipelineConfig::load("/definitely/not/here/config.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
