use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use thiserror::Error;

/// Per-source trust coefficients used for weighted averaging.
///
/// Both lie in `[0, 1]`. They need not sum to 1: the engine normalizes
/// by dividing by their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    pub source1: f64,
    pub source2: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("source weight {0} is outside the allowed range [0, 1]")]
    OutOfRange(f64),
    #[error("source weights must not both be zero")]
    ZeroSum,
}

impl SourceWeights {
    pub fn new(source1: f64, source2: f64) -> Result<Self, WeightError> {
        for weight in [source1, source2] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(WeightError::OutOfRange(weight));
            }
        }
        if source1 + source2 == 0.0 {
            return Err(WeightError::ZeroSum);
        }

        Ok(Self { source1, source2 })
    }
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self { source1: 0.5, source2: 0.5 }
    }
}

/// Absolute-difference limits beyond which two sources are flagged as
/// disagreeing on a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierThresholds {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Default for OutlierThresholds {
    fn default() -> Self {
        Self { temperature: 5.0, humidity: 30.0, pressure: 50.0 }
    }
}

/// Per-field tolerances within which two sources still count as
/// agreeing when the confidence score is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementTolerances {
    pub temperature: f64,
    pub wind: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Default for AgreementTolerances {
    fn default() -> Self {
        Self { temperature: 2.0, wind: 3.0, humidity: 15.0, pressure: 20.0 }
    }
}

/// Top-level engine configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weights]
/// source1 = 0.7
/// source2 = 0.3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub weights: SourceWeights,
    pub outliers: OutlierThresholds,
    pub agreement: AgreementTolerances,
}

impl ReconcilerConfig {
    /// Check invariants that the serde representation cannot enforce.
    pub fn validate(&self) -> Result<()> {
        SourceWeights::new(self.weights.source1, self.weights.source2)
            .map(|_| ())
            .map_err(anyhow::Error::from)
    }

    /// Load config from disk, or return the built-in defaults if the
    /// file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ReconcilerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-report", "weather-report")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
