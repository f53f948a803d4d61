//! Configuration management for shutterguard
//!
//! Thresholds and cadences for motion debouncing, frame analysis and capture
//! polling, loaded from and saved to TOML.

use crate::capture::CaptureOrchestrator;
use crate::errors::GateError;
use crate::motion::MotionTracker;
use crate::quality::{BlurAnalyzer, BrightnessAnalyzer, FrameAnalyzer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub motion: MotionConfig,
    pub brightness: BrightnessConfig,
    pub blur: BlurConfig,
    pub capture: CaptureConfig,
}

/// Motion debounce configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Linear acceleration magnitude above which the device is moving
    pub threshold: f64,
    /// How long stillness must persist before it is trusted (ms)
    pub still_debounce_ms: u64,
}

/// Darkness detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessConfig {
    /// Analyze every Nth pixel
    pub sample_stride: usize,
    /// Mean RGB value below which a pixel is dark (0-255)
    pub dark_threshold: f64,
    /// Share of dark sampled pixels that makes the frame dark (0.0-1.0)
    pub darkness_proportion: f64,
}

/// Blur detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Laplacian variance below which a frame is blurred
    pub threshold: f64,
}

/// Capture cadence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Quality poll interval while an attempt is live (ms)
    pub poll_interval_ms: u64,
    /// Attempt timeout (ms)
    pub timeout_ms: u64,
    /// Live brightness/blur analysis interval (ms)
    pub analysis_interval_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            still_debounce_ms: 500,
        }
    }
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            sample_stride: 8,
            dark_threshold: 90.0,
            darkness_proportion: 0.08,
        }
    }
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self { threshold: 30.0 }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            timeout_ms: 2000,
            analysis_interval_ms: 500,
        }
    }
}

impl GateConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GateError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| GateError::Config(format!("Failed to read config file: {}", e)))?;

        let config: GateConfig = toml::from_str(&contents)
            .map_err(|e| GateError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate().map_err(GateError::Config)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GateError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GateError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| GateError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| GateError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("shutterguard.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.motion.threshold.is_nan() || self.motion.threshold < 0.0 {
            return Err("Motion threshold must be non-negative".to_string());
        }
        if self.motion.still_debounce_ms == 0 {
            return Err("Still debounce must be at least 1ms".to_string());
        }

        if self.brightness.sample_stride == 0 {
            return Err("Sample stride must be at least 1".to_string());
        }
        if !(0.0..=255.0).contains(&self.brightness.dark_threshold) {
            return Err("Dark threshold must be between 0 and 255".to_string());
        }
        if !(0.0..=1.0).contains(&self.brightness.darkness_proportion) {
            return Err("Darkness proportion must be between 0.0 and 1.0".to_string());
        }

        if self.blur.threshold.is_nan() || self.blur.threshold < 0.0 {
            return Err("Blur threshold must be non-negative".to_string());
        }

        let capture = &self.capture;
        if capture.poll_interval_ms == 0 || capture.analysis_interval_ms == 0 {
            return Err("Poll and analysis intervals must be at least 1ms".to_string());
        }
        if capture.poll_interval_ms >= capture.timeout_ms {
            return Err("Poll interval must be shorter than the capture timeout".to_string());
        }

        Ok(())
    }

    pub fn motion_tracker(&self) -> MotionTracker {
        MotionTracker::new(
            self.motion.threshold,
            Duration::from_millis(self.motion.still_debounce_ms),
        )
    }

    pub fn frame_analyzer(&self) -> FrameAnalyzer {
        FrameAnalyzer::new(
            BrightnessAnalyzer::new(
                self.brightness.sample_stride,
                self.brightness.dark_threshold,
                self.brightness.darkness_proportion,
            ),
            BlurAnalyzer::new(self.blur.threshold),
        )
    }

    pub fn orchestrator(&self) -> CaptureOrchestrator {
        CaptureOrchestrator::new(
            Duration::from_millis(self.capture.poll_interval_ms),
            Duration::from_millis(self.capture.timeout_ms),
        )
    }

    pub fn analysis_interval(&self) -> Duration {
        Duration::from_millis(self.capture.analysis_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.motion.threshold, 0.6);
        assert_eq!(config.motion.still_debounce_ms, 500);
        assert_eq!(config.brightness.sample_stride, 8);
        assert_eq!(config.brightness.dark_threshold, 90.0);
        assert_eq!(config.brightness.darkness_proportion, 0.08);
        assert_eq!(config.blur.threshold, 30.0);
        assert_eq!(config.capture.poll_interval_ms, 100);
        assert_eq!(config.capture.timeout_ms, 2000);
        assert_eq!(config.capture.analysis_interval_ms, 500);
    }

    #[test]
    fn test_config_validation() {
        let config = GateConfig::default();
        assert!(config.validate().is_ok());

        let mut bad = config.clone();
        bad.brightness.sample_stride = 0;
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.brightness.darkness_proportion = 1.5;
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.motion.threshold = f64::NAN;
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.capture.poll_interval_ms = 2000;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested").join("shutterguard.toml");

        let mut config = GateConfig::default();
        config.blur.threshold = 45.0;
        config.capture.timeout_ms = 3000;
        config.save_to_file(&config_path).unwrap();

        let loaded = GateConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_toml_format() {
        let toml_string = toml::to_string_pretty(&GateConfig::default()).unwrap();

        assert!(toml_string.contains("[motion]"));
        assert!(toml_string.contains("[brightness]"));
        assert!(toml_string.contains("[blur]"));
        assert!(toml_string.contains("[capture]"));
        assert!(toml_string.contains("still_debounce_ms"));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[motion]\nthreshold = \"fast\"\n").unwrap();
        assert!(matches!(
            GateConfig::load_from_file(&path),
            Err(GateError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[blur]\nthreshold = 12.5\n").unwrap();

        let loaded = GateConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.blur.threshold, 12.5);
        assert_eq!(loaded.capture, CaptureConfig::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = GateConfig::load_from_file("nonexistent_shutterguard.toml");
        assert_eq!(result.unwrap(), GateConfig::default());
    }

    #[test]
    fn test_builders_apply_thresholds() {
        let mut config = GateConfig::default();
        config.motion.threshold = 1.2;
        config.brightness.sample_stride = 4;
        assert_eq!(config.motion_tracker().threshold(), 1.2);
        assert_eq!(config.frame_analyzer().brightness.sample_stride, 4);
        assert_eq!(config.analysis_interval(), Duration::from_millis(500));
    }
}
