//! Animator Configuration
//!
//! Everything that was a magic number in the prototypes lives here: padding,
//! the caption offset, the resize settle delay, behavior thresholds, and the
//! animation sets themselves. Configuration is TOML.
//!
//! # Lookup order
//!
//! 1. An explicit path (the `--config` flag)
//! 2. `VIVIAN_CONFIG`
//! 3. `$XDG_CONFIG_HOME/vivian/config.toml`
//! 4. Built-in defaults
//!
//! # Environment overrides
//!
//! - `VIVIAN_PADDING`: padding percent
//! - `VIVIAN_SETTLE_MS`: resize settle delay in ms
//! - `VIVIAN_SEED`: RNG seed for ranged durations
//!
//! # Example
//!
//! ```toml
//! name = "Vivian"
//! asset_dir = "images"
//! padding_percent = 10
//! scale_mode = "contain"
//!
//! [behavior]
//! interval_ms = 250
//! threshold = 30
//!
//! [[sets]]
//! name = "idle"
//! frames = [
//!     { path = "VivianNeutral.png", duration_range_ms = [500, 5000] },
//!     { path = "VivianBlink.png", duration_ms = 200 },
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::behavior::BehaviorConfig;
use crate::debounce::DEFAULT_SETTLE_DELAY_MS;
use crate::error::{AnimatorError, Result};
use crate::frame::FrameDuration;
use crate::layout::{LayoutOptions, ScaleMode};

/// One frame as written in the config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Image path, relative to `asset_dir` unless absolute
    pub path: PathBuf,
    /// Fixed display time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    /// Random display time, `[min, max]` inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_range_ms: Option<[i64; 2]>,
}

impl FrameConfig {
    /// Frame with a fixed duration
    pub fn fixed(path: impl Into<PathBuf>, ms: i64) -> Self {
        Self {
            path: path.into(),
            duration_ms: Some(ms),
            duration_range_ms: None,
        }
    }

    /// Frame with a random duration
    pub fn ranged(path: impl Into<PathBuf>, min: i64, max: i64) -> Self {
        Self {
            path: path.into(),
            duration_ms: None,
            duration_range_ms: Some([min, max]),
        }
    }

    /// Validate and convert the duration
    pub fn duration(&self) -> Result<FrameDuration> {
        match (self.duration_ms, self.duration_range_ms) {
            (Some(ms), None) => FrameDuration::fixed(ms),
            (None, Some([min, max])) => FrameDuration::range(min, max),
            _ => Err(AnimatorError::Config {
                reason: format!(
                    "frame {:?} needs exactly one of duration_ms or duration_range_ms",
                    self.path
                ),
            }),
        }
    }
}

/// One animation set as written in the config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfig {
    pub name: String,
    pub frames: Vec<FrameConfig>,
}

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Character name shown in the caption
    pub name: String,
    /// Directory frame paths are resolved against
    pub asset_dir: Option<PathBuf>,
    /// Percentage of the viewport kept empty around the sprite
    pub padding_percent: u32,
    /// Pixels reserved under the sprite for the caption
    pub vertical_offset: u32,
    /// How frames are scaled into the viewport
    pub scale_mode: ScaleMode,
    /// Resize settle delay
    pub settle_delay_ms: u64,
    /// Set played on startup
    pub initial_set: String,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
    /// Idle/talking toggle policy
    pub behavior: BehaviorConfig,
    /// Animation sets
    pub sets: Vec<SetConfig>,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            name: "Vivian".to_string(),
            asset_dir: Some(PathBuf::from("images")),
            padding_percent: 10,
            vertical_offset: 4,
            scale_mode: ScaleMode::FitWidth,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            initial_set: "idle".to_string(),
            seed: None,
            behavior: BehaviorConfig::default(),
            sets: vec![
                SetConfig {
                    name: "idle".to_string(),
                    frames: vec![
                        FrameConfig::ranged("VivianNeutral.png", 500, 5000),
                        FrameConfig::fixed("VivianBlink.png", 200),
                    ],
                },
                SetConfig {
                    name: "talking".to_string(),
                    frames: vec![
                        FrameConfig::ranged("VivianTalking.png", 100, 250),
                        FrameConfig::ranged("VivianNeutral.png", 80, 200),
                    ],
                },
            ],
        }
    }
}

impl AnimatorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AnimatorError::Config {
            reason: e.to_string(),
        })
    }

    /// Read configuration from a TOML file
    ///
    /// A relative `asset_dir` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnimatorError::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(parent) = path.parent() {
            match &config.asset_dir {
                Some(dir) if dir.is_relative() => config.asset_dir = Some(parent.join(dir)),
                None => config.asset_dir = Some(parent.to_path_buf()),
                _ => {}
            }
        }

        info!(path = %path.display(), sets = config.sets.len(), "Loaded configuration");
        Ok(config)
    }

    /// Find and load configuration following the lookup order, then apply
    /// environment overrides and validate
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match std::env::var_os("VIVIAN_CONFIG") {
                Some(path) => Self::load(Path::new(&path))?,
                None => match default_config_path().filter(|p| p.exists()) {
                    Some(path) => Self::load(&path)?,
                    None => {
                        debug!("No configuration file found, using defaults");
                        Self::default()
                    }
                },
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the environment)
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("VIVIAN_PADDING") {
            match value.parse() {
                Ok(padding) => self.padding_percent = padding,
                Err(_) => warn!(value = %value, "Ignoring invalid VIVIAN_PADDING"),
            }
        }
        if let Some(value) = lookup("VIVIAN_SETTLE_MS") {
            match value.parse() {
                Ok(ms) => self.settle_delay_ms = ms,
                Err(_) => warn!(value = %value, "Ignoring invalid VIVIAN_SETTLE_MS"),
            }
        }
        if let Some(value) = lookup("VIVIAN_SEED") {
            match value.parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => warn!(value = %value, "Ignoring invalid VIVIAN_SEED"),
            }
        }
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(AnimatorError::Config { reason });

        if self.padding_percent > 100 {
            return fail(format!(
                "padding_percent must be 0-100, got {}",
                self.padding_percent
            ));
        }
        if self.sets.is_empty() {
            return fail("at least one animation set is required".to_string());
        }
        for set in &self.sets {
            if set.frames.is_empty() {
                return Err(AnimatorError::EmptyAnimationSet {
                    name: set.name.clone(),
                });
            }
            for frame in &set.frames {
                frame.duration()?;
            }
        }
        if !self.has_set(&self.initial_set) {
            return fail(format!("initial_set '{}' is not defined", self.initial_set));
        }
        if self.behavior.enabled {
            if self.behavior.interval_ms == 0 || self.behavior.threshold == 0 {
                return fail("behavior interval_ms and threshold must be positive".to_string());
            }
            for name in &self.behavior.sets {
                if !self.has_set(name) {
                    return fail(format!("behavior set '{}' is not defined", name));
                }
            }
        }
        Ok(())
    }

    /// Placement options derived from this config
    pub fn layout(&self) -> LayoutOptions {
        LayoutOptions {
            padding_percent: self.padding_percent,
            vertical_offset: self.vertical_offset,
            scale_mode: self.scale_mode,
        }
    }

    /// Resolve a frame path against `asset_dir`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.asset_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn has_set(&self, name: &str) -> bool {
        self.sets.iter().any(|s| s.name == name)
    }
}

/// `$XDG_CONFIG_HOME/vivian/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vivian").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnimatorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.behavior.threshold, 30);
        assert_eq!(config.behavior.interval_ms, 250);
        assert_eq!(config.sets[0].frames[0].duration().unwrap(), FrameDuration::range(500, 5000).unwrap());
        assert_eq!(config.sets[0].frames[1].duration().unwrap(), FrameDuration::fixed(200).unwrap());
    }

    #[test]
    fn test_parse_toml() {
        let config = AnimatorConfig::from_toml_str(
            r#"
            name = "Vivian"
            padding_percent = 20
            scale_mode = "contain"
            initial_set = "idle"

            [behavior]
            enabled = false

            [[sets]]
            name = "idle"
            frames = [
                { path = "a.png", duration_range_ms = [500, 5000] },
                { path = "b.png", duration_ms = 200 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.padding_percent, 20);
        assert_eq!(config.scale_mode, ScaleMode::Contain);
        assert!(!config.behavior.enabled);
        // Unspecified fields fall back to defaults
        assert_eq!(config.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
        assert_eq!(config.sets.len(), 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_inverted_range_in_toml_is_rejected() {
        let config = AnimatorConfig::from_toml_str(
            r#"
            [[sets]]
            name = "idle"
            frames = [{ path = "a.png", duration_range_ms = [9, 1] }]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.sets[0].frames[0].duration(),
            Err(AnimatorError::InvalidDuration { min: 9, max: 1 })
        );
        assert_eq!(
            config.validate(),
            Err(AnimatorError::InvalidDuration { min: 9, max: 1 })
        );
    }

    #[test]
    fn test_frame_needs_exactly_one_duration() {
        let both = FrameConfig {
            path: PathBuf::from("x.png"),
            duration_ms: Some(1),
            duration_range_ms: Some([1, 2]),
        };
        assert!(matches!(both.duration(), Err(AnimatorError::Config { .. })));

        let neither = FrameConfig {
            path: PathBuf::from("x.png"),
            duration_ms: None,
            duration_range_ms: None,
        };
        assert!(neither.duration().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnimatorConfig::default();
        config.padding_percent = 150;
        assert!(config.validate().is_err());

        let mut config = AnimatorConfig::default();
        config.initial_set = "sleeping".to_string();
        assert!(config.validate().is_err());

        let mut config = AnimatorConfig::default();
        config.sets[1].frames.clear();
        assert_eq!(
            config.validate(),
            Err(AnimatorError::EmptyAnimationSet {
                name: "talking".to_string()
            })
        );

        let mut config = AnimatorConfig::default();
        config.sets[0].frames[0] = FrameConfig::ranged("a.png", 900, 100);
        assert_eq!(
            config.validate(),
            Err(AnimatorError::InvalidDuration { min: 900, max: 100 })
        );

        let mut config = AnimatorConfig::default();
        config.behavior.sets[1] = "dancing".to_string();
        assert!(config.validate().is_err());
        config.behavior.enabled = false;
        config.validate().unwrap();
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("VIVIAN_PADDING", "25"),
            ("VIVIAN_SETTLE_MS", "not-a-number"),
            ("VIVIAN_SEED", "1234"),
        ]
        .into_iter()
        .collect();

        let mut config = AnimatorConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.padding_percent, 25);
        assert_eq!(config.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
        assert_eq!(config.seed, Some(1234));
    }

    #[test]
    fn test_load_resolves_asset_dir_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vivian.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            asset_dir = "sprites"
            [behavior]
            enabled = false
            [[sets]]
            name = "idle"
            frames = [{{ path = "neutral.png", duration_ms = 100 }}]
            "#
        )
        .unwrap();

        let config = AnimatorConfig::load(&path).unwrap();
        assert_eq!(
            config.resolve(Path::new("neutral.png")),
            dir.path().join("sprites").join("neutral.png")
        );
        assert_eq!(
            config.resolve(Path::new("/abs/neutral.png")),
            PathBuf::from("/abs/neutral.png")
        );
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = AnimatorConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, AnimatorError::Config { .. }));
    }
}
