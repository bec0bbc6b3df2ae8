//! Defines all configuration structures for the autoplay controller.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`, with `CAROUSEL_*` environment variables
//! layered on top. This keeps the autoplay behavior, its default interval and
//! its suspend rules outside of the application code.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// The top-level configuration for the autoplay controller.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoplayConfig {
    /// Whether autoplay is installed at all, and whether it starts running.
    #[serde(default)]
    pub autoplay: AutoplayMode,

    /// Default time each slide stays on screen, in milliseconds.
    /// Individual slides may override it.
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Suspend while the pointer is over the carousel.
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,

    /// Suspend while focus is inside the carousel.
    #[serde(default = "default_true")]
    pub pause_on_focus: bool,

    /// When true, every resume starts the slide's cycle from zero. When false,
    /// progress made before a pause is kept.
    #[serde(default = "default_true")]
    pub reset_progress: bool,

    /// The rate of the frame clock that drives progress updates.
    #[serde(default)]
    pub resolution: ClockResolution,
}

/// How autoplay is installed on mount.
///
/// Deserializes from `true`, `false` or the string `"pause"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawAutoplayMode")]
pub enum AutoplayMode {
    /// No autoplay behavior is installed.
    #[default]
    Off,
    /// Autoplay is installed and starts immediately.
    On,
    /// Autoplay is installed but starts stopped until the user presses play.
    Paused,
}

impl AutoplayMode {
    pub fn is_enabled(self) -> bool {
        self != AutoplayMode::Off
    }

    /// Whether the controller begins in the explicitly stopped state.
    pub fn starts_stopped(self) -> bool {
        self == AutoplayMode::Paused
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAutoplayMode {
    Flag(bool),
    Word(String),
}

impl TryFrom<RawAutoplayMode> for AutoplayMode {
    type Error = String;

    fn try_from(raw: RawAutoplayMode) -> Result<Self, Self::Error> {
        match raw {
            RawAutoplayMode::Flag(true) => Ok(AutoplayMode::On),
            RawAutoplayMode::Flag(false) => Ok(AutoplayMode::Off),
            RawAutoplayMode::Word(word) => match word.trim().to_ascii_lowercase().as_str() {
                "pause" => Ok(AutoplayMode::Paused),
                "true" => Ok(AutoplayMode::On),
                "false" => Ok(AutoplayMode::Off),
                other => Err(format!(
                    "invalid autoplay mode '{other}', expected true, false or \"pause\""
                )),
            },
        }
    }
}

/// Defines the refresh rate of the `SystemClock` frame source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// ~60 frames per second. Matches a typical display refresh.
    #[default]
    High,
    /// ~30 frames per second.
    Medium,
    /// ~10 frames per second. Enough for coarse progress indicators.
    Low,
    /// A user-defined rate in frames per second.
    Custom { frames_per_second: u64 },
}

impl ClockResolution {
    /// The time between two frames.
    pub fn frame_period(&self) -> Duration {
        let fps = match self {
            ClockResolution::High => 60,
            ClockResolution::Medium => 30,
            ClockResolution::Low => 10,
            ClockResolution::Custom { frames_per_second } => (*frames_per_second).max(1),
        };
        Duration::from_micros((1_000_000 / fps).max(1))
    }
}

impl AutoplayConfig {
    /// Loads the configuration from an optional file, then applies
    /// `CAROUSEL_*` environment overrides (e.g. `CAROUSEL_INTERVAL=3000`).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let config: AutoplayConfig = builder
            .add_source(config::Environment::with_prefix("CAROUSEL").try_parsing(true))
            .build()
            .context("failed to assemble autoplay configuration")?
            .try_deserialize()
            .context("failed to deserialize autoplay configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the scheduler cannot use.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval == 0 {
            bail!("autoplay interval must be a positive number of milliseconds");
        }
        if let ClockResolution::Custom { frames_per_second: 0 } = self.resolution {
            bail!("custom clock resolution needs at least one frame per second");
        }
        Ok(())
    }

    /// The configured default interval as a `Duration`.
    pub fn default_interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }
}

// --- Default value functions for serde ---

fn default_interval() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            autoplay: AutoplayMode::default(),
            interval: default_interval(),
            pause_on_hover: true,
            pause_on_focus: true,
            reset_progress: true,
            resolution: ClockResolution::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(text: &str) -> AutoplayConfig {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_source_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.autoplay, AutoplayMode::Off);
        assert_eq!(config.interval, 5000);
        assert!(config.pause_on_hover);
        assert!(config.pause_on_focus);
        assert!(config.reset_progress);
        assert_eq!(config.resolution, ClockResolution::High);
    }

    #[test]
    fn autoplay_accepts_flags_and_pause_keyword() {
        assert_eq!(from_toml("autoplay = true").autoplay, AutoplayMode::On);
        assert_eq!(from_toml("autoplay = false").autoplay, AutoplayMode::Off);
        let paused = from_toml("autoplay = \"pause\"").autoplay;
        assert_eq!(paused, AutoplayMode::Paused);
        assert!(paused.is_enabled());
        assert!(paused.starts_stopped());
    }

    #[test]
    fn unknown_autoplay_keyword_is_rejected() {
        let result: Result<AutoplayConfig, _> = config::Config::builder()
            .add_source(config::File::from_str(
                "autoplay = \"sometimes\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize();
        assert!(result.is_err());
    }

    #[test]
    fn custom_resolution_and_overrides_parse() {
        let config = from_toml(
            r#"
            autoplay = true
            interval = 2000
            pause_on_hover = false
            reset_progress = false

            [resolution.custom]
            frames_per_second = 120
            "#,
        );
        assert_eq!(config.default_interval(), Duration::from_millis(2000));
        assert!(!config.pause_on_hover);
        assert!(!config.reset_progress);
        assert_eq!(
            config.resolution,
            ClockResolution::Custom { frames_per_second: 120 }
        );
        assert_eq!(config.resolution.frame_period(), Duration::from_micros(8333));
    }

    #[test]
    fn zero_interval_fails_validation() {
        let config = AutoplayConfig {
            interval: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(AutoplayConfig::default().validate().is_ok());
    }

    // Environment variables are process-wide, so every `load` case lives in
    // this one test.
    #[test]
    fn load_layers_environment_over_file_then_validates() {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "autoplay = true\ninterval = 3000\npause_on_hover = false").unwrap();

        std::env::set_var("CAROUSEL_AUTOPLAY", "pause");
        let loaded = AutoplayConfig::load(Some(file.path()));
        std::env::remove_var("CAROUSEL_AUTOPLAY");
        let config = loaded.unwrap();
        assert_eq!(config.autoplay, AutoplayMode::Paused);
        assert_eq!(config.interval, 3000);
        assert!(!config.pause_on_hover);
        assert!(config.pause_on_focus);

        std::env::set_var("CAROUSEL_INTERVAL", "0");
        let rejected = AutoplayConfig::load(Some(file.path()));
        std::env::remove_var("CAROUSEL_INTERVAL");
        assert!(rejected.is_err());

        let missing = file.path().with_extension("missing.toml");
        assert!(AutoplayConfig::load(Some(&missing)).is_err());
    }
}
