//! Configuration loading for the teleoperation client.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::Path;

use super::keymap::{Action, KeyMap};

/// Config file looked up when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV_VAR: &str = "COZMO_ENDPOINT";

const DEFAULT_FACES: &[&str] = &["normal", "happy", "sad", "wink", "surprise", "lonly", "laugh", "sleepy", "angry"];

const DEFAULT_ANIMATIONS: &[&str] = &[
    "anim_bored_01",
    "anim_greeting_happy_01",
    "anim_hiking_edgesquintgetin_01",
    "anim_launch_firsttimewakeup",
    "anim_pounce_success_02",
    "anim_reacttocliff_pickup_01",
    "anim_sparking_success_01",
];

/// Settings for one operator session against one robot server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TeleopConfig {
    /// Base URL of the robot server; commands are POSTed here.
    pub endpoint: String,
    /// Primary camera image path, relative to `endpoint`.
    pub camera_path: String,
    /// Absolute URL of the auxiliary camera snapshot.
    pub secondary_camera_url: String,
    /// Speed magnitude used for move and turn, in [0, 100].
    pub move_speed: i32,
    pub camera_interval_ms: u64,
    pub tick_period_ms: u64,
    /// Wait between requesting an auxiliary capture and reloading its image.
    pub settle_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub animations: Vec<String>,
    pub faces: Vec<String>,
    pub keymap: KeyMap,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://rp3-01.local:3141/".to_string(),
            camera_path: "camera.jpg".to_string(),
            secondary_camera_url: "http://rp3-01.local/cozmo/camera2.jpg".to_string(),
            move_speed: 30,
            camera_interval_ms: 100,
            tick_period_ms: 33,
            settle_delay_ms: 1000,
            request_timeout_ms: 2000,
            animations: DEFAULT_ANIMATIONS.iter().map(|s| s.to_string()).collect(),
            faces: DEFAULT_FACES.iter().map(|s| s.to_string()).collect(),
            keymap: KeyMap::default(),
        }
    }
}

impl TeleopConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path).with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to load config file {}", config_path.display()))
    }

    /// Load the file if it exists, fall back to defaults otherwise, then apply
    /// environment overrides and validate.
    pub fn load_or_default(config_path: &Path) -> anyhow::Result<Self> {
        let mut config = if config_path.exists() {
            log::info!("Loading configuration from {}", config_path.display());
            Self::load(config_path)?
        } else {
            log::info!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            log::info!("Endpoint overridden by {}: {}", ENDPOINT_ENV_VAR, endpoint);
            config.endpoint = endpoint;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0..=super::command::MAX_SPEED).contains(&self.move_speed) {
            bail!("move-speed must be within 0..=100, got {}", self.move_speed);
        }
        for (name, value) in [
            ("camera-interval-ms", self.camera_interval_ms),
            ("tick-period-ms", self.tick_period_ms),
            ("request-timeout-ms", self.request_timeout_ms),
        ] {
            if value == 0 {
                bail!("{} must be greater than zero", name);
            }
        }
        reqwest::Url::parse(&self.endpoint).with_context(|| format!("Invalid endpoint URL '{}'", self.endpoint))?;
        reqwest::Url::parse(&self.secondary_camera_url).with_context(|| format!("Invalid secondary-camera-url '{}'", self.secondary_camera_url))?;
        if self.animations.is_empty() || self.faces.is_empty() {
            bail!("animations and faces must each list at least one entry");
        }
        if self.keymap.codes_for(Action::Terminate).next().is_none() {
            log::warn!("No input code is bound to 'terminate'; the session can only end by closing the window");
        }
        Ok(())
    }

    /// URL of the primary camera image.
    pub fn camera_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.camera_path.trim_start_matches('/'))
    }

    /// URL of the auxiliary camera image with a cache-defeating timestamp.
    pub fn secondary_camera_url_at(&self, unix_millis: i64) -> String {
        format!("{}?{}", self.secondary_camera_url, unix_millis)
    }

    pub fn camera_interval(&self) -> embassy_time::Duration {
        embassy_time::Duration::from_millis(self.camera_interval_ms)
    }

    pub fn tick_period(&self) -> embassy_time::Duration {
        embassy_time::Duration::from_millis(self.tick_period_ms)
    }

    pub fn settle_delay(&self) -> embassy_time::Duration {
        embassy_time::Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TeleopConfig::default();
        config.validate().unwrap();
        assert_eq!(config.move_speed, 30);
        assert_eq!(config.camera_url(), "http://rp3-01.local:3141/camera.jpg");
        assert_eq!(config.tick_period(), embassy_time::Duration::from_millis(33));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TeleopConfig::parse(
            r#"
            endpoint = "http://10.0.0.7:3141"
            move-speed = 55
            camera-interval-ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://10.0.0.7:3141");
        assert_eq!(config.move_speed, 55);
        assert_eq!(config.camera_interval(), embassy_time::Duration::from_millis(250));
        assert_eq!(config.settle_delay_ms, 1000);
        assert_eq!(config.camera_url(), "http://10.0.0.7:3141/camera.jpg");
        assert_eq!(config.keymap, KeyMap::default());
    }

    #[test]
    fn test_keymap_table_replaces_defaults() {
        let config = TeleopConfig::parse("[keymap]\nKeyW = \"forward\"\nEscape = \"terminate\"\n").unwrap();
        assert_eq!(config.keymap.lookup("KeyW"), Some(Action::Forward));
        assert_eq!(config.keymap.lookup("ArrowUp"), None);
    }

    #[test]
    fn test_validation_failures() {
        assert!(TeleopConfig::parse("move-speed = 101").is_err());
        assert!(TeleopConfig::parse("move-speed = -1").is_err());
        assert!(TeleopConfig::parse("tick-period-ms = 0").is_err());
        assert!(TeleopConfig::parse("endpoint = \"not a url\"").is_err());
        assert!(TeleopConfig::parse("faces = []").is_err());
        assert!(TeleopConfig::parse("move-speed = \"fast\"").is_err());
    }

    #[test]
    fn test_secondary_url_carries_timestamp() {
        let config = TeleopConfig::default();
        assert_eq!(config.secondary_camera_url_at(1700000000123), "http://rp3-01.local/cozmo/camera2.jpg?1700000000123");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = TeleopConfig::load_or_default(Path::new("/nonexistent/cozmo-teleop.toml")).unwrap();
        assert_eq!(config.move_speed, 30);
    }
}
