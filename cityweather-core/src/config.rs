use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "CITYWEATHER_API_KEY";

pub const DEFAULT_GEOCODING_BASE: &str = "https://api.openweathermap.org/geo/1.0";
pub const DEFAULT_WEATHER_BASE: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// debounce_ms = 300
/// theme = "dark"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub geocoding_base: String,
    pub weather_base: String,
    pub debounce_ms: u64,
    /// Unset means requests never time out.
    pub request_timeout_secs: Option<u64>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_base: DEFAULT_GEOCODING_BASE.to_string(),
            weather_base: DEFAULT_WEATHER_BASE.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: None,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
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

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolved_api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(from_env, self.api_key.as_deref())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| stored.filter(|k| !k.trim().is_empty()).map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();
        assert_eq!(cfg.geocoding_base, DEFAULT_GEOCODING_BASE);
        assert_eq!(cfg.weather_base, DEFAULT_WEATHER_BASE);
        assert_eq!(cfg.debounce_interval(), Duration::from_millis(300));
        assert!(cfg.request_timeout().is_none());
        assert_eq!(cfg.theme, Theme::Light);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml("api_key = \"KEY\"\ntheme = \"dark\"\n").expect("valid toml");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(cfg.weather_base, DEFAULT_WEATHER_BASE);
    }

    #[test]
    fn invalid_theme_is_rejected() {
        assert!(Config::from_toml("theme = \"sepia\"").is_err());
        let err = Theme::try_from("sepia").unwrap_err();
        assert!(err.to_string().contains("Unknown theme"));
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.request_timeout_secs = Some(10);

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");

        assert_eq!(back.api_key.as_deref(), Some("KEY"));
        assert_eq!(back.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn env_key_wins_over_stored() {
        assert_eq!(pick_api_key(Some("ENV".into()), Some("FILE")).as_deref(), Some("ENV"));
        assert_eq!(pick_api_key(None, Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(pick_api_key(Some("  ".into()), Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(pick_api_key(None, Some("")), None);
    }

    #[test]
    fn theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
