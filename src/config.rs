use serde::Deserialize;
use thiserror::Error;

pub const SITE_CONFIG_PATH: &str = "/site-config.json";

const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;
const DEFAULT_HERO_SCENE: bool = true;
const DEFAULT_SKILLS_SCENE: bool = true;
const DEFAULT_PAUSE_ON_REDUCED_MOTION: bool = true;

const MAX_PIXEL_RATIO_BOUNDS: (f64, f64) = (1.0, 3.0);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site config unavailable: {0}")]
    Unavailable(String),
    #[error("invalid site config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }

    pub fn as_filter(self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
        }
    }
}

/// Runtime knobs for the page, read from an optional static JSON document.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub log_level: LogLevel,
    pub max_pixel_ratio: f64,
    pub hero_scene: bool,
    pub skills_scene: bool,
    pub pause_on_reduced_motion: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            hero_scene: DEFAULT_HERO_SCENE,
            skills_scene: DEFAULT_SKILLS_SCENE,
            pause_on_reduced_motion: DEFAULT_PAUSE_ON_REDUCED_MOTION,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSiteConfig {
    log_level: Option<String>,
    max_pixel_ratio: Option<f64>,
    hero_scene: Option<bool>,
    skills_scene: Option<bool>,
    pause_on_reduced_motion: Option<bool>,
}

impl SiteConfig {
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let raw: RawSiteConfig = serde_json::from_str(document)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSiteConfig) -> Self {
        Self {
            log_level: parse_log_level(raw.log_level.as_deref(), DEFAULT_LOG_LEVEL),
            max_pixel_ratio: parse_f64_with_bounds(
                raw.max_pixel_ratio,
                DEFAULT_MAX_PIXEL_RATIO,
                MAX_PIXEL_RATIO_BOUNDS,
            ),
            hero_scene: raw.hero_scene.unwrap_or(DEFAULT_HERO_SCENE),
            skills_scene: raw.skills_scene.unwrap_or(DEFAULT_SKILLS_SCENE),
            pause_on_reduced_motion: raw
                .pause_on_reduced_motion
                .unwrap_or(DEFAULT_PAUSE_ON_REDUCED_MOTION),
        }
    }

    /// Device pixel ratio to render at, capped by `max_pixel_ratio`.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.max_pixel_ratio)
        } else {
            1.0
        }
    }
}

fn parse_f64_with_bounds(value: Option<f64>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .filter(|value| value.is_finite())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_log_level(value: Option<&str>, default: LogLevel) -> LogLevel {
    match value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default.as_str())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" => LogLevel::Warn,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SiteConfig::from_json("{}").expect("empty object is valid");
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn known_keys_are_applied() {
        let config = SiteConfig::from_json(
            r#"{"logLevel":"DEBUG","maxPixelRatio":1.5,"heroScene":false,"skillsScene":true,"pauseOnReducedMotion":false}"#,
        )
        .expect("valid config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_pixel_ratio, 1.5);
        assert!(!config.hero_scene);
        assert!(config.skills_scene);
        assert!(!config.pause_on_reduced_motion);
    }

    #[test]
    fn out_of_bounds_pixel_ratio_falls_back_to_default() {
        let config = SiteConfig::from_json(r#"{"maxPixelRatio":12}"#).expect("valid config");
        assert_eq!(config.max_pixel_ratio, DEFAULT_MAX_PIXEL_RATIO);
    }

    #[test]
    fn unknown_log_level_falls_back_to_default() {
        let config = SiteConfig::from_json(r#"{"logLevel":"trace"}"#).expect("valid config");
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = SiteConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let config = SiteConfig::default();
        assert_eq!(config.pixel_ratio(3.0), 2.0);
        assert_eq!(config.pixel_ratio(1.25), 1.25);
        assert_eq!(config.pixel_ratio(f64::NAN), 1.0);
    }
}
