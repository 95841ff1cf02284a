//! Effect configuration
//!
//! Loaded from TOML (`euphoria.toml`) or JSON (from the page script). Every
//! field has a default, so an empty section mounts the effect with the stock
//! look:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [cursor_ring]
//! size = 140
//! background_image = "/dasha1.jpg"
//!
//! [scroll_orb]
//! background_image = "/dasha1.jpg"
//! motion = { easing = 0.1 }
//!
//! [spotlight]
//! image_url = "/dasha2.jpg"
//! radius = 270
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use euphoria_animation::Motion;
use euphoria_core::EffectError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for EffectError {
    fn from(err: ConfigError) -> Self {
        EffectError::Config(err.to_string())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not a finite number"),
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be greater than 0, got {value}"),
        })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must not be negative, got {value}"),
        })
    }
}

// ============================================================================
// Motion
// ============================================================================

/// Per-effect overrides of the motion preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct MotionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_threshold: Option<f32>,
}

impl MotionOverrides {
    /// Apply the overrides on top of a preset
    pub fn resolve(&self, preset: Motion) -> Motion {
        Motion {
            easing: self.easing.unwrap_or(preset.easing),
            position_threshold: self.position_threshold.unwrap_or(preset.position_threshold),
            intensity_threshold: self.intensity_threshold.unwrap_or(preset.intensity_threshold),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(easing) = self.easing {
            check_finite("motion.easing", easing)?;
            if !(easing > 0.0 && easing <= 1.0) {
                return Err(ConfigError::Invalid {
                    field: "motion.easing",
                    reason: format!("must be in (0, 1], got {easing}"),
                });
            }
        }
        if let Some(threshold) = self.position_threshold {
            check_positive("motion.position_threshold", threshold)?;
        }
        if let Some(threshold) = self.intensity_threshold {
            check_positive("motion.intensity_threshold", threshold)?;
        }
        Ok(())
    }
}

// ============================================================================
// Cursor ring
// ============================================================================

fn default_ring_size() -> f32 {
    140.0
}

/// Pointer-following peephole
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CursorRingConfig {
    /// Diameter in pixels
    #[serde(default = "default_ring_size")]
    pub size: f32,
    /// Used when the background source reports no image
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub motion: MotionOverrides,
}

impl Default for CursorRingConfig {
    fn default() -> Self {
        Self {
            size: default_ring_size(),
            background_image: String::new(),
            motion: MotionOverrides::default(),
        }
    }
}

impl CursorRingConfig {
    pub fn new(background_image: impl Into<String>) -> Self {
        Self {
            background_image: background_image.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn motion(&self) -> Motion {
        self.motion.resolve(Motion::cursor_ring())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("cursor_ring.size", self.size)?;
        self.motion.validate()
    }
}

// ============================================================================
// Scroll orb
// ============================================================================

fn default_orb_size() -> f32 {
    330.0
}

fn default_max_amplitude() -> f32 {
    220.0
}

fn default_amplitude_ratio() -> f32 {
    0.25
}

fn default_wavelength_ratio() -> f32 {
    1.2
}

/// Shape of the orb's sideways sweep
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Upper bound on the horizontal swing, in pixels
    #[serde(default = "default_max_amplitude")]
    pub max_amplitude: f32,
    /// Swing as a fraction of viewport width, capped by `max_amplitude`
    #[serde(default = "default_amplitude_ratio")]
    pub amplitude_ratio: f32,
    /// Scroll distance of one full sweep, as a multiple of viewport height
    #[serde(default = "default_wavelength_ratio")]
    pub wavelength_ratio: f32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_amplitude: default_max_amplitude(),
            amplitude_ratio: default_amplitude_ratio(),
            wavelength_ratio: default_wavelength_ratio(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("scroll_orb.sweep.max_amplitude", self.max_amplitude)?;
        check_non_negative("scroll_orb.sweep.amplitude_ratio", self.amplitude_ratio)?;
        check_positive("scroll_orb.sweep.wavelength_ratio", self.wavelength_ratio)
    }
}

/// Scroll-driven peephole
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrollOrbConfig {
    #[serde(default = "default_orb_size")]
    pub size: f32,
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub motion: MotionOverrides,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Default for ScrollOrbConfig {
    fn default() -> Self {
        Self {
            size: default_orb_size(),
            background_image: String::new(),
            motion: MotionOverrides::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl ScrollOrbConfig {
    pub fn new(background_image: impl Into<String>) -> Self {
        Self {
            background_image: background_image.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn motion(&self) -> Motion {
        self.motion.resolve(Motion::scroll_orb())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("scroll_orb.size", self.size)?;
        self.motion.validate()?;
        self.sweep.validate()
    }
}

// ============================================================================
// Spotlight
// ============================================================================

fn default_radius() -> f32 {
    180.0
}

fn default_fade() -> f32 {
    80.0
}

/// Element-scoped radial reveal
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpotlightConfig {
    /// Image revealed under the spotlight
    #[serde(default)]
    pub image_url: String,
    /// Solid radius of the reveal, in pixels
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Feather width outside the solid radius, in pixels
    #[serde(default = "default_fade")]
    pub fade: f32,
    #[serde(default)]
    pub motion: MotionOverrides,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            radius: default_radius(),
            fade: default_fade(),
            motion: MotionOverrides::default(),
        }
    }
}

impl SpotlightConfig {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn fade(mut self, fade: f32) -> Self {
        self.fade = fade;
        self
    }

    pub fn motion(&self) -> Motion {
        self.motion.resolve(Motion::spotlight())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("spotlight.radius", self.radius)?;
        check_non_negative("spotlight.fade", self.fade)?;
        self.motion.validate()
    }
}

// ============================================================================
// Glow
// ============================================================================

fn default_reveal_size() -> f32 {
    600.0
}

/// Page-level cursor glow
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GlowConfig {
    /// Diameter of the background reveal around the cursor, in pixels
    #[serde(default = "default_reveal_size")]
    pub reveal_size: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            reveal_size: default_reveal_size(),
        }
    }
}

impl GlowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("glow.reveal_size", self.reveal_size)
    }
}

// ============================================================================
// Site
// ============================================================================

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `euphoria_effects=debug`
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Every effect the page mounts. Absent sections are not mounted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_ring: Option<CursorRingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_orb: Option<ScrollOrbConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotlight: Option<SpotlightConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<GlowConfig>,
}

impl SiteConfig {
    /// Parse JSON when the input is an object literal, TOML otherwise
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        if input.trim_start().starts_with('{') {
            Self::from_json_str(input)
        } else {
            Self::from_toml_str(input)
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ring) = &self.cursor_ring {
            ring.validate()?;
        }
        if let Some(orb) = &self.scroll_orb {
            orb.validate()?;
        }
        if let Some(spotlight) = &self.spotlight {
            spotlight.validate()?;
        }
        if let Some(glow) = &self.glow {
            glow.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_take_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
            [cursor_ring]
            [spotlight]
            image_url = "/dasha2.jpg"
            "#,
        )
        .unwrap();

        let ring = config.cursor_ring.unwrap();
        assert_eq!(ring.size, 140.0);
        assert_eq!(ring.motion(), Motion::cursor_ring());

        let spotlight = config.spotlight.unwrap();
        assert_eq!(spotlight.radius, 180.0);
        assert_eq!(spotlight.fade, 80.0);
        assert!(config.scroll_orb.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_motion_overrides_merge() {
        let config = SiteConfig::from_toml_str(
            r#"
            [scroll_orb]
            size = 64
            motion = { easing = 0.1 }
            "#,
        )
        .unwrap();

        let orb = config.scroll_orb.unwrap();
        assert_eq!(orb.size, 64.0);
        let motion = orb.motion();
        assert_eq!(motion.easing, 0.1);
        assert_eq!(motion.position_threshold, Motion::scroll_orb().position_threshold);
        assert_eq!(orb.sweep, SweepConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SiteConfig::from_toml_str("[cursor_ring]\nsize = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cursor_ring.size", .. }));

        let err = SiteConfig::from_json_str(r#"{"spotlight": {"motion": {"easing": 1.5}}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "motion.easing", .. }));

        let err = SiteConfig::from_json_str(r#"{"spotlight": {"fade": -1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "spotlight.fade", .. }));
    }

    #[test]
    fn test_json_config() {
        let config = SiteConfig::from_json_str(
            r#"{"cursor_ring": {"background_image": "/dasha1.jpg"}, "glow": {}}"#,
        )
        .unwrap();
        assert_eq!(config.cursor_ring.unwrap().background_image, "/dasha1.jpg");
        assert_eq!(config.glow.unwrap().reveal_size, 600.0);
    }

    #[test]
    fn test_parse_picks_format() {
        let json = SiteConfig::parse(r#" {"glow": {"reveal_size": 420}}"#).unwrap();
        assert_eq!(json.glow.unwrap().reveal_size, 420.0);

        let toml = SiteConfig::parse("[logging]\nlevel = \"debug\"\n[glow]\n").unwrap();
        assert_eq!(toml.logging.level, "debug");
        assert_eq!(toml.glow.unwrap().reveal_size, 600.0);
        assert!(toml.cursor_ring.is_none());

        assert_eq!(SiteConfig::parse("").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_load_reads_toml_file() {
        let path = std::env::temp_dir().join(format!("euphoria-site-{}.toml", std::process::id()));
        fs::write(&path, "[scroll_orb]\nsize = 200\n").unwrap();
        let config = SiteConfig::load(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(config.unwrap().scroll_orb.unwrap().size, 200.0);
        assert!(matches!(
            SiteConfig::load(path.with_extension("missing")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_parse_errors_surface() {
        assert!(matches!(
            SiteConfig::from_toml_str("[cursor_ring\n"),
            Err(ConfigError::Toml(_))
        ));
        let err: EffectError = ConfigError::Invalid {
            field: "glow.reveal_size",
            reason: "bad".into(),
        }
        .into();
        assert!(err.to_string().contains("glow.reveal_size"));
    }
}
