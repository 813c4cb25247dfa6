//! Background configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.
//! A handful of knobs can also be overridden from the environment at startup:
//!
//! - `BACKDROP_PARTICLE_COUNT=20000`
//! - `BACKDROP_SEED=42`
//! - `BACKDROP_GLYPH_SIZE=20`

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackdropError, Result};

/// Top-level configuration (backdrop.toml)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BackdropConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub perspective: PerspectiveConfig,
    #[serde(default)]
    pub point_sprite: PointSpriteConfig,
    /// Fixed seed for entity randomness; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Largest frame delta handed to renderers
    #[serde(default = "default_max_frame_delta_ms")]
    pub max_frame_delta_ms: f64,
}

fn default_max_frame_delta_ms() -> f64 {
    backdrop_animation::DEFAULT_MAX_DELTA_MS
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            perspective: PerspectiveConfig::default(),
            point_sprite: PointSpriteConfig::default(),
            seed: None,
            max_frame_delta_ms: default_max_frame_delta_ms(),
        }
    }
}

/// Symbol rain
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GridConfig {
    /// Base glyph size in pixels; also sets column density and grid cell
    #[serde(default = "default_glyph_size")]
    pub glyph_size: f32,
    /// Columns per glyph-width of viewport
    #[serde(default = "default_column_density")]
    pub column_density: f32,
    /// Alpha of the black fill painted before each frame
    #[serde(default = "default_fade_alpha")]
    pub fade_alpha: f32,
    /// Radiating lines in the overlay
    #[serde(default = "default_spoke_count")]
    pub spoke_count: u32,
}

fn default_glyph_size() -> f32 {
    16.0
}

fn default_column_density() -> f32 {
    1.5
}

fn default_fade_alpha() -> f32 {
    0.05
}

fn default_spoke_count() -> u32 {
    12
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            glyph_size: default_glyph_size(),
            column_density: default_column_density(),
            fade_alpha: default_fade_alpha(),
            spoke_count: default_spoke_count(),
        }
    }
}

/// Synthwave perspective grid
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PerspectiveConfig {
    #[serde(default = "default_star_count")]
    pub star_count: u32,
    /// Horizontal lines above the horizon
    #[serde(default = "default_horizontal_lines")]
    pub horizontal_lines: u32,
    /// Vertical lines on each side of the vanishing point
    #[serde(default = "default_vertical_lines")]
    pub vertical_lines: u32,
    /// Time advanced per frame
    #[serde(default = "default_time_step")]
    pub time_step: f32,
}

fn default_star_count() -> u32 {
    100
}

fn default_horizontal_lines() -> u32 {
    20
}

fn default_vertical_lines() -> u32 {
    20
}

fn default_time_step() -> f32 {
    0.01
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            star_count: default_star_count(),
            horizontal_lines: default_horizontal_lines(),
            vertical_lines: default_vertical_lines(),
            time_step: default_time_step(),
        }
    }
}

/// Point-sprite starfield
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PointSpriteConfig {
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    #[serde(default = "default_inner_radius")]
    pub inner_radius: f32,
    #[serde(default = "default_outer_radius")]
    pub outer_radius: f32,
    /// Fraction of particles colored from the curated palette
    #[serde(default = "default_palette_fraction")]
    pub palette_fraction: f32,
    #[serde(default = "default_dispersion_strength")]
    pub dispersion_strength: f32,
    /// Distance inside which particles are not displaced
    #[serde(default = "default_dispersion_epsilon")]
    pub dispersion_epsilon: f32,
    /// Scale from normalized pointer position to dispersion center
    #[serde(default = "default_pointer_range")]
    pub pointer_range: f32,
}

fn default_particle_count() -> usize {
    8000
}

fn default_inner_radius() -> f32 {
    15.0
}

fn default_outer_radius() -> f32 {
    25.0
}

fn default_palette_fraction() -> f32 {
    0.7
}

fn default_dispersion_strength() -> f32 {
    0.3
}

fn default_dispersion_epsilon() -> f32 {
    1.0
}

fn default_pointer_range() -> f32 {
    0.6
}

impl Default for PointSpriteConfig {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            inner_radius: default_inner_radius(),
            outer_radius: default_outer_radius(),
            palette_fraction: default_palette_fraction(),
            dispersion_strength: default_dispersion_strength(),
            dispersion_epsilon: default_dispersion_epsilon(),
            pointer_range: default_pointer_range(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

impl BackdropConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BackdropConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| BackdropError::Config(format!("{}: {e}", path.display())))
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BackdropError::Config(e.to_string()))
    }

    /// Apply `BACKDROP_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse::<usize>("BACKDROP_PARTICLE_COUNT") {
            self.point_sprite.particle_count = v;
        }
        if let Some(v) = env_parse::<u64>("BACKDROP_SEED") {
            self.seed = Some(v);
        }
        if let Some(v) = env_parse::<f32>("BACKDROP_GLYPH_SIZE") {
            if v > 0.0 {
                self.grid.glyph_size = v;
            }
        }
        tracing::debug!(
            particles = self.point_sprite.particle_count,
            seed = ?self.seed,
            glyph_size = self.grid.glyph_size,
            "backdrop config resolved"
        );
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.grid.glyph_size > 0.0) {
            return Err(BackdropError::Config(
                "grid.glyph_size must be positive".to_string(),
            ));
        }
        let perspective = &self.perspective;
        if perspective.horizontal_lines == 0 || perspective.vertical_lines == 0 {
            return Err(BackdropError::Config(
                "perspective line counts must be at least 1".to_string(),
            ));
        }
        let sprite = &self.point_sprite;
        if !(sprite.inner_radius >= 0.0 && sprite.outer_radius >= sprite.inner_radius) {
            return Err(BackdropError::Config(
                "point_sprite radii must satisfy 0 <= inner_radius <= outer_radius".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&sprite.palette_fraction) {
            return Err(BackdropError::Config(
                "point_sprite.palette_fraction must be within [0, 1]".to_string(),
            ));
        }
        if !(self.max_frame_delta_ms >= 0.0) {
            return Err(BackdropError::Config(
                "max_frame_delta_ms must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = BackdropConfig::from_toml_str("").unwrap();
        assert_eq!(config, BackdropConfig::default());
        assert_eq!(config.point_sprite.particle_count, 8000);
        assert_eq!(config.grid.glyph_size, 16.0);
        assert_eq!(config.max_frame_delta_ms, 250.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = BackdropConfig::from_toml_str(
            r#"
            seed = 7

            [point_sprite]
            particle_count = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.point_sprite.particle_count, 500);
        assert_eq!(config.point_sprite.outer_radius, 25.0);
        assert_eq!(config.perspective, PerspectiveConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = BackdropConfig::from_toml_str("[grid]\nglyph_size = 0.0").unwrap_err();
        assert!(matches!(err, BackdropError::Config(_)));

        let err = BackdropConfig::from_toml_str("[point_sprite]\ninner_radius = 30.0").unwrap_err();
        assert!(matches!(err, BackdropError::Config(_)));

        let err = BackdropConfig::from_toml_str("[perspective]\nvertical_lines = 0").unwrap_err();
        assert!(matches!(err, BackdropError::Config(_)));

        let err = BackdropConfig::from_toml_str("[perspective]\nhorizontal_lines = 0").unwrap_err();
        assert!(matches!(err, BackdropError::Config(_)));

        let err = BackdropConfig::from_toml_str("seed = \"many\"").unwrap_err();
        assert!(matches!(err, BackdropError::Config(_)));
    }

    #[test]
    fn test_to_toml_parses_back() {
        let mut config = BackdropConfig::default();
        config.seed = Some(3);
        let text = config.to_toml().unwrap();
        assert_eq!(BackdropConfig::from_toml_str(&text).unwrap(), config);
    }
}
