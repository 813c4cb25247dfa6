//! Background variants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;

/// Available backgrounds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackgroundVariant {
    /// No renderer runs
    #[default]
    #[serde(rename = "none")]
    None,
    /// Symbol rain with four motion patterns over a pulsing grid
    #[serde(rename = "matrix")]
    Grid,
    /// Perspective grid with a sun and drifting stars
    #[serde(rename = "synthwave")]
    Perspective,
    /// GPU point-sprite starfield with pointer-driven dispersion
    #[serde(rename = "space")]
    PointSprite,
}

impl BackgroundVariant {
    /// Get all variants, in menu order
    pub fn all() -> &'static [BackgroundVariant] {
        &[
            BackgroundVariant::None,
            BackgroundVariant::Grid,
            BackgroundVariant::Perspective,
            BackgroundVariant::PointSprite,
        ]
    }

    /// Get the display name for this variant
    pub fn name(&self) -> &'static str {
        match self {
            BackgroundVariant::None => "None",
            BackgroundVariant::Grid => "Matrix",
            BackgroundVariant::Perspective => "Synthwave",
            BackgroundVariant::PointSprite => "Space",
        }
    }

    /// Get the string ID, as stored in preferences
    pub fn id(&self) -> &'static str {
        match self {
            BackgroundVariant::None => "none",
            BackgroundVariant::Grid => "matrix",
            BackgroundVariant::Perspective => "synthwave",
            BackgroundVariant::PointSprite => "space",
        }
    }

    /// Parse from string ID (e.g., "matrix", "space")
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "none" => Some(BackgroundVariant::None),
            "matrix" => Some(BackgroundVariant::Grid),
            "synthwave" => Some(BackgroundVariant::Perspective),
            "space" => Some(BackgroundVariant::PointSprite),
            _ => None,
        }
    }

    /// Whether this variant needs the GPU rather than a 2D canvas
    pub fn uses_gpu(&self) -> bool {
        matches!(self, BackgroundVariant::PointSprite)
    }
}

impl fmt::Display for BackgroundVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackgroundVariant {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| BackdropError::Config(format!("unknown background '{s}'")))
    }
}
