//! Backdrop
//!
//! Procedural animated backgrounds. A [`BackgroundController`] owns a drawing
//! [`Surface`] and runs at most one renderer at a time: symbol rain, a
//! synthwave perspective grid, or a GPU point-sprite starfield.
//!
//! # Example
//!
//! ```ignore
//! use backdrop::prelude::*;
//!
//! let mut controller =
//!     BackgroundController::new(Box::new(HeadlessSurface::new()), BackdropConfig::default());
//! controller.resize(1280.0, 720.0);
//! controller.set_variant(BackgroundVariant::Perspective)?;
//!
//! // once per animation frame
//! controller.tick(timestamp_ms);
//! ```

pub mod config;
pub mod controller;
mod error;
pub mod handle;
pub mod preferences;
pub mod renderers;
mod rng;
pub mod surface;
pub mod variant;

pub use config::{BackdropConfig, GridConfig, PerspectiveConfig, PointSpriteConfig};
pub use controller::BackgroundController;
pub use error::{BackdropError, Result};
pub use handle::RendererHandle;
pub use preferences::{
    load_preferred, save_preferred, MemoryPreferences, PreferenceError, PreferenceStore,
    TomlFilePreferences, PREFERENCE_KEY,
};
pub use renderers::{
    DefaultRendererFactory, GridParticleRenderer, PerspectiveGridRenderer,
    PointSpriteFieldRenderer, RendererFactory, Scene,
};
pub use surface::{HeadlessSurface, SpriteBackend, SpriteRecording, Surface};
pub use variant::BackgroundVariant;

pub use backdrop_animation::{FrameScheduler, FrameTime};
pub use backdrop_core::{LifecycleState, ViewportEvent, ViewportSize};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::BackdropConfig;
    pub use crate::controller::BackgroundController;
    pub use crate::error::{BackdropError, Result};
    pub use crate::handle::RendererHandle;
    pub use crate::preferences::{PreferenceStore, PREFERENCE_KEY};
    pub use crate::surface::{HeadlessSurface, Surface};
    pub use crate::variant::BackgroundVariant;

    pub use backdrop_core::{ViewportEvent, ViewportSize};
}
