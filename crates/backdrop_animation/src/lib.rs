//! Backdrop Animation
//!
//! Frame scheduling for background renderers. Hosts own the real animation
//! loop (`requestAnimationFrame`, a CLI timer) and call
//! [`FrameScheduler::tick`] once per frame; every running renderer registers
//! exactly one repeating callback.

pub mod scheduler;

pub use scheduler::{FrameCallbackId, FrameScheduler, FrameTime, DEFAULT_MAX_DELTA_MS};
