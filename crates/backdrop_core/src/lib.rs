//! Backdrop Core
//!
//! Foundational types shared by every background renderer:
//!
//! - **Viewport**: container size, with degenerate sizes detected up front
//! - **Events**: resize and pointer-move events coming from the host
//! - **Lifecycle**: the Uninitialized → Running → Stopped state machine every
//!   renderer handle walks through exactly once

pub mod events;
pub mod lifecycle;
pub mod viewport;

pub use events::ViewportEvent;
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleEvent, LifecycleState};
pub use viewport::ViewportSize;
