//! Backdrop browser host
//!
//! ```js
//! import init, { create_app, BackdropApp } from "./pkg/backdrop_web.js";
//!
//! await init();
//! const app = await create_app(
//!   document.getElementById("backdrop-2d"),
//!   document.getElementById("backdrop-gpu"),
//! );
//! app.set_variant("synthwave");
//! ```
//!
//! Both canvases should fill the same container; the app hides whichever one
//! the current background does not draw into.

mod app;
pub mod canvas;
pub mod storage;
pub mod surface;

pub use app::{create_app, BackdropApp};
pub use canvas::{css_color, WebCanvas};
pub use storage::LocalStorageStore;
pub use surface::WebSurface;

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_paint::Color;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Color::from_rgba8(255, 41, 117, 255)), "rgba(255, 41, 117, 1)");
        assert_eq!(css_color(Color::WHITE.with_alpha(0.8)), "rgba(255, 255, 255, 0.8)");
        assert_eq!(css_color(Color::BLACK.with_alpha(2.0)), "rgba(0, 0, 0, 1)");
    }
}
