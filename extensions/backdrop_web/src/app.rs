//! JS-facing application handle

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use backdrop::{
    load_preferred, save_preferred, BackdropConfig, BackgroundController, BackgroundVariant,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, MouseEvent, Window};

use crate::storage::LocalStorageStore;
use crate::surface::{create_gpu, WebSurface};

type FrameClosure = Closure<dyn FnMut(f64)>;

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Client coordinates relative to a `width` x `height` box at `(left, top)`,
/// `None` outside the box
fn local_pointer(
    client: (f64, f64),
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Option<(f32, f32)> {
    let x = client.0 - left;
    let y = client.1 - top;
    ((0.0..=width).contains(&x) && (0.0..=height).contains(&y)).then_some((x as f32, y as f32))
}

struct Inner {
    controller: BackgroundController,
    store: Option<LocalStorageStore>,
    canvas: HtmlCanvasElement,
    gpu_canvas: Option<HtmlCanvasElement>,
}

impl Inner {
    /// Element whose box defines the viewport
    fn container(&self) -> Element {
        self.canvas
            .parent_element()
            .unwrap_or_else(|| self.canvas.clone().into())
    }

    fn fit_to_container(&mut self) {
        let container = self.container();
        let width = container.client_width().max(0);
        let height = container.client_height().max(0);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        if let Some(gpu_canvas) = &self.gpu_canvas {
            gpu_canvas.set_width(width.max(1) as u32);
            gpu_canvas.set_height(height.max(1) as u32);
        }
        self.controller.resize(width as f32, height as f32);
    }

    fn show(&self, variant: BackgroundVariant) {
        self.canvas.set_hidden(variant.uses_gpu());
        if let Some(gpu_canvas) = &self.gpu_canvas {
            gpu_canvas.set_hidden(!variant.uses_gpu());
        }
    }

    fn apply(&mut self, variant: BackgroundVariant) -> Result<(), JsValue> {
        let result = self.controller.set_variant(variant);
        self.show(self.controller.variant());
        result.map_err(|err| JsValue::from_str(&err.to_string()))?;
        if let Some(store) = self.store.as_mut() {
            if let Err(err) = save_preferred(store, variant) {
                warn(&format!("could not save background preference: {err}"));
            }
        }
        Ok(())
    }
}

/// A running background bound to a page
#[wasm_bindgen]
pub struct BackdropApp {
    inner: Rc<RefCell<Inner>>,
    frame: Rc<RefCell<Option<FrameClosure>>>,
    frame_request: Rc<Cell<Option<i32>>>,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_mouse_move: Option<Closure<dyn FnMut(MouseEvent)>>,
    pointer_target: Option<Element>,
}

/// Create the app on `canvas` (2D styles) and optionally `gpu_canvas` (starfield).
///
/// Restores the stored background and starts the animation loop.
#[wasm_bindgen]
pub async fn create_app(
    canvas: HtmlCanvasElement,
    gpu_canvas: Option<HtmlCanvasElement>,
) -> Result<BackdropApp, JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let gpu = match &gpu_canvas {
        Some(gpu_canvas) => match create_gpu(gpu_canvas.clone()).await {
            Ok(gpu) => Some(Rc::new(gpu)),
            Err(err) => {
                warn(&format!("GPU unavailable, starfield disabled: {err}"));
                None
            }
        },
        None => None,
    };

    let surface = WebSurface::new(canvas.clone(), gpu_canvas.clone(), gpu);
    let store = LocalStorageStore::new();
    let preferred = store
        .as_ref()
        .map(|store| load_preferred(store))
        .unwrap_or_default();

    let mut inner = Inner {
        controller: BackgroundController::new(Box::new(surface), BackdropConfig::default()),
        store,
        canvas,
        gpu_canvas,
    };
    inner.fit_to_container();
    if let Err(err) = inner.apply(preferred) {
        warn(&format!("could not start background '{preferred}': {err:?}"));
    }

    let mut app = BackdropApp {
        inner: Rc::new(RefCell::new(inner)),
        frame: Rc::new(RefCell::new(None)),
        frame_request: Rc::new(Cell::new(None)),
        on_resize: None,
        on_mouse_move: None,
        pointer_target: None,
    };
    app.listen()?;
    app.start_loop()?;
    Ok(app)
}

impl BackdropApp {
    fn start_loop(&self) -> Result<(), JsValue> {
        let inner = Rc::clone(&self.inner);
        let frame = Rc::clone(&self.frame);
        let request = Rc::clone(&self.frame_request);

        *self.frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            inner.borrow().controller.tick(timestamp);
            let next = frame.borrow().as_ref().and_then(|callback| {
                web_sys::window()?
                    .request_animation_frame(callback.as_ref().unchecked_ref())
                    .ok()
            });
            request.set(next);
        }));

        let id = match self.frame.borrow().as_ref() {
            Some(callback) => window()?.request_animation_frame(callback.as_ref().unchecked_ref())?,
            None => return Ok(()),
        };
        self.frame_request.set(Some(id));
        Ok(())
    }

    fn listen(&mut self) -> Result<(), JsValue> {
        let window = window()?;

        let inner = Rc::clone(&self.inner);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            inner.borrow_mut().fit_to_container();
        });
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        // Pointer input only counts inside the container
        let container = self.inner.borrow().container();
        let inner = Rc::clone(&self.inner);
        let on_mouse_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let mut inner = inner.borrow_mut();
            let rect = inner.container().get_bounding_client_rect();
            let client = (event.client_x() as f64, event.client_y() as f64);
            if let Some((x, y)) =
                local_pointer(client, rect.left(), rect.top(), rect.width(), rect.height())
            {
                inner.controller.pointer_move(x, y);
            }
        });
        container.add_event_listener_with_callback(
            "mousemove",
            on_mouse_move.as_ref().unchecked_ref(),
        )?;

        self.on_resize = Some(on_resize);
        self.on_mouse_move = Some(on_mouse_move);
        self.pointer_target = Some(container);
        Ok(())
    }
}

#[wasm_bindgen]
impl BackdropApp {
    /// Switch background by id (`none`, `matrix`, `synthwave`, `space`)
    pub fn set_variant(&self, id: &str) -> Result<(), JsValue> {
        let variant = BackgroundVariant::from_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown background '{id}'")))?;
        self.inner.borrow_mut().apply(variant)
    }

    /// Current background id
    pub fn variant(&self) -> String {
        self.inner.borrow().controller.variant().id().to_string()
    }

    /// Report a new viewport size explicitly
    pub fn resize(&self, width: f32, height: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.canvas.set_width(width.max(0.0) as u32);
        inner.canvas.set_height(height.max(0.0) as u32);
        inner.controller.resize(width, height);
    }

    /// Pointer position relative to the container
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.inner.borrow_mut().controller.pointer_move(x, y);
    }

    /// All background ids, in menu order
    pub fn variants() -> js_sys::Array {
        BackgroundVariant::all()
            .iter()
            .map(|v| JsValue::from_str(v.id()))
            .collect()
    }

    /// Stop the animation loop and release every listener and renderer
    pub fn destroy(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Some(id) = self.frame_request.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(cb) = self.on_resize.take() {
                let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
            }
        }
        if let (Some(target), Some(cb)) = (self.pointer_target.take(), self.on_mouse_move.take()) {
            let _ = target.remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
        }
        // Breaks the closure's reference to itself
        self.frame.borrow_mut().take();
        // Bypasses apply() so the stored preference survives teardown
        let mut inner = self.inner.borrow_mut();
        if let Err(err) = inner.controller.set_variant(BackgroundVariant::None) {
            warn(&err.to_string());
        }
    }
}

impl Drop for BackdropApp {
    fn drop(&mut self) {
        self.destroy();
    }
}
