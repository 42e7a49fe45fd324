use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, ImageData, KeyboardEvent,
    MouseEvent, WheelEvent,
};

use crate::coords::Vec2;
use crate::error::PlatformError;
use crate::input::platform::dom;
use crate::input::{ButtonState, InputEvent, Key};

use super::{Canvas2d, Composite};

/// Offscreen canvas holding decoded pixels, drawable with `drawImage`.
pub struct WebImage {
    element: HtmlCanvasElement,
}

type Listener = (EventTarget, &'static str, Closure<dyn FnMut(JsValue)>);

/// `CanvasRenderingContext2D` of a `<canvas>` element in the page.
///
/// Keyboard, focus and page-hide events are taken from `window`; pointer events
/// from the canvas itself.
pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    events: Rc<RefCell<Vec<InputEvent>>>,
    closed: Rc<Cell<bool>>,
    listeners: Vec<Listener>,
}

impl WebCanvas {
    /// Binds to the canvas with DOM id `canvas_id`, sizing it to `width × height`.
    pub fn attach(canvas_id: &str, width: u32, height: u32) -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or_else(|| canvas_err("no window"))?;
        let document = window.document().ok_or_else(|| canvas_err("no document"))?;
        let element = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| canvas_err(format!("no element with id `{canvas_id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| canvas_err(format!("`{canvas_id}` is not a <canvas>")))?;

        element.set_width(width);
        element.set_height(height);
        let ctx = context_2d(&element)?;

        let mut canvas = Self {
            element,
            ctx,
            events: Rc::new(RefCell::new(Vec::new())),
            closed: Rc::new(Cell::new(false)),
            listeners: Vec::new(),
        };
        canvas.install_listeners(window.into())?;
        log::info!("attached to canvas `{canvas_id}` ({width}x{height})");
        Ok(canvas)
    }

    fn install_listeners(&mut self, window: EventTarget) -> Result<(), PlatformError> {
        let canvas: EventTarget = self.element.clone().into();

        let key = |state: ButtonState| {
            move |ev: &Event| {
                let ev = ev.dyn_ref::<KeyboardEvent>()?;
                let key = dom::key_from_code(&ev.code());
                if matches!(key, Key::Space | Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight) {
                    // Keep the page from scrolling under the game.
                    ev.prevent_default();
                }
                Some(InputEvent::Key { key, state, repeat: ev.repeat() })
            }
        };
        self.listen(&window, "keydown", key(ButtonState::Pressed))?;
        self.listen(&window, "keyup", key(ButtonState::Released))?;

        self.listen(&window, "blur", |_| Some(InputEvent::Focused(false)))?;
        self.listen(&window, "focus", |_| Some(InputEvent::Focused(true)))?;

        self.listen(&canvas, "mousemove", |ev| {
            let ev = ev.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::PointerMoved(Vec2::new(ev.offset_x() as f32, ev.offset_y() as f32)))
        })?;
        let button = |state: ButtonState| {
            move |ev: &Event| {
                let ev = ev.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::PointerButton { button: dom::mouse_button(ev.button()), state })
            }
        };
        self.listen(&canvas, "mousedown", button(ButtonState::Pressed))?;
        self.listen(&canvas, "mouseup", button(ButtonState::Released))?;
        self.listen(&canvas, "mouseleave", |_| Some(InputEvent::PointerLeft))?;
        self.listen(&canvas, "wheel", |ev| {
            let ev = ev.dyn_ref::<WheelEvent>()?;
            ev.prevent_default();
            let (x, y) = dom::wheel_lines(ev.delta_x(), ev.delta_y(), ev.delta_mode());
            Some(InputEvent::Scroll { x, y })
        })?;

        let closed = Rc::clone(&self.closed);
        let on_hide = Closure::<dyn FnMut(JsValue)>::new(move |_| closed.set(true));
        window
            .add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())
            .map_err(js_err)?;
        self.listeners.push((window, "pagehide", on_hide));
        Ok(())
    }

    fn listen<F>(&mut self, target: &EventTarget, name: &'static str, translate: F) -> Result<(), PlatformError>
    where
        F: Fn(&Event) -> Option<InputEvent> + 'static,
    {
        let queue = Rc::clone(&self.events);
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let Some(ev) = value.dyn_ref::<Event>() else { return };
            if let Some(input) = translate(ev) {
                queue.borrow_mut().push(input);
            }
        });
        target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        self.listeners.push((target.clone(), name, closure));
        Ok(())
    }

    fn remove_listeners(&mut self) {
        for (target, name, closure) in self.listeners.drain(..) {
            let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for WebCanvas {
    fn drop(&mut self) {
        self.remove_listeners();
    }
}

fn canvas_err(msg: impl Into<String>) -> PlatformError {
    PlatformError::Canvas(msg.into())
}

fn js_err(v: JsValue) -> PlatformError {
    PlatformError::Canvas(format!("{v:?}"))
}

fn context_2d(element: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, PlatformError> {
    element
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| canvas_err("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| canvas_err("unexpected 2d context type"))
}

fn log_js(op: &str, r: Result<(), JsValue>) {
    if let Err(e) = r {
        log::warn!("canvas {op} failed: {e:?}");
    }
}

impl Canvas2d for WebCanvas {
    type Image = WebImage;

    fn size(&self) -> (f32, f32) {
        (self.element.width() as f32, self.element.height() as f32)
    }

    fn create_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<WebImage, String> {
        let document = self.element.owner_document().ok_or("canvas is detached")?;
        let element = document
            .create_element("canvas")
            .map_err(|e| format!("{e:?}"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "created element is not a canvas".to_string())?;
        element.set_width(width);
        element.set_height(height);

        let ctx = context_2d(&element).map_err(|e| e.to_string())?;
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba), width, height)
            .map_err(|e| format!("{e:?}"))?;
        ctx.put_image_data(&data, 0.0, 0.0).map_err(|e| format!("{e:?}"))?;
        Ok(WebImage { element })
    }

    fn release_image(&mut self, image: WebImage) {
        // Zero-sizing drops the backing store right away instead of at GC.
        image.element.set_width(0);
        image.element.set_height(0);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_transform(&mut self, m: [f64; 6]) {
        log_js("setTransform", self.ctx.set_transform(m[0], m[1], m[2], m[3], m[4], m[5]));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_composite(&mut self, op: Composite) {
        log_js("globalCompositeOperation", self.ctx.set_global_composite_operation(op.as_css()));
    }

    fn set_fill_style(&mut self, css: &str) {
        self.ctx.set_fill_style_str(css);
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.ctx.set_stroke_style_str(css);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        log_js("arc", self.ctx.arc(x, y, radius, start, end));
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn draw_image(&mut self, image: &WebImage, src: [f64; 4], dst: [f64; 4]) {
        log_js(
            "drawImage",
            self.ctx
                .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &image.element,
                    src[0],
                    src[1],
                    src[2],
                    src[3],
                    dst[0],
                    dst[1],
                    dst[2],
                    dst[3],
                ),
        );
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn is_closed(&self) -> bool {
        self.closed.get()
    }

    fn close(&mut self) {
        self.closed.set(true);
        self.remove_listeners();
    }
}
