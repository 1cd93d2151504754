//! Browser side of the viewport engine: DOM geometry and transform output,
//! the requestAnimationFrame chain, and the input listeners.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Document, Event, EventTarget, HtmlButtonElement, HtmlElement,
    MouseEvent, TouchEvent, WheelEvent, Window,
};

use crate::state::viewport::{
    FrameHandle, FrameScheduler, Point, Transform, ViewportEngine, ViewportRect, ViewportSurface,
    ZoomControlState,
};

/// Shared slot holding the engine once the map view is mounted.
///
/// Created by the composition root and handed to every component that needs
/// to drive or read the viewport.
#[derive(Clone, Default)]
pub struct ViewportHandle(Rc<RefCell<Option<ViewportEngine>>>);

impl PartialEq for ViewportHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl ViewportHandle {
    pub fn install(&self, engine: ViewportEngine) {
        *self.0.borrow_mut() = Some(engine);
    }

    pub fn take(&self) -> Option<ViewportEngine> {
        self.0.borrow_mut().take()
    }

    /// Runs `f` on the engine. `None` when not mounted or already borrowed.
    pub fn with<R>(&self, f: impl FnOnce(&mut ViewportEngine) -> R) -> Option<R> {
        let mut slot = self.0.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    }
}

pub struct DomSurface {
    viewport: Option<HtmlElement>,
    layers: Vec<HtmlElement>,
    zoom_in: Option<HtmlButtonElement>,
    zoom_out: Option<HtmlButtonElement>,
}

impl DomSurface {
    pub fn new(
        viewport: Option<HtmlElement>,
        layers: Vec<HtmlElement>,
        zoom_in: Option<HtmlButtonElement>,
        zoom_out: Option<HtmlButtonElement>,
    ) -> Self {
        if viewport.is_none() {
            log::warn!("viewport element missing; pan limits collapse to zero");
        }
        for layer in &layers {
            let style = layer.style();
            let _ = style.set_property("will-change", "transform");
            let _ = style.set_property("backface-visibility", "hidden");
            let _ = style.set_property("transform-origin", "0 0");
        }
        if let Some(el) = &viewport {
            let _ = el.style().set_property("cursor", "grab");
        }
        Self {
            viewport,
            layers,
            zoom_in,
            zoom_out,
        }
    }
}

fn set_button_enabled(button: &Option<HtmlButtonElement>, enabled: bool) {
    if let Some(b) = button {
        b.set_disabled(!enabled);
        let style = b.style();
        let _ = style.set_property("opacity", if enabled { "1" } else { "0.5" });
        let _ = style.set_property("cursor", if enabled { "pointer" } else { "not-allowed" });
    }
}

impl ViewportSurface for DomSurface {
    fn viewport_rect(&self) -> ViewportRect {
        match &self.viewport {
            Some(el) if el.is_connected() => {
                let r = el.get_bounding_client_rect();
                ViewportRect::new(r.left(), r.top(), r.width(), r.height())
            }
            _ => ViewportRect::default(),
        }
    }

    fn apply_transform(&mut self, transform: &Transform) {
        let css = transform.to_css();
        for layer in &self.layers {
            let _ = layer.style().set_property("transform", &css);
        }
    }

    fn set_zoom_controls(&mut self, state: ZoomControlState) {
        set_button_enabled(&self.zoom_in, state.zoom_in_enabled);
        set_button_enabled(&self.zoom_out, state.zoom_out_enabled);
    }

    fn set_grabbing(&mut self, grabbing: bool) {
        if let Some(el) = &self.viewport {
            let _ = el
                .style()
                .set_property("cursor", if grabbing { "grabbing" } else { "grab" });
        }
    }
}

/// requestAnimationFrame-backed scheduler. Every frame calls back into the
/// engine held by the handle.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, handle: &ViewportHandle) -> Self {
        let slot = Rc::downgrade(&handle.0);
        let callback = Closure::wrap(Box::new(move || {
            let Some(slot) = slot.upgrade() else { return };
            let Ok(mut slot) = slot.try_borrow_mut() else {
                return;
            };
            if let Some(engine) = slot.as_mut() {
                engine.on_frame();
            }
        }) as Box<dyn FnMut()>);
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

fn client_point(e: &MouseEvent) -> Point {
    Point::new(e.client_x() as f64, e.client_y() as f64)
}

fn touch_points(e: &TouchEvent) -> Vec<Point> {
    let list = e.touches();
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| Point::new(t.client_x() as f64, t.client_y() as f64))
        .collect()
}

type Listener = Closure<dyn FnMut(Event)>;

/// Input listeners feeding the engine. Dropping it removes them.
pub struct InputBindings {
    listeners: Vec<(EventTarget, &'static str, Listener)>,
}

impl InputBindings {
    /// Mouse down, wheel and touch listen on the viewport; mouse move/up
    /// listen on the document so a drag survives leaving the viewport.
    pub fn attach(viewport: &HtmlElement, document: &Document, handle: &ViewportHandle) -> Self {
        let mut b = Self {
            listeners: Vec::new(),
        };
        let vp: &EventTarget = viewport.as_ref();
        let doc: &EventTarget = document.as_ref();

        let h = handle.clone();
        b.listen(vp, "wheel", Some(false), move |e| {
            let Some(e) = e.dyn_ref::<WheelEvent>() else { return };
            e.prevent_default();
            let now = js_sys::Date::now();
            h.with(|en| en.wheel(now, client_point(e), e.delta_y()));
        });

        let h = handle.clone();
        b.listen(vp, "mousedown", None, move |e| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                h.with(|en| en.mouse_down(e.button(), client_point(e)));
            }
        });
        let h = handle.clone();
        b.listen(doc, "mousemove", None, move |e| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                h.with(|en| en.mouse_move(client_point(e)));
            }
        });
        let h = handle.clone();
        b.listen(doc, "mouseup", None, move |_| {
            h.with(|en| en.mouse_up());
        });

        let h = handle.clone();
        b.listen(vp, "touchstart", Some(false), move |e| {
            if let Some(e) = e.dyn_ref::<TouchEvent>() {
                let points = touch_points(e);
                h.with(|en| en.touch_start(&points));
            }
        });
        let h = handle.clone();
        b.listen(vp, "touchmove", Some(false), move |e| {
            let Some(e) = e.dyn_ref::<TouchEvent>() else { return };
            e.prevent_default();
            let points = touch_points(e);
            h.with(|en| en.touch_move(&points));
        });
        for name in ["touchend", "touchcancel"] {
            let h = handle.clone();
            b.listen(vp, name, None, move |_| {
                h.with(|en| en.touch_end());
            });
        }

        for name in ["selectstart", "dragstart"] {
            b.listen(vp, name, None, |e| e.prevent_default());
        }
        b
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        name: &'static str,
        passive: Option<bool>,
        f: impl FnMut(Event) + 'static,
    ) {
        let cb: Listener = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        let added = match passive {
            Some(p) => {
                let opts = AddEventListenerOptions::new();
                opts.set_passive(p);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    cb.as_ref().unchecked_ref(),
                    &opts,
                )
            }
            None => target.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref()),
        };
        match added {
            Ok(()) => self.listeners.push((target.clone(), name, cb)),
            Err(e) => log::warn!("could not listen for {name}: {e:?}"),
        }
    }
}

impl Drop for InputBindings {
    fn drop(&mut self) {
        for (target, name, cb) in self.listeners.drain(..) {
            let _ = target.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
        }
    }
}
