//! Pan/zoom engine for the map image and its point overlay.
//!
//! The engine owns one scale + translation pair and eases it toward a target
//! one frame at a time. It never touches the DOM itself: geometry and output
//! go through a [`ViewportSurface`], frames through a [`FrameScheduler`].
//! `crate::dom` provides the browser implementations of both.

use serde::Serialize;

use super::input::{DragState, WheelThrottle, single_touch};
use crate::config::ViewportConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle of the viewport element, in client pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            left: finite(left),
            top: finite(top),
            width: finite(width).max(0.0),
            height: finite(height).max(0.0),
        }
    }

    /// Center in viewport-local pixels.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn to_css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomControlState {
    pub zoom_in_enabled: bool,
    pub zoom_out_enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Where the engine reads its geometry from and paints its transform to.
pub trait ViewportSurface {
    /// Zero-sized when the viewport element is not attached.
    fn viewport_rect(&self) -> ViewportRect;
    /// Applied identically to every transformed layer.
    fn apply_transform(&mut self, transform: &Transform);
    fn set_zoom_controls(&mut self, _state: ZoomControlState) {}
    fn set_grabbing(&mut self, _grabbing: bool) {}
}

/// One-shot frame requests. The engine asks for the next frame from inside
/// [`ViewportEngine::on_frame`], so at most one request is ever pending.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Symmetric pan limits around the origin for one scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanBounds {
    pub max_x: f64,
    pub max_y: f64,
    pub range_x: f64,
    pub range_y: f64,
}

impl PanBounds {
    fn from_max(max_x: f64, max_y: f64) -> Self {
        Self {
            max_x,
            max_y,
            range_x: max_x * 2.0,
            range_y: max_y * 2.0,
        }
    }

    /// Bounds that keep the scaled image edge-aligned with the viewport.
    pub fn fitted(rect: ViewportRect, scale: f64) -> Self {
        let image_w = rect.width * scale;
        let image_h = rect.height * scale;
        Self::from_max(
            ((image_w - rect.width) / 2.0).max(0.0),
            ((image_h - rect.height) / 2.0).max(0.0),
        )
    }

    pub fn expanded(self, factor: f64) -> Self {
        Self::from_max(self.max_x * factor, self.max_y * factor)
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(-self.max_x, self.max_x),
            y.clamp(-self.max_y, self.max_y),
        )
    }
}

/// Diagnostic snapshot returned by [`ViewportEngine::limits_info`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsInfo {
    pub expansion_factor: f64,
    pub original: PanBounds,
    pub expanded: PanBounds,
    pub current: Transform,
}

/// New translation that keeps the content under `anchor` in place when the
/// scale is multiplied by `scale_factor`.
pub fn anchored_translation(anchor: Point, translate: Point, scale_factor: f64) -> Point {
    Point::new(
        anchor.x - (anchor.x - translate.x) * scale_factor,
        anchor.y - (anchor.y - translate.y) * scale_factor,
    )
}

#[derive(Debug, Clone)]
pub struct ViewportState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub target_scale: f64,
    pub target_translate_x: f64,
    pub target_translate_y: f64,
    pub is_animating: bool,
    pub drag: DragState,
    pub min_scale: f64,
    pub max_scale: f64,
    pub scale_step: f64,
    pub limit_expansion_factor: f64,
}

impl ViewportState {
    fn new(cfg: &ViewportConfig) -> Self {
        let home = Self::home_scale(cfg);
        Self {
            scale: home,
            translate_x: 0.0,
            translate_y: 0.0,
            target_scale: home,
            target_translate_x: 0.0,
            target_translate_y: 0.0,
            is_animating: false,
            drag: DragState::default(),
            min_scale: cfg.min_scale,
            max_scale: cfg.max_scale,
            scale_step: cfg.scale_step,
            limit_expansion_factor: cfg.limit_expansion_factor.max(1.0),
        }
    }

    /// Natural size, or the nearest allowed scale when bounds exclude it.
    fn home_scale(cfg: &ViewportConfig) -> f64 {
        1.0_f64.clamp(cfg.min_scale, cfg.max_scale)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

pub struct ViewportEngine {
    state: ViewportState,
    speed: f64,
    threshold: f64,
    wheel: WheelThrottle,
    surface: Box<dyn ViewportSurface>,
    scheduler: Box<dyn FrameScheduler>,
    pending_frame: Option<FrameHandle>,
    destroyed: bool,
}

impl ViewportEngine {
    pub fn new(
        config: ViewportConfig,
        surface: Box<dyn ViewportSurface>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        let config = config.sanitized();
        let mut engine = Self {
            state: ViewportState::new(&config),
            speed: config.animation_speed,
            threshold: config.animation_threshold,
            wheel: WheelThrottle::new(config.wheel_interval_ms),
            surface,
            scheduler,
            pending_frame: None,
            destroyed: false,
        };
        engine.render();
        log::info!(
            "viewport engine ready: scale {}..{}, expansion {}x",
            engine.state.min_scale,
            engine.state.max_scale,
            engine.state.limit_expansion_factor
        );
        engine
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn transform(&self) -> Transform {
        Transform {
            scale: self.state.scale,
            translate_x: self.state.translate_x,
            translate_y: self.state.translate_y,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn viewport_rect(&self) -> ViewportRect {
        self.surface.viewport_rect()
    }

    pub fn zoom_controls(&self) -> ZoomControlState {
        ZoomControlState {
            zoom_in_enabled: self.state.scale < self.state.max_scale,
            zoom_out_enabled: self.state.scale > self.state.min_scale,
        }
    }

    // ---- public zoom operations -------------------------------------------

    pub fn zoom_in(&mut self) {
        self.animate_to_scale(self.state.scale + self.state.scale_step);
    }

    pub fn zoom_out(&mut self) {
        self.animate_to_scale(self.state.scale - self.state.scale_step);
    }

    pub fn reset_zoom(&mut self) {
        self.animate_to_transform(1.0, 0.0, 0.0);
    }

    /// Zooms around the viewport center.
    fn animate_to_scale(&mut self, new_scale: f64) {
        if self.destroyed {
            return;
        }
        let clamped = self.state.clamp_scale(new_scale);
        if clamped == self.state.scale {
            return;
        }
        let center = self.surface.viewport_rect().center();
        self.zoom_around(center, clamped);
    }

    fn zoom_around(&mut self, anchor: Point, new_scale: f64) {
        let factor = new_scale / self.state.scale;
        let t = anchored_translation(
            anchor,
            Point::new(self.state.translate_x, self.state.translate_y),
            factor,
        );
        self.animate_to_transform(new_scale, t.x, t.y);
    }

    /// Centers content point `(x, y)` (untransformed viewport pixels) at
    /// `target_scale`.
    pub fn zoom_to_point(&mut self, x: f64, y: f64, target_scale: f64) {
        let center = self.surface.viewport_rect().center();
        let scale = self.state.clamp_scale(target_scale);
        self.animate_to_transform(scale, center.x - x * scale, center.y - y * scale);
    }

    /// Like [`Self::zoom_to_point`] with the point given in percent of the
    /// untransformed image.
    pub fn zoom_to_percent(&mut self, x_pct: f64, y_pct: f64, target_scale: f64) {
        let rect = self.surface.viewport_rect();
        self.zoom_to_point(
            x_pct / 100.0 * rect.width,
            y_pct / 100.0 * rect.height,
            target_scale,
        );
    }

    /// Sets the animation target. A running animation is redirected rather
    /// than restarted.
    ///
    /// The target is clamped against the bounds of the target scale; an
    /// unreachable target would keep the loop alive forever.
    pub fn animate_to_transform(&mut self, target_scale: f64, target_x: f64, target_y: f64) {
        if self.destroyed {
            return;
        }
        let scale = self.state.clamp_scale(target_scale);
        let (x, y) = PanBounds::fitted(self.surface.viewport_rect(), scale)
            .expanded(self.state.limit_expansion_factor)
            .clamp(target_x, target_y);
        self.state.target_scale = scale;
        self.state.target_translate_x = x;
        self.state.target_translate_y = y;
        if !self.state.is_animating {
            self.state.is_animating = true;
            self.step();
            self.schedule_next();
        }
    }

    // ---- animation --------------------------------------------------------

    /// Runs one scheduled animation step.
    pub fn on_frame(&mut self) {
        self.pending_frame = None;
        if self.destroyed || !self.state.is_animating {
            return;
        }
        self.step();
        self.schedule_next();
    }

    fn step(&mut self) {
        let s = &mut self.state;
        let ds = s.target_scale - s.scale;
        let dx = s.target_translate_x - s.translate_x;
        let dy = s.target_translate_y - s.translate_y;

        s.scale += ds * self.speed;
        s.translate_x += dx * self.speed;
        s.translate_y += dy * self.speed;

        if ds.abs() < self.threshold && dx.abs() < self.threshold && dy.abs() < self.threshold {
            self.finish_animation();
        }

        self.clamp_translation();
        self.render();
    }

    fn finish_animation(&mut self) {
        let s = &mut self.state;
        s.scale = s.target_scale;
        s.translate_x = s.target_translate_x;
        s.translate_y = s.target_translate_y;
        s.is_animating = false;
    }

    fn schedule_next(&mut self) {
        if !self.state.is_animating {
            return;
        }
        self.pending_frame = self.scheduler.request_frame();
        if self.pending_frame.is_none() {
            log::warn!("animation frame unavailable, jumping to target");
            self.finish_animation();
            self.clamp_translation();
            self.render();
        }
    }

    /// Hard stop: the transform stays wherever the last frame left it.
    fn cancel_animation(&mut self) {
        self.state.is_animating = false;
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    // ---- input ------------------------------------------------------------

    /// Wheel zoom anchored at the pointer. Returns whether the event was
    /// processed; rate-limited and zero-delta events are ignored.
    pub fn wheel(&mut self, now_ms: f64, client: Point, delta_y: f64) -> bool {
        if self.destroyed || delta_y == 0.0 || !self.wheel.try_accept(now_ms) {
            return false;
        }
        let rect = self.surface.viewport_rect();
        let anchor = rect.to_local(client);
        let half_step = self.state.scale_step * 0.5;
        let delta = if delta_y > 0.0 { -half_step } else { half_step };
        let new_scale = self.state.clamp_scale(self.state.scale + delta);
        if new_scale != self.state.scale {
            self.zoom_around(anchor, new_scale);
        }
        true
    }

    pub fn mouse_down(&mut self, button: i16, client: Point) {
        if button == 0 {
            self.begin_drag(client);
        }
    }

    pub fn mouse_move(&mut self, client: Point) {
        self.drag_to(client);
    }

    pub fn mouse_up(&mut self) {
        self.end_drag();
    }

    pub fn touch_start(&mut self, touches: &[Point]) {
        if let Some(p) = single_touch(touches) {
            self.begin_drag(p);
        }
    }

    pub fn touch_move(&mut self, touches: &[Point]) {
        if let Some(p) = single_touch(touches) {
            self.drag_to(p);
        }
    }

    pub fn touch_end(&mut self) {
        self.end_drag();
    }

    fn begin_drag(&mut self, at: Point) {
        if self.destroyed {
            return;
        }
        self.cancel_animation();
        self.state.drag.begin(at);
        self.surface.set_grabbing(true);
    }

    fn drag_to(&mut self, at: Point) {
        if let Some((dx, dy)) = self.state.drag.move_to(at) {
            self.state.translate_x += dx;
            self.state.translate_y += dy;
            self.clamp_translation();
            self.render();
        }
    }

    fn end_drag(&mut self) {
        if self.state.drag.active {
            self.state.drag.end();
            self.surface.set_grabbing(false);
        }
    }

    // ---- bounds -----------------------------------------------------------

    pub fn pan_bounds(&self) -> PanBounds {
        PanBounds::fitted(self.surface.viewport_rect(), self.state.scale)
            .expanded(self.state.limit_expansion_factor)
    }

    fn clamp_translation(&mut self) {
        let (x, y) = self
            .pan_bounds()
            .clamp(self.state.translate_x, self.state.translate_y);
        self.state.translate_x = x;
        self.state.translate_y = y;
    }

    /// Sets the expansion factor (floored to 1) and re-clamps without
    /// animating.
    pub fn set_limit_expansion_factor(&mut self, factor: f64) {
        if self.destroyed {
            return;
        }
        self.state.limit_expansion_factor = if factor.is_finite() {
            factor.max(1.0)
        } else {
            1.0
        };
        log::debug!(
            "limit expansion factor set to {}x",
            self.state.limit_expansion_factor
        );
        self.clamp_translation();
        self.render();
    }

    pub fn limits_info(&self) -> LimitsInfo {
        let original = PanBounds::fitted(self.surface.viewport_rect(), self.state.scale);
        LimitsInfo {
            expansion_factor: self.state.limit_expansion_factor,
            original,
            expanded: original.expanded(self.state.limit_expansion_factor),
            current: self.transform(),
        }
    }

    // ---- coordinate mapping -----------------------------------------------

    pub fn transformed_coordinates(&self, x: f64, y: f64) -> Point {
        Point::new(
            x * self.state.scale + self.state.translate_x,
            y * self.state.scale + self.state.translate_y,
        )
    }

    pub fn original_coordinates(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.state.translate_x) / self.state.scale,
            (y - self.state.translate_y) / self.state.scale,
        )
    }

    fn render(&mut self) {
        let t = self.transform();
        self.surface.apply_transform(&t);
        let controls = self.zoom_controls();
        self.surface.set_zoom_controls(controls);
    }

    /// Cancels the pending frame and stops reacting to input. Safe to call
    /// more than once.
    pub fn destroy(&mut self) {
        self.cancel_animation();
        self.state.drag.end();
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SurfaceLog {
        rect: ViewportRect,
        painted: Vec<Transform>,
        controls: Option<ZoomControlState>,
        grabbing: bool,
    }

    struct RecordingSurface(Rc<RefCell<SurfaceLog>>);

    impl ViewportSurface for RecordingSurface {
        fn viewport_rect(&self) -> ViewportRect {
            self.0.borrow().rect
        }
        fn apply_transform(&mut self, transform: &Transform) {
            self.0.borrow_mut().painted.push(*transform);
        }
        fn set_zoom_controls(&mut self, state: ZoomControlState) {
            self.0.borrow_mut().controls = Some(state);
        }
        fn set_grabbing(&mut self, grabbing: bool) {
            self.0.borrow_mut().grabbing = grabbing;
        }
    }

    #[derive(Default)]
    struct SchedulerLog {
        next_id: i32,
        requested: u32,
        cancelled: Vec<FrameHandle>,
        refuse: bool,
    }

    struct ManualScheduler(Rc<RefCell<SchedulerLog>>);

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            let mut log = self.0.borrow_mut();
            if log.refuse {
                return None;
            }
            log.next_id += 1;
            log.requested += 1;
            Some(FrameHandle(log.next_id))
        }
        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.0.borrow_mut().cancelled.push(handle);
        }
    }

    struct Harness {
        engine: ViewportEngine,
        surface: Rc<RefCell<SurfaceLog>>,
        frames: Rc<RefCell<SchedulerLog>>,
    }

    fn harness_with(rect: ViewportRect) -> Harness {
        let surface = Rc::new(RefCell::new(SurfaceLog {
            rect,
            ..Default::default()
        }));
        let frames = Rc::new(RefCell::new(SchedulerLog::default()));
        let engine = ViewportEngine::new(
            ViewportConfig::default(),
            Box::new(RecordingSurface(surface.clone())),
            Box::new(ManualScheduler(frames.clone())),
        );
        Harness {
            engine,
            surface,
            frames,
        }
    }

    fn harness() -> Harness {
        harness_with(ViewportRect::new(0.0, 0.0, 800.0, 600.0))
    }

    /// Runs scheduled frames until the animation stops; returns how many ran.
    fn drain(engine: &mut ViewportEngine) -> usize {
        let mut frames = 0;
        while engine.is_animating() {
            engine.on_frame();
            frames += 1;
            assert!(frames < 10_000, "animation never settled");
        }
        frames
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_at_identity_and_paints_once() {
        let h = harness();
        assert_eq!(h.engine.transform(), Transform::IDENTITY);
        assert_eq!(h.surface.borrow().painted, vec![Transform::IDENTITY]);
        assert_eq!(
            h.surface.borrow().controls,
            Some(ZoomControlState {
                zoom_in_enabled: true,
                zoom_out_enabled: true
            })
        );
    }

    #[test]
    fn css_transform_string() {
        let t = Transform {
            scale: 2.0,
            translate_x: -10.5,
            translate_y: 4.0,
        };
        assert_eq!(t.to_css(), "translate3d(-10.5px, 4px, 0) scale(2)");
    }

    #[test]
    fn coordinate_mapping_round_trips() {
        let mut h = harness();
        h.engine.animate_to_transform(2.7, -310.0, 125.0);
        h.engine.on_frame();
        h.engine.on_frame();
        for &(x, y) in &[(0.0, 0.0), (123.4, -56.7), (800.0, 600.0), (-1e4, 3e3)] {
            let t = h.engine.transformed_coordinates(x, y);
            let back = h.engine.original_coordinates(t.x, t.y);
            assert!((back.x - x).abs() < 1e-6 && (back.y - y).abs() < 1e-6);
        }
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut h = harness();
        h.engine.animate_to_transform(3.0, 5000.0, -5000.0);
        drain(&mut h.engine);
        let once = h.engine.transform();
        h.engine.clamp_translation();
        assert_eq!(h.engine.transform(), once);
        // 800 * 3 = 2400 wide, fitted 800, expanded by 3
        assert!(close(once.translate_x, 2400.0));
        assert!(close(once.translate_y, -1800.0));
    }

    #[test]
    fn bounds_scale_linearly_with_expansion_factor() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 0.0, 0.0);
        drain(&mut h.engine);
        let mut last = 0.0;
        for factor in [1.0, 2.0, 3.0, 5.0, 10.0] {
            h.engine.set_limit_expansion_factor(factor);
            let info = h.engine.limits_info();
            assert!(close(info.expanded.max_x, info.original.max_x * factor));
            assert!(close(info.expanded.range_y, info.original.range_y * factor));
            assert!(info.expanded.max_x >= last);
            last = info.expanded.max_x;
        }
        assert!(close(h.engine.limits_info().original.max_x, 400.0));
    }

    #[test]
    fn expansion_factor_is_floored_and_reclamps_immediately() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 1000.0, 0.0);
        drain(&mut h.engine);
        assert!(close(h.engine.transform().translate_x, 1000.0));
        let painted = h.surface.borrow().painted.len();

        h.engine.set_limit_expansion_factor(-4.0);
        assert_eq!(h.engine.state().limit_expansion_factor, 1.0);
        assert!(close(h.engine.transform().translate_x, 400.0));
        assert!(!h.engine.is_animating());
        assert_eq!(h.surface.borrow().painted.len(), painted + 1);

        h.engine.set_limit_expansion_factor(f64::NAN);
        assert_eq!(h.engine.state().limit_expansion_factor, 1.0);
    }

    #[test]
    fn zoom_in_twenty_times_reaches_four() {
        let mut h = harness();
        for _ in 0..20 {
            h.engine.zoom_in();
            drain(&mut h.engine);
        }
        assert!((h.engine.state().scale - 4.0).abs() < 1e-9);
        assert!(h.engine.zoom_controls().zoom_in_enabled);
    }

    #[test]
    fn zoom_in_saturates_at_max_scale() {
        let mut h = harness();
        for _ in 0..30 {
            h.engine.zoom_in();
            drain(&mut h.engine);
        }
        assert_eq!(h.engine.state().scale, 5.0);
        let controls = h.surface.borrow().controls.unwrap();
        assert!(!controls.zoom_in_enabled);
        assert!(controls.zoom_out_enabled);

        // already at max: no new animation
        let requested = h.frames.borrow().requested;
        h.engine.zoom_in();
        assert!(!h.engine.is_animating());
        assert_eq!(h.frames.borrow().requested, requested);
    }

    #[test]
    fn zoom_out_saturates_at_min_scale() {
        let mut h = harness();
        for _ in 0..10 {
            h.engine.zoom_out();
            drain(&mut h.engine);
            let s = h.engine.state().scale;
            assert!((0.3..=5.0).contains(&s));
        }
        assert_eq!(h.engine.state().scale, 0.3);
        let controls = h.engine.zoom_controls();
        assert!(controls.zoom_in_enabled);
        assert!(!controls.zoom_out_enabled);
    }

    #[test]
    fn wheel_sequence_stays_in_scale_bounds() {
        let mut h = harness();
        let mut now = 0.0;
        for i in 0..120 {
            let delta = if i < 80 { -100.0 } else { 100.0 };
            now += 20.0;
            h.engine.wheel(now, Point::new(300.0, 200.0), delta);
            drain(&mut h.engine);
            let s = h.engine.state().scale;
            assert!((0.3..=5.0).contains(&s), "scale {s} escaped");
            let c = h.engine.zoom_controls();
            assert_eq!(!c.zoom_in_enabled, s == 5.0);
            assert_eq!(!c.zoom_out_enabled, s == 0.3);
        }
    }

    #[test]
    fn wheel_is_rate_limited() {
        let mut h = harness();
        assert!(h.engine.wheel(1000.0, Point::new(400.0, 300.0), -1.0));
        assert!(!h.engine.wheel(1010.0, Point::new(400.0, 300.0), -1.0));
        assert!(close(h.engine.state().target_scale, 1.075));
        assert!(h.engine.wheel(1016.0, Point::new(400.0, 300.0), -1.0));
        assert!(close(h.engine.state().target_scale, h.engine.state().scale + 0.075));
    }

    #[test]
    fn zero_wheel_delta_is_ignored() {
        let mut h = harness();
        assert!(!h.engine.wheel(0.0, Point::new(10.0, 10.0), 0.0));
        assert!(!h.engine.is_animating());
    }

    #[test]
    fn wheel_zoom_keeps_content_under_pointer() {
        // viewport offset on the page, pointer given in client coordinates
        let mut h = harness_with(ViewportRect::new(50.0, 80.0, 800.0, 600.0));
        let client = Point::new(550.0, 480.0);
        let local = Point::new(500.0, 400.0);
        let before = h.engine.original_coordinates(local.x, local.y);
        h.engine.wheel(0.0, client, -120.0);
        drain(&mut h.engine);
        assert!(close(h.engine.state().scale, 1.075));
        let after = h.engine.original_coordinates(local.x, local.y);
        assert!((before.x - after.x).abs() < 1e-6);
        assert!((before.y - after.y).abs() < 1e-6);
    }

    #[test]
    fn button_zoom_is_anchored_at_center() {
        let mut h = harness();
        let center = Point::new(400.0, 300.0);
        let before = h.engine.original_coordinates(center.x, center.y);
        h.engine.zoom_in();
        drain(&mut h.engine);
        let after = h.engine.original_coordinates(center.x, center.y);
        assert!(close(h.engine.state().scale, 1.15));
        assert!((before.x - after.x).abs() < 1e-6);
        assert!((before.y - after.y).abs() < 1e-6);
    }

    #[test]
    fn animation_converges_and_terminates() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 50.0, 50.0);
        // first step ran synchronously
        assert!(close(h.engine.state().scale, 1.15));
        let frames = drain(&mut h.engine);
        assert!((60..=80).contains(&frames), "took {frames} frames");
        assert_eq!(h.engine.transform().scale, 2.0);
        assert_eq!(h.engine.transform().translate_x, 50.0);
        assert_eq!(h.engine.transform().translate_y, 50.0);
        assert!(!h.engine.is_animating());

        // no frame requested after the final snap
        let requested = h.frames.borrow().requested;
        h.engine.on_frame();
        assert_eq!(h.frames.borrow().requested, requested);
    }

    #[test]
    fn every_painted_frame_is_within_bounds() {
        let mut h = harness();
        h.engine.animate_to_transform(4.0, -9000.0, 9000.0);
        drain(&mut h.engine);
        let rect = h.engine.viewport_rect();
        for t in &h.surface.borrow().painted {
            let b = PanBounds::fitted(rect, t.scale).expanded(3.0);
            assert!(t.translate_x.abs() <= b.max_x + 1e-9);
            assert!(t.translate_y.abs() <= b.max_y + 1e-9);
        }
    }

    #[test]
    fn retargeting_redirects_the_running_animation() {
        let mut h = harness();
        h.engine.animate_to_transform(3.0, 0.0, 0.0);
        h.engine.on_frame();
        let requested = h.frames.borrow().requested;
        let mid = h.engine.state().scale;
        h.engine.animate_to_transform(1.5, 0.0, 0.0);
        // no second loop, no jump
        assert_eq!(h.frames.borrow().requested, requested);
        assert_eq!(h.engine.state().scale, mid);
        drain(&mut h.engine);
        assert_eq!(h.engine.state().scale, 1.5);
    }

    #[test]
    fn drag_start_cancels_animation_in_place() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 0.0, 0.0);
        h.engine.on_frame();
        h.engine.on_frame();
        let in_flight = h.engine.transform();
        h.engine.mouse_down(0, Point::new(100.0, 100.0));
        assert!(!h.engine.is_animating());
        assert!(h.engine.state().is_dragging());
        assert_eq!(h.engine.transform(), in_flight);
        assert_eq!(h.frames.borrow().cancelled, vec![FrameHandle(3)]);
        assert!(h.surface.borrow().grabbing);

        // a stale frame callback does nothing
        h.engine.on_frame();
        assert_eq!(h.engine.transform(), in_flight);
    }

    #[test]
    fn touch_start_cancels_animation_in_place() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 0.0, 0.0);
        h.engine.on_frame();
        h.engine.on_frame();
        let in_flight = h.engine.transform();
        h.engine.touch_start(&[Point::new(100.0, 100.0)]);
        assert!(!h.engine.is_animating());
        assert!(h.engine.state().is_dragging());
        assert_eq!(h.engine.transform(), in_flight);
        assert_eq!(h.frames.borrow().cancelled, vec![FrameHandle(3)]);

        h.engine.on_frame();
        assert_eq!(h.engine.transform(), in_flight);
    }

    #[test]
    fn initial_scale_respects_configured_bounds() {
        let surface = Rc::new(RefCell::new(SurfaceLog {
            rect: ViewportRect::new(0.0, 0.0, 800.0, 600.0),
            ..Default::default()
        }));
        let frames = Rc::new(RefCell::new(SchedulerLog::default()));
        let config = ViewportConfig {
            min_scale: 1.5,
            ..ViewportConfig::default()
        };
        let mut engine = ViewportEngine::new(
            config,
            Box::new(RecordingSurface(surface.clone())),
            Box::new(ManualScheduler(frames.clone())),
        );
        assert_eq!(engine.state().scale, 1.5);
        assert_eq!(surface.borrow().painted[0].scale, 1.5);
        assert_eq!(
            surface.borrow().controls,
            Some(ZoomControlState {
                zoom_in_enabled: true,
                zoom_out_enabled: false
            })
        );

        engine.zoom_in();
        drain(&mut engine);
        engine.reset_zoom();
        drain(&mut engine);
        assert_eq!(
            engine.transform(),
            Transform {
                scale: 1.5,
                translate_x: 0.0,
                translate_y: 0.0
            }
        );
    }

    #[test]
    fn mouse_drag_pans_one_to_one_and_clamps() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 0.0, 0.0);
        drain(&mut h.engine);
        h.engine.mouse_down(0, Point::new(100.0, 100.0));
        h.engine.mouse_move(Point::new(130.0, 90.0));
        assert_eq!(h.engine.transform().translate_x, 30.0);
        assert_eq!(h.engine.transform().translate_y, -10.0);
        assert_eq!(h.engine.state().scale, 2.0);

        h.engine.mouse_move(Point::new(5000.0, 90.0));
        assert!(close(h.engine.transform().translate_x, 1200.0));

        h.engine.mouse_up();
        assert!(!h.engine.state().is_dragging());
        assert!(!h.surface.borrow().grabbing);
        h.engine.mouse_move(Point::new(0.0, 0.0));
        assert!(close(h.engine.transform().translate_x, 1200.0));
    }

    #[test]
    fn secondary_button_does_not_drag() {
        let mut h = harness();
        h.engine.mouse_down(2, Point::new(10.0, 10.0));
        assert!(!h.engine.state().is_dragging());
    }

    #[test]
    fn single_finger_touch_pans_and_multi_touch_is_ignored() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 0.0, 0.0);
        drain(&mut h.engine);

        h.engine
            .touch_start(&[Point::new(0.0, 0.0), Point::new(50.0, 50.0)]);
        assert!(!h.engine.state().is_dragging());

        h.engine.touch_start(&[Point::new(10.0, 10.0)]);
        h.engine.touch_move(&[Point::new(30.0, 40.0)]);
        assert_eq!(h.engine.transform().translate_x, 20.0);
        assert_eq!(h.engine.transform().translate_y, 30.0);

        h.engine
            .touch_move(&[Point::new(90.0, 90.0), Point::new(0.0, 0.0)]);
        assert_eq!(h.engine.transform().translate_x, 20.0);

        h.engine.touch_end();
        assert!(!h.engine.state().is_dragging());
    }

    #[test]
    fn zoom_to_point_centers_content_point() {
        let mut h = harness();
        h.engine.zoom_to_point(500.0, 250.0, 2.0);
        drain(&mut h.engine);
        let on_screen = h.engine.transformed_coordinates(500.0, 250.0);
        assert!(close(on_screen.x, 400.0));
        assert!(close(on_screen.y, 300.0));

        h.engine.zoom_to_point(100.0, 100.0, 50.0);
        drain(&mut h.engine);
        assert_eq!(h.engine.state().scale, 5.0);
    }

    #[test]
    fn zoom_to_percent_uses_viewport_size() {
        let mut h = harness();
        h.engine.zoom_to_percent(50.0, 50.0, 2.0);
        drain(&mut h.engine);
        // center of the image stays centered
        assert!(close(h.engine.transform().translate_x, -400.0));
        assert!(close(h.engine.transform().translate_y, -300.0));
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut h = harness();
        h.engine.zoom_to_point(200.0, 100.0, 3.0);
        drain(&mut h.engine);
        h.engine.reset_zoom();
        drain(&mut h.engine);
        assert_eq!(h.engine.transform(), Transform::IDENTITY);
    }

    #[test]
    fn detached_viewport_collapses_bounds() {
        let mut h = harness_with(ViewportRect::default());
        h.engine.animate_to_transform(3.0, 250.0, -250.0);
        drain(&mut h.engine);
        let t = h.engine.transform();
        assert_eq!(t.scale, 3.0);
        assert_eq!((t.translate_x, t.translate_y), (0.0, 0.0));
        let info = h.engine.limits_info();
        assert_eq!(info.expanded, PanBounds::default());
        assert!(h.surface.borrow().painted.iter().all(|t| {
            t.scale.is_finite() && t.translate_x.is_finite() && t.translate_y.is_finite()
        }));
    }

    #[test]
    fn non_finite_rect_reads_as_zero() {
        let r = ViewportRect::new(f64::NAN, 3.0, f64::INFINITY, -5.0);
        assert_eq!(r, ViewportRect::new(0.0, 3.0, 0.0, 0.0));
    }

    #[test]
    fn refused_frame_finishes_immediately() {
        let mut h = harness();
        h.frames.borrow_mut().refuse = true;
        h.engine.animate_to_transform(2.0, 10.0, 10.0);
        assert!(!h.engine.is_animating());
        assert_eq!(h.engine.transform().scale, 2.0);
    }

    #[test]
    fn destroy_is_idempotent_and_makes_engine_inert() {
        let mut h = harness();
        h.engine.animate_to_transform(2.0, 0.0, 0.0);
        h.engine.destroy();
        h.engine.destroy();
        assert_eq!(h.frames.borrow().cancelled, vec![FrameHandle(1)]);
        assert!(h.engine.is_destroyed());

        let frozen = h.engine.transform();
        h.engine.zoom_in();
        h.engine.wheel(0.0, Point::new(1.0, 1.0), -1.0);
        h.engine.mouse_down(0, Point::new(1.0, 1.0));
        h.engine.on_frame();
        assert_eq!(h.engine.transform(), frozen);
        assert!(!h.engine.state().is_dragging());
    }

    #[test]
    fn factor_changes_are_ignored_after_destroy() {
        let mut h = harness();
        h.engine.destroy();
        let painted = h.surface.borrow().painted.len();
        h.engine.set_limit_expansion_factor(10.0);
        assert_eq!(h.engine.limits_info().expansion_factor, 3.0);
        assert_eq!(h.surface.borrow().painted.len(), painted);
    }

    #[test]
    fn limits_info_serializes_camel_case() {
        let h = harness();
        let json = serde_json::to_value(h.engine.limits_info()).unwrap();
        assert_eq!(json["expansionFactor"], 3.0);
        assert_eq!(json["current"]["translateX"], 0.0);
        assert!(json["expanded"].get("rangeX").is_some());
    }
}
