// Pointer drag tracking and wheel rate limiting used by the viewport engine.
use super::viewport::Point;

/// Drag pan in progress, shared by mouse and single-finger touch input.
#[derive(Default, Debug, Clone)]
pub struct DragState {
    pub active: bool,
    pub last_x: f64,
    pub last_y: f64,
}

impl DragState {
    pub fn begin(&mut self, at: Point) {
        self.active = true;
        self.last_x = at.x;
        self.last_y = at.y;
    }

    /// Records a new pointer position and returns the delta since the last one.
    /// Returns `None` when no drag is active.
    pub fn move_to(&mut self, at: Point) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        let dx = at.x - self.last_x;
        let dy = at.y - self.last_y;
        self.last_x = at.x;
        self.last_y = at.y;
        Some((dx, dy))
    }

    pub fn end(&mut self) {
        self.active = false;
    }
}

/// Drops wheel events arriving closer together than `min_interval_ms`.
/// Dropped events are not queued.
#[derive(Debug, Clone)]
pub struct WheelThrottle {
    pub min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl WheelThrottle {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    pub fn try_accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms - last < self.min_interval_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }
}

/// The single touch point driving a pan, or `None` for zero or several fingers.
pub fn single_touch(touches: &[Point]) -> Option<Point> {
    match touches {
        [only] => Some(*only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_drops_events_inside_interval() {
        let mut t = WheelThrottle::new(16.0);
        assert!(t.try_accept(1000.0));
        assert!(!t.try_accept(1005.0));
        assert!(!t.try_accept(1015.9));
        assert!(t.try_accept(1016.0));
        // the dropped events did not move the window forward
        assert!(t.try_accept(1032.0));
    }

    #[test]
    fn drag_reports_deltas_only_while_active() {
        let mut d = DragState::default();
        assert_eq!(d.move_to(Point::new(5.0, 5.0)), None);
        d.begin(Point::new(10.0, 20.0));
        assert_eq!(d.move_to(Point::new(15.0, 18.0)), Some((5.0, -2.0)));
        assert_eq!(d.move_to(Point::new(15.0, 18.0)), Some((0.0, 0.0)));
        d.end();
        assert_eq!(d.move_to(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn single_touch_requires_exactly_one_finger() {
        assert_eq!(single_touch(&[]), None);
        assert_eq!(
            single_touch(&[Point::new(1.0, 2.0)]),
            Some(Point::new(1.0, 2.0))
        );
        assert_eq!(
            single_touch(&[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]),
            None
        );
    }
}
