use super::Point;

/// Vertical drift that abandons an unlocked edge swipe (it's a scroll).
const ABANDON_DRIFT: f32 = 10.0;

/// Rightward movement that commits the gesture to edge-back.
const LOCK_DIST: f32 = 2.0;

/// Horizontal displacement required to fire the back callback.
const FIRE_DIST: f32 = 80.0;

/// Maximum vertical drift allowed at release for the callback to fire.
const FIRE_DRIFT_CAP: f32 = 50.0;

/// What the event router should do with a pointer event after the
/// navigator has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Forward to descendant handlers as usual
    Pass,
    /// Swallow it: no descendant handler (row swipes, tab buttons, the
    /// synthetic click after release) may react
    Capture,
}

/// Document-level edge-swipe-back recognizer. Sees every pointer event
/// before any row controller; once a drag starting in the left edge zone
/// commits to horizontal, it captures the rest of the sequence so the
/// same surface can host swipeable rows without conflict.
pub struct EdgeBackNavigator {
    edge_zone: f32,
    on_back: Option<Box<dyn FnMut()>>,
    start: Point,
    eligible: bool,
    locked: bool,
}

impl EdgeBackNavigator {
    pub fn new(edge_zone: f32) -> Self {
        EdgeBackNavigator {
            edge_zone,
            on_back: None,
            start: Point::default(),
            eligible: false,
            locked: false,
        }
    }

    /// Install or clear the back callback. With no callback the navigator
    /// is detached: it observes nothing and captures nothing.
    pub fn register(&mut self, on_back: Option<Box<dyn FnMut()>>) {
        self.on_back = on_back;
        self.eligible = false;
        self.locked = false;
    }

    pub fn is_attached(&self) -> bool {
        self.on_back.is_some()
    }

    pub fn on_touch_start(&mut self, point: Point) {
        if self.on_back.is_none() {
            return;
        }
        if point.x < self.edge_zone {
            self.start = point;
            self.eligible = true;
        } else {
            self.eligible = false;
        }
        self.locked = false;
    }

    pub fn on_touch_move(&mut self, point: Point) -> Disposition {
        if self.on_back.is_none() || !self.eligible {
            return Disposition::Pass;
        }
        let dx = point.x - self.start.x;
        let dy = (point.y - self.start.y).abs();

        // Clearly vertical before locking: release the edge claim and
        // never interfere with the scroll.
        if !self.locked && dy > ABANDON_DRIFT && dy > dx * 2.0 {
            self.eligible = false;
            return Disposition::Pass;
        }

        if dx > LOCK_DIST {
            self.locked = true;
        }
        if self.locked {
            Disposition::Capture
        } else {
            Disposition::Pass
        }
    }

    pub fn on_touch_end(&mut self, point: Point) -> Disposition {
        if self.on_back.is_none() || !self.eligible || !self.locked {
            self.eligible = false;
            self.locked = false;
            return Disposition::Pass;
        }
        let dx = point.x - self.start.x;
        let dy = (point.y - self.start.y).abs();
        if dx > FIRE_DIST
            && dy < FIRE_DRIFT_CAP
            && let Some(cb) = self.on_back.as_mut()
        {
            cb();
        }
        self.eligible = false;
        self.locked = false;
        self.start = Point::default();
        // Locked sequences always swallow the release (and with it the
        // synthetic click that would follow).
        Disposition::Capture
    }
}
