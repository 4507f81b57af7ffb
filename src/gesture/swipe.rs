use std::time::{Duration, Instant};

use super::Point;

/// Overshoot allowed past a panel's resting width before release snaps it.
const SLACK: f32 = 1.08;

/// Movement needed before a session commits to an axis.
const AXIS_LOCK_DIST: f32 = 5.0;

/// Duration of every settle animation (open, close, spring-back), so
/// repeated gestures feel uniform.
pub const SETTLE_DURATION: Duration = Duration::from_millis(280);

/// How long action panels stay renderable after a close starts. Dropping
/// them only after the settle finishes keeps them from flashing out
/// mid-animation.
const PANEL_HIDE_DELAY: Duration = Duration::from_millis(300);

/// Which action panel a row can reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Axis commitment for the current touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Undecided,
    Horizontal,
    /// Page scroll; the session is inert from here on
    Vertical,
}

/// Per-row swipe configuration. A width of zero disables that side.
#[derive(Debug, Clone, Copy)]
pub struct SwipeConfig {
    pub left_panel_width: f32,
    pub right_panel_width: f32,
    pub open_threshold: f32,
    pub close_threshold: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        SwipeConfig {
            left_panel_width: 0.0,
            right_panel_width: 0.0,
            open_threshold: 60.0,
            close_threshold: 40.0,
        }
    }
}

/// In-flight settle animation toward a resting offset.
#[derive(Debug, Clone, Copy)]
struct Settle {
    from: f32,
    to: f32,
    started: Instant,
}

/// Converts one touch sequence on a list row into a clamped horizontal
/// offset and a settled reveal state. One controller per row; sessions
/// are strictly sequential (a sequence ends before the next starts).
#[derive(Debug)]
pub struct SwipeController {
    config: SwipeConfig,
    start: Point,
    axis: Axis,
    /// Signed horizontal displacement of the row's content layer.
    /// Persists across sessions: it is the resting offset between drags.
    offset: f32,
    revealed: Option<Side>,
    did_swipe: bool,
    dragging: bool,
    settle: Option<Settle>,
    left_visible: bool,
    right_visible: bool,
    hide_panels_at: Option<Instant>,
}

impl SwipeController {
    pub fn new(config: SwipeConfig) -> Self {
        SwipeController {
            config,
            start: Point::default(),
            axis: Axis::Undecided,
            offset: 0.0,
            revealed: None,
            did_swipe: false,
            dragging: false,
            settle: None,
            left_visible: false,
            right_visible: false,
            hide_panels_at: None,
        }
    }

    /// Which panel is fully revealed at rest.
    pub fn revealed(&self) -> Option<Side> {
        self.revealed
    }

    /// True once the current (or just-ended) sequence moved horizontally.
    /// The caller's click handler consults this to suppress the tap that
    /// follows a swipe.
    pub fn did_swipe(&self) -> bool {
        self.did_swipe
    }

    /// Whether a side's action buttons should be rendered/hittable.
    pub fn panel_visible(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_visible,
            Side::Right => self.right_visible,
        }
    }

    /// The content-layer offset to render at `now`, sampling any settle
    /// animation in progress.
    pub fn offset_at(&self, now: Instant) -> f32 {
        match self.settle {
            Some(s) => {
                let t = (now.duration_since(s.started).as_secs_f32()
                    / SETTLE_DURATION.as_secs_f32())
                .clamp(0.0, 1.0);
                s.from + (s.to - s.from) * ease_out_cubic(t)
            }
            None => self.offset,
        }
    }

    pub fn on_touch_start(&mut self, point: Point) {
        // A new drag takes over from any settle in flight; the row jumps
        // to the settle target, which is the session's resting base.
        if let Some(s) = self.settle.take() {
            self.offset = s.to;
        }
        self.start = point;
        self.axis = Axis::Undecided;
        self.did_swipe = false;
        self.dragging = true;
    }

    pub fn on_touch_move(&mut self, point: Point) {
        if !self.dragging {
            return;
        }
        let dx = point.x - self.start.x;
        let dy = point.y - self.start.y;

        if self.axis == Axis::Undecided {
            if dy.abs() > dx.abs() && dy.abs() > AXIS_LOCK_DIST {
                self.axis = Axis::Vertical;
                return;
            }
            if dx.abs() > AXIS_LOCK_DIST {
                self.axis = Axis::Horizontal;
            }
        }
        if self.axis != Axis::Horizontal {
            return;
        }

        self.did_swipe = true;

        let base = match self.revealed {
            Some(Side::Left) => self.config.left_panel_width,
            Some(Side::Right) => -self.config.right_panel_width,
            None => 0.0,
        };
        let mut raw = base + dx;

        if raw > 0.0 {
            if self.config.left_panel_width > 0.0 {
                raw = raw.min(self.config.left_panel_width * SLACK);
                self.left_visible = true;
            } else {
                raw = 0.0;
            }
        }
        if raw < 0.0 {
            if self.config.right_panel_width > 0.0 {
                raw = raw.max(-self.config.right_panel_width * SLACK);
                self.right_visible = true;
            } else {
                raw = 0.0;
            }
        }

        self.offset = raw;
    }

    pub fn on_touch_end(&mut self, now: Instant) {
        self.dragging = false;
        let off = self.offset;
        let cfg = self.config;

        match self.revealed {
            Some(Side::Left) => {
                if off < cfg.left_panel_width - cfg.close_threshold {
                    self.settle_to(0.0, None, now);
                } else {
                    self.settle_to(cfg.left_panel_width, Some(Side::Left), now);
                }
            }
            Some(Side::Right) => {
                if off > -(cfg.right_panel_width - cfg.close_threshold) {
                    self.settle_to(0.0, None, now);
                } else {
                    self.settle_to(-cfg.right_panel_width, Some(Side::Right), now);
                }
            }
            None => {
                if off > cfg.open_threshold && cfg.left_panel_width > 0.0 {
                    self.settle_to(cfg.left_panel_width, Some(Side::Left), now);
                } else if off < -cfg.open_threshold && cfg.right_panel_width > 0.0 {
                    self.settle_to(-cfg.right_panel_width, Some(Side::Right), now);
                } else {
                    self.settle_to(0.0, None, now);
                }
            }
        }
    }

    /// Programmatic snap-to-closed (action buttons call this after they
    /// fire). Returns the side that was revealed, if any.
    pub fn close(&mut self, now: Instant) -> Option<Side> {
        self.dragging = false;
        let was = self.revealed;
        self.settle_to(0.0, None, now);
        was
    }

    /// Advance animations. Call once per frame/tick.
    pub fn tick(&mut self, now: Instant) {
        if let Some(s) = self.settle
            && now.duration_since(s.started) >= SETTLE_DURATION
        {
            self.offset = s.to;
            self.settle = None;
        }
        if let Some(at) = self.hide_panels_at
            && now >= at
        {
            self.hide_panels_at = None;
            if self.revealed.is_none() {
                self.left_visible = false;
                self.right_visible = false;
            }
        }
    }

    fn settle_to(&mut self, target: f32, revealed: Option<Side>, now: Instant) {
        let from = self.offset_at(now);
        self.offset = target;
        self.revealed = revealed;
        self.settle = Some(Settle {
            from,
            to: target,
            started: now,
        });
        if revealed.is_none() {
            self.hide_panels_at = Some(now + PANEL_HIDE_DELAY);
        } else {
            self.hide_panels_at = None;
        }
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u * u
}
