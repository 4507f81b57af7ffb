use std::time::{Duration, Instant};

/// Quiet period after the last scroll event before the stick-to-bottom
/// flag is re-evaluated.
const SCROLL_SETTLE: Duration = Duration::from_millis(80);

/// Geometry of the editor's scroll surface, in rows. `content_rows`
/// covers everything above and including the body field.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scroll_top: usize,
    pub height: usize,
    pub content_rows: usize,
}

impl Viewport {
    fn max_scroll(&self) -> usize {
        self.content_rows.saturating_sub(self.height)
    }

    fn is_overflowing(&self) -> bool {
        self.content_rows > self.height
    }
}

/// Keeps the caret's line inside the visible region while the body grows,
/// without fighting the user's own scrolling.
///
/// The owner reports caret/viewport changes and scroll events; this
/// struct answers with the scroll position to apply, and tracks whether
/// the view is "sticking" to the caret at the tail of the content.
#[derive(Debug)]
pub struct CaretFollow {
    /// Rows kept between the caret and the viewport edges
    margin: usize,
    /// Distance from the bottom under which the view counts as sticking
    bottom_tolerance: usize,
    stick: bool,
    was_overflowing: bool,
    /// Deadline for the debounced scroll-end check
    settle_at: Option<Instant>,
}

impl CaretFollow {
    pub fn new(margin: usize) -> Self {
        CaretFollow {
            margin,
            bottom_tolerance: 3,
            stick: true,
            was_overflowing: false,
            settle_at: None,
        }
    }

    pub fn is_sticking(&self) -> bool {
        self.stick
    }

    /// Body field focused (or re-focused): resume following.
    pub fn on_focus(&mut self) {
        self.stick = true;
    }

    /// Body was emptied: the caret is trivially at the tail again.
    pub fn on_cleared(&mut self) {
        self.stick = true;
    }

    /// Content height changed after an edit. `caret_bottom` is the row
    /// just below the caret's line, in content coordinates. Returns the
    /// new scroll_top if the view should move.
    pub fn on_resize(&mut self, view: Viewport, caret_bottom: usize) -> Option<usize> {
        let overflowing = view.is_overflowing();
        let just_overflowed = overflowing && !self.was_overflowing;
        self.was_overflowing = overflowing;

        // When the user scrolled away we leave the view alone, except for
        // the one frame where the content first outgrows the viewport.
        if !self.stick && !just_overflowed {
            return None;
        }
        self.follow(view, caret_bottom)
    }

    /// Caret moved without a size change (arrow keys, click).
    pub fn on_caret_moved(&mut self, view: Viewport, caret_bottom: usize) -> Option<usize> {
        if !self.stick {
            return None;
        }
        self.follow(view, caret_bottom)
    }

    /// The user scrolled the container. Scroll positions this struct hands
    /// back are applied by the owner and never come back through here, so
    /// every call arms the settle check.
    pub fn on_scroll(&mut self, now: Instant) {
        self.settle_at = Some(now + SCROLL_SETTLE);
    }

    /// Advance the debounced scroll-end check.
    pub fn tick(&mut self, now: Instant, view: Viewport) {
        if let Some(at) = self.settle_at
            && now >= at
        {
            self.settle_at = None;
            let gap = view.content_rows.saturating_sub(view.scroll_top + view.height);
            self.stick = gap < self.bottom_tolerance;
        }
    }

    fn follow(&mut self, view: Viewport, caret_bottom: usize) -> Option<usize> {
        let visible_bottom = view.scroll_top + view.height;
        let caret_top = caret_bottom.saturating_sub(1);

        let new_top = if caret_bottom + self.margin > visible_bottom {
            // Scroll down by exactly the overflow
            (caret_bottom + self.margin - view.height).min(view.max_scroll())
        } else if caret_top < view.scroll_top {
            caret_top
        } else {
            return None;
        };

        if new_top == view.scroll_top {
            return None;
        }
        Some(new_top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(scroll_top: usize, height: usize, content_rows: usize) -> Viewport {
        Viewport {
            scroll_top,
            height,
            content_rows,
        }
    }

    #[test]
    fn caret_below_view_scrolls_down_by_overflow() {
        let mut f = CaretFollow::new(2);
        // Viewport shows rows 0..10; caret bottom at row 12
        let new_top = f.on_resize(view(0, 10, 20), 12).unwrap();
        // 12 + margin 2 must be visible: top = 14 - 10 = 4
        assert_eq!(new_top, 4);
    }

    #[test]
    fn caret_above_view_scrolls_up() {
        let mut f = CaretFollow::new(2);
        let new_top = f.on_caret_moved(view(8, 10, 30), 4).unwrap();
        assert_eq!(new_top, 3); // caret_top
    }

    #[test]
    fn caret_inside_view_does_not_move() {
        let mut f = CaretFollow::new(2);
        assert_eq!(f.on_resize(view(0, 10, 20), 5), None);
    }

    #[test]
    fn auto_scrolls_do_not_swallow_later_user_scrolls() {
        let mut f = CaretFollow::new(2);
        let now = Instant::now();
        // Typing grows the content; each resize hands back a scroll that
        // the owner applies directly, with no echo through on_scroll.
        let mut top = 0;
        for rows in 13..18 {
            top = f.on_resize(view(top, 10, rows), rows).unwrap();
            assert_eq!(top, rows - 10);
        }
        // The user then wheels to the top of the 18 rows
        for step in 0..4 {
            f.on_scroll(now + Duration::from_millis(step * 10));
        }
        f.tick(now + Duration::from_millis(30) + SCROLL_SETTLE + Duration::from_millis(1), view(0, 10, 18));
        assert!(!f.is_sticking());
    }

    #[test]
    fn user_scroll_away_clears_stick_after_settle() {
        let mut f = CaretFollow::new(2);
        let now = Instant::now();
        f.on_scroll(now);
        // Scrolled to the top of tall content: far from the bottom
        f.tick(now + SCROLL_SETTLE + Duration::from_millis(1), view(0, 10, 50));
        assert!(!f.is_sticking());
    }

    #[test]
    fn user_scroll_near_bottom_keeps_stick() {
        let mut f = CaretFollow::new(2);
        let now = Instant::now();
        f.on_scroll(now);
        // gap = 50 - 39 - 10 = 1 < tolerance 3
        f.tick(now + SCROLL_SETTLE + Duration::from_millis(1), view(39, 10, 50));
        assert!(f.is_sticking());
    }

    #[test]
    fn settle_check_waits_for_quiet_period() {
        let mut f = CaretFollow::new(2);
        let now = Instant::now();
        f.on_scroll(now);
        f.tick(now + Duration::from_millis(40), view(0, 10, 50));
        assert!(f.is_sticking()); // too early, unchanged

        // A second scroll pushes the deadline out
        f.on_scroll(now + Duration::from_millis(50));
        f.tick(now + Duration::from_millis(100), view(0, 10, 50));
        assert!(f.is_sticking());
        f.tick(now + Duration::from_millis(131), view(0, 10, 50));
        assert!(!f.is_sticking());
    }

    #[test]
    fn unsticky_view_ignores_resize_until_first_overflow() {
        let mut f = CaretFollow::new(2);
        let now = Instant::now();
        f.on_scroll(now);
        f.tick(now + SCROLL_SETTLE + Duration::from_millis(1), view(0, 10, 50));
        assert!(!f.is_sticking());

        // Still fits (content shrank to under a viewport): no overflow yet
        assert_eq!(f.on_resize(view(0, 10, 8), 8), None);
        // The tick where content first overflows reveals the caret once
        assert!(f.on_resize(view(0, 10, 11), 11).is_some());
        // Subsequent growth while unstuck is ignored again... still unstuck
        assert!(!f.is_sticking());
        assert_eq!(f.on_resize(view(1, 10, 12), 12), None);
    }

    #[test]
    fn refocus_restores_stick() {
        let mut f = CaretFollow::new(2);
        let now = Instant::now();
        f.on_scroll(now);
        f.tick(now + SCROLL_SETTLE + Duration::from_millis(1), view(0, 10, 50));
        assert!(!f.is_sticking());
        f.on_focus();
        assert!(f.is_sticking());
    }
}
