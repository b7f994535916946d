//! Vertical scroll state for text that overflows the viewport.

/// Distance moved by one up/down step, in logical units.
pub const SCROLL_STEP: u32 = 20;

/// Scrollbar width in logical units.
pub const SCROLLBAR_WIDTH: u32 = 4;
/// Gap between the scrollbar and the screen edge, in logical units.
pub const SCROLLBAR_PADDING: u32 = 2;
/// Minimum thumb height in logical units.
pub const SCROLLBAR_MIN_THUMB: u32 = 20;

/// Scroll offset of the selected item's text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub position: u32,
    pub content_height: u32,
    pub viewport_height: u32,
    pub needs_scroll: bool,
    /// Jump to the end of the content on the next layout pass.
    pub scroll_to_bottom: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            position: 0,
            content_height: 0,
            viewport_height: 0,
            needs_scroll: false,
            scroll_to_bottom: true,
        }
    }
}

/// Track and thumb placement, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarGeometry {
    pub track_y: i32,
    pub track_h: u32,
    pub thumb_y: i32,
    pub thumb_h: u32,
}

impl ScrollState {
    /// Reset for a newly selected item.
    pub fn reset(&mut self) {
        self.position = 0;
        self.scroll_to_bottom = true;
        self.needs_scroll = false;
    }

    fn max_position(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp a position to the valid range.
    pub fn clamp(&self, position: u32) -> u32 {
        position.min(self.max_position())
    }

    /// Update the measured sizes after a layout pass.
    pub fn recompute(&mut self, content_height: u32, viewport_height: u32) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.needs_scroll = content_height > viewport_height;

        if !self.needs_scroll {
            self.position = 0;
            return;
        }
        if self.scroll_to_bottom {
            self.position = self.max_position();
            self.scroll_to_bottom = false;
        } else {
            self.position = self.clamp(self.position);
        }
    }

    /// Scroll by `delta` pixels. Returns whether the state changed.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        if !self.needs_scroll {
            return false;
        }
        let target = (self.position as i64 + delta as i64).max(0) as u32;
        let position = self.clamp(target);
        let changed = position != self.position || self.scroll_to_bottom;
        self.position = position;
        self.scroll_to_bottom = false;
        changed
    }

    /// Scrollbar geometry for a viewport starting at `viewport_top`.
    ///
    /// `None` when the content fits.
    pub fn scrollbar(&self, viewport_top: i32, min_thumb: u32) -> Option<ScrollbarGeometry> {
        if !self.needs_scroll {
            return None;
        }
        let viewport = self.viewport_height as u64;
        let content = self.content_height as u64;
        let thumb_h = ((viewport * viewport / content) as u32)
            .max(min_thumb)
            .min(self.viewport_height);
        let space = (self.viewport_height - thumb_h) as u64;
        let offset = space * self.position as u64 / self.max_position() as u64;
        Some(ScrollbarGeometry {
            track_y: viewport_top,
            track_h: self.viewport_height,
            thumb_y: viewport_top + offset as i32,
            thumb_h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrolled(content: u32, viewport: u32) -> ScrollState {
        let mut s = ScrollState {
            scroll_to_bottom: false,
            ..ScrollState::default()
        };
        s.recompute(content, viewport);
        s
    }

    #[test]
    fn default_snaps_to_bottom() {
        let s = ScrollState::default();
        assert!(s.scroll_to_bottom);
        assert_eq!(s.position, 0);
    }

    #[test]
    fn needs_scroll_when_content_taller() {
        assert!(scrolled(500, 200).needs_scroll);
    }

    #[test]
    fn no_scroll_when_content_fits() {
        let s = scrolled(100, 200);
        assert!(!s.needs_scroll);
        assert_eq!(s.position, 0);
    }

    #[test]
    fn no_scroll_when_equal() {
        assert!(!scrolled(200, 200).needs_scroll);
    }

    #[test]
    fn recompute_applies_one_shot_bottom_snap() {
        let mut s = ScrollState::default();
        s.recompute(500, 200);
        assert_eq!(s.position, 300);
        assert!(!s.scroll_to_bottom);

        s.position = 10;
        s.recompute(500, 200);
        assert_eq!(s.position, 10);
    }

    #[test]
    fn bottom_snap_kept_while_content_fits() {
        let mut s = ScrollState::default();
        s.recompute(100, 200);
        assert!(s.scroll_to_bottom);
        s.recompute(500, 200);
        assert_eq!(s.position, 300);
    }

    #[test]
    fn recompute_clamps_after_shrink() {
        let mut s = scrolled(500, 200);
        s.position = 300;
        s.recompute(250, 200);
        assert_eq!(s.position, 50);
        s.recompute(150, 200);
        assert_eq!(s.position, 0);
    }

    #[test]
    fn scroll_by_positive() {
        let mut s = scrolled(500, 200);
        assert!(s.scroll_by(50));
        assert_eq!(s.position, 50);
    }

    #[test]
    fn scroll_by_negative() {
        let mut s = scrolled(500, 200);
        s.scroll_by(100);
        s.scroll_by(-30);
        assert_eq!(s.position, 70);
    }

    #[test]
    fn scroll_clamps_at_bottom() {
        let mut s = scrolled(500, 200);
        s.scroll_by(1000);
        assert_eq!(s.position, 300);
        assert!(!s.scroll_by(40));
    }

    #[test]
    fn scroll_clamps_at_top() {
        let mut s = scrolled(500, 200);
        assert!(!s.scroll_by(-100));
        assert_eq!(s.position, 0);
    }

    #[test]
    fn scroll_by_is_noop_when_content_fits() {
        let mut s = ScrollState::default();
        s.recompute(100, 200);
        assert!(!s.scroll_by(40));
        assert!(s.scroll_to_bottom);
    }

    #[test]
    fn scroll_by_clears_bottom_snap() {
        let mut s = scrolled(500, 200);
        s.scroll_to_bottom = true;
        assert!(s.scroll_by(-40));
        assert!(!s.scroll_to_bottom);
    }

    #[test]
    fn reset_returns_to_top_with_snap() {
        let mut s = scrolled(500, 200);
        s.scroll_by(80);
        s.reset();
        assert_eq!(s.position, 0);
        assert!(s.scroll_to_bottom);
    }

    #[test]
    fn reset_ignores_scroll_until_next_layout() {
        let mut s = scrolled(500, 200);
        s.reset();
        assert!(!s.scroll_by(-40));
        assert!(s.scroll_to_bottom);
        s.recompute(800, 200);
        assert_eq!(s.position, 600);
    }

    #[test]
    fn scrollbar_hidden_when_content_fits() {
        assert_eq!(scrolled(100, 200).scrollbar(0, 40), None);
    }

    #[test]
    fn scrollbar_thumb_geometry() {
        let mut s = scrolled(800, 200);
        // 200 * 200 / 800 = 50
        let top = s.scrollbar(20, 40).unwrap();
        assert_eq!(top.thumb_h, 50);
        assert_eq!(top.thumb_y, 20);
        assert_eq!((top.track_y, top.track_h), (20, 200));

        s.scroll_by(600);
        let bottom = s.scrollbar(20, 40).unwrap();
        assert_eq!(bottom.thumb_y, 20 + 150);
    }

    #[test]
    fn scrollbar_thumb_has_minimum() {
        let s = scrolled(10_000, 200);
        assert_eq!(s.scrollbar(0, 40).unwrap().thumb_h, 40);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clamp_stays_in_range(content in 0u32..10_000, viewport in 1u32..2_000, pos in any::<u32>()) {
                let s = scrolled(content, viewport);
                prop_assert!(s.clamp(pos) <= content.saturating_sub(viewport));
            }

            #[test]
            fn thumb_stays_inside_track(
                content in 201u32..20_000,
                steps in proptest::collection::vec(-200i32..200, 0..20),
            ) {
                let mut s = scrolled(content, 200);
                for step in steps {
                    s.scroll_by(step);
                }
                let bar = s.scrollbar(10, 40).unwrap();
                prop_assert!(bar.thumb_y >= bar.track_y);
                prop_assert!(bar.thumb_y + bar.thumb_h as i32 <= bar.track_y + bar.track_h as i32);
            }
        }
    }
}
