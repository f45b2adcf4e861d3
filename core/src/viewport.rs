use core::time::Duration;

use crate::*;

pub const ZOOM_MIN: f64 = 0.8;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.2;
/// How long proximity scaling stays off after a zoom step.
pub const HOVER_HOLD: Duration = Duration::from_millis(150);

/// Zoom factor in tenths, so stepping in and back out is exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    const MIN: u8 = 8;
    const MAX: u8 = 20;
    const STEP: u8 = 2;

    pub const DEFAULT: Self = Self(10);

    pub fn factor(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn stepped(self, steps: i8) -> Self {
        let delta = i16::from(steps) * i16::from(Self::STEP);
        let tenths = (i16::from(self.0) + delta).clamp(i16::from(Self::MIN), i16::from(Self::MAX));
        Self(tenths as u8)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Measured sizes of the scroll container and the (zoomed) content inside it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub viewport: Size,
    pub content: Size,
}

impl Layout {
    pub fn max_scroll(&self) -> Point {
        Point::new(
            (self.content.width - self.viewport.width).max(0.0),
            (self.content.height - self.viewport.height).max(0.0),
        )
    }

    pub fn clamp_scroll(&self, scroll: Point) -> Point {
        let max = self.max_scroll();
        Point::new(scroll.x.clamp(0.0, max.x), scroll.y.clamp(0.0, max.y))
    }

    /// Position of the content point under `cursor`, as a fraction of the content size.
    pub fn proportion_at(&self, scroll: Point, cursor: Point) -> Point {
        fn ratio(offset: f64, total: f64) -> f64 {
            if total > 0.0 { offset / total } else { 0.0 }
        }
        Point::new(
            ratio(scroll.x + cursor.x, self.content.width),
            ratio(scroll.y + cursor.y, self.content.height),
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoomOutcome {
    NoChange,
    /// Zoom changed; call [`Viewport::apply_deferred`] after the next layout.
    Deferred,
}

impl ZoomOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Deferred)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingAnchor {
    proportion: Point,
    cursor: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PanAnchor {
    pointer: Point,
    scroll: Point,
}

/// Cursor-anchored zoom and drag panning over the grid.
///
/// All points are in viewport pixels relative to the container's top left.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    zoom: ZoomLevel,
    scroll: Point,
    cursor: Option<Point>,
    pan: Option<PanAnchor>,
    pending: Option<PendingAnchor>,
    hover_suppressed: bool,
}

impl Viewport {
    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Cursor as seen by hover effects; hidden right after a zoom.
    pub fn effective_cursor(&self) -> Option<Point> {
        if self.hover_suppressed {
            None
        } else {
            self.cursor
        }
    }

    pub fn has_pending_recompute(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_hover_suppressed(&self) -> bool {
        self.hover_suppressed
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn content_size(&self, base: Size) -> Size {
        base.scaled(self.zoom.factor())
    }

    /// Center of grid cell `(row, col)` in viewport pixels.
    pub fn cell_center(&self, (row, col): Coord2, cell_px: f64) -> Point {
        let step = cell_px * self.zoom.factor();
        Point::new(
            (f64::from(col) + 0.5) * step - self.scroll.x,
            (f64::from(row) + 0.5) * step - self.scroll.y,
        )
    }

    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = Some(cursor);
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Changes zoom by `steps` of [`ZOOM_STEP`] around `cursor`.
    ///
    /// `layout` is the current, pre-zoom layout. The scroll offset is only
    /// recomputed by [`Viewport::apply_deferred`] once the new zoom is laid out;
    /// until then panning is refused and hover effects are suppressed.
    pub fn zoom_at_cursor(&mut self, steps: i8, cursor: Point, layout: Layout) -> ZoomOutcome {
        self.cursor = Some(cursor);

        let zoom = self.zoom.stepped(steps);
        if zoom == self.zoom {
            return ZoomOutcome::NoChange;
        }

        // layout has not caught up with an earlier step yet, keep its anchor
        let proportion = match self.pending {
            Some(pending) => pending.proportion,
            None => layout.proportion_at(self.scroll, cursor),
        };
        log::debug!("zoom {:?} -> {:?} at {:?}", self.zoom, zoom, cursor);

        self.zoom = zoom;
        self.pending = Some(PendingAnchor { proportion, cursor });
        self.pan = None;
        self.hover_suppressed = true;
        ZoomOutcome::Deferred
    }

    /// Puts the anchored content point back under the cursor. `layout` must be
    /// measured at the new zoom.
    pub fn apply_deferred(&mut self, layout: Layout) -> bool {
        let Some(PendingAnchor { proportion, cursor }) = self.pending.take() else {
            return false;
        };

        let scroll = Point::new(
            proportion.x * layout.content.width - cursor.x,
            proportion.y * layout.content.height - cursor.y,
        );
        self.scroll = layout.clamp_scroll(scroll);
        true
    }

    /// Ends the hover suppression window started by a zoom.
    pub fn release_hover(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        core::mem::take(&mut self.hover_suppressed)
    }

    pub fn begin_pan(&mut self, pointer: Point) -> bool {
        self.cursor = Some(pointer);
        if self.pending.is_some() {
            log::trace!("pan refused while zoom recompute is pending");
            return false;
        }

        self.pan = Some(PanAnchor {
            pointer,
            scroll: self.scroll,
        });
        true
    }

    pub fn update_pan(&mut self, pointer: Point, layout: Layout) -> bool {
        self.cursor = Some(pointer);
        let Some(anchor) = self.pan else {
            return false;
        };
        if self.pending.is_some() {
            return false;
        }

        let scroll = layout.clamp_scroll(Point::new(
            anchor.scroll.x - (pointer.x - anchor.pointer.x),
            anchor.scroll.y - (pointer.y - anchor.pointer.y),
        ));
        let changed = scroll != self.scroll;
        self.scroll = scroll;
        changed
    }

    /// Follows a pointer move; true when the grid needs redrawing, either
    /// because the view panned or because proximity scaling tracks the cursor.
    pub fn track_pointer(&mut self, pointer: Point, layout: Layout) -> bool {
        let panned = self.update_pan(pointer, layout);
        panned || self.effective_cursor().is_some()
    }

    pub fn end_pan(&mut self) -> bool {
        self.pan.take().is_some()
    }

    /// Back to defaults, for when the player leaves the screen.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        let delta = a - b;
        -1e-9 < delta && delta < 1e-9
    }

    const BASE: Size = Size::new(35.0 * 48.0, 25.0 * 48.0);
    const VIEW: Size = Size::new(800.0, 600.0);

    fn layout(viewport: &Viewport) -> Layout {
        Layout {
            viewport: VIEW,
            content: viewport.content_size(BASE),
        }
    }

    fn panned_to(scroll: Point) -> Viewport {
        let mut viewport = Viewport::default();
        viewport.begin_pan(Point::new(0.0, 0.0));
        viewport.update_pan(Point::new(-scroll.x, -scroll.y), layout(&viewport));
        viewport.end_pan();
        assert_eq!(viewport.scroll(), scroll);
        viewport
    }

    #[test]
    fn zoom_steps_are_clamped_and_reversible() {
        let zoom = ZoomLevel::DEFAULT;
        assert_eq!(zoom.stepped(3).stepped(-3), zoom);
        assert_eq!(zoom.stepped(1).factor(), 1.2);
        assert_eq!(zoom.stepped(100).factor(), ZOOM_MAX);
        assert_eq!(zoom.stepped(-100).factor(), ZOOM_MIN);
        assert_eq!(zoom.stepped(-1).stepped(-1), zoom.stepped(-1));
    }

    #[test]
    fn zoom_keeps_content_point_under_cursor() {
        let mut viewport = panned_to(Point::new(300.0, 200.0));
        let cursor = Point::new(400.0, 300.0);
        let before = layout(&viewport).proportion_at(viewport.scroll(), cursor);

        assert_eq!(
            viewport.zoom_at_cursor(1, cursor, layout(&viewport)),
            ZoomOutcome::Deferred
        );
        // scroll is untouched until the new layout exists
        assert_eq!(viewport.scroll(), Point::new(300.0, 200.0));
        assert!(viewport.apply_deferred(layout(&viewport)));

        let after = layout(&viewport).proportion_at(viewport.scroll(), cursor);
        assert!(close(before.x, after.x));
        assert!(close(before.y, after.y));
        assert!(close(viewport.scroll().x, 440.0));
        assert!(close(viewport.scroll().y, 300.0));
    }

    #[test]
    fn zoom_out_clamps_scroll_to_content() {
        let mut viewport = panned_to(Point::new(880.0, 600.0));
        let cursor = Point::new(10.0, 10.0);

        viewport.zoom_at_cursor(-1, cursor, layout(&viewport));
        viewport.apply_deferred(layout(&viewport));

        let max = layout(&viewport).max_scroll();
        assert!(viewport.scroll().x <= max.x && viewport.scroll().y <= max.y);
        assert!(viewport.scroll().x >= 0.0 && viewport.scroll().y >= 0.0);
    }

    #[test]
    fn clamped_zoom_is_no_change() {
        let mut viewport = Viewport::default();
        let cursor = Point::new(5.0, 5.0);
        for _ in 0..5 {
            viewport.zoom_at_cursor(1, cursor, layout(&viewport));
            viewport.apply_deferred(layout(&viewport));
        }
        assert_eq!(viewport.zoom().factor(), ZOOM_MAX);
        assert_eq!(
            viewport.zoom_at_cursor(1, cursor, layout(&viewport)),
            ZoomOutcome::NoChange
        );
        assert!(!viewport.has_pending_recompute());
    }

    #[test]
    fn pan_is_locked_during_zoom_recompute() {
        let mut viewport = panned_to(Point::new(100.0, 100.0));
        viewport.begin_pan(Point::new(50.0, 50.0));
        viewport.zoom_at_cursor(1, Point::new(50.0, 50.0), layout(&viewport));

        assert!(!viewport.is_panning());
        assert!(!viewport.begin_pan(Point::new(60.0, 60.0)));
        assert!(!viewport.update_pan(Point::new(0.0, 0.0), layout(&viewport)));

        viewport.apply_deferred(layout(&viewport));
        assert!(viewport.begin_pan(Point::new(60.0, 60.0)));
    }

    #[test]
    fn pan_moves_opposite_to_pointer() {
        let mut viewport = panned_to(Point::new(100.0, 100.0));
        assert!(viewport.begin_pan(Point::new(200.0, 200.0)));
        assert!(viewport.update_pan(Point::new(150.0, 230.0), layout(&viewport)));
        assert_eq!(viewport.scroll(), Point::new(150.0, 70.0));

        // cannot pan past the top left corner
        viewport.update_pan(Point::new(1000.0, 1000.0), layout(&viewport));
        assert_eq!(viewport.scroll(), Point::new(0.0, 0.0));
        assert!(viewport.end_pan());
        assert!(!viewport.update_pan(Point::new(0.0, 0.0), layout(&viewport)));
    }

    #[test]
    fn hover_is_suppressed_across_zoom() {
        let mut viewport = Viewport::default();
        let cursor = Point::new(30.0, 40.0);
        viewport.set_cursor(cursor);
        assert_eq!(viewport.effective_cursor(), Some(cursor));

        viewport.zoom_at_cursor(1, cursor, layout(&viewport));
        assert_eq!(viewport.effective_cursor(), None);
        assert!(!viewport.release_hover());

        viewport.apply_deferred(layout(&viewport));
        assert!(viewport.release_hover());
        assert_eq!(viewport.effective_cursor(), Some(cursor));
    }

    #[test]
    fn pointer_moves_redraw_only_when_visible() {
        let mut viewport = Viewport::default();
        assert!(viewport.track_pointer(Point::new(10.0, 10.0), layout(&viewport)));

        viewport.zoom_at_cursor(1, Point::new(10.0, 10.0), layout(&viewport));
        assert!(!viewport.track_pointer(Point::new(20.0, 20.0), layout(&viewport)));

        viewport.apply_deferred(layout(&viewport));
        viewport.release_hover();
        assert!(viewport.track_pointer(Point::new(30.0, 30.0), layout(&viewport)));
        assert_eq!(viewport.cursor(), Some(Point::new(30.0, 30.0)));
    }

    #[test]
    fn cell_centers_follow_zoom_and_scroll() {
        let mut viewport = panned_to(Point::new(24.0, 0.0));
        assert_eq!(viewport.cell_center((0, 1), 48.0), Point::new(48.0, 24.0));

        viewport.zoom_at_cursor(5, Point::new(0.0, 0.0), layout(&viewport));
        viewport.apply_deferred(layout(&viewport));
        let center = viewport.cell_center((2, 0), 48.0);
        assert_eq!(center.y, 2.5 * 96.0 - viewport.scroll().y);

        viewport.reset();
        assert_eq!(viewport, Viewport::default());
    }
}
