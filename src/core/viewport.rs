//! Pan/zoom state with anchor-preserving recentering.
//!
//! Zooming is a two-phase protocol: the instant at the viewport's
//! horizontal center is captured before the zoom factor changes, and the
//! scroll offset is restored on the next layout pass, once the viewport
//! width is known again. Panning is driven directly by pointer-drag
//! deltas.

use super::timescale::{INITIAL_ZOOM, MAX_ZOOM, MIN_ZOOM, TimeScale};

/// Multiplicative zoom step of the toolbar buttons.
pub const BUTTON_ZOOM_STEP: f32 = 1.5;

/// Multiplicative step per modifier-gated wheel tick, zooming in.
pub const WHEEL_ZOOM_IN: f32 = 1.05;

/// Multiplicative step per modifier-gated wheel tick, zooming out.
pub const WHEEL_ZOOM_OUT: f32 = 0.95;

/// Multiplicative step per pinch update, spreading contacts.
pub const PINCH_ZOOM_IN: f32 = 1.02;

/// Multiplicative step per pinch update, closing contacts.
pub const PINCH_ZOOM_OUT: f32 = 0.98;

/// Transient zoom factor and scroll offsets of the timeline viewport.
#[derive(Clone, Debug)]
pub struct ViewportState {
    /// Zoom factor in pixels per day, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom: f32,
    /// Horizontal scroll offset in pixels
    pub scroll_x: f32,
    /// Vertical scroll offset in pixels
    pub scroll_y: f32,
    /// Instant to restore to the viewport center after a zoom change
    pending_anchor: Option<i64>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Create a viewport at the initial zoom with no scroll.
    pub fn new() -> Self {
        Self {
            zoom: INITIAL_ZOOM,
            scroll_x: 0.0,
            scroll_y: 0.0,
            pending_anchor: None,
        }
    }

    /// The time scale for the current zoom.
    pub fn scale(&self, epoch_ms: i64) -> TimeScale {
        TimeScale::new(epoch_ms, self.zoom)
    }

    /// The instant at the viewport's horizontal center, or `None` when the
    /// viewport width is unknown.
    pub fn center_timestamp(&self, epoch_ms: i64, view_width: f32) -> Option<i64> {
        if view_width <= 0.0 {
            return None;
        }
        Some(
            self.scale(epoch_ms)
                .to_timestamp(self.scroll_x + view_width / 2.0),
        )
    }

    /// Multiply the zoom factor, capturing the center instant as the
    /// pending recenter anchor.
    ///
    /// The new factor is clamped to `[MIN_ZOOM, MAX_ZOOM]`. With an
    /// unknown viewport width no anchor is captured and the later
    /// recentering pass is a no-op.
    pub fn zoom_by(&mut self, factor: f32, epoch_ms: i64, view_width: f32) {
        if let Some(anchor) = self.center_timestamp(epoch_ms, view_width) {
            self.pending_anchor = Some(anchor);
        }
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Apply one modifier-gated wheel tick.
    pub fn wheel_zoom(&mut self, zoom_in: bool, epoch_ms: i64, view_width: f32) {
        let factor = if zoom_in { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.zoom_by(factor, epoch_ms, view_width);
    }

    /// Restore the pending anchor to the viewport center.
    ///
    /// Called on the layout pass following a zoom change, when the
    /// viewport width is stable again. Keeps the anchor pending while the
    /// width is unknown.
    pub fn apply_pending_recenter(&mut self, epoch_ms: i64, view_width: f32) {
        if view_width <= 0.0 {
            return;
        }
        if let Some(anchor) = self.pending_anchor.take() {
            let center = self.scale(epoch_ms).to_pixel(anchor);
            self.scroll_x = center - view_width / 2.0;
        }
    }

    /// Whether a recenter is still outstanding.
    pub fn has_pending_anchor(&self) -> bool {
        self.pending_anchor.is_some()
    }

    /// Shift the scroll offsets by a pointer-drag delta.
    ///
    /// The content follows the pointer, so the offsets move against the
    /// delta.
    pub fn pan_by(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_x -= delta_x;
        self.scroll_y -= delta_y;
    }

    /// Keep the scroll offsets inside the content bounds.
    pub fn clamp_scroll(&mut self, content_width: f32, content_height: f32, view_width: f32, view_height: f32) {
        self.scroll_x = self.scroll_x.clamp(0.0, (content_width - view_width).max(0.0));
        self.scroll_y = self
            .scroll_y
            .clamp(0.0, (content_height - view_height).max(0.0));
    }
}

/// Pinch-zoom distance baseline over two simultaneous pointer contacts.
///
/// Feed the current two-contact distance every update; anything other than
/// exactly two contacts resets the baseline, so a lone pointer can never
/// zoom.
#[derive(Clone, Copy, Debug, Default)]
pub struct PinchTracker {
    baseline: Option<f32>,
}

impl PinchTracker {
    /// Update with the current contact distance, or `None` when fewer than
    /// two contacts are down. Returns the zoom factor to apply, if any.
    pub fn update(&mut self, distance: Option<f32>) -> Option<f32> {
        match (distance, self.baseline) {
            (None, _) => {
                self.baseline = None;
                None
            }
            (Some(distance), None) => {
                self.baseline = Some(distance);
                None
            }
            (Some(distance), Some(baseline)) => {
                self.baseline = Some(distance);
                if distance > baseline {
                    Some(PINCH_ZOOM_IN)
                } else if distance < baseline {
                    Some(PINCH_ZOOM_OUT)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timescale::MS_PER_DAY;

    const EPOCH: i64 = 1_600_000_000_000;

    #[test]
    fn test_zoom_stays_clamped_under_extreme_sequences() {
        let mut viewport = ViewportState::new();
        for _ in 0..100 {
            viewport.zoom_by(10.0, EPOCH, 1000.0);
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);

        for _ in 0..100 {
            viewport.zoom_by(0.001, EPOCH, 1000.0);
        }
        assert_eq!(viewport.zoom, MIN_ZOOM);

        viewport.zoom_by(0.0, EPOCH, 1000.0);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_recenter_preserves_center_instant() {
        let mut viewport = ViewportState::new();
        viewport.zoom = 1.0;
        let view_width = 1000.0;

        // Zoom 1.0, scroll 0, width 1000: the center is epoch + 500 days.
        let center = viewport.center_timestamp(EPOCH, view_width).unwrap();
        assert_eq!(center, EPOCH + 500 * MS_PER_DAY as i64);

        viewport.zoom_by(2.0, EPOCH, view_width);
        assert!(viewport.has_pending_anchor());
        assert_eq!(viewport.zoom, 2.0);

        viewport.apply_pending_recenter(EPOCH, view_width);
        assert!(!viewport.has_pending_anchor());

        // The same instant maps back to the viewport-center pixel.
        let scale = viewport.scale(EPOCH);
        let center_pixel = scale.to_pixel(center) - viewport.scroll_x;
        assert!((center_pixel - view_width / 2.0).abs() < 0.01);
        assert_eq!(viewport.center_timestamp(EPOCH, view_width).unwrap(), center);
    }

    #[test]
    fn test_recenter_survives_repeated_zoom() {
        let mut viewport = ViewportState::new();
        viewport.zoom = 1.0;
        viewport.scroll_x = 250.0;
        let view_width = 800.0;
        let center = viewport.center_timestamp(EPOCH, view_width).unwrap();

        for _ in 0..20 {
            viewport.wheel_zoom(true, EPOCH, view_width);
            viewport.apply_pending_recenter(EPOCH, view_width);
        }
        for _ in 0..20 {
            viewport.wheel_zoom(false, EPOCH, view_width);
            viewport.apply_pending_recenter(EPOCH, view_width);
        }

        let drifted = viewport.center_timestamp(EPOCH, view_width).unwrap();
        // A day of drift over 40 rescales would be visible; require much less.
        assert!((drifted - center).abs() < MS_PER_DAY as i64 / 24);
    }

    #[test]
    fn test_zero_width_viewport_never_divides() {
        let mut viewport = ViewportState::new();
        assert!(viewport.center_timestamp(EPOCH, 0.0).is_none());

        viewport.zoom_by(2.0, EPOCH, 0.0);
        assert!(!viewport.has_pending_anchor());
        assert_eq!(viewport.zoom, 1.0);

        // Recentering with no width is a no-op that keeps any anchor.
        viewport.zoom_by(2.0, EPOCH, 500.0);
        assert!(viewport.has_pending_anchor());
        viewport.apply_pending_recenter(EPOCH, 0.0);
        assert!(viewport.has_pending_anchor());
        viewport.apply_pending_recenter(EPOCH, 500.0);
        assert!(!viewport.has_pending_anchor());
    }

    #[test]
    fn test_pan_moves_against_the_drag() {
        let mut viewport = ViewportState::new();
        viewport.scroll_x = 100.0;
        viewport.scroll_y = 50.0;

        viewport.pan_by(30.0, -10.0);
        assert_eq!(viewport.scroll_x, 70.0);
        assert_eq!(viewport.scroll_y, 60.0);
    }

    #[test]
    fn test_clamp_scroll_bounds() {
        let mut viewport = ViewportState::new();
        viewport.scroll_x = -50.0;
        viewport.scroll_y = 10_000.0;

        viewport.clamp_scroll(2000.0, 600.0, 800.0, 400.0);
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 200.0);

        // Content smaller than the view pins the offsets at zero.
        viewport.scroll_x = 500.0;
        viewport.clamp_scroll(400.0, 100.0, 800.0, 400.0);
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 0.0);
    }

    #[test]
    fn test_pinch_requires_two_contacts() {
        let mut pinch = PinchTracker::default();

        // First two-contact sample only sets the baseline.
        assert_eq!(pinch.update(Some(100.0)), None);
        // Spreading zooms in, closing zooms out.
        assert_eq!(pinch.update(Some(110.0)), Some(PINCH_ZOOM_IN));
        assert_eq!(pinch.update(Some(90.0)), Some(PINCH_ZOOM_OUT));
        assert_eq!(pinch.update(Some(90.0)), None);

        // Dropping to fewer than two contacts resets the baseline.
        assert_eq!(pinch.update(None), None);
        assert_eq!(pinch.update(Some(200.0)), None);
        assert_eq!(pinch.update(Some(210.0)), Some(PINCH_ZOOM_IN));
    }
}
