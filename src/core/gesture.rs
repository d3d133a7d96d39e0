//! Long-press gesture state machines.
//!
//! Both gestures are explicit finite-state-machine values driven by
//! discrete pointer events plus a per-frame poll against elapsed wall
//! time. There are no timer callbacks; cancellation is a plain state
//! transition, which makes the edge cases (movement cancels the press, a
//! second contact interrupts it) directly checkable.

use std::time::{Duration, Instant};

use eframe::egui::Pos2;

use super::layout::ROW_HEIGHT;
use super::model::TrackId;

/// Hold duration before a press on blank timeline area creates a node.
pub const ADD_NODE_DELAY: Duration = Duration::from_millis(800);

/// Hold duration before a press on a sidebar row starts a drag.
pub const REORDER_DELAY: Duration = Duration::from_millis(500);

/// Movement beyond this many pixels cancels a pending long press.
pub const MOVE_CANCEL_THRESHOLD: f32 = 10.0;

/// A cancellable long press.
///
/// `Fired` is latched until release so the following click can be
/// suppressed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LongPress {
    Idle,
    Armed { start: Pos2, pressed_at: Instant },
    Fired,
}

impl Default for LongPress {
    fn default() -> Self {
        Self::Idle
    }
}

impl LongPress {
    /// Begin a press at the given position.
    pub fn press(&mut self, pos: Pos2, now: Instant) {
        *self = LongPress::Armed {
            start: pos,
            pressed_at: now,
        };
    }

    /// Feed pointer movement; drifting past the threshold cancels the press.
    pub fn movement(&mut self, pos: Pos2) {
        if let LongPress::Armed { start, .. } = *self
            && start.distance(pos) > MOVE_CANCEL_THRESHOLD
        {
            *self = LongPress::Idle;
        }
    }

    /// Fire once the press has been held for `delay`.
    ///
    /// Returns the press position exactly once per gesture.
    pub fn try_fire(&mut self, now: Instant, delay: Duration) -> Option<Pos2> {
        if let LongPress::Armed { start, pressed_at } = *self
            && now.duration_since(pressed_at) >= delay
        {
            *self = LongPress::Fired;
            return Some(start);
        }
        None
    }

    /// End the gesture. Returns true if the press had fired, in which case
    /// the release must not be treated as a click.
    pub fn release(&mut self) -> bool {
        let fired = matches!(self, LongPress::Fired);
        *self = LongPress::Idle;
        fired
    }

    /// Abort the gesture (competing multi-touch, pointer lost).
    pub fn cancel(&mut self) {
        *self = LongPress::Idle;
    }

    /// Whether a press is waiting on its delay.
    pub fn is_armed(&self) -> bool {
        matches!(self, LongPress::Armed { .. })
    }
}

/// Long-press-initiated drag reordering of the track list.
#[derive(Clone, Debug, PartialEq)]
pub enum ReorderGesture {
    Idle,
    Armed {
        track_id: TrackId,
        index: usize,
        start: Pos2,
        pressed_at: Instant,
    },
    Dragging {
        track_id: TrackId,
        start_index: usize,
        current_index: usize,
        pointer: Pos2,
    },
}

impl Default for ReorderGesture {
    fn default() -> Self {
        Self::Idle
    }
}

impl ReorderGesture {
    /// Begin a press on the track row at `index`.
    pub fn press(&mut self, track_id: TrackId, index: usize, pos: Pos2, now: Instant) {
        *self = ReorderGesture::Armed {
            track_id,
            index,
            start: pos,
            pressed_at: now,
        };
    }

    /// Promote an armed press to dragging once the delay has elapsed.
    pub fn poll(&mut self, now: Instant) {
        if let ReorderGesture::Armed {
            track_id,
            index,
            start,
            pressed_at,
        } = self
            && now.duration_since(*pressed_at) >= REORDER_DELAY
        {
            *self = ReorderGesture::Dragging {
                track_id: track_id.clone(),
                start_index: *index,
                current_index: *index,
                pointer: *start,
            };
        }
    }

    /// Feed pointer movement.
    ///
    /// While armed, drifting past the threshold cancels the press (the
    /// release then falls through to the ordinary tap path). While
    /// dragging, the candidate insertion index follows the pointer's
    /// vertical position over the row list.
    pub fn movement(&mut self, pos: Pos2, list_top: f32, track_count: usize) {
        match self {
            ReorderGesture::Idle => {}
            ReorderGesture::Armed { start, .. } => {
                if start.distance(pos) > MOVE_CANCEL_THRESHOLD {
                    *self = ReorderGesture::Idle;
                }
            }
            ReorderGesture::Dragging {
                current_index,
                pointer,
                ..
            } => {
                *pointer = pos;
                *current_index = candidate_index(pos.y, list_top, track_count);
            }
        }
    }

    /// End the gesture.
    ///
    /// Returns `(from, to)` when a drag should reorder the list; releasing
    /// without having entered the dragging state is a no-op.
    pub fn release(&mut self) -> Option<(usize, usize)> {
        let result = match self {
            ReorderGesture::Dragging {
                start_index,
                current_index,
                ..
            } if start_index != current_index => Some((*start_index, *current_index)),
            _ => None,
        };
        *self = ReorderGesture::Idle;
        result
    }

    /// Abort the gesture without applying a move.
    pub fn cancel(&mut self) {
        *self = ReorderGesture::Idle;
    }

    /// The dragged track and its current target index, while dragging.
    pub fn dragging(&self) -> Option<(&TrackId, usize, Pos2)> {
        match self {
            ReorderGesture::Dragging {
                track_id,
                current_index,
                pointer,
                ..
            } => Some((track_id, *current_index, *pointer)),
            _ => None,
        }
    }

    /// Whether the gesture is mid-drag.
    pub fn is_dragging(&self) -> bool {
        matches!(self, ReorderGesture::Dragging { .. })
    }

    /// Whether a press is waiting on its delay.
    pub fn is_armed(&self) -> bool {
        matches!(self, ReorderGesture::Armed { .. })
    }
}

/// Candidate insertion index for a pointer at `pointer_y` over a row list
/// starting at `list_top`, clamped to the valid range.
pub fn candidate_index(pointer_y: f32, list_top: f32, track_count: usize) -> usize {
    if track_count == 0 {
        return 0;
    }
    let raw = ((pointer_y - list_top) / ROW_HEIGHT).floor() as isize;
    raw.clamp(0, track_count as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn test_long_press_fires_after_delay() {
        let t0 = Instant::now();
        let mut press = LongPress::default();

        press.press(pos2(40.0, 60.0), t0);
        assert!(press.is_armed());

        // Not yet.
        assert_eq!(press.try_fire(t0 + Duration::from_millis(300), ADD_NODE_DELAY), None);
        // Held long enough: fires exactly once, at the press position.
        assert_eq!(
            press.try_fire(t0 + Duration::from_millis(900), ADD_NODE_DELAY),
            Some(pos2(40.0, 60.0))
        );
        assert_eq!(press.try_fire(t0 + Duration::from_millis(950), ADD_NODE_DELAY), None);

        // The release after a fired press is not a click.
        assert!(press.release());
        assert!(!press.release());
    }

    #[test]
    fn test_long_press_cancelled_by_movement() {
        let t0 = Instant::now();
        let mut press = LongPress::default();

        press.press(pos2(0.0, 0.0), t0);
        press.movement(pos2(5.0, 5.0));
        assert!(press.is_armed());

        press.movement(pos2(20.0, 0.0));
        assert_eq!(press, LongPress::Idle);
        assert_eq!(press.try_fire(t0 + Duration::from_secs(2), ADD_NODE_DELAY), None);
    }

    #[test]
    fn test_long_press_cancelled_by_multi_touch() {
        let t0 = Instant::now();
        let mut press = LongPress::default();

        press.press(pos2(0.0, 0.0), t0);
        press.cancel();
        assert_eq!(press.try_fire(t0 + Duration::from_secs(2), ADD_NODE_DELAY), None);
        assert!(!press.release());
    }

    #[test]
    fn test_reorder_long_press_enters_dragging() {
        let t0 = Instant::now();
        let mut gesture = ReorderGesture::default();

        gesture.press("t1".to_string(), 2, pos2(40.0, 300.0), t0);
        gesture.movement(pos2(44.0, 304.0), 0.0, 4);
        assert!(gesture.is_armed());

        gesture.poll(t0 + Duration::from_millis(600));
        assert!(gesture.is_dragging());

        let (track_id, index, _) = gesture.dragging().unwrap();
        assert_eq!(track_id, "t1");
        assert_eq!(index, 2);
    }

    #[test]
    fn test_reorder_short_press_is_a_tap() {
        let t0 = Instant::now();
        let mut gesture = ReorderGesture::default();

        gesture.press("t1".to_string(), 2, pos2(40.0, 300.0), t0);
        gesture.poll(t0 + Duration::from_millis(300));
        assert!(gesture.is_armed());

        // Releasing before the delay elapses: no reorder.
        assert_eq!(gesture.release(), None);
        assert_eq!(gesture, ReorderGesture::Idle);
    }

    #[test]
    fn test_reorder_movement_cancels_pending_press() {
        let t0 = Instant::now();
        let mut gesture = ReorderGesture::default();

        gesture.press("t1".to_string(), 0, pos2(40.0, 60.0), t0);
        gesture.movement(pos2(40.0, 90.0), 0.0, 4);
        assert_eq!(gesture, ReorderGesture::Idle);

        // The timer never fires after the cancel.
        gesture.poll(t0 + Duration::from_secs(1));
        assert_eq!(gesture, ReorderGesture::Idle);
    }

    #[test]
    fn test_reorder_drop_reports_move() {
        let t0 = Instant::now();
        let mut gesture = ReorderGesture::default();

        gesture.press("t3".to_string(), 2, pos2(40.0, 300.0), t0);
        gesture.poll(t0 + Duration::from_millis(500));
        assert!(gesture.is_dragging());

        // Drag up to the first row.
        gesture.movement(pos2(40.0, 10.0), 0.0, 4);
        assert_eq!(gesture.release(), Some((2, 0)));

        // Dropping back on the original row is a no-op.
        gesture.press("t3".to_string(), 1, pos2(40.0, 180.0), t0);
        gesture.poll(t0 + Duration::from_millis(500));
        gesture.movement(pos2(40.0, 185.0), 0.0, 4);
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn test_reorder_cancel_resets_like_release() {
        let t0 = Instant::now();
        let mut gesture = ReorderGesture::default();

        gesture.press("t1".to_string(), 0, pos2(40.0, 60.0), t0);
        gesture.poll(t0 + Duration::from_millis(500));
        gesture.movement(pos2(40.0, 400.0), 0.0, 4);
        assert!(gesture.is_dragging());

        gesture.cancel();
        assert_eq!(gesture, ReorderGesture::Idle);
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn test_candidate_index_clamps_to_range() {
        assert_eq!(candidate_index(-500.0, 0.0, 4), 0);
        assert_eq!(candidate_index(60.0, 0.0, 4), 0);
        assert_eq!(candidate_index(130.0, 0.0, 4), 1);
        assert_eq!(candidate_index(10_000.0, 0.0, 4), 3);
        assert_eq!(candidate_index(100.0, 0.0, 0), 0);

        // A shifted list top moves the bands.
        assert_eq!(candidate_index(190.0, 64.0, 4), 1);
    }
}
