//! Track sidebar.
//!
//! One icon row per track, pinned to the left of the timeline body.
//! Clicking a row opens the track editor; holding it long enough starts a
//! drag reorder (the gesture itself lives in the core, this module only
//! paints the rows, the drop indicator, and the floating drag proxy).

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke};

use crate::core::gesture::ReorderGesture;
use crate::core::layout::ROW_HEIGHT;
use crate::core::model::Track;

/// Width of the sidebar column.
pub const SIDEBAR_WIDTH: f32 = 80.0;

/// Height of the add-track strip at the bottom of the column.
const ADD_STRIP_HEIGHT: f32 = 64.0;

const SIDEBAR_BG: Color32 = Color32::WHITE;
const SIDEBAR_BORDER: Color32 = Color32::from_rgb(241, 245, 249);
const ICON_RING: Color32 = Color32::from_rgb(226, 232, 240);
const NAME_TEXT: Color32 = Color32::from_rgb(148, 163, 184);
const DROP_INDICATOR: Color32 = Color32::from_rgb(59, 130, 246);

/// Actions reported by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    /// A track row was clicked (tap path of the reorder gesture)
    EditTrack(usize),
    /// The add button was clicked
    AddTrack,
}

/// Paints the sidebar and reports clicks.
pub struct SidebarView<'a> {
    tracks: &'a [Track],
    reorder: &'a ReorderGesture,
    scroll_y: f32,
}

/// Top of the first row in screen coordinates (rows scroll with the
/// timeline body).
pub fn list_top(rect: Rect, scroll_y: f32) -> f32 {
    rect.top() - scroll_y
}

/// The track row under a screen position, if any.
pub fn row_index_at(rect: Rect, scroll_y: f32, track_count: usize, pos: Pos2) -> Option<usize> {
    if !rect.contains(pos) || pos.x > rect.left() + SIDEBAR_WIDTH {
        return None;
    }
    let row = ((pos.y - list_top(rect, scroll_y)) / ROW_HEIGHT).floor();
    if row < 0.0 {
        return None;
    }
    let row = row as usize;
    (row < track_count).then_some(row)
}

impl<'a> SidebarView<'a> {
    pub fn new(tracks: &'a [Track], reorder: &'a ReorderGesture, scroll_y: f32) -> Self {
        Self {
            tracks,
            reorder,
            scroll_y,
        }
    }

    fn row_rect(&self, rect: Rect, index: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                rect.left(),
                list_top(rect, self.scroll_y) + index as f32 * ROW_HEIGHT,
            ),
            egui::vec2(SIDEBAR_WIDTH, ROW_HEIGHT),
        )
    }

    /// Render the sidebar column into `rect`. Returns any click action;
    /// the caller suppresses clicks that belong to a finished drag.
    pub fn render(&self, ui: &mut egui::Ui, rect: Rect) -> Option<SidebarAction> {
        let mut action: Option<SidebarAction> = None;

        let column = Rect::from_min_size(rect.min, egui::vec2(SIDEBAR_WIDTH, rect.height()));
        let painter = ui.painter().with_clip_rect(column);

        painter.rect_filled(column, 0.0, SIDEBAR_BG);
        painter.line_segment(
            [column.right_top(), column.right_bottom()],
            Stroke::new(1.0, SIDEBAR_BORDER),
        );

        let dragging = self.reorder.dragging();

        for (index, track) in self.tracks.iter().enumerate() {
            let row = self.row_rect(rect, index);
            if row.bottom() < column.top() || row.top() > column.bottom() {
                continue;
            }

            let is_dragged = dragging
                .as_ref()
                .is_some_and(|(track_id, _, _)| **track_id == track.id);

            // Drop indicator above the candidate insertion row.
            if let Some((_, target_index, _)) = dragging
                && target_index == index
            {
                painter.line_segment(
                    [
                        Pos2::new(row.left() + 6.0, row.top()),
                        Pos2::new(row.right() - 6.0, row.top()),
                    ],
                    Stroke::new(2.0, DROP_INDICATOR),
                );
            }

            let alpha = if is_dragged { 0.25 } else { 1.0 };
            let center = Pos2::new(row.center().x, row.center().y - 8.0);

            painter.circle_filled(center, 24.0, SIDEBAR_BG.gamma_multiply(alpha));
            painter.circle_stroke(center, 24.0, Stroke::new(2.0, ICON_RING.gamma_multiply(alpha)));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                &track.icon,
                FontId::proportional(24.0),
                Color32::BLACK.gamma_multiply(alpha),
            );
            painter.text(
                Pos2::new(row.center().x, center.y + 34.0),
                Align2::CENTER_CENTER,
                &track.name,
                FontId::proportional(10.0),
                NAME_TEXT.gamma_multiply(alpha),
            );

            let response = ui.interact(
                row,
                egui::Id::new(("sidebar_track", &track.id)),
                egui::Sense::click(),
            );
            if response.clicked() {
                action = Some(SidebarAction::EditTrack(index));
            }
        }

        // Add-track strip pinned to the bottom of the column.
        let add_rect = Rect::from_min_size(
            Pos2::new(column.left(), column.bottom() - ADD_STRIP_HEIGHT),
            egui::vec2(SIDEBAR_WIDTH, ADD_STRIP_HEIGHT),
        );
        painter.rect_filled(add_rect, 0.0, SIDEBAR_BG);
        painter.line_segment(
            [add_rect.left_top(), add_rect.right_top()],
            Stroke::new(1.0, SIDEBAR_BORDER),
        );
        let add_button = Rect::from_center_size(add_rect.center(), egui::vec2(40.0, 40.0));
        if ui
            .put(add_button, egui::Button::new("➕").corner_radius(20.0))
            .on_hover_text("Add a quest")
            .clicked()
        {
            action = Some(SidebarAction::AddTrack);
        }

        action
    }

    /// Draw the floating proxy of the dragged track next to the pointer.
    pub fn draw_drag_proxy(&self, ctx: &egui::Context, rect: Rect) {
        let Some((track_id, _, pointer)) = self.reorder.dragging() else {
            return;
        };
        let Some(track) = self.tracks.iter().find(|track| track.id == *track_id) else {
            return;
        };

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("reorder_drag_proxy"),
        ));
        let center = Pos2::new(rect.left() + SIDEBAR_WIDTH / 2.0, pointer.y);

        painter.circle_filled(center, 28.0, SIDEBAR_BG);
        painter.circle_stroke(center, 28.0, Stroke::new(3.0, DROP_INDICATOR));
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &track.icon,
            FontId::proportional(28.0),
            Color32::BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::TrackColor;
    use eframe::egui::pos2;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: format!("t{}", i),
                name: format!("Track {}", i),
                icon: "🌱".to_string(),
                color: TrackColor::Slate,
                order: i,
            })
            .collect()
    }

    #[test]
    fn test_row_index_lookup() {
        let tracks = tracks(3);
        let rect = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(900.0, 600.0));

        assert_eq!(row_index_at(rect, 0.0, tracks.len(), pos2(40.0, 10.0)), Some(0));
        assert_eq!(row_index_at(rect, 0.0, tracks.len(), pos2(40.0, 130.0)), Some(1));
        assert_eq!(row_index_at(rect, 0.0, tracks.len(), pos2(40.0, 500.0)), None);
        // Outside the sidebar column.
        assert_eq!(row_index_at(rect, 0.0, tracks.len(), pos2(200.0, 10.0)), None);
    }

    #[test]
    fn test_row_index_follows_scroll() {
        let tracks = tracks(4);
        let rect = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(900.0, 600.0));

        // With one row scrolled away, the top of the column shows row 1.
        assert_eq!(row_index_at(rect, 120.0, tracks.len(), pos2(40.0, 10.0)), Some(1));
        assert_eq!(list_top(rect, 120.0), -120.0);
    }
}
