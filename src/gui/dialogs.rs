//! Editor dialogs for the journal.
//!
//! Modal windows for creating/editing tracks and memories, plus the
//! import confirmation. Constraint violations (empty names, invalid
//! dates) are prevented here: the save action stays disabled until the
//! form is valid, so they never reach the core.

use chrono::{NaiveDate, TimeZone, Utc};
use eframe::egui;

use crate::core::model::{
    LifeNode, MAX_WEIGHT, MIN_WEIGHT, NodeId, NodeKind, Track, TrackColor, TrackId,
};

/// Default icon for a freshly created track.
const DEFAULT_TRACK_ICON: &str = "🌱";

/// Emoji choices offered by the track editor, grouped by category.
const ICON_CATEGORIES: &[(&str, &[&str])] = &[
    ("Nature", &["🌱", "🌿", "🌻", "🌊", "⛰️", "🔥", "🐶", "🐱"]),
    ("People", &["❤️", "👋", "💪", "🧠", "👶", "🧘", "🤝", "🥳"]),
    (
        "Activity",
        &[
            "⚽️", "🏀", "🎾", "🏃", "🚴", "🏋️", "🧗", "🎨", "📸", "🎬", "🎤", "🎧", "🎹", "🎸",
            "🎮", "🎲",
        ],
    ),
    ("Travel", &["🚗", "✈️", "🚀", "⛵️", "🏝️", "⛺️", "🏠", "🏙️"]),
    ("Objects", &["💻", "📱", "📚", "✏️", "💰", "🔧", "🔬", "🎓"]),
];

/// Paint the dimmed backdrop behind a modal window.
fn modal_overlay(ctx: &egui::Context, id: &str) {
    let screen_rect = ctx.input(|i| i.viewport_rect());
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new(id),
    ));
    painter.rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(100));
}

// ============================================================================
// Track editor
// ============================================================================

/// Actions that can be triggered from the track editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackEditorAction {
    Save,
    Delete,
    Cancel,
}

/// Form state of the track editor.
///
/// An absent `id` signals creation; the host assigns a fresh identifier
/// and the next display order on save.
#[derive(Debug, Clone)]
pub struct TrackEditorState {
    pub id: Option<TrackId>,
    pub name: String,
    pub icon: String,
    pub color: TrackColor,
}

impl TrackEditorState {
    /// Start a blank form for a new track.
    pub fn create() -> Self {
        Self {
            id: None,
            name: String::new(),
            icon: DEFAULT_TRACK_ICON.to_string(),
            color: TrackColor::default(),
        }
    }

    /// Start a form prefilled from an existing track.
    pub fn edit(track: &Track) -> Self {
        Self {
            id: Some(track.id.clone()),
            name: track.name.clone(),
            icon: track.icon.clone(),
            color: track.color,
        }
    }

    /// Whether the form can be saved.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Render the track editor. Returns the action taken, if any.
pub fn track_editor(ctx: &egui::Context, state: &mut TrackEditorState) -> Option<TrackEditorAction> {
    let mut action: Option<TrackEditorAction> = None;
    let is_edit = state.id.is_some();
    let title = if is_edit { "Edit Quest" } else { "New Quest" };

    modal_overlay(ctx, "track_editor_overlay");

    egui::Window::new(title)
        .id(egui::Id::new("track_editor"))
        .collapsible(false)
        .resizable(false)
        .default_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.add_space(4.0);

            // Icon preview + name
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(&state.icon).size(48.0));
                ui.add_space(4.0);
                ui.add(
                    egui::TextEdit::singleline(&mut state.name)
                        .hint_text("Name your quest...")
                        .desired_width(240.0),
                );
            });

            ui.add_space(12.0);
            ui.label(egui::RichText::new("THEME COLOR").small().weak());
            ui.horizontal_wrapped(|ui| {
                for color in TrackColor::ALL {
                    let selected = state.color == color;
                    let label = egui::RichText::new(if selected { "◉" } else { "●" })
                        .size(18.0)
                        .color(color.color32());
                    if ui
                        .selectable_label(selected, label)
                        .on_hover_text(color.name())
                        .clicked()
                    {
                        state.color = color;
                    }
                }
            });

            ui.add_space(8.0);
            ui.label(egui::RichText::new("ICON").small().weak());
            egui::ScrollArea::vertical()
                .max_height(180.0)
                .show(ui, |ui| {
                    for (category, icons) in ICON_CATEGORIES {
                        ui.label(egui::RichText::new(*category).small().weak());
                        ui.horizontal_wrapped(|ui| {
                            for icon in *icons {
                                let selected = state.icon == *icon;
                                if ui
                                    .selectable_label(
                                        selected,
                                        egui::RichText::new(*icon).size(20.0),
                                    )
                                    .clicked()
                                {
                                    state.icon = icon.to_string();
                                }
                            }
                        });
                        ui.add_space(4.0);
                    }
                });

            ui.separator();
            ui.horizontal(|ui| {
                if is_edit
                    && ui
                        .button(egui::RichText::new("🗑").color(egui::Color32::from_rgb(244, 67, 54)))
                        .on_hover_text("Delete this quest and all of its memories")
                        .clicked()
                {
                    action = Some(TrackEditorAction::Delete);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(state.is_valid(), |ui| {
                        let label = if is_edit { "Update" } else { "Create" };
                        if ui.button(label).clicked() {
                            action = Some(TrackEditorAction::Save);
                        }
                    });
                    if ui.button("Cancel").clicked() {
                        action = Some(TrackEditorAction::Cancel);
                    }
                });
            });
        });

    action
}

// ============================================================================
// Memory editor
// ============================================================================

/// Actions that can be triggered from the memory editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEditorAction {
    Save,
    Delete,
    Cancel,
}

/// Form state of the memory editor.
#[derive(Debug, Clone)]
pub struct NodeEditorState {
    pub id: Option<NodeId>,
    pub track_id: TrackId,
    pub title: String,
    /// Date field text, `YYYY-MM-DD`
    pub date_text: String,
    pub description: String,
    pub weight: u8,
    pub kind: NodeKind,
    /// Preserved through an edit; not editable in the form
    pub linked_node_id: Option<NodeId>,
}

impl NodeEditorState {
    /// Start a blank form for a new memory at the given instant.
    pub fn create(track_id: TrackId, timestamp_ms: i64) -> Self {
        Self {
            id: None,
            track_id,
            title: String::new(),
            date_text: format_date(timestamp_ms),
            description: String::new(),
            weight: 5,
            kind: NodeKind::Moment,
            linked_node_id: None,
        }
    }

    /// Start a form prefilled from an existing memory.
    pub fn edit(node: &LifeNode) -> Self {
        Self {
            id: Some(node.id.clone()),
            track_id: node.track_id.clone(),
            title: node.title.clone(),
            date_text: format_date(node.timestamp),
            description: node.description.clone().unwrap_or_default(),
            weight: node.weight,
            kind: node.kind,
            linked_node_id: node.linked_node_id.clone(),
        }
    }

    /// The instant the date field denotes, at midnight UTC.
    pub fn timestamp_ms(&self) -> Option<i64> {
        NaiveDate::parse_from_str(self.date_text.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|datetime| datetime.and_utc().timestamp_millis())
    }

    /// Whether the form can be saved.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && self.timestamp_ms().is_some()
    }
}

/// Format an instant as the date field text.
fn format_date(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|datetime| datetime.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Render the memory editor. Returns the action taken, if any.
pub fn node_editor(ctx: &egui::Context, state: &mut NodeEditorState) -> Option<NodeEditorAction> {
    let mut action: Option<NodeEditorAction> = None;
    let is_edit = state.id.is_some();
    let title = if is_edit { "Edit Memory" } else { "New Memory" };

    modal_overlay(ctx, "node_editor_overlay");

    egui::Window::new(title)
        .id(egui::Id::new("node_editor"))
        .collapsible(false)
        .resizable(false)
        .default_width(340.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.add_space(4.0);

            ui.add(
                egui::TextEdit::singleline(&mut state.title)
                    .hint_text("What happened?")
                    .font(egui::FontId::proportional(18.0))
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(8.0);
            ui.label(egui::RichText::new("WHEN").small().weak());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.date_text)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(120.0),
                );
                if state.timestamp_ms().is_none() {
                    ui.colored_label(egui::Color32::from_rgb(244, 67, 54), "invalid date");
                }
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.selectable_value(&mut state.kind, NodeKind::Moment, "✨ Moment")
                    .on_hover_text("Fleeting joy or result");
                ui.selectable_value(&mut state.kind, NodeKind::Milestone, "🚩 Milestone")
                    .on_hover_text("Permanent shift");
            });

            ui.add_space(8.0);
            ui.label(egui::RichText::new("IMPACT").small().weak());
            ui.add(egui::Slider::new(&mut state.weight, MIN_WEIGHT..=MAX_WEIGHT).show_value(true));
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Small detail").small().weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new("Life changing").small().weak());
                });
            });

            ui.add_space(8.0);
            ui.label(egui::RichText::new("NOTES").small().weak());
            ui.add(
                egui::TextEdit::multiline(&mut state.description)
                    .hint_text("Anything worth remembering?")
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );

            ui.separator();
            ui.horizontal(|ui| {
                if is_edit
                    && ui
                        .button(egui::RichText::new("🗑").color(egui::Color32::from_rgb(244, 67, 54)))
                        .on_hover_text("Delete this memory")
                        .clicked()
                {
                    action = Some(NodeEditorAction::Delete);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(state.is_valid(), |ui| {
                        if ui.button("Save").clicked() {
                            action = Some(NodeEditorAction::Save);
                        }
                    });
                    if ui.button("Cancel").clicked() {
                        action = Some(NodeEditorAction::Cancel);
                    }
                });
            });
        });

    action
}

// ============================================================================
// Import confirmation
// ============================================================================

/// Actions that can be triggered from the import confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImportConfirmAction {
    Replace,
    Cancel,
}

/// A parsed backup awaiting the user's go-ahead before it replaces the
/// journal wholesale.
#[derive(Debug)]
pub struct ImportConfirmState {
    pub tracks: Vec<Track>,
    pub nodes: Vec<LifeNode>,
}

/// Render the import confirmation. Returns the action taken, if any.
pub fn import_confirm(
    ctx: &egui::Context,
    state: &ImportConfirmState,
) -> Option<ImportConfirmAction> {
    let mut action: Option<ImportConfirmAction> = None;

    modal_overlay(ctx, "import_confirm_overlay");

    egui::Window::new("Import Backup")
        .id(egui::Id::new("import_confirm"))
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(format!(
                "Found {} quests and {} memories.",
                state.tracks.len(),
                state.nodes.len()
            ));
            ui.label("Replace your current data? This cannot be undone.");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Replace").clicked() {
                        action = Some(ImportConfirmAction::Replace);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(ImportConfirmAction::Cancel);
                    }
                });
            });
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_editor_validity() {
        let mut state = TrackEditorState::create();
        assert!(state.id.is_none());
        assert!(!state.is_valid());

        state.name = "   ".to_string();
        assert!(!state.is_valid());

        state.name = "Health".to_string();
        assert!(state.is_valid());
    }

    #[test]
    fn test_track_editor_prefills_from_track() {
        let track = Track {
            id: "t9".to_string(),
            name: "Music".to_string(),
            icon: "🎸".to_string(),
            color: TrackColor::Violet,
            order: 3,
        };

        let state = TrackEditorState::edit(&track);
        assert_eq!(state.id.as_deref(), Some("t9"));
        assert_eq!(state.name, "Music");
        assert_eq!(state.color, TrackColor::Violet);
    }

    #[test]
    fn test_node_editor_date_roundtrip() {
        let state = NodeEditorState::create("t1".to_string(), 1_700_000_000_000);
        // 2023-11-14 in UTC.
        assert_eq!(state.date_text, "2023-11-14");

        let midnight = state.timestamp_ms().unwrap();
        assert_eq!(format_date(midnight), "2023-11-14");
        assert_eq!(midnight % 86_400_000, 0);
    }

    #[test]
    fn test_node_editor_validity() {
        let mut state = NodeEditorState::create("t1".to_string(), 0);
        assert!(!state.is_valid());

        state.title = "Got the keys".to_string();
        assert!(state.is_valid());

        state.date_text = "yesterday".to_string();
        assert!(state.timestamp_ms().is_none());
        assert!(!state.is_valid());

        state.date_text = " 2024-02-29 ".to_string();
        assert!(state.is_valid());
    }

    #[test]
    fn test_node_editor_preserves_linked_reference() {
        let node = LifeNode {
            id: "n1".to_string(),
            track_id: "t1".to_string(),
            timestamp: 0,
            title: "Linked".to_string(),
            description: None,
            weight: 4,
            kind: NodeKind::Moment,
            linked_node_id: Some("n-gone".to_string()),
        };

        let state = NodeEditorState::edit(&node);
        assert_eq!(state.linked_node_id.as_deref(), Some("n-gone"));
        assert_eq!(state.weight, 4);
        assert_eq!(state.kind, NodeKind::Moment);
    }
}
