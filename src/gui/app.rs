//! Main application state and GUI logic.
//!
//! The app is the sole owner of the track and node collections. Every
//! other component receives read-only views and reports actions back;
//! mutations happen here, each followed by a whole-journal save.

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use eframe::egui::{self, Pos2, Rect};

use crate::core::exchange;
use crate::core::gesture::{ADD_NODE_DELAY, LongPress, ReorderGesture};
use crate::core::layout::layout_row;
use crate::core::model::{self, LifeNode, NodeId, Track, TrackId, clamp_weight, fresh_id};
use crate::core::store::{self, Journal};
use crate::core::timescale::TimeScale;
use crate::core::viewport::{BUTTON_ZOOM_STEP, PinchTracker, ViewportState};

use super::dialogs::{
    self, ImportConfirmAction, ImportConfirmState, NodeEditorAction, NodeEditorState,
    TrackEditorAction, TrackEditorState,
};
use super::sidebar::{self, SIDEBAR_WIDTH, SidebarAction, SidebarView};
use super::timeline::{self, RowData, TimelineView};

/// Kind of status message to display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    /// Success message (shown in green)
    Success,
    /// Error message (shown in red)
    Error,
}

/// A transient status message shown in the toolbar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    /// Duration to show status messages before auto-dismissing.
    const DISPLAY_DURATION: std::time::Duration = std::time::Duration::from_secs(5);

    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    /// Check if the message should still be displayed.
    pub fn is_visible(&self) -> bool {
        self.created_at.elapsed() < Self::DISPLAY_DURATION
    }
}

/// What a frame's pointer handling asks the app to do afterwards.
#[derive(Default)]
struct PointerOutcome {
    /// Clicks this frame belong to a finished drag or fired long press
    suppress_click: bool,
    /// A drop finished with a changed index
    reorder: Option<(usize, usize)>,
    /// A gesture asked to open the memory editor
    open_node_editor: Option<NodeEditorState>,
}

/// Viewport and gesture state, separate from the collections so input
/// handling can run while row geometry still borrows the tracks/nodes.
struct InteractionState {
    viewport: ViewportState,
    pinch: PinchTracker,
    reorder: ReorderGesture,
    /// Long press on blank timeline area (creates a node)
    add_press: LongPress,
    /// Track under the pending add press
    add_press_track: Option<TrackId>,
    /// Whether the active pointer press started over the sidebar
    press_in_sidebar: bool,
    /// Live touch contacts, for pinch distance tracking
    touch_points: HashMap<u64, Pos2>,
}

impl InteractionState {
    fn new() -> Self {
        Self {
            viewport: ViewportState::new(),
            pinch: PinchTracker::default(),
            reorder: ReorderGesture::default(),
            add_press: LongPress::default(),
            add_press_track: None,
            press_in_sidebar: false,
            touch_points: HashMap::new(),
        }
    }

    /// Reset in-flight gestures; called whenever a modal opens.
    fn reset_gestures(&mut self) {
        self.add_press.cancel();
        self.add_press_track = None;
        self.reorder.cancel();
        self.pinch = PinchTracker::default();
        self.touch_points.clear();
    }

    /// Wheel and pinch zoom, both anchor-captured.
    fn handle_zoom(
        &mut self,
        ctx: &egui::Context,
        timeline_hovered: bool,
        epoch_ms: i64,
        view_width: f32,
    ) {
        // Modifier-gated wheel zoom over the timeline.
        let (modifier_down, scroll_y) =
            ctx.input(|i| (i.modifiers.command || i.modifiers.ctrl, i.raw_scroll_delta.y));
        if timeline_hovered && modifier_down && scroll_y != 0.0 {
            self.viewport.wheel_zoom(scroll_y > 0.0, epoch_ms, view_width);
        }

        // Track raw touch contacts for pinch distance.
        let touches: Vec<(u64, egui::TouchPhase, Pos2)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { id, phase, pos, .. } => Some((id.0, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });
        for (id, phase, pos) in touches {
            match phase {
                egui::TouchPhase::Start | egui::TouchPhase::Move => {
                    self.touch_points.insert(id, pos);
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    self.touch_points.remove(&id);
                }
            }
        }

        // A second contact interrupts any pending long press.
        if self.touch_points.len() > 1 {
            self.add_press.cancel();
            self.add_press_track = None;
            self.reorder.cancel();
        }

        let distance = if self.touch_points.len() == 2 {
            let points: Vec<&Pos2> = self.touch_points.values().collect();
            Some(points[0].distance(*points[1]))
        } else {
            None
        };
        if let Some(factor) = self.pinch.update(distance) {
            self.viewport.zoom_by(factor, epoch_ms, view_width);
        }
    }

    /// Pointer press/move/release wiring for pan, long-press node
    /// creation, bubble clicks, and sidebar reordering.
    fn handle_pointer(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        rect: Rect,
        timeline_rect: Rect,
        view: &TimelineView<'_>,
        tracks: &[Track],
        now: Instant,
    ) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let scroll_y = self.viewport.scroll_y;

        let (pressed, released, any_down, press_pos, latest_pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.any_down(),
                i.pointer.interact_pos(),
                i.pointer.latest_pos(),
            )
        });

        // Press: arm the matching gesture.
        if pressed && let Some(pos) = press_pos {
            self.press_in_sidebar = pos.x < rect.left() + SIDEBAR_WIDTH;
            if let Some(index) = sidebar::row_index_at(rect, scroll_y, tracks.len(), pos) {
                self.reorder.press(tracks[index].id.clone(), index, pos, now);
            } else if let Some(row) = view.row_at(timeline_rect, pos) {
                self.add_press.press(pos, now);
                self.add_press_track = Some(tracks[row].id.clone());
            }
        }

        // Movement: cancel or steer.
        if let Some(pos) = latest_pos {
            self.add_press.movement(pos);
            self.reorder
                .movement(pos, sidebar::list_top(rect, scroll_y), tracks.len());
        }

        // Timers.
        self.reorder.poll(now);
        if let Some(start) = self.add_press.try_fire(now, ADD_NODE_DELAY)
            && let Some(track_id) = self.add_press_track.clone()
        {
            let timestamp = view.timestamp_at(timeline_rect, start.x);
            outcome.open_node_editor = Some(NodeEditorState::create(track_id, timestamp));
        }

        // Continuous pan: pointer-drag delta, no smoothing.
        if response.dragged() && !self.press_in_sidebar && !self.reorder.is_dragging() {
            let delta = response.drag_delta();
            self.viewport.pan_by(delta.x, delta.y);
        }

        // Release: finish gestures.
        if released {
            if self.reorder.is_dragging() {
                outcome.suppress_click = true;
            }
            outcome.reorder = self.reorder.release();
            if self.add_press.release() {
                outcome.suppress_click = true;
            }
            self.add_press_track = None;
            self.press_in_sidebar = false;
        } else if !any_down && !pressed {
            // Pointer lost without a release event: reset like pointer-up,
            // without applying a move.
            self.reorder.cancel();
            self.add_press.cancel();
            self.add_press_track = None;
            self.press_in_sidebar = false;
        }

        // Click on a bubble opens the editor.
        if response.clicked()
            && !outcome.suppress_click
            && let Some(pos) = response.interact_pointer_pos()
            && let Some(node) = view.node_at(timeline_rect, pos)
        {
            outcome.open_node_editor = Some(NodeEditorState::edit(node));
        }

        outcome
    }
}

/// Main application state and GUI logic.
pub struct LifeQuestsApp {
    /// Track list, kept sorted by `order` (dense, zero-based)
    tracks: Vec<Track>,
    /// Node collection keyed by identifier
    nodes: HashMap<NodeId, LifeNode>,
    /// Reference epoch anchoring pixel 0, fixed for the session
    epoch_ms: i64,

    interaction: InteractionState,
    /// Timeline width of the previous frame, for toolbar zoom anchoring
    last_view_width: f32,

    status_message: Option<StatusMessage>,
    track_editor: Option<TrackEditorState>,
    node_editor: Option<NodeEditorState>,
    pending_import: Option<ImportConfirmState>,
}

impl LifeQuestsApp {
    /// Create the application, loading any saved journal.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let mut load_error = None;
        let journal = match store::load() {
            Ok(Some(journal)) => journal,
            Ok(None) => Journal::default(),
            Err(err) => {
                log::warn!("failed to load journal: {}", err);
                load_error = Some(format!("Could not load your journal: {}", err));
                Journal::default()
            }
        };

        let mut tracks = journal.tracks;
        tracks.sort_by_key(|track| track.order);
        model::renumber_orders(&mut tracks);

        let nodes = journal
            .nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();

        // Pixel origin: three years before the session start.
        let epoch_ms = (Utc::now() - chrono::Duration::days(365 * 3)).timestamp_millis();

        Self {
            tracks,
            nodes,
            epoch_ms,
            interaction: InteractionState::new(),
            last_view_width: 0.0,
            status_message: load_error.map(|text| StatusMessage::new(text, StatusKind::Error)),
            track_editor: None,
            node_editor: None,
            pending_import: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status_message = Some(StatusMessage::new(text, kind));
    }

    /// Persist the whole journal; failures are surfaced, never fatal.
    fn save_journal(&mut self) {
        let journal = Journal {
            tracks: self.tracks.clone(),
            nodes: self.sorted_nodes(),
        };
        if let Err(err) = store::save(&journal) {
            log::error!("failed to save journal: {}", err);
            self.set_status(format!("Could not save: {}", err), StatusKind::Error);
        }
    }

    /// All nodes in a stable order for serialization.
    fn sorted_nodes(&self) -> Vec<LifeNode> {
        let mut nodes: Vec<LifeNode> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        nodes
    }

    fn any_modal_open(&self) -> bool {
        self.track_editor.is_some() || self.node_editor.is_some() || self.pending_import.is_some()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    fn save_track(&mut self, form: TrackEditorState) {
        match form.id {
            Some(id) => {
                // Update in place: identity and order stay put.
                if let Some(track) = self.tracks.iter_mut().find(|track| track.id == id) {
                    track.name = form.name.trim().to_string();
                    track.icon = form.icon;
                    track.color = form.color;
                }
            }
            None => {
                let id = fresh_id('t', |candidate| {
                    self.tracks.iter().any(|track| track.id == candidate)
                });
                self.tracks.push(Track {
                    id,
                    name: form.name.trim().to_string(),
                    icon: form.icon,
                    color: form.color,
                    order: self.tracks.len(),
                });
            }
        }
        self.save_journal();
    }

    /// Delete a track and every node on it, then restore order density.
    fn delete_track(&mut self, id: &TrackId) {
        self.tracks.retain(|track| track.id != *id);
        self.nodes.retain(|_, node| node.track_id != *id);
        model::renumber_orders(&mut self.tracks);
        self.save_journal();
    }

    fn save_node(&mut self, form: NodeEditorState) {
        // The save action is disabled until the form is valid.
        let Some(timestamp) = form.timestamp_ms() else {
            return;
        };
        let description = {
            let trimmed = form.description.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        match form.id {
            Some(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.timestamp = timestamp;
                    node.title = form.title.trim().to_string();
                    node.description = description;
                    node.weight = clamp_weight(form.weight);
                    node.kind = form.kind;
                }
            }
            None => {
                let id = fresh_id('n', |candidate| self.nodes.contains_key(candidate));
                self.nodes.insert(
                    id.clone(),
                    LifeNode {
                        id,
                        track_id: form.track_id,
                        timestamp,
                        title: form.title.trim().to_string(),
                        description,
                        weight: clamp_weight(form.weight),
                        kind: form.kind,
                        linked_node_id: form.linked_node_id,
                    },
                );
            }
        }
        self.save_journal();
    }

    fn delete_node(&mut self, id: &NodeId) {
        self.nodes.remove(id);
        self.save_journal();
    }

    fn apply_reorder(&mut self, from: usize, to: usize) {
        if model::apply_reorder(&mut self.tracks, from, to) {
            self.save_journal();
        }
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    fn export_backup(&mut self) {
        let now = Utc::now();
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(exchange::default_backup_filename(now))
            .set_title("Export Backup")
            .save_file()
        else {
            return;
        };

        let nodes = self.sorted_nodes();
        let result = exchange::export_json(&self.tracks, &nodes, now)
            .map_err(|err| err.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|err| err.to_string()));

        match result {
            Ok(()) => self.set_status(
                format!(
                    "Exported {} quests and {} memories",
                    self.tracks.len(),
                    nodes.len()
                ),
                StatusKind::Success,
            ),
            Err(err) => {
                log::error!("export failed: {}", err);
                self.set_status(format!("Export failed: {}", err), StatusKind::Error);
            }
        }
    }

    fn import_backup(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_title("Import Backup")
            .pick_file()
        else {
            return;
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                self.set_status(format!("Could not read file: {}", err), StatusKind::Error);
                return;
            }
        };

        match exchange::import_json(&content) {
            Ok(imported) => {
                self.interaction.reset_gestures();
                self.pending_import = Some(ImportConfirmState {
                    tracks: imported.tracks,
                    nodes: imported.nodes,
                });
            }
            Err(err) => {
                // State is left untouched on any import failure.
                self.set_status(format!("Import failed: {}", err), StatusKind::Error);
            }
        }
    }

    fn apply_import(&mut self, imported: ImportConfirmState) {
        let track_count = imported.tracks.len();
        let node_count = imported.nodes.len();

        self.tracks = imported.tracks;
        self.nodes = imported
            .nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        self.save_journal();
        self.set_status(
            format!("Imported {} quests and {} memories", track_count, node_count),
            StatusKind::Success,
        );
    }

    // ------------------------------------------------------------------
    // Dialogs
    // ------------------------------------------------------------------

    fn open_track_editor(&mut self, state: TrackEditorState) {
        self.interaction.reset_gestures();
        self.track_editor = Some(state);
    }

    fn open_node_editor(&mut self, state: NodeEditorState) {
        self.interaction.reset_gestures();
        self.node_editor = Some(state);
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(mut state) = self.track_editor.take() {
            match dialogs::track_editor(ctx, &mut state) {
                Some(TrackEditorAction::Save) => self.save_track(state),
                Some(TrackEditorAction::Delete) => {
                    if let Some(id) = state.id {
                        self.delete_track(&id);
                    }
                }
                Some(TrackEditorAction::Cancel) => {}
                None => self.track_editor = Some(state),
            }
        }

        if let Some(mut state) = self.node_editor.take() {
            match dialogs::node_editor(ctx, &mut state) {
                Some(NodeEditorAction::Save) => self.save_node(state),
                Some(NodeEditorAction::Delete) => {
                    if let Some(id) = state.id {
                        self.delete_node(&id);
                    }
                }
                Some(NodeEditorAction::Cancel) => {}
                None => self.node_editor = Some(state),
            }
        }

        if let Some(state) = self.pending_import.take() {
            match dialogs::import_confirm(ctx, &state) {
                Some(ImportConfirmAction::Replace) => self.apply_import(state),
                Some(ImportConfirmAction::Cancel) => {}
                None => self.pending_import = Some(state),
            }
        }
    }

    // ------------------------------------------------------------------
    // Toolbar
    // ------------------------------------------------------------------

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("My Questlines");
                ui.separator();

                if ui
                    .button("⬇ Export")
                    .on_hover_text("Export a JSON backup")
                    .clicked()
                {
                    self.export_backup();
                }
                if ui
                    .button("⬆ Import")
                    .on_hover_text("Import a JSON backup")
                    .clicked()
                {
                    self.import_backup();
                }

                ui.separator();

                if ui.button("➖").on_hover_text("Zoom out").clicked() {
                    self.interaction.viewport.zoom_by(
                        1.0 / BUTTON_ZOOM_STEP,
                        self.epoch_ms,
                        self.last_view_width,
                    );
                }
                if ui.button("➕").on_hover_text("Zoom in").clicked() {
                    self.interaction.viewport.zoom_by(
                        BUTTON_ZOOM_STEP,
                        self.epoch_ms,
                        self.last_view_width,
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_status_message(ui);
                });
            });
        });
    }

    /// Render the status message if one is active.
    fn render_status_message(&mut self, ui: &mut egui::Ui) {
        let should_dismiss = self
            .status_message
            .as_ref()
            .is_some_and(|msg| !msg.is_visible());
        if should_dismiss {
            self.status_message = None;
            return;
        }

        let msg_info = self.status_message.as_ref().map(|msg| {
            let color = match msg.kind {
                StatusKind::Success => egui::Color32::from_rgb(76, 175, 80),
                StatusKind::Error => egui::Color32::from_rgb(244, 67, 54),
            };
            (color, msg.text.clone())
        });

        if let Some((color, text)) = msg_info {
            let mut dismiss_clicked = false;
            ui.horizontal(|ui| {
                if ui.small_button("✕").clicked() {
                    dismiss_clicked = true;
                }
                ui.colored_label(color, &text);
            });
            if dismiss_clicked {
                self.status_message = None;
            }
            ui.ctx()
                .request_repaint_after(std::time::Duration::from_millis(500));
        }
    }

    // ------------------------------------------------------------------
    // Timeline body
    // ------------------------------------------------------------------

    fn render_body(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let modal_open = self.any_modal_open();

        let mut outcome = PointerOutcome::default();
        let mut sidebar_action: Option<SidebarAction> = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let timeline_rect =
                    Rect::from_min_max(Pos2::new(rect.left() + SIDEBAR_WIDTH, rect.top()), rect.max);

                let view_width = timeline_rect.width();
                self.last_view_width = view_width;

                // Phase two of the zoom protocol: the width is stable again.
                self.interaction
                    .viewport
                    .apply_pending_recenter(self.epoch_ms, view_width);

                if !modal_open {
                    self.interaction
                        .handle_zoom(ctx, response.hovered(), self.epoch_ms, view_width);
                }

                // Keep the viewport inside the content bounds.
                let scale = self.interaction.viewport.scale(self.epoch_ms);
                self.interaction.viewport.clamp_scroll(
                    timeline::content_width(&scale),
                    timeline::content_height(self.tracks.len()),
                    view_width,
                    rect.height(),
                );

                // Resolve rows: filter, sort, lay out.
                let rows = build_rows(&self.tracks, &self.nodes, &scale);
                let view = TimelineView::new(
                    &rows,
                    scale,
                    self.interaction.viewport.scroll_x,
                    self.interaction.viewport.scroll_y,
                );

                if !modal_open {
                    outcome = self.interaction.handle_pointer(
                        ctx,
                        &response,
                        rect,
                        timeline_rect,
                        &view,
                        &self.tracks,
                        now,
                    );
                }

                view.render(&painter, timeline_rect);

                let sidebar_view = SidebarView::new(
                    &self.tracks,
                    &self.interaction.reorder,
                    self.interaction.viewport.scroll_y,
                );
                if let Some(action) = sidebar_view.render(ui, rect)
                    && !modal_open
                    && !outcome.suppress_click
                {
                    sidebar_action = Some(action);
                }
                sidebar_view.draw_drag_proxy(ctx, rect);

                // Keep polling while a long press is waiting on its delay.
                if self.interaction.add_press.is_armed() || self.interaction.reorder.is_armed() {
                    ctx.request_repaint_after(std::time::Duration::from_millis(50));
                }
            });

        if let Some((from, to)) = outcome.reorder {
            self.apply_reorder(from, to);
        }
        if let Some(state) = outcome.open_node_editor {
            self.open_node_editor(state);
        }
        match sidebar_action {
            Some(SidebarAction::EditTrack(index)) => {
                if let Some(track) = self.tracks.get(index) {
                    let state = TrackEditorState::edit(track);
                    self.open_track_editor(state);
                }
            }
            Some(SidebarAction::AddTrack) => {
                self.open_track_editor(TrackEditorState::create());
            }
            None => {}
        }
    }
}

/// Resolve every track's row geometry for one frame.
fn build_rows<'a>(
    tracks: &'a [Track],
    nodes: &'a HashMap<NodeId, LifeNode>,
    scale: &TimeScale,
) -> Vec<RowData<'a>> {
    tracks
        .iter()
        .map(|track| {
            let mut row_nodes: Vec<&LifeNode> = nodes
                .values()
                .filter(|node| node.track_id == track.id)
                .collect();
            row_nodes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
            RowData {
                layout: layout_row(&row_nodes, scale),
                track,
                nodes: row_nodes,
            }
        })
        .collect()
}

impl eframe::App for LifeQuestsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_toolbar(ctx);
        self.render_body(ctx);
        self.render_dialogs(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{NodeKind, TrackColor};

    fn tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track {
                id: format!("t{}", i),
                name: format!("Track {}", i),
                icon: "🌱".to_string(),
                color: TrackColor::Slate,
                order: i,
            })
            .collect()
    }

    fn node(id: &str, track_id: &str, day: i64) -> LifeNode {
        LifeNode {
            id: id.to_string(),
            track_id: track_id.to_string(),
            timestamp: day * 86_400_000,
            title: format!("Node {}", id),
            description: None,
            weight: 5,
            kind: NodeKind::Moment,
            linked_node_id: None,
        }
    }

    #[test]
    fn test_build_rows_sorts_nodes_by_time() {
        let tracks = tracks(1);
        let mut nodes = HashMap::new();
        nodes.insert("nb".to_string(), node("nb", "t0", 300));
        nodes.insert("na".to_string(), node("na", "t0", 100));
        nodes.insert("nc".to_string(), node("nc", "t0", 200));
        // A node on an unknown track never reaches a row.
        nodes.insert("nx".to_string(), node("nx", "gone", 50));

        let scale = TimeScale::new(0, 1.0);
        let rows = build_rows(&tracks, &nodes, &scale);

        assert_eq!(rows.len(), 1);
        let ids: Vec<&str> = rows[0].nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["na", "nc", "nb"]);
    }

    #[test]
    fn test_build_rows_ties_break_on_id() {
        let tracks = tracks(1);
        let mut nodes = HashMap::new();
        nodes.insert("nb".to_string(), node("nb", "t0", 100));
        nodes.insert("na".to_string(), node("na", "t0", 100));

        let scale = TimeScale::new(0, 1.0);
        let rows = build_rows(&tracks, &nodes, &scale);
        let ids: Vec<&str> = rows[0].nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["na", "nb"]);
    }

    #[test]
    fn test_interaction_reset_clears_gestures() {
        let mut interaction = InteractionState::new();
        interaction
            .add_press
            .press(egui::pos2(10.0, 10.0), Instant::now());
        interaction.add_press_track = Some("t0".to_string());
        interaction
            .reorder
            .press("t0".to_string(), 0, egui::pos2(10.0, 10.0), Instant::now());
        interaction.touch_points.insert(1, egui::pos2(0.0, 0.0));

        interaction.reset_gestures();
        assert!(!interaction.add_press.is_armed());
        assert!(interaction.add_press_track.is_none());
        assert!(!interaction.reorder.is_armed());
        assert!(interaction.touch_points.is_empty());
    }

    #[test]
    fn test_status_message_lifecycle() {
        let message = StatusMessage::new("Saved", StatusKind::Success);
        assert!(message.is_visible());
        assert_eq!(message.kind, StatusKind::Success);
    }
}
