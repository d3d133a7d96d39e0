//! Timeline rendering.
//!
//! Draws the year/month background grid and one row per track: the
//! progressively thickening questline, moment bulges, node bubbles, and
//! lane-offset title labels. All geometry comes precomputed from the
//! layout core; this module only paints and answers hit-test queries.

use chrono::{Datelike, TimeZone, Utc};
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::core::layout::{BULGE_HALF_WIDTH, LANE_OFFSETS, ROW_HEIGHT, RowLayout};
use crate::core::model::{LifeNode, Track};
use crate::core::timescale::TimeScale;

/// Last year covered by the background grid.
const END_YEAR: i32 = 2100;

/// Zoom factor from which every month gets a separator.
const SHOW_ALL_MONTHS_ZOOM: f32 = 1.0;

/// Zoom factor from which every second month gets a separator.
const SHOW_BI_MONTHS_ZOOM: f32 = 0.6;

/// Horizontal slack before a grid marker is skipped as off-screen.
const GRID_CULL_MARGIN: f32 = 200.0;

/// Extra scrollable space past the last grid year.
const CONTENT_RIGHT_PAD: f32 = 200.0;

/// Scrolling comfort space below the last row.
const CONTENT_BOTTOM_PAD: f32 = 160.0;

// Paper-and-slate palette of the timeline body.
const PAPER: Color32 = Color32::from_rgb(253, 252, 250);
const YEAR_LINE: Color32 = Color32::from_rgb(226, 232, 240);
const MONTH_LINE: Color32 = Color32::from_rgb(241, 245, 249);
const YEAR_TEXT: Color32 = Color32::from_rgb(148, 163, 184);
const MONTH_TEXT: Color32 = Color32::from_rgb(203, 213, 225);
const LABEL_TEXT: Color32 = Color32::from_rgb(30, 41, 59);
const LABEL_BACKDROP: Color32 = Color32::from_rgba_premultiplied(200, 200, 200, 200);

/// One track row resolved for rendering.
pub struct RowData<'a> {
    pub track: &'a Track,
    /// The track's nodes, sorted ascending by timestamp
    pub nodes: Vec<&'a LifeNode>,
    pub layout: RowLayout,
}

/// Paints the timeline body and answers position queries.
pub struct TimelineView<'a> {
    rows: &'a [RowData<'a>],
    scale: TimeScale,
    scroll_x: f32,
    scroll_y: f32,
}

impl<'a> TimelineView<'a> {
    pub fn new(rows: &'a [RowData<'a>], scale: TimeScale, scroll_x: f32, scroll_y: f32) -> Self {
        Self {
            rows,
            scale,
            scroll_x,
            scroll_y,
        }
    }

    /// Screen x of an absolute timestamp inside `rect`.
    fn screen_x(&self, rect: Rect, timestamp_ms: i64) -> f32 {
        rect.left() + self.scale.to_pixel(timestamp_ms) - self.scroll_x
    }

    /// The absolute timestamp under a screen x inside `rect`.
    pub fn timestamp_at(&self, rect: Rect, screen_x: f32) -> i64 {
        self.scale
            .to_timestamp(screen_x - rect.left() + self.scroll_x)
    }

    /// The row index under a screen position, if any.
    pub fn row_at(&self, rect: Rect, pos: Pos2) -> Option<usize> {
        if !rect.contains(pos) {
            return None;
        }
        let row = ((pos.y - rect.top() + self.scroll_y) / ROW_HEIGHT).floor();
        if row < 0.0 {
            return None;
        }
        let row = row as usize;
        (row < self.rows.len()).then_some(row)
    }

    /// The node whose bubble contains a screen position, if any.
    pub fn node_at(&self, rect: Rect, pos: Pos2) -> Option<&'a LifeNode> {
        let row_index = self.row_at(rect, pos)?;
        let row = &self.rows[row_index];
        let center_y = self.row_top(rect, row_index) + ROW_HEIGHT / 2.0;

        row.layout.nodes.iter().find_map(|placed| {
            let center = Pos2::new(
                rect.left() + placed.x - self.scroll_x,
                center_y,
            );
            (center.distance(pos) <= placed.radius).then(|| row.nodes[placed.index])
        })
    }

    fn row_top(&self, rect: Rect, row_index: usize) -> f32 {
        rect.top() + row_index as f32 * ROW_HEIGHT - self.scroll_y
    }

    /// Render the grid and every track row, clipped to `rect`.
    pub fn render(&self, painter: &Painter, rect: Rect) {
        let painter = painter.with_clip_rect(rect);

        painter.rect_filled(rect, 0.0, PAPER);
        self.draw_grid(&painter, rect);

        for (row_index, row) in self.rows.iter().enumerate() {
            let row_top = self.row_top(rect, row_index);
            if row_top > rect.bottom() || row_top + ROW_HEIGHT < rect.top() {
                continue;
            }
            self.draw_row(&painter, rect, row, row_top);
        }
    }

    /// Draw year and month separators through the grid horizon.
    fn draw_grid(&self, painter: &Painter, rect: Rect) {
        let start_year = Utc
            .timestamp_millis_opt(self.scale.epoch_ms)
            .single()
            .map(|datetime| datetime.year())
            .unwrap_or(END_YEAR);

        let show_all_months = self.scale.zoom >= SHOW_ALL_MONTHS_ZOOM;
        let show_bi_months = self.scale.zoom > SHOW_BI_MONTHS_ZOOM;

        for year in start_year..=END_YEAR {
            let Some(year_start) = month_start_ms(year, 1) else {
                continue;
            };
            let x = self.screen_x(rect, year_start);
            if x < rect.left() - GRID_CULL_MARGIN {
                continue;
            }
            if x > rect.right() + GRID_CULL_MARGIN {
                break;
            }

            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(2.0, YEAR_LINE),
            );
            painter.text(
                Pos2::new(x + 8.0, rect.top() + 8.0),
                Align2::LEFT_TOP,
                format!("{}", year),
                FontId::proportional(12.0),
                YEAR_TEXT,
            );

            if !show_bi_months {
                continue;
            }
            for month in 2..=12_u32 {
                if !show_all_months && (month - 1) % 2 != 0 {
                    continue;
                }
                let Some(month_start) = month_start_ms(year, month) else {
                    continue;
                };
                let x = self.screen_x(rect, month_start);
                if x < rect.left() - GRID_CULL_MARGIN || x > rect.right() + GRID_CULL_MARGIN {
                    continue;
                }

                painter.line_segment(
                    [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                    Stroke::new(1.0, MONTH_LINE),
                );
                painter.text(
                    Pos2::new(x + 8.0, rect.top() + 32.0),
                    Align2::LEFT_TOP,
                    month_abbrev(month),
                    FontId::proportional(9.0),
                    MONTH_TEXT,
                );
            }
        }
    }

    /// Draw one track row: questline segments, bulges, bubbles, labels.
    fn draw_row(&self, painter: &Painter, rect: Rect, row: &RowData<'_>, row_top: f32) {
        let color = row.track.color.color32();
        let line_color = color.gamma_multiply(0.8);
        let center_y = row_top + ROW_HEIGHT / 2.0;

        // Questline segments; the infinite ends are clamped to the rect.
        for segment in &row.layout.segments {
            let x1 = (rect.left() + segment.x1 - self.scroll_x).max(rect.left() - 10.0);
            let x2 = (rect.left() + segment.x2 - self.scroll_x).min(rect.right() + 10.0);
            if x2 <= x1 {
                continue;
            }
            painter.line_segment(
                [Pos2::new(x1, center_y), Pos2::new(x2, center_y)],
                Stroke::new(segment.thickness, line_color),
            );
        }

        // Moment bulges: rounded pills on top of the line.
        for bulge in &row.layout.bulges {
            let x = rect.left() + bulge.x - self.scroll_x;
            if x < rect.left() - BULGE_HALF_WIDTH || x > rect.right() + BULGE_HALF_WIDTH {
                continue;
            }
            let pill = Rect::from_center_size(
                Pos2::new(x, center_y),
                egui::vec2(BULGE_HALF_WIDTH * 2.0, bulge.thickness),
            );
            painter.rect_filled(pill, bulge.thickness / 2.0, line_color);
        }

        // Bubbles and labels.
        for placed in &row.layout.nodes {
            let x = rect.left() + placed.x - self.scroll_x;
            if x + 250.0 < rect.left() || x - 100.0 > rect.right() {
                continue;
            }
            let node = row.nodes[placed.index];
            let center = Pos2::new(x, center_y);

            painter.circle_filled(center, placed.radius, color.gamma_multiply(0.2));
            if node.is_milestone() {
                painter.circle_filled(center, 4.0, color);
            }

            let (dx, dy) = LANE_OFFSETS[placed.lane];

            // The upper lane gets a thin connector down to the bubble.
            if placed.lane == 2 {
                painter.line_segment(
                    [
                        Pos2::new(x, center_y - 10.0),
                        Pos2::new(x + 8.0, center_y + dy + 15.0),
                    ],
                    Stroke::new(1.0, color.gamma_multiply(0.5)),
                );
            }

            let galley =
                painter.layout_no_wrap(node.title.clone(), FontId::proportional(12.0), LABEL_TEXT);
            let anchor = Pos2::new(x + dx, center_y + dy);
            let backdrop = Rect::from_min_size(anchor, galley.size() + egui::vec2(8.0, 4.0));
            painter.rect_filled(backdrop, 4.0, LABEL_BACKDROP);
            painter.galley(anchor + egui::vec2(4.0, 2.0), galley, LABEL_TEXT);

            if let Some(year) = node_year(node) {
                painter.text(
                    Pos2::new(anchor.x + 4.0, backdrop.bottom() + 2.0),
                    Align2::LEFT_TOP,
                    year.to_string(),
                    FontId::proportional(9.0),
                    YEAR_TEXT,
                );
            }
        }
    }
}

/// Scrollable content width under a time scale.
pub fn content_width(scale: &TimeScale) -> f32 {
    let horizon = month_start_ms(END_YEAR, 1).unwrap_or(scale.epoch_ms);
    scale.to_pixel(horizon).max(0.0) + CONTENT_RIGHT_PAD
}

/// Scrollable content height for a number of tracks.
pub fn content_height(track_count: usize) -> f32 {
    track_count as f32 * ROW_HEIGHT + CONTENT_BOTTOM_PAD
}

/// Millisecond timestamp of a month's first day, UTC.
fn month_start_ms(year: i32, month: u32) -> Option<i64> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .map(|datetime| datetime.timestamp_millis())
}

fn month_abbrev(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES[(month as usize - 1).min(11)]
}

fn node_year(node: &LifeNode) -> Option<i32> {
    Utc.timestamp_millis_opt(node.timestamp)
        .single()
        .map(|datetime| datetime.year())
}
