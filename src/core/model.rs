//! Track and memory data structures.
//!
//! This module defines the journal's core data: tracks (life areas rendered
//! as horizontal questlines) and life nodes (dated memories placed on them).

use chrono::Utc;
use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

/// Identifier of a track.
pub type TrackId = String;

/// Identifier of a life node.
pub type NodeId = String;

/// Minimum importance weight of a node.
pub const MIN_WEIGHT: u8 = 1;

/// Maximum importance weight of a node.
pub const MAX_WEIGHT: u8 = 10;

/// Node classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Permanently thickens the track line from its timestamp onward
    #[serde(rename = "MILESTONE")]
    Milestone,
    /// Transient local bulge, no lasting effect on the line
    #[serde(rename = "MOMENT")]
    Moment,
}

/// Theme color of a track, from a fixed palette.
///
/// Serialized as the lowercase palette name so journals and backups stay
/// portable across versions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackColor {
    #[default]
    Slate,
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

impl TrackColor {
    /// Every palette entry, in picker display order.
    pub const ALL: [TrackColor; 18] = [
        TrackColor::Slate,
        TrackColor::Red,
        TrackColor::Orange,
        TrackColor::Amber,
        TrackColor::Yellow,
        TrackColor::Lime,
        TrackColor::Green,
        TrackColor::Emerald,
        TrackColor::Teal,
        TrackColor::Cyan,
        TrackColor::Sky,
        TrackColor::Blue,
        TrackColor::Indigo,
        TrackColor::Violet,
        TrackColor::Purple,
        TrackColor::Fuchsia,
        TrackColor::Pink,
        TrackColor::Rose,
    ];

    /// Get the render color for this palette entry.
    pub fn color32(self) -> Color32 {
        match self {
            TrackColor::Slate => Color32::from_rgb(0x64, 0x74, 0x8b),
            TrackColor::Red => Color32::from_rgb(0xef, 0x44, 0x44),
            TrackColor::Orange => Color32::from_rgb(0xf9, 0x73, 0x16),
            TrackColor::Amber => Color32::from_rgb(0xf5, 0x9e, 0x0b),
            TrackColor::Yellow => Color32::from_rgb(0xea, 0xb3, 0x08),
            TrackColor::Lime => Color32::from_rgb(0x84, 0xcc, 0x16),
            TrackColor::Green => Color32::from_rgb(0x22, 0xc5, 0x5e),
            TrackColor::Emerald => Color32::from_rgb(0x10, 0xb9, 0x81),
            TrackColor::Teal => Color32::from_rgb(0x14, 0xb8, 0xa6),
            TrackColor::Cyan => Color32::from_rgb(0x06, 0xb6, 0xd4),
            TrackColor::Sky => Color32::from_rgb(0x0e, 0xa5, 0xe9),
            TrackColor::Blue => Color32::from_rgb(0x3b, 0x82, 0xf6),
            TrackColor::Indigo => Color32::from_rgb(0x63, 0x66, 0xf1),
            TrackColor::Violet => Color32::from_rgb(0x8b, 0x5c, 0xf6),
            TrackColor::Purple => Color32::from_rgb(0xa8, 0x55, 0xf7),
            TrackColor::Fuchsia => Color32::from_rgb(0xd9, 0x46, 0xef),
            TrackColor::Pink => Color32::from_rgb(0xec, 0x48, 0x99),
            TrackColor::Rose => Color32::from_rgb(0xf4, 0x3f, 0x5e),
        }
    }

    /// Get the lowercase palette name.
    pub fn name(self) -> &'static str {
        match self {
            TrackColor::Slate => "slate",
            TrackColor::Red => "red",
            TrackColor::Orange => "orange",
            TrackColor::Amber => "amber",
            TrackColor::Yellow => "yellow",
            TrackColor::Lime => "lime",
            TrackColor::Green => "green",
            TrackColor::Emerald => "emerald",
            TrackColor::Teal => "teal",
            TrackColor::Cyan => "cyan",
            TrackColor::Sky => "sky",
            TrackColor::Blue => "blue",
            TrackColor::Indigo => "indigo",
            TrackColor::Violet => "violet",
            TrackColor::Purple => "purple",
            TrackColor::Fuchsia => "fuchsia",
            TrackColor::Pink => "pink",
            TrackColor::Rose => "rose",
        }
    }
}

/// A named life area rendered as one horizontal timeline row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    /// Unique, stable identifier
    pub id: TrackId,
    /// Display name
    pub name: String,
    /// Icon glyph (emoji)
    pub icon: String,
    /// Theme color
    pub color: TrackColor,
    /// Vertical stacking position, dense and zero-based
    pub order: usize,
}

/// A single dated memory or milestone on a track.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Owning track; a weak reference, never required to resolve
    pub track_id: TrackId,
    /// Absolute instant in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Non-empty display text
    pub title: String,
    /// Optional free-text detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Importance weight, 1-10, controls bubble radius
    pub weight: u8,
    /// Whether this node shifts the line permanently or bulges it locally
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Weak cross-track reference; absence of the target is tolerated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_node_id: Option<NodeId>,
}

impl LifeNode {
    /// Returns true if this node permanently thickens its track's line.
    pub fn is_milestone(&self) -> bool {
        self.kind == NodeKind::Milestone
    }
}

/// Clamp an importance weight into the valid range.
pub fn clamp_weight(weight: u8) -> u8 {
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Generate a fresh identifier from the current wall clock.
///
/// Ids are the prefix followed by a millisecond timestamp; the stamp is
/// bumped until the id is free, so two creations within the same
/// millisecond stay unique.
pub fn fresh_id<F>(prefix: char, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let id = format!("{}{}", prefix, stamp);
        if !is_taken(&id) {
            return id;
        }
        stamp += 1;
    }
}

/// Reassign every track's `order` to its array index.
///
/// Restores the density invariant: order values are exactly `0..n`.
pub fn renumber_orders(tracks: &mut [Track]) {
    for (index, track) in tracks.iter_mut().enumerate() {
        track.order = index;
    }
}

/// Move the track at `from` to position `to` and renumber densely.
///
/// Returns false (leaving the list untouched) when the indices are out of
/// range or equal.
pub fn apply_reorder(tracks: &mut Vec<Track>, from: usize, to: usize) -> bool {
    if from >= tracks.len() || to >= tracks.len() || from == to {
        return false;
    }
    let moved = tracks.remove(from);
    tracks.insert(to, moved);
    renumber_orders(tracks);
    true
}
