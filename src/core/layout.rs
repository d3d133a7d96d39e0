//! Row geometry: thickness profile, moment bulges, and label lanes.
//!
//! Converts a track's time-sorted nodes into a render-ready geometry list.
//! Everything here is pure; painting happens in the gui layer.

use super::model::{LifeNode, NodeKind};
use super::timescale::TimeScale;

/// Height of one track row in pixels.
pub const ROW_HEIGHT: f32 = 120.0;

/// Line thickness of a track before any milestone.
pub const BASE_THICKNESS: f32 = 2.0;

/// Permanent thickness gained at each milestone.
pub const THICKNESS_STEP: f32 = 0.75;

/// Horizontal half-width of a moment bulge, independent of zoom.
pub const BULGE_HALF_WIDTH: f32 = 8.0;

/// Extra thickness a moment adds on top of the ambient profile.
pub const BULGE_INCREMENT: f32 = 4.0;

/// Offsets from a node's position to its label anchor, one per lane:
/// below, stacked further below, and above the centerline.
pub const LANE_OFFSETS: [(f32, f32); 3] = [(12.0, 12.0), (12.0, 32.0), (12.0, -45.0)];

/// Minimum horizontal gap between labels sharing a lane.
pub const MIN_GAP: f32 = 20.0;

/// Assumed label width when claiming lane space.
pub const LABEL_WIDTH_ESTIMATE: f32 = 100.0;

/// Bubble radius at weight zero.
const BUBBLE_BASE_RADIUS: f32 = 10.0;

/// Bubble radius gained per unit of weight.
const BUBBLE_RADIUS_PER_WEIGHT: f32 = 3.0;

/// One constant-thickness piece of a track's line.
///
/// The first and last pieces extend to infinity; the painter clamps them
/// to the visible rect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub x1: f32,
    pub x2: f32,
    pub thickness: f32,
}

/// A transient local widening at a moment's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bulge {
    pub x: f32,
    pub thickness: f32,
}

/// A node resolved to its pixel position, bubble radius, and label lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedNode {
    /// Index into the sorted node slice this layout was built from
    pub index: usize,
    pub x: f32,
    pub radius: f32,
    pub lane: usize,
}

/// Render-ready geometry for one track row.
#[derive(Clone, Debug, Default)]
pub struct RowLayout {
    pub segments: Vec<LineSegment>,
    pub bulges: Vec<Bulge>,
    pub nodes: Vec<PlacedNode>,
}

/// Bubble radius for an importance weight.
pub fn bubble_radius(weight: u8) -> f32 {
    BUBBLE_BASE_RADIUS + weight as f32 * BUBBLE_RADIUS_PER_WEIGHT
}

/// Build the piecewise-constant thickness profile of a track.
///
/// Each milestone closes the segment leading up to it at the thickness
/// accumulated so far, then raises the running value by [`THICKNESS_STEP`].
/// The final segment carries the full accumulated thickness to infinity,
/// so the current state of a track reads as its cumulative weight. A track
/// with no milestones yields a single full-span segment at base thickness.
///
/// `sorted` must be ascending by timestamp; the output thickness is then
/// non-decreasing in time order.
pub fn thickness_profile<'a, I>(sorted: I, scale: &TimeScale) -> Vec<LineSegment>
where
    I: IntoIterator<Item = &'a LifeNode>,
{
    let mut segments = Vec::new();
    let mut thickness = BASE_THICKNESS;
    let mut cursor = f32::NEG_INFINITY;

    for node in sorted
        .into_iter()
        .filter(|node| node.kind == NodeKind::Milestone)
    {
        let x = scale.to_pixel(node.timestamp);
        segments.push(LineSegment {
            x1: cursor,
            x2: x,
            thickness,
        });
        cursor = x;
        thickness += THICKNESS_STEP;
    }

    segments.push(LineSegment {
        x1: cursor,
        x2: f32::INFINITY,
        thickness,
    });
    segments
}

/// Thickness of the profile at a given x position.
///
/// Locates the segment containing `x`; positions on a milestone boundary
/// belong to the segment after it.
pub fn ambient_thickness(segments: &[LineSegment], x: f32) -> f32 {
    segments
        .iter()
        .find(|segment| x >= segment.x1 && x < segment.x2)
        .or_else(|| segments.first())
        .map(|segment| segment.thickness)
        .unwrap_or(BASE_THICKNESS)
}

/// Compute the moment bulges of a track against its thickness profile.
///
/// Bulges are purely additive rendering; the profile itself is never
/// mutated.
pub fn moment_bulges(
    sorted: &[&LifeNode],
    segments: &[LineSegment],
    scale: &TimeScale,
) -> Vec<Bulge> {
    sorted
        .iter()
        .filter(|node| node.kind == NodeKind::Moment)
        .map(|node| {
            let x = scale.to_pixel(node.timestamp);
            Bulge {
                x,
                thickness: ambient_thickness(segments, x) + BULGE_INCREMENT,
            }
        })
        .collect()
}

/// Assign each x position to a label lane.
///
/// Greedy first-fit over the lanes in priority order: a lane qualifies
/// when its rightmost claimed extent plus [`MIN_GAP`] lies left of the
/// position. When every lane is saturated, the lane with the smallest
/// claimed extent takes the label, spreading unavoidable overlap instead
/// of concentrating it. Deterministic for a given input order.
///
/// `xs` must be ascending.
pub fn assign_lanes(xs: &[f32]) -> Vec<usize> {
    let mut claimed = [f32::NEG_INFINITY; LANE_OFFSETS.len()];

    xs.iter()
        .map(|&x| {
            let lane = (0..claimed.len())
                .find(|&lane| x > claimed[lane] + MIN_GAP)
                .unwrap_or_else(|| least_claimed_lane(&claimed));
            claimed[lane] = x + LABEL_WIDTH_ESTIMATE;
            lane
        })
        .collect()
}

fn least_claimed_lane(claimed: &[f32]) -> usize {
    let mut best = 0;
    for (lane, &extent) in claimed.iter().enumerate().skip(1) {
        if extent < claimed[best] {
            best = lane;
        }
    }
    best
}

/// Lay out one track row from its time-sorted nodes.
pub fn layout_row(sorted: &[&LifeNode], scale: &TimeScale) -> RowLayout {
    debug_assert!(
        sorted.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "layout_row expects nodes sorted ascending by timestamp"
    );

    let segments = thickness_profile(sorted.iter().copied(), scale);
    let bulges = moment_bulges(sorted, &segments, scale);

    let xs: Vec<f32> = sorted
        .iter()
        .map(|node| scale.to_pixel(node.timestamp))
        .collect();
    let lanes = assign_lanes(&xs);

    let nodes = sorted
        .iter()
        .enumerate()
        .map(|(index, node)| PlacedNode {
            index,
            x: xs[index],
            radius: bubble_radius(node.weight),
            lane: lanes[index],
        })
        .collect();

    RowLayout {
        segments,
        bulges,
        nodes,
    }
}
