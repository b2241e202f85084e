use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Minimum length of an arrow head, in canvas units
pub const MIN_ARROW_HEAD: f32 = 10.0;

/// The drawing primitive a stroke represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeKind {
    /// Connected polyline through every sampled point
    Freehand,
    /// Straight segment from start to end with a head at the end
    Arrow,
}

/// Immutable stroke for sharing.
///
/// Once built, the point list never changes. Strokes are only constructed by
/// finalizing a draw session or by the persistence layer after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    kind: StrokeKind,
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub(crate) fn freehand(points: Vec<Pos2>, color: Color32, width: f32) -> Self {
        debug_assert!(!points.is_empty());
        Self {
            kind: StrokeKind::Freehand,
            points,
            color,
            width,
        }
    }

    pub(crate) fn arrow(start: Pos2, end: Pos2, color: Color32, width: f32) -> Self {
        Self {
            kind: StrokeKind::Arrow,
            points: vec![start, end],
            color,
            width,
        }
    }

    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Triangle for the arrow head, tip first. `None` for freehand strokes
    /// and for arrows whose start and end coincide.
    pub fn arrow_head(&self) -> Option<[Pos2; 3]> {
        match self.kind {
            StrokeKind::Arrow => arrow_head(self.points[0], self.points[1], self.width),
            StrokeKind::Freehand => None,
        }
    }
}

/// Computes the arrow head triangle for a segment, tip first.
///
/// The head grows with the stroke width but never exceeds the shaft length.
pub fn arrow_head(start: Pos2, end: Pos2, width: f32) -> Option<[Pos2; 3]> {
    let shaft: Vec2 = end - start;
    let length = shaft.length();
    if length <= f32::EPSILON {
        return None;
    }

    let dir = shaft / length;
    let normal = dir.rot90();
    let head_len = (MIN_ARROW_HEAD + 2.0 * width).min(length);
    let half_width = head_len * 0.5;
    let base = end - dir * head_len;

    Some([end, base + normal * half_width, base - normal * half_width])
}
