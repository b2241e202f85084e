//! In-progress strokes.
//!
//! A [`DrawSession`] exists between pointer-down and pointer-up. It snapshots
//! the tool configuration when it starts and has no access to the history; the
//! only way out is [`DrawSession::into_stroke`], which consumes it.

use egui::{Color32, Pos2};

use crate::stroke::{Stroke, StrokeKind};
use crate::tools::{Tool, ToolConfig};

/// Accumulates points for a freehand stroke
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandSession {
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

impl FreehandSession {
    pub fn new(start: Pos2, color: Color32, width: f32) -> Self {
        Self {
            points: vec![start],
            color,
            width,
        }
    }

    pub fn append_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn into_stroke(self) -> Stroke {
        Stroke::freehand(self.points, self.color, self.width)
    }
}

/// A fixed start point and a live end point
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowSession {
    start: Pos2,
    end: Pos2,
    color: Color32,
    width: f32,
}

impl ArrowSession {
    pub fn new(start: Pos2, color: Color32, width: f32) -> Self {
        Self {
            start,
            end: start,
            color,
            width,
        }
    }

    /// Replaces the end point; arrows never accumulate points.
    pub fn update_end(&mut self, point: Pos2) {
        self.end = point;
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    pub fn into_stroke(self) -> Stroke {
        Stroke::arrow(self.start, self.end, self.color, self.width)
    }
}

/// The stroke currently being drawn
#[derive(Debug, Clone, PartialEq)]
pub enum DrawSession {
    Freehand(FreehandSession),
    Arrow(ArrowSession),
}

impl DrawSession {
    /// Opens a session from a point-in-time snapshot of the tool config.
    ///
    /// The eraser is a pen whose color is forced to `background`.
    pub fn begin(config: &ToolConfig, background: Color32, start: Pos2) -> Self {
        let width = config.brush_size();
        match config.tool() {
            Tool::Pen => Self::Freehand(FreehandSession::new(start, config.color(), width)),
            Tool::Eraser => Self::Freehand(FreehandSession::new(start, background, width)),
            Tool::Arrow => Self::Arrow(ArrowSession::new(start, config.color(), width)),
        }
    }

    pub fn kind(&self) -> StrokeKind {
        match self {
            Self::Freehand(_) => StrokeKind::Freehand,
            Self::Arrow(_) => StrokeKind::Arrow,
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Self::Freehand(session) => session.color,
            Self::Arrow(session) => session.color,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            Self::Freehand(session) => session.width,
            Self::Arrow(session) => session.width,
        }
    }

    /// Appends (freehand) or replaces the end point (arrow)
    pub fn pointer_move(&mut self, point: Pos2) {
        match self {
            Self::Freehand(session) => session.append_point(point),
            Self::Arrow(session) => session.update_end(point),
        }
    }

    /// Applies the pointer-up position before finalizing.
    ///
    /// For freehand strokes the point is only added when it differs from the
    /// last sampled one, so a plain click stays a single-point dot.
    pub fn pointer_up(&mut self, point: Pos2) {
        match self {
            Self::Freehand(session) => {
                if session.points.last() != Some(&point) {
                    session.append_point(point);
                }
            }
            Self::Arrow(session) => session.update_end(point),
        }
    }

    /// Points to preview: the sampled path, or start and end for an arrow
    pub fn preview_points(&self) -> Vec<Pos2> {
        match self {
            Self::Freehand(session) => session.points.clone(),
            Self::Arrow(session) => vec![session.start, session.end],
        }
    }

    /// Freezes the session into an immutable stroke
    pub fn into_stroke(self) -> Stroke {
        match self {
            Self::Freehand(session) => session.into_stroke(),
            Self::Arrow(session) => session.into_stroke(),
        }
    }
}
