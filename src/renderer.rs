use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke as EguiStroke, Vec2};

use crate::board::Board;
use crate::session::DrawSession;
use crate::stroke::{StrokeKind, arrow_head};

/// Draws a board onto an egui painter.
///
/// Committed strokes are turned into shapes once per board revision and
/// reused until history changes; the in-progress stroke is rebuilt each frame.
#[derive(Debug, Default)]
pub struct Renderer {
    cached_revision: Option<u64>,
    shapes: Vec<Shape>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the current frame
    ///
    /// Args:
    ///     painter (egui::Painter): The painter to draw with
    ///     rect (egui::Rect): The canvas rectangle; stroke coordinates are relative to its min corner
    ///     board (Board): The board to draw
    pub fn render(&mut self, painter: &Painter, rect: Rect, board: &Board) {
        painter.rect_filled(rect, 0.0, board.settings().background);

        self.refresh(board);
        let offset = rect.min.to_vec2();
        for shape in &self.shapes {
            painter.add(translated(shape.clone(), offset));
        }

        if let Some(session) = board.active_session() {
            for shape in session_shapes(session) {
                painter.add(translated(shape, offset));
            }
        }
    }

    /// Rebuilds the cached shapes if the board changed since the last call.
    /// Returns true when a rebuild happened.
    pub fn refresh(&mut self, board: &Board) -> bool {
        if self.cached_revision == Some(board.revision()) {
            return false;
        }
        self.shapes = board
            .visible_strokes()
            .iter()
            .flat_map(|stroke| {
                stroke_shapes(stroke.kind(), stroke.points(), stroke.color(), stroke.width())
            })
            .collect();
        self.cached_revision = Some(board.revision());
        true
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

fn translated(mut shape: Shape, offset: Vec2) -> Shape {
    shape.translate(offset);
    shape
}

/// Preview shapes for a stroke that is still being drawn
pub fn session_shapes(session: &DrawSession) -> Vec<Shape> {
    stroke_shapes(
        session.kind(),
        &session.preview_points(),
        session.color(),
        session.width(),
    )
}

/// Shapes for one stroke in canvas coordinates.
///
/// A freehand stroke with a single point is drawn as a dot; an arrow is a
/// shaft plus a filled head.
pub fn stroke_shapes(kind: StrokeKind, points: &[Pos2], color: Color32, width: f32) -> Vec<Shape> {
    let dot = |p: Pos2| Shape::circle_filled(p, width / 2.0, color);
    match (kind, points) {
        (_, []) => Vec::new(),
        (StrokeKind::Freehand, [single]) => vec![dot(*single)],
        (StrokeKind::Freehand, _) => {
            vec![Shape::line(points.to_vec(), EguiStroke::new(width, color))]
        }
        (StrokeKind::Arrow, [start, end, ..]) => match arrow_head(*start, *end, width) {
            Some(head) => vec![
                Shape::line_segment([*start, head[0]], EguiStroke::new(width, color)),
                Shape::convex_polygon(head.to_vec(), color, EguiStroke::NONE),
            ],
            None => vec![dot(*start)],
        },
        (StrokeKind::Arrow, [single]) => vec![dot(*single)],
    }
}
