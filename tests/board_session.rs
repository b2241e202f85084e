use std::cell::RefCell;
use std::rc::Rc;

use egui::{Color32, pos2};
use whiteboard::input::{InputEvent, InputLocation};
use whiteboard::{
    Board, BoardEvent, BoardSettings, ConfigError, EventHandler, HistoryError, InterruptPolicy,
    StrokeKind, Tool,
};

struct Recorder(Rc<RefCell<Vec<BoardEvent>>>);

impl EventHandler for Recorder {
    fn handle_event(&mut self, event: &BoardEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

fn recorded(board: &Board) -> Rc<RefCell<Vec<BoardEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    board.subscribe(Box::new(Recorder(Rc::clone(&events))));
    events
}

fn kinds(board: &Board) -> Vec<StrokeKind> {
    board.visible_strokes().iter().map(|s| s.kind()).collect()
}

#[test]
fn draw_undo_redo_scenario() {
    let mut board = Board::default();

    // Stroke A: three points, red, width 2
    board.set_color(Color32::RED);
    board.set_brush_size(2.0).unwrap();
    board.pointer_down(pos2(0.0, 0.0));
    board.pointer_move(pos2(5.0, 5.0));
    board.pointer_up(pos2(10.0, 0.0));

    let a = board.visible_strokes()[0].clone();
    assert_eq!(a.points().len(), 3);
    assert_eq!(a.color(), Color32::RED);
    assert_eq!(a.width(), 2.0);

    // Stroke B: blue arrow
    board.set_tool(Tool::Arrow);
    board.set_color_hex("#0000ff").unwrap();
    board.pointer_down(pos2(20.0, 20.0));
    board.pointer_move(pos2(30.0, 25.0));
    board.pointer_up(pos2(40.0, 30.0));

    assert_eq!(kinds(&board), vec![StrokeKind::Freehand, StrokeKind::Arrow]);
    let b = board.visible_strokes()[1].clone();
    assert_eq!(b.points(), &[pos2(20.0, 20.0), pos2(40.0, 30.0)]);
    assert_eq!(b.color(), Color32::from_rgb(0, 0, 255));

    board.undo().unwrap();
    assert_eq!(kinds(&board), vec![StrokeKind::Freehand]);
    board.undo().unwrap();
    assert!(board.visible_strokes().is_empty());
    assert_eq!(board.undo(), Err(HistoryError::NothingToUndo));

    board.redo().unwrap();
    board.redo().unwrap();
    assert_eq!(board.visible_strokes(), &[a, b]);
    assert_eq!(board.redo(), Err(HistoryError::NothingToRedo));
}

#[test]
fn rejected_brush_size_does_not_touch_config() {
    let mut board = Board::default();
    board.set_brush_size(6.0).unwrap();

    assert_eq!(board.set_brush_size(0.0), Err(ConfigError::InvalidBrushSize(0.0)));
    assert_eq!(board.set_brush_size(-4.0), Err(ConfigError::InvalidBrushSize(-4.0)));
    assert!(matches!(
        board.set_color_hex("#12345"),
        Err(ConfigError::MalformedColor(_))
    ));
    assert_eq!(board.config().brush_size(), 6.0);
    assert_eq!(board.config().color(), Color32::BLACK);

    board.pointer_down(pos2(1.0, 1.0));
    board.pointer_up(pos2(2.0, 2.0));
    assert_eq!(board.visible_strokes()[0].width(), 6.0);
}

#[test]
fn eraser_strokes_use_background() {
    let background = Color32::from_rgb(240, 240, 220);
    let mut board = Board::new(BoardSettings {
        background,
        ..BoardSettings::default()
    });
    board.set_color(Color32::RED);
    board.set_tool(Tool::Eraser);

    board.pointer_down(pos2(1.0, 1.0));
    board.pointer_move(pos2(2.0, 1.0));
    board.pointer_up(pos2(3.0, 1.0));

    let stroke = &board.visible_strokes()[0];
    assert_eq!(stroke.kind(), StrokeKind::Freehand);
    assert_eq!(stroke.color(), background);
    // The pen color is untouched.
    assert_eq!(board.config().color(), Color32::RED);
}

#[test]
fn eraser_follows_background_changes() {
    let mut board = Board::default();
    board.set_tool(Tool::Eraser);
    board.pointer_down(pos2(1.0, 1.0));
    board.pointer_up(pos2(2.0, 1.0));

    let paper = Color32::from_rgb(250, 245, 230);
    board.set_background(paper);
    board.pointer_down(pos2(5.0, 5.0));
    board.pointer_up(pos2(6.0, 5.0));

    assert_eq!(board.settings().background, paper);
    let strokes = board.visible_strokes();
    assert_eq!(strokes[0].color(), Color32::WHITE);
    assert_eq!(strokes[1].color(), paper);
}

#[test]
fn config_changes_mid_stroke_apply_to_next_stroke() {
    let mut board = Board::default();
    board.pointer_down(pos2(0.0, 0.0));
    board.set_color(Color32::GREEN);
    board.set_brush_size(12.0).unwrap();
    board.pointer_up(pos2(1.0, 0.0));

    board.pointer_down(pos2(5.0, 5.0));
    board.pointer_up(pos2(6.0, 5.0));

    let strokes = board.visible_strokes();
    assert_eq!(strokes[0].color(), Color32::BLACK);
    assert_eq!(strokes[0].width(), 2.0);
    assert_eq!(strokes[1].color(), Color32::GREEN);
    assert_eq!(strokes[1].width(), 12.0);
}

#[test]
fn leaving_canvas_commits_partial_stroke_by_default() {
    let mut board = Board::default();
    let events = recorded(&board);

    board.pointer_down(pos2(0.0, 0.0));
    board.pointer_move(pos2(4.0, 4.0));
    board.pointer_leave();

    assert!(!board.is_drawing());
    assert_eq!(board.visible_strokes().len(), 1);
    assert_eq!(board.visible_strokes()[0].points().len(), 2);
    assert_eq!(
        events.borrow().last(),
        Some(&BoardEvent::SessionInterrupted { committed: true })
    );
}

#[test]
fn leaving_canvas_discards_with_discard_policy() {
    let mut board = Board::default();
    board.set_interrupt_policy(InterruptPolicy::Discard);
    let events = recorded(&board);

    board.pointer_down(pos2(0.0, 0.0));
    board.pointer_move(pos2(4.0, 4.0));
    board.pointer_leave();
    board.pointer_up(pos2(4.0, 4.0));

    assert!(board.visible_strokes().is_empty());
    assert!(!board.can_undo());
    assert_eq!(
        events.borrow().last(),
        Some(&BoardEvent::SessionInterrupted { committed: false })
    );
}

#[test]
fn tool_switch_mid_stroke_abandons_session() {
    let mut board = Board::default();
    let events = recorded(&board);

    board.pointer_down(pos2(0.0, 0.0));
    board.pointer_move(pos2(3.0, 3.0));
    board.set_tool(Tool::Arrow);
    board.pointer_up(pos2(5.0, 5.0));

    assert!(board.visible_strokes().is_empty());
    assert_eq!(board.config().tool(), Tool::Arrow);
    assert!(events.borrow().contains(&BoardEvent::SessionAbandoned));

    // Re-selecting the current tool keeps the session.
    board.pointer_down(pos2(0.0, 0.0));
    board.set_tool(Tool::Arrow);
    assert!(board.is_drawing());
}

#[test]
fn events_follow_the_stroke_lifecycle() {
    let mut board = Board::default();
    let events = recorded(&board);

    board.pointer_down(pos2(0.0, 0.0));
    board.pointer_move(pos2(1.0, 0.0));
    board.pointer_up(pos2(2.0, 0.0));
    board.pointer_down(pos2(0.0, 5.0));
    board.pointer_up(pos2(1.0, 5.0));
    board.undo().unwrap();
    board.undo().unwrap();
    board.pointer_down(pos2(9.0, 9.0));
    board.pointer_up(pos2(9.0, 9.0));
    board.clear();

    assert_eq!(
        *events.borrow(),
        vec![
            BoardEvent::SessionStarted { kind: StrokeKind::Freehand },
            BoardEvent::SessionUpdated,
            BoardEvent::StrokeCommitted { cursor: 0, truncated: 0 },
            BoardEvent::SessionStarted { kind: StrokeKind::Freehand },
            BoardEvent::StrokeCommitted { cursor: 1, truncated: 0 },
            BoardEvent::Undone { cursor: 0 },
            BoardEvent::Undone { cursor: -1 },
            BoardEvent::SessionStarted { kind: StrokeKind::Freehand },
            BoardEvent::StrokeCommitted { cursor: 0, truncated: 2 },
            BoardEvent::Cleared,
        ]
    );
}

#[test]
fn input_events_drive_the_board() {
    let mut board = Board::default();
    let at = |x: f32, y: f32, is_in_canvas: bool| InputLocation {
        position: pos2(x, y),
        is_in_canvas,
    };

    // A press outside the canvas never opens a session.
    board.handle_input(&InputEvent::PointerDown { location: at(-5.0, 0.0, false) });
    assert!(!board.is_drawing());

    board.handle_input(&InputEvent::PointerDown { location: at(1.0, 1.0, true) });
    board.handle_input(&InputEvent::PointerMove { location: at(2.0, 2.0, true) });
    board.handle_input(&InputEvent::PointerUp { location: at(3.0, 3.0, true) });
    assert_eq!(board.visible_strokes()[0].points().len(), 3);

    board.handle_input(&InputEvent::PointerDown { location: at(1.0, 1.0, true) });
    board.handle_input(&InputEvent::PointerLeave { last_known_location: at(1.0, 1.0, true) });
    assert!(!board.is_drawing());
    assert_eq!(board.visible_strokes().len(), 2);
}

#[test]
fn boards_are_independent() {
    let mut first = Board::default();
    let second = Board::default();

    first.pointer_down(pos2(0.0, 0.0));
    first.pointer_up(pos2(1.0, 1.0));

    assert_eq!(first.visible_strokes().len(), 1);
    assert!(second.visible_strokes().is_empty());
}
