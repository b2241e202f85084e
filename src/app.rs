use egui::{Color32, Key, KeyboardShortcut, Modifiers, Painter, Rect, Response};

use crate::board::Board;
use crate::error::ExportError;
use crate::export;
use crate::event::DirtyFlag;
use crate::input::InputHandler;
use crate::renderer::Renderer;
use crate::settings::BoardSettings;
use crate::tools::ToolConfig;

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(
    Modifiers {
        shift: true,
        ..Modifiers::COMMAND
    },
    Key::Z,
);
const REDO_ALT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// Shell state persisted next to the history.
///
/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct ShellState {
    settings: BoardSettings,
    tools: ToolConfig,
}

pub struct WhiteboardApp {
    board: Board,
    renderer: Renderer,
    input: InputHandler,
    dirty: DirtyFlag,
    canvas_rect: Rect,
    status: Option<String>,
}

impl Default for WhiteboardApp {
    fn default() -> Self {
        Self::from_parts(ShellState::default(), None)
    }
}

impl WhiteboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let Some(storage) = cc.storage else {
            return Self::default();
        };

        let shell: ShellState = eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        let history = storage.get_string(&shell.settings.storage_key);
        Self::from_parts(shell, history.as_deref())
    }

    fn from_parts(shell: ShellState, history: Option<&str>) -> Self {
        let mut board = Board::new(shell.settings);
        board.set_tool(shell.tools.tool());
        board.set_color(shell.tools.color());
        if board.set_brush_size(shell.tools.brush_size()).is_err() {
            log::warn!("Ignoring persisted brush size");
        }
        board.load_or_default(history.map(str::as_bytes));

        let dirty = DirtyFlag::new();
        board.subscribe(Box::new(dirty.clone()));

        Self {
            board,
            renderer: Renderer::new(),
            input: InputHandler::new(Rect::NOTHING),
            dirty,
            canvas_rect: Rect::NOTHING,
            status: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Feeds this frame's pointer input for the canvas into the board.
    /// `canvas` is the painter's response; presses on layers above it are ignored.
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas: &Response) {
        self.canvas_rect = canvas.rect;
        self.input.set_canvas_rect(canvas.rect);
        for event in self.input.process_input(ctx, canvas.contains_pointer()) {
            self.board.handle_input(&event);
        }
    }

    pub fn render(&mut self, painter: &Painter, rect: Rect) {
        self.renderer.render(painter, rect, &self.board);
    }

    pub fn undo(&mut self) {
        if self.board.undo().is_ok() {
            self.status = None;
        }
    }

    pub fn redo(&mut self) {
        if self.board.redo().is_ok() {
            self.status = None;
        }
    }

    pub fn clear(&mut self) {
        self.board.clear();
        self.status = Some("Canvas cleared".to_owned());
    }

    /// Canvas size in whole pixels, or the configured size before the first layout
    fn export_size(&self) -> [u32; 2] {
        let size = [
            self.canvas_rect.width().max(0.0).round() as u32,
            self.canvas_rect.height().max(0.0).round() as u32,
        ];
        if size.contains(&0) {
            self.board.settings().export_size
        } else {
            size
        }
    }

    /// The visible drawing encoded as PNG
    pub fn drawing_png(&self) -> Result<Vec<u8>, ExportError> {
        export::export_png(
            self.board.visible_strokes(),
            self.export_size(),
            self.board.settings().background,
        )
    }

    /// Saves the visible drawing as `drawing.png`: a file next to the
    /// executable on native, a browser download on the web
    pub fn save_drawing(&mut self) {
        let name = export::DEFAULT_EXPORT_NAME;

        #[cfg(not(target_arch = "wasm32"))]
        let result = export::save_png(
            std::path::Path::new(name),
            self.board.visible_strokes(),
            self.export_size(),
            self.board.settings().background,
        );

        #[cfg(target_arch = "wasm32")]
        let result = self
            .drawing_png()
            .and_then(|bytes| export::download_png(name, &bytes));

        self.status = Some(match result {
            Ok(()) => format!("Saved {name}"),
            Err(err) => {
                log::error!("Failed to save drawing: {err}");
                format!("Save failed: {err}")
            }
        });
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.status = match self.board.set_brush_size(size) {
            Ok(()) => None,
            Err(err) => Some(err.to_string()),
        };
    }

    pub fn set_background(&mut self, background: Color32) {
        self.board.set_background(background);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Redo first: the undo shortcut also matches with Shift held.
        let (redo, undo) = ctx.input_mut(|i| {
            let redo = i.consume_shortcut(&REDO) || i.consume_shortcut(&REDO_ALT);
            let undo = i.consume_shortcut(&UNDO);
            (redo, undo)
        });
        if redo {
            self.redo();
        } else if undo {
            self.undo();
        }
    }

    fn persist(&self, storage: &mut dyn eframe::Storage) {
        match self.board.save() {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(json) => storage.set_string(&self.board.settings().storage_key, json),
                Err(err) => log::error!("Serialized history is not UTF-8: {err}"),
            },
            Err(err) => {
                log::error!("Failed to serialize history: {err}");
                return;
            }
        }

        let shell = ShellState {
            settings: self.board.settings().clone(),
            tools: self.board.config().clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &shell);
        storage.flush();
    }
}

impl eframe::App for WhiteboardApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.persist(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        crate::panels::tools_panel(self, ctx);
        crate::panels::central_panel(self, ctx);

        // Every history change is written out in full right away.
        if self.dirty.take() {
            if let Some(storage) = frame.storage_mut() {
                self.persist(storage);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn restores_history_and_tools() {
        let mut board = Board::default();
        board.pointer_down(pos2(1.0, 1.0));
        board.pointer_up(pos2(2.0, 2.0));
        let json = String::from_utf8(board.save().unwrap()).unwrap();

        let mut tools = ToolConfig::default();
        tools.set_brush_size(9.0).unwrap();
        let shell = ShellState {
            settings: BoardSettings::default(),
            tools,
        };

        let app = WhiteboardApp::from_parts(shell, Some(&json));
        assert_eq!(app.board().visible_strokes().len(), 1);
        assert_eq!(app.board().config().brush_size(), 9.0);
    }

    #[test]
    fn history_changes_mark_app_dirty() {
        let mut app = WhiteboardApp::default();
        assert!(!app.dirty.is_dirty());

        app.board_mut().pointer_down(pos2(1.0, 1.0));
        assert!(!app.dirty.is_dirty());
        app.board_mut().pointer_up(pos2(1.0, 1.0));
        assert!(app.dirty.take());

        app.clear();
        assert!(app.dirty.take());
        assert_eq!(app.status(), Some("Canvas cleared"));
    }

    #[test]
    fn drawing_png_matches_canvas_size() {
        let mut app = WhiteboardApp::default();
        app.board_mut().pointer_down(pos2(2.0, 2.0));
        app.board_mut().pointer_up(pos2(20.0, 10.0));

        let decoded = image::load_from_memory(&app.drawing_png().unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1280, 720));

        app.canvas_rect = Rect::from_min_size(pos2(0.0, 40.0), egui::vec2(64.0, 48.0));
        let decoded = image::load_from_memory(&app.drawing_png().unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn rejected_brush_size_shows_status() {
        let mut app = WhiteboardApp::default();
        app.set_brush_size(0.0);
        assert!(app.status().is_some());
        assert_eq!(app.board().config().brush_size(), 2.0);

        app.set_brush_size(8.0);
        assert_eq!(app.status(), None);
        assert_eq!(app.board().config().brush_size(), 8.0);
    }

    #[test]
    fn background_change_is_persisted_with_shell_state() {
        let mut app = WhiteboardApp::default();
        app.set_background(Color32::from_rgb(10, 20, 30));

        let mut storage = MemoryStorage::default();
        app.persist(&mut storage);
        let shell: ShellState = eframe::get_value(&storage, eframe::APP_KEY).unwrap();
        assert_eq!(shell.settings.background, Color32::from_rgb(10, 20, 30));
    }

    #[derive(Default)]
    struct MemoryStorage(std::collections::HashMap<String, String>);

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_owned(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn corrupt_history_starts_empty() {
        let app = WhiteboardApp::from_parts(ShellState::default(), Some("{\"cursor\": 3"));
        assert!(app.board().visible_strokes().is_empty());
        assert!(!app.board().can_undo());
    }
}
