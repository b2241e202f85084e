//! The drawing board: input-handling layer around a [`HistoryEngine`].
//!
//! ```text
//!            pointer_down                 pointer_up / pointer_leave
//!   ┌──────┐ ────────────► ┌─────────┐ ──────────────────────────► ┌──────┐
//!   │ Idle │               │ Drawing │                              │ Idle │
//!   └──────┘ ◄──────────── └─────────┘ ◄─┐                          └──────┘
//!            set_tool (abandon)   │      │ pointer_move
//!                                 └──────┘
//! ```
//!
//! Tool, color and brush size are read once when a session starts. History
//! only changes on commit, undo, redo, clear and load.

use egui::{Color32, Pos2};

use crate::error::{ConfigError, HistoryError, PersistenceResult};
use crate::event::{BoardEvent, EventBus, EventHandler};
use crate::history::HistoryEngine;
use crate::input::InputEvent;
use crate::persistence;
use crate::session::DrawSession;
use crate::settings::{BoardSettings, InterruptPolicy};
use crate::stroke::StrokeRef;
use crate::tools::{Tool, ToolConfig};

/// One independent drawing surface
#[derive(Debug, Default)]
pub struct Board {
    history: HistoryEngine,
    config: ToolConfig,
    settings: BoardSettings,
    session: Option<DrawSession>,
    events: EventBus,
    revision: u64,
}

impl Board {
    pub fn new(settings: BoardSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Builds a board around an existing history, e.g. one loaded from storage
    pub fn with_history(settings: BoardSettings, history: HistoryEngine) -> Self {
        Self {
            history,
            settings,
            ..Self::default()
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    // --- reads ---

    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    pub fn visible_strokes(&self) -> &[StrokeRef] {
        self.history.visible_strokes()
    }

    pub fn active_session(&self) -> Option<&DrawSession> {
        self.session.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Bumped on every history mutation; render adapters compare it to skip
    /// rebuilding their draw lists.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- configuration ---

    /// Switching tools mid-stroke abandons the stroke
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.config.tool() {
            return;
        }
        if self.session.take().is_some() {
            log::warn!("Tool changed to {} mid-stroke, abandoning stroke", tool.name());
            self.events.emit(BoardEvent::SessionAbandoned);
        }
        log::debug!("Tool selected: {}", tool.name());
        self.config.set_tool(tool);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.config.set_color(color);
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ConfigError> {
        self.config.set_color_hex(hex).inspect_err(|err| {
            log::warn!("Rejected color: {err}");
        })
    }

    pub fn set_brush_size(&mut self, size: f32) -> Result<(), ConfigError> {
        self.config.set_brush_size(size).inspect_err(|err| {
            log::warn!("Rejected brush size: {err}");
        })
    }

    pub fn set_interrupt_policy(&mut self, policy: InterruptPolicy) {
        self.settings.interrupt_policy = policy;
    }

    pub fn set_background(&mut self, background: Color32) {
        self.settings.background = background;
    }

    // --- pointer input ---

    /// Dispatches a canvas-local input event
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { location } => {
                if location.is_in_canvas {
                    self.pointer_down(location.position);
                }
            }
            InputEvent::PointerMove { location } => self.pointer_move(location.position),
            InputEvent::PointerUp { location } => self.pointer_up(location.position),
            InputEvent::PointerLeave { .. } => self.pointer_leave(),
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        if self.session.take().is_some() {
            // The matching up event never arrived.
            log::warn!("Pointer down while a stroke is in progress, abandoning it");
            self.events.emit(BoardEvent::SessionAbandoned);
        }

        let session = DrawSession::begin(&self.config, self.settings.background, pos);
        log::debug!("Stroke started: {:?} at {:?}", session.kind(), pos);
        self.events.emit(BoardEvent::SessionStarted { kind: session.kind() });
        self.session = Some(session);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        if let Some(session) = &mut self.session {
            session.pointer_move(pos);
            self.events.emit(BoardEvent::SessionUpdated);
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        if let Some(mut session) = self.session.take() {
            session.pointer_up(pos);
            self.commit_session(session);
        }
    }

    /// The pointer left the canvas before being released
    pub fn pointer_leave(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let committed = match self.settings.interrupt_policy {
            InterruptPolicy::Commit => {
                log::warn!("Pointer left the canvas mid-stroke, committing partial stroke");
                self.commit_session(session);
                true
            }
            InterruptPolicy::Discard => {
                log::warn!("Pointer left the canvas mid-stroke, discarding stroke");
                false
            }
        };
        self.events.emit(BoardEvent::SessionInterrupted { committed });
    }

    fn commit_session(&mut self, session: DrawSession) {
        let truncated = self.history.entries().len() - self.history.visible_strokes().len();
        let stroke = self.history.commit(session.into_stroke());
        self.revision += 1;
        log::debug!(
            "Committed {:?} stroke with {} points, dropped {} redo entries",
            stroke.kind(),
            stroke.points().len(),
            truncated
        );
        self.events.emit(BoardEvent::StrokeCommitted {
            cursor: self.history.cursor_index(),
            truncated,
        });
    }

    // --- history ---

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.history.undo().inspect_err(|err| log::debug!("Undo ignored: {err}"))?;
        self.revision += 1;
        self.events.emit(BoardEvent::Undone {
            cursor: self.history.cursor_index(),
        });
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        self.history.redo().inspect_err(|err| log::debug!("Redo ignored: {err}"))?;
        self.revision += 1;
        self.events.emit(BoardEvent::Redone {
            cursor: self.history.cursor_index(),
        });
        Ok(())
    }

    /// Empties the history. Not undoable; an in-progress stroke survives.
    pub fn clear(&mut self) {
        log::info!("Clearing board ({} entries)", self.history.entries().len());
        self.history.clear();
        self.revision += 1;
        self.events.emit(BoardEvent::Cleared);
    }

    // --- persistence ---

    /// Serializes the committed history
    pub fn save(&self) -> PersistenceResult<Vec<u8>> {
        persistence::save(&self.history)
    }

    /// Replaces the history with persisted data. On error nothing changes.
    pub fn load(&mut self, bytes: &[u8]) -> PersistenceResult<()> {
        let history = persistence::load(bytes)?;
        self.replace_history(history);
        Ok(())
    }

    /// Loads persisted data, falling back to an empty history when there is
    /// none or when it is malformed.
    pub fn load_or_default(&mut self, bytes: Option<&[u8]>) {
        let history = persistence::load_or_default(bytes);
        self.replace_history(history);
    }

    fn replace_history(&mut self, history: HistoryEngine) {
        self.history = history;
        self.revision += 1;
        self.events.emit(BoardEvent::Loaded {
            cursor: self.history.cursor_index(),
        });
    }
}
