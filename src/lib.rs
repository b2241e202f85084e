#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod board;
pub mod error;
pub mod event;
pub mod export;
pub mod history;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod stroke;
pub mod tools;
pub mod util;

pub use app::WhiteboardApp;
pub use board::Board;
pub use error::{ConfigError, ExportError, HistoryError, PersistenceError};
pub use event::{BoardEvent, EventBus, EventHandler};
pub use history::HistoryEngine;
pub use input::{InputEvent, InputLocation};
pub use renderer::Renderer;
pub use session::DrawSession;
pub use settings::{BoardSettings, InterruptPolicy};
pub use stroke::{Stroke, StrokeKind, StrokeRef};
pub use tools::{Tool, ToolConfig};
