use egui::Color32;
use serde::{Deserialize, Serialize};

/// Storage key the shell persists history under
pub const DEFAULT_STORAGE_KEY: &str = "whiteboard_history";

/// What happens to an in-progress stroke when the pointer leaves the canvas
/// before it is released
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptPolicy {
    /// Commit whatever was drawn so far
    #[default]
    Commit,
    /// Drop the partial stroke
    Discard,
}

/// Board-wide settings, persisted by the shell next to the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct BoardSettings {
    /// Canvas fill; also the color the eraser paints with
    pub background: Color32,
    pub interrupt_policy: InterruptPolicy,
    /// Image size used when exporting without a live canvas
    pub export_size: [u32; 2],
    pub storage_key: String,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            interrupt_policy: InterruptPolicy::Commit,
            export_size: [1280, 720],
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}
