//! Saving and loading history.
//!
//! The codec is JSON: an ordered list of stroke records with flat
//! `[x0, y0, x1, y1, ...]` point arrays, plus the cursor (`-1` = nothing
//! visible). Every record is validated before any engine is built, so a bad
//! record rejects the whole load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::{Pos2, pos2};

use crate::error::{PersistenceError, PersistenceResult};
use crate::history::HistoryEngine;
use crate::stroke::{Stroke, StrokeKind};
use crate::tools::{color_to_hex, parse_hex_color};
use crate::util::time;

/// Format version written into every snapshot
pub const FORMAT_VERSION: u32 = 1;

/// One persisted stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub kind: StrokeKind,
    pub points: Vec<f32>,
    pub color: String,
    pub stroke_width: f32,
}

/// The persisted form of a [`HistoryEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub version: u32,
    /// Seconds since the UNIX epoch
    #[serde(default)]
    pub saved_at: u64,
    pub cursor: i64,
    pub strokes: Vec<StrokeRecord>,
}

impl StrokeRecord {
    fn from_stroke(stroke: &Stroke) -> Self {
        Self {
            kind: stroke.kind(),
            points: stroke.points().iter().flat_map(|p| [p.x, p.y]).collect(),
            color: color_to_hex(stroke.color()),
            stroke_width: stroke.width(),
        }
    }

    /// Checks the record against the stroke schema and builds the stroke
    fn into_stroke(self, index: usize) -> PersistenceResult<Stroke> {
        let malformed = |reason: String| PersistenceError::Malformed(format!("stroke {index}: {reason}"));

        if self.points.is_empty() {
            return Err(malformed("empty point list".to_owned()));
        }
        if self.points.len() % 2 != 0 {
            return Err(malformed(format!("odd point list length {}", self.points.len())));
        }
        if self.points.iter().any(|v| !v.is_finite()) {
            return Err(malformed("non-finite coordinate".to_owned()));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(malformed(format!("invalid stroke width {}", self.stroke_width)));
        }
        let color = parse_hex_color(&self.color).map_err(|err| malformed(err.to_string()))?;

        let points: Vec<Pos2> = self.points.chunks_exact(2).map(|c| pos2(c[0], c[1])).collect();
        match self.kind {
            StrokeKind::Freehand => Ok(Stroke::freehand(points, color, self.stroke_width)),
            StrokeKind::Arrow => match points[..] {
                [start, end] => Ok(Stroke::arrow(start, end, color, self.stroke_width)),
                _ => Err(malformed(format!("arrow needs 2 points, got {}", points.len()))),
            },
        }
    }
}

impl HistorySnapshot {
    pub fn from_history(history: &HistoryEngine) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: time::timestamp_secs(),
            cursor: history.cursor_index(),
            strokes: history
                .entries()
                .iter()
                .map(|stroke| StrokeRecord::from_stroke(stroke))
                .collect(),
        }
    }

    /// Validates the whole snapshot, then builds the engine
    pub fn into_history(self) -> PersistenceResult<HistoryEngine> {
        if self.version != FORMAT_VERSION {
            return Err(PersistenceError::Malformed(format!(
                "unsupported format version {}",
                self.version
            )));
        }

        let len = self.strokes.len();
        let cursor = match self.cursor {
            -1 => None,
            index if index >= 0 && (index as u64) < len as u64 => Some(index as usize),
            index => {
                return Err(PersistenceError::Malformed(format!(
                    "cursor {index} out of range for {len} strokes"
                )));
            }
        };

        let entries = self
            .strokes
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_stroke(index).map(Arc::new))
            .collect::<PersistenceResult<Vec<_>>>()?;

        HistoryEngine::from_parts(entries, cursor)
            .ok_or_else(|| PersistenceError::Malformed("cursor out of range".to_owned()))
    }
}

/// Serializes the full history, redo tail included
pub fn save(history: &HistoryEngine) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec(&HistorySnapshot::from_history(history)).map_err(PersistenceError::Encode)
}

/// Deserializes a history; any schema violation rejects the whole load
pub fn load(bytes: &[u8]) -> PersistenceResult<HistoryEngine> {
    let snapshot: HistorySnapshot = serde_json::from_slice(bytes)?;
    snapshot.into_history()
}

/// Absent data is an empty history; malformed data is logged and replaced by
/// an empty history rather than partially restored.
pub fn load_or_default(bytes: Option<&[u8]>) -> HistoryEngine {
    let Some(bytes) = bytes else {
        return HistoryEngine::new();
    };
    match load(bytes) {
        Ok(history) => {
            log::debug!("Loaded {} strokes from storage", history.entries().len());
            history
        }
        Err(err) => {
            log::warn!("Discarding persisted history: {err}");
            HistoryEngine::new()
        }
    }
}

/// Durable storage for one serialized history
pub trait SnapshotStore {
    /// Returns `None` when nothing has been stored yet
    fn read(&self) -> PersistenceResult<Option<Vec<u8>>>;

    /// Replaces the stored bytes as a whole
    fn write(&mut self, bytes: &[u8]) -> PersistenceResult<()>;
}

/// Stores history in a file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers see either the old or the new contents.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileStore {
    fn read(&self) -> PersistenceResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, bytes)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Keeps history in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> PersistenceResult<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> PersistenceResult<()> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }
}

/// Writes the history through a store
pub fn save_to(store: &mut dyn SnapshotStore, history: &HistoryEngine) -> PersistenceResult<()> {
    let bytes = save(history)?;
    store.write(&bytes)
}

/// Reads the history from a store, falling back to empty on absent or bad data.
/// Only I/O failures are reported.
pub fn load_from(store: &dyn SnapshotStore) -> PersistenceResult<HistoryEngine> {
    let bytes = store.read()?;
    Ok(load_or_default(bytes.as_deref()))
}
