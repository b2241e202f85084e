use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The drawing tools offered by the board
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pen,
    /// A pen that paints with the canvas background color
    Eraser,
    Arrow,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Pen, Tool::Eraser, Tool::Arrow];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Eraser => "Eraser",
            Tool::Arrow => "Arrow",
        }
    }
}

/// Current tool selection, color and brush size.
///
/// Setters validate before assigning, so a rejected value never replaces the
/// previous one. Sessions read a snapshot of this at pointer-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    tool: Tool,
    color: Color32,
    brush_size: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Color32::BLACK,
            brush_size: 2.0,
        }
    }
}

impl ToolConfig {
    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ConfigError> {
        self.color = parse_hex_color(hex)?;
        Ok(())
    }

    pub fn set_brush_size(&mut self, size: f32) -> Result<(), ConfigError> {
        validate_brush_size(size)?;
        self.brush_size = size;
        Ok(())
    }
}

pub fn validate_brush_size(size: f32) -> Result<f32, ConfigError> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(ConfigError::InvalidBrushSize(size))
    }
}

/// Parses `#rrggbb`, `rrggbb` or `#rgb` into an opaque color
pub fn parse_hex_color(input: &str) -> Result<Color32, ConfigError> {
    let malformed = || ConfigError::MalformedColor(input.to_owned());
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return Err(malformed());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| malformed());
    match hex.len() {
        6 => Ok(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |s: &str| channel(s).map(|v| v * 17);
            Ok(Color32::from_rgb(
                short(&hex[0..1])?,
                short(&hex[1..2])?,
                short(&hex[2..3])?,
            ))
        }
        _ => Err(malformed()),
    }
}

/// Formats a color as lowercase `#rrggbb`, dropping alpha
pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
