//! The toolbar's view state: which panel is open, and what picking from it does to the surface.
//!
//! The toolbar never touches stroke history directly. Every pick becomes a [`ToolCommand`] which
//! the caller applies to the surface.

use crate::preferences::BrushPresets;
use sketchpad_core::{color::Color, state::PaintError, DrawingSurface};

#[derive(
    strum::AsRefStr, strum::EnumString, Clone, Copy, PartialEq, Eq, Debug, Default, Hash,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Panel {
    #[default]
    None,
    BrushSize,
    Palette,
}

#[derive(
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Hash,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BrushSize {
    Small,
    Medium,
    Large,
}
impl BrushSize {
    #[must_use]
    pub fn width(self, presets: &BrushPresets) -> f32 {
        match self {
            Self::Small => presets.small,
            Self::Medium => presets.medium,
            Self::Large => presets.large,
        }
    }
}

/// A change the toolbar asks of the surface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ToolCommand {
    SetColor(Color),
    SetBrushWidth(f32),
    Undo,
    Clear,
}
impl ToolCommand {
    pub fn apply(self, surface: &mut DrawingSurface) -> Result<(), PaintError> {
        match self {
            Self::SetColor(color) => surface.set_color(color),
            Self::SetBrushWidth(width) => surface.set_brush_width(width)?,
            Self::Undo => match surface.undo() {
                Some(command) => log::debug!("Undid {:?}", command.strokes()),
                None => log::debug!("Nothing to undo"),
            },
            Self::Clear => {
                if let Some(command) = surface.clear() {
                    log::debug!("Cleared {} stroke(s)", command.strokes().len());
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Toolbar {
    panel: Panel,
    expanded: bool,
}
impl Toolbar {
    #[must_use]
    pub fn panel(&self) -> Panel {
        self.panel
    }
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
    /// Open a panel, closing any other. Opening a panel expands the toolbar.
    pub fn open(&mut self, panel: Panel) {
        self.panel = panel;
        if panel != Panel::None {
            self.expanded = true;
        }
    }
    pub fn expand(&mut self) {
        self.expanded = true;
    }
    /// Fold the toolbar away, closing any open panel.
    pub fn collapse(&mut self) {
        self.expanded = false;
        self.panel = Panel::None;
    }
    #[must_use = "the command must be applied to take effect"]
    pub fn pick_color(&mut self, color: Color) -> ToolCommand {
        self.panel = Panel::None;
        ToolCommand::SetColor(color)
    }
    #[must_use = "the command must be applied to take effect"]
    pub fn pick_brush(&mut self, size: BrushSize, presets: &BrushPresets) -> ToolCommand {
        self.panel = Panel::None;
        ToolCommand::SetBrushWidth(size.width(presets))
    }
    /// An exact width, as from a slider. Leaves the panel open.
    #[must_use = "the command must be applied to take effect"]
    pub fn set_width(&mut self, width: f32) -> ToolCommand {
        ToolCommand::SetBrushWidth(width)
    }
    #[must_use = "the command must be applied to take effect"]
    pub fn undo(&mut self) -> ToolCommand {
        ToolCommand::Undo
    }
    #[must_use = "the command must be applied to take effect"]
    pub fn clear(&mut self) -> ToolCommand {
        self.collapse();
        ToolCommand::Clear
    }
}
