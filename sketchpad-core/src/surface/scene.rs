//! Frozen scenes and the display lists built from them.

use crate::{
    color::Color,
    raster::PixelBuffer,
    state::{stroke_history::HistorySnapshot, PaintConfig},
    stroke::Point,
};
use std::sync::Arc;

/// What is painted below every stroke.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Background {
    /// Plain white.
    #[default]
    None,
    Solid(Color),
    /// An image stretched over the whole surface.
    Image(Arc<PixelBuffer>),
}

/// The stroke currently being drawn.
#[derive(Clone, Debug)]
pub struct WetInk {
    pub points: Arc<Vec<Point>>,
    pub paint: PaintConfig,
}

/// Everything a surface displays, frozen at one moment.
///
/// Owns or shares all its data immutably, so it can be handed to another thread
/// while the surface keeps taking input.
#[derive(Clone, Debug)]
pub struct Scene {
    pub(super) size: [u32; 2],
    pub(super) background: Background,
    pub(super) strokes: HistorySnapshot,
    pub(super) wet_ink: Option<WetInk>,
}
impl Scene {
    /// Size of the surface this was taken from, `[width, height]`.
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }
    #[must_use]
    pub fn strokes(&self) -> &HistorySnapshot {
        &self.strokes
    }
    #[must_use]
    pub fn wet_ink(&self) -> Option<&WetInk> {
        self.wet_ink.as_ref()
    }
    /// The ordered drawing instructions for this scene: background, then finished strokes in
    /// paint order, then the wet ink on top.
    #[must_use]
    pub fn display_list(&self) -> DisplayList<'_> {
        let mut commands = smallvec::SmallVec::with_capacity(self.strokes.len() + 3);
        // Opaque base, so a translucent or missing background still composes onto white.
        commands.push(DrawCommand::Fill(Color::WHITE));
        match &self.background {
            Background::None => (),
            Background::Solid(color) => commands.push(DrawCommand::Fill(*color)),
            Background::Image(image) => commands.push(DrawCommand::Image(image)),
        }
        commands.extend(self.strokes.iter().map(|stroke| {
            DrawCommand::Stroke(StrokeDraw {
                points: stroke.points(),
                color: stroke.color(),
                width: stroke.width(),
                wet: false,
            })
        }));
        if let Some(wet) = &self.wet_ink {
            commands.push(DrawCommand::Stroke(StrokeDraw {
                points: &wet.points,
                color: wet.paint.color,
                width: wet.paint.width.get(),
                wet: true,
            }));
        }
        DisplayList(commands)
    }
}

/// One polyline to paint. A single point is painted as a dot `width` across.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeDraw<'a> {
    /// Never empty.
    pub points: &'a [Point],
    pub color: Color,
    pub width: f32,
    /// Whether this is the in-progress stroke.
    pub wet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand<'a> {
    /// Cover the whole surface with this color.
    Fill(Color),
    /// Cover the whole surface with this image, stretched.
    Image(&'a PixelBuffer),
    Stroke(StrokeDraw<'a>),
}

/// Drawing instructions, to be executed in order by a rendering backend.
#[derive(Clone, Debug)]
pub struct DisplayList<'a>(smallvec::SmallVec<[DrawCommand<'a>; 4]>);
impl<'a> DisplayList<'a> {
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DrawCommand<'a>> + '_ {
        self.0.iter()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Just the stroke instructions, in paint order.
    pub fn strokes(&self) -> impl Iterator<Item = &StrokeDraw<'a>> + '_ {
        self.0.iter().filter_map(|command| match command {
            DrawCommand::Stroke(draw) => Some(draw),
            _ => None,
        })
    }
}
impl<'a> IntoIterator for DisplayList<'a> {
    type Item = DrawCommand<'a>;
    type IntoIter = smallvec::IntoIter<[DrawCommand<'a>; 4]>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
