//! # State
//!
//! Everything the drawing surface remembers: the paint for the next stroke, the gesture being
//! captured, and the history of finished strokes.

pub mod path_builder;
pub mod stroke_history;

use crate::{color::Color, util::PositiveF32};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PaintError {
    #[error("brush width {0} is not a positive, finite number")]
    InvalidWidth(f32),
}

/// Paint applied to a stroke. The surface holds one of these for the *next* stroke, and every
/// finished stroke carries a copy of the one it was started with.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PaintConfig {
    pub color: Color,
    pub width: PositiveF32,
}
impl PaintConfig {
    pub const DEFAULT_WIDTH: f32 = 5.0;
    #[must_use = "returns a new config without modifying `self`"]
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
    pub fn with_width(self, width: f32) -> Result<Self, PaintError> {
        let width = PositiveF32::new(width).map_err(|_| PaintError::InvalidWidth(width))?;
        Ok(Self { width, ..self })
    }
}
impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            // Unwrap OK - constant is positive.
            width: PositiveF32::new(Self::DEFAULT_WIDTH).unwrap(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{PaintConfig, PaintError};
    use crate::color::Color;
    #[test]
    fn width_validation() {
        let paint = PaintConfig::default();
        assert_eq!(paint.with_width(0.0), Err(PaintError::InvalidWidth(0.0)));
        assert_eq!(paint.with_width(-3.0), Err(PaintError::InvalidWidth(-3.0)));
        assert!(paint.with_width(f32::INFINITY).is_err());
        assert_eq!(paint.with_width(12.5).unwrap().width.get(), 12.5);
    }
    #[test]
    fn builders_keep_other_fields() {
        let paint = PaintConfig::default()
            .with_width(9.0)
            .unwrap()
            .with_color(Color::WHITE);
        assert_eq!(paint.color, Color::WHITE);
        assert_eq!(paint.width.get(), 9.0);
    }
}
