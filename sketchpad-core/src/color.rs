use crate::util::{FiniteF32, FiniteF32Error};

/// A straight (non-premultiplied) sRGB color with alpha.
/// Every channel is finite and within `[0, 1]`.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Zeroable, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    /// Create a new color from straight channels, clamping each into `[0, 1]`.
    pub fn new_lossy(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        Ok(Self([
            FiniteF32::new_clamped(r, 0.0, 1.0)?,
            FiniteF32::new_clamped(g, 0.0, 1.0)?,
            FiniteF32::new_clamped(b, 0.0, 1.0)?,
            FiniteF32::new_clamped(a, 0.0, 1.0)?,
        ]))
    }
    pub fn from_array_lossy([r, g, b, a]: [f32; 4]) -> Result<Self, FiniteF32Error> {
        Self::new_lossy(r, g, b, a)
    }
    /// Exact conversion from 8-bit channels.
    #[must_use]
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        // Unwrap OK - every u8 / 255 is finite and within range.
        Self::new_lossy(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
        .unwrap()
    }
    /// Quantize to 8-bit channels, rounding to nearest.
    #[must_use]
    pub fn to_rgba8(&self) -> [u8; 4] {
        // Channels are in [0, 1] so the cast never saturates.
        self.as_array().map(|channel| (channel * 255.0).round() as u8)
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        [
            self.0[0].get(),
            self.0[1].get(),
            self.0[2].get(),
            self.0[3].get(),
        ]
    }
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.0[3].get()
    }
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.alpha() >= 1.0
    }
}
// Safety: FiniteF32 is NoUninit, arrays have no uninit bytes of their own.
unsafe impl bytemuck::NoUninit for Color {}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 or 8 hex digits after '#'")]
    BadLength,
    #[error("invalid hex digit")]
    BadDigit,
    #[error("unknown color name {0:?}")]
    UnknownName(String),
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;
    /// Parse `#RRGGBB`, `#RRGGBBAA`, or a [`NamedColor`] name (case insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return s
                .parse::<NamedColor>()
                .map(Color::from)
                .map_err(|_| ColorParseError::UnknownName(s.to_owned()));
        };
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(ColorParseError::BadLength);
        }
        let mut rgba = [0xFF; 4];
        for (channel, digits) in rgba.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            // Ascii checked above, so this is always valid utf8.
            let digits = std::str::from_utf8(digits).map_err(|_| ColorParseError::BadDigit)?;
            *channel = u8::from_str_radix(digits, 16).map_err(|_| ColorParseError::BadDigit)?;
        }
        Ok(Self::from_rgba8(rgba))
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 0xFF {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// The stock palette offered by the toolbar.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NamedColor {
    Black,
    White,
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Brown,
}
impl NamedColor {
    #[must_use]
    pub fn rgba8(self) -> [u8; 4] {
        match self {
            Self::Black => [0x00, 0x00, 0x00, 0xFF],
            Self::White => [0xFF, 0xFF, 0xFF, 0xFF],
            Self::Gray => [0x80, 0x80, 0x80, 0xFF],
            Self::Red => [0xFF, 0x00, 0x00, 0xFF],
            Self::Orange => [0xFF, 0xA5, 0x00, 0xFF],
            Self::Yellow => [0xFF, 0xFF, 0x00, 0xFF],
            Self::Green => [0x00, 0x80, 0x00, 0xFF],
            Self::Blue => [0x00, 0x00, 0xFF, 0xFF],
            Self::Purple => [0x80, 0x00, 0x80, 0xFF],
            Self::Pink => [0xFF, 0xC0, 0xCB, 0xFF],
            Self::Brown => [0xA5, 0x2A, 0x2A, 0xFF],
        }
    }
}
impl From<NamedColor> for Color {
    fn from(value: NamedColor) -> Self {
        Self::from_rgba8(value.rgba8())
    }
}
