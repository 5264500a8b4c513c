//! # Rasterizer
//!
//! Software rendering of a [`Scene`] into an RGBA8 [`PixelBuffer`], for export.
//!
//! The rasterizer replays the very same [`DisplayList`](crate::surface::DisplayList) a display
//! backend draws, so a capture at the surface's own size matches what is on screen. Output depends
//! only on the scene and the target size.
//!
//! Pixel `(x, y)` covers the square `[x, x + 1) × [y, y + 1)` and is sampled at its center.
//! Strokes are hard-edged: a pixel is painted when its center lies within `width / 2` of the
//! polyline. Each stroke covers a pixel at most once, so translucent strokes don't darken at joints.

pub mod blend;

use crate::{
    color::Color,
    stroke::{bounds_of, Point},
    surface::{DrawCommand, DrawingSurface, Scene, StrokeDraw},
};
use std::num::NonZeroU32;

/// Smallest radius any stroke is painted with. The nearest pixel center is never further than
/// `sqrt(0.5)` away, so even hairline dots remain visible.
pub const MIN_RADIUS: f32 = 0.75;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    #[error("cannot rasterize a {width}x{height} area")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("a {width}x{height} image is too large to allocate")]
    TooLarge { width: u32, height: u32 },
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    DataLength { expected: usize, actual: usize },
}

/// Straight-alpha RGBA8 pixels, row-major, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: NonZeroU32,
    height: NonZeroU32,
    /// Invariant: `data.len() == width * height * 4`
    data: Vec<u8>,
}
impl PixelBuffer {
    fn byte_len(width: u32, height: u32) -> Result<(NonZeroU32, NonZeroU32, usize), CaptureError> {
        let (Some(nz_width), Some(nz_height)) = (NonZeroU32::new(width), NonZeroU32::new(height))
        else {
            return Err(CaptureError::InvalidDimensions { width, height });
        };
        let len = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h)?.checked_mul(4))
            .ok_or(CaptureError::TooLarge { width, height })?;
        Ok((nz_width, nz_height, len))
    }
    /// Allocate a buffer with every pixel set to `fill`. Fails rather than aborting if the
    /// allocation can't be satisfied.
    pub fn new_filled(width: u32, height: u32, fill: [u8; 4]) -> Result<Self, CaptureError> {
        let (nz_width, nz_height, len) = Self::byte_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| CaptureError::TooLarge { width, height })?;
        data.extend(fill.into_iter().cycle().take(len));
        Ok(Self {
            width: nz_width,
            height: nz_height,
            data,
        })
    }
    /// Wrap existing RGBA8 data.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CaptureError> {
        let (width, height, expected) = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(CaptureError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width.get()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height.get()
    }
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }
    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }
    /// The pixel at `(x, y)`, `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = y as usize * self.width() as usize + x as usize;
        self.pixels().get(idx).copied()
    }
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Capture what `surface` currently displays into a `width` × `height` buffer.
///
/// The scene is frozen first, so only the state at the moment of the call is captured.
pub fn capture(
    surface: &DrawingSurface,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, CaptureError> {
    rasterize(&surface.scene(), width, height)
}

/// Render a frozen scene into a `width` × `height` buffer, scaling from the scene's own size.
pub fn rasterize(scene: &Scene, width: u32, height: u32) -> Result<PixelBuffer, CaptureError> {
    let [scene_width, scene_height] = scene.size();
    if scene_width == 0 || scene_height == 0 {
        return Err(CaptureError::InvalidDimensions {
            width: scene_width,
            height: scene_height,
        });
    }
    let start = std::time::Instant::now();
    let mut target = PixelBuffer::new_filled(width, height, [0; 4])?;
    let mut painter = Painter {
        scale: [
            width as f32 / scene_width as f32,
            height as f32 / scene_height as f32,
        ],
        target: &mut target,
        coverage: Vec::new(),
    };
    let list = scene.display_list();
    for command in list.iter() {
        painter.draw(command)?;
    }
    log::debug!(
        "Rasterized {} commands into {width}x{height} in {:?}",
        list.len(),
        start.elapsed()
    );
    Ok(target)
}

struct Painter<'t> {
    /// Target pixels per scene unit, `[x, y]`.
    scale: [f32; 2],
    target: &'t mut PixelBuffer,
    /// Scratch coverage mask, reused between strokes.
    coverage: Vec<bool>,
}
impl Painter<'_> {
    fn draw(&mut self, command: &DrawCommand<'_>) -> Result<(), CaptureError> {
        match command {
            DrawCommand::Fill(color) => self.fill(*color),
            DrawCommand::Image(image) => self.image(image),
            DrawCommand::Stroke(stroke) => self.stroke(stroke)?,
        }
        Ok(())
    }
    fn fill(&mut self, color: Color) {
        let color = color.as_array();
        for pixel in self.target.pixels_mut() {
            *pixel = blend::source_over(*pixel, color);
        }
    }
    /// Nearest-neighbor stretch of `image` over the whole target.
    fn image(&mut self, image: &PixelBuffer) {
        let (width, height) = (self.target.width(), self.target.height());
        let sample = |pos: u32, target_len: u32, image_len: u32| -> u32 {
            // Sample at the pixel center. u64 so large images can't overflow.
            let pos = (u64::from(pos) * 2 + 1) * u64::from(image_len) / (u64::from(target_len) * 2);
            // Result is < image_len, so fits.
            pos.min(u64::from(image_len - 1)) as u32
        };
        let source = image.pixels();
        let pixels = self.target.pixels_mut();
        for y in 0..height {
            let image_y = sample(y, height, image.height());
            for x in 0..width {
                let image_x = sample(x, width, image.width());
                let src = source[image_y as usize * image.width() as usize + image_x as usize];
                let dst = &mut pixels[y as usize * width as usize + x as usize];
                *dst = blend::source_over(*dst, Color::from_rgba8(src).as_array());
            }
        }
    }
    fn stroke(&mut self, stroke: &StrokeDraw<'_>) -> Result<(), CaptureError> {
        let [scale_x, scale_y] = self.scale;
        let radius = (stroke.width * 0.5 * (scale_x + scale_y) * 0.5).max(MIN_RADIUS);
        let radius_sq = radius * radius;
        let points: smallvec::SmallVec<[Point; 16]> = stroke
            .points
            .iter()
            .map(|p| Point::new(p.x * scale_x, p.y * scale_y))
            .collect();
        if points.is_empty() {
            return Ok(());
        }
        let Some(area) = self.clip(&points, radius) else {
            // Entirely offscreen.
            return Ok(());
        };
        let area_width = (area.x1 - area.x0) as usize;
        let area_len = area_width * (area.y1 - area.y0) as usize;
        self.coverage.clear();
        self.coverage
            .try_reserve(area_len)
            .map_err(|_| CaptureError::TooLarge {
                width: self.target.width(),
                height: self.target.height(),
            })?;
        self.coverage.resize(area_len, false);

        // A lone point is a zero-length segment, which paints a disc.
        let segments = points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain((points.len() == 1).then(|| (points[0], points[0])));
        for (a, b) in segments {
            let Some(seg) = self.clip(&[a, b], radius) else {
                continue;
            };
            for y in seg.y0..seg.y1 {
                for x in seg.x0..seg.x1 {
                    let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                    if center.distance_squared_to_segment(a, b) <= radius_sq {
                        let idx = (y - area.y0) as usize * area_width + (x - area.x0) as usize;
                        self.coverage[idx] = true;
                    }
                }
            }
        }

        let color = stroke.color.as_array();
        let target_width = self.target.width() as usize;
        let pixels = self.target.pixels_mut();
        for (idx, &hit) in self.coverage.iter().enumerate() {
            if !hit {
                continue;
            }
            let x = area.x0 as usize + idx % area_width;
            let y = area.y0 as usize + idx / area_width;
            let pixel = &mut pixels[y * target_width + x];
            *pixel = blend::source_over(*pixel, color);
        }
        Ok(())
    }
    /// Pixel rectangle touched by a polyline of `radius`, clipped to the target.
    /// `None` if nothing is visible.
    fn clip(&self, points: &[Point], radius: f32) -> Option<PixelRect> {
        let bounds = bounds_of(points, radius * 2.0);
        let (width, height) = (self.target.width() as f32, self.target.height() as f32);
        // Clamp as float first, so huge coordinates can't wrap.
        let rect = PixelRect {
            x0: bounds.min.x.floor().clamp(0.0, width) as u32,
            y0: bounds.min.y.floor().clamp(0.0, height) as u32,
            x1: bounds.max.x.ceil().clamp(0.0, width) as u32,
            y1: bounds.max.y.ceil().clamp(0.0, height) as u32,
        };
        (rect.x0 < rect.x1 && rect.y0 < rect.y1).then_some(rect)
    }
}

/// Half-open pixel rectangle.
#[derive(Clone, Copy, Debug)]
struct PixelRect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

#[cfg(test)]
mod test {
    use super::{capture, CaptureError, PixelBuffer};
    use crate::{
        color::{Color, NamedColor},
        surface::{Background, DrawingSurface, InputConsumer},
        stroke::Point,
    };
    use std::sync::Arc;

    const WHITE: [u8; 4] = [255; 4];

    fn line(surface: &mut DrawingSurface, points: &[(f32, f32)]) {
        let mut points = points.iter().map(|&(x, y)| Point::new(x, y));
        surface.on_gesture_start(points.next().unwrap()).unwrap();
        for point in points {
            surface.on_gesture_move(point).unwrap();
        }
        surface.on_gesture_end().unwrap();
    }
    fn rgba(color: NamedColor) -> [u8; 4] {
        color.rgba8()
    }

    #[test]
    fn unallocatable_size_is_an_error() {
        // 4TiB of pixels. Fits in a 64-bit usize, but can't be allocated.
        let surface = DrawingSurface::new(1 << 20, 1 << 20);
        assert_eq!(
            capture(&surface, 1 << 20, 1 << 20),
            Err(CaptureError::TooLarge {
                width: 1 << 20,
                height: 1 << 20
            })
        );
    }
    #[test]
    fn zero_size_is_rejected() {
        let surface = DrawingSurface::new(0, 10);
        assert_eq!(
            capture(&surface, 0, 10),
            Err(CaptureError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
        let surface = DrawingSurface::new(10, 10);
        assert_eq!(
            capture(&surface, 10, 0),
            Err(CaptureError::InvalidDimensions {
                width: 10,
                height: 0
            })
        );
    }
    #[test]
    fn blank_is_white() {
        let surface = DrawingSurface::new(6, 4);
        let buffer = capture(&surface, 6, 4).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (6, 4));
        assert!(buffer.pixels().iter().all(|&p| p == WHITE));
    }
    #[test]
    fn later_strokes_on_top() {
        let mut surface = DrawingSurface::new(20, 20);
        surface.set_brush_width(4.0).unwrap();
        surface.set_color(NamedColor::Red.into());
        line(&mut surface, &[(0.0, 10.0), (20.0, 10.0)]);
        surface.set_color(NamedColor::Blue.into());
        line(&mut surface, &[(10.0, 0.0), (10.0, 20.0)]);

        let buffer = capture(&surface, 20, 20).unwrap();
        assert_eq!(buffer.pixel(10, 10), Some(rgba(NamedColor::Blue)));
        assert_eq!(buffer.pixel(2, 10), Some(rgba(NamedColor::Red)));
        assert_eq!(buffer.pixel(10, 2), Some(rgba(NamedColor::Blue)));
        assert_eq!(buffer.pixel(2, 2), Some(WHITE));
    }
    #[test]
    fn tap_paints_dot_of_width() {
        let mut surface = DrawingSurface::new(21, 21);
        surface.set_brush_width(6.0).unwrap();
        surface.on_gesture_start(Point::new(10.5, 10.5)).unwrap();
        surface.on_gesture_end().unwrap();
        assert_eq!(surface.history().iter().next().unwrap().points().len(), 1);

        let buffer = capture(&surface, 21, 21).unwrap();
        let black = Color::BLACK.to_rgba8();
        // Radius 3 around the center of pixel (10, 10).
        assert_eq!(buffer.pixel(10, 10), Some(black));
        assert_eq!(buffer.pixel(13, 10), Some(black));
        assert_eq!(buffer.pixel(10, 7), Some(black));
        assert_eq!(buffer.pixel(14, 10), Some(WHITE));
        assert_eq!(buffer.pixel(13, 13), Some(WHITE));
        let painted = buffer.pixels().iter().filter(|&&p| p == black).count();
        assert!(painted > 20 && painted < 36, "{painted} pixels painted");
    }
    #[test]
    fn hairline_tap_is_visible() {
        let mut surface = DrawingSurface::new(8, 8);
        surface.set_brush_width(0.01).unwrap();
        surface.on_gesture_start(Point::new(3.0, 3.0)).unwrap();
        surface.on_gesture_end().unwrap();
        let buffer = capture(&surface, 8, 8).unwrap();
        assert!(buffer.pixels().iter().any(|&p| p != WHITE));
    }
    #[test]
    fn deterministic() {
        let mut surface = DrawingSurface::new(32, 24);
        surface.set_color(Color::from_rgba8([10, 200, 30, 128]));
        line(&mut surface, &[(1.0, 1.0), (30.0, 20.0), (5.0, 22.0)]);
        surface.on_gesture_start(Point::new(16.0, 4.0)).unwrap();
        surface.on_gesture_move(Point::new(20.0, 8.0)).unwrap();
        let first = capture(&surface, 32, 24).unwrap();
        let second = capture(&surface, 32, 24).unwrap();
        assert!(first == second);
    }
    #[test]
    fn matches_display_list_replay() {
        // Capturing the frozen scene later still gives the picture from freeze time.
        let mut surface = DrawingSurface::new(16, 16);
        line(&mut surface, &[(0.0, 0.0), (16.0, 16.0)]);
        let scene = surface.scene();
        let before = super::rasterize(&scene, 16, 16).unwrap();
        surface.clear();
        line(&mut surface, &[(16.0, 0.0), (0.0, 16.0)]);
        assert!(super::rasterize(&scene, 16, 16).unwrap() == before);
        assert!(capture(&surface, 16, 16).unwrap() != before);
    }
    #[test]
    fn wet_ink_is_captured() {
        let mut surface = DrawingSurface::new(10, 10);
        surface.set_color(NamedColor::Green.into());
        surface.on_gesture_start(Point::new(5.0, 5.0)).unwrap();
        let buffer = capture(&surface, 10, 10).unwrap();
        assert_eq!(buffer.pixel(5, 5), Some(rgba(NamedColor::Green)));
    }
    #[test]
    fn translucent_stroke_covers_once() {
        let mut surface = DrawingSurface::new(20, 20);
        surface.set_brush_width(6.0).unwrap();
        surface.set_color(Color::from_rgba8([0, 0, 0, 128]));
        // Sharp turn, segments overlap around (10, 10).
        line(&mut surface, &[(2.0, 10.0), (10.0, 10.0), (2.0, 11.0)]);
        let buffer = capture(&surface, 20, 20).unwrap();
        let joint = buffer.pixel(9, 10).unwrap();
        let single = buffer.pixel(10, 10).unwrap();
        assert_eq!(joint, single);
        assert_eq!(joint, [127, 127, 127, 255]);
    }
    #[test]
    fn undo_scenario_shows_background() {
        let mut surface = DrawingSurface::new(12, 12);
        surface.set_color(Color::BLACK);
        surface.set_brush_width(5.0).unwrap();
        line(&mut surface, &[(0.0, 0.0), (10.0, 0.0)]);
        surface.undo();
        assert!(surface.history().is_empty());
        let buffer = capture(&surface, 12, 12).unwrap();
        assert!(buffer.pixels().iter().all(|&p| p == WHITE));
    }
    #[test]
    fn solid_background() {
        let mut surface = DrawingSurface::new(4, 4);
        surface.set_background(Background::Solid(NamedColor::Yellow.into()));
        let buffer = capture(&surface, 4, 4).unwrap();
        assert!(buffer
            .pixels()
            .iter()
            .all(|&p| p == rgba(NamedColor::Yellow)));
    }
    #[test]
    fn image_background_below_strokes() {
        // 2x1 image: left red, right transparent.
        let image = PixelBuffer::from_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        let mut surface = DrawingSurface::new(8, 8);
        surface.set_background(Background::Image(Arc::new(image)));
        surface.set_color(NamedColor::Blue.into());
        surface.set_brush_width(2.0).unwrap();
        line(&mut surface, &[(1.0, 1.0), (1.0, 2.0)]);

        let buffer = capture(&surface, 8, 8).unwrap();
        assert_eq!(buffer.pixel(1, 1), Some(rgba(NamedColor::Blue)));
        assert_eq!(buffer.pixel(2, 6), Some(rgba(NamedColor::Red)));
        // Transparent image pixels show the white base.
        assert_eq!(buffer.pixel(6, 6), Some(WHITE));
    }
    #[test]
    fn scaled_capture() {
        let mut surface = DrawingSurface::new(10, 10);
        surface.set_brush_width(2.0).unwrap();
        line(&mut surface, &[(0.0, 5.0), (10.0, 5.0)]);
        let buffer = capture(&surface, 20, 20).unwrap();
        let black = Color::BLACK.to_rgba8();
        // Line at y=10 of the doubled target, 4 px thick.
        assert_eq!(buffer.pixel(15, 10), Some(black));
        assert_eq!(buffer.pixel(15, 8), Some(black));
        assert_eq!(buffer.pixel(15, 12), Some(WHITE));
        assert_eq!(buffer.pixel(15, 2), Some(WHITE));
    }
    #[test]
    fn offscreen_strokes_are_skipped() {
        let mut surface = DrawingSurface::new(8, 8);
        line(&mut surface, &[(-100.0, -100.0), (-50.0, -60.0)]);
        line(&mut surface, &[(1.0e30, 4.0), (2.0e30, 4.0)]);
        let buffer = capture(&surface, 8, 8).unwrap();
        assert!(buffer.pixels().iter().all(|&p| p == WHITE));
    }
    #[test]
    fn buffer_validation() {
        assert_eq!(
            PixelBuffer::from_rgba8(2, 2, vec![0; 15]),
            Err(CaptureError::DataLength {
                expected: 16,
                actual: 15
            })
        );
        assert!(matches!(
            PixelBuffer::new_filled(u32::MAX, u32::MAX, [0; 4]),
            Err(CaptureError::TooLarge { .. })
        ));
        let buffer = PixelBuffer::new_filled(3, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buffer.pixel(3, 1), None);
        assert_eq!(buffer.into_raw().len(), 24);
    }
}
