//! # Strokes
//!
//! A stroke is one finished freehand path along with the paint it was drawn with.

use crate::state::PaintConfig;

pub type StrokeID = crate::SketchID<Stroke>;

/// A sample position in surface-local space.
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
    #[must_use]
    pub fn distance_squared(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
    /// Squared distance from `self` to the closest point of segment `a`..`b`.
    #[must_use]
    pub fn distance_squared_to_segment(&self, a: Point, b: Point) -> f32 {
        let seg = [b.x - a.x, b.y - a.y];
        let len_sq = seg[0] * seg[0] + seg[1] * seg[1];
        if len_sq <= f32::EPSILON {
            return self.distance_squared(a);
        }
        let t = ((self.x - a.x) * seg[0] + (self.y - a.y) * seg[1]) / len_sq;
        let t = t.clamp(0.0, 1.0);
        self.distance_squared(Point::new(a.x + seg[0] * t, a.y + seg[1] * t))
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds, inclusive of the stroke's width.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

/// A finished, immutable stroke.
///
/// Strokes are only ever handed out behind shared references (usually an `Arc`), and have no
/// mutating methods. Once built by [`crate::state::path_builder::PathBuilder::finish`] it never changes.
#[derive(Clone, Debug)]
pub struct Stroke {
    id: StrokeID,
    /// Invariant: never empty.
    points: Box<[Point]>,
    paint: PaintConfig,
}
impl Stroke {
    /// Build a stroke from points. `None` if `points` is empty.
    #[must_use]
    pub fn new(points: impl Into<Box<[Point]>>, paint: PaintConfig) -> Option<Self> {
        let points = points.into();
        if points.is_empty() {
            return None;
        }
        Some(Self {
            id: StrokeID::default(),
            points,
            paint,
        })
    }
    #[must_use]
    pub fn id(&self) -> StrokeID {
        self.id
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[must_use]
    pub fn paint(&self) -> PaintConfig {
        self.paint
    }
    #[must_use]
    pub fn color(&self) -> crate::Color {
        self.paint.color
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.paint.width.get()
    }
    /// A stroke of one sample, drawn as a dot.
    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}

/// Bounds of a polyline of the given width. `points` must be non-empty for a meaningful result.
#[must_use]
pub fn bounds_of(points: &[Point], width: f32) -> Bounds {
    let radius = width / 2.0;
    let (min, max) = points.iter().fold(
        (
            Point::new(f32::INFINITY, f32::INFINITY),
            Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    );
    Bounds {
        min: Point::new(min.x - radius, min.y - radius),
        max: Point::new(max.x + radius, max.y + radius),
    }
}
