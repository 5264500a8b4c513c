//! Accumulates the samples of one gesture into a path.

use super::PaintConfig;
use crate::stroke::{Point, Stroke};
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    #[error("a gesture is already in progress")]
    AlreadyCapturing,
    #[error("no gesture is in progress")]
    NotCapturing,
    #[error("sample position is not finite")]
    NonFinitePoint,
}

#[derive(Clone, Debug)]
struct InProgress {
    /// Invariant: never empty.
    /// Shared with any scene showing this gesture as wet ink. Extending only copies while such a
    /// scene is still alive.
    points: Arc<Vec<Point>>,
    /// Paint captured at `start`. Later changes to the surface's paint don't reach here.
    paint: PaintConfig,
}

/// Builder for at most one gesture at a time.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    in_progress: Option<InProgress>,
}
impl PathBuilder {
    /// Begin a new path at `point`, to be painted with `paint`.
    /// Rejected without changes if a gesture is already in progress.
    pub fn start(&mut self, point: Point, paint: PaintConfig) -> Result<(), GestureError> {
        if self.in_progress.is_some() {
            return Err(GestureError::AlreadyCapturing);
        }
        if !point.is_finite() {
            return Err(GestureError::NonFinitePoint);
        }
        self.in_progress = Some(InProgress {
            points: Arc::new(vec![point]),
            paint,
        });
        Ok(())
    }
    /// Append a sample to the path in progress.
    pub fn extend(&mut self, point: Point) -> Result<(), GestureError> {
        let in_progress = self
            .in_progress
            .as_mut()
            .ok_or(GestureError::NotCapturing)?;
        if !point.is_finite() {
            return Err(GestureError::NonFinitePoint);
        }
        Arc::make_mut(&mut in_progress.points).push(point);
        Ok(())
    }
    /// Finish the path into a stroke, returning to idle. `None` if idle.
    pub fn finish(&mut self) -> Option<Stroke> {
        let InProgress { points, paint } = self.in_progress.take()?;
        let points = Arc::try_unwrap(points).unwrap_or_else(|shared| (*shared).clone());
        // `points` is never empty, so this is always Some.
        Stroke::new(points, paint)
    }
    /// Throw away the path in progress, if any. Returns whether there was one.
    pub fn abandon(&mut self) -> bool {
        self.in_progress.take().is_some()
    }
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.in_progress.is_some()
    }
    /// The samples so far, if capturing.
    #[must_use]
    pub fn points(&self) -> Option<&[Point]> {
        self.in_progress.as_ref().map(|p| p.points.as_slice())
    }
    /// The samples so far, without copying them.
    #[must_use]
    pub(crate) fn shared_points(&self) -> Option<Arc<Vec<Point>>> {
        self.in_progress.as_ref().map(|p| p.points.clone())
    }
    /// The paint this gesture will finish with, if capturing.
    #[must_use]
    pub fn paint(&self) -> Option<PaintConfig> {
        self.in_progress.as_ref().map(|p| p.paint)
    }
}
