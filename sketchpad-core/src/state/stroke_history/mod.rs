//! # Stroke history
//!
//! The ordered log of finished strokes. Insertion order is paint order: later strokes draw on top.
//! Strokes are shared immutably, so a snapshot taken now stays valid and unchanged no matter what
//! happens to the history afterwards.

pub mod commands;

use crate::stroke::Stroke;
use std::sync::Arc;

pub use commands::Command;

#[derive(Clone, Default, Debug)]
pub struct StrokeHistory {
    strokes: Vec<Arc<Stroke>>,
}
impl StrokeHistory {
    /// Add a stroke on top of all others.
    pub fn append(&mut self, stroke: impl Into<Arc<Stroke>>) -> Command {
        let stroke = stroke.into();
        let command = Command::Appended(stroke.id());
        self.strokes.push(stroke);
        log::trace!("{command:?}");
        command
    }
    /// Remove the most recent stroke. `None` (and no change) if empty.
    pub fn undo(&mut self) -> Option<Command> {
        let stroke = self.strokes.pop()?;
        let command = Command::Undone(stroke.id());
        log::trace!("{command:?}");
        Some(command)
    }
    /// Remove every stroke. `None` (and no change) if already empty.
    pub fn clear(&mut self) -> Option<Command> {
        if self.strokes.is_empty() {
            return None;
        }
        let command = Command::Cleared(self.strokes.drain(..).map(|s| s.id()).collect());
        log::trace!("{command:?}");
        Some(command)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Stroke> + '_ {
        self.strokes.iter().map(|stroke| &**stroke)
    }
    /// Freeze the current ordered contents.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot(self.strokes.as_slice().into())
    }
}

/// A frozen, cheaply clonable view of the history at some moment.
/// Shares the immutable strokes but not the history's storage.
#[derive(Clone, Debug)]
pub struct HistorySnapshot(Arc<[Arc<Stroke>]>);
impl Default for HistorySnapshot {
    fn default() -> Self {
        Self(Vec::new().into())
    }
}
impl HistorySnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Strokes in paint order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Stroke> + '_ {
        self.0.iter().map(|stroke| &**stroke)
    }
}

#[cfg(test)]
mod test {
    use super::{Command, StrokeHistory};
    use crate::{
        state::PaintConfig,
        stroke::{Point, Stroke},
    };

    fn dot(x: f32) -> Stroke {
        Stroke::new(vec![Point::new(x, 0.0)], PaintConfig::default()).unwrap()
    }

    #[test]
    fn append_and_undo() {
        let mut history = StrokeHistory::default();
        let a = dot(0.0);
        let b = dot(1.0);
        let (a_id, b_id) = (a.id(), b.id());
        assert_eq!(history.append(a), Command::Appended(a_id));
        assert_eq!(history.append(b), Command::Appended(b_id));
        assert_eq!(history.len(), 2);

        assert_eq!(history.undo(), Some(Command::Undone(b_id)));
        assert_eq!(history.iter().map(Stroke::id).collect::<Vec<_>>(), [a_id]);
    }
    #[test]
    fn undo_empty_is_noop() {
        let mut history = StrokeHistory::default();
        assert_eq!(history.undo(), None);
        assert_eq!(history.undo(), None);
        assert!(history.is_empty());
    }
    #[test]
    fn clear_is_idempotent() {
        let mut history = StrokeHistory::default();
        let ids = [dot(0.0), dot(1.0), dot(2.0)].map(|s| history.append(s).strokes()[0]);
        assert_eq!(history.clear(), Some(Command::Cleared(ids.into())));
        assert!(history.is_empty());
        assert_eq!(history.clear(), None);
        assert!(history.is_empty());
        // Nothing to undo after clear.
        assert_eq!(history.undo(), None);
    }
    #[test]
    fn snapshot_is_frozen() {
        let mut history = StrokeHistory::default();
        history.append(dot(0.0));
        history.append(dot(1.0));
        let snapshot = history.snapshot();

        history.undo();
        history.append(dot(5.0));
        history.append(dot(6.0));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.iter().nth(1).unwrap().points()[0], Point::new(1.0, 0.0));

        history.clear();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(history.snapshot().len(), 0);
    }
    #[test]
    fn length_counts_gestures_minus_undos() {
        let mut history = StrokeHistory::default();
        let mut expected = 0usize;
        // Some arbitrary interleaving, undos past empty included.
        for step in [true, true, false, true, false, false, false, true] {
            if step {
                history.append(dot(0.0));
                expected += 1;
            } else {
                history.undo();
                expected = expected.saturating_sub(1);
            }
            assert_eq!(history.len(), expected);
        }
    }
}
