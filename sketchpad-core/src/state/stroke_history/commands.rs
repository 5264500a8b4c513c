use crate::stroke::StrokeID;

/// A change made to the history. Every mutating history operation that changed something
/// reports one of these, for logging and for hosts that mirror the history elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Appended(StrokeID),
    /// The most recent stroke was removed.
    Undone(StrokeID),
    /// Every stroke was removed, in paint order.
    Cleared(Box<[StrokeID]>),
}
impl Command {
    /// The strokes affected by this change.
    #[must_use]
    pub fn strokes(&self) -> &[StrokeID] {
        match self {
            Self::Appended(id) | Self::Undone(id) => std::slice::from_ref(id),
            Self::Cleared(ids) => ids,
        }
    }
}
