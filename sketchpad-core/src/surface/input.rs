//! Pointer input, decoupled from any particular windowing toolkit.

use crate::{state::path_builder::GestureError, stroke::Point};

/// A raw pointer event in surface-local coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    /// The host lost the pointer mid-gesture (focus change, palm rejection, ...).
    Cancel,
}

/// Anything that can be fed pointer gestures.
///
/// Hosts are expected to deliver one gesture at a time, well ordered: a `Down`, any number of
/// `Move`s, then an `Up` or `Cancel`. Out-of-order events are rejected as no-ops.
pub trait InputConsumer {
    fn on_gesture_start(&mut self, point: Point) -> Result<(), GestureError>;
    fn on_gesture_move(&mut self, point: Point) -> Result<(), GestureError>;
    fn on_gesture_end(&mut self) -> Result<(), GestureError>;
    /// Drop the gesture in progress without keeping anything.
    fn on_gesture_cancel(&mut self) -> Result<(), GestureError>;

    fn consume(&mut self, event: PointerEvent) -> Result<(), GestureError> {
        match event {
            PointerEvent::Down(point) => self.on_gesture_start(point),
            PointerEvent::Move(point) => self.on_gesture_move(point),
            PointerEvent::Up => self.on_gesture_end(),
            PointerEvent::Cancel => self.on_gesture_cancel(),
        }
    }
}
