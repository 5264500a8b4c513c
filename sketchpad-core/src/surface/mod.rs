//! # Drawing surface
//!
//! The state machine tying gesture capture, the current paint, and the stroke history together.
//!
//! The surface is either [`SurfaceState::Idle`] or [`SurfaceState::Capturing`] a gesture. Every
//! operation that changes what is displayed marks the surface as needing a redraw. The host picks that
//! up with [`DrawingSurface::take_redraw`] whenever its next paint cycle comes around, so several
//! changes between two frames cost one redraw.

pub mod input;
pub mod scene;

pub use input::{InputConsumer, PointerEvent};
pub use scene::{Background, DisplayList, DrawCommand, Scene, StrokeDraw, WetInk};

use crate::{
    color::Color,
    state::{
        path_builder::{GestureError, PathBuilder},
        stroke_history::{Command, StrokeHistory},
        PaintConfig, PaintError,
    },
    stroke::Point,
};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SurfaceState {
    Idle,
    Capturing,
}

#[derive(Debug)]
pub struct DrawingSurface {
    /// `[width, height]` of the visible area. May be zero before the host lays the surface out.
    size: [u32; 2],
    /// Paint for the next gesture.
    paint: PaintConfig,
    background: Background,
    builder: PathBuilder,
    history: StrokeHistory,
    needs_redraw: bool,
}
impl DrawingSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width, height],
            paint: PaintConfig::default(),
            background: Background::None,
            builder: PathBuilder::default(),
            history: StrokeHistory::default(),
            // Nothing has been shown yet.
            needs_redraw: true,
        }
    }
    #[must_use]
    pub fn with_paint(mut self, paint: PaintConfig) -> Self {
        self.paint = paint;
        self
    }
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        if self.builder.is_capturing() {
            SurfaceState::Capturing
        } else {
            SurfaceState::Idle
        }
    }
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }
    /// Paint that the next gesture will use.
    #[must_use]
    pub fn paint(&self) -> PaintConfig {
        self.paint
    }
    #[must_use]
    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }
    /// Points of the gesture being captured, if any.
    #[must_use]
    pub fn wet_points(&self) -> Option<&[Point]> {
        self.builder.points()
    }
    /// Set the color of the next stroke. A gesture already in progress keeps its color.
    pub fn set_color(&mut self, color: Color) {
        if self.paint.color != color {
            self.paint = self.paint.with_color(color);
            self.request_redraw();
        }
    }
    /// Set the width of the next stroke. A gesture already in progress keeps its width.
    pub fn set_brush_width(&mut self, width: f32) -> Result<(), PaintError> {
        let paint = self.paint.with_width(width)?;
        if paint != self.paint {
            self.paint = paint;
            self.request_redraw();
        }
        Ok(())
    }
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
        self.request_redraw();
    }
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size != [width, height] {
            log::debug!("Surface resized to {width}x{height}");
            self.size = [width, height];
            self.request_redraw();
        }
    }
    /// Remove the most recently finished stroke. A gesture in progress is unaffected.
    /// `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Option<Command> {
        let command = self.history.undo()?;
        self.request_redraw();
        Some(command)
    }
    /// Remove every finished stroke, and abandon the gesture in progress so that it can't
    /// reappear on the cleared canvas once the pointer lifts.
    /// Returns the history change, `None` if the history was already empty.
    pub fn clear(&mut self) -> Option<Command> {
        if self.builder.abandon() {
            log::debug!("Gesture abandoned by clear");
            self.request_redraw();
        }
        let command = self.history.clear()?;
        self.request_redraw();
        Some(command)
    }
    /// Freeze everything currently displayed.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene {
            size: self.size,
            background: self.background.clone(),
            strokes: self.history.snapshot(),
            wet_ink: self
                .builder
                .shared_points()
                .zip(self.builder.paint())
                .map(|(points, paint)| WetInk { points, paint }),
        }
    }
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
    /// If anything changed since the last call, the scene to draw now.
    pub fn take_redraw(&mut self) -> Option<Scene> {
        std::mem::take(&mut self.needs_redraw).then(|| self.scene())
    }
    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }
    fn rejected(&self, what: &str, err: GestureError) -> GestureError {
        log::debug!("Ignoring {what} while {:?}: {err}", self.state());
        err
    }
}
impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl InputConsumer for DrawingSurface {
    fn on_gesture_start(&mut self, point: Point) -> Result<(), GestureError> {
        self.builder
            .start(point, self.paint)
            .map_err(|err| self.rejected("gesture start", err))?;
        self.request_redraw();
        Ok(())
    }
    fn on_gesture_move(&mut self, point: Point) -> Result<(), GestureError> {
        self.builder
            .extend(point)
            .map_err(|err| self.rejected("gesture move", err))?;
        self.request_redraw();
        Ok(())
    }
    fn on_gesture_end(&mut self) -> Result<(), GestureError> {
        let Some(stroke) = self.builder.finish() else {
            return Err(self.rejected("gesture end", GestureError::NotCapturing));
        };
        self.history.append(stroke);
        self.request_redraw();
        Ok(())
    }
    fn on_gesture_cancel(&mut self) -> Result<(), GestureError> {
        if !self.builder.abandon() {
            return Err(self.rejected("gesture cancel", GestureError::NotCapturing));
        }
        self.request_redraw();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{
        Background, DrawCommand, DrawingSurface, InputConsumer, PointerEvent, SurfaceState,
    };
    use crate::{
        color::{Color, NamedColor},
        state::{path_builder::GestureError, stroke_history::Command, PaintError},
        stroke::Point,
    };

    fn draw_line(surface: &mut DrawingSurface, from: (f32, f32), to: (f32, f32)) {
        surface
            .on_gesture_start(Point::new(from.0, from.1))
            .unwrap();
        surface.on_gesture_move(Point::new(to.0, to.1)).unwrap();
        surface.on_gesture_end().unwrap();
    }

    #[test]
    fn gesture_lifecycle() {
        let mut surface = DrawingSurface::new(32, 32);
        assert_eq!(surface.state(), SurfaceState::Idle);
        surface.on_gesture_start(Point::new(1.0, 1.0)).unwrap();
        assert_eq!(surface.state(), SurfaceState::Capturing);
        surface.on_gesture_move(Point::new(2.0, 2.0)).unwrap();
        surface.on_gesture_move(Point::new(3.0, 2.0)).unwrap();
        // Still in progress, nothing finished yet.
        assert!(surface.history().is_empty());
        surface.on_gesture_end().unwrap();
        assert_eq!(surface.state(), SurfaceState::Idle);

        let stroke = surface.history().iter().next().unwrap();
        assert_eq!(stroke.points().len(), 3);
    }
    #[test]
    fn out_of_order_events_are_noops() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.take_redraw();
        assert_eq!(
            surface.on_gesture_move(Point::new(1.0, 1.0)),
            Err(GestureError::NotCapturing)
        );
        assert_eq!(surface.on_gesture_end(), Err(GestureError::NotCapturing));
        assert_eq!(surface.on_gesture_cancel(), Err(GestureError::NotCapturing));
        assert!(!surface.needs_redraw());

        surface.on_gesture_start(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(
            surface.on_gesture_start(Point::new(5.0, 5.0)),
            Err(GestureError::AlreadyCapturing)
        );
        surface.on_gesture_end().unwrap();
        assert_eq!(
            surface.history().iter().next().unwrap().points(),
            &[Point::new(0.0, 0.0)]
        );
    }
    #[test]
    fn pointer_events_dispatch() {
        let mut surface = DrawingSurface::new(32, 32);
        for event in [
            PointerEvent::Down(Point::new(0.0, 0.0)),
            PointerEvent::Move(Point::new(4.0, 0.0)),
            PointerEvent::Up,
            PointerEvent::Down(Point::new(9.0, 9.0)),
            PointerEvent::Cancel,
        ] {
            surface.consume(event).unwrap();
        }
        assert_eq!(surface.history().len(), 1);
        assert_eq!(surface.state(), SurfaceState::Idle);
    }
    #[test]
    fn paint_changes_apply_to_next_gesture_only() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.set_color(NamedColor::Red.into());
        surface.set_brush_width(4.0).unwrap();

        surface.on_gesture_start(Point::new(0.0, 0.0)).unwrap();
        surface.set_color(NamedColor::Blue.into());
        surface.set_brush_width(10.0).unwrap();
        surface.on_gesture_move(Point::new(5.0, 5.0)).unwrap();
        // Wet ink shows the paint it started with.
        let scene = surface.scene();
        let wet = scene.wet_ink().unwrap();
        assert_eq!(wet.paint.color, Color::from(NamedColor::Red));
        surface.on_gesture_end().unwrap();

        draw_line(&mut surface, (0.0, 0.0), (1.0, 1.0));

        let strokes: Vec<_> = surface
            .history()
            .iter()
            .map(|s| (s.color(), s.width()))
            .collect();
        assert_eq!(
            strokes,
            [
                (Color::from(NamedColor::Red), 4.0_f32),
                (Color::from(NamedColor::Blue), 10.0)
            ]
        );
    }
    #[test]
    fn bad_width_keeps_old() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.set_brush_width(7.0).unwrap();
        assert_eq!(
            surface.set_brush_width(0.0),
            Err(PaintError::InvalidWidth(0.0))
        );
        assert_eq!(surface.paint().width.get(), 7.0);
    }
    #[test]
    fn undo_only_touches_history() {
        let mut surface = DrawingSurface::new(32, 32);
        draw_line(&mut surface, (0.0, 0.0), (10.0, 0.0));
        let id = surface.history().iter().next().unwrap().id();

        surface.on_gesture_start(Point::new(3.0, 3.0)).unwrap();
        assert_eq!(surface.undo(), Some(Command::Undone(id)));
        assert_eq!(surface.state(), SurfaceState::Capturing);
        // Empty undo is fine, even mid gesture.
        assert_eq!(surface.undo(), None);
        surface.on_gesture_end().unwrap();
        assert_eq!(surface.history().len(), 1);
    }
    #[test]
    fn clear_abandons_gesture() {
        let mut surface = DrawingSurface::new(32, 32);
        draw_line(&mut surface, (0.0, 0.0), (10.0, 0.0));
        surface.on_gesture_start(Point::new(3.0, 3.0)).unwrap();
        assert!(matches!(surface.clear(), Some(Command::Cleared(ids)) if ids.len() == 1));
        assert_eq!(surface.state(), SurfaceState::Idle);
        // The pointer lifting afterwards must not resurrect the abandoned stroke.
        assert_eq!(surface.on_gesture_end(), Err(GestureError::NotCapturing));
        assert!(surface.history().is_empty());
        assert_eq!(surface.clear(), None);
    }
    #[test]
    fn redraw_requests() {
        let mut surface = DrawingSurface::new(32, 32);
        assert!(surface.take_redraw().is_some());
        assert!(surface.take_redraw().is_none());

        surface.on_gesture_start(Point::new(0.0, 0.0)).unwrap();
        surface.on_gesture_move(Point::new(1.0, 0.0)).unwrap();
        // Coalesced into a single redraw.
        let scene = surface.take_redraw().unwrap();
        assert_eq!(scene.wet_ink().unwrap().points.len(), 2);
        assert!(surface.take_redraw().is_none());

        surface.on_gesture_end().unwrap();
        assert!(surface.take_redraw().is_some());
        // Nothing to undo beyond the one stroke.
        surface.undo();
        assert!(surface.take_redraw().is_some());
        surface.undo();
        assert!(surface.take_redraw().is_none());
    }
    #[test]
    fn wet_ink_is_shared_not_copied() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.on_gesture_start(Point::new(0.0, 0.0)).unwrap();
        for x in 1..100 {
            surface.on_gesture_move(Point::new(x as f32, 0.0)).unwrap();
        }
        let first = surface.scene();
        let second = surface.scene();
        assert!(std::sync::Arc::ptr_eq(
            &first.wet_ink().unwrap().points,
            &second.wet_ink().unwrap().points
        ));
        drop(second);

        // A scene still held stays as it was when taken.
        surface.on_gesture_move(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(first.wet_ink().unwrap().points.len(), 100);
        assert_eq!(surface.scene().wet_ink().unwrap().points.len(), 101);

        drop(first);
        surface.on_gesture_end().unwrap();
        assert_eq!(surface.history().iter().next().unwrap().points().len(), 101);
    }
    #[test]
    fn display_list_order() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.set_background(Background::Solid(NamedColor::Yellow.into()));
        surface.set_color(NamedColor::Red.into());
        draw_line(&mut surface, (0.0, 0.0), (10.0, 0.0));
        surface.set_color(NamedColor::Blue.into());
        draw_line(&mut surface, (0.0, 5.0), (10.0, 5.0));
        surface.set_color(NamedColor::Green.into());
        surface.on_gesture_start(Point::new(1.0, 1.0)).unwrap();

        let scene = surface.scene();
        let list = scene.display_list();
        let commands: Vec<_> = list.iter().copied().collect();
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], DrawCommand::Fill(Color::WHITE));
        assert_eq!(commands[1], DrawCommand::Fill(NamedColor::Yellow.into()));
        let strokes: Vec<_> = list.strokes().map(|s| (s.color, s.wet)).collect();
        assert_eq!(
            strokes,
            [
                (Color::from(NamedColor::Red), false),
                (Color::from(NamedColor::Blue), false),
                (Color::from(NamedColor::Green), true),
            ]
        );
    }
    #[test]
    fn scene_is_send() {
        fn assert_send_sync<T: Send + Sync + 'static>(_: &T) {}
        let surface = DrawingSurface::new(8, 8);
        assert_send_sync(&surface.scene());
    }
}
