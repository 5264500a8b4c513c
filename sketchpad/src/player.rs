//! Replays a [`Script`] onto a surface, standing in for a pointer, a toolbar, and a display.

use crate::{
    export::{Destination, ExportJob, Exporter},
    preferences::{ExportFormat, Preferences},
    script::{Action, Script, Step},
    toolbar::Toolbar,
};
use sketchpad_core::{
    surface::{Background, DrawingSurface},
    InputConsumer,
};
use std::sync::Arc;

/// What happened during a replay.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct PlayStats {
    /// Steps that were ignored, with a warning logged.
    pub rejected: usize,
    /// Redraws the surface asked for.
    pub frames: usize,
    /// Export jobs queued.
    pub exports: usize,
}

pub struct Player<'a> {
    surface: DrawingSurface,
    toolbar: Toolbar,
    preferences: &'a Preferences,
    exporter: Option<&'a Exporter>,
    stats: PlayStats,
}
impl<'a> Player<'a> {
    /// A fresh surface, sized and painted per `preferences`.
    pub fn new(preferences: &'a Preferences) -> anyhow::Result<Self> {
        let canvas = &preferences.canvas;
        let mut surface = DrawingSurface::new(canvas.width, canvas.height)
            .with_paint(preferences.initial_paint()?);
        if canvas.background != sketchpad_core::Color::WHITE {
            surface.set_background(Background::Solid(canvas.background));
        }
        Ok(Self {
            surface,
            toolbar: Toolbar::default(),
            preferences,
            exporter: None,
            stats: PlayStats::default(),
        })
    }
    /// Queue `export` steps here. Without one, they are skipped.
    #[must_use]
    pub fn with_exporter(self, exporter: &'a Exporter) -> Self {
        Self {
            exporter: Some(exporter),
            ..self
        }
    }
    #[must_use]
    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }
    #[must_use]
    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }
    pub fn play(&mut self, script: &Script) -> PlayStats {
        for step in script.steps() {
            if let Err(e) = self.step(step) {
                self.stats.rejected += 1;
                log::warn!("line {}: {e:#}", step.line);
            }
            self.present();
        }
        self.stats
    }
    /// Run one step. Errors leave the surface as it was.
    pub fn step(&mut self, step: &Step) -> anyhow::Result<()> {
        let preferences = self.preferences;
        match &step.action {
            Action::Pointer(event) => self.surface.consume(*event)?,
            Action::Color(color) => self.toolbar.pick_color(*color).apply(&mut self.surface)?,
            Action::Swatch(idx) => {
                let Some(&color) = preferences.palette.get(*idx) else {
                    anyhow::bail!(
                        "swatch {idx} is out of range, the palette has {} colors",
                        preferences.palette.len()
                    );
                };
                self.toolbar.pick_color(color).apply(&mut self.surface)?;
            }
            Action::Width(width) => self.toolbar.set_width(*width).apply(&mut self.surface)?,
            Action::Brush(size) => self
                .toolbar
                .pick_brush(*size, &preferences.brush.presets)
                .apply(&mut self.surface)?,
            Action::Panel(panel) => self.toolbar.open(*panel),
            Action::Toolbar(true) => self.toolbar.expand(),
            Action::Toolbar(false) => self.toolbar.collapse(),
            Action::Undo => self.toolbar.undo().apply(&mut self.surface)?,
            Action::Clear => self.toolbar.clear().apply(&mut self.surface)?,
            Action::Resize { width, height } => self.surface.resize(*width, *height),
            Action::Background(color) => self
                .surface
                .set_background((*color).map_or(Background::None, Background::Solid)),
            Action::BackgroundImage(path) => {
                let image = crate::io::load_image(path)
                    .map_err(|e| e.context(format!("loading {}", path.display())))?;
                log::debug!("Loaded background {image:?}");
                self.surface.set_background(Background::Image(Arc::new(image)));
            }
            Action::Export(path) => self.export(path.as_deref())?,
        }
        Ok(())
    }
    fn export(&mut self, path: Option<&std::path::Path>) -> anyhow::Result<()> {
        let Some(exporter) = self.exporter else {
            log::info!("No exporter, skipping export");
            return Ok(());
        };
        let defaults = &self.preferences.export;
        let (destination, format) = match path {
            Some(path) => (
                Destination::File(path.to_owned()),
                ExportFormat::from_path(path).unwrap_or(defaults.format),
            ),
            None => (Destination::Directory(defaults.directory()), defaults.format),
        };
        exporter
            .submit(ExportJob {
                scene: self.surface.scene(),
                destination,
                format,
                jpeg_quality: defaults.jpeg_quality,
            })
            .map_err(|_| anyhow::anyhow!("export worker has stopped"))?;
        self.stats.exports += 1;
        Ok(())
    }
    /// Stand-in for a display's paint cycle.
    fn present(&mut self) {
        if let Some(scene) = self.surface.take_redraw() {
            self.stats.frames += 1;
            log::trace!(
                "Frame {}: {} draw commands",
                self.stats.frames,
                scene.display_list().len()
            );
        }
    }
}
