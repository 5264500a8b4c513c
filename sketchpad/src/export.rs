//! # Export
//!
//! Captures are rasterized, encoded, and written on a worker thread, so the surface keeps taking
//! input while a large image is being compressed. Jobs carry a frozen [`Scene`], never a
//! reference to the live surface.

use crate::{io, preferences::ExportFormat};
use sketchpad_core::surface::Scene;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub enum Destination {
    /// Exactly this file, overwritten if present.
    File(PathBuf),
    /// A fresh, timestamped file in this directory.
    Directory(PathBuf),
}

#[derive(Clone, Debug)]
pub struct ExportJob {
    pub scene: Scene,
    pub destination: Destination,
    pub format: ExportFormat,
    pub jpeg_quality: u8,
}

/// How a worker's jobs turned out.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub failed: usize,
}

pub struct Exporter {
    sender: Option<crossbeam::channel::Sender<ExportJob>>,
    worker: Option<std::thread::JoinHandle<ExportSummary>>,
}
impl Exporter {
    pub fn spawn() -> anyhow::Result<Self> {
        let (sender, receiver) = crossbeam::channel::unbounded::<ExportJob>();
        let worker = std::thread::Builder::new()
            .name("Export worker".to_owned())
            .spawn(move || {
                let mut summary = ExportSummary::default();
                // Ends once every sender is dropped.
                for job in receiver {
                    match run(&job) {
                        Ok(path) => {
                            summary.written += 1;
                            log::info!("Exported {}", path.display());
                        }
                        Err(e) => {
                            summary.failed += 1;
                            log::error!("Failed to export: {e:#}");
                        }
                    }
                }
                summary
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
    /// Queue a job. Returns it back if the worker is gone.
    pub fn submit(&self, job: ExportJob) -> Result<(), ExportJob> {
        match &self.sender {
            Some(sender) => sender.send(job).map_err(|e| e.into_inner()),
            None => Err(job),
        }
    }
    /// Wait for every queued job to finish.
    pub fn finish(mut self) -> ExportSummary {
        self.join()
    }
    fn join(&mut self) -> ExportSummary {
        // Hang up, so the worker drains the queue and exits.
        drop(self.sender.take());
        match self.worker.take().map(std::thread::JoinHandle::join) {
            Some(Ok(summary)) => summary,
            Some(Err(_)) => {
                log::error!("Export worker panicked");
                ExportSummary::default()
            }
            None => ExportSummary::default(),
        }
    }
}
impl Drop for Exporter {
    fn drop(&mut self) {
        let _ = self.join();
    }
}

fn run(job: &ExportJob) -> anyhow::Result<PathBuf> {
    let [width, height] = job.scene.size();
    let buffer = sketchpad_core::raster::rasterize(&job.scene, width, height)?;

    let path = match &job.destination {
        Destination::File(path) => path.clone(),
        Destination::Directory(dir) => {
            std::fs::create_dir_all(dir)?;
            fresh_path(dir, &timestamp(), job.format)
        }
    };

    let file = std::fs::File::create(&path)?;
    let start = std::time::Instant::now();
    let mut writer = std::io::BufWriter::new(file);
    io::encode(&buffer, job.format, job.jpeg_quality, &mut writer)?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    file.sync_all()?;
    let duration = start.elapsed();

    if let Some(size) = file.metadata().ok().map(|meta| meta.len()) {
        let size = size as f64;
        log::debug!(
            "Encoded {width}x{height} as {} in {}us ({}/s)",
            human_bytes::human_bytes(size),
            duration.as_micros(),
            human_bytes::human_bytes(size / duration.as_secs_f64())
        );
    }
    Ok(path)
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// `<dir>/sketch-<stamp>.<ext>`, suffixed with a counter if that is taken.
fn fresh_path(dir: &Path, stamp: &str, format: ExportFormat) -> PathBuf {
    let ext = format.extension();
    let mut path = dir.join(format!("sketch-{stamp}.{ext}"));
    let mut counter = 1u32;
    while path.exists() {
        counter += 1;
        path = dir.join(format!("sketch-{stamp}-{counter}.{ext}"));
    }
    path
}
