pub mod color;
pub mod id;
pub mod raster;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod util;

pub use color::Color;
pub use id::SketchID;
pub use raster::{capture, CaptureError, PixelBuffer};
pub use state::PaintConfig;
pub use stroke::{Point, Stroke};
pub use surface::{DrawingSurface, InputConsumer, PointerEvent};
