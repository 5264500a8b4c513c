//! Decoding background images and encoding captures.

use crate::preferences::ExportFormat;
use sketchpad_core::PixelBuffer;

/// Decode any format the `image` crate understands into straight RGBA8.
pub fn load_image(path: &std::path::Path) -> anyhow::Result<PixelBuffer> {
    let image = image::open(path)?.into_rgba8();
    let (width, height) = image.dimensions();
    Ok(PixelBuffer::from_rgba8(width, height, image.into_raw())?)
}

/// Encode a capture into `writer`. `jpeg_quality` is ignored for lossless formats.
pub fn encode(
    buffer: &PixelBuffer,
    format: ExportFormat,
    jpeg_quality: u8,
    writer: impl std::io::Write,
) -> anyhow::Result<()> {
    let (width, height) = (buffer.width(), buffer.height());
    match format {
        ExportFormat::Png => {
            let mut encoder = png::Encoder::new(writer, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(buffer.as_bytes())?;
            writer.finish()?;
        }
        ExportFormat::Jpeg => {
            // No alpha channel in JPEG. Captures are composed over white, so this is lossless
            // in practice.
            let rgb: Vec<u8> = buffer
                .pixels()
                .iter()
                .flat_map(|&[r, g, b, _]| [r, g, b])
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(writer, jpeg_quality.clamp(1, 100))
                .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)?;
        }
    }
    Ok(())
}
