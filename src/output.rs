//! # Output Module
//!
//! Writes the rendered pixel buffer to disk:
//! - PNG: 8-bit, values scaled straight to [0, 255]. The buffer already holds
//!   display colors, so no tone mapping or gamma curve is applied.
//! - EXR: 32-bit float RGB, values stored unchanged.
//!
//! The format is chosen from the file extension by [`save_image`].

use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::info;
use thiserror::Error;

use crate::renderer::PixelBuffer;

/// Errors raised while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    /// PNG encoding or file I/O failed.
    #[error("failed to save PNG {path}: {source}")]
    Png {
        /// Target path
        path: String,
        /// Underlying error
        source: image::ImageError,
    },

    /// EXR encoding or file I/O failed.
    #[error("failed to save EXR {path}: {source}")]
    Exr {
        /// Target path
        path: String,
        /// Underlying error
        source: exr::error::Error,
    },

    /// The extension is neither `.png` nor `.exr`.
    #[error("unsupported file extension '{0}', only .png and .exr are supported")]
    UnsupportedExtension(String),
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 8-bit PNG
    Png,
    /// 32-bit float OpenEXR
    Exr,
}

impl OutputFormat {
    /// Format for a path, by case-insensitive extension.
    pub fn from_path(path: &str) -> Result<Self, OutputError> {
        let ext = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "exr" => Ok(OutputFormat::Exr),
            _ => Err(OutputError::UnsupportedExtension(ext)),
        }
    }
}

/// Convert the float buffer to 8-bit RGB.
///
/// Channels are clamped to [0, 1] and rounded to the nearest step.
pub fn to_rgb8(image: &PixelBuffer) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([to_u8(pixel[0]), to_u8(pixel[1]), to_u8(pixel[2])])
    })
}

/// Save the buffer as an 8-bit PNG.
pub fn save_image_as_png(image: &PixelBuffer, output_path: &str) -> Result<(), OutputError> {
    to_rgb8(image).save(output_path).map_err(|source| OutputError::Png {
        path: output_path.to_string(),
        source,
    })?;
    info!("Image saved as {}", output_path);
    Ok(())
}

/// Save the buffer as a float EXR.
pub fn save_image_as_exr(image: &PixelBuffer, output_path: &str) -> Result<(), OutputError> {
    write_rgb_file(output_path, image.width() as usize, image.height() as usize, |x, y| {
        let p = image.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    })
    .map_err(|source| OutputError::Exr {
        path: output_path.to_string(),
        source,
    })?;
    info!("Image saved as EXR: {}", output_path);
    Ok(())
}

/// Save the buffer, picking the format from the extension.
pub fn save_image(image: &PixelBuffer, output_path: &str) -> Result<(), OutputError> {
    match OutputFormat::from_path(output_path)? {
        OutputFormat::Png => save_image_as_png(image, output_path),
        OutputFormat::Exr => save_image_as_exr(image, output_path),
    }
}
