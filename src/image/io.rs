//! I/O helpers for retinal photographs, enhancement variants and JSON.
//!
//! - `decode_color_image`: decode PNG/JPEG/etc. bytes into an RGB [`RawImage`].
//! - `load_color_image`: read a file from disk and decode it.
//! - `save_gray_u8` / `save_color_u8`: write planes and colour variants as PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ChannelOrder, ColorImageU8, GrayImageU8, RawImage};
use crate::error::ImageError;
use ::image::{GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Decode an encoded image into an 8-bit RGB buffer.
pub fn decode_color_image(bytes: &[u8]) -> Result<RawImage, ImageError> {
    let decoded = ::image::load_from_memory(bytes)?.into_rgb8();
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    ColorImageU8::from_raw(w, h, ChannelOrder::Rgb, decoded.into_raw())
}

/// Read and decode an image file.
pub fn load_color_image(path: &Path) -> Result<RawImage, ImageError> {
    let bytes = fs::read(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_color_image(&bytes)
}

/// Save an 8-bit grayscale plane as PNG.
pub fn save_gray_u8(image: &GrayImageU8, path: &Path) -> Result<(), ImageError> {
    ensure_parent_dir(path)?;
    let buffer = GrayImage::from_raw(image.w as u32, image.h as u32, image.data.clone())
        .ok_or(ImageError::BufferSize {
            expected: image.w * image.h,
            actual: image.data.len(),
        })?;
    buffer.save(path)?;
    Ok(())
}

/// Save a colour image as an RGB PNG regardless of its channel order.
pub fn save_color_u8(image: &ColorImageU8, path: &Path) -> Result<(), ImageError> {
    ensure_parent_dir(path)?;
    let rgb = image.to_rgb();
    let expected = rgb.w * rgb.h * 3;
    let actual = rgb.data.len();
    let buffer = RgbImage::from_raw(rgb.w as u32, rgb.h as u32, rgb.data)
        .ok_or(ImageError::BufferSize { expected, actual })?;
    buffer.save(path)?;
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ImageError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), ImageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ImageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
