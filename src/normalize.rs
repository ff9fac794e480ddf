//! Classifier input preparation: resize and scale one colour variant.
//!
//! The tensor layout is NHWC (`[1, height, width, 3]`), channels in RGB order.
use crate::config::{AnalysisConfig, NormalizationMethod};
use crate::error::{ImageError, TensorError};
use crate::image::ColorImageU8;
use ::image::imageops::{self, FilterType};
use ::image::RgbImage;
use ndarray::{Array4, Axis};

/// ImageNet per-channel mean, RGB order, in `[0, 1]` units.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet per-channel standard deviation, RGB order, in `[0, 1]` units.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];
/// Added to the per-image standard deviation to keep flat images finite.
pub const PER_IMAGE_EPSILON: f64 = 1e-7;

/// Batch of one normalized image, `[1, height, width, 3]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInputTensor {
    data: Array4<f32>,
}

impl ModelInputTensor {
    pub fn new(data: Array4<f32>) -> Self {
        Self { data }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    /// Per-channel mean and population standard deviation.
    pub fn channel_stats(&self) -> [(f64, f64); 3] {
        let mut stats = [(0.0, 0.0); 3];
        for (c, slot) in stats.iter_mut().enumerate() {
            let lane = self.data.index_axis(Axis(3), c);
            *slot = mean_std(lane.iter().copied());
        }
        stats
    }
}

fn mean_std(values: impl Iterator<Item = f32> + Clone) -> (f64, f64) {
    let (mut n, mut sum) = (0usize, 0.0f64);
    for v in values.clone() {
        n += 1;
        sum += f64::from(v);
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    let var = values
        .map(|v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    (mean, var.sqrt())
}

/// Resize `image` to the configured input size and scale it per the
/// configured normalization method. The input is left untouched.
pub fn normalize(
    image: &ColorImageU8,
    config: &AnalysisConfig,
) -> Result<ModelInputTensor, TensorError> {
    let (width, height) = (config.input_width(), config.input_height());
    if width == 0 || height == 0 {
        return Err(TensorError::InputSize { width, height });
    }
    let resized = resize_rgb(image, width, height)?;

    let (w, h) = (width as usize, height as usize);
    let pixels: Vec<f32> = resized.into_raw().into_iter().map(f32::from).collect();
    let mut data = Array4::from_shape_vec((1, h, w, 3), pixels)?;

    match config.normalization_method {
        NormalizationMethod::ZeroOne => data.mapv_inplace(|v| v / 255.0),
        NormalizationMethod::Imagenet => {
            for c in 0..3 {
                let mean = IMAGENET_MEAN[c] * 255.0;
                let std = IMAGENET_STD[c] * 255.0;
                data.index_axis_mut(Axis(3), c)
                    .mapv_inplace(|v| (v - mean) / std);
            }
        }
        NormalizationMethod::PerImage => {
            let (mean, std) = mean_std(data.iter().copied());
            let denom = std + PER_IMAGE_EPSILON;
            data.mapv_inplace(|v| ((f64::from(v) - mean) / denom) as f32);
        }
    }

    Ok(ModelInputTensor::new(data))
}

fn resize_rgb(image: &ColorImageU8, width: u32, height: u32) -> Result<RgbImage, ImageError> {
    let rgb = image.to_rgb();
    let expected = rgb.data.len();
    let buffer = RgbImage::from_raw(rgb.w as u32, rgb.h as u32, rgb.data).ok_or(
        ImageError::BufferSize {
            expected: rgb.w * rgb.h * 3,
            actual: expected,
        },
    )?;
    if buffer.dimensions() == (width, height) {
        return Ok(buffer);
    }
    Ok(imageops::resize(&buffer, width, height, FilterType::Triangle))
}
