//! Interleaved 3-channel 8-bit images.
//!
//! A [`ColorImageU8`] remembers the order its channels are stored in so that
//! buffers coming from BGR camera SDKs and RGB decoders can flow through the
//! same pipeline. The green channel sits at index 1 in both orders.
use super::u8::GrayImageU8;
use crate::error::ImageError;
use serde::{Deserialize, Serialize};

/// Number of interleaved channels in a [`ColorImageU8`].
pub const COLOR_CHANNELS: usize = 3;

/// Byte order of the interleaved channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Owned interleaved 3-channel buffer (`w × h × 3`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImageU8 {
    pub w: usize,
    pub h: usize,
    pub order: ChannelOrder,
    pub data: Vec<u8>,
}

/// A photograph as handed to the analysis pipeline.
pub type RawImage = ColorImageU8;

impl ColorImageU8 {
    /// Wrap an interleaved buffer, rejecting empty images and length
    /// mismatches.
    pub fn from_raw(
        w: usize,
        h: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if w == 0 || h == 0 {
            return Err(ImageError::Dimensions {
                width: w,
                height: h,
            });
        }
        let expected = w * h * COLOR_CHANNELS;
        if data.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { w, h, order, data })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel; `f` returns
    /// channels in `order`.
    pub fn from_fn(
        w: usize,
        h: usize,
        order: ChannelOrder,
        mut f: impl FnMut(usize, usize) -> [u8; 3],
    ) -> Self {
        let mut data = Vec::with_capacity(w * h * COLOR_CHANNELS);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self { w, h, order, data }
    }

    pub fn channels(&self) -> usize {
        COLOR_CHANNELS
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * COLOR_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Extract the channel stored at `index` (0..3) as its own plane.
    pub fn channel(&self, index: usize) -> GrayImageU8 {
        debug_assert!(index < COLOR_CHANNELS);
        GrayImageU8 {
            w: self.w,
            h: self.h,
            data: self
                .data
                .chunks_exact(COLOR_CHANNELS)
                .map(|px| px[index])
                .collect(),
        }
    }

    /// The green channel, independent of channel order.
    pub fn green(&self) -> GrayImageU8 {
        self.channel(1)
    }

    /// Copy of this image with channels in RGB order.
    pub fn to_rgb(&self) -> Self {
        match self.order {
            ChannelOrder::Rgb => self.clone(),
            ChannelOrder::Bgr => {
                let data = self
                    .data
                    .chunks_exact(COLOR_CHANNELS)
                    .flat_map(|px| [px[2], px[1], px[0]])
                    .collect();
                Self {
                    w: self.w,
                    h: self.h,
                    order: ChannelOrder::Rgb,
                    data,
                }
            }
        }
    }

    /// Copy of this image with the channel at `index` replaced by `plane`.
    pub fn with_channel(&self, index: usize, plane: &GrayImageU8) -> Result<Self, ImageError> {
        if plane.w != self.w || plane.h != self.h {
            return Err(ImageError::PlaneMismatch {
                expected: (self.w, self.h),
                actual: (plane.w, plane.h),
            });
        }
        let mut data = self.data.clone();
        for (px, &v) in data.chunks_exact_mut(COLOR_CHANNELS).zip(&plane.data) {
            px[index] = v;
        }
        Ok(Self {
            w: self.w,
            h: self.h,
            order: self.order,
            data,
        })
    }
}
