//! 8-bit single-channel planes.
//!
//! [`GrayImageU8`] owns its pixels and is what every grayscale enhancement
//! variant is stored as; [`ImageU8`] is the borrowed view handed to code that
//! only reads.
use super::traits::{ImageView, ImageViewMut};
use crate::error::ImageError;

/// Owned 8-bit grayscale buffer, row-major, `stride == w`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl GrayImageU8 {
    /// Zero-filled plane of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Wrap an existing buffer, checking that its length matches `w × h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() != w * h {
            return Err(ImageError::BufferSize {
                expected: w * h,
                actual: data.len(),
            });
        }
        Ok(Self { w, h, data })
    }

    /// Build a plane by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.w + x] = v;
    }

    /// Apply a per-pixel mapping, returning a new plane.
    pub fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            w: self.w,
            h: self.h,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Look every pixel up in a 256-entry table.
    pub fn apply_lut(&self, lut: &[u8; 256]) -> Self {
        self.map(|v| lut[v as usize])
    }

    /// Borrow as a read-only [`ImageU8`] view.
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: &self.data,
        }
    }
}

impl ImageView for GrayImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for GrayImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}

#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

impl<'a> ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
