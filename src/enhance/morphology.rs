//! Grayscale morphology with flat structuring elements.
//!
//! Samples falling outside the image are ignored, so erosion and dilation
//! never pull in a synthetic border value.
use crate::image::{GrayImageU8, ImageView};

/// Flat structuring element stored as offsets from its centre.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Ellipse inscribed in a `(2r + 1) × (2r + 1)` box. Row half-widths are
    /// `round(r · sqrt(1 - (dy / r)²))`, giving the familiar 5×5 cross-like
    /// disc for `r = 2`.
    pub fn ellipse(radius: usize) -> Self {
        let r = radius as isize;
        let mut offsets = Vec::new();
        if r == 0 {
            offsets.push((0, 0));
            return Self { offsets };
        }
        let inv_r2 = 1.0 / (r * r) as f64;
        for dy in -r..=r {
            let half = (r as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as isize;
            for dx in -half..=half {
                offsets.push((dx, dy));
            }
        }
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn contains(&self, dx: isize, dy: isize) -> bool {
        self.offsets.contains(&(dx, dy))
    }
}

fn rank_filter(
    src: &GrayImageU8,
    se: &StructuringElement,
    pick: fn(u8, u8) -> u8,
    init: u8,
) -> GrayImageU8 {
    let (w, h) = (src.w as isize, src.h as isize);
    GrayImageU8::from_fn(src.w, src.h, |x, y| {
        let mut acc = init;
        for &(dx, dy) in &se.offsets {
            let (sx, sy) = (x as isize + dx, y as isize + dy);
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            acc = pick(acc, src.row(sy as usize)[sx as usize]);
        }
        acc
    })
}

pub fn erode(src: &GrayImageU8, se: &StructuringElement) -> GrayImageU8 {
    rank_filter(src, se, u8::min, u8::MAX)
}

pub fn dilate(src: &GrayImageU8, se: &StructuringElement) -> GrayImageU8 {
    rank_filter(src, se, u8::max, u8::MIN)
}

/// Erosion followed by dilation.
pub fn opening(src: &GrayImageU8, se: &StructuringElement) -> GrayImageU8 {
    dilate(&erode(src, se), se)
}

/// White top-hat: `src - opening(src)`, keeping bright details narrower than
/// the structuring element.
pub fn top_hat(src: &GrayImageU8, se: &StructuringElement) -> GrayImageU8 {
    let opened = opening(src, se);
    GrayImageU8 {
        w: src.w,
        h: src.h,
        data: src
            .data
            .iter()
            .zip(&opened.data)
            .map(|(&a, &b)| a.saturating_sub(b))
            .collect(),
    }
}

/// Pixel-wise `a + b`, saturating at 255.
pub fn saturating_add(a: &GrayImageU8, b: &GrayImageU8) -> GrayImageU8 {
    debug_assert_eq!((a.w, a.h), (b.w, b.h));
    GrayImageU8 {
        w: a.w,
        h: a.h,
        data: a
            .data
            .iter()
            .zip(&b.data)
            .map(|(&x, &y)| x.saturating_add(y))
            .collect(),
    }
}
