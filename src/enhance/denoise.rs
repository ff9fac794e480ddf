//! Non-local-means denoising for 8-bit planes.
//!
//! Every output pixel is a weighted mean of the pixels in a 21×21 search
//! window. A candidate's weight is `exp(-d / h²)`, where `d` is the mean
//! squared difference between the 7×7 patches around the two pixels and `h`
//! is the filter strength. Edges survive because patches on opposite sides of
//! an edge differ strongly and get negligible weight.
//!
//! Patch distances are evaluated per search offset with an integral image of
//! squared differences, so the cost is O(W·H·21²) rather than O(W·H·21²·7²).
//! Borders are replicated once up front; the per-offset prefix rows are
//! built in parallel when the `parallel` feature is on.
use crate::image::{GrayImageU8, ImageF32, ImageView};

/// Half-size of the comparison patch (7×7).
pub const TEMPLATE_RADIUS: usize = 3;
/// Half-size of the search window (21×21).
pub const SEARCH_RADIUS: usize = 10;

/// Denoise `src` with strength `h`; `h == 0` returns an unchanged copy.
pub fn non_local_means(src: &GrayImageU8, h: u32) -> GrayImageU8 {
    let (w, ht) = (src.w, src.h);
    if h == 0 || w == 0 || ht == 0 {
        return src.clone();
    }
    let inv_h2 = 1.0 / (h as f32 * h as f32);
    let patch_area = ((2 * TEMPLATE_RADIUS + 1) * (2 * TEMPLATE_RADIUS + 1)) as f32;

    let padded = PaddedPlane::replicate(src, TEMPLATE_RADIUS + SEARCH_RADIUS);
    let mut weight_sum = ImageF32::new(w, ht);
    let mut value_sum = ImageF32::new(w, ht);
    let mut integral = SquaredDiffIntegral::new(w, ht);

    let r = SEARCH_RADIUS as isize;
    for dy in -r..=r {
        for dx in -r..=r {
            integral.rebuild(&padded, dx, dy);
            let offset = Offset {
                dx,
                dy,
                inv_h2,
                patch_area,
            };
            accumulate(&padded, &integral, &offset, &mut weight_sum, &mut value_sum);
        }
    }

    let data = weight_sum
        .data
        .iter()
        .zip(&value_sum.data)
        .map(|(&wsum, &vsum)| (vsum / wsum).round().clamp(0.0, 255.0) as u8)
        .collect();
    GrayImageU8 { w, h: ht, data }
}

struct Offset {
    dx: isize,
    dy: isize,
    inv_h2: f32,
    patch_area: f32,
}

/// Source plane with a replicated border of `pad` pixels, so every lookup
/// within the template and search radii is a plain index.
struct PaddedPlane {
    pad: usize,
    stride: usize,
    data: Vec<u8>,
}

impl PaddedPlane {
    fn replicate(src: &GrayImageU8, pad: usize) -> Self {
        let stride = src.w + 2 * pad;
        let rows = src.h + 2 * pad;
        let p = pad as isize;
        let mut data = Vec::with_capacity(stride * rows);
        for py in 0..rows as isize {
            for px in 0..stride as isize {
                data.push(src.get_clamped(px - p, py - p));
            }
        }
        Self { pad, stride, data }
    }

    /// Row `y` (image coordinates, may be negative) starting at image column `x0`.
    #[inline]
    fn row_from(&self, x0: isize, y: isize, len: usize) -> &[u8] {
        let pad = self.pad as isize;
        let start = (y + pad) as usize * self.stride + (x0 + pad) as usize;
        &self.data[start..start + len]
    }
}

/// Summed-area table of `(I(p) - I(p + d))²` over the image padded by the
/// template radius on every side.
struct SquaredDiffIntegral {
    /// Padded width + 1
    stride: usize,
    padded_w: usize,
    table: Vec<u64>,
}

impl SquaredDiffIntegral {
    fn new(w: usize, h: usize) -> Self {
        let padded_w = w + 2 * TEMPLATE_RADIUS;
        let padded_h = h + 2 * TEMPLATE_RADIUS;
        Self {
            stride: padded_w + 1,
            padded_w,
            table: vec![0; (padded_w + 1) * (padded_h + 1)],
        }
    }

    fn rebuild(&mut self, src: &PaddedPlane, dx: isize, dy: isize) {
        let stride = self.stride;
        fill_row_prefixes(&mut self.table[stride..], stride, self.padded_w, src, dx, dy);
        for py in 1..self.table.len() / stride - 1 {
            let (done, rest) = self.table.split_at_mut((py + 1) * stride);
            let above = &done[py * stride..];
            for (cell, prev) in rest[..stride].iter_mut().zip(above) {
                *cell += prev;
            }
        }
    }

    /// Sum over the patch centred on image pixel `(x, y)`.
    #[inline]
    fn patch_sum(&self, x: usize, y: usize) -> u64 {
        let side = 2 * TEMPLATE_RADIUS + 1;
        let (x0, y0) = (x, y);
        let (x1, y1) = (x + side, y + side);
        let s = self.stride;
        self.table[y1 * s + x1] + self.table[y0 * s + x0]
            - self.table[y0 * s + x1]
            - self.table[y1 * s + x0]
    }
}

/// Horizontal prefix sums of one padded row; `out[0]` stays zero.
fn fill_row_prefix(
    out: &mut [u64],
    py: usize,
    padded_w: usize,
    src: &PaddedPlane,
    dx: isize,
    dy: isize,
) {
    let pad = TEMPLATE_RADIUS as isize;
    let y = py as isize - pad;
    let a = src.row_from(-pad, y, padded_w);
    let b = src.row_from(dx - pad, y + dy, padded_w);
    let mut row_sum = 0u64;
    for ((slot, &pa), &pb) in out[1..].iter_mut().zip(a).zip(b) {
        let d = pa as i64 - pb as i64;
        row_sum += (d * d) as u64;
        *slot = row_sum;
    }
}

#[cfg(feature = "parallel")]
fn fill_row_prefixes(
    rows: &mut [u64],
    stride: usize,
    padded_w: usize,
    src: &PaddedPlane,
    dx: isize,
    dy: isize,
) {
    use rayon::prelude::*;

    rows.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(py, out)| fill_row_prefix(out, py, padded_w, src, dx, dy));
}

#[cfg(not(feature = "parallel"))]
fn fill_row_prefixes(
    rows: &mut [u64],
    stride: usize,
    padded_w: usize,
    src: &PaddedPlane,
    dx: isize,
    dy: isize,
) {
    for (py, out) in rows.chunks_mut(stride).enumerate() {
        fill_row_prefix(out, py, padded_w, src, dx, dy);
    }
}

fn accumulate_row(
    src: &PaddedPlane,
    integral: &SquaredDiffIntegral,
    offset: &Offset,
    y: usize,
    weight_row: &mut [f32],
    value_row: &mut [f32],
) {
    let candidates = src.row_from(offset.dx, y as isize + offset.dy, weight_row.len());
    for (x, ((wsum, vsum), &candidate)) in weight_row
        .iter_mut()
        .zip(value_row.iter_mut())
        .zip(candidates)
        .enumerate()
    {
        let dist = integral.patch_sum(x, y) as f32 / offset.patch_area;
        let weight = (-dist * offset.inv_h2).exp();
        *wsum += weight;
        *vsum += weight * candidate as f32;
    }
}

#[cfg(feature = "parallel")]
fn accumulate(
    src: &PaddedPlane,
    integral: &SquaredDiffIntegral,
    offset: &Offset,
    weight_sum: &mut ImageF32,
    value_sum: &mut ImageF32,
) {
    use rayon::prelude::*;

    let w = weight_sum.w;
    weight_sum
        .data
        .par_chunks_mut(w)
        .zip(value_sum.data.par_chunks_mut(w))
        .enumerate()
        .for_each(|(y, (weight_row, value_row))| {
            accumulate_row(src, integral, offset, y, weight_row, value_row)
        });
}

#[cfg(not(feature = "parallel"))]
fn accumulate(
    src: &PaddedPlane,
    integral: &SquaredDiffIntegral,
    offset: &Offset,
    weight_sum: &mut ImageF32,
    value_sum: &mut ImageF32,
) {
    use crate::image::ImageViewMut;

    for y in 0..weight_sum.h {
        accumulate_row(
            src,
            integral,
            offset,
            y,
            weight_sum.row_mut(y),
            value_sum.row_mut(y),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_step(w: usize, h: usize) -> GrayImageU8 {
        // Deterministic ±12 checker noise on top of a vertical step edge.
        GrayImageU8::from_fn(w, h, |x, y| {
            let base: i32 = if x < w / 2 { 60 } else { 180 };
            let noise = if (x * 7 + y * 13) % 3 == 0 { 12 } else { -6 };
            (base + noise) as u8
        })
    }

    fn variance(img: &GrayImageU8, xs: std::ops::Range<usize>) -> f64 {
        let vals: Vec<f64> = (0..img.h)
            .flat_map(|y| xs.clone().map(move |x| (x, y)))
            .map(|(x, y)| img.get(x, y) as f64)
            .collect();
        let mean = vals.iter().sum::<f64>() / vals.len() as f64;
        vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / vals.len() as f64
    }

    fn brute_patch_sum(src: &GrayImageU8, x: usize, y: usize, dx: isize, dy: isize) -> u64 {
        let r = TEMPLATE_RADIUS as isize;
        let (x, y) = (x as isize, y as isize);
        let mut sum = 0u64;
        for py in y - r..=y + r {
            for px in x - r..=x + r {
                let a = src.get_clamped(px, py) as i64;
                let b = src.get_clamped(px + dx, py + dy) as i64;
                sum += ((a - b) * (a - b)) as u64;
            }
        }
        sum
    }

    #[test]
    fn integral_matches_direct_patch_sums_at_the_borders() {
        let src = noisy_step(13, 11);
        let padded = PaddedPlane::replicate(&src, TEMPLATE_RADIUS + SEARCH_RADIUS);
        let mut integral = SquaredDiffIntegral::new(src.w, src.h);
        let r = SEARCH_RADIUS as isize;
        for (dx, dy) in [(0, 0), (-r, -r), (r, -3), (4, r), (-7, 2)] {
            integral.rebuild(&padded, dx, dy);
            for y in 0..src.h {
                for x in 0..src.w {
                    assert_eq!(
                        integral.patch_sum(x, y),
                        brute_patch_sum(&src, x, y, dx, dy),
                        "offset ({dx}, {dy}) at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_strength_is_identity() {
        let src = noisy_step(24, 16);
        assert_eq!(non_local_means(&src, 0), src);
    }

    #[test]
    fn reduces_noise_in_flat_regions() {
        let src = noisy_step(40, 24);
        let out = non_local_means(&src, 10);
        assert!(variance(&out, 2..16) < variance(&src, 2..16));
        assert!(variance(&out, 24..38) < variance(&src, 24..38));
    }

    #[test]
    fn preserves_the_step_edge() {
        let src = noisy_step(40, 24);
        let out = non_local_means(&src, 10);
        let left = out.get(5, 12) as i32;
        let right = out.get(34, 12) as i32;
        assert!(right - left > 90, "edge collapsed: {left} vs {right}");
    }

    #[test]
    fn constant_image_is_unchanged() {
        let src = GrayImageU8::from_fn(12, 9, |_, _| 77);
        assert_eq!(non_local_means(&src, 15), src);
    }
}
