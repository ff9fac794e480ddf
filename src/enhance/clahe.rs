//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a `rows × cols` grid of tiles. Each tile gets a
//! histogram whose bins are clipped at `clip_limit × (tile area / 256)`; the
//! clipped excess is spread evenly over all bins and the cumulative histogram
//! becomes that tile's lookup table. Output pixels blend the tables of the
//! four nearest tile centres bilinearly, which hides tile seams.
use crate::image::{GrayImageU8, ImageU8, ImageView};

const BINS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheParams {
    pub clip_limit: f32,
    /// `[rows, cols]`
    pub grid: [usize; 2],
}

struct TileGrid {
    rows: usize,
    cols: usize,
    /// Mean tile size; tiles differ by at most one pixel.
    tile_w: f32,
    tile_h: f32,
    luts: Vec<[u8; BINS]>,
}

impl TileGrid {
    fn lut(&self, ty: usize, tx: usize) -> &[u8; BINS] {
        &self.luts[ty * self.cols + tx]
    }
}

/// Start of tile `i` out of `n` along an axis of length `len`.
#[inline]
fn tile_start(i: usize, n: usize, len: usize) -> usize {
    i * len / n
}

pub fn clahe(src: ImageU8<'_>, params: &ClaheParams) -> GrayImageU8 {
    let (w, h) = (src.w, src.h);
    if w == 0 || h == 0 {
        return GrayImageU8::new(w, h);
    }
    let grid = build_tiles(&src, params);
    let mut out = GrayImageU8::new(w, h);

    let inv_tw = 1.0 / grid.tile_w;
    let inv_th = 1.0 / grid.tile_h;
    for y in 0..h {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1f = tyf.floor();
        let ya = tyf - ty1f;
        let ty1 = (ty1f.max(0.0) as usize).min(grid.rows - 1);
        let ty2 = ((ty1f + 1.0).max(0.0) as usize).min(grid.rows - 1);

        let src_row = src.row(y);
        for x in 0..w {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1f = txf.floor();
            let xa = txf - tx1f;
            let tx1 = (tx1f.max(0.0) as usize).min(grid.cols - 1);
            let tx2 = ((tx1f + 1.0).max(0.0) as usize).min(grid.cols - 1);

            let v = src_row[x] as usize;
            let top = grid.lut(ty1, tx1)[v] as f32 * (1.0 - xa) + grid.lut(ty1, tx2)[v] as f32 * xa;
            let bottom =
                grid.lut(ty2, tx1)[v] as f32 * (1.0 - xa) + grid.lut(ty2, tx2)[v] as f32 * xa;
            let blended = top * (1.0 - ya) + bottom * ya;
            out.set(x, y, blended.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

fn build_tiles(src: &ImageU8<'_>, params: &ClaheParams) -> TileGrid {
    let (w, h) = (src.w, src.h);
    // At most one tile per pixel, so no tile is empty.
    let rows = params.grid[0].clamp(1, h);
    let cols = params.grid[1].clamp(1, w);

    let mut luts = Vec::with_capacity(rows * cols);
    for ty in 0..rows {
        let y0 = tile_start(ty, rows, h);
        let y1 = tile_start(ty + 1, rows, h);
        for tx in 0..cols {
            let x0 = tile_start(tx, cols, w);
            let x1 = tile_start(tx + 1, cols, w);
            let mut hist = [0usize; BINS];
            for y in y0..y1 {
                for &v in &src.row(y)[x0..x1] {
                    hist[v as usize] += 1;
                }
            }
            let area = (x1 - x0) * (y1 - y0);
            clip_histogram(&mut hist, params.clip_limit, area);
            luts.push(cumulative_lut(&hist, area));
        }
    }

    TileGrid {
        rows,
        cols,
        tile_w: w as f32 / cols as f32,
        tile_h: h as f32 / rows as f32,
        luts,
    }
}

/// Clip every bin at the limit and redistribute the excess.
fn clip_histogram(hist: &mut [usize; BINS], clip_limit: f32, area: usize) {
    let limit = ((clip_limit * area as f32 / BINS as f32) as usize).max(1);

    let mut clipped = 0usize;
    for bin in hist.iter_mut() {
        if *bin > limit {
            clipped += *bin - limit;
            *bin = limit;
        }
    }

    let batch = clipped / BINS;
    let mut residual = clipped - batch * BINS;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn cumulative_lut(hist: &[usize; BINS], area: usize) -> [u8; BINS] {
    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0usize;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *slot = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ClaheParams {
        ClaheParams {
            clip_limit: 2.0,
            grid: [8, 8],
        }
    }

    fn range(img: &GrayImageU8) -> (u8, u8) {
        let min = img.data.iter().copied().min().unwrap_or(0);
        let max = img.data.iter().copied().max().unwrap_or(0);
        (min, max)
    }

    #[test]
    fn stretches_a_low_contrast_ramp() {
        let src = GrayImageU8::from_fn(64, 64, |x, _| 100 + (x / 2) as u8);
        let out = clahe(
            src.as_view(),
            &ClaheParams {
                clip_limit: 2.0,
                grid: [1, 1],
            },
        );
        let (lo, hi) = range(&out);
        let (src_lo, src_hi) = range(&src);
        assert!(
            hi - lo > src_hi - src_lo,
            "expected wider range, got {lo}..{hi} from {src_lo}..{src_hi}"
        );
    }

    #[test]
    fn flat_image_stays_flat() {
        let src = GrayImageU8::from_fn(40, 32, |_, _| 90);
        let out = clahe(src.as_view(), &params());
        let (lo, hi) = range(&out);
        assert_eq!(lo, hi);
    }

    #[test]
    fn grid_larger_than_image_is_tolerated() {
        let src = GrayImageU8::from_fn(5, 3, |x, y| (x * 40 + y * 10) as u8);
        let out = clahe(src.as_view(), &params());
        assert_eq!((out.w, out.h), (5, 3));
    }

    #[test]
    fn preserves_intensity_order_within_a_tile() {
        let src = GrayImageU8::from_fn(16, 16, |x, y| ((x + y) * 4) as u8);
        let out = clahe(
            src.as_view(),
            &ClaheParams {
                clip_limit: 40.0,
                grid: [1, 1],
            },
        );
        for y in 0..16 {
            for x in 1..16 {
                assert!(out.get(x, y) >= out.get(x - 1, y));
            }
        }
    }

    #[test]
    fn configured_grid_is_kept_for_uneven_sizes() {
        for w in [9, 17, 33, 49, 50, 224] {
            let src = GrayImageU8::from_fn(w, 33, |x, y| (x * 3 + y) as u8);
            let grid = build_tiles(&src.as_view(), &params());
            assert_eq!((grid.rows, grid.cols), (8, 8), "width {w}");
            assert_eq!(grid.luts.len(), 64);

            let widths: Vec<usize> = (0..8)
                .map(|tx| tile_start(tx + 1, 8, w) - tile_start(tx, 8, w))
                .collect();
            let (lo, hi) = (widths.iter().min().unwrap(), widths.iter().max().unwrap());
            assert!(*lo >= 1 && hi - lo <= 1, "width {w}: tiles {widths:?}");
            assert_eq!(widths.iter().sum::<usize>(), w);
        }
    }

    #[test]
    fn grid_is_capped_at_one_tile_per_pixel() {
        let src = GrayImageU8::from_fn(5, 3, |x, y| (x * 40 + y * 10) as u8);
        let grid = build_tiles(&src.as_view(), &params());
        assert_eq!((grid.rows, grid.cols), (3, 5));
    }

    #[test]
    fn clipping_conserves_histogram_mass() {
        let mut hist = [0usize; BINS];
        hist[10] = 900;
        hist[200] = 124;
        clip_histogram(&mut hist, 2.0, 1024);
        assert_eq!(hist.iter().sum::<usize>(), 1024);
        assert!(hist[10] < 900);
    }
}
