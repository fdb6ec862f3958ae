//! Gaussian image pyramid used by the coarse-to-fine flow driver.
//!
//! Level 0 is the input frame. Each further level low-pass filters the
//! previous one with a separable kernel (5-tap Gaussian by default) and keeps
//! every other pixel, so sizes go `w → ceil(w / 2)`. Borders clamp to the
//! image extents. Intensities are not rescaled.
//!
//! Levels are only added while both sides stay at least
//! [`MIN_SIDE`](crate::error::MIN_SIDE), so every level is a valid input to
//! the gradient estimators.

pub mod filters;
pub mod options;

pub use filters::{
    PyramidFilter, SeparableFilter, StaticSeparableFilter, BINOMIAL_3TAP, GAUSSIAN_5TAP,
};
pub use options::PyramidOptions;

use crate::error::{ensure_min_dims, FlowError, Result, MIN_SIDE};
use crate::image::{ImageF32, ImageView, ImageViewMut};

#[derive(Clone, Debug, Default)]
pub struct Pyramid {
    /// Finest first.
    pub levels: Vec<ImageF32>,
}

impl Pyramid {
    /// Build up to `options.levels` levels from `image`.
    ///
    /// Fails on `options.levels == 0` or an input smaller than 2×2. Returns
    /// fewer levels than requested when the image is too small.
    pub fn build_f32(image: ImageF32, options: PyramidOptions) -> Result<Self> {
        if options.levels == 0 {
            return Err(FlowError::InvalidParameters(
                "pyramid requires at least one level".into(),
            ));
        }
        ensure_min_dims("pyramid base", image.w, image.h)?;

        let count = feasible_levels(image.w, image.h, options.levels);
        let mut levels = Vec::with_capacity(count);
        levels.push(image);

        let mut horiz_cache = Vec::new();
        let mut cached_rows = Vec::new();
        for step in 1..count {
            let prev = &levels[step - 1];
            let mut down = ImageF32::new(prev.w.div_ceil(2), prev.h.div_ceil(2));
            if options.blurs_step(step) {
                downsample_with_filter(
                    prev,
                    &mut down,
                    &options.filter,
                    &mut horiz_cache,
                    &mut cached_rows,
                );
            } else {
                downsample_without_filter(prev, &mut down);
            }
            levels.push(down);
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Number of levels (at most `requested`) whose sides all stay `>= MIN_SIDE`.
pub fn feasible_levels(w: usize, h: usize, requested: usize) -> usize {
    if w < MIN_SIDE || h < MIN_SIDE {
        return 0;
    }
    let (mut w, mut h) = (w, h);
    let mut count = 1;
    while count < requested {
        let (nw, nh) = (w.div_ceil(2), h.div_ceil(2));
        if nw < MIN_SIDE || nh < MIN_SIDE {
            break;
        }
        (w, h) = (nw, nh);
        count += 1;
    }
    count
}

fn downsample_without_filter(src: &ImageF32, dst: &mut ImageF32) {
    let max_sx = src.w.saturating_sub(1);
    let max_sy = src.h.saturating_sub(1);
    for y in 0..dst.h {
        let src_row = src.row((2 * y).min(max_sy));
        for (x, dst_px) in dst.row_mut(y).iter_mut().enumerate() {
            *dst_px = src_row[(2 * x).min(max_sx)];
        }
    }
}

/// Separable filter + decimation. Filtered source rows are cached by index so
/// that overlapping vertical windows reuse their horizontal pass.
fn downsample_with_filter(
    src: &ImageF32,
    dst: &mut ImageF32,
    filter: &impl SeparableFilter,
    horiz_cache: &mut Vec<f32>,
    cached_rows: &mut Vec<Option<usize>>,
) {
    let taps = filter.taps();
    if taps.is_empty() || dst.w == 0 || dst.h == 0 {
        return;
    }
    let radius = taps.len() / 2;
    let cache_width = dst.w;

    horiz_cache.clear();
    horiz_cache.resize(cache_width * taps.len(), 0.0);
    cached_rows.clear();
    cached_rows.resize(taps.len(), None);

    for y in 0..dst.h {
        let center = (2 * y) as isize;
        for (ky, slot) in cached_rows.iter_mut().enumerate() {
            let sy = clamp_index(center + ky as isize - radius as isize, src.h);
            if *slot != Some(sy) {
                let cache_row = &mut horiz_cache[ky * cache_width..(ky + 1) * cache_width];
                filter_row_downsample(src.row(sy), cache_row, taps, radius);
                *slot = Some(sy);
            }
        }
        for (x, dst_px) in dst.row_mut(y).iter_mut().enumerate() {
            *dst_px = taps
                .iter()
                .enumerate()
                .map(|(ky, &tap)| tap * horiz_cache[ky * cache_width + x])
                .sum();
        }
    }
}

fn filter_row_downsample(row: &[f32], out: &mut [f32], taps: &[f32], radius: usize) {
    for (x, dst_px) in out.iter_mut().enumerate() {
        let center = (2 * x) as isize;
        *dst_px = taps
            .iter()
            .enumerate()
            .map(|(k, &tap)| {
                let sx = clamp_index(center + k as isize - radius as isize, row.len());
                tap * row[sx]
            })
            .sum();
    }
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    idx.clamp(0, upper as isize - 1) as usize
}
