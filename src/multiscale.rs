//! Coarse-to-fine Horn & Schunck.
//!
//! Both frames are reduced to Gaussian pyramids. The coarsest level is solved
//! from zero motion; every finer level is seeded with the flow of the level
//! below, upsampled by nearest neighbour with the vectors scaled by the size
//! ratio. Each level runs the full `params.iterations` passes.
//!
//! Large displacements become small at coarse scales, where the linearized
//! brightness constraint still holds, and the seed lets the fine levels start
//! close to the answer.

use crate::diagnostics::{elapsed_ms, FlowSummary, LevelReport};
use crate::error::{FlowError, Result};
use crate::estimator::compute_flow_seeded;
use crate::flow::FlowField;
use crate::gradient::check_frame_pair;
use crate::image::{ImageF32, ImageView, ImageViewMut};
use crate::params::FlowParams;
use crate::pyramid::{feasible_levels, Pyramid, PyramidFilter, PyramidOptions};
use serde::Deserialize;
use std::time::Instant;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct MultiscaleOptions {
    /// Requested pyramid depth, including full resolution (>= 1).
    pub levels: usize,
    /// How many downscale steps blur before decimation.
    ///
    /// - `None` (default): blur on all steps.
    /// - `0`: never blur.
    pub blur_levels: Option<usize>,
    /// Low-pass kernel applied before each decimation.
    pub filter: PyramidFilter,
}

impl Default for MultiscaleOptions {
    fn default() -> Self {
        Self {
            levels: 3,
            blur_levels: None,
            filter: PyramidFilter::Gaussian5,
        }
    }
}

impl MultiscaleOptions {
    fn pyramid_options(&self) -> PyramidOptions {
        PyramidOptions::new(self.levels)
            .with_blur_levels(self.blur_levels)
            .with_filter(self.filter.kernel())
    }
}

/// Multi-scale flow with per-level reports, coarsest level first.
#[derive(Clone, Debug)]
pub struct MultiscaleFlow {
    pub flow: FlowField,
    pub levels: Vec<LevelReport>,
}

/// Coarse-to-fine flow from `previous` to `current`.
pub fn compute_flow_multiscale(
    previous: &ImageF32,
    current: &ImageF32,
    params: &FlowParams,
    options: &MultiscaleOptions,
) -> Result<FlowField> {
    run_multiscale(previous, current, params, options).map(|out| out.flow)
}

/// [`compute_flow_multiscale`], also returning one report per level.
pub fn run_multiscale(
    previous: &ImageF32,
    current: &ImageF32,
    params: &FlowParams,
    options: &MultiscaleOptions,
) -> Result<MultiscaleFlow> {
    params.validate()?;
    check_frame_pair(previous, current)?;
    if options.levels == 0 {
        return Err(FlowError::InvalidParameters(
            "multi-scale flow requires at least one level".into(),
        ));
    }

    let feasible = feasible_levels(previous.w, previous.h, options.levels);
    if feasible < options.levels {
        log::warn!(
            "requested {} pyramid levels for {}x{} frames, using {}",
            options.levels,
            previous.w,
            previous.h,
            feasible
        );
    }

    let pyr_opts = options.pyramid_options();
    let prev_pyr = Pyramid::build_f32(previous.clone(), pyr_opts)?;
    let curr_pyr = Pyramid::build_f32(current.clone(), pyr_opts)?;

    let mut seed: Option<FlowField> = None;
    let mut reports = Vec::with_capacity(prev_pyr.len());
    for (level, (prev, curr)) in prev_pyr
        .levels
        .iter()
        .zip(&curr_pyr.levels)
        .enumerate()
        .rev()
    {
        let start = Instant::now();
        let init = seed.take().map(|coarse| upsample_flow(&coarse, prev.w, prev.h));
        let flow = compute_flow_seeded(prev, curr, params, init)?;
        reports.push(LevelReport {
            level_index: level,
            width: prev.w,
            height: prev.h,
            elapsed_ms: elapsed_ms(start),
            flow: FlowSummary::from_flow(&flow),
        });
        seed = Some(flow);
    }

    let flow = seed.ok_or_else(|| {
        FlowError::InvalidParameters("pyramid produced no levels".into())
    })?;
    log::debug!(
        "multi-scale flow over {} levels, mean vector ({:.3}, {:.3})",
        reports.len(),
        flow.mean_vector().x,
        flow.mean_vector().y
    );
    Ok(MultiscaleFlow {
        flow,
        levels: reports,
    })
}

/// Nearest-neighbour upsampling of `flow` to `w × h`. Vector components are
/// scaled by the per-axis size ratio so they stay in destination pixels.
pub fn upsample_flow(flow: &FlowField, w: usize, h: usize) -> FlowField {
    let (cw, ch) = flow.dims();
    let mut out = FlowField::zeros(w, h);
    if cw == 0 || ch == 0 {
        return out;
    }
    let sx = w as f32 / cw as f32;
    let sy = h as f32 / ch as f32;
    for y in 0..h {
        let cy = (y * ch / h).min(ch - 1);
        let (u_src, v_src) = (flow.u.row(cy), flow.v.row(cy));
        let u_dst = out.u.row_mut(y);
        for (x, dst) in u_dst.iter_mut().enumerate() {
            *dst = u_src[(x * cw / w).min(cw - 1)] * sx;
        }
        let v_dst = out.v.row_mut(y);
        for (x, dst) in v_dst.iter_mut().enumerate() {
            *dst = v_src[(x * cw / w).min(cw - 1)] * sy;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::compute_flow;
    use crate::pyramid::filters::SeparableFilter;

    #[test]
    fn upsampling_replicates_and_scales() {
        let mut coarse = FlowField::zeros(2, 2);
        coarse.u.set(1, 0, 1.0);
        coarse.v.set(0, 1, -0.5);
        let fine = upsample_flow(&coarse, 4, 3);
        assert_eq!(fine.dims(), (4, 3));
        // x in {2, 3} maps to coarse column 1; y in {0, 1} maps to row 0.
        assert_eq!(fine.u.get(3, 0), 2.0);
        assert_eq!(fine.u.get(2, 1), 2.0);
        assert_eq!(fine.u.get(1, 0), 0.0);
        assert_eq!(fine.v.get(0, 2), -0.75);
    }

    #[test]
    fn single_level_matches_the_plain_solver() {
        let prev = ImageF32::from_fn(6, 5, |x, y| (x * x + 3 * y) as f32);
        let curr = ImageF32::from_fn(6, 5, |x, y| ((x + 1) * (x + 1) + 3 * y) as f32);
        let params = FlowParams::new(2.0, 15);
        let opts = MultiscaleOptions {
            levels: 1,
            ..Default::default()
        };
        let ms = compute_flow_multiscale(&prev, &curr, &params, &opts).unwrap();
        assert_eq!(ms, compute_flow(&prev, &curr, &params).unwrap());
    }

    #[test]
    fn zero_levels_is_invalid() {
        let img = ImageF32::new(4, 4);
        let opts = MultiscaleOptions {
            levels: 0,
            ..Default::default()
        };
        let err = compute_flow_multiscale(&img, &img, &FlowParams::default(), &opts).unwrap_err();
        assert!(matches!(err, FlowError::InvalidParameters(_)));
    }

    #[test]
    fn filter_is_read_from_json() {
        let opts: MultiscaleOptions =
            serde_json::from_str(r#"{"levels": 2, "filter": "binomial3"}"#).unwrap();
        assert_eq!(opts.filter, PyramidFilter::Binomial3);
        assert_eq!(opts.pyramid_options().filter.taps().len(), 3);
        let defaults: MultiscaleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults.filter, PyramidFilter::Gaussian5);
    }

    #[test]
    fn too_many_levels_are_clamped() {
        let img = ImageF32::from_fn(8, 8, |x, _| x as f32);
        let opts = MultiscaleOptions {
            levels: 10,
            ..Default::default()
        };
        let out = run_multiscale(&img, &img, &FlowParams::new(1.0, 3), &opts).unwrap();
        let sizes: Vec<(usize, usize)> = out.levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(2, 2), (4, 4), (8, 8)]);
        assert_eq!(out.flow.dims(), (8, 8));
    }
}
