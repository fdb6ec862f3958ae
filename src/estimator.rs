//! Flow orchestration: validate → gradient → relax → return.
//!
//! The free functions [`compute_flow`] and [`compute_flow_seeded`] cover the
//! one-shot case. [`HornSchunck`] holds validated parameters (and optionally a
//! frame shape) so that a video loop can reuse them, and adds the three-frame
//! variant and an instrumented [`HornSchunck::estimate`].
//!
//! Every call is independent: nothing is cached between calls, and a failing
//! call returns before any gradient work is done.

use crate::diagnostics::{elapsed_ms, FlowSummary, TimingBreakdown};
use crate::error::{ensure_min_dims, ensure_same_dims, Result};
use crate::flow::{FlowField, FlowSolver, ResidualSummary};
use crate::gradient::{check_frame_pair, spatiotemporal_gradient, GradientField, SmoothingKernel};
use crate::image::{ImageF32, ImageView};
use crate::params::FlowParams;
use serde::Serialize;
use std::time::Instant;

/// Dense flow from `previous` to `current`, starting from zero motion.
pub fn compute_flow(
    previous: &ImageF32,
    current: &ImageF32,
    params: &FlowParams,
) -> Result<FlowField> {
    compute_flow_seeded(previous, current, params, None)
}

/// Dense flow from `previous` to `current`, starting from `seed` when given.
pub fn compute_flow_seeded(
    previous: &ImageF32,
    current: &ImageF32,
    params: &FlowParams,
    seed: Option<FlowField>,
) -> Result<FlowField> {
    params.validate()?;
    check_frame_pair(previous, current)?;
    let init = initial_flow(previous.dims(), seed)?;
    let grad = params.gradient_method.estimate(previous, current)?;
    relax(&grad, init, params)
}

/// Zero field, or `seed` after checking its shape.
pub(crate) fn initial_flow(dims: (usize, usize), seed: Option<FlowField>) -> Result<FlowField> {
    match seed {
        Some(seed) => {
            ensure_same_dims("seed flow", dims, seed.dims())?;
            Ok(seed)
        }
        None => Ok(FlowField::zeros(dims.0, dims.1)),
    }
}

fn relax(grad: &GradientField, init: FlowField, params: &FlowParams) -> Result<FlowField> {
    FlowSolver::new(grad, params.alpha)?.run(init, params.iterations)
}

/// Result of [`HornSchunck::estimate`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEstimate {
    #[serde(skip)]
    pub flow: FlowField,
    pub params: FlowParams,
    pub summary: FlowSummary,
    pub residuals: ResidualSummary,
    pub timing: TimingBreakdown,
}

/// Reusable Horn & Schunck estimator.
#[derive(Clone, Debug)]
pub struct HornSchunck {
    params: FlowParams,
    shape: Option<(usize, usize)>,
}

impl HornSchunck {
    /// Fails with `InvalidParameters` when `params` would be rejected by
    /// [`compute_flow`].
    pub fn new(params: FlowParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            shape: None,
        })
    }

    /// Restrict the estimator to frames of exactly `w × h`.
    pub fn with_shape(mut self, w: usize, h: usize) -> Result<Self> {
        ensure_min_dims("estimator shape", w, h)?;
        self.shape = Some((w, h));
        Ok(self)
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    fn check_shape(&self, frame: &ImageF32) -> Result<()> {
        match self.shape {
            Some(shape) => ensure_same_dims("frame", shape, frame.dims()),
            None => Ok(()),
        }
    }

    pub fn compute(&self, previous: &ImageF32, current: &ImageF32) -> Result<FlowField> {
        self.compute_seeded(previous, current, None)
    }

    pub fn compute_seeded(
        &self,
        previous: &ImageF32,
        current: &ImageF32,
        seed: Option<FlowField>,
    ) -> Result<FlowField> {
        self.check_shape(previous)?;
        compute_flow_seeded(previous, current, &self.params, seed)
    }

    /// Flow at the middle frame of `frames`, with gradients from the
    /// three-frame estimator. `params.gradient_method` is not used here.
    pub fn compute_sequence(
        &self,
        frames: [&ImageF32; 3],
        kernel: SmoothingKernel,
        seed: Option<FlowField>,
    ) -> Result<FlowField> {
        self.check_shape(frames[0])?;
        let grad = spatiotemporal_gradient(frames, kernel)?;
        let init = initial_flow(grad.dims(), seed)?;
        relax(&grad, init, &self.params)
    }

    /// Like [`Self::compute_seeded`], also reporting stage timings and the
    /// residuals of the returned field.
    pub fn estimate(
        &self,
        previous: &ImageF32,
        current: &ImageF32,
        seed: Option<FlowField>,
    ) -> Result<FlowEstimate> {
        let start = Instant::now();
        self.check_shape(previous)?;
        check_frame_pair(previous, current)?;
        let init = initial_flow(previous.dims(), seed)?;

        let mut timing = TimingBreakdown::default();
        let method = self.params.gradient_method;
        let grad = timing.measure(format!("gradient ({})", method.name()), || {
            method.estimate(previous, current)
        })?;
        let flow = timing.measure("relaxation", || relax(&grad, init, &self.params))?;
        let residuals = timing.measure("residuals", || {
            ResidualSummary::compute(&grad, &flow, self.params.alpha)
        })?;
        timing.total_ms = elapsed_ms(start);

        log::debug!(
            "flow estimate {}x{}: {} passes, rms brightness error {:.4}, {:.2} ms",
            flow.width(),
            flow.height(),
            self.params.iterations,
            residuals.rms_brightness,
            timing.total_ms
        );

        Ok(FlowEstimate {
            summary: FlowSummary::from_flow(&flow),
            flow,
            params: self.params,
            residuals,
            timing,
        })
    }
}
