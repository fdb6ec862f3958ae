//! Error terms of the Horn & Schunck functional for a given flow.
//!
//! - brightness error `Eb = Ex·u + Ey·v + Et` (zero when the flow satisfies
//!   brightness constancy exactly),
//! - squared smoothness error `Ec² = (ubar - u)² + (vbar - v)²` with the
//!   same neighbourhood average as the solver,
//! - total energy `Σ Eb² + alpha² Σ Ec²`, accumulated in f64.
use super::FlowField;
use crate::averaging::local_average;
use crate::error::{ensure_same_dims, Result};
use crate::gradient::GradientField;
use crate::image::ImageF32;
use serde::Serialize;

/// Per-pixel brightness constancy residual.
pub fn brightness_error(grad: &GradientField, flow: &FlowField) -> Result<ImageF32> {
    ensure_same_dims("flow", grad.dims(), flow.dims())?;
    let (w, h) = grad.dims();
    let mut out = ImageF32::new(w, h);
    for (i, dst) in out.data.iter_mut().enumerate() {
        *dst = grad.ex.data[i] * flow.u.data[i]
            + grad.ey.data[i] * flow.v.data[i]
            + grad.et.data[i];
    }
    Ok(out)
}

/// Per-pixel squared departure from the local average.
pub fn smoothness_error_sq(flow: &FlowField) -> ImageF32 {
    let ubar = local_average(&flow.u);
    let vbar = local_average(&flow.v);
    let (w, h) = flow.dims();
    let mut out = ImageF32::new(w, h);
    for (i, dst) in out.data.iter_mut().enumerate() {
        let du = ubar.data[i] - flow.u.data[i];
        let dv = vbar.data[i] - flow.v.data[i];
        *dst = du * du + dv * dv;
    }
    out
}

/// Discrete Horn & Schunck energy of `flow`.
pub fn energy(grad: &GradientField, flow: &FlowField, alpha: f32) -> Result<f64> {
    Ok(ResidualSummary::compute(grad, flow, alpha)?.energy)
}

/// Aggregated residuals, reported alongside an estimate.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualSummary {
    pub mean_abs_brightness: f64,
    pub rms_brightness: f64,
    pub mean_smoothness_sq: f64,
    pub energy: f64,
}

impl ResidualSummary {
    pub fn compute(grad: &GradientField, flow: &FlowField, alpha: f32) -> Result<Self> {
        let eb = brightness_error(grad, flow)?;
        let ec2 = smoothness_error_sq(flow);
        let n = eb.data.len().max(1) as f64;

        let abs_sum: f64 = eb.data.iter().map(|&v| f64::from(v.abs())).sum();
        let sq_sum: f64 = eb.data.iter().map(|&v| f64::from(v) * f64::from(v)).sum();
        let smooth_sum: f64 = ec2.data.iter().map(|&v| f64::from(v)).sum();
        let alpha_sq = f64::from(alpha) * f64::from(alpha);

        Ok(Self {
            mean_abs_brightness: abs_sum / n,
            rms_brightness: (sq_sum / n).sqrt(),
            mean_smoothness_sq: smooth_sum / n,
            energy: sq_sum + alpha_sq * smooth_sum,
        })
    }
}
