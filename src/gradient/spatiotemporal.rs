//! Three-frame spatio-temporal gradients with separable 3-tap kernels.
//!
//! With a derivative kernel `h' = [-1, 0, 1] / 2` and a smoothing kernel
//! `h = [1, k, 1] / (2 + k)`:
//!
//! ```text
//! Ex = h'(x) h(y) h(t)
//! Ey = h(x) h'(y) h(t)
//! Et = h(x) h(y) h'(t)
//! ```
//!
//! Spatial derivatives fall back to one-sided differences on the border and
//! the spatial smoothing replicates edge pixels. Both kernels are normalized
//! so a unit ramp along an axis produces a unit derivative along that axis.
use super::central::neighbors;
use super::GradientField;
use crate::error::{ensure_min_dims, ensure_same_dims, Result};
use crate::image::{ImageF32, ImageView};
use serde::{Deserialize, Serialize};

/// Smoothing kernel applied across the two non-differentiated axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingKernel {
    /// `[1, 2, 1]`, i.e. a 3D Sobel operator.
    #[default]
    Sobel,
    /// `[1, 1, 1]`, a 3D Prewitt operator.
    Prewitt,
    /// `[1, √2, 1]`, better rotational symmetry.
    Isotropic,
}

impl SmoothingKernel {
    /// Normalized taps `[1, k, 1] / (2 + k)`.
    pub fn taps(self) -> [f32; 3] {
        let k = match self {
            SmoothingKernel::Sobel => 2.0,
            SmoothingKernel::Prewitt => 1.0,
            SmoothingKernel::Isotropic => std::f32::consts::SQRT_2,
        };
        let norm = 2.0 + k;
        [1.0 / norm, k / norm, 1.0 / norm]
    }
}

/// Gradient at the middle frame of `[f0, f1, f2]`.
pub fn spatiotemporal_gradient(
    frames: [&ImageF32; 3],
    kernel: SmoothingKernel,
) -> Result<GradientField> {
    let [f0, f1, f2] = frames;
    ensure_min_dims("first frame", f0.w, f0.h)?;
    ensure_same_dims("second frame", f0.dims(), f1.dims())?;
    ensure_same_dims("third frame", f0.dims(), f2.dims())?;

    let (w, h) = (f0.w, f0.h);
    let taps = kernel.taps();
    let mut out = GradientField::zeros(w, h);

    for y in 0..h {
        let (ym, yp) = neighbors(y, h);
        let ys = [ym, y, yp];
        let dy_span = (yp - ym) as f32;
        for x in 0..w {
            let (xm, xp) = neighbors(x, w);
            let xs = [xm, x, xp];
            let dx_span = (xp - xm) as f32;

            let mut ex = 0.0f32;
            let mut ey = 0.0f32;
            for (frame, &wt) in frames.iter().zip(&taps) {
                let mut sx = 0.0f32;
                let mut sy = 0.0f32;
                for k in 0..3 {
                    sx += taps[k] * (frame.get(xp, ys[k]) - frame.get(xm, ys[k])) / dx_span;
                    sy += taps[k] * (frame.get(xs[k], yp) - frame.get(xs[k], ym)) / dy_span;
                }
                ex += wt * sx;
                ey += wt * sy;
            }

            let mut et = 0.0f32;
            for (j, &yy) in ys.iter().enumerate() {
                for (i, &xx) in xs.iter().enumerate() {
                    et += taps[j] * taps[i] * 0.5 * (f2.get(xx, yy) - f0.get(xx, yy));
                }
            }

            let idx = out.ex.idx(x, y);
            out.ex.data[idx] = ex;
            out.ey.data[idx] = ey;
            out.et.data[idx] = et;
        }
    }

    log::debug!("spatiotemporal gradient {:?} on {}x{}", kernel, w, h);
    Ok(out)
}
