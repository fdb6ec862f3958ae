//! Spatio-temporal intensity derivatives `(Ex, Ey, Et)` driving the flow
//! equations.
//!
//! Two-frame strategies are selected through [`GradientMethod`]:
//! - `Forward`: Horn & Schunck's averaged forward differences over the 2×2×2
//!   cube anchored at each pixel. The cube anchor is clamped so the last
//!   row/column repeat the last valid difference.
//! - `Central`: centered spatial differences averaged over both frames, with
//!   one-sided differences on the image border.
//!
//! In both cases `Et = current - previous` pixelwise. The three-frame
//! estimators in [`spatiotemporal`] apply a separable derivative/smoothing
//! kernel pair along x, y and t.
//!
//! Every estimator is a pure function of its inputs and returns planes with
//! exactly the input dimensions.

pub mod central;
pub mod forward;
pub mod spatiotemporal;

use crate::error::{ensure_min_dims, ensure_same_dims, Result};
use crate::image::{ImageF32, ImageView};
use serde::{Deserialize, Serialize};

pub use central::central_gradient;
pub use forward::forward_gradient;
pub use spatiotemporal::{spatiotemporal_gradient, SmoothingKernel};

/// Derivative planes for one frame pair (or triple).
#[derive(Clone, Debug, PartialEq)]
pub struct GradientField {
    /// Horizontal intensity derivative
    pub ex: ImageF32,
    /// Vertical intensity derivative
    pub ey: ImageF32,
    /// Temporal intensity derivative
    pub et: ImageF32,
}

impl GradientField {
    /// Zero-initialized planes of size `w × h`.
    pub fn zeros(w: usize, h: usize) -> Self {
        Self {
            ex: ImageF32::new(w, h),
            ey: ImageF32::new(w, h),
            et: ImageF32::new(w, h),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.ex.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.ex.h
    }

    /// `(width, height)` shared by the three planes.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.ex.w, self.ex.h)
    }

    /// Squared spatial gradient magnitude `Ex² + Ey²` per pixel.
    pub fn spatial_energy(&self) -> ImageF32 {
        let data = self
            .ex
            .data
            .iter()
            .zip(&self.ey.data)
            .map(|(&gx, &gy)| gx * gx + gy * gy)
            .collect();
        ImageF32 {
            w: self.ex.w,
            h: self.ex.h,
            stride: self.ex.w,
            data,
        }
    }
}

/// Two-frame gradient strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMethod {
    /// Averaged forward differences (the classic Horn & Schunck estimator).
    #[default]
    Forward,
    /// Centered differences averaged across both frames.
    Central,
}

impl GradientMethod {
    /// Compute `(Ex, Ey, Et)` for the frame pair with this strategy.
    pub fn estimate(self, previous: &ImageF32, current: &ImageF32) -> Result<GradientField> {
        match self {
            GradientMethod::Forward => forward_gradient(previous, current),
            GradientMethod::Central => central_gradient(previous, current),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GradientMethod::Forward => "forward",
            GradientMethod::Central => "central",
        }
    }
}

/// Validates a frame pair: equal dimensions, each side at least 2.
pub fn check_frame_pair(previous: &ImageF32, current: &ImageF32) -> Result<()> {
    ensure_min_dims("previous frame", previous.w, previous.h)?;
    ensure_same_dims("current frame", previous.dims(), current.dims())
}

/// Temporal derivative `current - previous` written into `et`.
pub(crate) fn temporal_difference(previous: &ImageF32, current: &ImageF32, et: &mut ImageF32) {
    for ((dst, &c), &p) in et.data.iter_mut().zip(&current.data).zip(&previous.data) {
        *dst = c - p;
    }
}
