//! Parameters of one flow computation.
//!
//! `alpha` weighs the smoothness term against brightness constancy: larger
//! values give smoother fields that spread motion further into flat regions.
//! `iterations` is the exact number of relaxation passes; there is no early
//! stop.

use crate::error::{FlowError, Result};
use crate::gradient::GradientMethod;
use serde::{Deserialize, Serialize};

/// Knobs for [`crate::compute_flow`] and [`crate::HornSchunck`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    /// Smoothness weight (> 0).
    pub alpha: f32,
    /// Relaxation passes to run.
    pub iterations: usize,
    /// Two-frame gradient strategy.
    pub gradient_method: GradientMethod,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            iterations: 100,
            gradient_method: GradientMethod::Forward,
        }
    }
}

impl FlowParams {
    pub fn new(alpha: f32, iterations: usize) -> Self {
        Self {
            alpha,
            iterations,
            ..Self::default()
        }
    }

    pub fn with_gradient_method(mut self, method: GradientMethod) -> Self {
        self.gradient_method = method;
        self
    }

    /// Rejects `alpha <= 0` and non-finite `alpha`.
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(FlowError::InvalidParameters(format!(
                "alpha must be finite and > 0, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
