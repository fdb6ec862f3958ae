#![doc = include_str!("../README.md")]

// Core engine
pub mod averaging;
pub mod error;
pub mod estimator;
pub mod flow;
pub mod gradient;
pub mod image;
pub mod params;

// Supporting layers
pub mod config;
pub mod diagnostics;
pub mod multiscale;
pub mod pyramid;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{FlowError, Result};
pub use crate::estimator::{compute_flow, compute_flow_seeded, FlowEstimate, HornSchunck};
pub use crate::flow::FlowField;
pub use crate::gradient::{GradientField, GradientMethod, SmoothingKernel};
pub use crate::image::{ImageF32, ImageU8};
pub use crate::multiscale::{compute_flow_multiscale, MultiscaleOptions};
pub use crate::params::FlowParams;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use hornschunck::prelude::*;
///
/// let prev = ImageF32::from_fn(8, 8, |x, _| x as f32);
/// let curr = ImageF32::from_fn(8, 8, |x, _| x as f32 - 1.0);
/// let params = FlowParams::new(1.0, 50).with_gradient_method(GradientMethod::Central);
///
/// let flow = compute_flow(&prev, &curr, &params).unwrap();
/// assert!((flow.vector_at(4, 4).x - 1.0).abs() < 1e-3);
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageU8, ImageView};
    pub use crate::{
        compute_flow, compute_flow_seeded, FlowError, FlowField, FlowParams, GradientMethod,
        HornSchunck,
    };
}
