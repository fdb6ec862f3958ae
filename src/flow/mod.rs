//! Flow fields and the Horn & Schunck relaxation that refines them.

pub mod field;
pub mod residuals;
pub mod solver;

pub use field::FlowField;
pub use residuals::{brightness_error, energy, smoothness_error_sq, ResidualSummary};
pub use solver::{solve, FlowSolver};
