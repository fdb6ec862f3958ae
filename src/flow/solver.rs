//! Vanilla Horn & Schunck relaxation.
//!
//! Each pass computes, for every pixel,
//!
//! ```text
//! ubar, vbar = LocalAverage(u), LocalAverage(v)
//! common     = (Ex·ubar + Ey·vbar + Et) / (alpha² + Ex² + Ey²)
//! u'         = ubar - Ex·common
//! v'         = vbar - Ey·common
//! ```
//!
//! Updates are synchronous (Jacobi): a pass only reads the previous pass's
//! field and writes into a second buffer, and the two buffers are swapped
//! afterwards. The number of passes is exactly the requested budget; there is
//! no convergence test.
//!
//! `alpha = 0` is accepted here. For pixels where the denominator is then
//! exactly zero (flat gradient) the update is skipped and the pixel takes the
//! averaged values `ubar`, `vbar`.
use super::FlowField;
use crate::averaging::fill_average;
use crate::error::{ensure_same_dims, FlowError, Result};
use crate::gradient::GradientField;
use crate::image::{ImageF32, ImageView};

/// Relaxation state for one gradient field: the time-invariant denominators
/// plus the averaging scratch planes.
pub struct FlowSolver<'a> {
    grad: &'a GradientField,
    alpha: f32,
    denom: ImageF32,
    ubar: ImageF32,
    vbar: ImageF32,
    passes: usize,
}

impl<'a> FlowSolver<'a> {
    /// Prepare a solver. Fails if `alpha` is negative or not finite.
    pub fn new(grad: &'a GradientField, alpha: f32) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(FlowError::InvalidParameters(format!(
                "solver alpha must be finite and >= 0, got {alpha}"
            )));
        }
        let (w, h) = grad.dims();
        ensure_same_dims("vertical gradient", (w, h), grad.ey.dims())?;
        ensure_same_dims("temporal gradient", (w, h), grad.et.dims())?;

        let alpha_sq = alpha * alpha;
        let denom_data = grad
            .ex
            .data
            .iter()
            .zip(&grad.ey.data)
            .map(|(&ex, &ey)| alpha_sq + ex * ex + ey * ey)
            .collect();
        Ok(Self {
            grad,
            alpha,
            denom: ImageF32 {
                w,
                h,
                stride: w,
                data: denom_data,
            },
            ubar: ImageF32::new(w, h),
            vbar: ImageF32::new(w, h),
            passes: 0,
        })
    }

    /// Number of relaxation passes executed so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// One synchronous pass reading `current` and writing `next`.
    pub fn step(&mut self, current: &FlowField, next: &mut FlowField) -> Result<()> {
        let dims = self.grad.dims();
        ensure_same_dims("current flow", dims, current.dims())?;
        ensure_same_dims("next flow", dims, next.dims())?;
        self.step_unchecked(current, next);
        Ok(())
    }

    /// Run `iterations` passes starting from `init`, swapping the two flow
    /// buffers after every pass.
    pub fn run(&mut self, init: FlowField, iterations: usize) -> Result<FlowField> {
        let (w, h) = self.grad.dims();
        ensure_same_dims("initial flow", (w, h), init.dims())?;
        if iterations == 0 {
            return Ok(init);
        }

        let mut current = init;
        let mut next = FlowField::zeros(w, h);
        for _ in 0..iterations {
            self.step_unchecked(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
        }
        log::debug!(
            "horn-schunck relaxation: {} passes on {}x{} (alpha={})",
            iterations,
            w,
            h,
            self.alpha
        );
        Ok(current)
    }

    fn step_unchecked(&mut self, current: &FlowField, next: &mut FlowField) {
        fill_average(&current.u, &mut self.ubar);
        fill_average(&current.v, &mut self.vbar);
        self.update_into(next);
        self.passes += 1;
    }

    fn update_into(&self, next: &mut FlowField) {
        let FlowField { u, v } = next;
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            u.data
                .par_iter_mut()
                .zip(v.data.par_iter_mut())
                .enumerate()
                .for_each(|(i, (un, vn))| (*un, *vn) = self.update_pixel(i));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for (i, (un, vn)) in u.data.iter_mut().zip(v.data.iter_mut()).enumerate() {
                (*un, *vn) = self.update_pixel(i);
            }
        }
    }

    #[inline]
    fn update_pixel(&self, i: usize) -> (f32, f32) {
        let ex = self.grad.ex.data[i];
        let ey = self.grad.ey.data[i];
        let et = self.grad.et.data[i];
        let ubar = self.ubar.data[i];
        let vbar = self.vbar.data[i];
        let denom = self.denom.data[i];
        if denom == 0.0 {
            return (ubar, vbar);
        }
        let common = (ex * ubar + ey * vbar + et) / denom;
        (ubar - ex * common, vbar - ey * common)
    }
}

/// Refine `init` with `iterations` vanilla Horn & Schunck passes.
pub fn solve(
    grad: &GradientField,
    init: FlowField,
    alpha: f32,
    iterations: usize,
) -> Result<FlowField> {
    FlowSolver::new(grad, alpha)?.run(init, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn uniform_gradient(w: usize, h: usize, ex: f32, ey: f32, et: f32) -> GradientField {
        GradientField {
            ex: ImageF32::filled(w, h, ex),
            ey: ImageF32::filled(w, h, ey),
            et: ImageF32::filled(w, h, et),
        }
    }

    #[test]
    fn negative_alpha_is_rejected() {
        let grad = GradientField::zeros(3, 3);
        assert!(matches!(
            FlowSolver::new(&grad, -1.0),
            Err(FlowError::InvalidParameters(_))
        ));
        assert!(FlowSolver::new(&grad, f32::NAN).is_err());
    }

    #[test]
    fn zero_alpha_flat_gradient_keeps_the_average() {
        // Ex = Ey = 0 and alpha = 0 would divide by zero without the guard.
        let grad = uniform_gradient(3, 3, 0.0, 0.0, 1.0);
        let init = FlowField::uniform(3, 3, 0.5, -0.25);
        let out = solve(&grad, init, 0.0, 4).unwrap();
        assert!(out.all_finite());
        for i in 0..9 {
            assert_abs_diff_eq!(out.u.data[i], 0.5, epsilon = 1e-6);
            assert_abs_diff_eq!(out.v.data[i], -0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn uniform_problem_contracts_towards_the_constraint_line() {
        // Ex = 1, Et = -1: the fixed point is u = 1. With alpha = 1 every pass
        // halves the distance to it.
        let grad = uniform_gradient(4, 3, 1.0, 0.0, -1.0);
        let mut solver = FlowSolver::new(&grad, 1.0).unwrap();
        let out = solver.run(FlowField::zeros(4, 3), 3).unwrap();
        assert_eq!(solver.passes(), 3);
        for i in 0..12 {
            assert_abs_diff_eq!(out.u.data[i], 0.875, epsilon = 1e-6);
            assert_eq!(out.v.data[i], 0.0);
        }
    }

    #[test]
    fn step_reads_only_the_previous_field() {
        let grad = uniform_gradient(3, 2, 0.0, 0.0, 0.0);
        let mut solver = FlowSolver::new(&grad, 1.0).unwrap();
        let mut current = FlowField::zeros(3, 2);
        current.u.set(0, 0, 12.0);
        let mut next = FlowField::zeros(3, 2);
        solver.step(&current, &mut next).unwrap();
        // With zero gradients the pass is a pure averaging of `current`.
        let expected = crate::averaging::local_average(&current.u);
        assert_eq!(next.u, expected);
        assert_eq!(current.u.get(0, 0), 12.0);
    }

    #[test]
    fn runs_on_one_solver_are_independent_budgets() {
        let grad = uniform_gradient(3, 3, 1.0, 0.0, -1.0);
        let mut solver = FlowSolver::new(&grad, 1.0).unwrap();
        let first = solver.run(FlowField::zeros(3, 3), 2).unwrap();
        let second = solver.run(first.clone(), 3).unwrap();
        assert_eq!(solver.passes(), 5);
        // The second run performs its own 3 passes, not 5.
        assert_eq!(second, solve(&grad, first, 1.0, 3).unwrap());
        assert_abs_diff_eq!(second.u.data[0], 1.0 - 0.5f32.powi(5), epsilon = 1e-6);
    }

    #[test]
    fn zero_iterations_return_the_seed() {
        let grad = uniform_gradient(2, 2, 1.0, 1.0, 1.0);
        let seed = FlowField::uniform(2, 2, 0.3, 0.7);
        let mut solver = FlowSolver::new(&grad, 2.0).unwrap();
        let out = solver.run(seed.clone(), 0).unwrap();
        assert_eq!(out, seed);
        assert_eq!(solver.passes(), 0);
    }

    #[test]
    fn seed_shape_is_checked() {
        let grad = GradientField::zeros(3, 3);
        let err = solve(&grad, FlowField::zeros(3, 4), 1.0, 1).unwrap_err();
        assert!(matches!(err, FlowError::DimensionMismatch(_)));
    }
}
