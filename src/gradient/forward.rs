//! Averaged forward differences over the 2×2×2 spatio-temporal cube.
//!
//! For the cube anchored at `(x0, y0)` spanning both frames:
//!
//! ```text
//! Ex = 1/4 Σ_{t, dy} I_t(x0+1, y0+dy) - I_t(x0, y0+dy)
//! Ey = 1/4 Σ_{t, dx} I_t(x0+dx, y0+1) - I_t(x0+dx, y0)
//! ```
//!
//! The anchor is `(min(x, w-2), min(y, h-2))`, so pixels on the last column
//! (row) reuse the difference of the one before instead of reading outside
//! the frame.
use super::{check_frame_pair, temporal_difference, GradientField};
use crate::error::Result;
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Forward-difference gradient of a frame pair.
pub fn forward_gradient(previous: &ImageF32, current: &ImageF32) -> Result<GradientField> {
    check_frame_pair(previous, current)?;
    let (w, h) = (previous.w, previous.h);
    let mut out = GradientField::zeros(w, h);

    for y in 0..h {
        let y0 = y.min(h - 2);
        let rows = [
            previous.row(y0),
            previous.row(y0 + 1),
            current.row(y0),
            current.row(y0 + 1),
        ];
        let ex_row = out.ex.row_mut(y);
        for (x, dst) in ex_row.iter_mut().enumerate() {
            let x0 = x.min(w - 2);
            let sum: f32 = rows.iter().map(|r| r[x0 + 1] - r[x0]).sum();
            *dst = 0.25 * sum;
        }
        let ey_row = out.ey.row_mut(y);
        for (x, dst) in ey_row.iter_mut().enumerate() {
            let x0 = x.min(w - 2);
            let sum = (rows[1][x0] - rows[0][x0])
                + (rows[1][x0 + 1] - rows[0][x0 + 1])
                + (rows[3][x0] - rows[2][x0])
                + (rows[3][x0 + 1] - rows[2][x0 + 1]);
            *dst = 0.25 * sum;
        }
    }

    temporal_difference(previous, current, &mut out.et);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::forward_gradient;
    use crate::image::ImageF32;

    #[test]
    fn last_column_and_row_repeat_the_previous_difference() {
        // Quadratic in x so each forward difference is distinct.
        let img = ImageF32::from_fn(4, 3, |x, y| (x * x) as f32 + 3.0 * y as f32);
        let g = forward_gradient(&img, &img).unwrap();
        // Forward differences of x² at x0 = 0, 1, 2 are 1, 3, 5.
        assert_eq!(g.ex.get(0, 0), 1.0);
        assert_eq!(g.ex.get(1, 0), 3.0);
        assert_eq!(g.ex.get(2, 0), 5.0);
        assert_eq!(g.ex.get(3, 0), 5.0);
        assert_eq!(g.ex.get(3, 2), 5.0);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(g.ey.get(x, y), 3.0);
                assert_eq!(g.et.get(x, y), 0.0);
            }
        }
    }

    #[test]
    fn cube_averages_both_frames() {
        let prev = ImageF32::new(2, 2);
        let curr = ImageF32::from_vec(2, 2, vec![0.0, 4.0, 0.0, 4.0]).unwrap();
        let g = forward_gradient(&prev, &curr).unwrap();
        // Only the two current-frame differences are non-zero: (4 + 4) / 4.
        assert!(g.ex.data.iter().all(|&v| v == 2.0));
        assert!(g.ey.data.iter().all(|&v| v == 0.0));
        assert_eq!(g.et.data, vec![0.0, 4.0, 0.0, 4.0]);
    }
}
