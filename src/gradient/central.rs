//! Centered differences averaged across the two frames.
//!
//! `Ex(x, y) = ½ (D_x previous + D_x current)` with
//! `D_x I = (I[x+1] - I[x-1]) / 2` in the interior and the one-sided
//! `I[1] - I[0]` / `I[w-1] - I[w-2]` on the first / last column. `Ey` is the
//! same along y. `Et = current - previous`, i.e. the derivative at the half
//! step where the frame-averaged spatial terms live.
use super::{check_frame_pair, temporal_difference, GradientField};
use crate::error::Result;
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Central-difference gradient of a frame pair.
pub fn central_gradient(previous: &ImageF32, current: &ImageF32) -> Result<GradientField> {
    check_frame_pair(previous, current)?;
    let (w, h) = (previous.w, previous.h);
    let mut out = GradientField::zeros(w, h);

    for y in 0..h {
        let (ym, yp) = neighbors(y, h);
        let dy_span = (yp - ym) as f32;
        let prev_rows = [previous.row(ym), previous.row(y), previous.row(yp)];
        let curr_rows = [current.row(ym), current.row(y), current.row(yp)];

        let ex_row = out.ex.row_mut(y);
        for (x, dst) in ex_row.iter_mut().enumerate() {
            let (xm, xp) = neighbors(x, w);
            let span = (xp - xm) as f32;
            let dp = (prev_rows[1][xp] - prev_rows[1][xm]) / span;
            let dc = (curr_rows[1][xp] - curr_rows[1][xm]) / span;
            *dst = 0.5 * (dp + dc);
        }

        let ey_row = out.ey.row_mut(y);
        for (x, dst) in ey_row.iter_mut().enumerate() {
            let dp = (prev_rows[2][x] - prev_rows[0][x]) / dy_span;
            let dc = (curr_rows[2][x] - curr_rows[0][x]) / dy_span;
            *dst = 0.5 * (dp + dc);
        }
    }

    temporal_difference(previous, current, &mut out.et);
    Ok(out)
}

/// In-bounds `(i - 1, i + 1)` with one-sided fallback at either end.
#[inline]
pub(crate) fn neighbors(i: usize, len: usize) -> (usize, usize) {
    (i.saturating_sub(1), (i + 1).min(len - 1))
}

#[cfg(test)]
mod tests {
    use super::{central_gradient, neighbors};
    use crate::image::ImageF32;

    #[test]
    fn border_falls_back_to_one_sided_differences() {
        assert_eq!(neighbors(0, 5), (0, 1));
        assert_eq!(neighbors(2, 5), (1, 3));
        assert_eq!(neighbors(4, 5), (3, 4));

        let img = ImageF32::from_fn(4, 2, |x, _| (x * x) as f32);
        let g = central_gradient(&img, &img).unwrap();
        // x²: one-sided at 0 → 1, centered at 1 → 2, at 2 → 4, one-sided at 3 → 5.
        let row: Vec<f32> = (0..4).map(|x| g.ex.get(x, 1)).collect();
        assert_eq!(row, vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn spatial_terms_average_both_frames() {
        let prev = ImageF32::from_fn(3, 3, |_, y| y as f32);
        let curr = ImageF32::from_fn(3, 3, |_, y| 3.0 * y as f32);
        let g = central_gradient(&prev, &curr).unwrap();
        assert!(g.ey.data.iter().all(|&v| v == 2.0));
        assert!(g.ex.data.iter().all(|&v| v == 0.0));
        assert_eq!(g.et.get(1, 2), 4.0);
    }
}
