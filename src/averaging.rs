//! Horn & Schunck neighbourhood average of a flow component.
//!
//! ```text
//!  1   | 1 2 1 |
//! -- * | 2 0 2 |
//! 12   | 1 2 1 |
//! ```
//!
//! Direct neighbours weigh 1/6, diagonal neighbours 1/12, the centre is
//! excluded. On the border only in-bounds neighbours contribute and the
//! weights are re-normalized over them, so a constant field stays constant
//! everywhere. Nothing wraps around and nothing is padded with zeros.
use crate::error::{ensure_same_dims, Result};
use crate::image::{ImageF32, ImageView};

/// Relative weight of the up/down/left/right neighbours.
const DIRECT_WEIGHT: f32 = 2.0;
/// Relative weight of the diagonal neighbours.
const DIAGONAL_WEIGHT: f32 = 1.0;

#[derive(Default)]
struct WeightedSum {
    sum: f32,
    weight: f32,
}

impl WeightedSum {
    #[inline]
    fn push(&mut self, value: f32, weight: f32) {
        self.sum += weight * value;
        self.weight += weight;
    }

    #[inline]
    fn mean_or(&self, fallback: f32) -> f32 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            fallback
        }
    }
}

/// Normalized 3×3 weights applied at `(x, y)` of a `w × h` field.
///
/// `stencil[dy + 1][dx + 1]` is the weight of neighbour `(x + dx, y + dy)`;
/// out-of-bounds entries are zero.
pub fn stencil(w: usize, h: usize, x: usize, y: usize) -> [[f32; 3]; 3] {
    let mut raw = [[0.0f32; 3]; 3];
    let mut total = 0.0f32;
    for (ky, row) in raw.iter_mut().enumerate() {
        for (kx, cell) in row.iter_mut().enumerate() {
            if kx == 1 && ky == 1 {
                continue;
            }
            let in_x = (x + kx).checked_sub(1).is_some_and(|xx| xx < w);
            let in_y = (y + ky).checked_sub(1).is_some_and(|yy| yy < h);
            if in_x && in_y {
                let weight = if kx == 1 || ky == 1 {
                    DIRECT_WEIGHT
                } else {
                    DIAGONAL_WEIGHT
                };
                *cell = weight;
                total += weight;
            }
        }
    }
    if total > 0.0 {
        for cell in raw.iter_mut().flatten() {
            *cell /= total;
        }
    }
    raw
}

/// Neighbourhood average of `field`, freshly allocated.
pub fn local_average(field: &ImageF32) -> ImageF32 {
    let mut out = ImageF32::new(field.w, field.h);
    fill_average(field, &mut out);
    out
}

/// Neighbourhood average of `field` written into `out`. `out` must not alias
/// `field`, which the borrow rules already guarantee.
pub fn local_average_into(field: &ImageF32, out: &mut ImageF32) -> Result<()> {
    ensure_same_dims("averaging output", field.dims(), out.dims())?;
    fill_average(field, out);
    Ok(())
}

/// Caller guarantees `out` has the shape of `field`.
pub(crate) fn fill_average(field: &ImageF32, out: &mut ImageF32) {
    let w = field.w;
    if w == 0 || field.h == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| average_row(field, y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in out.data.chunks_mut(w).enumerate() {
            average_row(field, y, row);
        }
    }
}

/// Averages row `y` of `field` into `out` (`out.len() == field.w`).
fn average_row(field: &ImageF32, y: usize, out: &mut [f32]) {
    let (w, h) = (field.w, field.h);
    let up = (y > 0).then(|| field.row(y - 1));
    let mid = field.row(y);
    let down = (y + 1 < h).then(|| field.row(y + 1));

    for (x, dst) in out.iter_mut().enumerate() {
        let left = x.checked_sub(1);
        let right = (x + 1 < w).then_some(x + 1);
        let mut acc = WeightedSum::default();
        if let Some(l) = left {
            acc.push(mid[l], DIRECT_WEIGHT);
        }
        if let Some(r) = right {
            acc.push(mid[r], DIRECT_WEIGHT);
        }
        for row in [up, down].into_iter().flatten() {
            acc.push(row[x], DIRECT_WEIGHT);
            if let Some(l) = left {
                acc.push(row[l], DIAGONAL_WEIGHT);
            }
            if let Some(r) = right {
                acc.push(row[r], DIAGONAL_WEIGHT);
            }
        }
        *dst = acc.mean_or(mid[x]);
    }
}
