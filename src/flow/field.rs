use crate::error::{ensure_same_dims, Result};
use crate::image::{ImageF32, ImageView};
use nalgebra::Vector2;

/// Dense motion field: horizontal `u` and vertical `v` velocity per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    pub u: ImageF32,
    pub v: ImageF32,
}

impl FlowField {
    /// Zero motion everywhere.
    pub fn zeros(w: usize, h: usize) -> Self {
        Self {
            u: ImageF32::new(w, h),
            v: ImageF32::new(w, h),
        }
    }

    /// Same vector `(u, v)` at every pixel.
    pub fn uniform(w: usize, h: usize, u: f32, v: f32) -> Self {
        Self {
            u: ImageF32::filled(w, h, u),
            v: ImageF32::filled(w, h, v),
        }
    }

    /// Pair two component planes; they must share a shape.
    pub fn from_components(u: ImageF32, v: ImageF32) -> Result<Self> {
        ensure_same_dims("vertical flow component", u.dims(), v.dims())?;
        Ok(Self { u, v })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.u.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.u.h
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.u.w, self.u.h)
    }

    /// Flow vector at `(x, y)`.
    #[inline]
    pub fn vector_at(&self, x: usize, y: usize) -> Vector2<f32> {
        Vector2::new(self.u.get(x, y), self.v.get(x, y))
    }

    /// Per-pixel speed `sqrt(u² + v²)`.
    pub fn magnitude(&self) -> ImageF32 {
        let data = self
            .u
            .data
            .iter()
            .zip(&self.v.data)
            .map(|(&u, &v)| u.hypot(v))
            .collect();
        ImageF32 {
            w: self.u.w,
            h: self.u.h,
            stride: self.u.w,
            data,
        }
    }

    /// Mean flow vector over the whole field.
    pub fn mean_vector(&self) -> Vector2<f32> {
        Vector2::new(self.u.mean() as f32, self.v.mean() as f32)
    }

    /// Largest per-pixel speed, zero for an empty field.
    pub fn max_magnitude(&self) -> f32 {
        self.magnitude().data.into_iter().fold(0.0, f32::max)
    }

    pub fn all_finite(&self) -> bool {
        self.u.all_finite() && self.v.all_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::FlowField;
    use crate::image::ImageF32;

    #[test]
    fn components_must_share_a_shape() {
        let u = ImageF32::new(3, 2);
        let v = ImageF32::new(2, 3);
        assert!(FlowField::from_components(u.clone(), v).is_err());
        let f = FlowField::from_components(u.clone(), u).unwrap();
        assert_eq!(f.dims(), (3, 2));
    }

    #[test]
    fn vector_statistics() {
        let mut f = FlowField::uniform(2, 2, 3.0, 4.0);
        assert_eq!(f.vector_at(1, 1).norm(), 5.0);
        f.u.set(0, 0, 0.0);
        f.v.set(0, 0, 0.0);
        assert_eq!(f.max_magnitude(), 5.0);
        let mean = f.mean_vector();
        assert_eq!(mean.x, 2.25);
        assert_eq!(mean.y, 3.0);
    }
}
