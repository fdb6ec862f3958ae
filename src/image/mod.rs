//! Single-channel image buffers used as frames and as flow/gradient planes.
//!
//! Everything is row-major with `stride == width`. `ImageU8` is a borrowed
//! 8-bit view handed in by callers; `ImageF32` is the owned float buffer the
//! rest of the crate computes on.

pub mod f32;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;
