use hornschunck::ImageF32;

/// Horizontal ramp `I = x` and the same ramp moved `shift` pixels right.
pub fn ramp_pair(width: usize, height: usize, shift: f32) -> (ImageF32, ImageF32) {
    let prev = ImageF32::from_fn(width, height, |x, _| x as f32);
    let curr = ImageF32::from_fn(width, height, |x, _| x as f32 - shift);
    (prev, curr)
}

/// Smooth `sin(kx)·cos(ky)` texture, the second frame translated by
/// `(shift_x, shift_y)`.
pub fn sinusoid_pair(
    width: usize,
    height: usize,
    period: f32,
    shift_x: f32,
    shift_y: f32,
) -> (ImageF32, ImageF32) {
    let k = std::f32::consts::TAU / period;
    let render = |t: f32| {
        ImageF32::from_fn(width, height, |x, y| {
            let xs = x as f32 - t * shift_x;
            let ys = y as f32 - t * shift_y;
            100.0 + 50.0 * (k * xs).sin() * (k * ys).cos()
        })
    };
    (render(0.0), render(1.0))
}

/// High-contrast 8-bit checkerboard.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let parity = (x / cell + y / cell) & 1;
            img[y * width + x] = if parity == 0 { 32 } else { 220 };
        }
    }
    img
}

/// Deterministic pseudo-random texture in `[0, 255)`.
pub fn noise_frame(width: usize, height: usize, seed: u32) -> ImageF32 {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    ImageF32::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state % 255) as f32
    })
}
