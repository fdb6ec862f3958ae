use hornschunck::{compute_flow, FlowParams, GradientMethod, ImageF32, ImageU8};

fn main() {
    // Demo stub: two 8-bit frames of a horizontal ramp, the second shifted
    // one pixel to the right.
    let (w, h) = (64usize, 48usize);
    let prev: Vec<u8> = (0..w * h).map(|i| (i % w) as u8 * 2).collect();
    let curr: Vec<u8> = (0..w * h)
        .map(|i| ((i % w) as u8 * 2).saturating_sub(2))
        .collect();
    let prev = ImageF32::from_u8(&ImageU8::packed(w, h, &prev));
    let curr = ImageF32::from_u8(&ImageU8::packed(w, h, &curr));

    let params = FlowParams::new(10.0, 200).with_gradient_method(GradientMethod::Central);
    match compute_flow(&prev, &curr, &params) {
        Ok(flow) => {
            let mean = flow.mean_vector();
            println!(
                "mean flow=({:.3}, {:.3}) max speed={:.3}",
                mean.x,
                mean.y,
                flow.max_magnitude()
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
