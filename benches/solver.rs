use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hornschunck::averaging::local_average_into;
use hornschunck::flow::{FlowField, FlowSolver};
use hornschunck::{compute_flow_multiscale, FlowParams, GradientMethod, ImageF32, MultiscaleOptions};

fn texture_pair(w: usize, h: usize) -> (ImageF32, ImageF32) {
    let render = |shift: f32| {
        ImageF32::from_fn(w, h, |x, y| {
            let xs = x as f32 - shift;
            128.0 + 60.0 * (xs * 0.21).sin() * (y as f32 * 0.17).cos()
        })
    };
    (render(0.0), render(0.6))
}

fn bench_gradients(c: &mut Criterion) {
    let (prev, curr) = texture_pair(640, 480);
    c.bench_function("gradient_forward_640x480", |b| {
        b.iter(|| GradientMethod::Forward.estimate(black_box(&prev), black_box(&curr)))
    });
    c.bench_function("gradient_central_640x480", |b| {
        b.iter(|| GradientMethod::Central.estimate(black_box(&prev), black_box(&curr)))
    });
}

fn bench_averaging(c: &mut Criterion) {
    let (field, _) = texture_pair(640, 480);
    let mut out = ImageF32::new(640, 480);
    c.bench_function("local_average_640x480", |b| {
        b.iter(|| local_average_into(black_box(&field), &mut out))
    });
}

fn bench_relaxation(c: &mut Criterion) {
    let (prev, curr) = texture_pair(640, 480);
    let grad = GradientMethod::Central
        .estimate(&prev, &curr)
        .expect("valid frames");
    c.bench_function("relaxation_10_passes_640x480", |b| {
        b.iter(|| {
            let mut solver = FlowSolver::new(&grad, 15.0).expect("valid alpha");
            solver.run(FlowField::zeros(640, 480), black_box(10))
        })
    });
}

fn bench_multiscale(c: &mut Criterion) {
    let (prev, curr) = texture_pair(320, 240);
    let params = FlowParams::new(15.0, 20).with_gradient_method(GradientMethod::Central);
    let options = MultiscaleOptions::default();
    c.bench_function("multiscale_3_levels_320x240", |b| {
        b.iter(|| compute_flow_multiscale(black_box(&prev), black_box(&curr), &params, &options))
    });
}

criterion_group!(
    benches,
    bench_gradients,
    bench_averaging,
    bench_relaxation,
    bench_multiscale
);
criterion_main!(benches);
