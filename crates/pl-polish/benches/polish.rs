use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pl_core::{Point2, Stroke};
use pl_polish::{PolishConfig, polish_strokes};

/// Pixel-center staircases approximating a spiral, as the tracer emits them.
fn synthetic_strokes(count: usize, points_per_stroke: usize) -> Vec<Stroke> {
    (0..count)
        .map(|k| {
            let pts = (0..points_per_stroke)
                .map(|i| {
                    let t = i as f64 * 0.02;
                    let r = 5.0 + 0.3 * t + k as f64;
                    let x = (r * t.cos() / 0.1).round() * 0.1 + 0.05;
                    let y = (r * t.sin() / 0.1).round() * 0.1 + 0.05;
                    Point2::new(x, y)
                })
                .collect();
            Stroke::new(pts)
        })
        .collect()
}

fn bench_polish(c: &mut Criterion) {
    let strokes = synthetic_strokes(40, 500);
    let cfg = PolishConfig::default();

    c.bench_function("pl_polish_40x500", |b| {
        b.iter(|| {
            let out = polish_strokes(black_box(&strokes), black_box(&cfg));
            black_box(out.len());
        });
    });
}

criterion_group!(benches, bench_polish);
criterion_main!(benches);
