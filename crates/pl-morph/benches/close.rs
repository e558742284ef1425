use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pl_core::Image;
use pl_morph::close_binary_u8;

fn synthetic_glyph(width: usize, height: usize) -> Image<u8> {
    Image::binary_from_fn(width, height, |x, y| {
        let bar = (x % 97) < 22 && y > 40 && y < height - 40;
        let stripe = (y % 61) < 18 && x > 30 && x < width - 30;
        // Hairline gaps for the closing to bridge.
        (bar || stripe) && x % 53 != 0
    })
}

fn bench_close(c: &mut Criterion) {
    let img = synthetic_glyph(800, 600);

    for r in [1usize, 3, 8] {
        c.bench_function(&format!("pl_morph_close_800x600_r{r}"), |b| {
            b.iter(|| {
                let out = close_binary_u8(black_box(&img.as_view()), black_box(r));
                black_box(out.len());
            });
        });
    }
}

criterion_group!(benches, bench_close);
criterion_main!(benches);
