use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fz_core::{ColorMapper, FractalViewer, Palette, Pixel, Size, BURNING_SHIP, MANDELBROT};

criterion_main!(benches);
criterion_group!(benches, bench_full_render, bench_zoom_render);

fn new_viewer(fractal: &'static fz_core::Fractal, size: Size) -> FractalViewer {
    let mapper = ColorMapper::linear(Palette::rainbow_walk(16, 75).unwrap());
    FractalViewer::new(mapper, 16, fractal, size, None).unwrap()
}

/// The 220x240 fractal area of a 320x240 screen, as rendered from scratch.
pub fn bench_full_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("full-render");
    let size = Size {
        width: 220,
        height: 240,
    };
    // Count pixels:
    group.throughput(criterion::Throughput::Elements(
        size.width as u64 * size.height as u64,
    ));
    // Don't spend too long preparing:
    group.warm_up_time(Duration::from_secs(1));

    for fractal in [&MANDELBROT, &BURNING_SHIP] {
        group.bench_with_input(BenchmarkId::new(fractal.name, size.width), &size, |b, size| {
            b.iter_with_large_drop(|| {
                let mut viewer = new_viewer(fractal, *size);
                black_box(viewer.render_to_completion());
                viewer
            })
        });
    }

    group.finish();
}

/// A render after zooming in, which reuses a quarter of the pixels.
pub fn bench_zoom_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoom-render");
    let size = Size {
        width: 220,
        height: 240,
    };
    group.warm_up_time(Duration::from_secs(1));

    let mut rendered = new_viewer(&MANDELBROT, size);
    rendered.render_to_completion();

    group.bench_function("mandelbrot", |b| {
        b.iter_batched(
            || rendered.clone(),
            |mut viewer| {
                viewer.register_click(black_box(Pixel { x: 60, y: 120 }));
                viewer.render_to_completion();
                viewer
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}
