use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Mat4;

use gpu_debug_draw::{
    CommandBufferHandle, DebugDraw, DummyBackend, TextureFormat, TextureHandle,
};

fn new_engine() -> DebugDraw {
    DebugDraw::new(
        Box::new(DummyBackend::new()),
        TextureFormat::Bgra8Unorm,
        TextureFormat::Depth32Float,
    )
    .expect("engine construction")
}

// ---------------------------------------------------------------------------
// Batching
// ---------------------------------------------------------------------------

fn bench_line_enqueue(c: &mut Criterion) {
    let mut engine = new_engine();
    c.bench_function("enqueue_1000_lines", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let x = i as f32;
                engine
                    .draw_line(black_box([x, 0.0, 0.0]), black_box([x, 1.0, 0.0]))
                    .unwrap();
            }
            engine
                .submit(
                    CommandBufferHandle(1),
                    TextureHandle(2),
                    None,
                    &Mat4::IDENTITY,
                )
                .unwrap();
        });
    });
}

fn bench_mixed_frame(c: &mut Criterion) {
    let mut engine = new_engine();
    c.bench_function("mixed_frame_submit", |b| {
        b.iter(|| {
            for i in 0..50 {
                let x = i as f32;
                engine.draw_line([x, 0.0, 0.0], [x, 1.0, 0.0]).unwrap();
                engine.draw_point([x, 2.0, 0.0], 0.25).unwrap();
                engine.draw_box([x, 3.0, 0.0], [x + 1.0, 4.0, 1.0]).unwrap();
            }
            engine
                .submit(
                    CommandBufferHandle(1),
                    TextureHandle(2),
                    Some(TextureHandle(3)),
                    &Mat4::IDENTITY,
                )
                .unwrap();
        });
    });
}

// ---------------------------------------------------------------------------
// Text tessellation
// ---------------------------------------------------------------------------

fn bench_render_text(c: &mut Criterion) {
    c.bench_function("render_text_pangram", |b| {
        b.iter(|| {
            black_box(gpu_debug_draw::render_text(
                black_box("The quick brown fox jumps over the lazy dog 0123456789"),
                0,
                0,
                12,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_line_enqueue,
    bench_mixed_frame,
    bench_render_text
);
criterion_main!(benches);
