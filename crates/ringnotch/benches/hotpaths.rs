use std::f32::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringnotch::{
    extract_candidates, filter_by_membership, filter_image, CandidateConfig, FilterSpec,
    MembershipThreshold, Notch, Signal,
};

fn make_striped_image(w: u32, h: u32, k: u32) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(7);
    let disks: Vec<(f32, f32, f32)> = (0..24)
        .map(|_| {
            (
                rng.gen_range(20.0..w as f32 - 20.0),
                rng.gen_range(20.0..h as f32 - 20.0),
                rng.gen_range(4.0..12.0),
            )
        })
        .collect();
    GrayImage::from_fn(w, h, |x, y| {
        let inside = disks.iter().any(|&(cx, cy, r)| {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            dx * dx + dy * dy <= r * r
        });
        let base = if inside { 180.0 } else { 80.0 };
        let stripe = 40.0 * (2.0 * PI * k as f32 * x as f32 / w as f32).cos();
        Luma([(base + stripe).round().clamp(0.0, 255.0) as u8])
    })
}

fn bench_filter(c: &mut Criterion) {
    let img_256 = make_striped_image(256, 256, 64);
    let img_640 = make_striped_image(640, 480, 80);
    let notch_256 = FilterSpec::ExplicitNotches(vec![Notch::new(128 + 64, 128, 2)]);
    let notch_640 = FilterSpec::ExplicitNotches(vec![Notch::new(320 + 80, 240, 3)]);

    c.bench_function("filter_256x256", |b| {
        b.iter(|| {
            let out = filter_image(black_box(&img_256), black_box(&notch_256), None)
                .expect("matching dimensions");
            black_box(out.filtered.width())
        })
    });

    c.bench_function("filter_640x480", |b| {
        b.iter(|| {
            let out = filter_image(black_box(&img_640), black_box(&notch_640), None)
                .expect("matching dimensions");
            black_box(out.filtered.width())
        })
    });
}

fn bench_extract(c: &mut Criterion) {
    let binary = GrayImage::from_fn(640, 480, |x, y| {
        let (cx, cy) = ((x % 64) as i32 - 32, (y % 64) as i32 - 32);
        Luma([if cx * cx + cy * cy <= 400 { 255 } else { 0 }])
    });
    let cfg = CandidateConfig::default();

    c.bench_function("extract_640x480_disk_grid", |b| {
        b.iter(|| {
            let ex = extract_candidates(black_box(&binary), black_box(&cfg), 42);
            black_box(ex.candidates.len())
        })
    });
}

fn bench_membership(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(12345);
    let signals: Vec<Signal> = (0..200)
        .map(|i| {
            Signal::new(
                (i % 20) as f64 * 30.0 + rng.gen_range(-2.0..2.0),
                (i / 20) as f64 * 30.0 + rng.gen_range(-2.0..2.0),
                10.0,
            )
        })
        .collect();

    c.bench_function("membership_200", |b| {
        b.iter(|| {
            let f = filter_by_membership(black_box(&signals), MembershipThreshold::GlobalStdDev)
                .expect("enough signals");
            black_box(f.retained.len())
        })
    });
}

criterion_group!(hotpaths, bench_filter, bench_extract, bench_membership);
criterion_main!(hotpaths);
