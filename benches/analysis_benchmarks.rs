//! Performance benchmarks for the frame analysis pipeline
//!
//! Run with: cargo bench
//!
//! Live analysis runs twice a second on full camera frames, so these track the
//! cost of one darkness pass, one blur pass and a complete assessment.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shutterguard::quality::FrameAnalyzer;
use shutterguard::testing::{sharp_frame, uniform_frame};
use shutterguard::{BlurAnalyzer, BrightnessAnalyzer, Timestamp};

const RESOLUTIONS: [(u32, u32); 3] = [(640, 480), (1280, 720), (1440, 1920)];

fn bench_brightness(c: &mut Criterion) {
    let mut group = c.benchmark_group("brightness");
    let analyzer = BrightnessAnalyzer::default();

    for (width, height) in RESOLUTIONS {
        let frame = sharp_frame(width, height);
        group.throughput(Throughput::Elements(frame.pixel_count() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &frame,
            |b, frame| b.iter(|| analyzer.analyze(black_box(frame))),
        );
    }

    group.finish();
}

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("blur");
    group.sample_size(20);
    let analyzer = BlurAnalyzer::default();

    for (width, height) in RESOLUTIONS {
        let frame = sharp_frame(width, height);
        group.throughput(Throughput::Elements(frame.pixel_count() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &frame,
            |b, frame| b.iter(|| analyzer.analyze(black_box(frame))),
        );
    }

    group.finish();
}

fn bench_assessment(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess");
    group.sample_size(20);
    let analyzer = FrameAnalyzer::default();

    // A dark frame skips the blur pass entirely.
    let bright = sharp_frame(1440, 1920);
    let dark = uniform_frame(1440, 1920, 10);

    group.bench_function("bright_1440x1920", |b| {
        b.iter(|| analyzer.assess(black_box(&bright), Timestamp::ZERO))
    });
    group.bench_function("dark_1440x1920", |b| {
        b.iter(|| analyzer.assess(black_box(&dark), Timestamp::ZERO))
    });

    group.finish();
}

criterion_group!(benches, bench_brightness, bench_blur, bench_assessment);
criterion_main!(benches);
