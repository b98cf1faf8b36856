use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use extract_core::{Classification, Point, ScoringCfg, Tool, TrimState, compute_bonus, line_deviation};

// Jittered horizontal stroke: xorshift noise on y, evenly spaced x.
fn synth_stroke(n: usize, amp: f32, seed: u32) -> Vec<Point> {
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    (0..n)
        .map(|i| Point::new(i as f32, (next_f32() * 2.0 - 1.0) * amp))
        .collect()
}

fn configure(g: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    // BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p extract_core --bench scoring
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }
}

pub fn bench_line_deviation(c: &mut Criterion) {
    let mut g = c.benchmark_group("line_deviation");
    configure(&mut g);
    for &n in &[16usize, 256, 4096] {
        let path = synth_stroke(n, 5.0, 0xC0FFEE);
        let end = Point::new(n as f32, 0.0);
        g.bench_function(format!("samples_{n}"), |b| {
            b.iter(|| {
                let d = line_deviation(black_box(Point::default()), black_box(end), black_box(&path));
                black_box(d);
            })
        });
    }
    g.finish();
}

pub fn bench_compute_bonus(c: &mut Criterion) {
    let mut g = c.benchmark_group("compute_bonus");
    configure(&mut g);
    let cfg = ScoringCfg::default();
    let path = synth_stroke(64, 3.0, 7);
    let end = Point::new(64.0, 0.0);

    let mut state = TrimState::new();
    state.record_tool_use(Tool::Scraper);
    for _ in 0..12 {
        state.record_scrape_stroke(Point::default(), end, &path);
    }

    for classification in [
        Classification::RootCut,
        Classification::WoodGrind,
        Classification::RindScrape,
    ] {
        g.bench_function(classification.name(), |b| {
            b.iter_batched(
                || state.clone(),
                |s| black_box(compute_bonus(classification, &s, &cfg)),
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(scoring, bench_line_deviation, bench_compute_bonus);
criterion_main!(scoring);
