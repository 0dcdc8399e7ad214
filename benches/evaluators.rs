use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dft_pipeline::config::GeneratorConfig;
use dft_pipeline::pipeline::{self, PipelineGraph};
use dft_pipeline::{fixed, float, Sign};
use num_complex::Complex64;
use std::hint::black_box;

fn input(n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|k| Complex64::new((k as f64 * 0.37).sin(), (k as f64 * 0.11).cos()))
        .collect()
}

fn float_evaluators(c: &mut Criterion) {
    fn runner<'a>(
        f: fn(&[Complex64], Sign) -> dft_pipeline::Result<Vec<Complex64>>,
        src: &'a [Complex64],
    ) -> Box<dyn FnMut() + 'a> {
        Box::new(move || {
            black_box(f(black_box(src), Sign::Positive).ok());
        })
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("float");

    for log_n in 4..11 {
        let src = input(1 << log_n);

        let runners: [(&str, Box<dyn FnMut()>); 4] = [
            ("brute_force", runner(float::brute_force, &src)),
            ("brute_force_table", runner(float::brute_force_table, &src)),
            ("recurse", runner(float::recurse, &src)),
            ("rustfft", runner(float::library_fft, &src)),
        ];

        for (name, mut runner) in runners {
            let id = BenchmarkId::new(name, format!("n={}", 1 << log_n));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| b.iter(&mut runner));
        }
    }
}

fn fixed_evaluators(c: &mut Criterion) {
    let mut b = c.benchmark_group("fixed");

    for log_n in 4..11 {
        let src = fixed::quantize::<24, 8>(&input(1 << log_n)).unwrap();
        let id = BenchmarkId::new("recurse", format!("n={}", 1 << log_n));
        b.bench_with_input(id, &src, |b, src| {
            b.iter(|| fixed::recurse(black_box(src), Sign::Positive).ok())
        });
        let id = BenchmarkId::new("brute_force_table", format!("n={}", 1 << log_n));
        b.bench_with_input(id, &src, |b, src| {
            b.iter(|| fixed::brute_force_table(black_box(src), Sign::Positive).ok())
        });
    }
}

fn generator(c: &mut Criterion) {
    let mut b = c.benchmark_group("generator");

    for log_n in [5, 8, 10] {
        let config = GeneratorConfig::new(1 << log_n, "bench");
        let id = BenchmarkId::new("build_and_render", format!("n={}", 1 << log_n));
        b.bench_with_input(id, &config, |b, config| {
            b.iter(|| {
                let graph = PipelineGraph::build(black_box(config)).unwrap();
                pipeline::render(&graph).unwrap().len()
            })
        });

        let graph = PipelineGraph::build(&config).unwrap();
        let src = vec![(256, -256); 1 << log_n];
        let id = BenchmarkId::new("simulate_index", format!("n={}", 1 << log_n));
        b.bench_with_input(id, &src, |b, src| {
            b.iter(|| pipeline::simulate(&graph, black_box(src), 1).ok())
        });
    }
}

criterion_group!(benches, float_evaluators, fixed_evaluators, generator);
criterion_main!(benches);
