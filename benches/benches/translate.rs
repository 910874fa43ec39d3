//! Benchmarks for parsing, lowering and rendering.
//!
//! Run with: cargo bench -p formulate-bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use formulate::{Dialect, FormulateConfig, translate};

/// A left-leaning sum of `terms` square roots.
fn wide_formula(terms: usize) -> String {
    (0..terms)
        .map(|i| format!("TMath::Sqrt(x{i}^2 + y{i}^2)"))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_root");

    for terms in [1, 10, 50] {
        let source = wide_formula(terms);
        group.bench_with_input(BenchmarkId::from_parameter(terms), &source, |b, source| {
            b.iter(|| formulate::parse_root(black_box(source)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let expr = match formulate::parse_root(&wide_formula(50)) {
        Ok(expr) => expr,
        Err(err) => panic!("benchmark formula does not parse: {err}"),
    };

    for dialect in [Dialect::Root, Dialect::Numexpr, Dialect::Python] {
        group.bench_with_input(BenchmarkId::from_parameter(dialect), &expr, |b, expr| {
            b.iter(|| expr.render(black_box(dialect), &Default::default()))
        });
    }

    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let config = FormulateConfig::default();
    let source = "Sum$(pt > 20 && abs(eta) < 2.4) >= 2 && MaxIf$(pt, abs(eta) < 2.4) > 50";

    c.bench_function("translate_ttreeformula_to_python", |b| {
        b.iter(|| {
            translate(
                black_box(source),
                Dialect::TTreeFormula,
                Dialect::Python,
                &config,
            )
        })
    });
}

criterion_group!(benches, bench_parse, bench_render, bench_translate);
criterion_main!(benches);
