use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use anyver::version::AnyVer;
use anyver::version::parser::parse;
use std::str::FromStr;

pub fn bench_version_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("version_parsing");

    // Benchmark plain dotted version
    group.bench_function("dotted", |b| b.iter(|| parse(black_box("1.6.2"))));

    // Benchmark components embedded in text
    group.bench_function("embedded_text", |b| {
        b.iter(|| parse(black_box("20190405ubuntu1")))
    });

    // Benchmark hash detection
    group.bench_function("hash_suffix", |b| {
        b.iter(|| parse(black_box("2019-10-16 0A7FF")))
    });

    // Benchmark full packaging-style string
    group.bench_function("packaging_string", |b| {
        b.iter(|| parse(black_box("1.6.2+git20170426.d24a630-2ubuntu1")))
    });

    // Benchmark rendering parsed values back to text
    let inputs = [
        ("short", "1.6.2"),
        ("dated", "2019-10-16 0A7FF"),
        ("long", "1.6.2+git20170426.d24a630-2ubuntu1"),
    ];

    for (name, input) in inputs {
        let version = AnyVer::from_str(input).unwrap();
        group.bench_with_input(BenchmarkId::new("render", name), &version, |b, v| {
            b.iter(|| black_box(v).to_string())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_version_parsing);
criterion_main!(benches);
