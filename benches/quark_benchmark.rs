use std::{path::Path, time::Duration};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use postagger::{quark::Quark, Corpus};

fn quark(corpus: &Corpus) -> Quark {
    let mut quark = Quark::default();
    for (word, _) in corpus.stream() {
        quark.find_or_insert(word);
    }
    quark
}

fn quark_benchmark(c: &mut Criterion) {
    let corpus = Corpus::from_path(Path::new("tests/data/sample.txt")).expect("failed to read corpus");
    c.bench_function("quark", |b| b.iter(|| quark(black_box(&corpus))));
}

criterion_group! {
    name = benchmarks;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = quark_benchmark
}

criterion_main!(benchmarks);
