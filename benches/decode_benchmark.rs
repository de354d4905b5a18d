use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use postagger::{Corpus, DecodeOptions, Model, Tagger, TaggerKind, Trainer};

fn predict(tagger: &dyn Tagger, corpus: &Corpus) {
    for sentence in corpus.sentences() {
        let words: Vec<&str> = sentence.words().iter().map(String::as_str).collect();
        let mut n = 0;
        if let Ok(tags) = tagger.tag(&words) {
            for (label, pred) in sentence.tags().iter().zip(tags) {
                if *label != pred {
                    n += 1;
                }
            }
        }
        black_box(n);
    }
}

fn decode_benchmark(c: &mut Criterion) {
    let corpus = Corpus::from_path(Path::new("tests/data/sample.txt")).expect("failed to read corpus");
    let mut trainer = Trainer::new();
    trainer.append_corpus(&corpus).expect("failed to append corpus");
    let model = Model::from_trainer(&trainer).expect("failed to train");
    let options = DecodeOptions::default();

    let hmm = model.tagger(TaggerKind::Hmm, options);
    c.bench_function("viterbi", |b| b.iter(|| predict(black_box(hmm.as_ref()), black_box(&corpus))));
    let baseline = model.tagger(TaggerKind::Baseline, options);
    c.bench_function("mfc", |b| b.iter(|| predict(black_box(baseline.as_ref()), black_box(&corpus))));
}

criterion_group!(benchmarks, decode_benchmark);
criterion_main!(benchmarks);
