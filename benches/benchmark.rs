//! Benchmarks for lexnorm

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lexnorm::*;
use std::sync::Arc;

/// Sample text for benchmarking
const SAMPLE_TEXT: &str = r#"
Machine learning is a subset of artificial intelligence (AI) that provides systems
the ability to automatically learn and improve from experience without being explicitly
programmed. Machine learning focuses on the development of computer programs that can
access data and use it to learn for themselves.

The process of learning begins with observations or data, such as examples, direct
experience, or instruction, in order to look for patterns in data and make better
decisions in the future based on the examples that we provide. Dr. Smith's children
weren't convinced; the geese were flying south and the mice had stopped running.
"#;

fn resources() -> Arc<LinguisticResources> {
    Arc::new(LinguisticResources::builtin().unwrap())
}

fn benchmark_tokenization(c: &mut Criterion) {
    let resources = resources();
    let tokenizer = Tokenizer::new(&resources);
    let doc = Document::new(SAMPLE_TEXT, LanguageTag::english());

    c.bench_function("tokenize_sample", |b| {
        b.iter(|| tokenizer.tokenize(black_box(&doc)).unwrap())
    });

    // Benchmark different document sizes
    let mut group = c.benchmark_group("tokenize_by_size");
    for repeat in [1usize, 4, 16] {
        let doc = Document::new(SAMPLE_TEXT.repeat(repeat), LanguageTag::english());
        group.throughput(Throughput::Bytes(doc.text().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &doc, |b, doc| {
            b.iter(|| tokenizer.tokenize(black_box(doc)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_lemmatizer(c: &mut Criterion) {
    let resources = resources();
    let lemmatizer = Lemmatizer::for_language(&resources, &LanguageTag::english()).unwrap();
    let words = [
        ("running", Some(PosTag::Verb)),
        ("geese", Some(PosTag::Noun)),
        ("happier", Some(PosTag::Adjective)),
        ("glorp", None),
        ("studies", None),
    ];

    c.bench_function("lemmatize_words", |b| {
        b.iter(|| {
            for (word, pos) in &words {
                black_box(lemmatizer.lemmatize(black_box(word), *pos));
            }
        })
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::new(resources(), PipelineConfig::default()).unwrap();

    c.bench_function("pipeline_full", |b| {
        b.iter(|| pipeline.run_text(black_box(SAMPLE_TEXT)).unwrap())
    });

    let docs: Vec<Document> = (0..64)
        .map(|_| Document::new(SAMPLE_TEXT, LanguageTag::english()))
        .collect();
    let mut group = c.benchmark_group("pipeline_batch");
    group.throughput(Throughput::Elements(docs.len() as u64));
    for threads in [1usize, 4] {
        let pipeline = Pipeline::new(
            resources(),
            PipelineConfig::default().with_runtime(RuntimeSpec::with_max_threads(threads)),
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(threads), &docs, |b, docs| {
            b.iter(|| pipeline.run_batch(black_box(docs)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_tokenization,
    benchmark_lemmatizer,
    benchmark_pipeline
);
criterion_main!(benches);
