//! Benchmarks for outline reconstruction and ranking helpers.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic layouts so no PDF decoding is involved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docrank::outline::{clean, is_heading};
use docrank::rank::split_sentences;
use docrank::{build_outline, Block, LayoutDocument, Line, PageLayout, Span};

/// Creates a layout with one heading and a few body lines per page.
fn create_test_layout(page_count: u32) -> LayoutDocument {
    let mut doc = LayoutDocument::new();
    for n in 1..=page_count {
        let mut page = PageLayout::letter(n);
        page.add_block(Block::new(vec![Line::new(vec![Span::new(
            format!("Chapter {} Overview", n),
            "Helvetica-Bold",
            16.0,
            72.0,
        )])]));
        let lines = (0..20)
            .map(|i| {
                Line::new(vec![Span::new(
                    "Benchmark body content for docrank outline reconstruction measurement",
                    "Helvetica",
                    10.0,
                    100.0 + i as f32 * 12.0,
                )])
            })
            .collect();
        page.add_block(Block::new(lines));
        doc.add_page(page);
    }
    doc
}

/// Benchmark text normalization.
fn bench_clean(c: &mut Criterion) {
    let text = "E\u{fb03}cient\n\tﬁltering of caf\u{e9}   r\u{e9}sum\u{e9}s \u{2014} 2nd edition";

    c.bench_function("clean_text", |b| {
        b.iter(|| clean(black_box(text)));
    });

    c.bench_function("is_heading", |b| {
        b.iter(|| is_heading(black_box("Reaction Kinetics and Rate Laws")));
    });
}

/// Benchmark outline building at various sizes.
fn bench_build_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_outline");

    for page_count in [1, 10, 50].iter() {
        let doc = create_test_layout(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| build_outline(black_box(&doc)));
        });
    }

    group.finish();
}

/// Benchmark sentence splitting for snippet selection.
fn bench_split_sentences(c: &mut Criterion) {
    let content = "First sentence is here. Second one follows! Is this the third? ".repeat(50);

    c.bench_function("split_sentences", |b| {
        b.iter(|| split_sentences(black_box(&content)).len());
    });
}

criterion_group!(
    benches,
    bench_clean,
    bench_build_outline,
    bench_split_sentences,
);
criterion_main!(benches);
