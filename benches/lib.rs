//! Performance benchmarks for the analysis pipeline
//!
//! ```bash
//! cargo bench            # run all
//! cargo bench lex        # tokenization only
//! cargo bench parse      # expression parsing only
//! ```

use criterion::{criterion_group, criterion_main, Criterion};
use structogram::frontend::core::lexer::TokenList;
use structogram::frontend::core::parser::parse_expression;
use structogram::frontend::typecheck::{infer_type, TypeRegistry};

const LINE: &str = "total <- pow(base, 2) * rates[i - 1] + offset.delta / 4.5e-3";

fn bench_lex(c: &mut Criterion) {
    c.bench_function("lex_line", |b| b.iter(|| TokenList::from_text(LINE)));
}

fn bench_lex_reconstruct(c: &mut Criterion) {
    let tokens = TokenList::from_text(LINE);
    c.bench_function("lex_reconstruct", |b| b.iter(|| tokens.to_text()));
}

fn bench_parse(c: &mut Criterion) {
    let tokens = TokenList::from_text(LINE);
    c.bench_function("parse_line", |b| {
        b.iter(|| {
            let mut tokens = tokens.clone();
            parse_expression(&mut tokens, None).unwrap()
        })
    });
}

fn bench_infer(c: &mut Criterion) {
    let mut tokens = TokenList::from_text(LINE);
    let expr = parse_expression(&mut tokens, None).unwrap().unwrap();
    c.bench_function("infer_line", |b| {
        b.iter(|| {
            let mut expr = expr.clone();
            let mut registry = TypeRegistry::new();
            infer_type(&mut expr, &mut registry, true)
        })
    });
}

criterion_group!(
    benches,
    bench_lex,
    bench_lex_reconstruct,
    bench_parse,
    bench_infer
);
criterion_main!(benches);
