use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cherry_core::parser::tokenizer::{TokenKind, Tokenizer};

fn sample(sections: usize) -> String {
    let mut source = String::new();
    for s in 0..sections {
        source.push_str(&format!("@ Section{}:\n", s));
        source.push_str("set \"a string with \\\"escapes\\\"\\n\", title\n");
        source.push_str("set -1234.5678, offset\n");
        source.push_str("set yes, enabled\n");
        source.push_str("set { 255, 128, 0, }, color ; trailing comment\n");
    }
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample(200);
    c.bench_function("tokenize_200_sections", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::new(black_box(&source));
            let mut count = 0usize;
            while tokenizer.next_token().kind != TokenKind::EndOfInput {
                count += 1;
            }
            count
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = sample(200);
    c.bench_function("parse_200_sections", |b| {
        b.iter(|| cherry_core::parse(black_box(&source)))
    });
}

criterion_group!(benches, bench_tokenize, bench_parse);
criterion_main!(benches);
