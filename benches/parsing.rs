//! Benchmarks for markdown parsing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdsync::document::ToMarkdown;
use mdsync::parse;

const SAMPLE: &str = "# Release notes\n\n\
Some **bold** and *italic* text with `code` and ~~old~~ bits.  \n\
A second line after a hard break.\n\n\
```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n\
1. first\n2. second\n\n\
- [x] done\n- [ ] todo\n";

fn bench_parse_simple(c: &mut Criterion) {
    let md = "# Hello\n\nWorld";
    c.bench_function("parse_simple", |b| b.iter(|| parse(black_box(md))));
}

fn bench_parse_medium(c: &mut Criterion) {
    let md = SAMPLE.repeat(50);
    c.bench_function("parse_medium", |b| b.iter(|| parse(black_box(&md))));
}

fn bench_round_trip(c: &mut Criterion) {
    let doc = parse(&SAMPLE.repeat(50));
    c.bench_function("render_markdown", |b| b.iter(|| black_box(&doc).markdown()));
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_medium,
    bench_round_trip
);
criterion_main!(benches);
