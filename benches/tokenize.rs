use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use xmltok::{tokenize, EntityTable, Token, Tokenizer};

fn sample_document(items: usize) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><feed>");
    for i in 0..items {
        doc.push_str(&format!(
            "<entry id=\"{i}\" kind='item'><title>Entry &amp; title {i}</title>\
             <!--cached--><body><![CDATA[raw <payload> {i}]]></body></entry>"
        ));
    }
    doc.push_str("</feed>");
    doc
}

fn bench_tokenize(c: &mut Criterion) {
    let doc = sample_document(200);

    c.bench_function("tokenize_document", |b| {
        b.iter(|| tokenize(black_box(&doc)).expect("well-formed"))
    });

    let table = EntityTable::predefined();
    c.bench_function("pull_tokens", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::new(black_box(&doc), &table);
            let mut count = 0usize;
            loop {
                match tokenizer.next_token().expect("well-formed") {
                    Token::EndOfFile => break,
                    _ => count += 1,
                }
            }
            count
        })
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
