//! Benchmarks for toggling markup.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use marktoggle::prelude::*;

fn bench_toggle_short_line(c: &mut Criterion) {
    c.bench_function("toggle_short_line", |b| {
        b.iter(|| toggle(black_box("hello world"), "**", "**", None).unwrap())
    });
}

fn bench_toggle_long_wrapped_line(c: &mut Criterion) {
    let line = format!("=={}==", "lorem ipsum ==dolor== sit amet ".repeat(200));
    c.bench_function("toggle_long_wrapped_line", |b| {
        b.iter(|| toggle(black_box(&line), "==", "==", None).unwrap())
    });
}

fn bench_dispatch_in_buffer(c: &mut Criterion) {
    let table = CommandTable::from_settings(&Settings::default());
    let text = "paragraph text here\n".repeat(500);
    c.bench_function("dispatch_in_buffer", |b| {
        b.iter(|| {
            let mut buf = EditorBuffer::from_text(&text);
            buf.move_to(250, 4);
            table.dispatch(black_box("mark-highlight"), &mut buf)
        })
    });
}

criterion_group!(
    benches,
    bench_toggle_short_line,
    bench_toggle_long_wrapped_line,
    bench_dispatch_in_buffer
);
criterion_main!(benches);
