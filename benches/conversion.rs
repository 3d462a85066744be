//! Benchmarks for the DocBook → AsciiDoc conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use doklet::{Document, StyleConfig, convert};

/// Build a synthetic book large enough to exercise the walk.
fn sample_book() -> String {
    let mut xml = String::from(
        "<!DOCTYPE book [<!ENTITY PRODUCT \"Widget\">]>\
         <book><bookinfo><title>Benchmark Book</title></bookinfo>",
    );
    for chapter in 0..20 {
        xml.push_str(&format!(
            "<chapter id=\"ch{chapter}\"><title>Chapter {chapter}</title>"
        ));
        for section in 0..5 {
            xml.push_str(&format!(
                "<section><title>Section {section}</title>\
                 <para>Text about &PRODUCT; with <emphasis>emphasis</emphasis> and \
                 <command>commands</command>, see <xref linkend=\"ch0\"/>.</para>\
                 <itemizedlist><listitem><para>first point</para></listitem>\
                 <listitem><para>second point</para></listitem></itemizedlist>\
                 <screen>output line one\n\noutput line two</screen>\
                 </section>"
            ));
        }
        xml.push_str("</chapter>");
    }
    xml.push_str("</book>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let xml = sample_book();
    c.bench_function("parse_docbook", |b| {
        b.iter(|| Document::from_xml_str(&xml).unwrap());
    });
}

fn bench_convert(c: &mut Criterion) {
    let xml = sample_book();
    let doc = Document::from_xml_str(&xml).unwrap();
    let style = StyleConfig::default();
    c.bench_function("convert_book", |b| {
        b.iter(|| convert(&doc, &style).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_convert);
criterion_main!(benches);
