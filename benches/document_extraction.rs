//! Document Extraction Benchmarks
//!
//! Kind detection and text extraction for the non-PDF paths.
//!
//! Run with: `cargo bench --bench document_extraction`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use docchat_server::document::{Document, DocumentKind, DOCX_MIME};
use docchat_server::extract::{Extractor, ExtractorConfig};
use docchat_server::ocr::{OcrService, OcrServiceConfig};
use docchat_server::pdf::MupdfEngine;

fn create_extractor() -> Extractor {
    Extractor::new(
        Arc::new(MupdfEngine::new()),
        Arc::new(OcrService::with_providers(OcrServiceConfig::default(), Vec::new())),
        ExtractorConfig::default(),
    )
}

/// Plain text of roughly `paragraphs` short paragraphs
fn create_text(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| format!("Paragraph {} of the quarterly report, with figures and notes.", i))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// DOCX package with one run per paragraph
fn create_docx(paragraphs: usize) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::{write::SimpleFileOptions, ZipWriter};

    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<w:p><w:r><w:t>Paragraph {} of the quarterly report,</w:t><w:tab/><w:t xml:space=\"preserve\"> with figures.</w:t></w:r></w:p>",
                i
            )
        })
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Benchmark kind detection
fn bench_kind_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("kind_detection");

    let cases = [
        ("pdf_label", "application/pdf", "upload"),
        ("docx_suffix", "application/octet-stream", "Letter.DOCX"),
        ("text_label", "text/markdown", "notes.md"),
        ("unsupported", "image/png", "image.png"),
    ];

    for (name, mime, file_name) in cases {
        group.bench_function(name, |b| {
            b.iter(|| DocumentKind::detect(black_box(mime), black_box(file_name)))
        });
    }

    group.finish();
}

/// Benchmark text and DOCX extraction
fn bench_extraction(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let extractor = create_extractor();

    let mut group = c.benchmark_group("extraction");
    group.measurement_time(Duration::from_secs(10));

    for paragraphs in [10, 1_000] {
        let text = Document::new("notes.txt", "text/plain", create_text(paragraphs).into_bytes());
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("text", paragraphs), &text, |b, doc| {
            b.iter(|| {
                let result = rt.block_on(extractor.extract(black_box(doc), None));
                black_box(result)
            })
        });

        let docx = Document::new("report.docx", DOCX_MIME, create_docx(paragraphs));
        group.throughput(Throughput::Bytes(docx.len() as u64));
        group.bench_with_input(BenchmarkId::new("docx", paragraphs), &docx, |b, doc| {
            b.iter(|| {
                let result = rt.block_on(extractor.extract(black_box(doc), None));
                black_box(result)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kind_detection, bench_extraction);
criterion_main!(benches);
