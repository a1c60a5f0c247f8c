// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the blattwerk-page crate. Serialization dominates
// processor output cost, so the benchmarks cover a representative document
// with many regions and lines, plus the points-string codec on its own.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use blattwerk_core::geometry::BoundingBox;
use blattwerk_page::{Coords, PcGts, TextLine, TextRegion, io, points};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Build a document shaped like a densely segmented page: 50 text regions
/// with 10 lines each.
fn dense_doc() -> PcGts {
    let mut doc = PcGts::for_image("IMG/p0001.png", 2481, 3508);
    doc.page.set_border_bbox(&BoundingBox::new(80, 120, 2400, 3400));
    for r in 0..50 {
        let top = 120 + r * 64;
        let mut region = TextRegion {
            id: format!("r{:04}", r),
            orientation: None,
            reading_direction: None,
            text_line_order: None,
            alternative_images: Vec::new(),
            coords: Coords {
                points: points::points_from_bbox(&BoundingBox::new(
                    100,
                    top,
                    2380,
                    top + 60,
                )),
            },
            text_lines: Vec::new(),
        };
        for l in 0..10 {
            let line_top = top + l * 6;
            region.text_lines.push(TextLine {
                id: format!("r{:04}_line{:04}", r, l),
                coords: Coords {
                    points: points::points_from_bbox(&BoundingBox::new(
                        100,
                        line_top,
                        2380,
                        line_top + 5,
                    )),
                },
            });
        }
        doc.page.text_regions.push(region);
    }
    doc
}

fn bench_serialize_dense_page(c: &mut Criterion) {
    let doc = dense_doc();
    c.bench_function("page_to_xml (50 regions x 10 lines)", |b| {
        b.iter(|| {
            let xml = io::to_xml(black_box(&doc)).unwrap();
            black_box(xml);
        });
    });
}

fn bench_parse_dense_page(c: &mut Criterion) {
    let xml = io::to_xml(&dense_doc()).unwrap();
    c.bench_function("page_from_xml (50 regions x 10 lines)", |b| {
        b.iter(|| {
            let doc = io::from_xml(black_box(&xml)).unwrap();
            black_box(doc);
        });
    });
}

fn bench_points_codec(c: &mut Criterion) {
    let s = "100,150 2380,150 2380,900 100,900";
    c.bench_function("bbox_from_points", |b| {
        b.iter(|| {
            let bbox = points::bbox_from_points(black_box(s)).unwrap();
            black_box(bbox);
        });
    });
}

criterion_group!(
    benches,
    bench_serialize_dense_page,
    bench_parse_dense_page,
    bench_points_codec
);
criterion_main!(benches);
