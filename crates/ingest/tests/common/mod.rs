//! Fixture PDFs built in memory with lopdf.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Write a PDF with one page per entry of `pages`.
pub fn write_pdf(path: &Path, pages: &[Vec<Operation>]) {
    let streams: Vec<Stream> = pages.iter().map(|ops| plain_stream(ops)).collect();
    write_pdf_streams(path, streams);
}

/// Like `write_pdf`, but page `broken` gets a content stream whose filter
/// lopdf cannot decode.
pub fn write_pdf_with_broken_page(path: &Path, pages: &[Vec<Operation>], broken: usize) {
    let streams: Vec<Stream> = pages
        .iter()
        .enumerate()
        .map(|(i, ops)| {
            if i == broken {
                Stream::new(
                    dictionary! { "Filter" => "JBIG2Decode" },
                    b"BT /F1 12 Tf (lost) Tj ET".to_vec(),
                )
            } else {
                plain_stream(ops)
            }
        })
        .collect();
    write_pdf_streams(path, streams);
}

fn plain_stream(operations: &[Operation]) -> Stream {
    let content = Content {
        operations: operations.to_vec(),
    };
    Stream::new(dictionary! {}, content.encode().unwrap())
}

fn write_pdf_streams(path: &Path, streams: Vec<Stream>) {
    let page_count = streams.len();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for stream in streams {
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).unwrap();
}

/// One text object drawing `text` at `(x, y)`.
pub fn text_at(x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// One text object laying out `rows` as a grid, 150pt per column, 20pt per row.
pub fn grid_at(x: i64, y: i64, rows: &[&[&str]]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
    ];

    for (r, row) in rows.iter().enumerate() {
        if r > 0 {
            let back = -150 * (rows[r - 1].len() as i64 - 1);
            ops.push(Operation::new("Td", vec![back.into(), (-20).into()]));
        }
        for (c, cell) in row.iter().enumerate() {
            if c > 0 {
                ops.push(Operation::new("Td", vec![150.into(), 0.into()]));
            }
            ops.push(Operation::new("Tj", vec![Object::string_literal(*cell)]));
        }
    }

    ops.push(Operation::new("ET", vec![]));
    ops
}
