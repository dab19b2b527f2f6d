//! PDF page layout reader built on `lopdf`.
//!
//! Interprets a page's content stream text operators and groups what is drawn
//! into blocks, lines and spans. Each `BT … ET` text object becomes one block
//! carrying line/span structure only. There are no font metrics here: glyph
//! advance is estimated from the font size, which is enough to separate
//! columns and stack lines.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use sift_core::{AppError, AppResult};

use super::{LayoutBlock, Line, PageLayout, Rect, Span};

/// US Letter, used when a page declares no MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Estimated glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

/// Fractions of the font size above and below the baseline.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Baseline shift, relative to font size, that starts a new line.
const LINE_TOLERANCE: f32 = 0.3;

/// Horizontal gap, relative to font size, still treated as a continuation.
const SPAN_JOIN_TOLERANCE: f32 = 0.15;

/// MediaBox lookups stop after this many `Parent` hops.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// An opened PDF with its pages in document order.
///
/// Dropping the value releases everything read from the file.
pub struct PdfDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfDocument {
    /// Open and parse a PDF file.
    pub fn open(path: &Path) -> AppResult<Self> {
        let doc = Document::load(path)
            .map_err(|e| AppError::FileAccess(format!("Failed to open {:?}: {}", path, e)))?;
        Ok(Self::from(doc))
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Read the layout of the page at a 0-based index.
    pub fn page_layout(&self, index: usize) -> AppResult<PageLayout> {
        let page_id = *self.page_ids.get(index).ok_or_else(|| {
            AppError::Extraction(format!(
                "Page index {} out of range ({} pages)",
                index,
                self.page_ids.len()
            ))
        })?;
        read_page_layout(&self.doc, page_id)
    }
}

impl From<Document> for PdfDocument {
    fn from(doc: Document) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }
}

/// Read the layout of one page.
fn read_page_layout(doc: &Document, page_id: ObjectId) -> AppResult<PageLayout> {
    let media_box = media_box(doc, page_id).unwrap_or(DEFAULT_MEDIA_BOX);

    let bytes = page_content(doc, page_id)?;
    let content = Content::decode(&bytes).map_err(|e| {
        AppError::Extraction(format!("Failed to decode content of page {:?}: {}", page_id, e))
    })?;

    let mut interpreter = Interpreter::new(media_box);
    for operation in &content.operations {
        interpreter.apply(operation);
    }
    let blocks = interpreter.finish();

    tracing::trace!("Page {:?}: {} layout blocks", page_id, blocks.len());

    Ok(PageLayout {
        width: media_box[2] - media_box[0],
        height: media_box[3] - media_box[1],
        blocks,
    })
}

/// Concatenate the page's content streams, decoding their filters.
///
/// A missing stream or a filter that cannot be decoded fails the page
/// instead of being passed through as raw bytes.
fn page_content(doc: &Document, page_id: ObjectId) -> AppResult<Vec<u8>> {
    let mut content = Vec::new();

    for stream_id in doc.get_page_contents(page_id) {
        let stream = doc
            .get_object(stream_id)
            .and_then(Object::as_stream)
            .map_err(|e| {
                AppError::Extraction(format!(
                    "Content stream {:?} of page {:?} is unavailable: {}",
                    stream_id, page_id, e
                ))
            })?;

        if stream.dict.has(b"Filter") {
            let decoded = stream.decompressed_content().map_err(|e| {
                AppError::Extraction(format!(
                    "Failed to decode content stream {:?} of page {:?}: {}",
                    stream_id, page_id, e
                ))
            })?;
            content.extend_from_slice(&decoded);
        } else {
            content.extend_from_slice(&stream.content);
        }
        // Operators never span stream boundaries
        content.push(b'\n');
    }

    Ok(content)
}

/// Find the page's MediaBox, following `Parent` links for inherited values.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let mut current = Some(page_id);

    for _ in 0..MAX_INHERITANCE_DEPTH {
        let id = current?;
        let dict = doc.get_object(id).ok()?.as_dict().ok()?;

        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Ok(values) = resolve(doc, obj).as_array() {
                let nums: Vec<f32> = values
                    .iter()
                    .filter_map(|v| number(resolve(doc, v)))
                    .collect();
                if nums.len() == 4 {
                    return Some([
                        nums[0].min(nums[2]),
                        nums[1].min(nums[3]),
                        nums[0].max(nums[2]),
                        nums[1].max(nums[3]),
                    ]);
                }
            }
        }

        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }

    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Decode a PDF string operand.
///
/// UTF-16BE when it carries a byte order mark, single-byte otherwise.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a * a2 + b * c2,
            a * b2 + b * d2,
            c * a2 + d * c2,
            c * b2 + d * d2,
            e * a2 + f * c2 + e2,
            e * b2 + f * d2 + f2,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (x * a + y * c + e, x * b + y * d + f)
    }

    /// Length of the transformed unit vertical vector.
    fn vertical_scale(&self) -> f32 {
        let [_, _, c, d, _, _] = self.0;
        (c * c + d * d).sqrt()
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        let nums: Vec<f32> = operands.iter().filter_map(number).collect();
        if nums.len() == 6 {
            Some(Matrix([nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]]))
        } else {
            None
        }
    }
}

/// Text state tracked across operators.
#[derive(Debug, Clone)]
struct TextState {
    font: String,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: String::new(),
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
        }
    }
}

struct LineBuilder {
    baseline: f32,
    spans: Vec<Span>,
    end_x: f32,
}

#[derive(Default)]
struct BlockBuilder {
    lines: Vec<LineBuilder>,
}

impl BlockBuilder {
    fn push(&mut self, span: Span, baseline: f32) {
        let size = span.size.max(1.0);
        let start_x = span.bbox.x0;
        let end_x = span.bbox.x1;

        let same_line = self
            .lines
            .last()
            .is_some_and(|line| (line.baseline - baseline).abs() <= size * LINE_TOLERANCE);

        if !same_line {
            self.lines.push(LineBuilder {
                baseline,
                spans: vec![span],
                end_x,
            });
            return;
        }

        let Some(line) = self.lines.last_mut() else {
            return;
        };

        let continues = line.spans.last().is_some_and(|last| {
            last.font == span.font
                && (last.size - span.size).abs() < 0.01
                && (start_x - line.end_x).abs() <= size * SPAN_JOIN_TOLERANCE
        });

        match line.spans.last_mut() {
            Some(last) if continues => {
                last.text.push_str(&span.text);
                last.bbox = last.bbox.union(&span.bbox);
            }
            _ => line.spans.push(span),
        }
        line.end_x = end_x;
    }

    fn build(self) -> Option<LayoutBlock> {
        let lines: Vec<Line> = self
            .lines
            .into_iter()
            .map(|line| {
                let bbox = line
                    .spans
                    .iter()
                    .fold(Rect::default(), |acc, span| acc.union(&span.bbox));
                Line {
                    bbox,
                    spans: line.spans,
                }
            })
            .collect();

        if lines.is_empty() {
            return None;
        }

        let bbox = lines
            .iter()
            .fold(Rect::default(), |acc, line| acc.union(&line.bbox));
        Some(LayoutBlock::with_lines(bbox, lines))
    }
}

/// Content stream interpreter collecting text into blocks.
struct Interpreter {
    media_box: [f32; 4],
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    state: TextState,
    current: Option<BlockBuilder>,
    blocks: Vec<LayoutBlock>,
}

impl Interpreter {
    fn new(media_box: [f32; 4]) -> Self {
        Self {
            media_box,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            state: TextState::default(),
            current: None,
            blocks: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        let num = |i: usize| operands.get(i).and_then(number);

        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.flush_block();
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
                self.current = Some(BlockBuilder::default());
            }
            "ET" => self.flush_block(),
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.state.font = String::from_utf8_lossy(name).into_owned();
                }
                if let Some(size) = num(1) {
                    self.state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = num(0) {
                    self.state.leading = leading;
                }
            }
            "Tc" => {
                if let Some(spacing) = num(0) {
                    self.state.char_spacing = spacing;
                }
            }
            "Tw" => {
                if let Some(spacing) = num(0) {
                    self.state.word_spacing = spacing;
                }
            }
            "Tz" => {
                if let Some(scale) = num(0) {
                    self.state.horizontal_scale = scale / 100.0;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (num(0), num(1)) {
                    self.state.word_spacing = aw;
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = number(other) {
                                    let tx = -adjust / 1000.0
                                        * self.state.font_size
                                        * self.state.horizontal_scale;
                                    self.advance(tx);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translate(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translate(tx, 0.0).then(&self.text_matrix);
    }

    fn show(&mut self, bytes: &[u8]) {
        let text = decode_pdf_string(bytes);
        let glyphs = text.chars().count() as f32;
        let spaces = text.chars().filter(|c| *c == ' ').count() as f32;

        let state = &self.state;
        let width = (glyphs * (state.font_size * GLYPH_WIDTH + state.char_spacing)
            + spaces * state.word_spacing)
            * state.horizontal_scale;

        if !text.is_empty() {
            let render = self.text_matrix.then(&self.ctm);
            let (x_start, y_start) = render.apply(0.0, 0.0);
            let (x_end, _) = render.apply(width, 0.0);
            let size = state.font_size * render.vertical_scale();

            let [left, _, _, top] = self.media_box;
            let baseline = top - y_start;
            let bbox = Rect::new(
                x_start.min(x_end) - left,
                baseline - size * ASCENT,
                x_start.max(x_end) - left,
                baseline + size * DESCENT,
            );

            let span = Span {
                text,
                font: state.font.clone(),
                size,
                bbox,
            };

            self.current
                .get_or_insert_with(BlockBuilder::default)
                .push(span, baseline);
        }

        self.advance(width);
    }

    fn flush_block(&mut self) {
        if let Some(block) = self.current.take().and_then(BlockBuilder::build) {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<LayoutBlock> {
        self.flush_block();
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn single_page(operations: Vec<Operation>) -> PdfDocument {
        let content = Content { operations };
        page_with_stream(Stream::new(dictionary! {}, content.encode().unwrap()))
    }

    fn page_with_stream(stream: Stream) -> PdfDocument {
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
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        PdfDocument::from(doc)
    }

    fn show_at(x: i64, y: i64, text: &str) -> Vec<Operation> {
        vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 12.into()]),
            op("Td", vec![x.into(), y.into()]),
            op("Tj", vec![Object::string_literal(text)]),
            op("ET", vec![]),
        ]
    }

    #[test]
    fn test_single_text_object() {
        let pdf = single_page(show_at(72, 720, "Hello world."));
        assert_eq!(pdf.page_count(), 1);

        let layout = pdf.page_layout(0).unwrap();
        assert_eq!(layout.width, 595.0);
        assert_eq!(layout.height, 842.0);
        assert_eq!(layout.blocks.len(), 1);

        let block = &layout.blocks[0];
        assert!(block.text.is_none());
        assert_eq!(block.lines.len(), 1);
        assert_eq!(block.lines[0].spans.len(), 1);

        let span = &block.lines[0].spans[0];
        assert_eq!(span.text, "Hello world.");
        assert_eq!(span.font, "F1");
        assert_eq!(span.size, 12.0);
        // Baseline at 842 - 720 = 122 in top-left coordinates
        assert!(span.bbox.y0 < 122.0 && span.bbox.y1 > 122.0);
        assert_eq!(span.bbox.x0, 72.0);
    }

    #[test]
    fn test_columns_and_rows() {
        let pdf = single_page(vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 12.into()]),
            op("Td", vec![72.into(), 700.into()]),
            op("Tj", vec![Object::string_literal("Name")]),
            op("Td", vec![150.into(), 0.into()]),
            op("Tj", vec![Object::string_literal("Qty")]),
            op("Td", vec![(-150).into(), (-20).into()]),
            op("Tj", vec![Object::string_literal("Apple")]),
            op("Td", vec![150.into(), 0.into()]),
            op("Tj", vec![Object::string_literal("3")]),
            op("ET", vec![]),
        ]);

        let layout = pdf.page_layout(0).unwrap();
        assert_eq!(layout.blocks.len(), 1);

        let rows: Vec<Vec<&str>> = layout.blocks[0]
            .lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.text.as_str()).collect())
            .collect();
        assert_eq!(rows, vec![vec!["Name", "Qty"], vec!["Apple", "3"]]);
    }

    #[test]
    fn test_adjacent_shows_merge_into_one_span() {
        let pdf = single_page(vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 10.into()]),
            op("Td", vec![50.into(), 500.into()]),
            op("Tj", vec![Object::string_literal("Hello ")]),
            op("Tj", vec![Object::string_literal("there")]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal(" gen"),
                    0.into(),
                    Object::string_literal("eral"),
                ])],
            ),
            op("ET", vec![]),
        ]);

        let layout = pdf.page_layout(0).unwrap();
        let spans = &layout.blocks[0].lines[0].spans;
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello there general");
    }

    #[test]
    fn test_leading_and_next_line() {
        let pdf = single_page(vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 12.into()]),
            op("TL", vec![14.into()]),
            op("Td", vec![72.into(), 700.into()]),
            op("Tj", vec![Object::string_literal("first")]),
            op("'", vec![Object::string_literal("second")]),
            op("T*", vec![]),
            op("Tj", vec![Object::string_literal("third")]),
            op("ET", vec![]),
        ]);

        let layout = pdf.page_layout(0).unwrap();
        let lines = &layout.blocks[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].spans[0].text, "second");
        assert!(lines[0].bbox.y0 < lines[1].bbox.y0);
        assert!(lines[1].bbox.y0 < lines[2].bbox.y0);
    }

    #[test]
    fn test_text_objects_become_separate_blocks() {
        let mut ops = show_at(72, 720, "Title");
        ops.extend(show_at(72, 600, "Body"));
        let pdf = single_page(ops);

        let layout = pdf.page_layout(0).unwrap();
        assert_eq!(layout.blocks.len(), 2);
        assert!(!layout.blocks[0].bbox.intersects(&layout.blocks[1].bbox));
    }

    #[test]
    fn test_empty_page_has_no_blocks() {
        let pdf = single_page(vec![]);
        let layout = pdf.page_layout(0).unwrap();
        assert!(layout.blocks.is_empty());
    }

    #[test]
    fn test_unsupported_filter_fails_page() {
        let stream = Stream::new(
            dictionary! { "Filter" => "JBIG2Decode" },
            b"BT /F1 12 Tf (x) Tj ET".to_vec(),
        );
        let pdf = page_with_stream(stream);
        assert!(matches!(pdf.page_layout(0), Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_page_index_out_of_range() {
        let pdf = single_page(vec![]);
        assert!(matches!(pdf.page_layout(3), Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0xE9];
        assert_eq!(decode_pdf_string(&bytes), "Hé");
        assert_eq!(decode_pdf_string(b"plain"), "plain");
    }

    #[test]
    fn test_matrix_then() {
        let scale = Matrix([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        let shift = Matrix::translate(10.0, 5.0);
        let combined = scale.then(&shift);
        assert_eq!(combined.apply(1.0, 1.0), (12.0, 7.0));
        assert_eq!(combined.vertical_scale(), 2.0);
    }
}
