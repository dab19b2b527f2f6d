//! Page text extraction: tables, prose and code from layout blocks.
//!
//! Every block with line/span structure is read as a table, one row per line
//! and one cell per visible span. Blocks with flat text that stay clear of
//! every table are classified as prose or code. The page text is the prose,
//! then the code blocks, then the rendered tables, separated by blank lines.

use crate::layout::{LayoutBlock, Rect};

/// Placeholder artifact removed from prose text.
const PLACEHOLDER: &str = "None";

/// Separator between page sections and between blocks inside a section.
const SECTION_SEPARATOR: &str = "\n\n";

/// Classification of a flat text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Prose,
    Code,
}

impl BlockKind {
    /// Classify trimmed block text.
    ///
    /// Any line starting with an ASCII digit marks the whole block as code.
    /// Numbered lists end up here too.
    pub fn classify(text: &str) -> Self {
        let numbered = text
            .lines()
            .any(|line| line.trim().starts_with(|c: char| c.is_ascii_digit()));

        if numbered {
            Self::Code
        } else {
            Self::Prose
        }
    }
}

/// A block read as a grid of cells, with the box used to exclude overlapping text.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCandidate {
    pub rows: Vec<Vec<String>>,
    pub bbox: Rect,
}

impl TableCandidate {
    /// Build a table from a block's lines.
    ///
    /// Returns `None` when the block has no visible span text at all.
    pub fn from_block(block: &LayoutBlock) -> Option<Self> {
        let rows: Vec<Vec<String>> = block
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.text.trim())
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return None;
        }

        Some(Self {
            rows,
            bbox: block.bbox,
        })
    }

    /// Render one line per row with cells joined by single spaces.
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A page split into its three sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSections {
    pub prose: Vec<String>,
    pub code: Vec<String>,
    pub tables: Vec<TableCandidate>,
}

impl PageSections {
    /// Separate a page's blocks into tables, prose and code.
    pub fn from_blocks(blocks: &[LayoutBlock]) -> Self {
        let tables = find_tables(blocks);

        let mut prose = Vec::new();
        let mut code = Vec::new();

        for block in blocks {
            let Some(raw) = block.text.as_deref() else {
                continue;
            };

            if tables.iter().any(|table| block.bbox.intersects(&table.bbox)) {
                continue;
            }

            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            match BlockKind::classify(text) {
                BlockKind::Prose => prose.push(text.to_string()),
                BlockKind::Code => code.push(text.to_string()),
            }
        }

        Self {
            prose,
            code,
            tables,
        }
    }

    /// Concatenate the sections into page text.
    pub fn render(&self) -> String {
        let prose = self.prose.join("\n").replace(PLACEHOLDER, "");
        let code = self.code.join(SECTION_SEPARATOR);
        let tables = self
            .tables
            .iter()
            .map(TableCandidate::render)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR);

        let combined = [prose.trim(), code.as_str(), tables.as_str()].join(SECTION_SEPARATOR);
        combined.trim().to_string()
    }
}

/// Collect a table candidate from every block with visible line/span text.
pub fn find_tables(blocks: &[LayoutBlock]) -> Vec<TableCandidate> {
    blocks
        .iter()
        .filter(|block| block.has_lines())
        .filter_map(TableCandidate::from_block)
        .collect()
}

/// Extract the text of one page from its layout blocks.
pub fn extract_page_text(blocks: &[LayoutBlock]) -> String {
    let sections = PageSections::from_blocks(blocks);

    tracing::trace!(
        "Page sections: {} prose, {} code, {} tables",
        sections.prose.len(),
        sections.code.len(),
        sections.tables.len()
    );

    sections.render()
}
