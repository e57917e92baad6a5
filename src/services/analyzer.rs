//! Document Analyzer
//!
//! Pure derivation of a document's structure from its block sequence: a
//! heading outline, a gap-free section partition, and whole-document
//! statistics. No I/O and no external calls; one scan plus one grouping pass,
//! so large documents stay cheap.

use copydesk_core::{Block, DocumentStats, DocumentStructure, OutlineNode, Section};

/// Words per minute used for reading time
const READING_WPM: usize = 200;

/// Analyze a block sequence into outline, sections, and stats.
pub fn analyze(blocks: &[Block]) -> DocumentStructure {
    let outline = build_outline(blocks);
    let sections = partition_sections(blocks, &outline);
    let stats = compute_stats(blocks);
    DocumentStructure {
        outline,
        sections,
        stats,
    }
}

/// Build the outline forest with a level-ordered stack.
///
/// An ancestor is the nearest enclosing node with a strictly smaller level,
/// so skipped levels (H1 straight to H3) still nest correctly.
fn build_outline(blocks: &[Block]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    // Index path from the roots to the currently open node, plus its levels.
    let mut path: Vec<usize> = Vec::new();
    let mut levels: Vec<u8> = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        let Some(level) = block.heading_level() else {
            continue;
        };
        while levels.last().is_some_and(|&top| top >= level) {
            levels.pop();
            path.pop();
        }
        let siblings = children_at_path(&mut roots, &path);
        siblings.push(OutlineNode::new(level, block.plain_text(), index));
        path.push(siblings.len() - 1);
        levels.push(level);
    }

    roots
}

/// Walk an index path to the child list it designates.
fn children_at_path<'a>(roots: &'a mut Vec<OutlineNode>, path: &[usize]) -> &'a mut Vec<OutlineNode> {
    let mut current = roots;
    for &index in path {
        current = &mut current[index].children;
    }
    current
}

/// Flatten the outline pre-order, then restore document order by block index.
fn flatten_outline(outline: &[OutlineNode]) -> Vec<OutlineNode> {
    fn walk(nodes: &[OutlineNode], out: &mut Vec<OutlineNode>) {
        for node in nodes {
            out.push(node.clone());
            walk(&node.children, out);
        }
    }
    let mut flat = Vec::new();
    walk(outline, &mut flat);
    flat.sort_by_key(|n| n.block_index);
    flat
}

/// Slice the block array between consecutive heading indices.
///
/// Sections partition the block sequence with no gaps or overlaps; heading
/// blocks belong to their section's range but not its content. A document
/// with no headings is one section with no heading spanning everything.
fn partition_sections(blocks: &[Block], outline: &[OutlineNode]) -> Vec<Section> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let headings = flatten_outline(outline);
    if headings.is_empty() {
        let content: Vec<Block> = blocks.to_vec();
        let word_count = content.iter().map(Block::word_count).sum();
        return vec![Section {
            heading: None,
            content,
            word_count,
            start_index: 0,
            end_index: blocks.len(),
        }];
    }

    let mut sections = Vec::with_capacity(headings.len() + 1);

    // Preamble blocks before the first heading form a headingless section.
    let first_heading = headings[0].block_index;
    if first_heading > 0 {
        let content: Vec<Block> = blocks[..first_heading].to_vec();
        let word_count = content.iter().map(Block::word_count).sum();
        sections.push(Section {
            heading: None,
            content,
            word_count,
            start_index: 0,
            end_index: first_heading,
        });
    }

    for (i, heading) in headings.iter().enumerate() {
        let start = heading.block_index;
        let end = headings
            .get(i + 1)
            .map(|h| h.block_index)
            .unwrap_or(blocks.len());
        let content: Vec<Block> = blocks[start + 1..end].to_vec();
        let word_count = content.iter().map(Block::word_count).sum();
        sections.push(Section {
            heading: Some(heading.clone()),
            content,
            word_count,
            start_index: start,
            end_index: end,
        });
    }

    sections
}

/// Word, paragraph, heading, reading-time, and sentence-length statistics.
fn compute_stats(blocks: &[Block]) -> DocumentStats {
    let mut total_words = 0usize;
    let mut total_paragraphs = 0usize;
    let mut total_headings = 0usize;
    let mut text = String::new();

    for block in blocks {
        total_words += block.word_count();
        if block.is_paragraph() {
            total_paragraphs += 1;
        }
        if block.is_heading() {
            total_headings += 1;
        }
        let block_text = block.plain_text();
        if !block_text.is_empty() {
            text.push_str(&block_text);
            text.push(' ');
        }
    }

    let reading_time_minutes = if total_words == 0 {
        0
    } else {
        total_words.div_ceil(READING_WPM)
    };

    let sentences: Vec<&str> = text
        .split(['.', '!', '?', '。', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let avg_sentence_length = if sentences.is_empty() {
        0.0
    } else {
        let words: usize = sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum();
        words as f32 / sentences.len() as f32
    };

    DocumentStats {
        total_words,
        total_paragraphs,
        total_headings,
        reading_time_minutes,
        avg_sentence_length,
    }
}
