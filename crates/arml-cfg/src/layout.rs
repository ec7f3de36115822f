//! Node geometry and term extraction.

use tracing::debug;

use crate::model::{
    DisasmGraph, DisasmLine, DisasmNode, Point, Term, TermTag, VisualEdge, VisualGraph,
    VisualNode,
};

/// Inner padding of a node box, in pixels.
pub const PADDING: f64 = 4.0;
/// Average glyph width of the render font.
pub const GLYPH_WIDTH: f64 = 7.5;
/// Line height of the render font.
pub const LINE_HEIGHT: f64 = 14.0;

/// Split one disassembly line into render terms: the mnemonic, up to three
/// comma-separated operand classes, and the trailing comment.
pub fn terms_of_line(line: &DisasmLine) -> Vec<Term> {
    let mut terms = Vec::new();
    let text = line.disasm.trim();
    if let Some((mnemonic, rest)) = text.split_once(char::is_whitespace) {
        terms.push(Term(mnemonic.to_string(), TermTag::Mnemonic));
        for (i, operand) in rest.split(',').enumerate() {
            let tag = match i {
                0 => TermTag::Operand0,
                1 => TermTag::Operand1,
                _ => TermTag::Operand2,
            };
            terms.push(Term(operand.trim().to_string(), tag));
        }
    } else if !text.is_empty() {
        terms.push(Term(text.to_string(), TermTag::Mnemonic));
    }
    if !line.comment.is_empty() {
        terms.push(Term(line.comment.clone(), TermTag::Comment));
    }
    terms
}

/// Rendered length of a line in characters: the disassembly text plus the
/// comment with its ` ; ` separator.
fn line_length(line: &DisasmLine) -> usize {
    let mut len = line.disasm.trim().chars().count();
    if !line.comment.is_empty() {
        len += 3 + line.comment.chars().count();
    }
    len
}

/// Box size of a node: width tracks the longest line, height the line count.
pub fn measure(node: &DisasmNode) -> (f64, f64) {
    let max_len = node
        .disassembly
        .iter()
        .map(line_length)
        .max()
        .unwrap_or(0);
    let width = max_len as f64 * GLYPH_WIDTH + PADDING * 2.0;
    let height = node.disassembly.len() as f64 * LINE_HEIGHT + 4.0 + PADDING * 2.0;
    (width, height)
}

/// Build the output skeleton: measured nodes with tokenized text, and edges
/// with back edges marked. Positions and routing points are left at their
/// defaults for the layout engine to fill in.
pub fn build(graph: &DisasmGraph) -> VisualGraph {
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "measuring visual graph"
    );
    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let (width, height) = measure(node);
            VisualNode {
                address: node.address,
                terms: node.disassembly.iter().map(terms_of_line).collect(),
                width,
                height,
                pos: Point::default(),
            }
        })
        .collect();
    let edges = graph
        .edges
        .iter()
        .map(|edge| VisualEdge {
            kind: edge.kind.clone(),
            points: Vec::new(),
            is_back_edge: edge.to <= edge.from,
        })
        .collect();
    VisualGraph { nodes, edges }
}

/// Serialize a visual graph for the renderer.
pub fn to_json(graph: &VisualGraph) -> serde_json::Result<String> {
    serde_json::to_string(graph)
}

/// Parse a layout request.
pub fn from_json(json: &str) -> serde_json::Result<DisasmGraph> {
    serde_json::from_str(json)
}
