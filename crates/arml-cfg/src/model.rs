//! Input and output records for the visualization boundary.
//!
//! These are plain data: a graph is a pair of arrays, nodes refer to each
//! other by address, and all field names follow the JSON contract.

use serde::{Deserialize, Serialize};

/// One disassembled line of a basic block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasmLine {
    #[serde(rename = "Disasm")]
    pub disasm: String,
    #[serde(rename = "Comment")]
    pub comment: String,
}

/// A basic block as handed to the layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasmNode {
    #[serde(rename = "Address")]
    pub address: u64,
    #[serde(rename = "Disassembly")]
    pub disassembly: Vec<DisasmLine>,
}

/// A CFG edge between block addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasmEdge {
    #[serde(rename = "From")]
    pub from: u64,
    #[serde(rename = "To")]
    pub to: u64,
    #[serde(rename = "Type")]
    pub kind: String,
}

/// Layout input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasmGraph {
    #[serde(rename = "Nodes")]
    pub nodes: Vec<DisasmNode>,
    #[serde(rename = "Edges")]
    pub edges: Vec<DisasmEdge>,
    #[serde(rename = "Root")]
    pub root: u64,
}

/// Token classes the renderer colors by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermTag {
    Mnemonic,
    Operand0,
    Operand1,
    Operand2,
    Comment,
}

/// One rendered token: text plus its class. Serializes as a two-element
/// array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term(pub String, pub TermTag);

/// A 2D position.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

/// A measured node ready for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    #[serde(rename = "Address")]
    pub address: u64,
    #[serde(rename = "Terms")]
    pub terms: Vec<Vec<Term>>,
    #[serde(rename = "Width")]
    pub width: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Pos")]
    pub pos: Point,
}

/// A routed edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Points")]
    pub points: Vec<Point>,
    #[serde(rename = "IsBackEdge")]
    pub is_back_edge: bool,
}

/// Layout output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualGraph {
    #[serde(rename = "Nodes")]
    pub nodes: Vec<VisualNode>,
    #[serde(rename = "Edges")]
    pub edges: Vec<VisualEdge>,
}
