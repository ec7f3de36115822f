//! CFG visual-layout data model.
//!
//! The visualization boundary is JSON: disassembled basic blocks and edges
//! come in, measured nodes with tokenized text and routed edges go out.
//! Rendering itself lives on the other side of the boundary; this crate only
//! owns the records and the node geometry.

mod layout;
mod model;

pub use layout::*;
pub use model::*;
