//! Flow-level content model.
//!
//! This crate defines the in-memory representation of styled, flow-level
//! content after parsing and style resolution (both out of scope here) but
//! before layout: block nodes, pre-measured inline content, the property
//! scope containers save for structural fix-ups, and the table cell-to-row
//! normalizer.

pub mod node;
pub mod normalize;
pub mod properties;

pub use node::{
    FlowNode, InlineItem, NodeMetadata, TableBody, TableCell, TableChild, TableRow, TextStr,
};
pub use normalize::{convert_cells_to_rows, normalize_tree};
pub use properties::{
    BindingError, BoundProperties, BreakClass, PropertyScope, Visibility, WritingMode,
};
