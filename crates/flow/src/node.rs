//! Flow content nodes.
//!
//! The node tree mirrors the source document one block per node. Inline
//! content arrives pre-measured: glyph metrics and font lookup happen
//! upstream, so a run carries its measure and baseline metadata instead of
//! text-shaping state.

use crate::properties::{BoundProperties, PropertyScope};
use galley_types::FlexMeasure;

/// A string type for the document.
pub type TextStr = String;

/// A common metadata structure for all block-level nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    pub id: Option<TextStr>,
    /// Adjustable space stacked before/after the node's areas.
    pub space_before: FlexMeasure,
    pub space_after: FlexMeasure,
    /// Forbids a break between this node and its following sibling.
    pub keep_with_next: bool,
    /// Forces a break before this node's areas.
    pub break_before: bool,
    /// Forces a break after this node's areas.
    pub break_after: bool,
}

impl NodeMetadata {
    pub fn with_id(id: impl Into<TextStr>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// Represents a block-level element in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowNode {
    /// A generic block container.
    Block {
        meta: NodeMetadata,
        children: Vec<FlowNode>,
    },
    /// A paragraph, containing only inline content.
    Paragraph {
        meta: NodeMetadata,
        children: Vec<InlineItem>,
    },
    /// A table.
    Table {
        meta: NodeMetadata,
        body: Box<TableBody>,
    },
    /// The body of a footnote, laid out in the footnote reference area.
    FootnoteBody {
        meta: NodeMetadata,
        children: Vec<FlowNode>,
    },
}

impl FlowNode {
    /// Returns a reference to the metadata of this node.
    pub fn meta(&self) -> &NodeMetadata {
        match self {
            FlowNode::Block { meta, .. } => meta,
            FlowNode::Paragraph { meta, .. } => meta,
            FlowNode::Table { meta, .. } => meta,
            FlowNode::FootnoteBody { meta, .. } => meta,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FlowNode::Block { .. } => "Block",
            FlowNode::Paragraph { .. } => "Paragraph",
            FlowNode::Table { .. } => "Table",
            FlowNode::FootnoteBody { .. } => "FootnoteBody",
        }
    }
}

/// Pre-measured inline content of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineItem {
    /// An indivisible run of shaped text (or an inline object). `lead`,
    /// `total` and `middle` are the baseline metadata consumed when runs
    /// are folded into line metrics.
    Run {
        text: TextStr,
        measure: f32,
        lead: f32,
        total: f32,
        middle: f32,
    },
    /// An adjustable inter-word space.
    Space { measure: FlexMeasure },
    /// An explicit line break.
    ForcedBreak,
}

impl InlineItem {
    pub fn run(text: impl Into<TextStr>, measure: f32) -> Self {
        InlineItem::Run {
            text: text.into(),
            measure,
            lead: 12.0,
            total: 14.4,
            middle: 2.4,
        }
    }

    pub fn space(opt: f32, stretch: f32, shrink: f32) -> Self {
        InlineItem::Space {
            measure: FlexMeasure::new(opt - shrink, opt, opt + stretch),
        }
    }
}

/// A table body whose children may still be bare cells before
/// normalization regroups them into rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBody {
    pub meta: NodeMetadata,
    pub children: Vec<TableChild>,
    saved_scope: Option<PropertyScope>,
    bound: Option<BoundProperties>,
}

impl TableBody {
    pub fn new(meta: NodeMetadata, children: Vec<TableChild>) -> Self {
        Self {
            meta,
            children,
            saved_scope: None,
            bound: None,
        }
    }

    /// Binds this body's own properties and saves the scope for the
    /// cell-to-row conversion.
    pub fn bind(&mut self, scope: PropertyScope) -> Result<(), crate::BindingError> {
        self.bound = Some(scope.bind()?);
        self.saved_scope = Some(scope);
        Ok(())
    }

    pub fn bound(&self) -> Option<&BoundProperties> {
        self.bound.as_ref()
    }

    /// Releases the saved scope to the caller. Consumed exactly once, by
    /// normalization.
    pub(crate) fn take_saved_scope(&mut self) -> Option<PropertyScope> {
        self.saved_scope.take()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableChild {
    Row(TableRow),
    Cell(TableCell),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub meta: NodeMetadata,
    pub cells: Vec<TableCell>,
    bound: Option<BoundProperties>,
}

impl TableRow {
    pub fn new(meta: NodeMetadata, cells: Vec<TableCell>) -> Self {
        Self {
            meta,
            cells,
            bound: None,
        }
    }

    /// An empty row opened during cell-to-row conversion.
    pub(crate) fn synthesized() -> Self {
        Self {
            meta: NodeMetadata::default(),
            cells: Vec::new(),
            bound: None,
        }
    }

    /// Binds this row against the given property scope (the container's
    /// scope, for synthesized rows).
    pub fn bind(&mut self, scope: &PropertyScope) -> Result<(), crate::BindingError> {
        self.bound = Some(scope.bind_row()?);
        Ok(())
    }

    pub fn bound(&self) -> Option<&BoundProperties> {
        self.bound.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub meta: NodeMetadata,
    /// The cell declares it opens a fresh row.
    pub starts_row: bool,
    /// The cell declares it closes the row it sits in.
    pub ends_row: bool,
    pub content: Vec<FlowNode>,
}

impl TableCell {
    pub fn new(content: Vec<FlowNode>) -> Self {
        Self {
            meta: NodeMetadata::default(),
            starts_row: false,
            ends_row: false,
            content,
        }
    }

    pub fn starts_row(mut self, value: bool) -> Self {
        self.starts_row = value;
        self
    }

    pub fn ends_row(mut self, value: bool) -> Self {
        self.ends_row = value;
        self
    }
}
