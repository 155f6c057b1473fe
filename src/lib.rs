pub mod pipeline;

pub use pipeline::{LayoutPipeline, PaginationReport, PipelineConfig};

use galley_flow::BindingError;
use galley_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleyError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("property binding error: {0}")]
    Binding(#[from] BindingError),
}

// The boundary contracts and the flow/layout vocabulary callers need.
pub use galley_flow::{
    convert_cells_to_rows, normalize_tree, FlowNode, InlineItem, NodeMetadata, PropertyScope,
    TableBody, TableCell, TableChild, TableRow,
};
pub use galley_layout::{
    find_breaks, replay_spans, Alignment, Area, AreaClass, AreaContent, AreaSink, BreakDiagnostic,
    BreakerConfig, BreakingResult, DiagnosticKind, LayoutContext, LayoutManager, ManagerFactory,
    Marker, PageLocation, ReferenceRegistry, RetrieveBoundary, RetrievePosition,
};
pub use galley_types::{AnchorId, FlexMeasure, ManagerId};
