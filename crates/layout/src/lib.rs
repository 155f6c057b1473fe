use thiserror::Error;

// Re-export the foundation types dependent crates see in our signatures.
pub use galley_types::{BreakDiagnostic, DiagnosticKind, FlexMeasure, ManagerId};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("malformed element sequence: {0}")]
    MalformedSequence(&'static str),
    #[error("replay reached {current} with a position owned by {owner}")]
    ForeignPosition {
        owner: ManagerId,
        current: ManagerId,
    },
    #[error("no child manager {child} under {parent} for replay delegation")]
    UnknownChild { parent: ManagerId, child: ManagerId },
    #[error("position index {index} does not address any element of {manager}")]
    InvalidPosition { manager: ManagerId, index: usize },
    #[error("delegation requested on {0} but no delegation root is reachable")]
    NoDelegationRoot(ManagerId),
    #[error("table body still contains bare cells; normalize before layout")]
    UnnormalizedTable,
    #[error("builder mismatch: expected {0} node, got {1}")]
    BuilderMismatch(&'static str, &'static str),
}

pub mod algorithms;
pub mod builder;
pub mod config;
pub mod context;
pub mod element;
pub mod interface;
pub mod managers;
pub mod position;
pub mod replay;

pub use self::algorithms::breaker::{find_breaks, BreakingResult, ChosenBreak};
pub use self::builder::ManagerFactory;
pub use self::config::{Alignment, BreakerConfig};
pub use self::context::{LayoutContext, SpaceSpec};
pub use self::element::{validate_sequence, BoxMetrics, BreakElement, Cost, ElementKind};
pub use self::interface::{
    Area, AreaClass, AreaContent, AreaSink, Marker, PageLocation, ReferenceRegistry,
    RetrieveBoundary, RetrievePosition,
};
pub use self::managers::LayoutManager;
pub use self::position::{BreakPosition, PositionIter};
pub use self::replay::replay_spans;

#[cfg(test)]
mod test_utils;
