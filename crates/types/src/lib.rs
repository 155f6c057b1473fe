pub mod diag;
pub mod geometry;
pub mod ids;
pub mod measure;

pub use diag::{BreakDiagnostic, DiagnosticKind};
pub use geometry::{Rect, Size};
pub use ids::{AnchorId, ManagerId};
pub use measure::FlexMeasure;
