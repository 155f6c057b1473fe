//! Quality diagnostics surfaced alongside successful layout results.

use serde::{Deserialize, Serialize};

/// Which way a span missed its target after tolerance relaxation ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Overfull,
    Underfull,
}

/// A span that could not be fit within the stretch/shrink budget. The
/// least-bad break was still taken; the caller decides how severe this is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakDiagnostic {
    /// Element index of the break ending the offending span.
    pub element_index: usize,
    pub kind: DiagnosticKind,
    /// Length by which the span exceeds (overfull) or falls short of
    /// (underfull) the reachable envelope.
    pub deviation: f32,
}

impl BreakDiagnostic {
    pub fn overfull(element_index: usize, deviation: f32) -> Self {
        Self {
            element_index,
            kind: DiagnosticKind::Overfull,
            deviation,
        }
    }

    pub fn underfull(element_index: usize, deviation: f32) -> Self {
        Self {
            element_index,
            kind: DiagnosticKind::Underfull,
            deviation,
        }
    }
}
