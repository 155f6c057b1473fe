//! Per-call layout context.
//!
//! The context is a value object copied into every generation and replay
//! call. Sibling calls never observe each other's mutations; a manager
//! that wants different settings for a child clones and adjusts.

use crate::config::Alignment;
use galley_types::FlexMeasure;

/// Space pending at a span edge, resolved once the edge is known to be
/// leading or trailing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpaceSpec {
    pub amount: FlexMeasure,
    /// Retained even when the span edge collapses spaces (e.g. space
    /// conditionality "retain").
    pub retain: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    /// Target measure of the current scope along the stacking axis.
    pub target: f32,
    /// Inline-progression measure available to the scope.
    pub ref_ipd: f32,
    pub alignment: Alignment,
    /// Adjustment ratio applied to adjustable inline space during replay.
    pub ipd_adjust: f32,
    pub leading_space: Option<SpaceSpec>,
    pub trailing_space: Option<SpaceSpec>,
    /// The span being replayed is the first produced for the parent.
    pub is_first_area: bool,
    /// The span being replayed is the final one produced for the parent.
    pub is_last_area: bool,
    /// Leading space must be resolved rather than carried further up.
    pub resolve_leading_space: bool,
    /// Generation is opening a fresh area rather than continuing one.
    pub new_area: bool,
}

impl LayoutContext {
    pub fn new(target: f32, ref_ipd: f32) -> Self {
        Self {
            target,
            ref_ipd,
            alignment: Alignment::Start,
            ipd_adjust: 0.0,
            leading_space: None,
            trailing_space: None,
            is_first_area: false,
            is_last_area: false,
            resolve_leading_space: false,
            new_area: true,
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// A copy for a child call, with per-span flags cleared so the child
    /// manager decides them for its own spans.
    pub fn for_child(&self) -> Self {
        Self {
            is_first_area: false,
            is_last_area: false,
            ..self.clone()
        }
    }

    pub fn span_flags(mut self, is_first: bool, is_last: bool) -> Self {
        self.is_first_area = is_first;
        self.is_last_area = is_last;
        self
    }
}
