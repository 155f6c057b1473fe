//! Breakable-content elements.
//!
//! A scope's content is modeled for breaking as an ordered sequence of
//! boxes (rigid content), glue (adjustable space) and penalties (candidate
//! break points). Every element may carry the position handle of the
//! manager that produced it; penalties must, since chosen breaks are
//! addressed through those handles during replay.

use crate::position::BreakPosition;
use crate::LayoutError;
use galley_types::{FlexMeasure, ManagerId};
use itertools::Itertools;

/// Break cost attached to a penalty. `INFINITE` forbids the break.
/// Negative costs encourage it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost(f32);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);
    pub const INFINITE: Cost = Cost(f32::INFINITY);

    pub fn new(value: f32) -> Self {
        Cost(value)
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite() && self.0 > 0.0
    }
}

/// Baseline metadata a box carries for callers that align content
/// vertically: height before the baseline, total height, and the extent
/// below a middle alignment point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    pub lead: f32,
    pub total: f32,
    pub middle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// An indivisible content unit with a non-negative measure along the
    /// stacking axis.
    Box { measure: f32, metrics: BoxMetrics },
    /// A space whose effective length is adjustable within the measure's
    /// stretch/shrink envelope.
    Glue { measure: FlexMeasure },
    /// A candidate break point. `width` is added to the segment only when
    /// the break is taken here. `forced` terminates the scope
    /// unconditionally.
    Penalty { cost: Cost, width: f32, forced: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakElement {
    pub kind: ElementKind,
    pub position: Option<BreakPosition>,
}

impl BreakElement {
    pub fn content(measure: f32, metrics: BoxMetrics, position: BreakPosition) -> Self {
        debug_assert!(measure >= 0.0, "box measure must be non-negative");
        Self {
            kind: ElementKind::Box { measure, metrics },
            position: Some(position),
        }
    }

    pub fn glue(measure: FlexMeasure) -> Self {
        Self {
            kind: ElementKind::Glue { measure },
            position: None,
        }
    }

    pub fn penalty(cost: Cost, position: BreakPosition) -> Self {
        Self {
            kind: ElementKind::Penalty {
                cost,
                width: 0.0,
                forced: false,
            },
            position: Some(position),
        }
    }

    pub fn forced_break(position: BreakPosition) -> Self {
        Self {
            kind: ElementKind::Penalty {
                cost: Cost::ZERO,
                width: 0.0,
                forced: true,
            },
            position: Some(position),
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self.kind, ElementKind::Box { .. })
    }

    pub fn is_glue(&self) -> bool {
        matches!(self.kind, ElementKind::Glue { .. })
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self.kind, ElementKind::Penalty { .. })
    }

    pub fn is_forced_break(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Penalty { forced: true, .. }
        )
    }

    /// Natural measure contributed when the element is not broken at:
    /// box measure, glue opt, zero for penalties.
    pub fn natural_measure(&self) -> f32 {
        match &self.kind {
            ElementKind::Box { measure, .. } => *measure,
            ElementKind::Glue { measure } => measure.opt,
            ElementKind::Penalty { .. } => 0.0,
        }
    }

    /// Re-issues this element under `manager`, wrapping the existing
    /// position (if any) one level deeper. `index` is the element's slot
    /// in the wrapping manager's own sequence.
    pub fn wrapped_by(self, manager: ManagerId, index: usize) -> Self {
        let position = self
            .position
            .map(|inner| BreakPosition::wrapping(manager, index, inner));
        Self {
            kind: self.kind,
            position,
        }
    }
}

/// Checks the well-formedness invariant of a sequence about to be broken:
/// the terminator is a forced penalty, and no two adjacent penalties share
/// the same break semantics without intervening content.
pub fn validate_sequence(elements: &[BreakElement]) -> Result<(), LayoutError> {
    if elements.is_empty() {
        return Ok(());
    }
    let last = &elements[elements.len() - 1];
    if !last.is_forced_break() {
        return Err(LayoutError::MalformedSequence(
            "sequence must end with a forced penalty",
        ));
    }
    for (a, b) in elements.iter().tuple_windows() {
        if let (
            ElementKind::Penalty {
                cost: cost_a,
                forced: forced_a,
                ..
            },
            ElementKind::Penalty {
                cost: cost_b,
                forced: forced_b,
                ..
            },
        ) = (&a.kind, &b.kind)
        {
            if forced_a == forced_b && cost_a == cost_b {
                return Err(LayoutError::MalformedSequence(
                    "adjacent penalties with identical break semantics",
                ));
            }
        }
    }
    Ok(())
}
