//! Generic block-stacking manager.
//!
//! Pulls each child to exhaustion, re-issues the children's elements under
//! its own positions, and stitches break opportunities (penalty + optional
//! space glue) between siblings. Replay peels its own position layer and
//! hands each child one contiguous run.

use super::LayoutManager;
use crate::config::Alignment;
use crate::context::LayoutContext;
use crate::element::{BreakElement, Cost};
use crate::interface::Area;
use crate::position::{BreakPosition, PositionIter};
use crate::LayoutError;
use galley_flow::NodeMetadata;
use galley_types::{FlexMeasure, ManagerId};

pub struct BlockState;

pub(super) fn stack_children(
    id: ManagerId,
    children: &mut [LayoutManager],
    ctx: &LayoutContext,
    alignment: Alignment,
) -> Result<(Vec<BreakElement>, f32), LayoutError> {
    let metas: Vec<NodeMetadata> = children.iter().map(|c| c.meta().clone()).collect();

    let mut elements: Vec<BreakElement> = Vec::new();
    let mut total = 0.0;
    let mut prev_contributing: Option<usize> = None;

    for ci in 0..children.len() {
        let pulled = children[ci].generate(&ctx.for_child(), alignment)?;
        total += children[ci].stacking_size();
        // A child with no breakable content contributes no sibling joint
        // either; the next contributing child joins to the last one that
        // produced something.
        if pulled.is_empty() {
            continue;
        }

        if let Some(pi) = prev_contributing {
            let prev = &metas[pi];
            let slot = elements.len();
            if prev.break_after || metas[ci].break_before {
                elements.push(BreakElement::forced_break(BreakPosition::leaf(id, slot)));
            } else {
                let cost = if prev.keep_with_next || !children[ci].can_break_before(ctx) {
                    Cost::INFINITE
                } else {
                    Cost::ZERO
                };
                elements.push(BreakElement::penalty(cost, BreakPosition::leaf(id, slot)));
            }
            let gap = prev.space_after + metas[ci].space_before;
            if gap != FlexMeasure::zero() {
                elements.push(BreakElement::glue(gap));
            }
        }

        for element in pulled {
            let slot = elements.len();
            elements.push(element.wrapped_by(id, slot));
        }
        prev_contributing = Some(ci);
    }

    Ok((elements, total))
}

/// Peels `id`'s layer off the span's positions and replays every child run
/// in document order. Shared by the block and footnote-body kinds.
pub(super) fn replay_children(
    id: ManagerId,
    children: &mut [LayoutManager],
    mut positions: PositionIter,
    ctx: &LayoutContext,
) -> Result<Vec<Area>, LayoutError> {
    let mut inner = Vec::new();
    while let Some((owner, run)) = positions.next_run() {
        if owner != id {
            return Err(LayoutError::ForeignPosition { owner, current: id });
        }
        for position in run {
            // Positions without an inner layer are this manager's own
            // penalties: break decisions, nothing to materialize.
            if let Some(wrapped) = position.into_inner() {
                inner.push(wrapped);
            }
        }
    }

    let mut areas = Vec::new();
    let mut iter = PositionIter::new(inner);
    let mut first = true;
    while let Some((owner, run)) = iter.next_run() {
        let is_final = iter.next_owner().is_none();
        let child = children
            .iter_mut()
            .find(|c| c.id() == owner)
            .ok_or(LayoutError::UnknownChild {
                parent: id,
                child: owner,
            })?;
        let child_ctx = ctx.for_child().span_flags(
            ctx.is_first_area && first,
            ctx.is_last_area && is_final,
        );
        areas.extend(child.add_areas(PositionIter::new(run), &child_ctx)?);
        first = false;
    }
    Ok(areas)
}

pub(super) fn replay(
    id: ManagerId,
    children: &mut [LayoutManager],
    positions: PositionIter,
    ctx: &LayoutContext,
) -> Result<Vec<Area>, LayoutError> {
    let children_areas = replay_children(id, children, positions, ctx)?;
    Ok(vec![Area::block(ctx.ref_ipd, children_areas)])
}
