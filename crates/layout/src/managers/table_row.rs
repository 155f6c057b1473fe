//! Table-row manager.
//!
//! A row is atomic along the stacking axis: its measure is the tallest
//! cell's stacking size, and replay re-materializes every cell in full.
//! The cell managers' positions are retained at generation time precisely
//! because the row never exposes them upward.

use super::LayoutManager;
use crate::config::Alignment;
use crate::context::LayoutContext;
use crate::element::{BoxMetrics, BreakElement};
use crate::interface::{Area, AreaClass, AreaContent};
use crate::position::{BreakPosition, PositionIter};
use crate::LayoutError;
use galley_types::ManagerId;

#[derive(Default)]
pub struct TableRowState {
    cell_positions: Vec<Vec<BreakPosition>>,
    row_measure: f32,
}

pub(super) fn generate(
    id: ManagerId,
    state: &mut TableRowState,
    children: &mut [LayoutManager],
    ctx: &LayoutContext,
    alignment: Alignment,
) -> Result<(Vec<BreakElement>, f32), LayoutError> {
    state.cell_positions.clear();
    state.row_measure = 0.0;

    for child in children.iter_mut() {
        let elements = child.generate(&ctx.for_child(), alignment)?;
        state.row_measure = state.row_measure.max(child.stacking_size());
        state
            .cell_positions
            .push(elements.into_iter().filter_map(|el| el.position).collect());
    }

    let measure = state.row_measure;
    let metrics = BoxMetrics {
        lead: measure,
        total: measure,
        middle: 0.0,
    };
    let elements = vec![BreakElement::content(
        measure,
        metrics,
        BreakPosition::leaf(id, 0),
    )];
    Ok((elements, measure))
}

pub(super) fn replay(
    id: ManagerId,
    state: &TableRowState,
    children: &mut [LayoutManager],
    mut positions: PositionIter,
    ctx: &LayoutContext,
) -> Result<Vec<Area>, LayoutError> {
    let mut row_seen = false;
    while let Some((owner, run)) = positions.next_run() {
        if owner != id {
            return Err(LayoutError::ForeignPosition { owner, current: id });
        }
        for position in run {
            if let Some(inner) = position.inner() {
                return Err(LayoutError::ForeignPosition {
                    owner: inner.manager(),
                    current: id,
                });
            }
            if position.index() != 0 {
                return Err(LayoutError::InvalidPosition {
                    manager: id,
                    index: position.index(),
                });
            }
            row_seen = true;
        }
    }
    if !row_seen {
        return Ok(Vec::new());
    }

    let mut cells = Vec::new();
    for (child, stored) in children.iter_mut().zip(&state.cell_positions) {
        let child_ctx = ctx.for_child().span_flags(true, true);
        cells.extend(child.add_areas(PositionIter::new(stored.clone()), &child_ctx)?);
    }

    Ok(vec![Area {
        class: AreaClass::Normal,
        ipd: ctx.ref_ipd,
        bpd: state.row_measure,
        content: AreaContent::Row { cells },
    }])
}
