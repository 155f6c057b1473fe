//! Footnote-body manager.
//!
//! Stacks its children like a generic block, but every area it yields is
//! stamped with the footnote area class so the sink routes it to the
//! page's footnote region instead of the normal flow.

use super::{block, LayoutManager};
use crate::context::LayoutContext;
use crate::interface::{Area, AreaClass};
use crate::position::PositionIter;
use crate::LayoutError;
use galley_types::ManagerId;

pub struct FootnoteState;

pub(super) fn replay(
    id: ManagerId,
    children: &mut [LayoutManager],
    positions: PositionIter,
    ctx: &LayoutContext,
) -> Result<Vec<Area>, LayoutError> {
    let mut areas = block::replay_children(id, children, positions, ctx)?;
    for area in &mut areas {
        area.class = AreaClass::Footnote;
    }
    Ok(areas)
}
