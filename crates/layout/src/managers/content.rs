//! Inline content manager.
//!
//! For objects holding inline material laid out in one shot: leader
//! use-content and title. It passes its child's elements through
//! unwrapped, tracks their stacking size, and can fill its holder area in
//! a single generate-and-replay cycle at an effectively unbounded measure.

use super::{LayoutManager, ManagerKind, DEFAULT_FOLLOW, DEFAULT_LEAD, DEFAULT_LINE_HEIGHT};
use crate::config::Alignment;
use crate::context::LayoutContext;
use crate::element::{BreakElement, ElementKind};
use crate::interface::{Area, AreaContent};
use crate::position::{BreakPosition, PositionIter};
use crate::LayoutError;
use galley_types::ManagerId;

const UNBOUNDED_IPD: f32 = 1_000_000.0;

pub struct ContentState {
    holder: Area,
}

impl ContentState {
    pub(super) fn new(holder: Area) -> Self {
        Self { holder }
    }

    pub(super) fn holder(&self) -> &Area {
        &self.holder
    }
}

impl LayoutManager {
    /// The inline holder of a content manager, if this is one.
    pub fn holder(&self) -> Option<&Area> {
        match &self.kind {
            ManagerKind::Content(state) => Some(state.holder()),
            _ => None,
        }
    }
}

pub(super) fn generate(
    children: &mut [LayoutManager],
    ctx: &LayoutContext,
    alignment: Alignment,
) -> Result<(Vec<BreakElement>, f32), LayoutError> {
    let mut elements = Vec::new();
    let mut size = 0.0;
    for child in children.iter_mut() {
        while !child.is_finished() {
            let pulled = child.generate(&ctx.for_child(), alignment)?;
            for element in &pulled {
                if element.is_box() {
                    size += element.natural_measure();
                }
            }
            // Passed through unwrapped: this manager is transparent to the
            // position chain.
            elements.extend(pulled);
        }
    }
    Ok((elements, size))
}

pub(super) fn replay(
    id: ManagerId,
    state: &mut ContentState,
    children: &mut [LayoutManager],
    mut positions: PositionIter,
    ctx: &LayoutContext,
) -> Result<Vec<Area>, LayoutError> {
    // The holder's measure was already adjusted by the caller and must
    // remain unchanged, so save it and set it back once the children are
    // done; their context gets a zero adjustment ratio so inline spaces
    // are not re-modified.
    let saved_ipd = state.holder.ipd;
    let mut child_ctx = ctx.for_child();
    child_ctx.ipd_adjust = 0.0;

    let mut areas = Vec::new();
    let mut first = true;
    while let Some((owner, run)) = positions.next_run() {
        let is_final = positions.next_owner().is_none();
        let child = children
            .iter_mut()
            .find(|c| c.id() == owner)
            .ok_or(LayoutError::UnknownChild {
                parent: id,
                child: owner,
            })?;
        let run_ctx = child_ctx.clone().span_flags(
            ctx.is_first_area && first,
            ctx.is_last_area && is_final,
        );
        areas.extend(child.add_areas(PositionIter::new(run), &run_ctx)?);
        first = false;
    }

    if let AreaContent::Inline { children: held } = &mut state.holder.content {
        held.extend(areas);
    }
    state.holder.ipd = saved_ipd;
    Ok(Vec::new())
}

/// Single-shot layout of the held content: generate at an effectively
/// unbounded measure, fold the boxes' baseline metadata into line metrics,
/// then replay everything into the holder.
pub(super) fn fill<'m>(
    mgr: &'m mut LayoutManager,
    ctx: &LayoutContext,
) -> Result<&'m Area, LayoutError> {
    let mut gen_ctx = ctx.for_child();
    gen_ctx.ref_ipd = UNBOUNDED_IPD;
    gen_ctx.target = UNBOUNDED_IPD;
    let elements = mgr.generate(&gen_ctx, Alignment::Start)?;

    let half_leading = (DEFAULT_LINE_HEIGHT - DEFAULT_LEAD - DEFAULT_FOLLOW) / 2.0;
    // Height before the baseline.
    let mut line_lead = DEFAULT_LEAD + half_leading;
    // Maximum extent of top and bottom alignment.
    let mut max_tb = DEFAULT_FOLLOW + half_leading;
    // Maximum extent of middle alignment below the baseline.
    let mut middle_follow = max_tb;
    for element in &elements {
        if let ElementKind::Box { metrics, .. } = &element.kind {
            line_lead = line_lead.max(metrics.lead);
            max_tb = max_tb.max(metrics.total);
            middle_follow = middle_follow.max(metrics.middle);
        }
    }
    if max_tb - line_lead > middle_follow {
        middle_follow = max_tb - line_lead;
    }

    let mut replay_ctx = ctx.for_child().span_flags(true, true);
    replay_ctx.resolve_leading_space = true;
    let positions: Vec<BreakPosition> = elements
        .into_iter()
        .filter_map(|element| element.position)
        .collect();
    mgr.add_areas(PositionIter::new(positions), &replay_ctx)?;

    let kind_name = mgr.kind_name();
    match &mut mgr.kind {
        ManagerKind::Content(state) => {
            state.holder.bpd = line_lead + middle_follow;
            Ok(&state.holder)
        }
        _ => Err(LayoutError::BuilderMismatch("Content", kind_name)),
    }
}
