//! Line-content manager.
//!
//! Owns a paragraph's pre-measured inline content and runs the breaking
//! engine at line level: the IPD is the target measure, inter-word spaces
//! are penalty + glue pairs. What the parent scope sees is one box per
//! line with penalties in between, so an outer breaking pass can split the
//! paragraph across spans without ever looking inside a line.

use super::{DEFAULT_FOLLOW, DEFAULT_LEAD, DEFAULT_LINE_HEIGHT};
use crate::algorithms::breaker::find_breaks;
use crate::config::{Alignment, BreakerConfig};
use crate::context::LayoutContext;
use crate::element::{BoxMetrics, BreakElement, Cost, ElementKind};
use crate::interface::{Area, AreaClass, AreaContent};
use crate::position::{BreakPosition, PositionIter};
use crate::LayoutError;
use galley_flow::InlineItem;
use galley_types::{BreakDiagnostic, FlexMeasure, ManagerId};

pub struct LineState {
    items: Vec<InlineItem>,
    lines: Vec<LineSpan>,
    /// Maps an element slot of the generated (outer) sequence to the line
    /// it stands for; `None` slots are the penalties between lines.
    slots: Vec<Option<usize>>,
}

#[derive(Debug, Clone)]
struct LineSpan {
    texts: Vec<String>,
    ratio: f32,
    height: f32,
}

impl LineState {
    pub(super) fn new(items: Vec<InlineItem>) -> Self {
        Self {
            items,
            lines: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub(super) fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

pub(super) fn generate(
    id: ManagerId,
    state: &mut LineState,
    ctx: &LayoutContext,
) -> Result<(Vec<BreakElement>, f32, Vec<BreakDiagnostic>), LayoutError> {
    state.lines.clear();
    state.slots.clear();
    if state.items.is_empty() {
        return Ok((Vec::new(), 0.0, Vec::new()));
    }

    // Inline-level sequence: a box per run, penalty + glue per space.
    let mut inline: Vec<BreakElement> = Vec::new();
    let mut run_texts: Vec<(usize, String)> = Vec::new();
    for item in &state.items {
        match item {
            InlineItem::Run {
                text,
                measure,
                lead,
                total,
                middle,
            } => {
                run_texts.push((inline.len(), text.clone()));
                inline.push(BreakElement::content(
                    *measure,
                    BoxMetrics {
                        lead: *lead,
                        total: *total,
                        middle: *middle,
                    },
                    BreakPosition::leaf(id, inline.len()),
                ));
            }
            InlineItem::Space { measure } => {
                inline.push(BreakElement::penalty(
                    Cost::ZERO,
                    BreakPosition::leaf(id, inline.len()),
                ));
                inline.push(BreakElement::glue(*measure));
            }
            InlineItem::ForcedBreak => {
                inline.push(BreakElement::forced_break(BreakPosition::leaf(
                    id,
                    inline.len(),
                )));
            }
        }
    }
    // Finishing glue swallows the last line's slack, then the terminator.
    inline.push(BreakElement::glue(FlexMeasure::new(0.0, 0.0, ctx.ref_ipd)));
    inline.push(BreakElement::forced_break(BreakPosition::leaf(
        id,
        inline.len(),
    )));

    let config = BreakerConfig::for_target(ctx.ref_ipd).aligned(ctx.alignment);
    let result = find_breaks(&inline, &config)?;
    log::trace!(
        "{id}: broke {} inline items into {} lines",
        state.items.len(),
        result.breaks.len()
    );

    let mut outer: Vec<BreakElement> = Vec::new();
    let mut total_size = 0.0;
    let mut span_start = 0usize;
    let mut texts_cursor = 0usize;
    for chosen in &result.breaks {
        let mut texts = Vec::new();
        while texts_cursor < run_texts.len() && run_texts[texts_cursor].0 <= chosen.index {
            texts.push(run_texts[texts_cursor].1.clone());
            texts_cursor += 1;
        }

        let mut height = DEFAULT_LINE_HEIGHT;
        let mut lead = DEFAULT_LEAD;
        let mut middle = DEFAULT_FOLLOW;
        for element in &inline[span_start..chosen.index] {
            if let ElementKind::Box { metrics, .. } = &element.kind {
                height = height.max(metrics.total);
                lead = lead.max(metrics.lead);
                middle = middle.max(metrics.middle);
            }
        }

        let line_index = state.lines.len();
        if line_index > 0 {
            state.slots.push(None);
            outer.push(BreakElement::penalty(
                Cost::ZERO,
                BreakPosition::leaf(id, outer.len()),
            ));
        }
        state.slots.push(Some(line_index));
        outer.push(BreakElement::content(
            height,
            BoxMetrics {
                lead,
                total: height,
                middle,
            },
            BreakPosition::leaf(id, outer.len()),
        ));
        total_size += height;
        state.lines.push(LineSpan {
            texts,
            ratio: chosen.ratio,
            height,
        });
        span_start = chosen.index + 1;
    }

    Ok((outer, total_size, result.diagnostics))
}

pub(super) fn replay(
    id: ManagerId,
    state: &LineState,
    mut positions: PositionIter,
    ctx: &LayoutContext,
) -> Result<Vec<Area>, LayoutError> {
    let mut areas = Vec::new();
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
            match state.slots.get(position.index()) {
                Some(Some(line_index)) => {
                    let line = &state.lines[*line_index];
                    let ratio = if ctx.alignment == Alignment::Justify {
                        line.ratio
                    } else {
                        0.0
                    };
                    areas.push(Area {
                        class: AreaClass::Normal,
                        ipd: ctx.ref_ipd,
                        bpd: line.height,
                        content: AreaContent::Line {
                            texts: line.texts.clone(),
                            ratio,
                        },
                    });
                }
                // A break decision inside the paragraph: nothing to
                // materialize.
                Some(None) => {}
                None => {
                    return Err(LayoutError::InvalidPosition {
                        manager: id,
                        index: position.index(),
                    });
                }
            }
        }
    }
    Ok(areas)
}
