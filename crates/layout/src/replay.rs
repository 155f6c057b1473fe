//! Area replay driver.
//!
//! Splits a broken sequence into spans and replays them strictly in
//! document order. Each span's side effects, including any upward
//! delegation its managers trigger, complete before the next span
//! begins; downstream managers rely on that to finalize accumulated
//! state.

use crate::algorithms::breaker::ChosenBreak;
use crate::context::LayoutContext;
use crate::element::BreakElement;
use crate::interface::AreaSink;
use crate::managers::LayoutManager;
use crate::position::{BreakPosition, PositionIter};
use crate::LayoutError;

/// Replays every span of `elements` delimited by `breaks` through `root`,
/// feeding finished areas to `sink`. Returns the number of spans
/// produced. The first/last-area flags are set exactly for the first and
/// final span.
pub fn replay_spans(
    root: &mut LayoutManager,
    elements: &[BreakElement],
    breaks: &[ChosenBreak],
    ctx: &LayoutContext,
    sink: &mut dyn AreaSink,
) -> Result<usize, LayoutError> {
    let span_count = breaks.len();
    let mut start = 0usize;
    for (k, chosen) in breaks.iter().enumerate() {
        let span_ctx = ctx.clone().span_flags(k == 0, k + 1 == span_count);
        let positions: Vec<BreakPosition> = elements[start..=chosen.index]
            .iter()
            .filter_map(|element| element.position.clone())
            .collect();
        log::trace!(
            "replaying span {}/{span_count} ({} positions)",
            k + 1,
            positions.len()
        );
        let areas = root.add_areas(PositionIter::new(positions), &span_ctx)?;
        for area in areas {
            sink.add_child_area(area);
        }
        start = chosen.index + 1;
    }
    Ok(span_count)
}
