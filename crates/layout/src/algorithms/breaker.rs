//! Optimal break selection.
//!
//! Chooses break points in a breakable-content sequence minimizing total
//! demerits: a convex cost of how far each span's adjusted measure deviates
//! from the target, scaled by the span's own stretch/shrink budget. The
//! frontier of active candidates makes this a global optimum per scope;
//! greedy first-fit produces visually uneven spans and is deliberately not
//! offered.

use crate::config::BreakerConfig;
use crate::element::{BreakElement, ElementKind};
use crate::LayoutError;
use galley_types::{BreakDiagnostic, FlexMeasure};

const MEASURE_EPS: f32 = 0.01;
const RATIO_EPS: f32 = 1e-3;

/// One selected break: the element index of the penalty broken at and the
/// adjustment ratio of the span ending there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChosenBreak {
    pub index: usize,
    pub ratio: f32,
}

#[derive(Debug, Clone, Default)]
pub struct BreakingResult {
    pub breaks: Vec<ChosenBreak>,
    pub diagnostics: Vec<BreakDiagnostic>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    width: f32,
    stretch: f32,
    shrink: f32,
}

impl Totals {
    fn add_glue(&mut self, measure: &FlexMeasure) {
        self.width += measure.opt;
        self.stretch += measure.stretch();
        self.shrink += measure.shrink();
    }
}

/// A break candidate: one node of the chain arena. `prev` links toward the
/// scope start; the surviving chain is unwound from the terminator.
#[derive(Debug, Clone)]
struct Candidate {
    /// Element index of the break this chain ends at; `None` for the
    /// scope start.
    at: Option<usize>,
    ratio: f32,
    demerits: f64,
    breaks: u32,
    flagged: bool,
    prev: Option<usize>,
    /// Running totals at this candidate's restart point. Glue between the
    /// break and the first following box is absorbed here, so it never
    /// counts toward the next span.
    totals: Totals,
    /// No box seen since the restart point.
    fresh: bool,
}

struct Evaluation {
    prev: usize,
    ratio: f32,
    demerits: f64,
}

pub fn find_breaks(
    elements: &[BreakElement],
    config: &BreakerConfig,
) -> Result<BreakingResult, LayoutError> {
    if elements.is_empty() {
        return Ok(BreakingResult::default());
    }
    // Full well-formedness is the producer's duty; the engine insists only
    // on the terminator it navigates by. This keeps degenerate inputs
    // (e.g. a run of bare forced penalties) breakable as empty spans.
    if !elements[elements.len() - 1].is_forced_break() {
        return Err(LayoutError::MalformedSequence(
            "sequence must end with a forced penalty",
        ));
    }

    let mut nodes: Vec<Candidate> = vec![Candidate {
        at: None,
        ratio: 0.0,
        demerits: 0.0,
        breaks: 0,
        flagged: false,
        prev: None,
        totals: Totals::default(),
        fresh: true,
    }];
    let mut active: Vec<usize> = vec![0];
    // Most recently pruned candidate, kept for the least-bad fallback.
    let mut fallback: Option<usize> = None;
    let mut totals = Totals::default();
    let mut diagnostics: Vec<BreakDiagnostic> = Vec::new();
    let mut final_node: Option<usize> = None;

    for (i, element) in elements.iter().enumerate() {
        match &element.kind {
            ElementKind::Box { measure, .. } => {
                totals.width += measure;
                for &n in &active {
                    nodes[n].fresh = false;
                }
            }
            ElementKind::Glue { measure } => {
                totals.add_glue(measure);
                for &n in &active {
                    if nodes[n].fresh {
                        nodes[n].totals.add_glue(measure);
                    }
                }
            }
            ElementKind::Penalty {
                cost,
                width,
                forced,
            } => {
                if cost.is_infinite() && !forced {
                    continue;
                }
                let flagged = *width > 0.0;

                let mut pick = best_feasible(
                    &nodes,
                    &active,
                    totals,
                    *width,
                    cost.value(),
                    flagged,
                    config,
                    config.tolerance,
                );

                if *forced {
                    if pick.is_none() {
                        // Progressive relaxation: widen the acceptable
                        // stretch ratio before settling for the least-bad
                        // chain.
                        let mut tolerance = config.tolerance;
                        for _ in 0..config.relax_steps {
                            tolerance *= 2.0;
                            pick = best_feasible(
                                &nodes,
                                &active,
                                totals,
                                *width,
                                cost.value(),
                                flagged,
                                config,
                                tolerance,
                            );
                            if pick.is_some() {
                                log::debug!(
                                    "tolerance relaxed to {tolerance} for break at element {i}"
                                );
                                break;
                            }
                        }
                    }
                    let pick = match pick {
                        Some(eval) => eval,
                        None => least_bad(
                            &nodes,
                            &active,
                            fallback,
                            totals,
                            *width,
                            i,
                            config,
                            &mut diagnostics,
                        ),
                    };
                    let node = chain(&nodes, pick, i, flagged, totals);
                    nodes.push(node);
                    let idx = nodes.len() - 1;
                    active.clear();
                    active.push(idx);
                    fallback = None;
                    if i == elements.len() - 1 {
                        final_node = Some(idx);
                    }
                } else {
                    if let Some(eval) = pick {
                        let node = chain(&nodes, eval, i, flagged, totals);
                        nodes.push(node);
                        active.push(nodes.len() - 1);
                    }
                    // Candidates that can no longer shrink onto any later
                    // break are dead weight from here on.
                    let target = config.target;
                    active.retain(|&n| {
                        let node = &nodes[n];
                        let w = totals.width - node.totals.width;
                        let z = totals.shrink - node.totals.shrink;
                        let keep = node.fresh || w - z <= target + MEASURE_EPS;
                        if !keep {
                            fallback = Some(n);
                        }
                        keep
                    });
                }
            }
        }
    }

    let final_node = final_node.ok_or(LayoutError::MalformedSequence(
        "no forced terminator was reached",
    ))?;

    let mut breaks = Vec::new();
    let mut cursor = Some(final_node);
    while let Some(idx) = cursor {
        let node = &nodes[idx];
        if let Some(at) = node.at {
            breaks.push(ChosenBreak {
                index: at,
                ratio: node.ratio,
            });
        }
        cursor = node.prev;
    }
    breaks.reverse();

    Ok(BreakingResult {
        breaks,
        diagnostics,
    })
}

fn chain(
    nodes: &[Candidate],
    eval: Evaluation,
    at: usize,
    flagged: bool,
    totals: Totals,
) -> Candidate {
    Candidate {
        at: Some(at),
        ratio: eval.ratio,
        demerits: eval.demerits,
        breaks: nodes[eval.prev].breaks + 1,
        flagged,
        prev: Some(eval.prev),
        totals,
        fresh: true,
    }
}

/// Adjustment ratio of the segment from `node`'s restart point to a break
/// here carrying `penalty_width`.
fn segment_ratio(node: &Candidate, totals: Totals, penalty_width: f32, target: f32) -> f32 {
    let w = totals.width + penalty_width - node.totals.width;
    // A span with no content at all is an empty span, permitted by policy.
    if node.fresh && w.abs() < MEASURE_EPS {
        return 0.0;
    }
    let diff = target - w;
    if diff.abs() < MEASURE_EPS {
        0.0
    } else if diff > 0.0 {
        let stretch = totals.stretch - node.totals.stretch;
        if stretch > 0.0 {
            diff / stretch
        } else {
            f32::INFINITY
        }
    } else {
        let shrink = totals.shrink - node.totals.shrink;
        if shrink > 0.0 {
            diff / shrink
        } else {
            f32::NEG_INFINITY
        }
    }
}

fn segment_demerits(
    ratio: f32,
    cost: f32,
    prev_flagged: bool,
    flagged: bool,
    config: &BreakerConfig,
) -> f64 {
    let badness = 100.0 * f64::from(ratio.abs()).powi(3);
    let mut demerits = (1.0 + badness).powi(2);
    if cost.is_finite() {
        if cost >= 0.0 {
            demerits += f64::from(cost).powi(2);
        } else {
            demerits -= f64::from(cost).powi(2);
        }
    }
    if prev_flagged && flagged {
        demerits += f64::from(config.flagged_demerit);
    }
    demerits.max(0.0)
}

#[allow(clippy::too_many_arguments)]
fn best_feasible(
    nodes: &[Candidate],
    active: &[usize],
    totals: Totals,
    penalty_width: f32,
    cost: f32,
    flagged: bool,
    config: &BreakerConfig,
    tolerance: f32,
) -> Option<Evaluation> {
    let mut best: Option<(f64, u32, usize, Evaluation)> = None;
    for &n in active {
        let node = &nodes[n];
        let ratio = segment_ratio(node, totals, penalty_width, config.target);
        if ratio < -1.0 - RATIO_EPS || ratio > tolerance + RATIO_EPS {
            continue;
        }
        let demerits =
            node.demerits + segment_demerits(ratio, cost, node.flagged, flagged, config);
        // Ties: fewer breaks along the chain, then the earliest break
        // position. Deterministic regardless of frontier order.
        let key = (demerits, node.breaks + 1, node.at.map_or(0, |at| at + 1));
        let better = match &best {
            None => true,
            Some((d, b, a, _)) => key < (*d, *b, *a),
        };
        if better {
            best = Some((
                key.0,
                key.1,
                key.2,
                Evaluation {
                    prev: n,
                    ratio,
                    demerits,
                },
            ));
        }
    }
    best.map(|(_, _, _, eval)| eval)
}

/// No candidate survived relaxation before a forced break: pick the chain
/// with the smallest unreachable length and report the span as
/// overfull/underfull.
#[allow(clippy::too_many_arguments)]
fn least_bad(
    nodes: &[Candidate],
    active: &[usize],
    fallback: Option<usize>,
    totals: Totals,
    penalty_width: f32,
    element_index: usize,
    config: &BreakerConfig,
    diagnostics: &mut Vec<BreakDiagnostic>,
) -> Evaluation {
    let pool: Vec<usize> = if active.is_empty() {
        fallback.into_iter().collect()
    } else {
        active.to_vec()
    };

    let mut best: Option<(f32, u32, usize, f32, usize)> = None;
    for &n in &pool {
        let node = &nodes[n];
        let w = totals.width + penalty_width - node.totals.width;
        let stretch = totals.stretch - node.totals.stretch;
        let shrink = totals.shrink - node.totals.shrink;
        // Signed unreachable length: positive = overfull.
        let deviation = if w > config.target {
            (w - shrink) - config.target
        } else {
            -((config.target - (w + stretch)).max(0.0))
        };
        let key = (
            deviation.abs(),
            node.breaks + 1,
            node.at.map_or(0, |at| at + 1),
        );
        let better = match &best {
            None => true,
            Some((d, b, a, _, _)) => key < (*d, *b, *a),
        };
        if better {
            best = Some((key.0, key.1, key.2, deviation, n));
        }
    }

    // The frontier always holds at least the restart candidate of the
    // previous forced break, so `pool` cannot be empty for a well-formed
    // sequence; guard anyway rather than panic in a release build.
    let (_, _, _, deviation, n) = best.unwrap_or((0.0, 0, 0, 0.0, 0));

    let node = &nodes[n];
    let raw_ratio = segment_ratio(node, totals, penalty_width, config.target);
    let max_ratio = config.tolerance * 2f32.powi(config.relax_steps as i32);
    let ratio = raw_ratio.clamp(-1.0, max_ratio);

    if deviation > 0.0 {
        log::warn!(
            "overfull span before element {element_index}: {deviation:.2} beyond target"
        );
        diagnostics.push(BreakDiagnostic::overfull(element_index, deviation));
    } else {
        let missing = -deviation;
        log::warn!(
            "underfull span before element {element_index}: {missing:.2} short of target"
        );
        diagnostics.push(BreakDiagnostic::underfull(element_index, missing));
    }

    Evaluation {
        prev: n,
        ratio,
        demerits: node.demerits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BoxMetrics, Cost};
    use crate::position::BreakPosition;
    use galley_types::{DiagnosticKind, ManagerId};

    fn pos(index: usize) -> BreakPosition {
        BreakPosition::leaf(ManagerId::new(1), index)
    }

    fn boxed(measure: f32) -> BreakElement {
        BreakElement::content(measure, BoxMetrics::default(), pos(0))
    }

    fn glue(opt: f32, stretch: f32, shrink: f32) -> BreakElement {
        BreakElement::glue(FlexMeasure::new(opt - shrink, opt, opt + stretch))
    }

    fn penalty(cost: f32, index: usize) -> BreakElement {
        BreakElement::penalty(Cost::new(cost), pos(index))
    }

    fn forced(index: usize) -> BreakElement {
        BreakElement::forced_break(pos(index))
    }

    /// Reference evaluation of a specific break set, same cost model as
    /// the engine. Returns None when any span is infeasible at tolerance.
    fn total_demerits(
        elements: &[BreakElement],
        config: &BreakerConfig,
        break_set: &[usize],
    ) -> Option<f64> {
        let mut total = 0.0;
        let mut from = 0usize;
        let mut prev_flagged = false;
        for &at in break_set {
            let mut width = 0.0;
            let mut stretch = 0.0;
            let mut shrink = 0.0;
            let mut seen_box = false;
            for element in &elements[from..at] {
                match &element.kind {
                    ElementKind::Box { measure, .. } => {
                        width += measure;
                        seen_box = true;
                    }
                    ElementKind::Glue { measure } => {
                        // Leading glue after a break is discarded.
                        if seen_box {
                            width += measure.opt;
                            stretch += measure.stretch();
                            shrink += measure.shrink();
                        }
                    }
                    ElementKind::Penalty { .. } => {}
                }
            }
            let (p_cost, p_width, p_flagged) = match &elements[at].kind {
                ElementKind::Penalty { cost, width, .. } => {
                    (cost.value(), *width, *width > 0.0)
                }
                _ => return None,
            };
            width += p_width;
            let diff = config.target - width;
            let ratio = if !seen_box && width.abs() < MEASURE_EPS {
                0.0
            } else if diff.abs() < MEASURE_EPS {
                0.0
            } else if diff > 0.0 {
                if stretch > 0.0 {
                    diff / stretch
                } else {
                    return None;
                }
            } else if shrink > 0.0 {
                diff / shrink
            } else {
                return None;
            };
            if !(-1.0 - RATIO_EPS..=config.tolerance + RATIO_EPS).contains(&ratio) {
                return None;
            }
            total += segment_demerits(ratio, p_cost, prev_flagged, p_flagged, config);
            prev_flagged = p_flagged;
            from = at + 1;
        }
        Some(total)
    }

    #[test]
    fn test_empty_sequence_yields_no_breaks() {
        let result = find_breaks(&[], &BreakerConfig::for_target(100.0)).unwrap();
        assert!(result.breaks.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_single_span_fits() {
        let seq = vec![boxed(50.0), glue(10.0, 5.0, 3.0), boxed(40.0), forced(3)];
        let result = find_breaks(&seq, &BreakerConfig::for_target(100.0)).unwrap();
        assert_eq!(result.breaks.len(), 1);
        assert_eq!(result.breaks[0].index, 3);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_forced_breaks_always_appear() {
        let seq = vec![
            boxed(50.0),
            forced(1),
            boxed(50.0),
            forced(3),
            boxed(50.0),
            forced(5),
        ];
        let config = BreakerConfig::for_target(50.0);
        let result = find_breaks(&seq, &config).unwrap();
        let chosen: Vec<usize> = result.breaks.iter().map(|b| b.index).collect();
        assert_eq!(chosen, vec![1, 3, 5]);
    }

    #[test]
    fn test_infinite_penalty_is_never_selected() {
        let seq = vec![
            boxed(50.0),
            BreakElement::penalty(Cost::INFINITE, pos(1)),
            glue(10.0, 60.0, 5.0),
            boxed(50.0),
            forced(4),
        ];
        let result = find_breaks(&seq, &BreakerConfig::for_target(110.0)).unwrap();
        let chosen: Vec<usize> = result.breaks.iter().map(|b| b.index).collect();
        assert_eq!(chosen, vec![4]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_only_forced_penalties_give_empty_spans() {
        let seq = vec![forced(0), forced(1), forced(2)];
        let result = find_breaks(&seq, &BreakerConfig::for_target(100.0)).unwrap();
        let chosen: Vec<usize> = result.breaks.iter().map(|b| b.index).collect();
        assert_eq!(chosen, vec![0, 1, 2]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_overfull_is_diagnosed_not_fatal() {
        let seq = vec![boxed(150.0), forced(1)];
        let result = find_breaks(&seq, &BreakerConfig::for_target(100.0)).unwrap();
        assert_eq!(result.breaks.len(), 1);
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::Overfull);
        assert!((diag.deviation - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_underfull_is_diagnosed_not_fatal() {
        let seq = vec![boxed(10.0), forced(1)];
        let result = find_breaks(&seq, &BreakerConfig::for_target(100.0)).unwrap();
        assert_eq!(result.breaks.len(), 1);
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::Underfull);
        assert!((diag.deviation - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_relaxation_recovers_without_diagnostic() {
        // Needs ratio 2.0: rejected at tolerance 1.0, accepted after one
        // doubling.
        let seq = vec![boxed(50.0), glue(10.0, 10.0, 0.0), boxed(20.0), forced(3)];
        let result = find_breaks(&seq, &BreakerConfig::for_target(100.0)).unwrap();
        assert_eq!(result.breaks.len(), 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_penalty_width_counts_only_at_the_break() {
        // Breaking at the width-carrying penalty is feasible only because
        // its width joins the span; the width must not leak into the
        // running totals of spans that pass it by.
        let flagged = BreakElement {
            kind: ElementKind::Penalty {
                cost: Cost::ZERO,
                width: 5.0,
                forced: false,
            },
            position: Some(pos(1)),
        };
        let seq = vec![
            boxed(100.0),
            flagged,
            glue(5.0, 5.0, 5.0),
            boxed(100.0),
            BreakElement::glue(FlexMeasure::new(0.0, 0.0, 105.0)),
            forced(5),
        ];
        let result = find_breaks(&seq, &BreakerConfig::for_target(105.0)).unwrap();
        let chosen: Vec<usize> = result.breaks.iter().map(|b| b.index).collect();
        assert_eq!(chosen, vec![1, 5]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_choice_is_globally_optimal() {
        // Five words, two lines somewhere. Enumerate every legal break
        // set and confirm nothing beats the engine's choice.
        let seq = vec![
            boxed(30.0),             // 0
            penalty(0.0, 1),         // 1
            glue(10.0, 8.0, 4.0),    // 2
            boxed(35.0),             // 3
            penalty(0.0, 4),         // 4
            glue(10.0, 8.0, 4.0),    // 5
            boxed(30.0),             // 6
            penalty(0.0, 7),         // 7
            glue(10.0, 8.0, 4.0),    // 8
            boxed(35.0),             // 9
            forced(10),              // 10
        ];
        let config = BreakerConfig::for_target(80.0);
        let result = find_breaks(&seq, &config).unwrap();
        let chosen: Vec<usize> = result.breaks.iter().map(|b| b.index).collect();
        let engine_demerits =
            total_demerits(&seq, &config, &chosen).expect("chosen set must be feasible");

        let optional = [1usize, 4, 7];
        for mask in 0u32..8 {
            let mut alternative: Vec<usize> = optional
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &at)| at)
                .collect();
            alternative.push(10);
            if let Some(d) = total_demerits(&seq, &config, &alternative) {
                assert!(
                    engine_demerits <= d + 1e-6,
                    "break set {alternative:?} has {d} demerits, engine chose \
                     {chosen:?} with {engine_demerits}"
                );
            }
        }
    }

    #[test]
    fn test_uneven_greedy_split_is_rejected() {
        // First-fit would shrink [40 10 40 10 40] onto the first line at
        // ratio -1 and leave a sparse remainder; the optimizer spends three
        // mildly stretched lines instead.
        let seq = vec![
            boxed(40.0),              // 0
            penalty(0.0, 1),          // 1
            glue(10.0, 20.0, 20.0),   // 2
            boxed(40.0),              // 3
            penalty(0.0, 4),          // 4
            glue(10.0, 20.0, 20.0),   // 5
            boxed(40.0),              // 6
            penalty(0.0, 7),          // 7
            glue(10.0, 20.0, 20.0),   // 8
            boxed(40.0),              // 9
            penalty(0.0, 10),         // 10
            glue(10.0, 20.0, 20.0),   // 11
            boxed(40.0),              // 12
            glue(0.0, 1000.0, 0.0),   // 13: finishing glue of the scope
            forced(14),               // 14
        ];
        let config = BreakerConfig::for_target(100.0);
        let result = find_breaks(&seq, &config).unwrap();
        let chosen: Vec<usize> = result.breaks.iter().map(|b| b.index).collect();
        assert_eq!(chosen, vec![4, 10, 14], "expected the balanced three-line split");
        assert!(result.diagnostics.is_empty());

        // The first-fit alternative is feasible too, just worse.
        let greedy = total_demerits(&seq, &config, &[7, 14]).expect("greedy split is feasible");
        let ours = total_demerits(&seq, &config, &[4, 10, 14]).unwrap();
        assert!(ours < greedy);
    }
}
