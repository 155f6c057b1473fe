//! The pagination pipeline.
//!
//! Ties the phases together in their fixed order: normalize table
//! structure, build the manager tree, harvest the breakable sequence,
//! choose breaks against the page target, replay the chosen spans into
//! the caller's area sink. Quality diagnostics from every scope are
//! gathered and returned alongside the result rather than thrown.

use crate::GalleyError;
use galley_flow::{normalize_tree, FlowNode};
use galley_layout::{
    find_breaks, replay_spans, validate_sequence, Alignment, AreaSink, BreakDiagnostic,
    BreakElement, BreakPosition, BreakerConfig, FlexMeasure, LayoutContext, ManagerFactory,
    ReferenceRegistry,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Target stacking measure per span (the page's block-progression
    /// extent).
    pub page_measure: f32,
    /// Inline-progression measure handed to line-level scopes.
    pub ipd: f32,
    pub alignment: Alignment,
    /// Stretch-ratio tolerance forwarded to the breaking engine.
    pub tolerance: f32,
}

impl PipelineConfig {
    pub fn new(page_measure: f32, ipd: f32) -> Self {
        Self {
            page_measure,
            ipd,
            alignment: Alignment::Start,
            tolerance: 1.0,
        }
    }
}

/// What one pagination pass produced, beyond the areas handed to the sink.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationReport {
    pub spans: usize,
    pub diagnostics: Vec<BreakDiagnostic>,
}

pub struct LayoutPipeline {
    config: PipelineConfig,
}

impl LayoutPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs one full pass over `flow`. The manager tree built here lives
    /// for exactly this pass.
    pub fn paginate(
        &self,
        mut flow: FlowNode,
        registry: Rc<RefCell<dyn ReferenceRegistry>>,
        sink: &mut dyn AreaSink,
    ) -> Result<PaginationReport, GalleyError> {
        normalize_tree(&mut flow)?;

        let mut factory = ManagerFactory::new();
        let mut root = factory.build(&flow)?;
        root.assign_delegation_root(registry);

        let ctx = LayoutContext::new(self.config.page_measure, self.config.ipd)
            .aligned(self.config.alignment);
        let mut elements = root.generate(&ctx, self.config.alignment)?;
        if elements.is_empty() {
            // Nothing breakable: the whole scope is one unbroken span.
            log::debug!("empty sequence, nothing to paginate");
            return Ok(PaginationReport {
                spans: 0,
                diagnostics: Vec::new(),
            });
        }

        // Close the scope: filler glue takes up the last span's slack,
        // the forced terminator ends it.
        if !elements.last().is_some_and(BreakElement::is_forced_break) {
            elements.push(BreakElement::glue(FlexMeasure::new(
                0.0,
                0.0,
                self.config.page_measure,
            )));
            elements.push(BreakElement::forced_break(BreakPosition::leaf(
                root.id(),
                elements.len(),
            )));
        }
        validate_sequence(&elements)?;

        let breaker = BreakerConfig {
            target: self.config.page_measure,
            tolerance: self.config.tolerance,
            alignment: self.config.alignment,
            ..Default::default()
        };
        let result = find_breaks(&elements, &breaker)?;
        log::debug!(
            "chose {} breaks, {} diagnostics",
            result.breaks.len(),
            result.diagnostics.len()
        );

        let spans = replay_spans(&mut root, &elements, &result.breaks, &ctx, sink)?;

        let mut diagnostics = result.diagnostics;
        diagnostics.extend(root.take_diagnostics());
        Ok(PaginationReport { spans, diagnostics })
    }
}
