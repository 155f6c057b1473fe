mod common;

use common::fixtures::{cell, document, table_of_cells, LINE_HEIGHT, IPD};
use common::{init_logging, InMemoryRegistry, PageSink, TestResult};
use galley::{
    AreaContent, GalleyError, LayoutPipeline, PipelineConfig, PropertyScope,
};
use std::cell::RefCell;
use std::rc::Rc;

fn paginate(
    flow: galley::FlowNode,
    page_measure: f32,
) -> Result<(galley::PaginationReport, PageSink), GalleyError> {
    init_logging();
    let pipeline = LayoutPipeline::new(PipelineConfig::new(page_measure, IPD));
    let registry = Rc::new(RefCell::new(InMemoryRegistry::default()));
    let mut sink = PageSink::with_ipd(IPD);
    let report = pipeline.paginate(flow, registry, &mut sink)?;
    Ok((report, sink))
}

fn row_shapes(area: &galley::Area) -> Vec<usize> {
    let mut shapes = Vec::new();
    match &area.content {
        AreaContent::Row { cells } => shapes.push(cells.len()),
        AreaContent::Block { children } | AreaContent::Inline { children } => {
            for child in children {
                shapes.extend(row_shapes(child));
            }
        }
        AreaContent::Line { .. } => {}
    }
    shapes
}

#[test]
fn test_bare_cells_normalize_and_lay_out() -> TestResult {
    // A opens an implicit row; B starts a new one; C ends it; D both
    // starts and ends its own: rows [A], [B, C], [D].
    let flow = document(vec![table_of_cells(
        vec![
            cell(&["aa"], false, false),
            cell(&["bb"], true, false),
            cell(&["cc"], false, true),
            cell(&["dd"], true, true),
        ],
        PropertyScope::new(),
    )]);

    let (report, sink) = paginate(flow, 20.0 * LINE_HEIGHT)?;
    assert_eq!(report.spans, 1);

    let shapes: Vec<usize> = sink.areas.iter().flat_map(|a| row_shapes(a)).collect();
    assert_eq!(shapes, vec![1, 2, 1]);
    Ok(())
}

#[test]
fn test_rows_break_across_spans() -> TestResult {
    let flow = document(vec![table_of_cells(
        vec![
            cell(&["first", "row"], false, true),
            cell(&["second", "row"], false, true),
        ],
        PropertyScope::new(),
    )]);

    // One single-line row per span.
    let (report, sink) = paginate(flow, LINE_HEIGHT)?;
    assert_eq!(report.spans, 2);
    assert_eq!(sink.areas.len(), 2);
    for area in &sink.areas {
        assert_eq!(row_shapes(area), vec![1]);
    }
    Ok(())
}

#[test]
fn test_row_break_before_forces_span_breaks() -> TestResult {
    let mut scope = PropertyScope::new();
    scope.declare("break-before", "page");
    let flow = document(vec![table_of_cells(
        vec![
            cell(&["one"], false, true),
            cell(&["two"], false, true),
            cell(&["three"], false, true),
        ],
        scope,
    )]);

    // The page would fit all three rows; the rows' own break-before
    // splits them anyway.
    let (report, _) = paginate(flow, 20.0 * LINE_HEIGHT)?;
    assert_eq!(report.spans, 3);
    Ok(())
}

#[test]
fn test_row_binding_fault_is_fatal_for_the_container() {
    init_logging();
    let mut scope = PropertyScope::new();
    scope.declare("break-before", "never-ever");
    let flow = document(vec![table_of_cells(
        vec![cell(&["x"], false, false)],
        scope,
    )]);

    let pipeline = LayoutPipeline::new(PipelineConfig::new(100.0, IPD));
    let registry = Rc::new(RefCell::new(InMemoryRegistry::default()));
    let mut sink = PageSink::with_ipd(IPD);
    let err = pipeline.paginate(flow, registry, &mut sink).unwrap_err();
    assert!(matches!(err, GalleyError::Binding(_)));
}
