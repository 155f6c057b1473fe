//! Table structure normalization.
//!
//! When table cells are used as direct children of a table body they are
//! regrouped here into proper rows before any layout manager sees the
//! table. Runs at most once per body: the first-child check short-circuits
//! a second invocation.

use crate::node::{FlowNode, TableBody, TableChild, TableRow};
use crate::properties::BindingError;

/// Replaces bare cell children of `body` with synthesized rows.
///
/// A cell that starts a new row closes the currently open row first; a cell
/// that ends the current row closes it immediately after being placed; any
/// cell without an open row opens one implicitly. Each synthesized row is
/// bound once against the body's saved property scope. On a binding fault
/// the rows already emitted stay in place and the fault propagates; the
/// saved scope is released on every path.
pub fn convert_cells_to_rows(body: &mut TableBody) -> Result<(), BindingError> {
    if body.children.is_empty() || matches!(body.children[0], TableChild::Row(_)) {
        return Ok(());
    }
    log::debug!("converting {} bare cells to rows", body.children.len());

    // Owned for the duration of this call; dropped on return, fault
    // path included.
    let scope = body.take_saved_scope().ok_or(BindingError::ScopeReleased)?;

    let cells = std::mem::take(&mut body.children);
    let mut open: Option<TableRow> = None;

    for child in cells {
        let cell = match child {
            TableChild::Cell(cell) => cell,
            TableChild::Row(_) => return Err(BindingError::MixedRowAndCellChildren),
        };
        if cell.starts_row {
            if let Some(done) = open.take() {
                body.children.push(TableChild::Row(done));
            }
        }
        let mut row = match open.take() {
            Some(row) => row,
            None => {
                let mut fresh = TableRow::synthesized();
                fresh.bind(&scope)?;
                fresh
            }
        };
        let ends_row = cell.ends_row;
        row.cells.push(cell);
        if ends_row {
            body.children.push(TableChild::Row(row));
        } else {
            open = Some(row);
        }
    }

    if let Some(done) = open {
        body.children.push(TableChild::Row(done));
    }
    Ok(())
}

/// Applies cell-to-row conversion to every table body in the subtree,
/// depth first. A binding fault is fatal for its container and stops the
/// walk.
pub fn normalize_tree(node: &mut FlowNode) -> Result<(), BindingError> {
    match node {
        FlowNode::Block { children, .. } | FlowNode::FootnoteBody { children, .. } => {
            for child in children {
                normalize_tree(child)?;
            }
        }
        FlowNode::Paragraph { .. } => {}
        FlowNode::Table { body, .. } => {
            convert_cells_to_rows(body)?;
            for child in &mut body.children {
                if let TableChild::Row(row) = child {
                    for cell in &mut row.cells {
                        for nested in &mut cell.content {
                            normalize_tree(nested)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeMetadata, TableCell};
    use crate::properties::PropertyScope;

    fn cell(starts: bool, ends: bool) -> TableChild {
        TableChild::Cell(TableCell::new(vec![]).starts_row(starts).ends_row(ends))
    }

    fn body_of(children: Vec<TableChild>) -> TableBody {
        let mut body = TableBody::new(NodeMetadata::default(), children);
        body.bind(PropertyScope::new()).unwrap();
        body
    }

    fn row_shape(body: &TableBody) -> Vec<usize> {
        body.children
            .iter()
            .map(|child| match child {
                TableChild::Row(row) => row.cells.len(),
                TableChild::Cell(_) => panic!("cell survived normalization"),
            })
            .collect()
    }

    #[test]
    fn test_cells_group_into_rows() {
        // A opens an implicit row; B starts a new one; C ends it; D both
        // starts and ends its own.
        let mut body = body_of(vec![
            cell(false, false),
            cell(true, false),
            cell(false, true),
            cell(true, true),
        ]);
        convert_cells_to_rows(&mut body).unwrap();
        assert_eq!(row_shape(&body), vec![1, 2, 1]);
    }

    #[test]
    fn test_trailing_open_row_is_emitted() {
        let mut body = body_of(vec![cell(false, false), cell(false, false)]);
        convert_cells_to_rows(&mut body).unwrap();
        assert_eq!(row_shape(&body), vec![2]);
    }

    #[test]
    fn test_noop_on_empty_body() {
        let mut body = body_of(vec![]);
        convert_cells_to_rows(&mut body).unwrap();
        assert!(body.children.is_empty());
    }

    #[test]
    fn test_rerun_is_noop() {
        let mut body = body_of(vec![cell(false, true), cell(false, false)]);
        convert_cells_to_rows(&mut body).unwrap();
        let first_pass = body.clone();
        // The scope is gone by now, but the first-child check must
        // short-circuit before it is ever needed.
        convert_cells_to_rows(&mut body).unwrap();
        assert_eq!(body, first_pass);
    }

    #[test]
    fn test_rows_bind_against_container_scope() {
        let mut scope = PropertyScope::new();
        scope.declare("writing-mode", "rl-tb");
        let mut body = TableBody::new(NodeMetadata::default(), vec![cell(false, false)]);
        body.bind(scope).unwrap();

        convert_cells_to_rows(&mut body).unwrap();
        match &body.children[0] {
            TableChild::Row(row) => {
                let bound = row.bound().expect("synthesized row must be bound");
                assert_eq!(bound.writing_mode, crate::WritingMode::RlTb);
            }
            TableChild::Cell(_) => panic!("cell survived normalization"),
        }
    }

    #[test]
    fn test_row_synthesis_fault_has_no_rollback() {
        // "break-before" passes the body-level bind but faults when a
        // synthesized row binds against the same scope.
        let mut scope = PropertyScope::new();
        scope.declare("break-before", "eventually");
        let mut body = TableBody::new(
            NodeMetadata::default(),
            vec![cell(false, true), cell(true, false)],
        );
        body.bind(scope).unwrap();

        let err = convert_cells_to_rows(&mut body).unwrap_err();
        assert!(matches!(err, BindingError::InvalidValue { .. }));
        // No transactional restore: the bare cells were consumed and only
        // rows emitted before the fault (none here) remain.
        assert!(body.children.is_empty());
    }

    #[test]
    fn test_released_scope_faults_fast() {
        let mut body = body_of(vec![cell(false, false)]);
        convert_cells_to_rows(&mut body).unwrap();

        // The scope was consumed; a body that somehow reaches
        // normalization again with bare cells faults fast.
        body.children.clear();
        body.children.push(cell(false, false));
        assert_eq!(
            convert_cells_to_rows(&mut body),
            Err(BindingError::ScopeReleased)
        );
    }
}
