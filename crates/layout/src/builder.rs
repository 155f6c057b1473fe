//! Manager-tree construction.
//!
//! Maps flow nodes onto the closed manager set: blocks and table
//! containers become block-stacking managers, paragraphs become line
//! managers, rows become row managers over per-cell block managers.
//! Manager identities are allocated per factory, i.e. per breaking pass.

use crate::interface::Area;
use crate::managers::LayoutManager;
use crate::LayoutError;
use galley_flow::{BreakClass, FlowNode, TableChild, TableRow};
use galley_types::ManagerId;

#[derive(Default)]
pub struct ManagerFactory {
    next_id: u64,
}

impl ManagerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ManagerId {
        self.next_id += 1;
        ManagerId::new(self.next_id)
    }

    pub fn build(&mut self, node: &FlowNode) -> Result<LayoutManager, LayoutError> {
        match node {
            FlowNode::Block { meta, children } => {
                let mut manager = LayoutManager::block(self.next_id(), meta.clone());
                for child in children {
                    let built = self.build(child)?;
                    manager.add_child_manager(Some(built));
                }
                Ok(manager)
            }
            FlowNode::Paragraph { meta, children } => Ok(LayoutManager::line(
                self.next_id(),
                meta.clone(),
                children.clone(),
            )),
            FlowNode::FootnoteBody { meta, children } => {
                let mut manager = LayoutManager::footnote_body(self.next_id(), meta.clone());
                for child in children {
                    let built = self.build(child)?;
                    manager.add_child_manager(Some(built));
                }
                Ok(manager)
            }
            FlowNode::Table { meta, body } => {
                let mut manager = LayoutManager::block(self.next_id(), meta.clone());
                for child in &body.children {
                    match child {
                        TableChild::Row(row) => {
                            let built = self.build_row(row)?;
                            manager.add_child_manager(Some(built));
                        }
                        TableChild::Cell(_) => return Err(LayoutError::UnnormalizedTable),
                    }
                }
                Ok(manager)
            }
        }
    }

    fn build_row(&mut self, row: &TableRow) -> Result<LayoutManager, LayoutError> {
        let mut meta = row.meta.clone();
        if let Some(bound) = row.bound() {
            if bound.break_before != BreakClass::Auto {
                meta.break_before = true;
            }
        }
        let mut manager = LayoutManager::table_row(self.next_id(), meta);
        for cell in &row.cells {
            let mut cell_manager = LayoutManager::block(self.next_id(), cell.meta.clone());
            for node in &cell.content {
                let built = self.build(node)?;
                cell_manager.add_child_manager(Some(built));
            }
            manager.add_child_manager(Some(cell_manager));
        }
        Ok(manager)
    }

    /// A content manager around the given inline holder area.
    pub fn content(&mut self, holder: Area) -> LayoutManager {
        LayoutManager::content(self.next_id(), holder)
    }
}
