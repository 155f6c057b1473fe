//! Layout managers.
//!
//! A manager owns one content node's children for exactly one breaking +
//! replay pass: it pulls breakable elements out of its child managers,
//! re-issues them under its own positions, and later replays a chosen span
//! of positions into areas. The set of manager kinds is closed; replay
//! dispatch matches it exhaustively.

pub mod block;
pub mod content;
pub mod footnote;
pub mod line;
pub mod table_row;

use crate::config::Alignment;
use crate::context::LayoutContext;
use crate::element::BreakElement;
use crate::interface::{
    Area, Marker, PageLocation, ReferenceRegistry, RetrieveBoundary, RetrievePosition,
};
use crate::position::PositionIter;
use crate::LayoutError;
use galley_flow::{InlineItem, NodeMetadata};
use galley_types::{AnchorId, BreakDiagnostic, ManagerId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Default line metrics applied when inline content carries none: line
/// height, height before the baseline, depth below it.
pub(crate) const DEFAULT_LINE_HEIGHT: f32 = 14.4;
pub(crate) const DEFAULT_LEAD: f32 = 12.0;
pub(crate) const DEFAULT_FOLLOW: f32 = 2.0;

type RegistryHandle = Rc<RefCell<dyn ReferenceRegistry>>;

/// Per-kind state. New content kinds are new variants here, with
/// exhaustive handling at every dispatch point.
pub enum ManagerKind {
    Block(block::BlockState),
    Line(line::LineState),
    TableRow(table_row::TableRowState),
    Footnote(footnote::FootnoteState),
    Content(content::ContentState),
}

pub struct LayoutManager {
    id: ManagerId,
    meta: NodeMetadata,
    registry: Option<RegistryHandle>,
    children: Vec<LayoutManager>,
    finished: bool,
    stacking_size: f32,
    diagnostics: Vec<BreakDiagnostic>,
    kind: ManagerKind,
}

impl fmt::Debug for LayoutManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutManager")
            .field("id", &self.id)
            .field("kind", &self.kind_name())
            .field("children", &self.children.len())
            .field("finished", &self.finished)
            .finish()
    }
}

impl LayoutManager {
    fn new(id: ManagerId, meta: NodeMetadata, kind: ManagerKind) -> Self {
        Self {
            id,
            meta,
            registry: None,
            children: Vec::new(),
            finished: false,
            stacking_size: 0.0,
            diagnostics: Vec::new(),
            kind,
        }
    }

    pub fn block(id: ManagerId, meta: NodeMetadata) -> Self {
        Self::new(id, meta, ManagerKind::Block(block::BlockState))
    }

    pub fn line(id: ManagerId, meta: NodeMetadata, items: Vec<InlineItem>) -> Self {
        Self::new(id, meta, ManagerKind::Line(line::LineState::new(items)))
    }

    pub fn table_row(id: ManagerId, meta: NodeMetadata) -> Self {
        Self::new(
            id,
            meta,
            ManagerKind::TableRow(table_row::TableRowState::default()),
        )
    }

    pub fn footnote_body(id: ManagerId, meta: NodeMetadata) -> Self {
        Self::new(id, meta, ManagerKind::Footnote(footnote::FootnoteState))
    }

    pub fn content(id: ManagerId, holder: Area) -> Self {
        Self::new(
            id,
            NodeMetadata::default(),
            ManagerKind::Content(content::ContentState::new(holder)),
        )
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn meta(&self) -> &NodeMetadata {
        &self.meta
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ManagerKind::Block(_) => "Block",
            ManagerKind::Line(_) => "Line",
            ManagerKind::TableRow(_) => "TableRow",
            ManagerKind::Footnote(_) => "Footnote",
            ManagerKind::Content(_) => "Content",
        }
    }

    /// Designates this manager as a delegation root: every upward
    /// operation in this subtree lands on `registry`. Descendants already
    /// designated keep their own hook.
    pub fn assign_delegation_root(&mut self, registry: RegistryHandle) {
        self.install_registry(&registry);
    }

    fn install_registry(&mut self, registry: &RegistryHandle) {
        let effective = match &self.registry {
            Some(own) => Rc::clone(own),
            None => {
                self.registry = Some(Rc::clone(registry));
                Rc::clone(registry)
            }
        };
        for child in &mut self.children {
            child.install_registry(&effective);
        }
    }

    /// Installs a child manager. The child inherits this manager's
    /// delegation handle and is initialized before it may generate.
    /// Passing `None` is a no-op, not an error.
    pub fn add_child_manager(&mut self, child: Option<LayoutManager>) {
        let Some(mut child) = child else {
            return;
        };
        if let Some(registry) = &self.registry {
            child.install_registry(registry);
        }
        child.initialize();
        log::trace!("{}: adding child {} ({})", self.id, child.id, child.kind_name());
        self.children.push(child);
    }

    pub fn add_child_managers(&mut self, children: impl IntoIterator<Item = LayoutManager>) {
        for child in children {
            self.add_child_manager(Some(child));
        }
    }

    /// One-time setup before first generation.
    pub fn initialize(&mut self) {
        self.finished = false;
        self.stacking_size = 0.0;
    }

    /// Whether a break directly before this manager's first area is
    /// acceptable to it.
    pub fn can_break_before(&self, _ctx: &LayoutContext) -> bool {
        !matches!(self.kind, ManagerKind::Content(_))
    }

    pub fn is_finished(&self) -> bool {
        if self.finished {
            return true;
        }
        match &self.kind {
            ManagerKind::Line(state) => !state.has_items(),
            _ => self.children.is_empty(),
        }
    }

    /// Produces this manager's breakable-content sequence, pulling every
    /// child to exhaustion. Restartable: a fresh call starts from scratch
    /// with no residual state. The stacking size accumulated here is
    /// readable via [`stacking_size`](Self::stacking_size) afterwards.
    pub fn generate(
        &mut self,
        ctx: &LayoutContext,
        alignment: Alignment,
    ) -> Result<Vec<BreakElement>, LayoutError> {
        self.finished = false;
        self.stacking_size = 0.0;
        self.diagnostics.clear();

        let id = self.id;
        let (elements, size) = match &mut self.kind {
            ManagerKind::Block(_) | ManagerKind::Footnote(_) => {
                block::stack_children(id, &mut self.children, ctx, alignment)?
            }
            ManagerKind::Line(state) => {
                let (elements, size, diagnostics) = line::generate(id, state, ctx)?;
                self.diagnostics = diagnostics;
                (elements, size)
            }
            ManagerKind::TableRow(state) => {
                table_row::generate(id, state, &mut self.children, ctx, alignment)?
            }
            ManagerKind::Content(_) => content::generate(&mut self.children, ctx, alignment)?,
        };

        self.stacking_size = size;
        self.finished = true;
        Ok(elements)
    }

    /// Sum of the box measures of the last generated sequence.
    pub fn stacking_size(&self) -> f32 {
        self.stacking_size
    }

    /// Replays a contiguous span of previously generated positions into
    /// areas, delegating to the child managers identified inside the
    /// position chain.
    pub fn add_areas(
        &mut self,
        positions: PositionIter,
        ctx: &LayoutContext,
    ) -> Result<Vec<Area>, LayoutError> {
        if ctx.is_first_area {
            if let Some(anchor) = self.meta.id.clone() {
                self.register_id_on_page(AnchorId::from(anchor))?;
            }
        }

        let id = self.id;
        match &mut self.kind {
            ManagerKind::Block(_) => block::replay(id, &mut self.children, positions, ctx),
            ManagerKind::Footnote(_) => footnote::replay(id, &mut self.children, positions, ctx),
            ManagerKind::Line(state) => line::replay(id, state, positions, ctx),
            ManagerKind::TableRow(state) => {
                table_row::replay(id, state, &mut self.children, positions, ctx)
            }
            ManagerKind::Content(state) => {
                content::replay(id, state, &mut self.children, positions, ctx)
            }
        }
    }

    /// Lays the whole content of an inline holder out in one shot (leader
    /// use-content, title material). Only content managers support this.
    pub fn fill_area(&mut self, ctx: &LayoutContext) -> Result<&Area, LayoutError> {
        if !matches!(self.kind, ManagerKind::Content(_)) {
            return Err(LayoutError::BuilderMismatch("Content", self.kind_name()));
        }
        content::fill(self, ctx)
    }

    /// Drains the quality diagnostics accumulated in this subtree during
    /// generation.
    pub fn take_diagnostics(&mut self) -> Vec<BreakDiagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        for child in &mut self.children {
            out.extend(child.take_diagnostics());
        }
        out
    }

    fn registry(&self) -> Result<&RegistryHandle, LayoutError> {
        self.registry
            .as_ref()
            .ok_or(LayoutError::NoDelegationRoot(self.id))
    }

    // Upward delegation. Each operation lands on the designated
    // delegation root; a manager with no reachable root is a
    // tree-construction bug and fails fast.

    pub fn resolve_reference_id(&self, id: &AnchorId) -> Result<Option<PageLocation>, LayoutError> {
        Ok(self.registry()?.borrow().resolve_reference_id(id))
    }

    pub fn register_id_on_page(&mut self, id: AnchorId) -> Result<(), LayoutError> {
        self.registry()?.borrow_mut().register_id_on_page(id);
        Ok(())
    }

    pub fn register_unresolved_area(&mut self, id: AnchorId, area: Area) -> Result<(), LayoutError> {
        self.registry()?
            .borrow_mut()
            .register_unresolved_area(id, area);
        Ok(())
    }

    pub fn add_marker_map(
        &mut self,
        markers: HashMap<String, Marker>,
        is_start: bool,
        is_first: bool,
    ) -> Result<(), LayoutError> {
        self.registry()?
            .borrow_mut()
            .add_marker_map(markers, is_start, is_first);
        Ok(())
    }

    pub fn retrieve_marker(
        &self,
        name: &str,
        position: RetrievePosition,
        boundary: RetrieveBoundary,
    ) -> Result<Option<Marker>, LayoutError> {
        Ok(self
            .registry()?
            .borrow()
            .retrieve_marker(name, position, boundary))
    }

    pub fn current_page_number(&self) -> Result<String, LayoutError> {
        Ok(self.registry()?.borrow().current_page_number())
    }
}
