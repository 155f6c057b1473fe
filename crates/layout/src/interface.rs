//! Boundary contracts.
//!
//! The layout core neither owns the final area tree nor the
//! cross-reference registries; it reports areas to an [`AreaSink`] and
//! funnels every upward lookup through a [`ReferenceRegistry`]. Both are
//! trait objects supplied by the integration layer.

use galley_types::AnchorId;
use std::collections::HashMap;

/// Distinguishes normal flow areas from areas routed to the footnote
/// region of their page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaClass {
    #[default]
    Normal,
    Footnote,
}

/// A positioned, fixed-size visual area produced by replay. The sink owns
/// the real area-tree representation; this value carries what the core
/// knows about each area it materializes.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub class: AreaClass,
    /// Extent along the inline-progression direction.
    pub ipd: f32,
    /// Extent along the stacking axis (block-progression direction).
    pub bpd: f32,
    pub content: AreaContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AreaContent {
    Block { children: Vec<Area> },
    Line { texts: Vec<String>, ratio: f32 },
    Row { cells: Vec<Area> },
    Inline { children: Vec<Area> },
}

impl Area {
    pub fn block(ipd: f32, children: Vec<Area>) -> Self {
        let bpd = children.iter().map(|c| c.bpd).sum();
        Self {
            class: AreaClass::Normal,
            ipd,
            bpd,
            content: AreaContent::Block { children },
        }
    }

    pub fn inline_holder(ipd: f32) -> Self {
        Self {
            class: AreaClass::Normal,
            ipd,
            bpd: 0.0,
            content: AreaContent::Inline {
                children: Vec::new(),
            },
        }
    }
}

/// Where the core hands finished areas. One sink per replay pass.
pub trait AreaSink {
    fn add_child_area(&mut self, area: Area);

    /// IPD the sink's current containing area provides to new children.
    fn reference_ipd(&self) -> f32;
}

/// A resolved cross-reference target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub page_number: String,
}

/// A retrievable marker snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievePosition {
    FirstStarting,
    FirstIncluding,
    LastStarting,
    LastEnding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieveBoundary {
    Page,
    PageSequence,
    Document,
}

/// The ID/marker/footnote registry every delegation operation lands on.
/// Managers never answer these themselves; they walk their delegation
/// handle to whichever root was designated.
pub trait ReferenceRegistry {
    fn resolve_reference_id(&self, id: &AnchorId) -> Option<PageLocation>;

    fn register_id_on_page(&mut self, id: AnchorId);

    /// Records an area whose reference target is not yet known.
    fn register_unresolved_area(&mut self, id: AnchorId, area: Area);

    fn add_marker_map(&mut self, markers: HashMap<String, Marker>, is_start: bool, is_first: bool);

    fn retrieve_marker(
        &self,
        name: &str,
        position: RetrievePosition,
        boundary: RetrieveBoundary,
    ) -> Option<Marker>;

    fn current_page_number(&self) -> String;
}
