use crate::interface::{
    Area, AreaSink, Marker, PageLocation, ReferenceRegistry, RetrieveBoundary, RetrievePosition,
};
use galley_flow::InlineItem;
use galley_types::AnchorId;
use std::collections::HashMap;

/// Sink that keeps every area it is handed, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub areas: Vec<Area>,
    pub ipd: f32,
}

impl RecordingSink {
    pub fn with_ipd(ipd: f32) -> Self {
        Self {
            areas: Vec::new(),
            ipd,
        }
    }
}

impl AreaSink for RecordingSink {
    fn add_child_area(&mut self, area: Area) {
        self.areas.push(area);
    }

    fn reference_ipd(&self) -> f32 {
        self.ipd
    }
}

/// Registry that records what was delegated to it.
#[derive(Debug, Default)]
pub struct TestRegistry {
    pub registered_ids: Vec<String>,
    pub markers: Vec<(String, bool, bool)>,
    pub known: HashMap<String, String>,
}

impl ReferenceRegistry for TestRegistry {
    fn resolve_reference_id(&self, id: &AnchorId) -> Option<PageLocation> {
        self.known.get(id.as_str()).map(|page| PageLocation {
            page_number: page.clone(),
        })
    }

    fn register_id_on_page(&mut self, id: AnchorId) {
        self.registered_ids.push(id.as_str().to_string());
    }

    fn register_unresolved_area(&mut self, id: AnchorId, _area: Area) {
        self.registered_ids.push(format!("unresolved:{id}"));
    }

    fn add_marker_map(
        &mut self,
        markers: HashMap<String, Marker>,
        is_start: bool,
        is_first: bool,
    ) {
        for name in markers.into_keys() {
            self.markers.push((name, is_start, is_first));
        }
    }

    fn retrieve_marker(
        &self,
        name: &str,
        _position: RetrievePosition,
        _boundary: RetrieveBoundary,
    ) -> Option<Marker> {
        self.markers.iter().find(|(n, _, _)| n == name).map(|_| Marker {
            name: name.to_string(),
            content: String::new(),
        })
    }

    fn current_page_number(&self) -> String {
        "1".to_string()
    }
}

/// Words of equal measure separated by stretchy spaces.
pub fn words(texts: &[&str], measure: f32) -> Vec<InlineItem> {
    let mut items = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            items.push(InlineItem::space(4.0, 12.0, 2.0));
        }
        items.push(InlineItem::run(*text, measure));
    }
    items
}
