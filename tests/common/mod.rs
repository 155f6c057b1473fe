pub mod fixtures;

use galley::{
    AnchorId, Area, AreaSink, Marker, PageLocation, ReferenceRegistry, RetrieveBoundary,
    RetrievePosition,
};
use std::collections::HashMap;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Area sink collecting everything the pipeline emits, one entry per span.
#[derive(Debug, Default)]
pub struct PageSink {
    pub areas: Vec<Area>,
    pub ipd: f32,
}

impl PageSink {
    pub fn with_ipd(ipd: f32) -> Self {
        Self {
            areas: Vec::new(),
            ipd,
        }
    }
}

impl AreaSink for PageSink {
    fn add_child_area(&mut self, area: Area) {
        self.areas.push(area);
    }

    fn reference_ipd(&self) -> f32 {
        self.ipd
    }
}

/// Registry recording every delegation that reaches it.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    pub registered_ids: Vec<String>,
    pub markers: HashMap<String, Marker>,
    pub page: u32,
}

impl ReferenceRegistry for InMemoryRegistry {
    fn resolve_reference_id(&self, _id: &AnchorId) -> Option<PageLocation> {
        None
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
        _is_start: bool,
        _is_first: bool,
    ) {
        self.markers.extend(markers);
    }

    fn retrieve_marker(
        &self,
        name: &str,
        _position: RetrievePosition,
        _boundary: RetrieveBoundary,
    ) -> Option<Marker> {
        self.markers.get(name).cloned()
    }

    fn current_page_number(&self) -> String {
        self.page.to_string()
    }
}
