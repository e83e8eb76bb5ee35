#![allow(dead_code)]

use async_trait::async_trait;
use slotbox_engine::{
    EditorBridge, EngineConfig, Point, Rect, Slot, SlotEnv, SlotLayout, SlotRegion,
    TypeChoiceRequest,
};
use slotbox_model::{SINGLE_SLOT_CLASS, TypeRegistry};
use slotbox_types::{ContentDescriptor, ItemId, SlotId};
use std::sync::{Arc, Mutex};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Bridge recording focus calls and answering the chooser with a canned choice.
#[derive(Default)]
pub struct RecordingBridge {
    focused: Mutex<Vec<(SlotId, ItemId)>>,
    requests: Mutex<Vec<TypeChoiceRequest>>,
    choice: Mutex<Option<ContentDescriptor>>,
}

impl RecordingBridge {
    pub fn choosing(descriptor: ContentDescriptor) -> Self {
        Self {
            choice: Mutex::new(Some(descriptor)),
            ..Default::default()
        }
    }

    pub fn focused(&self) -> Vec<(SlotId, ItemId)> {
        self.focused.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<TypeChoiceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EditorBridge for RecordingBridge {
    fn select_and_focus(&self, slot: SlotId, item: ItemId) {
        self.focused.lock().unwrap().push((slot, item));
    }

    async fn choose_content_type(&self, request: TypeChoiceRequest) -> Option<ContentDescriptor> {
        self.requests.lock().unwrap().push(request);
        self.choice.lock().unwrap().clone()
    }
}

pub fn env_with(bridge: Arc<RecordingBridge>) -> SlotEnv {
    SlotEnv::new(bridge, Arc::new(TypeRegistry::with_defaults()))
}

pub fn multi_region(params: &str) -> SlotRegion {
    SlotRegion::new().with_params(params)
}

pub fn single_region(params: &str) -> SlotRegion {
    SlotRegion::new()
        .with_class(SINGLE_SLOT_CLASS)
        .with_params(params)
}

/// Slot that does not load anything on its own.
pub fn offline_config() -> EngineConfig {
    EngineConfig {
        standalone: false,
        ..Default::default()
    }
}

pub fn multi_slot(params: &str) -> Slot {
    Slot::new(&multi_region(params), offline_config(), SlotEnv::default())
}

pub fn single_slot(params: &str) -> Slot {
    Slot::new(&single_region(params), offline_config(), SlotEnv::default())
}

pub fn text(content: &str) -> ContentDescriptor {
    ContentDescriptor::new("text", content)
}

/// Layout with items stacked vertically, 100px tall each, starting at y=100.
/// The slot spans y=100 to y=100 + max(400, 100 * n).
pub fn stacked_layout(items: &[ItemId]) -> SlotLayout {
    let height = (100.0 * items.len() as f64).max(400.0);
    let mut layout = SlotLayout::new(Rect::new(0.0, 100.0, 600.0, height));
    for (i, id) in items.iter().enumerate() {
        layout = layout.with_item(*id, Rect::new(0.0, 100.0 + 100.0 * i as f64, 600.0, 100.0));
    }
    layout
}

pub fn at(y: f64) -> Point {
    Point::new(300.0, y)
}
