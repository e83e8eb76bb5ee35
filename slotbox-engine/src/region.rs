use slotbox_model::{SlotMode, SlotParams};

/// The markup contract of one slot region, as read by the host from the DOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRegion {
    /// Class list of the region element.
    pub classes: Vec<String>,
    /// Raw value of the region's parameter attribute.
    pub params: Option<String>,
}

impl SlotRegion {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn mode(&self) -> SlotMode {
        SlotMode::from_classes(&self.classes)
    }

    pub fn decode_params(&self) -> SlotParams {
        SlotParams::from_markup(self.params.as_deref())
    }
}
