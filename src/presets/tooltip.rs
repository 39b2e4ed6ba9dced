use std::sync::Arc;

use bevy::prelude::Entity;

use crate::error::MenuError;
use crate::menu::{
    MenuBehaviour, MenuId, MenuPayload, MenuResponse, MenuSettings, MenuTemplate,
    PointerInsideListener,
};

/// Identifier the tooltip template is registered under by default.
pub const SIMPLE_TOOLTIP: MenuId = MenuId::new("SIMPLETOOLTIP");

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleTooltipData {
    pub title: String,
    pub description: String,
    /// The UI element the tooltip explains.
    pub owner: Option<Entity>,
    /// Keep the tooltip next to the cursor while it is shown.
    pub follow_pointer: bool,
    /// Hide as soon as the pointer leaves `owner`.
    pub auto_remove: bool,
}

impl SimpleTooltipData {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// A tooltip that follows the cursor and goes away when it leaves `owner`.
    pub fn owned_by(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self.follow_pointer = true;
        self.auto_remove = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct SimpleTooltip {
    data: Option<Arc<SimpleTooltipData>>,
}

impl SimpleTooltip {
    /// Tooltips let clicks through and stay above everything else.
    pub const SETTINGS: MenuSettings = MenuSettings::new().passthrough_outside().always_on_top();

    pub fn template() -> MenuTemplate {
        MenuTemplate::new(SIMPLE_TOOLTIP, Self::SETTINGS, Self::default)
    }

    pub fn data(&self) -> Option<&SimpleTooltipData> {
        self.data.as_deref()
    }
}

impl MenuBehaviour for SimpleTooltip {
    fn show(&mut self, payload: &MenuPayload) -> Result<(), MenuError> {
        self.data = Some(payload.get_shared::<SimpleTooltipData>()?);
        Ok(())
    }

    fn prepare_for_pool(&mut self) {
        self.data = None;
    }

    fn as_pointer_listener(&mut self) -> Option<&mut dyn PointerInsideListener> {
        Some(self)
    }
}

impl PointerInsideListener for SimpleTooltip {
    fn pointer_left(&mut self) -> MenuResponse {
        match &self.data {
            Some(data) if data.auto_remove => MenuResponse::Hide,
            _ => MenuResponse::Ignore,
        }
    }
}
