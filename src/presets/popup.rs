use std::borrow::Cow;
use std::sync::Arc;

use bevy::math::Vec2;

use crate::error::MenuError;
use crate::menu::{
    DragHandler, DragPhase, MenuBehaviour, MenuId, MenuPayload, MenuResponse, MenuSettings,
    MenuTemplate,
};

/// What pressing a popup button does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupAction {
    /// Hide the popup the button is on.
    Close,
    /// Hide the menu that owns the popup, which takes the popup with it.
    CloseParent,
    /// Left to the application, see `PopupButtonPressed`.
    Custom(Cow<'static, str>),
    /// Only there for its tooltip.
    Nothing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopupButton {
    pub label: String,
    pub action: PopupAction,
    /// Shown after hovering the button for a moment.
    pub tooltip: Option<String>,
}

impl PopupButton {
    pub fn new(label: impl Into<String>, action: PopupAction) -> Self {
        Self {
            label: label.into(),
            action,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimplePopupData {
    pub title: String,
    pub description: String,
    pub buttons: Vec<PopupButton>,
}

impl SimplePopupData {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: PopupButton) -> Self {
        self.buttons.push(button);
        self
    }
}

/// A titled box with buttons that can be dragged around and closes when
/// clicking next to it.
#[derive(Debug, Default)]
pub struct SimplePopup {
    data: Option<Arc<SimplePopupData>>,
    offset: Vec2,
    dragging: bool,
}

impl SimplePopup {
    pub fn template(id: impl Into<MenuId>, settings: MenuSettings) -> MenuTemplate {
        MenuTemplate::new(id, settings, Self::default)
    }

    pub fn data(&self) -> Option<&SimplePopupData> {
        self.data.as_deref()
    }

    /// How far the popup was dragged from where it first appeared.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl MenuBehaviour for SimplePopup {
    fn show(&mut self, payload: &MenuPayload) -> Result<(), MenuError> {
        self.data = Some(payload.get_shared::<SimplePopupData>()?);
        Ok(())
    }

    fn prepare_for_pool(&mut self) {
        *self = Self::default();
    }

    fn on_click_outside(&mut self) -> MenuResponse {
        MenuResponse::Hide
    }

    fn as_draggable(&mut self) -> Option<&mut dyn DragHandler> {
        Some(self)
    }
}

impl DragHandler for SimplePopup {
    fn on_drag(&mut self, phase: DragPhase, delta: Vec2) {
        self.offset += delta;
        self.dragging = phase != DragPhase::End;
    }
}
