//! A single addressable UI surface: window, popup or tooltip.

mod behaviour;
mod payload;
mod settings;
mod template;

use std::borrow::Cow;
use std::fmt;

pub use behaviour::{
    AsAny, DragHandler, DragPhase, HideTransition, MenuBehaviour, MenuResponse, PlainMenu,
    PointerInsideListener,
};
pub use payload::MenuPayload;
pub use settings::MenuSettings;
pub use template::MenuTemplate;

use crate::controller::ControllerId;

/// Names a menu template inside a controller's namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(Cow<'static, str>);

impl MenuId {
    pub const fn new(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for MenuId {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for MenuId {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&MenuId> for MenuId {
    fn from(value: &MenuId) -> Self {
        value.clone()
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Refers to one menu instance owned by one controller.
///
/// Handles stay valid while the instance is pooled; they go stale once the
/// instance is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MenuHandle {
    controller: ControllerId,
    index: u32,
    generation: u32,
}

impl MenuHandle {
    pub(crate) const fn new(controller: ControllerId, index: u32, generation: u32) -> Self {
        Self {
            controller,
            index,
            generation,
        }
    }

    /// The controller that instantiated, and therefore owns, this menu.
    pub const fn controller(self) -> ControllerId {
        self.controller
    }

    pub(crate) const fn index(self) -> u32 {
        self.index
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

/// Lifecycle of one menu instance.
///
/// `Inactive -> Visible -> HidingChildren -> Hiding -> Hidden -> Pooled`,
/// where `Pooled` instances come back as `Inactive` and non-pooled ones are
/// destroyed after `Hidden`. `Queued` is an `Inactive` menu waiting in the
/// deferral queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuState {
    Inactive,
    Queued,
    Visible,
    /// Waiting for popup children to finish hiding.
    HidingChildren,
    /// The behaviour's own hide is running.
    Hiding,
    Hidden,
    Pooled,
}

impl MenuState {
    /// Shown and not yet committed to hiding.
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }

    pub const fn is_hiding(self) -> bool {
        matches!(self, Self::HidingChildren | Self::Hiding)
    }
}

/// Runs once a menu has completely hidden.
pub type HideCallback = Box<dyn FnOnce(MenuHandle) + Send + Sync>;

/// Work waiting for a menu's popup list to become empty.
pub(crate) enum PopupsCleared {
    /// The menu's own hide, started by a cascade.
    OwnHide,
    Callback(HideCallback),
}

/// One instantiated menu.
pub struct Menu {
    id: MenuId,
    handle: MenuHandle,
    settings: MenuSettings,
    state: MenuState,
    parent: Option<MenuHandle>,
    children: Vec<MenuHandle>,
    pub(crate) on_hidden: Vec<HideCallback>,
    pub(crate) popups_cleared: Vec<PopupsCleared>,
    behaviour: Box<dyn MenuBehaviour>,
}

impl Menu {
    pub(crate) fn new(
        handle: MenuHandle,
        template: &MenuTemplate,
        settings: MenuSettings,
    ) -> Self {
        Self {
            id: template.id().clone(),
            handle,
            settings,
            state: MenuState::Inactive,
            parent: None,
            children: Vec::new(),
            on_hidden: Vec::new(),
            popups_cleared: Vec::new(),
            behaviour: template.instantiate(),
        }
    }

    pub fn id(&self) -> &MenuId {
        &self.id
    }

    pub fn handle(&self) -> MenuHandle {
        self.handle
    }

    pub fn owner(&self) -> ControllerId {
        self.handle.controller()
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Set only while this menu is a popup owned by another menu.
    pub fn parent(&self) -> Option<MenuHandle> {
        self.parent
    }

    /// Popups owned by this menu, oldest first.
    pub fn children(&self) -> &[MenuHandle] {
        &self.children
    }

    pub fn should_block_new_menu(&self) -> bool {
        self.settings.should_block_new_menu()
    }

    pub fn behaviour<B: MenuBehaviour>(&self) -> Option<&B> {
        let behaviour: &dyn MenuBehaviour = self.behaviour.as_ref();
        behaviour.as_any().downcast_ref::<B>()
    }

    pub fn behaviour_mut<B: MenuBehaviour>(&mut self) -> Option<&mut B> {
        let behaviour: &mut dyn MenuBehaviour = self.behaviour.as_mut();
        behaviour.as_any_mut().downcast_mut::<B>()
    }

    pub(crate) fn dyn_behaviour_mut(&mut self) -> &mut dyn MenuBehaviour {
        self.behaviour.as_mut()
    }

    pub(crate) fn set_state(&mut self, state: MenuState) {
        self.state = state;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<MenuHandle>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: MenuHandle) {
        self.children.push(child);
    }

    /// Returns whether `child` was one of this menu's popups.
    pub(crate) fn remove_child(&mut self, child: MenuHandle) -> bool {
        let before = self.children.len();
        self.children.retain(|popup| *popup != child);
        self.children.len() != before
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
