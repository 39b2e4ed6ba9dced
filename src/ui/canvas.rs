//! Canvases: entities that own one menu controller each.

use std::ops::{Deref, DerefMut};

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::requests::{CanvasTarget, MenuAction, MenuRequest};
use crate::MenuSystems;
use crate::controller::MenuController;
use crate::host::{HostCommand, HostCommands, OutsideClickTarget};
use crate::menu::{MenuHandle, MenuId, MenuPayload};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GlobalMenuCanvas>();
    app.add_observer(register_global_canvas);
    app.add_observer(unregister_global_canvas);
    app.add_systems(Update, start_menus.in_set(MenuSystems::Requests));
}

pub type CanvasController = MenuController<HostCommands>;

/// Hosts a menu controller. Menu surfaces are spawned as children of this
/// entity.
#[derive(Component)]
pub struct MenuCanvas {
    controller: CanvasController,
    pub(super) surfaces: HashMap<MenuHandle, Entity>,
    pub(super) catcher: Option<Entity>,
    pub(super) outside_click: Option<OutsideClickTarget>,
    pub(super) stack: Vec<MenuHandle>,
}

impl MenuCanvas {
    pub fn new(controller: CanvasController) -> Self {
        Self {
            controller,
            surfaces: HashMap::default(),
            catcher: None,
            outside_click: None,
            stack: Vec::new(),
        }
    }

    /// The entity drawing `menu`, once the host commands were applied.
    pub fn surface(&self, menu: MenuHandle) -> Option<Entity> {
        self.surfaces.get(&menu).copied()
    }

    pub fn outside_click_catcher(&self) -> Option<Entity> {
        self.catcher
    }

    pub(super) fn take_host_commands(&mut self) -> Vec<HostCommand> {
        self.controller.host_mut().drain().collect()
    }
}

impl Deref for MenuCanvas {
    type Target = CanvasController;

    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}

impl DerefMut for MenuCanvas {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.controller
    }
}

/// A full-window canvas for `controller`, named after it.
pub fn menu_canvas(controller: CanvasController) -> impl Bundle {
    let name = controller.name().unwrap_or("Menu Canvas").to_owned();
    (
        Name::new(name),
        Node {
            position_type: PositionType::Absolute,
            width: percent(100),
            height: percent(100),
            ..default()
        },
        // The canvas itself never catches pointer input; its surfaces do.
        Pickable::IGNORE,
        MenuCanvas::new(controller),
    )
}

/// Marks the canvas requests addressed to [`CanvasTarget::Global`] go to.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct GlobalCanvas;

/// The canvas currently marked with [`GlobalCanvas`].
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalMenuCanvas(pub Option<Entity>);

fn register_global_canvas(trigger: On<Add, GlobalCanvas>, mut global: ResMut<GlobalMenuCanvas>) {
    match global.0 {
        Some(existing) if existing != trigger.entity => warn!(
            "{} is marked as the global menu canvas, but {existing} already is. Keeping {existing}.",
            trigger.entity
        ),
        _ => global.0 = Some(trigger.entity),
    }
}

fn unregister_global_canvas(
    trigger: On<Remove, GlobalCanvas>,
    mut global: ResMut<GlobalMenuCanvas>,
) {
    if global.0 == Some(trigger.entity) {
        global.0 = None;
    }
}

/// Shows a menu once, as soon as this component is added.
#[derive(Component, Debug, Clone)]
pub struct AutoStartMenu {
    pub target: CanvasTarget,
    pub menu: Option<MenuId>,
    pub payload: MenuPayload,
    /// Force every menu of the canvas inactive before showing `menu`.
    pub hide_others: bool,
}

impl AutoStartMenu {
    pub fn new(menu: impl Into<MenuId>) -> Self {
        Self {
            target: CanvasTarget::Global,
            menu: Some(menu.into()),
            payload: MenuPayload::none(),
            hide_others: false,
        }
    }

    pub fn on(mut self, target: CanvasTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_payload(mut self, payload: MenuPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn hiding_others(mut self) -> Self {
        self.hide_others = true;
        self
    }
}

fn start_menus(
    starters: Query<&AutoStartMenu, Added<AutoStartMenu>>,
    mut requests: MessageWriter<MenuRequest>,
) {
    for starter in &starters {
        if starter.hide_others {
            requests.write(MenuRequest::new(
                starter.target.clone(),
                MenuAction::HideAll {
                    force_inactive: true,
                },
            ));
        }
        if let Some(menu) = &starter.menu {
            requests.write(MenuRequest::new(
                starter.target.clone(),
                MenuAction::Show {
                    menu: menu.clone(),
                    payload: starter.payload.clone(),
                },
            ));
        }
    }
}
