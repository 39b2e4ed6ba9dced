//! Message-based access to canvases for systems that do not hold one.

use std::borrow::Cow;

use bevy::prelude::*;

use super::canvas::{GlobalMenuCanvas, MenuCanvas};
use crate::MenuSystems;
use crate::controller::ControllerId;
use crate::error::MenuError;
use crate::menu::{MenuHandle, MenuId, MenuPayload};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<MenuRequest>();
    app.add_message::<MenuRequestFailed>();
    app.add_systems(Update, handle_menu_requests.in_set(MenuSystems::Requests));
}

/// Which canvas a request is for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CanvasTarget {
    /// The canvas marked with `GlobalCanvas`.
    #[default]
    Global,
    Canvas(Entity),
    /// The canvas whose controller was configured with this name.
    Named(Cow<'static, str>),
    /// The canvas whose controller owns the given menus.
    Controller(ControllerId),
}

#[derive(Clone, Debug)]
pub enum MenuAction {
    Show {
        menu: MenuId,
        payload: MenuPayload,
    },
    Hide(MenuHandle),
    Toggle {
        menu: MenuId,
        payload: MenuPayload,
    },
    AddPopup {
        menu: MenuId,
        payload: MenuPayload,
        create_if_no_active: bool,
    },
    AddPopupTo {
        parent: MenuHandle,
        menu: MenuId,
        payload: MenuPayload,
    },
    RemovePopup {
        parent: MenuHandle,
        popup: MenuHandle,
    },
    HideAll {
        force_inactive: bool,
    },
    CompleteHide(MenuHandle),
}

#[derive(Message, Clone, Debug)]
pub struct MenuRequest {
    pub target: CanvasTarget,
    pub action: MenuAction,
}

impl MenuRequest {
    pub fn new(target: CanvasTarget, action: MenuAction) -> Self {
        Self { target, action }
    }

    /// Shows `menu` on the global canvas.
    pub fn show(menu: impl Into<MenuId>, payload: MenuPayload) -> Self {
        Self::new(
            CanvasTarget::Global,
            MenuAction::Show {
                menu: menu.into(),
                payload,
            },
        )
    }

    pub fn toggle(menu: impl Into<MenuId>, payload: MenuPayload) -> Self {
        Self::new(
            CanvasTarget::Global,
            MenuAction::Toggle {
                menu: menu.into(),
                payload,
            },
        )
    }

    pub fn add_popup(
        menu: impl Into<MenuId>,
        create_if_no_active: bool,
        payload: MenuPayload,
    ) -> Self {
        Self::new(
            CanvasTarget::Global,
            MenuAction::AddPopup {
                menu: menu.into(),
                payload,
                create_if_no_active,
            },
        )
    }

    /// Goes to whichever canvas owns `menu`.
    pub fn hide(menu: MenuHandle) -> Self {
        Self::new(
            CanvasTarget::Controller(menu.controller()),
            MenuAction::Hide(menu),
        )
    }

    pub fn add_popup_to(parent: MenuHandle, menu: impl Into<MenuId>, payload: MenuPayload) -> Self {
        Self::new(
            CanvasTarget::Controller(parent.controller()),
            MenuAction::AddPopupTo {
                parent,
                menu: menu.into(),
                payload,
            },
        )
    }

    pub fn hide_all(force_inactive: bool) -> Self {
        Self::new(CanvasTarget::Global, MenuAction::HideAll { force_inactive })
    }

    /// Sends the request to `target` instead.
    pub fn on(mut self, target: CanvasTarget) -> Self {
        self.target = target;
        self
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuRequestError {
    #[error("No menu canvas matches {0:?}")]
    NoCanvas(CanvasTarget),
    #[error(transparent)]
    Menu(#[from] MenuError),
}

/// A [`MenuRequest`] that could not be carried out.
#[derive(Message, Clone, Debug)]
pub struct MenuRequestFailed {
    pub request: MenuRequest,
    pub error: MenuRequestError,
}

fn handle_menu_requests(
    mut requests: MessageReader<MenuRequest>,
    mut failures: MessageWriter<MenuRequestFailed>,
    global: Res<GlobalMenuCanvas>,
    mut canvases: Query<(Entity, &mut MenuCanvas)>,
) {
    for request in requests.read() {
        if let Err(error) = apply_request(request, &global, &mut canvases) {
            warn!("Menu request {:?} failed: {error}", request.action);
            failures.write(MenuRequestFailed {
                request: request.clone(),
                error,
            });
        }
    }
}

fn apply_request(
    request: &MenuRequest,
    global: &GlobalMenuCanvas,
    canvases: &mut Query<(Entity, &mut MenuCanvas)>,
) -> Result<(), MenuRequestError> {
    let no_canvas = || MenuRequestError::NoCanvas(request.target.clone());
    let entity = match &request.target {
        CanvasTarget::Global => global.0,
        CanvasTarget::Canvas(entity) => Some(*entity),
        CanvasTarget::Named(name) => canvases
            .iter()
            .find(|(_, canvas)| canvas.name() == Some(&**name))
            .map(|(entity, _)| entity),
        CanvasTarget::Controller(id) => canvases
            .iter()
            .find(|(_, canvas)| canvas.id() == *id)
            .map(|(entity, _)| entity),
    }
    .ok_or_else(no_canvas)?;
    let (_, mut canvas) = canvases.get_mut(entity).map_err(|_| no_canvas())?;

    match request.action.clone() {
        MenuAction::Show { menu, payload } => {
            canvas.show_menu(menu, payload)?;
        }
        MenuAction::Hide(menu) => {
            canvas.hide_menu(menu)?;
        }
        MenuAction::Toggle { menu, payload } => {
            canvas.toggle_menu(menu, payload)?;
        }
        MenuAction::AddPopup {
            menu,
            payload,
            create_if_no_active,
        } => {
            canvas.add_popup(menu, create_if_no_active, payload)?;
        }
        MenuAction::AddPopupTo {
            parent,
            menu,
            payload,
        } => {
            canvas.add_popup_to(parent, menu, payload)?;
        }
        MenuAction::RemovePopup { parent, popup } => {
            canvas.remove_popup(parent, popup)?;
        }
        MenuAction::HideAll { force_inactive } => canvas.hide_all_menus(force_inactive),
        MenuAction::CompleteHide(menu) => canvas.complete_hide(menu)?,
    }
    Ok(())
}
