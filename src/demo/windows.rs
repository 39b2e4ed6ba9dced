//! The main window, the general windows it opens and the status window of
//! the secondary canvas.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_menu_manager::prelude::*;
use bevy_menu_manager::theme::{palette::*, widget};

use super::SECONDARY_CANVAS;
use super::popups::{POPUP, popup_payload};

pub(super) fn plugin(app: &mut App) {
    app.add_observer(build_window_content);
}

pub const MAIN_WINDOW: MenuId = MenuId::new("main_window");
pub const GENERAL_WINDOW: MenuId = MenuId::new("general_window");
pub const STATUS_WINDOW: MenuId = MenuId::new("status_window");

pub fn templates() -> [MenuTemplate; 2] {
    [
        MenuTemplate::plain(MAIN_WINDOW, MenuSettings::new().not_closable()),
        MenuTemplate::new(
            GENERAL_WINDOW,
            MenuSettings::new().pool_capacity(3),
            GeneralWindow::default,
        ),
    ]
}

pub fn status_template() -> MenuTemplate {
    MenuTemplate::plain(
        STATUS_WINDOW,
        MenuSettings::new().not_closable().passthrough_outside(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralWindowData {
    pub text: String,
    pub color: Color,
    pub button_text: String,
}

impl GeneralWindowData {
    fn numbered(number: usize) -> Self {
        let color = match number {
            1 => Color::srgb(0.35, 0.16, 0.16),
            2 => Color::srgb(0.16, 0.33, 0.18),
            _ => PANEL_BACKGROUND,
        };
        Self {
            text: format!("This is menu {number}"),
            color,
            button_text: format!("Close menu {number}"),
        }
    }
}

/// A window that shows whatever it was opened with and closes when clicking
/// next to it.
#[derive(Debug, Default)]
struct GeneralWindow {
    data: Option<Arc<GeneralWindowData>>,
}

impl MenuBehaviour for GeneralWindow {
    fn show(&mut self, payload: &MenuPayload) -> Result<(), MenuError> {
        self.data = Some(payload.get_shared::<GeneralWindowData>()?);
        Ok(())
    }

    fn prepare_for_pool(&mut self) {
        self.data = None;
    }

    fn on_click_outside(&mut self) -> MenuResponse {
        MenuResponse::Hide
    }
}

#[derive(Component, Debug, Clone, Copy)]
struct OpensGeneralWindow(usize);

#[derive(Component, Debug, Clone, Copy)]
struct ClosesMenu(MenuHandle);

#[derive(Component, Debug, Clone, Copy)]
struct OpensPopupOn(MenuHandle);

fn build_window_content(
    trigger: On<MenuShown>,
    canvases: Query<&MenuCanvas>,
    mut commands: Commands,
) {
    let Ok(canvas) = canvases.get(trigger.canvas) else {
        return;
    };
    let Some(menu) = canvas.menu(trigger.menu) else {
        return;
    };
    let mut surface = commands.entity(trigger.entity);

    if *menu.id() == MAIN_WINDOW {
        surface.despawn_related::<Children>().with_child((
            widget::panel("Main Window", PANEL_BACKGROUND),
            children![
                widget::header("Menu Manager"),
                widget::button_small("Open menu 1", open_general_window, OpensGeneralWindow(1)),
                widget::button_small("Open menu 2", open_general_window, OpensGeneralWindow(2)),
                widget::button_small("Open menu 3", open_general_window, OpensGeneralWindow(3)),
                widget::button_small("Popup", open_popup, ()),
                widget::button_small("Exit", exit_app, ()),
            ],
        ));
    } else if let Some(data) = menu
        .behaviour::<GeneralWindow>()
        .and_then(|window| window.data.as_deref())
    {
        let handle = trigger.menu;
        surface.despawn_related::<Children>().with_child((
            widget::panel("General Window", data.color),
            children![
                widget::header(data.text.clone()),
                widget::button_small("Popup here", open_popup_on, OpensPopupOn(handle)),
                widget::button_small(data.button_text.clone(), close_menu, ClosesMenu(handle)),
            ],
        ));
    } else if *menu.id() == STATUS_WINDOW {
        surface.despawn_related::<Children>().with_child((
            Name::new("Status Corner"),
            Node {
                position_type: PositionType::Absolute,
                right: px(20),
                bottom: px(20),
                ..default()
            },
            Pickable::IGNORE,
            children![(
                widget::panel("Status Window", PANEL_BACKGROUND),
                children![
                    widget::label("Secondary canvas"),
                    widget::button_small("Ping", ping_secondary, ()),
                ],
            )],
        ));
    }
}

fn open_general_window(
    trigger: On<Pointer<Click>>,
    buttons: Query<&OpensGeneralWindow>,
    mut requests: MessageWriter<MenuRequest>,
) {
    if let Ok(OpensGeneralWindow(number)) = buttons.get(trigger.entity) {
        requests.write(MenuRequest::show(
            GENERAL_WINDOW,
            MenuPayload::new(GeneralWindowData::numbered(*number)),
        ));
    }
}

fn open_popup(_: On<Pointer<Click>>, mut requests: MessageWriter<MenuRequest>) {
    requests.write(MenuRequest::add_popup(POPUP, true, popup_payload(1)));
}

fn open_popup_on(
    trigger: On<Pointer<Click>>,
    buttons: Query<&OpensPopupOn>,
    mut requests: MessageWriter<MenuRequest>,
) {
    if let Ok(OpensPopupOn(window)) = buttons.get(trigger.entity) {
        requests.write(MenuRequest::add_popup_to(*window, POPUP, popup_payload(1)));
    }
}

fn close_menu(
    trigger: On<Pointer<Click>>,
    buttons: Query<&ClosesMenu>,
    mut requests: MessageWriter<MenuRequest>,
) {
    if let Ok(ClosesMenu(menu)) = buttons.get(trigger.entity) {
        requests.write(MenuRequest::hide(*menu));
    }
}

fn ping_secondary(_: On<Pointer<Click>>, mut requests: MessageWriter<MenuRequest>) {
    requests.write(
        MenuRequest::add_popup(POPUP, false, popup_payload(1))
            .on(CanvasTarget::Named(SECONDARY_CANVAS.into())),
    );
}

fn exit_app(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
