//! Popups that open more popups on top of themselves.

use bevy::prelude::*;
use bevy_menu_manager::menu::Menu;
use bevy_menu_manager::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_observer(open_nested_popup);
}

pub const POPUP: MenuId = MenuId::new("popup");

const NEW_POPUP: &str = "new_popup";

pub fn template() -> MenuTemplate {
    SimplePopup::template(POPUP, MenuSettings::new())
}

/// Content of the popup `depth` levels deep in a chain.
pub fn popup_payload(depth: usize) -> MenuPayload {
    MenuPayload::new(
        SimplePopupData::new(format!("Popup {depth}"), "Drag me around.")
            .with_button(
                PopupButton::new("New popup", PopupAction::Custom(NEW_POPUP.into()))
                    .with_tooltip("Opens another popup on top of this one"),
            )
            .with_button(
                PopupButton::new("Tooltip", PopupAction::Nothing)
                    .with_tooltip("Tooltips follow the cursor"),
            )
            .with_button(
                PopupButton::new("Close parent", PopupAction::CloseParent)
                    .with_tooltip("Closes whatever this popup belongs to"),
            )
            .with_button(
                PopupButton::new("Close this", PopupAction::Close)
                    .with_tooltip("Closes only this popup"),
            ),
    )
}

fn open_nested_popup(
    trigger: On<PopupButtonPressed>,
    canvases: Query<&MenuCanvas>,
    mut requests: MessageWriter<MenuRequest>,
) {
    if trigger.action != PopupAction::Custom(NEW_POPUP.into()) {
        return;
    }
    let Ok(canvas) = canvases.get(trigger.canvas) else {
        return;
    };
    let depth = std::iter::successors(Some(trigger.popup), |menu| {
        canvas.menu(*menu).and_then(Menu::parent)
    })
    .filter(|menu| canvas.menu(*menu).is_some_and(|menu| *menu.id() == POPUP))
    .count();

    requests.write(
        MenuRequest::add_popup_to(trigger.popup, POPUP, popup_payload(depth + 1))
            .on(CanvasTarget::Canvas(trigger.canvas)),
    );
}
