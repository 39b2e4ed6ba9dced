//! Content of the preset menus.

use bevy::prelude::*;

use super::canvas::{CanvasController, MenuCanvas};
use super::requests::CanvasTarget;
use super::surface::MenuShown;
use super::tooltip::{FollowPointer, TooltipSupport};
use crate::error::MenuError;
use crate::menu::{Menu, MenuHandle};
use crate::presets::{PopupAction, SimplePopup, SimplePopupData, SimpleTooltip, SimpleTooltipData};
use crate::theme::{palette::*, widget};

pub(super) fn plugin(app: &mut App) {
    app.add_observer(build_preset_content);
}

/// Sent after a [`SimplePopup`] button was pressed and its built-in action,
/// if any, was applied.
#[derive(Event, Debug, Clone)]
pub struct PopupButtonPressed {
    pub canvas: Entity,
    pub popup: MenuHandle,
    pub action: PopupAction,
}

#[derive(Component, Debug, Clone)]
struct PopupButtonAction {
    canvas: Entity,
    popup: MenuHandle,
    action: PopupAction,
}

fn build_preset_content(trigger: On<MenuShown>, canvases: Query<&MenuCanvas>, mut commands: Commands) {
    let Ok(canvas) = canvases.get(trigger.canvas) else {
        return;
    };
    let Some(menu) = canvas.menu(trigger.menu) else {
        return;
    };

    if let Some(data) = menu.behaviour::<SimplePopup>().and_then(SimplePopup::data) {
        spawn_popup(&mut commands, &trigger, data);
    } else if let Some(data) = menu.behaviour::<SimpleTooltip>().and_then(SimpleTooltip::data) {
        spawn_tooltip(&mut commands, trigger.entity, data);
    }
}

fn spawn_popup(commands: &mut Commands, shown: &MenuShown, data: &SimplePopupData) {
    let (canvas, popup) = (shown.canvas, shown.menu);
    commands
        .entity(shown.entity)
        .despawn_related::<Children>()
        .with_children(|surface| {
            surface
                .spawn(widget::panel("Popup", PANEL_BACKGROUND))
                .with_children(|panel| {
                    panel.spawn(widget::header(&data.title));
                    if !data.description.is_empty() {
                        panel.spawn(widget::label(&data.description));
                    }
                    panel.spawn(widget::button_row()).with_children(|row| {
                        for button in &data.buttons {
                            let mut entity = row.spawn(widget::button_small(
                                &button.label,
                                press_popup_button,
                                PopupButtonAction {
                                    canvas,
                                    popup,
                                    action: button.action.clone(),
                                },
                            ));
                            if let Some(tooltip) = &button.tooltip {
                                entity.insert(
                                    TooltipSupport::new(tooltip)
                                        .on(CanvasTarget::Canvas(canvas)),
                                );
                            }
                        }
                    });
                });
        });
}

fn spawn_tooltip(commands: &mut Commands, surface: Entity, data: &SimpleTooltipData) {
    commands
        .entity(surface)
        .despawn_related::<Children>()
        .with_children(|surface| {
            let mut tooltip = surface.spawn((
                Name::new("Tooltip"),
                Node {
                    position_type: PositionType::Absolute,
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(px(8)),
                    max_width: px(360),
                    ..default()
                },
                BackgroundColor(TOOLTIP_BACKGROUND),
                BorderRadius::all(px(4)),
                // A tooltip under the cursor would take the hover from its owner.
                Pickable::IGNORE,
            ));
            if data.follow_pointer {
                tooltip.insert(FollowPointer);
            }
            tooltip.with_children(|tooltip| {
                if !data.title.is_empty() {
                    tooltip.spawn(widget::label(&data.title));
                }
                tooltip.spawn(widget::label(&data.description));
            });
        });
}

fn press_popup_button(
    trigger: On<Pointer<Click>>,
    buttons: Query<&PopupButtonAction>,
    mut canvases: Query<&mut MenuCanvas>,
    mut commands: Commands,
) {
    let Ok(button) = buttons.get(trigger.entity) else {
        return;
    };
    if button.action == PopupAction::Nothing {
        return;
    }
    let Ok(mut canvas) = canvases.get_mut(button.canvas) else {
        return;
    };
    if let Err(error) = apply_popup_action(&mut canvas, button) {
        warn!("Popup button {:?} failed: {error}", button.action);
    }
    commands.trigger(PopupButtonPressed {
        canvas: button.canvas,
        popup: button.popup,
        action: button.action.clone(),
    });
}

fn apply_popup_action(
    canvas: &mut CanvasController,
    button: &PopupButtonAction,
) -> Result<(), MenuError> {
    match button.action {
        PopupAction::Close => canvas.hide_menu(button.popup).map(|_| ()),
        PopupAction::CloseParent => {
            let target = canvas
                .menu(button.popup)
                .and_then(Menu::parent)
                .unwrap_or(button.popup);
            canvas.hide_menu(target).map(|_| ())
        }
        PopupAction::Custom(_) | PopupAction::Nothing => Ok(()),
    }
}
