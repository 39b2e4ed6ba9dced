//! Applies the side effects a canvas controller asks for to the entities that
//! draw its menus.

use bevy::prelude::*;

use super::canvas::MenuCanvas;
use super::drag::DragOffset;
use crate::MenuSystems;
use crate::host::HostCommand;
use crate::menu::{MenuHandle, MenuId};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, apply_host_commands.in_set(MenuSystems::Host));
}

/// Z index of the lowest menu of a canvas. Each menu above it gets
/// [`SURFACE_Z_STEP`] more, which leaves room for the catcher in between.
pub const SURFACE_Z_BASE: i32 = 100;
pub const SURFACE_Z_STEP: i32 = 10;

/// The root entity of one menu instance.
#[derive(Component, Debug, Clone)]
pub struct MenuSurface {
    pub canvas: Entity,
    pub menu: MenuHandle,
    pub id: MenuId,
}

/// Sits right behind the menu that reacts to clicks outside of itself.
#[derive(Component, Debug, Clone, Copy)]
pub struct OutsideClickCatcher {
    pub canvas: Entity,
}

/// Triggered on a surface when its menu becomes visible. Build the content of
/// the menu from here.
#[derive(EntityEvent, Debug, Clone)]
pub struct MenuShown {
    pub entity: Entity,
    pub canvas: Entity,
    pub menu: MenuHandle,
}

/// Triggered on a surface when its menu finished hiding.
#[derive(EntityEvent, Debug, Clone)]
pub struct MenuHidden {
    pub entity: Entity,
    pub canvas: Entity,
    pub menu: MenuHandle,
}

fn surface_z(position: usize) -> i32 {
    SURFACE_Z_BASE + SURFACE_Z_STEP * (position as i32 + 1)
}

fn apply_host_commands(mut commands: Commands, mut canvases: Query<(Entity, &mut MenuCanvas)>) {
    for (entity, canvas) in &mut canvases {
        if canvas.host().is_empty() {
            continue;
        }
        let canvas = canvas.into_inner();
        for command in canvas.take_host_commands() {
            apply_host_command(&mut commands, entity, canvas, command);
        }
    }
}

fn apply_host_command(
    commands: &mut Commands,
    canvas_entity: Entity,
    canvas: &mut MenuCanvas,
    command: HostCommand,
) {
    match command {
        HostCommand::Spawn(spec) => {
            let mut surface = commands.spawn((
                Name::new(format!("Menu {}", spec.id)),
                MenuSurface {
                    canvas: canvas_entity,
                    menu: spec.menu,
                    id: spec.id,
                },
                Node {
                    position_type: PositionType::Absolute,
                    width: percent(100),
                    height: percent(100),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                // Only the content of a menu catches the pointer.
                Pickable::IGNORE,
                Visibility::Hidden,
                GlobalZIndex(SURFACE_Z_BASE),
                ChildOf(canvas_entity),
            ));
            if spec.draggable {
                surface.insert(DragOffset::default());
            }
            canvas.surfaces.insert(spec.menu, surface.id());
        }
        HostCommand::Despawn(menu) => {
            if let Some(surface) = canvas.surfaces.remove(&menu) {
                commands.entity(surface).despawn();
            }
        }
        HostCommand::Show(menu) => {
            let Some(surface) = canvas.surface(menu) else {
                warn!("Asked to show {menu:?}, which has no surface");
                return;
            };
            commands.entity(surface).insert(Visibility::Inherited);
            commands.trigger(MenuShown {
                entity: surface,
                canvas: canvas_entity,
                menu,
            });
        }
        HostCommand::Hide(menu) => {
            let Some(surface) = canvas.surface(menu) else {
                return;
            };
            commands.entity(surface).insert(Visibility::Hidden);
            commands.trigger(MenuHidden {
                entity: surface,
                canvas: canvas_entity,
                menu,
            });
        }
        HostCommand::Restack(stack) => {
            for (position, menu) in stack.iter().enumerate() {
                if let Some(surface) = canvas.surface(*menu) {
                    commands.entity(surface).insert(GlobalZIndex(surface_z(position)));
                }
            }
            canvas.stack = stack;
            place_catcher(commands, canvas_entity, canvas);
        }
        HostCommand::OutsideClick(target) => {
            canvas.outside_click = target;
            place_catcher(commands, canvas_entity, canvas);
        }
        HostCommand::HideAll => {
            for surface in canvas.surfaces.values() {
                commands.entity(*surface).insert(Visibility::Hidden);
            }
            if let Some(catcher) = canvas.catcher {
                commands
                    .entity(catcher)
                    .insert((Visibility::Hidden, Pickable::IGNORE));
            }
        }
    }
}

/// Moves the catcher right behind its target, or switches it off.
fn place_catcher(commands: &mut Commands, canvas_entity: Entity, canvas: &mut MenuCanvas) {
    let target = canvas.outside_click.and_then(|target| {
        canvas
            .stack
            .iter()
            .position(|menu| *menu == target.menu)
            .map(|position| (target, surface_z(position) - 1))
    });
    let Some((target, z)) = target else {
        if let Some(catcher) = canvas.catcher {
            commands
                .entity(catcher)
                .insert((Visibility::Hidden, Pickable::IGNORE));
        }
        return;
    };

    let catcher = *canvas.catcher.get_or_insert_with(|| {
        commands
            .spawn((
                Name::new("Outside Click Catcher"),
                OutsideClickCatcher {
                    canvas: canvas_entity,
                },
                Node {
                    position_type: PositionType::Absolute,
                    width: percent(100),
                    height: percent(100),
                    ..default()
                },
                ChildOf(canvas_entity),
            ))
            .observe(forward_outside_click)
            .id()
    });
    commands.entity(catcher).insert((
        Visibility::Inherited,
        GlobalZIndex(z),
        Pickable {
            should_block_lower: target.blocks_input,
            is_hoverable: true,
        },
    ));
}

fn forward_outside_click(
    trigger: On<Pointer<Click>>,
    catchers: Query<&OutsideClickCatcher>,
    mut canvases: Query<&mut MenuCanvas>,
) {
    let Ok(catcher) = catchers.get(trigger.entity) else {
        return;
    };
    if let Ok(mut canvas) = canvases.get_mut(catcher.canvas) {
        canvas.click_outside();
    }
}
