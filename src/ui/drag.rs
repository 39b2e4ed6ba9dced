//! Dragging of menus whose behaviour asks for it.

use bevy::prelude::*;

use super::canvas::MenuCanvas;
use super::surface::{MenuShown, MenuSurface};
use crate::MenuSystems;
use crate::menu::DragPhase;

pub(super) fn plugin(app: &mut App) {
    app.add_observer(begin_drag);
    app.add_observer(drag);
    app.add_observer(end_drag);
    app.add_observer(reset_drag_offset);
    app.add_systems(Update, apply_drag_offset.in_set(MenuSystems::Views));
}

/// How far a draggable surface was moved from where its menu was shown.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct DragOffset(pub Vec2);

fn begin_drag(
    trigger: On<Pointer<DragStart>>,
    mut surfaces: Query<(&MenuSurface, &mut DragOffset)>,
    mut canvases: Query<&mut MenuCanvas>,
) {
    forward_drag(
        trigger.entity,
        DragPhase::Begin,
        Vec2::ZERO,
        &mut surfaces,
        &mut canvases,
    );
}

fn drag(
    trigger: On<Pointer<Drag>>,
    mut surfaces: Query<(&MenuSurface, &mut DragOffset)>,
    mut canvases: Query<&mut MenuCanvas>,
) {
    forward_drag(
        trigger.entity,
        DragPhase::Drag,
        trigger.delta,
        &mut surfaces,
        &mut canvases,
    );
}

fn end_drag(
    trigger: On<Pointer<DragEnd>>,
    mut surfaces: Query<(&MenuSurface, &mut DragOffset)>,
    mut canvases: Query<&mut MenuCanvas>,
) {
    forward_drag(
        trigger.entity,
        DragPhase::End,
        Vec2::ZERO,
        &mut surfaces,
        &mut canvases,
    );
}

/// Drag events bubble up from the content of a menu; only the surface itself
/// forwards them.
fn forward_drag(
    entity: Entity,
    phase: DragPhase,
    delta: Vec2,
    surfaces: &mut Query<(&MenuSurface, &mut DragOffset)>,
    canvases: &mut Query<&mut MenuCanvas>,
) {
    let Ok((surface, mut offset)) = surfaces.get_mut(entity) else {
        return;
    };
    let Ok(mut canvas) = canvases.get_mut(surface.canvas) else {
        return;
    };
    match canvas.drag(surface.menu, phase, delta) {
        Ok(true) => offset.0 += delta,
        Ok(false) => {}
        Err(error) => warn!("Dropped a drag event for {}: {error}", surface.id),
    }
}

fn reset_drag_offset(trigger: On<MenuShown>, mut offsets: Query<&mut DragOffset>) {
    if let Ok(mut offset) = offsets.get_mut(trigger.entity) {
        offset.0 = Vec2::ZERO;
    }
}

fn apply_drag_offset(mut surfaces: Query<(&DragOffset, &mut Node), Changed<DragOffset>>) {
    for (offset, mut node) in &mut surfaces {
        node.left = px(offset.x);
        node.top = px(offset.y);
    }
}
