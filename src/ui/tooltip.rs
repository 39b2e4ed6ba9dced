//! Hover tooltips for any UI element.

use std::time::Duration;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::canvas::MenuCanvas;
use super::requests::{CanvasTarget, MenuAction, MenuRequest};
use crate::MenuSystems;
use crate::menu::{Menu, MenuHandle, MenuId, MenuPayload};
use crate::presets::{SIMPLE_TOOLTIP, SimpleTooltip, SimpleTooltipData};

pub(super) fn plugin(app: &mut App) {
    app.add_observer(start_hover);
    app.add_observer(end_hover);
    app.add_observer(forget_owner);
    app.add_systems(Update, show_tooltips.in_set(MenuSystems::Requests));
    app.add_systems(Update, follow_pointer.in_set(MenuSystems::Views));
}

/// Where a tooltip that follows the pointer sits relative to the cursor.
const POINTER_OFFSET: Vec2 = Vec2::new(-10.0, 24.0);

/// Shows a tooltip after the pointer rested on this entity for `delay`.
#[derive(Component, Debug, Clone)]
pub struct TooltipSupport {
    pub title: String,
    pub text: String,
    /// The tooltip template to show.
    pub menu: MenuId,
    pub delay: Duration,
    pub target: CanvasTarget,
}

impl TooltipSupport {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            text: text.into(),
            menu: SIMPLE_TOOLTIP,
            delay: Duration::from_millis(500),
            target: CanvasTarget::Global,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn on(mut self, target: CanvasTarget) -> Self {
        self.target = target;
        self
    }
}

#[derive(Component, Debug)]
struct TooltipHover(Timer);

/// Marks tooltip content that tracks the cursor.
#[derive(Component, Debug, Default)]
pub struct FollowPointer;

fn start_hover(
    trigger: On<Pointer<Over>>,
    supports: Query<(&TooltipSupport, Has<TooltipHover>)>,
    mut commands: Commands,
) {
    let Ok((support, hovered)) = supports.get(trigger.entity) else {
        return;
    };
    if !hovered {
        commands
            .entity(trigger.entity)
            .insert(TooltipHover(Timer::new(support.delay, TimerMode::Once)));
    }
}

fn end_hover(
    trigger: On<Pointer<Out>>,
    supports: Query<(), With<TooltipSupport>>,
    mut canvases: Query<&mut MenuCanvas>,
    mut commands: Commands,
) {
    if !supports.contains(trigger.entity) {
        return;
    }
    commands.entity(trigger.entity).remove::<TooltipHover>();
    release_owned_tooltips(trigger.entity, &mut canvases);
}

fn forget_owner(trigger: On<Remove, TooltipSupport>, mut canvases: Query<&mut MenuCanvas>) {
    release_owned_tooltips(trigger.entity, &mut canvases);
}

fn show_tooltips(
    time: Res<Time>,
    mut hovered: Query<(Entity, &TooltipSupport, &mut TooltipHover)>,
    mut requests: MessageWriter<MenuRequest>,
) {
    for (entity, support, mut hover) in &mut hovered {
        if !hover.0.tick(time.delta()).just_finished() {
            continue;
        }
        let data = SimpleTooltipData::new(&support.title, &support.text).owned_by(entity);
        requests.write(MenuRequest::new(
            support.target.clone(),
            MenuAction::AddPopup {
                menu: support.menu.clone(),
                payload: MenuPayload::new(data),
                create_if_no_active: true,
            },
        ));
    }
}

fn owned_tooltips<'a>(
    menus: impl Iterator<Item = &'a Menu>,
    owner: Entity,
) -> Vec<MenuHandle> {
    menus
        .filter(|menu| menu.state().is_visible())
        .filter(|menu| {
            menu.behaviour::<SimpleTooltip>()
                .and_then(SimpleTooltip::data)
                .is_some_and(|data| data.owner == Some(owner))
        })
        .map(Menu::handle)
        .collect()
}

fn release_owned_tooltips(owner: Entity, canvases: &mut Query<&mut MenuCanvas>) {
    for mut canvas in canvases.iter_mut() {
        let tooltips = owned_tooltips(canvas.menus(), owner);
        for tooltip in tooltips {
            if let Err(error) = canvas.pointer_left(tooltip) {
                warn!("Could not release tooltip {tooltip:?}: {error}");
            }
        }
    }
}

fn follow_pointer(
    window: Single<&Window, With<PrimaryWindow>>,
    mut tooltips: Query<(&mut Node, &ComputedNode), With<FollowPointer>>,
) {
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    for (mut node, computed) in &mut tooltips {
        let size = computed.size() * computed.inverse_scale_factor();
        let position = cursor - Vec2::new(size.x / 2.0, 0.0) + POINTER_OFFSET;
        node.left = px(position.x);
        node.top = px(position.y);
    }
}
