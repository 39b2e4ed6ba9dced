use std::any::Any;

use bevy::math::Vec2;

use super::MenuPayload;
use crate::error::MenuError;

/// Object-safe access to the concrete type behind a `dyn MenuBehaviour`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// How a behaviour finishes its own hide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HideTransition {
    /// Hidden as soon as `on_hide` returns.
    Immediate,
    /// Something (usually a fade out) is still running. The host must call
    /// `MenuController::complete_hide` once it is done.
    Deferred,
}

/// What a menu wants to happen after a pointer hook ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuResponse {
    #[default]
    Ignore,
    Hide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Begin,
    Drag,
    End,
}

/// Capability of menus that can be moved around by dragging them.
pub trait DragHandler {
    fn on_drag(&mut self, phase: DragPhase, delta: Vec2);
}

/// Capability of menus bound to some other UI element, such as a tooltip that
/// lives only while the pointer stays on its owner.
pub trait PointerInsideListener {
    fn pointer_left(&mut self) -> MenuResponse;
}

/// The per-variant part of a menu: payload binding and lifecycle hooks.
///
/// The state machine itself lives in [`super::Menu`] and the controller; a
/// behaviour only reacts to it. Optional capabilities are exposed through
/// `as_draggable` / `as_pointer_listener` instead of extra trait bounds so the
/// controller can query them on a `dyn MenuBehaviour`.
pub trait MenuBehaviour: AsAny + Send + Sync {
    /// Apply `payload` to the menu's view state. Rejecting the payload keeps
    /// the menu out of the active set.
    fn show(&mut self, payload: &MenuPayload) -> Result<(), MenuError> {
        let _ = payload;
        Ok(())
    }

    /// Called once every popup of the menu is hidden.
    fn on_hide(&mut self) -> HideTransition {
        HideTransition::Immediate
    }

    /// After this the menu must look as if it was just instantiated.
    fn prepare_for_pool(&mut self) {}

    fn on_click_outside(&mut self) -> MenuResponse {
        MenuResponse::Ignore
    }

    fn as_draggable(&mut self) -> Option<&mut dyn DragHandler> {
        None
    }

    fn as_pointer_listener(&mut self) -> Option<&mut dyn PointerInsideListener> {
        None
    }
}

/// A menu with no view state of its own. Its content is static and built by
/// the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainMenu;

impl MenuBehaviour for PlainMenu {}
