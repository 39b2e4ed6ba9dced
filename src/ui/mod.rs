//! Hosting menu controllers on Bevy UI entities.
//!
//! A [`MenuCanvas`] owns a controller whose side effects are recorded as
//! [`HostCommand`](crate::host::HostCommand)s and applied to child entities
//! once per frame.

mod canvas;
mod drag;
mod requests;
mod surface;
mod tooltip;
mod views;

pub use canvas::{
    AutoStartMenu, CanvasController, GlobalCanvas, GlobalMenuCanvas, MenuCanvas, menu_canvas,
};
pub use drag::DragOffset;
pub use requests::{CanvasTarget, MenuAction, MenuRequest, MenuRequestError, MenuRequestFailed};
pub use surface::{
    MenuHidden, MenuShown, MenuSurface, OutsideClickCatcher, SURFACE_Z_BASE, SURFACE_Z_STEP,
};
pub use tooltip::{FollowPointer, TooltipSupport};
pub use views::PopupButtonPressed;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        canvas::plugin,
        requests::plugin,
        surface::plugin,
        drag::plugin,
        tooltip::plugin,
        views::plugin,
    ));
}
