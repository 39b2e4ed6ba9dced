//! Menu, window and popup management for Bevy UI.
//!
//! The [`controller`] module holds the engine-agnostic state machine; the
//! [`ui`] module hosts controllers on Bevy entities and turns their requests
//! into UI nodes.

pub mod controller;
pub mod error;
pub mod host;
pub mod menu;
pub mod presets;
pub mod theme;
pub mod ui;

use bevy::prelude::*;

pub mod prelude {
    pub use crate::controller::{
        FullscreenPolicy, MenuController, MenuControllerConfig, MenuRegistry, PopupOutcome,
        SharedMenuRegistry, ShowOutcome, ShowStatus, Toggled,
    };
    pub use crate::error::MenuError;
    pub use crate::menu::{
        MenuBehaviour, MenuHandle, MenuId, MenuPayload, MenuResponse, MenuSettings, MenuState,
        MenuTemplate,
    };
    pub use crate::presets::{
        PopupAction, PopupButton, SIMPLE_TOOLTIP, SimplePopup, SimplePopupData, SimpleTooltip,
        SimpleTooltipData,
    };
    pub use crate::ui::{
        AutoStartMenu, CanvasTarget, GlobalCanvas, MenuAction, MenuCanvas, MenuHidden,
        MenuRequest, MenuRequestFailed, MenuShown, PopupButtonPressed, TooltipSupport,
        menu_canvas,
    };
}

pub fn plugin(app: &mut App) {
    // Order the menu systems inside `Update`.
    app.configure_sets(
        Update,
        (
            MenuSystems::Requests,
            MenuSystems::Host,
            MenuSystems::Views,
        )
            .chain(),
    );

    app.add_plugins((ui::plugin, theme::plugin));
}

/// High-level groupings of the menu systems in the `Update` schedule.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum MenuSystems {
    /// Apply queued [`ui::MenuRequest`]s and tick hover timers.
    Requests,
    /// Turn controller side effects into entity changes.
    Host,
    /// Keep menu content in sync (cursor following, drag offsets).
    Views,
}
