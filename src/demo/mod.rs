//! A small showcase: two canvases, windows that open each other and a chain
//! of popups.

mod popups;
mod windows;

use bevy::prelude::*;
use bevy_menu_manager::host::HostCommands;
use bevy_menu_manager::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, (spawn_camera, spawn_canvases));
    app.add_plugins((windows::plugin, popups::plugin));
}

/// Name of the canvas drawn in the bottom corner.
pub const SECONDARY_CANVAS: &str = "secondary";

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d));
}

fn spawn_canvases(mut commands: Commands) -> Result {
    let shared = SharedMenuRegistry::new(MenuRegistry::from_templates([
        popups::template(),
        SimpleTooltip::template(),
    ])?);

    let global = MenuController::with_config(
        MenuControllerConfig::named("global"),
        MenuRegistry::from_templates(windows::templates())?,
        HostCommands::default(),
    )
    .with_shared_registry(shared.clone());
    commands.spawn((
        menu_canvas(global),
        GlobalCanvas,
        AutoStartMenu::new(windows::MAIN_WINDOW).hiding_others(),
    ));

    let secondary = MenuController::with_config(
        MenuControllerConfig::named(SECONDARY_CANVAS).with_pool_capacity(2),
        MenuRegistry::from_templates([windows::status_template()])?,
        HostCommands::default(),
    )
    .with_shared_registry(shared);
    commands.spawn((
        menu_canvas(secondary),
        AutoStartMenu::new(windows::STATUS_WINDOW)
            .on(CanvasTarget::Named(SECONDARY_CANVAS.into())),
    ));

    Ok(())
}
