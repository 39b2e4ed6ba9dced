//! The seam between a controller and whatever actually draws its menus.

use crate::menu::{MenuHandle, MenuId};

/// What the host needs to know to build the surface of a new menu instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub menu: MenuHandle,
    pub id: MenuId,
    /// The behaviour wants drag events.
    pub draggable: bool,
    /// The behaviour wants to know when the pointer leaves its owner.
    pub pointer_listener: bool,
}

/// Where the outside-click catcher sits and whether it eats the click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutsideClickTarget {
    /// The catcher goes directly behind this menu's surface.
    pub menu: MenuHandle,
    pub blocks_input: bool,
}

/// Visual and input side effects requested by a controller.
///
/// Calls arrive in the order the state machine makes them; a host is free to
/// apply them later as long as it keeps that order.
pub trait MenuHost {
    fn spawn_surface(&mut self, surface: SurfaceSpec);

    fn despawn_surface(&mut self, menu: MenuHandle);

    fn show_surface(&mut self, menu: MenuHandle);

    fn hide_surface(&mut self, menu: MenuHandle);

    /// Bottom to top order of every visible surface.
    fn restack(&mut self, stack: &[MenuHandle]);

    /// `None` deactivates the catcher.
    fn set_outside_click(&mut self, target: Option<OutsideClickTarget>);

    /// Makes every surface inactive without running any hide hooks.
    fn hide_all_surfaces(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    Spawn(SurfaceSpec),
    Despawn(MenuHandle),
    Show(MenuHandle),
    Hide(MenuHandle),
    Restack(Vec<MenuHandle>),
    OutsideClick(Option<OutsideClickTarget>),
    HideAll,
}

/// A host that only records what it was asked to do.
///
/// The Bevy adapter drains it once per frame and turns the commands into
/// entity changes.
#[derive(Debug, Default)]
pub struct HostCommands {
    commands: Vec<HostCommand>,
}

impl HostCommands {
    pub fn drain(&mut self) -> impl Iterator<Item = HostCommand> + '_ {
        self.commands.drain(..)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HostCommand> {
        self.commands.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl MenuHost for HostCommands {
    fn spawn_surface(&mut self, surface: SurfaceSpec) {
        self.commands.push(HostCommand::Spawn(surface));
    }

    fn despawn_surface(&mut self, menu: MenuHandle) {
        self.commands.push(HostCommand::Despawn(menu));
    }

    fn show_surface(&mut self, menu: MenuHandle) {
        self.commands.push(HostCommand::Show(menu));
    }

    fn hide_surface(&mut self, menu: MenuHandle) {
        self.commands.push(HostCommand::Hide(menu));
    }

    fn restack(&mut self, stack: &[MenuHandle]) {
        self.commands.push(HostCommand::Restack(stack.to_vec()));
    }

    fn set_outside_click(&mut self, target: Option<OutsideClickTarget>) {
        self.commands.push(HostCommand::OutsideClick(target));
    }

    fn hide_all_surfaces(&mut self) {
        self.commands.push(HostCommand::HideAll);
    }
}
