use std::collections::VecDeque;

use bevy::platform::collections::HashMap;

use crate::menu::{MenuHandle, MenuId};

/// Idle menu instances per identifier, handed out oldest first.
///
/// Only bookkeeping: the controller makes sure whatever it puts in here is
/// hidden and out of the active set, and resets it on the way out.
#[derive(Debug, Default)]
pub struct MenuPool {
    idle: HashMap<MenuId, VecDeque<MenuHandle>>,
}

impl MenuPool {
    pub fn take(&mut self, id: &MenuId) -> Option<MenuHandle> {
        self.idle.get_mut(id)?.pop_front()
    }

    pub fn put(&mut self, id: &MenuId, menu: MenuHandle) {
        self.idle.entry(id.clone()).or_default().push_back(menu);
    }

    /// Idle instances available for `id`.
    pub fn len(&self, id: &MenuId) -> usize {
        self.idle.get(id).map_or(0, VecDeque::len)
    }

    pub fn total(&self) -> usize {
        self.idle.values().map(VecDeque::len).sum()
    }

    pub fn contains(&self, menu: MenuHandle) -> bool {
        self.idle.values().any(|menus| menus.contains(&menu))
    }
}
