use super::ControllerId;
use crate::menu::{Menu, MenuHandle};

/// Generational storage for every menu instance a controller owns.
pub(crate) struct MenuArena {
    controller: ControllerId,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

struct Slot {
    generation: u32,
    menu: Option<Menu>,
}

impl MenuArena {
    pub fn new(controller: ControllerId) -> Self {
        Self {
            controller,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert_with(&mut self, build: impl FnOnce(MenuHandle) -> Menu) -> MenuHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let handle = MenuHandle::new(self.controller, index, slot.generation);
            slot.menu = Some(build(handle));
            return handle;
        }

        let index = self.slots.len() as u32;
        let handle = MenuHandle::new(self.controller, index, 0);
        self.slots.push(Slot {
            generation: 0,
            menu: Some(build(handle)),
        });
        handle
    }

    pub fn get(&self, handle: MenuHandle) -> Option<&Menu> {
        self.slot(handle).and_then(|slot| slot.menu.as_ref())
    }

    pub fn get_mut(&mut self, handle: MenuHandle) -> Option<&mut Menu> {
        if handle.controller() != self.controller {
            return None;
        }
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.menu.as_mut())
    }

    #[cfg(test)]
    pub fn contains(&self, handle: MenuHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Drops the instance and invalidates every handle to it.
    pub fn remove(&mut self, handle: MenuHandle) -> Option<Menu> {
        if handle.controller() != self.controller {
            return None;
        }
        let slot = self
            .slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())?;
        let menu = slot.menu.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        Some(menu)
    }

    pub fn handles(&self) -> impl Iterator<Item = MenuHandle> + '_ {
        self.slots.iter().filter_map(|slot| slot.menu.as_ref().map(Menu::handle))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.menu.is_some()).count()
    }

    fn slot(&self, handle: MenuHandle) -> Option<&Slot> {
        if handle.controller() != self.controller {
            return None;
        }
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
    }
}
