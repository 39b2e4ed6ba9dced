use std::collections::VecDeque;

use crate::menu::{MenuHandle, MenuPayload};

/// A show request that could not be satisfied yet.
#[derive(Debug, Clone)]
pub struct MenuQueueItem {
    menu: MenuHandle,
    payload: MenuPayload,
}

impl MenuQueueItem {
    pub fn new(menu: MenuHandle, payload: MenuPayload) -> Self {
        Self { menu, payload }
    }

    pub fn menu(&self) -> MenuHandle {
        self.menu
    }

    pub fn payload(&self) -> &MenuPayload {
        &self.payload
    }

    pub fn into_parts(self) -> (MenuHandle, MenuPayload) {
        (self.menu, self.payload)
    }
}

/// FIFO of fullscreen menus waiting for the screen to clear.
#[derive(Debug, Default)]
pub struct MenuQueue {
    items: VecDeque<MenuQueueItem>,
}

impl MenuQueue {
    pub fn push(&mut self, item: MenuQueueItem) {
        self.items.push_back(item);
    }

    pub fn pop(&mut self) -> Option<MenuQueueItem> {
        self.items.pop_front()
    }

    /// Takes a waiting request out of line.
    pub fn remove(&mut self, menu: MenuHandle) -> Option<MenuQueueItem> {
        let position = self.items.iter().position(|item| item.menu == menu)?;
        self.items.remove(position)
    }

    pub fn contains(&self, menu: MenuHandle) -> bool {
        self.items.iter().any(|item| item.menu == menu)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuQueueItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
