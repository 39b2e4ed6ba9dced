//! Show/hide orchestration for one canvas worth of menus.
//!
//! A [`MenuController`] owns every menu instance it creates. Menus are shown
//! right away, queued behind a blocking fullscreen menu, or dropped; hides
//! cascade through popup children before the menu's own hide runs, and
//! finished menus go back to the pool or are destroyed.

mod arena;
mod config;
mod pool;
mod queue;
mod registry;

#[cfg(test)]
mod scenario_tests;

use std::sync::atomic::{AtomicU32, Ordering};

use bevy::math::Vec2;
use tracing::{debug, error, trace, warn};

pub use config::{FullscreenPolicy, MenuControllerConfig};
pub use pool::MenuPool;
pub use queue::{MenuQueue, MenuQueueItem};
pub use registry::{MenuRegistry, SharedMenuRegistry};

use crate::error::MenuError;
use crate::host::{MenuHost, OutsideClickTarget, SurfaceSpec};
use crate::menu::{
    DragPhase, HideTransition, Menu, MenuBehaviour, MenuHandle, MenuId, MenuPayload,
    MenuResponse, MenuState, MenuTemplate, PopupsCleared,
};
use arena::MenuArena;

/// Identifies one controller for ownership checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControllerId(u32);

impl ControllerId {
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowStatus {
    Shown,
    /// Waiting behind a blocking fullscreen menu.
    Queued,
    /// Blocked and not queueable. The menu was never shown.
    Dropped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowOutcome {
    pub menu: MenuHandle,
    pub status: ShowStatus,
}

impl ShowOutcome {
    pub fn is_shown(&self) -> bool {
        self.status == ShowStatus::Shown
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupOutcome {
    Attached { parent: MenuHandle, popup: MenuHandle },
    /// No menu was active, so the popup was shown as a menu of its own.
    Promoted(ShowOutcome),
    Dropped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggled {
    Hidden(MenuHandle),
    Shown(ShowOutcome),
}

pub struct MenuController<H> {
    id: ControllerId,
    config: MenuControllerConfig,
    registry: MenuRegistry,
    shared: Option<SharedMenuRegistry>,
    arena: MenuArena,
    /// Menus shown through `show`, oldest first. Popups are not listed here.
    active: Vec<MenuHandle>,
    /// Bottom to top order of every surface that is on screen, popups included.
    stack: Vec<MenuHandle>,
    pool: MenuPool,
    queue: MenuQueue,
    outside_click: Option<MenuHandle>,
    host: H,
}

impl<H: MenuHost> MenuController<H> {
    pub fn new(registry: MenuRegistry, host: H) -> Self {
        Self::with_config(MenuControllerConfig::default(), registry, host)
    }

    pub fn with_config(config: MenuControllerConfig, registry: MenuRegistry, host: H) -> Self {
        let id = ControllerId::next();
        Self {
            id,
            config,
            registry,
            shared: None,
            arena: MenuArena::new(id),
            active: Vec::new(),
            stack: Vec::new(),
            pool: MenuPool::default(),
            queue: MenuQueue::default(),
            outside_click: None,
            host,
        }
    }

    /// Falls back to `shared` for identifiers this controller does not know.
    pub fn with_shared_registry(mut self, shared: SharedMenuRegistry) -> Self {
        for id in self.registry.ids().filter(|id| shared.get(id).is_some()) {
            warn!(
                "Menu {id} of controller {:?} shadows the shared template with the same identifier",
                self.config.name
            );
        }
        self.shared = Some(shared);
        self
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub fn config(&self) -> &MenuControllerConfig {
        &self.config
    }

    pub fn registry(&self) -> &MenuRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pool(&self) -> &MenuPool {
        &self.pool
    }

    pub fn queue(&self) -> &MenuQueue {
        &self.queue
    }

    pub fn has_template(&self, id: impl Into<MenuId>) -> bool {
        self.template(&id.into()).is_ok()
    }

    /// A hidden instance of `id`, reused from the pool when possible.
    ///
    /// The instance is not shown; pass it to [`Self::show`] or
    /// [`Self::attach_popup`], or give it back with [`Self::release`].
    pub fn get_menu(&mut self, id: impl Into<MenuId>) -> Result<MenuHandle, MenuError> {
        let id = id.into();
        let template = self.template(&id)?;
        if let Some(menu) = self.take_pooled(&id) {
            return Ok(menu);
        }

        let settings = *template.settings();
        let menu = self
            .arena
            .insert_with(|handle| Menu::new(handle, &template, settings));
        let (draggable, pointer_listener) = match self.arena.get_mut(menu) {
            Some(entry) => {
                let behaviour = entry.dyn_behaviour_mut();
                (
                    behaviour.as_draggable().is_some(),
                    behaviour.as_pointer_listener().is_some(),
                )
            }
            None => (false, false),
        };
        self.host.spawn_surface(SurfaceSpec {
            menu,
            id: id.clone(),
            draggable,
            pointer_listener,
        });
        debug!("Instantiated menu {id} as {menu:?}");
        Ok(menu)
    }

    /// Resolves `id` and shows a fresh or pooled instance of it.
    ///
    /// A dropped instance goes straight back to the pool.
    pub fn show_menu(
        &mut self,
        id: impl Into<MenuId>,
        payload: MenuPayload,
    ) -> Result<ShowOutcome, MenuError> {
        let menu = self.get_menu(id)?;
        match self.show(menu, payload) {
            Ok(outcome) => {
                if outcome.status == ShowStatus::Dropped {
                    self.release_instance(menu);
                }
                Ok(outcome)
            }
            Err(error) => {
                self.release_instance(menu);
                Err(error)
            }
        }
    }

    /// Shows an instance obtained from [`Self::get_menu`].
    pub fn show(&mut self, menu: MenuHandle, payload: MenuPayload) -> Result<ShowOutcome, MenuError> {
        let entry = self.menu_ref(menu)?;
        if entry.state() != MenuState::Inactive {
            return Err(MenuError::InvalidState {
                menu,
                state: entry.state(),
                action: "show",
            });
        }
        let settings = *entry.settings();

        if settings.fullscreen && self.is_blocked() {
            if settings.should_be_queued {
                self.menu_mut(menu)?.set_state(MenuState::Queued);
                self.queue.push(MenuQueueItem::new(menu, payload));
                debug!("Queued {menu:?} behind a blocking menu");
                return Ok(ShowOutcome {
                    menu,
                    status: ShowStatus::Queued,
                });
            }
            debug!("Dropped {menu:?}: a blocking menu is active");
            return Ok(ShowOutcome {
                menu,
                status: ShowStatus::Dropped,
            });
        }

        // Shown before the others hide so the active set never empties and
        // pulls in a queued menu.
        self.present(menu, payload)?;
        if settings.fullscreen {
            self.hide_for_fullscreen(menu);
        }
        Ok(ShowOutcome {
            menu,
            status: ShowStatus::Shown,
        })
    }

    /// Starts hiding `menu` and its popups.
    ///
    /// Returns `false` when the menu is not visible, which includes handles
    /// whose instance was destroyed in the meantime.
    pub fn hide_menu(&mut self, menu: MenuHandle) -> Result<bool, MenuError> {
        self.check_owner(menu)?;
        if !self.is_visible(menu) {
            return Ok(false);
        }
        self.begin_hide(menu);
        Ok(true)
    }

    /// Like [`Self::hide_menu`], and runs `callback` once the menu is hidden.
    ///
    /// A menu that is already hiding still gets the callback. Returns whether
    /// the callback was registered.
    pub fn hide_menu_and_call(
        &mut self,
        menu: MenuHandle,
        callback: impl FnOnce(MenuHandle) + Send + Sync + 'static,
    ) -> Result<bool, MenuError> {
        self.check_owner(menu)?;
        let Some(entry) = self.arena.get_mut(menu) else {
            return Ok(false);
        };
        let state = entry.state();
        if !state.is_visible() && !state.is_hiding() {
            return Ok(false);
        }
        entry.on_hidden.push(Box::new(callback));
        if state.is_visible() {
            self.begin_hide(menu);
        }
        Ok(true)
    }

    /// Finishes a hide the behaviour reported as [`HideTransition::Deferred`].
    pub fn complete_hide(&mut self, menu: MenuHandle) -> Result<(), MenuError> {
        let state = self.menu_ref(menu)?.state();
        if state != MenuState::Hiding {
            return Err(MenuError::InvalidState {
                menu,
                state,
                action: "complete the hide of",
            });
        }
        self.finish_hide(menu);
        Ok(())
    }

    /// Hides the first visible active menu with this identifier, or shows a
    /// new one. A menu that is still hiding does not count.
    pub fn toggle_menu(
        &mut self,
        id: impl Into<MenuId>,
        payload: MenuPayload,
    ) -> Result<Toggled, MenuError> {
        let id = id.into();
        let visible = self.active.iter().copied().find(|menu| {
            self.arena
                .get(*menu)
                .is_some_and(|entry| *entry.id() == id && entry.state().is_visible())
        });
        if let Some(menu) = visible {
            self.hide_menu(menu)?;
            return Ok(Toggled::Hidden(menu));
        }
        self.show_menu(id, payload).map(Toggled::Shown)
    }

    /// Hides every active menu. With `force_inactive` the host also switches
    /// off every surface right away instead of waiting for the hide hooks.
    pub fn hide_all_menus(&mut self, force_inactive: bool) {
        if force_inactive {
            self.host.hide_all_surfaces();
        }
        for menu in self.active.clone() {
            self.begin_hide(menu);
        }
    }

    pub fn hide_all_blocking_menus(&mut self) {
        let blocking: Vec<_> = self
            .active
            .iter()
            .copied()
            .filter(|menu| {
                self.arena
                    .get(*menu)
                    .is_some_and(Menu::should_block_new_menu)
            })
            .collect();
        for menu in blocking {
            self.begin_hide(menu);
        }
    }

    /// Shows the oldest queued menu if nothing is active anymore.
    ///
    /// Returns whether a queued menu was shown. Queued menus that fail to show
    /// are logged, released and skipped.
    pub fn check_queue(&mut self) -> bool {
        if !self.active.is_empty() {
            return false;
        }
        while let Some(item) = self.queue.pop() {
            let (menu, payload) = item.into_parts();
            let Some(entry) = self.arena.get_mut(menu) else {
                continue;
            };
            entry.set_state(MenuState::Inactive);
            match self.show(menu, payload) {
                Ok(_) => return true,
                Err(error) => {
                    error!("Queued menu {menu:?} failed to show: {error}");
                    self.release_instance(menu);
                }
            }
        }
        false
    }

    /// Takes a queued menu out of line and releases its instance.
    pub fn cancel_queued(&mut self, menu: MenuHandle) -> Result<bool, MenuError> {
        self.check_owner(menu)?;
        if self.queue.remove(menu).is_none() {
            return Ok(false);
        }
        if let Some(entry) = self.arena.get_mut(menu) {
            entry.set_state(MenuState::Inactive);
        }
        self.release_instance(menu);
        Ok(true)
    }

    /// Gives an instance from [`Self::get_menu`] back without showing it.
    pub fn release(&mut self, menu: MenuHandle) -> Result<(), MenuError> {
        let state = self.menu_ref(menu)?.state();
        if state != MenuState::Inactive {
            return Err(MenuError::InvalidState {
                menu,
                state,
                action: "release",
            });
        }
        self.release_instance(menu);
        Ok(())
    }

    /// Shows `child` as a popup owned by `parent`.
    pub fn attach_popup(
        &mut self,
        parent: MenuHandle,
        child: MenuHandle,
        payload: MenuPayload,
    ) -> Result<(), MenuError> {
        let parent_state = self.menu_ref(parent)?.state();
        if !parent_state.is_visible() {
            return Err(MenuError::InvalidState {
                menu: parent,
                state: parent_state,
                action: "attach a popup to",
            });
        }
        let entry = self.menu_mut(child)?;
        if entry.state() != MenuState::Inactive {
            return Err(MenuError::InvalidState {
                menu: child,
                state: entry.state(),
                action: "attach",
            });
        }
        entry.dyn_behaviour_mut().show(&payload)?;
        entry.set_parent(Some(parent));
        entry.set_state(MenuState::Visible);
        if let Some(owner) = self.arena.get_mut(parent) {
            owner.push_child(child);
        }

        self.host.show_surface(child);
        self.raise(child);
        self.target_outside_click(Some(child));
        Ok(())
    }

    /// Resolves `id` and attaches it to `parent`.
    pub fn add_popup_to(
        &mut self,
        parent: MenuHandle,
        id: impl Into<MenuId>,
        payload: MenuPayload,
    ) -> Result<MenuHandle, MenuError> {
        self.check_owner(parent)?;
        let popup = self.get_menu(id)?;
        if let Err(error) = self.attach_popup(parent, popup, payload) {
            self.release_instance(popup);
            return Err(error);
        }
        Ok(popup)
    }

    /// Attaches a popup to the oldest visible active menu.
    ///
    /// With no such menu the popup is shown as a menu of its own when
    /// `create_if_no_active` is set, and dropped otherwise.
    pub fn add_popup(
        &mut self,
        id: impl Into<MenuId>,
        create_if_no_active: bool,
        payload: MenuPayload,
    ) -> Result<PopupOutcome, MenuError> {
        let id = id.into();
        self.template(&id)?;
        match self.popup_parent() {
            Some(parent) => self
                .add_popup_to(parent, id, payload)
                .map(|popup| PopupOutcome::Attached { parent, popup }),
            None if create_if_no_active => self.show_menu(id, payload).map(PopupOutcome::Promoted),
            None => {
                debug!("Dropped popup {id}: no menu is active");
                Ok(PopupOutcome::Dropped)
            }
        }
    }

    /// [`Self::add_popup`] for an instance obtained from [`Self::get_menu`].
    ///
    /// A dropped instance is released.
    pub fn add_popup_instance(
        &mut self,
        popup: MenuHandle,
        create_if_no_active: bool,
        payload: MenuPayload,
    ) -> Result<PopupOutcome, MenuError> {
        self.menu_ref(popup)?;
        match self.popup_parent() {
            Some(parent) => self
                .attach_popup(parent, popup, payload)
                .map(|()| PopupOutcome::Attached { parent, popup }),
            None if create_if_no_active => self.show(popup, payload).map(PopupOutcome::Promoted),
            None => {
                self.release_instance(popup);
                Ok(PopupOutcome::Dropped)
            }
        }
    }

    /// Hides one popup of `parent`.
    ///
    /// The popup stays listed as a child until its hide has finished.
    pub fn remove_popup(&mut self, parent: MenuHandle, child: MenuHandle) -> Result<bool, MenuError> {
        if !self.menu_ref(parent)?.children().contains(&child) {
            return Err(MenuError::NotAChild { parent, child });
        }
        if !self.is_visible(child) {
            return Ok(false);
        }
        self.begin_hide(child);
        Ok(true)
    }

    /// Hides every popup of `parent` created from `id`. Returns how many
    /// started hiding.
    pub fn remove_popups_with_id(
        &mut self,
        parent: MenuHandle,
        id: impl Into<MenuId>,
    ) -> Result<usize, MenuError> {
        let id = id.into();
        let matching: Vec<_> = self
            .menu_ref(parent)?
            .children()
            .iter()
            .copied()
            .filter(|child| {
                self.arena
                    .get(*child)
                    .is_some_and(|popup| popup.id() == &id && popup.state().is_visible())
            })
            .collect();
        for child in &matching {
            self.begin_hide(*child);
        }
        Ok(matching.len())
    }

    /// Hides every popup of `parent`, then runs `callback` once with the
    /// parent's handle. Without popups the callback runs right away.
    pub fn remove_all_popups(
        &mut self,
        parent: MenuHandle,
        callback: impl FnOnce(MenuHandle) + Send + Sync + 'static,
    ) -> Result<(), MenuError> {
        let entry = self.menu_mut(parent)?;
        if entry.children().is_empty() {
            callback(parent);
            return Ok(());
        }
        entry
            .popups_cleared
            .push(PopupsCleared::Callback(Box::new(callback)));
        let children = entry.children().to_vec();
        for child in children {
            self.begin_hide(child);
        }
        Ok(())
    }

    /// Forwards a click on the outside-click catcher to its target menu.
    ///
    /// Returns whether the menu decided to hide.
    pub fn click_outside(&mut self) -> bool {
        let Some(menu) = self.outside_click else {
            return false;
        };
        let Some(entry) = self.arena.get_mut(menu) else {
            return false;
        };
        if !entry.state().is_visible() {
            return false;
        }
        match entry.dyn_behaviour_mut().on_click_outside() {
            MenuResponse::Hide => {
                self.begin_hide(menu);
                true
            }
            MenuResponse::Ignore => false,
        }
    }

    /// Forwards a drag to a draggable menu. Returns whether it handled it.
    pub fn drag(&mut self, menu: MenuHandle, phase: DragPhase, delta: Vec2) -> Result<bool, MenuError> {
        let entry = self.menu_mut(menu)?;
        if !entry.state().is_visible() {
            return Ok(false);
        }
        let Some(handler) = entry.dyn_behaviour_mut().as_draggable() else {
            return Ok(false);
        };
        handler.on_drag(phase, delta);
        Ok(true)
    }

    /// Tells a pointer-bound menu the pointer left its owner. Returns whether
    /// the menu started hiding.
    pub fn pointer_left(&mut self, menu: MenuHandle) -> Result<bool, MenuError> {
        let entry = self.menu_mut(menu)?;
        if !entry.state().is_visible() {
            return Ok(false);
        }
        let response = entry
            .dyn_behaviour_mut()
            .as_pointer_listener()
            .map(|listener| listener.pointer_left())
            .unwrap_or_default();
        if response == MenuResponse::Hide {
            self.begin_hide(menu);
            return Ok(true);
        }
        Ok(false)
    }

    /// First active menu created from `id`.
    pub fn active_menu(&self, id: impl Into<MenuId>) -> Option<MenuHandle> {
        let id = id.into();
        self.active
            .iter()
            .copied()
            .find(|menu| self.arena.get(*menu).is_some_and(|entry| entry.id() == &id))
    }

    pub fn active_menus(&self) -> &[MenuHandle] {
        &self.active
    }

    pub fn any_menu_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// The visible surface drawn above all others.
    pub fn topmost(&self) -> Option<MenuHandle> {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|menu| self.is_visible(*menu))
    }

    /// Bottom to top order of the surfaces on screen.
    pub fn stack(&self) -> &[MenuHandle] {
        &self.stack
    }

    pub fn outside_click_target(&self) -> Option<MenuHandle> {
        self.outside_click
    }

    pub fn queued(&self) -> impl Iterator<Item = MenuHandle> + '_ {
        self.queue.iter().map(MenuQueueItem::menu)
    }

    pub fn menu(&self, menu: MenuHandle) -> Option<&Menu> {
        self.arena.get(menu)
    }

    pub fn state(&self, menu: MenuHandle) -> Option<MenuState> {
        self.arena.get(menu).map(Menu::state)
    }

    pub fn behaviour<B: MenuBehaviour>(&self, menu: MenuHandle) -> Option<&B> {
        self.arena.get(menu)?.behaviour::<B>()
    }

    pub fn behaviour_mut<B: MenuBehaviour>(&mut self, menu: MenuHandle) -> Option<&mut B> {
        self.arena.get_mut(menu)?.behaviour_mut::<B>()
    }

    /// Every live instance, pooled ones included.
    pub fn menus(&self) -> impl Iterator<Item = &Menu> + '_ {
        self.arena.handles().filter_map(|menu| self.arena.get(menu))
    }

    fn template(&self, id: &MenuId) -> Result<MenuTemplate, MenuError> {
        self.registry
            .get(id)
            .or_else(|| self.shared.as_ref().and_then(|shared| shared.get(id)))
            .cloned()
            .ok_or_else(|| MenuError::UnknownIdentifier(id.clone()))
    }

    fn check_owner(&self, menu: MenuHandle) -> Result<(), MenuError> {
        if menu.controller() == self.id {
            return Ok(());
        }
        Err(MenuError::DoubleOwnership {
            menu,
            owner: menu.controller(),
            claimant: self.id,
        })
    }

    fn menu_ref(&self, menu: MenuHandle) -> Result<&Menu, MenuError> {
        self.check_owner(menu)?;
        self.arena.get(menu).ok_or(MenuError::UnknownMenu(menu))
    }

    fn menu_mut(&mut self, menu: MenuHandle) -> Result<&mut Menu, MenuError> {
        self.check_owner(menu)?;
        self.arena.get_mut(menu).ok_or(MenuError::UnknownMenu(menu))
    }

    fn is_visible(&self, menu: MenuHandle) -> bool {
        self.arena
            .get(menu)
            .is_some_and(|entry| entry.state().is_visible())
    }

    fn is_blocked(&self) -> bool {
        self.active
            .iter()
            .filter_map(|menu| self.arena.get(*menu))
            .any(Menu::should_block_new_menu)
    }

    fn popup_parent(&self) -> Option<MenuHandle> {
        self.active
            .iter()
            .copied()
            .find(|menu| self.is_visible(*menu))
    }

    fn take_pooled(&mut self, id: &MenuId) -> Option<MenuHandle> {
        while let Some(menu) = self.pool.take(id) {
            if let Some(entry) = self.arena.get_mut(menu) {
                entry.dyn_behaviour_mut().prepare_for_pool();
                entry.set_state(MenuState::Inactive);
                trace!("Reusing pooled {menu:?} for {id}");
                return Some(menu);
            }
        }
        None
    }

    fn present(&mut self, menu: MenuHandle, payload: MenuPayload) -> Result<(), MenuError> {
        let entry = self.menu_mut(menu)?;
        entry.dyn_behaviour_mut().show(&payload)?;
        entry.set_state(MenuState::Visible);

        self.host.show_surface(menu);
        self.raise(menu);
        self.active.push(menu);
        self.target_outside_click(Some(menu));
        Ok(())
    }

    fn hide_for_fullscreen(&mut self, shown: MenuHandle) {
        let policy = self.config.fullscreen_policy;
        let doomed: Vec<_> = self
            .active
            .iter()
            .copied()
            .filter(|menu| *menu != shown)
            .filter(|menu| {
                self.arena
                    .get(*menu)
                    .is_some_and(|entry| entry.state().is_visible() && policy.should_hide(entry))
            })
            .collect();
        for menu in doomed {
            self.begin_hide(menu);
        }
    }

    /// Moves `menu` to the top of its layer: always-on-top surfaces stay
    /// above the rest, and the latest one raised wins among them. A popup
    /// never goes below its parent.
    fn raise(&mut self, menu: MenuHandle) {
        self.stack.retain(|other| *other != menu);
        let entry = self.arena.get(menu);
        let on_top = entry.is_some_and(|entry| entry.settings().always_on_top);
        let floor = entry
            .and_then(Menu::parent)
            .and_then(|parent| self.stack.iter().position(|other| *other == parent))
            .map_or(0, |index| index + 1);
        let position = if on_top {
            self.stack.len()
        } else {
            self.stack
                .iter()
                .position(|other| {
                    self.arena
                        .get(*other)
                        .is_some_and(|entry| entry.settings().always_on_top)
                })
                .unwrap_or(self.stack.len())
        };
        self.stack.insert(position.max(floor), menu);
        self.host.restack(&self.stack);
    }

    fn target_outside_click(&mut self, menu: Option<MenuHandle>) {
        self.outside_click = menu;
        let target = menu.and_then(|menu| {
            self.arena.get(menu).map(|entry| OutsideClickTarget {
                menu,
                blocks_input: entry.settings().blocks_outside_input,
            })
        });
        self.host.set_outside_click(target);
    }

    fn begin_hide(&mut self, menu: MenuHandle) {
        let Some(entry) = self.arena.get_mut(menu) else {
            return;
        };
        if !entry.state().is_visible() {
            return;
        }
        entry.set_state(MenuState::HidingChildren);
        if entry.children().is_empty() {
            self.run_own_hide(menu);
            return;
        }

        entry.popups_cleared.push(PopupsCleared::OwnHide);
        let children = entry.children().to_vec();
        for child in children {
            self.begin_hide(child);
        }
    }

    fn run_own_hide(&mut self, menu: MenuHandle) {
        let Some(entry) = self.arena.get_mut(menu) else {
            return;
        };
        entry.set_state(MenuState::Hiding);
        match entry.dyn_behaviour_mut().on_hide() {
            HideTransition::Immediate => self.finish_hide(menu),
            HideTransition::Deferred => trace!("Waiting for {menu:?} to finish hiding"),
        }
    }

    fn finish_hide(&mut self, menu: MenuHandle) {
        let Some(entry) = self.arena.get_mut(menu) else {
            return;
        };
        entry.set_state(MenuState::Hidden);
        let callbacks = std::mem::take(&mut entry.on_hidden);
        let parent = entry.parent();
        entry.set_parent(None);

        self.host.hide_surface(menu);
        self.stack.retain(|other| *other != menu);
        self.host.restack(&self.stack);

        self.on_hide_complete(menu, parent);
        for callback in callbacks {
            callback(menu);
        }
        if let Some(parent) = parent {
            self.detach_child(parent, menu);
        }
    }

    fn on_hide_complete(&mut self, menu: MenuHandle, former_parent: Option<MenuHandle>) {
        if let Some(position) = self.active.iter().position(|other| *other == menu) {
            self.active.remove(position);
            self.target_outside_click(None);
            if !self.check_queue() {
                let topmost = self.topmost();
                self.target_outside_click(topmost);
            }
        } else {
            let target = former_parent
                .filter(|parent| self.is_visible(*parent))
                .or_else(|| self.topmost());
            self.target_outside_click(target);
        }
        self.release_instance(menu);
    }

    fn detach_child(&mut self, parent: MenuHandle, child: MenuHandle) {
        let Some(entry) = self.arena.get_mut(parent) else {
            return;
        };
        entry.remove_child(child);
        if !entry.children().is_empty() {
            return;
        }

        let mut own_hide = false;
        let mut callbacks = Vec::new();
        for work in std::mem::take(&mut entry.popups_cleared) {
            match work {
                PopupsCleared::OwnHide => own_hide = true,
                PopupsCleared::Callback(callback) => callbacks.push(callback),
            }
        }
        for callback in callbacks {
            callback(parent);
        }
        if own_hide {
            self.run_own_hide(parent);
        }
    }

    /// Pools the instance when its template allows it and the pool has room,
    /// destroys it otherwise.
    fn release_instance(&mut self, menu: MenuHandle) {
        let Some(entry) = self.arena.get_mut(menu) else {
            return;
        };
        if entry.state() == MenuState::Pooled {
            return;
        }
        let settings = *entry.settings();
        let capacity = settings
            .pool_capacity
            .or(self.config.pool_capacity)
            .unwrap_or(usize::MAX);

        if settings.should_be_pooled && self.pool.len(entry.id()) < capacity {
            entry.set_state(MenuState::Pooled);
            let id = entry.id().clone();
            self.pool.put(&id, menu);
            trace!("Pooled {menu:?}");
        } else {
            self.arena.remove(menu);
            self.host.despawn_surface(menu);
            trace!("Destroyed {menu:?}");
        }
    }
}
