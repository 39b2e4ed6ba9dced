use std::fmt;
use std::sync::Arc;

use super::{MenuBehaviour, MenuId, MenuSettings, PlainMenu};

type BehaviourFactory = Arc<dyn Fn() -> Box<dyn MenuBehaviour> + Send + Sync>;

/// The prototype a controller instantiates menus from on a pool miss.
#[derive(Clone)]
pub struct MenuTemplate {
    id: MenuId,
    settings: MenuSettings,
    factory: BehaviourFactory,
}

impl MenuTemplate {
    pub fn new<B, F>(id: impl Into<MenuId>, settings: MenuSettings, factory: F) -> Self
    where
        B: MenuBehaviour,
        F: Fn() -> B + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            settings,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn MenuBehaviour>),
        }
    }

    /// A template whose instances carry no view state.
    pub fn plain(id: impl Into<MenuId>, settings: MenuSettings) -> Self {
        Self::new(id, settings, || PlainMenu)
    }

    pub fn id(&self) -> &MenuId {
        &self.id
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    pub(crate) fn instantiate(&self) -> Box<dyn MenuBehaviour> {
        (self.factory)()
    }
}

impl fmt::Debug for MenuTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuTemplate")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
