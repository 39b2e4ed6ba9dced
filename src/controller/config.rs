use std::borrow::Cow;

use crate::menu::Menu;

/// Which active menus a fullscreen menu closes when it is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FullscreenPolicy {
    /// Every active menu that does not block new menus.
    #[default]
    HideNonBlocking,
    /// Only menus that allow being closed.
    HideClosable,
    /// Only other fullscreen menus; windows and popups stay open.
    HideFullscreenOnly,
}

impl FullscreenPolicy {
    pub fn should_hide(self, menu: &Menu) -> bool {
        match self {
            Self::HideNonBlocking => !menu.should_block_new_menu(),
            Self::HideClosable => menu.settings().can_be_closed,
            Self::HideFullscreenOnly => {
                menu.settings().fullscreen && !menu.should_block_new_menu()
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuControllerConfig {
    /// Lets the Bevy adapter address the controller's canvas by name.
    pub name: Option<Cow<'static, str>>,
    pub fullscreen_policy: FullscreenPolicy,
    /// Idle instances kept per identifier when the template does not say.
    /// `None` keeps every instance.
    pub pool_capacity: Option<usize>,
}

impl MenuControllerConfig {
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: FullscreenPolicy) -> Self {
        self.fullscreen_policy = policy;
        self
    }

    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = Some(capacity);
        self
    }
}
