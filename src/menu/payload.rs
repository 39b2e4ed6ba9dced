use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::MenuError;

/// Data handed to a menu when it is shown.
///
/// The controller never looks inside; it only carries the payload from the
/// call site (or the deferral queue) to the menu's behaviour, which checks the
/// type it expects with [`MenuPayload::get`].
#[derive(Clone)]
pub struct MenuPayload {
    data: Option<Arc<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl MenuPayload {
    pub const fn none() -> Self {
        Self {
            data: None,
            type_name: "nothing",
        }
    }

    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self {
            data: Some(Arc::new(data)),
            type_name: type_name::<T>(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.data.is_none()
    }

    /// Name of the type this payload was built from, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any + Send + Sync>(&self) -> bool {
        self.data.as_deref().is_some_and(|data| data.is::<T>())
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Result<&T, MenuError> {
        self.data
            .as_deref()
            .and_then(|data| data.downcast_ref::<T>())
            .ok_or_else(|| self.mismatch::<T>())
    }

    /// Like [`MenuPayload::get`], but shares ownership of the data so a
    /// behaviour can keep it after the show call returns.
    pub fn get_shared<T: Any + Send + Sync>(&self) -> Result<Arc<T>, MenuError> {
        self.data
            .clone()
            .and_then(|data| data.downcast::<T>().ok())
            .ok_or_else(|| self.mismatch::<T>())
    }

    fn mismatch<T>(&self) -> MenuError {
        MenuError::InvalidPayload {
            expected: type_name::<T>(),
            found: self.type_name,
        }
    }
}

impl Default for MenuPayload {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for MenuPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MenuPayload").field(&self.type_name).finish()
    }
}
