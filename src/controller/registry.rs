use std::sync::Arc;

use bevy::platform::collections::HashMap;

use crate::error::MenuError;
use crate::menu::{MenuId, MenuTemplate};

/// Identifier to template lookup for one controller.
#[derive(Clone, Debug, Default)]
pub struct MenuRegistry {
    templates: HashMap<MenuId, MenuTemplate>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry, refusing identifiers that appear twice.
    pub fn from_templates(
        templates: impl IntoIterator<Item = MenuTemplate>,
    ) -> Result<Self, MenuError> {
        let mut registry = Self::new();
        for template in templates {
            registry.register(template)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, template: MenuTemplate) -> Result<(), MenuError> {
        if self.templates.contains_key(template.id()) {
            return Err(MenuError::DuplicateIdentifier(template.id().clone()));
        }
        self.templates.insert(template.id().clone(), template);
        Ok(())
    }

    pub fn get(&self, id: &MenuId) -> Option<&MenuTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &MenuId) -> bool {
        self.templates.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &MenuId> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Templates every controller built with this registry can instantiate.
///
/// Frozen once built; controllers only read from it.
#[derive(Clone, Debug, Default)]
pub struct SharedMenuRegistry(Arc<MenuRegistry>);

impl SharedMenuRegistry {
    pub fn new(registry: MenuRegistry) -> Self {
        Self(Arc::new(registry))
    }

    pub fn get(&self, id: &MenuId) -> Option<&MenuTemplate> {
        self.0.get(id)
    }

    pub fn registry(&self) -> &MenuRegistry {
        &self.0
    }
}
