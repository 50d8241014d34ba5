//! Explicit module registration.
//!
//! The binary builds the registry by hand; registration order is the order
//! in which migrations, init and route registration run.

use std::sync::Arc;

use crate::contracts::{DbModule, Module, RestfulModule};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("module '{0}' is registered twice")]
    Duplicate(&'static str),

    #[error("migration failed for module '{module}'")]
    DbMigrate {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("init failed for module '{module}'")]
    Init {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("REST registration failed for module '{module}'")]
    Rest {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// One module and the capabilities it exposes.
pub struct ModuleEntry {
    pub(crate) name: &'static str,
    pub(crate) core: Arc<dyn Module>,
    pub(crate) db: Option<Arc<dyn DbModule>>,
    pub(crate) rest: Option<Arc<dyn RestfulModule>>,
}

impl ModuleEntry {
    pub fn new(name: &'static str, core: Arc<dyn Module>) -> Self {
        Self {
            name,
            core,
            db: None,
            rest: None,
        }
    }

    #[must_use]
    pub fn with_db(mut self, db: Arc<dyn DbModule>) -> Self {
        self.db = Some(db);
        self
    }

    #[must_use]
    pub fn with_rest(mut self, rest: Arc<dyn RestfulModule>) -> Self {
        self.rest = Some(rest);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// [`RegistryError::Duplicate`] if a module with the same name exists.
    pub fn register(&mut self, entry: ModuleEntry) -> Result<(), RegistryError> {
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(RegistryError::Duplicate(entry.name));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub(crate) fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::context::ModuleCtx;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Module for Noop {
        async fn init(&self, _ctx: &ModuleCtx) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn keeps_registration_order() {
        let mut reg = ModuleRegistry::new();
        reg.register(ModuleEntry::new("accounts", Arc::new(Noop)))
            .unwrap();
        reg.register(ModuleEntry::new("datasets", Arc::new(Noop)))
            .unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), ["accounts", "datasets"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut reg = ModuleRegistry::new();
        reg.register(ModuleEntry::new("datasets", Arc::new(Noop)))
            .unwrap();
        let err = reg
            .register(ModuleEntry::new("datasets", Arc::new(Noop)))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate("datasets")));
    }
}
