//! Template registry: the name → template mapping built once per run.
//!
//! Registration is an explicit table of the modules under `templates/`
//! ([`builtin_modules`]). Adding a form means writing its module and adding
//! one row here; the dispatcher never changes.
//!
//! Two rules apply when the table is turned into a [`Registry`]:
//! - the infrastructure modules in [`RESERVED_MODULES`] are never registered,
//!   even if their row carries a generator;
//! - rows without a generator are skipped silently.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{TemplateEntry, fce_membership_form, membership_form};
use crate::core::error::{Error, Result};

/// Module names that are infrastructure, not templates: this registry
/// definition and the shared drawing helpers.
pub const RESERVED_MODULES: [&str; 2] = ["registry", "base"];

/// One row of the registration table
#[derive(Clone)]
pub struct TemplateModule {
    pub name: String,
    pub entry: Option<TemplateEntry>,
}

impl TemplateModule {
    pub fn new(name: impl Into<String>, entry: Option<TemplateEntry>) -> Self {
        Self {
            name: name.into(),
            entry,
        }
    }

    /// A row whose module exposes a generator
    pub fn with_entry(name: impl Into<String>, entry: TemplateEntry) -> Self {
        Self::new(name, Some(entry))
    }
}

impl fmt::Debug for TemplateModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateModule")
            .field("name", &self.name)
            .field("has_entry", &self.entry.is_some())
            .finish()
    }
}

/// Every module under `templates/`
pub fn builtin_modules() -> Vec<TemplateModule> {
    vec![
        TemplateModule::new("base", None),
        TemplateModule::with_entry(
            "fce_membership_form",
            Arc::new(fce_membership_form::generate),
        ),
        TemplateModule::with_entry("membership_form", Arc::new(membership_form::generate)),
        TemplateModule::new("registry", None),
    ]
}

/// Immutable, alphabetically ordered name → template mapping
#[derive(Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, TemplateEntry>,
}

impl Registry {
    /// Build the registry from the built-in registration table
    pub fn discover() -> Self {
        Self::from_modules(builtin_modules())
    }

    /// Build a registry from an arbitrary registration table
    pub fn from_modules<I>(modules: I) -> Self
    where
        I: IntoIterator<Item = TemplateModule>,
    {
        let mut entries = BTreeMap::new();
        for module in modules {
            if RESERVED_MODULES.contains(&module.name.as_str()) {
                debug!(module = %module.name, "Skipping infrastructure module");
                continue;
            }
            match module.entry {
                Some(entry) => {
                    debug!(template = %module.name, "Registered template");
                    entries.insert(module.name, entry);
                }
                None => {
                    debug!(module = %module.name, "Module has no generator, skipped");
                }
            }
        }
        Self { entries }
    }

    /// Registered names in alphabetical order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Look up a template by name
    pub fn resolve(&self, name: &str) -> Result<TemplateEntry> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownTemplate {
                name: name.to_string(),
                known: self.names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("templates", &self.names())
            .finish()
    }
}
