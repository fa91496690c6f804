//! Form templates and their registry.
//!
//! A template is anything implementing [`Template`]: given an output path and
//! a [`RenderContext`], it writes exactly one PDF. Plain functions with the
//! signature `fn(&Path, &RenderContext) -> Result<()>` qualify, which is how
//! the built-in forms are written.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use formsmith::core::Config;
//! use formsmith::templates::{Registry, RenderContext, TemplateOptions};
//!
//! let registry = Registry::discover();
//! let config = Config::default();
//! let options = TemplateOptions::default();
//! let ctx = RenderContext::new(&config, &options);
//!
//! let entry = registry.resolve("membership_form").unwrap();
//! entry.generate(Path::new("output/membership_form.pdf"), &ctx).unwrap();
//! ```

pub mod base;
pub mod fce_membership_form;
pub mod membership_form;
pub mod registry;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::core::Config;
use crate::core::error::Result;

pub use registry::{Registry, TemplateModule, builtin_modules};

/// The capability every registered template provides
pub trait Template: Send + Sync {
    /// Render the document and write it to `output_path`
    fn generate(&self, output_path: &Path, ctx: &RenderContext<'_>) -> Result<()>;
}

impl<F> Template for F
where
    F: Fn(&Path, &RenderContext<'_>) -> Result<()> + Send + Sync,
{
    fn generate(&self, output_path: &Path, ctx: &RenderContext<'_>) -> Result<()> {
        self(output_path, ctx)
    }
}

/// Shared handle to a registered template
pub type TemplateEntry = Arc<dyn Template>;

/// Per-run options forwarded to every template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Emit AcroForm fields; when false, value cells are blank boxes
    pub fillable: bool,
    /// Free-form named parameters from `--param KEY=VALUE`
    pub params: BTreeMap<String, String>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            fillable: true,
            params: BTreeMap::new(),
        }
    }
}

impl TemplateOptions {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Everything a template may read while rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a Config,
    pub options: &'a TemplateOptions,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a Config, options: &'a TemplateOptions) -> Self {
        Self { config, options }
    }

    /// Document title: the `title` param when given, otherwise `default`
    pub fn title_or<'b>(&'b self, default: &'b str) -> &'b str {
        self.options.param("title").unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_is_fillable() {
        let options = TemplateOptions::default();
        assert!(options.fillable);
        assert!(options.params.is_empty());
    }

    #[test]
    fn test_title_param_overrides_default() {
        let config = Config::default();
        let mut options = TemplateOptions::default();
        let ctx = RenderContext::new(&config, &options);
        assert_eq!(ctx.title_or("Membership Form"), "Membership Form");

        options
            .params
            .insert("title".to_string(), "Renewal Form".to_string());
        let ctx = RenderContext::new(&config, &options);
        assert_eq!(ctx.title_or("Membership Form"), "Renewal Form");
    }

    #[test]
    fn test_closures_are_templates() {
        let entry: TemplateEntry = Arc::new(|path: &Path, _ctx: &RenderContext<'_>| -> Result<()> {
            std::fs::write(path, b"%PDF-1.7")?;
            Ok(())
        });
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("x.pdf");
        let config = Config::default();
        let options = TemplateOptions::default();
        entry
            .generate(&path, &RenderContext::new(&config, &options))
            .unwrap();
        assert!(path.exists());
    }
}
