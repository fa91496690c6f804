//! Batch execution of registered templates.
//!
//! Each selected name is resolved and invoked in order with
//! `<output_dir>/<name>.pdf`. Resolution errors, returned errors and panics
//! are all recorded as failures for that name and the batch moves on.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use super::mode::RunMode;
use super::report::{BatchReport, RunResult};
use crate::core::error::{Error, Result};
use crate::templates::{Registry, RenderContext};

/// Runs templates from a registry into one output directory
#[derive(Debug)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    output_dir: PathBuf,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            output_dir: output_dir.into(),
        }
    }

    /// Names a mode selects, in execution order
    pub fn select(&self, mode: &RunMode) -> Vec<String> {
        match mode {
            RunMode::List => Vec::new(),
            RunMode::Template(name) => vec![name.clone()],
            RunMode::All => self.registry.names(),
        }
    }

    /// Output file for a template name
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.pdf"))
    }

    /// Generate everything `mode` selects
    pub fn run(&self, mode: &RunMode, ctx: &RenderContext<'_>) -> Result<BatchReport> {
        let names = self.select(mode);
        if names.is_empty() && *mode == RunMode::All {
            warn!("No templates registered, nothing to generate");
        }
        self.execute(&names, ctx)
    }

    /// Generate `names` in order.
    ///
    /// Only failing to create the output directory aborts the batch.
    pub fn execute(&self, names: &[String], ctx: &RenderContext<'_>) -> Result<BatchReport> {
        if !self.output_dir.exists() {
            info!(path = %self.output_dir.display(), "Creating output directory");
        }
        std::fs::create_dir_all(&self.output_dir)?;

        Ok(names.iter().map(|name| self.run_one(name, ctx)).collect())
    }

    fn run_one(&self, name: &str, ctx: &RenderContext<'_>) -> RunResult {
        let entry = match self.registry.resolve(name) {
            Ok(entry) => entry,
            Err(e) => {
                error!(template = %name, "{e}");
                return RunResult::failure(name, e.to_string());
            }
        };

        let path = self.output_path(name);
        debug!(template = %name, path = %path.display(), "Generating");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.generate(&path, ctx)));

        match outcome {
            Ok(Ok(())) => {
                info!(template = %name, path = %path.display(), "Generated");
                RunResult::success(name, path)
            }
            Ok(Err(e)) => {
                let e = match e {
                    Error::Generation { .. } => e,
                    other => Error::generation(name, other),
                };
                error!(template = %name, "{e}");
                RunResult::failure(name, e.to_string())
            }
            Err(payload) => {
                let message = format!("panicked: {}", panic_message(payload.as_ref()));
                let e = Error::generation(name, message);
                error!(template = %name, "{e}");
                RunResult::failure(name, e.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::templates::{TemplateEntry, TemplateModule, TemplateOptions};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn writes_file() -> TemplateEntry {
        Arc::new(|path: &Path, _: &RenderContext<'_>| -> Result<()> {
            std::fs::write(path, b"%PDF-1.7\n%%EOF\n")?;
            Ok(())
        })
    }

    fn returns_error() -> TemplateEntry {
        Arc::new(|_: &Path, _: &RenderContext<'_>| -> Result<()> {
            Err(Error::config("font table exploded"))
        })
    }

    fn panics() -> TemplateEntry {
        Arc::new(|_: &Path, _: &RenderContext<'_>| -> Result<()> {
            panic!("layout overflow");
        })
    }

    fn registry() -> Registry {
        Registry::from_modules(vec![
            TemplateModule::with_entry("alpha", writes_file()),
            TemplateModule::with_entry("broken", returns_error()),
            TemplateModule::with_entry("crashing", panics()),
            TemplateModule::with_entry("zulu", writes_file()),
        ])
    }

    #[test]
    fn test_select() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, "out");
        assert!(dispatcher.select(&RunMode::List).is_empty());
        assert_eq!(
            dispatcher.select(&RunMode::Template("zulu".into())),
            vec!["zulu"]
        );
        assert_eq!(
            dispatcher.select(&RunMode::All),
            vec!["alpha", "broken", "crashing", "zulu"]
        );
    }

    #[test]
    fn test_all_run_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("nested").join("out");
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, &output_dir);
        let config = Config::default();
        let options = TemplateOptions::default();

        let report = dispatcher
            .run(&RunMode::All, &RenderContext::new(&config, &options))
            .unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.exit_code(), 1);
        assert!(output_dir.join("alpha.pdf").exists());
        assert!(output_dir.join("zulu.pdf").exists());

        let names: Vec<&str> = report.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "broken", "crashing", "zulu"]);

        let text = report.to_string();
        assert!(text.contains(
            "FAIL broken: Template broken failed: Configuration error: font table exploded"
        ));
        assert!(text.contains("FAIL crashing: Template crashing failed: panicked: layout overflow"));
    }

    #[test]
    fn test_unknown_template_is_recorded_failure() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, temp_dir.path());
        let config = Config::default();
        let options = TemplateOptions::default();

        let report = dispatcher
            .run(
                &RunMode::Template("nonexistent_name".into()),
                &RenderContext::new(&config, &options),
            )
            .unwrap();

        assert_eq!(report.exit_code(), 1);
        let line = report.results()[0].to_string();
        assert!(line.starts_with("FAIL nonexistent_name: Unknown template"));
        assert!(line.contains("alpha, broken, crashing, zulu"));
    }

    #[test]
    fn test_single_template_success() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, temp_dir.path());
        let config = Config::default();
        let options = TemplateOptions::default();

        let report = dispatcher
            .run(
                &RunMode::Template("alpha".into()),
                &RenderContext::new(&config, &options),
            )
            .unwrap();

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.summary(), "1 succeeded, 0 failed");
        assert!(dispatcher.output_path("alpha").exists());
    }

    #[test]
    fn test_all_on_empty_registry_fails() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::from_modules(Vec::new());
        let dispatcher = Dispatcher::new(&registry, temp_dir.path().join("out"));
        let config = Config::default();
        let options = TemplateOptions::default();

        let report = dispatcher
            .run(&RunMode::All, &RenderContext::new(&config, &options))
            .unwrap();

        assert!(report.results().is_empty());
        assert_eq!(report.exit_code(), 1);
        assert!(temp_dir.path().join("out").is_dir());
    }

    #[test]
    fn test_output_dir_creation_failure_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, blocker.join("out"));
        let config = Config::default();
        let options = TemplateOptions::default();

        let result = dispatcher.run(&RunMode::All, &RenderContext::new(&config, &options));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
