//! `documl render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use documl_plugin::{Lifecycle, Page, PluginError, UmlPlugin, run_render};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Output directory of the documentation generator.
    output_dir: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if pages cannot be read or written, an image cannot
    /// be stored, or the stylesheet cannot be patched. Images that fail to
    /// render are reported without failing the command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        if !self.output_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "output directory not found: {}",
                self.output_dir.display()
            )));
        }

        let pages = collect_pages(&self.output_dir)?;
        output.start(&format!(
            "Rewriting {} pages in {} ({} images, {})...",
            pages.len(),
            self.output_dir.display(),
            config.uml.format,
            config.uml.location
        ));

        let mut lifecycle = Lifecycle::new(UmlPlugin::from_config(&config)?);
        let reports = run_render(&mut lifecycle, &self.output_dir, pages, |page| {
            std::fs::write(&page.filename, &page.contents).map_err(|source| PluginError::Io {
                path: page.filename.clone(),
                source,
            })
        })?;

        for report in &reports {
            for failure in &report.failures {
                output.image_failed(&report.page, failure);
            }
        }
        output.rendered(lifecycle.plugin().stats());
        Ok(())
    }
}

/// All HTML pages under `output_dir`, sorted by path.
fn collect_pages(output_dir: &Path) -> Result<Vec<Page>, CliError> {
    let pattern = output_dir.join("**").join("*.html");
    let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable path");
                None
            }
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|filename| {
            let contents = std::fs::read_to_string(&filename)?;
            Ok(Page { filename, contents })
        })
        .collect()
}
