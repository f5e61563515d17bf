//! `documl resolve` command implementation.

use std::path::PathBuf;

use clap::Args;
use documl_model::Project;
use documl_plugin::{Lifecycle, UmlPlugin, run_resolve};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Project dump (JSON) produced by the documentation generator.
    project: PathBuf,

    /// Where to write the processed dump (default: overwrite the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the project dump cannot be
    /// loaded, or the processed dump cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        let mut project = Project::load(&self.project)?;
        output.start(&format!(
            "Processing {} declarations from {}...",
            project.len(),
            self.project.display()
        ));

        let mut lifecycle = Lifecycle::new(UmlPlugin::from_config(&config)?);
        run_resolve(&mut lifecycle, &config.uml, &mut project)?;

        let target = self.output.as_ref().unwrap_or(&self.project);
        project.save(target)?;

        output.resolved(lifecycle.plugin().stats(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_writes_processed_dump() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("documl.toml");
        std::fs::write(
            &config_path,
            "[uml]\nformat = \"svg\"\n\n[uml.class_diagram]\ntype = \"simple\"\n",
        )
        .unwrap();
        let input = dir.path().join("project.json");
        std::fs::write(
            &input,
            r#"{"name": "zoo", "declarations": [
                {"id": 1, "name": "Animal", "kind": "class",
                 "comment": {"text": "<uml>Animal -> Food</uml>"},
                 "extendedBy": [{"name": "Dog", "target": 2}]},
                {"id": 2, "name": "Dog", "kind": "class",
                 "extends": [{"name": "Animal", "target": 1}]}
            ]}"#,
        )
        .unwrap();
        let output = dir.path().join("processed.json");

        let args = ResolveArgs {
            project: input.clone(),
            output: Some(output.clone()),
            config: ConfigArgs {
                config: Some(config_path),
                format: None,
                location: None,
                class_diagram: None,
                server_url: None,
            },
        };
        args.execute().unwrap();

        let project = Project::load(&output).unwrap();
        let animal = project.declarations().next().unwrap();
        let text = animal.comment.as_ref().unwrap().text.as_deref().unwrap();
        assert!(!text.contains("<uml>"));
        assert!(text.contains("http://www.plantuml.com/plantuml/svg/"));
        // The input dump is left untouched.
        assert!(std::fs::read_to_string(&input).unwrap().contains("<uml>"));
    }
}
