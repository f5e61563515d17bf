//! The UML handler set.

use std::path::{Path, PathBuf};

use documl_config::{Config, ImageLocation, RendererKind, UmlOptions};
use documl_diagrams::{
    DiagramRenderer, PageRewriter, PlantUmlCommand, PlantUmlServer, RenderError,
    UmlTagConverter, inject_class_diagram, render_bytes, synthesize,
};
use documl_model::{DeclarationId, Project};
use rayon::prelude::*;

use crate::assets;
use crate::error::PluginError;
use crate::lifecycle::{Binding, Event, Lifecycle, LifecyclePlugin, Page, Phase};

/// Outcome of rewriting one page.
#[derive(Debug)]
pub struct PageReport {
    /// Output file of the page.
    pub page: PathBuf,
    /// Local images written for the page.
    pub images: Vec<PathBuf>,
    /// Images whose rendering failed. Their tags link to the server instead
    /// and use up no image number.
    pub failures: Vec<RenderError>,
    /// Whether the page contents changed.
    pub rewritten: bool,
}

/// Totals of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Class diagrams injected into comments.
    pub diagrams_injected: usize,
    /// `<uml>` tags converted into image links.
    pub tags_converted: usize,
    /// Pages containing at least one PlantUML image.
    pub pages_rewritten: usize,
    /// Local images written.
    pub images_written: usize,
    /// Local images that failed to render.
    pub image_failures: usize,
}

/// Turns `<uml>` tags and class hierarchies into PlantUML images.
///
/// Handlers, in lifecycle order:
/// - resolve-begin: adopt the options of the run
/// - resolve-end: inject class diagrams and convert `<uml>` tags in comments
/// - render-begin: prepare the image directory
/// - page-end: rewrite image tags, writing local images
/// - render-end: patch the stylesheet
pub struct UmlPlugin {
    options: UmlOptions,
    converter: UmlTagConverter,
    rewriter: PageRewriter,
    renderer: Box<dyn DiagramRenderer>,
    images_dir: Option<PathBuf>,
    /// Number of the last local image; images are numbered from 1.
    image_count: usize,
    stats: RunStats,
    reports: Vec<PageReport>,
}

impl std::fmt::Debug for UmlPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UmlPlugin")
            .field("options", &self.options)
            .field("images_dir", &self.images_dir)
            .field("image_count", &self.image_count)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl UmlPlugin {
    pub fn new(options: UmlOptions, renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            converter: UmlTagConverter::new(&options),
            rewriter: PageRewriter::new(&options),
            options,
            renderer,
            images_dir: None,
            image_count: 0,
            stats: RunStats::default(),
            reports: Vec::new(),
        }
    }

    /// Build the plugin with the renderer selected in `config`.
    pub fn from_config(config: &Config) -> Result<Self, PluginError> {
        let renderer: Box<dyn DiagramRenderer> = match config.renderer.kind {
            RendererKind::Server => Box::new(PlantUmlServer::new(
                config.uml.server_url.clone(),
                config.renderer.timeout(),
            )),
            RendererKind::Command => Box::new(
                PlantUmlCommand::new(&config.renderer.command).ok_or(PluginError::EmptyCommand)?,
            ),
        };
        Ok(Self::new(config.uml.clone(), renderer))
    }

    pub fn options(&self) -> &UmlOptions {
        &self.options
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Page reports collected since the last call.
    pub fn take_reports(&mut self) -> Vec<PageReport> {
        std::mem::take(&mut self.reports)
    }

    fn set_options(&mut self, options: &UmlOptions) {
        self.options = options.clone();
        self.converter = UmlTagConverter::new(options);
        self.rewriter = PageRewriter::new(options);
    }

    fn on_resolve_begin(&mut self, event: &mut Event<'_>) -> Result<(), PluginError> {
        if let Event::ResolveBegin { options } = event {
            self.set_options(options);
            tracing::debug!(
                format = %self.options.format,
                location = %self.options.location,
                "UML options adopted"
            );
        }
        Ok(())
    }

    fn on_resolve_end(&mut self, event: &mut Event<'_>) -> Result<(), PluginError> {
        if let Event::ResolveEnd { project } = event {
            let injected = self.inject_class_diagrams(project);
            let converted = self.convert_comments(project);
            self.stats.diagrams_injected += injected;
            self.stats.tags_converted += converted;
            tracing::info!(
                declarations = project.len(),
                injected,
                converted,
                "Processed UML in comments"
            );
        }
        Ok(())
    }

    /// Add a class diagram to every commented class or interface that has
    /// relationships.
    fn inject_class_diagrams(&self, project: &mut Project) -> usize {
        let class_diagram = &self.options.class_diagram;
        if !class_diagram.diagram_type.is_enabled() {
            return 0;
        }

        let diagrams: Vec<(DeclarationId, Vec<String>)> = project
            .declarations()
            .filter(|d| d.is_class_like() && d.comment.is_some())
            .map(|d| (d.id, synthesize(project, d, class_diagram)))
            .filter(|(_, lines)| !lines.is_empty())
            .collect();

        for (id, lines) in &diagrams {
            if let Some(comment) = project.get_mut(*id).and_then(|d| d.comment.as_mut()) {
                inject_class_diagram(comment, lines, class_diagram.position);
            }
        }
        diagrams.len()
    }

    fn convert_comments(&self, project: &mut Project) -> usize {
        let mut converted = 0;
        for id in project.ids() {
            if let Some(comment) = project.get_mut(id).and_then(|d| d.comment.as_mut()) {
                converted += self.converter.convert_comment(comment);
            }
        }
        converted
    }

    fn on_render_begin(&mut self, event: &mut Event<'_>) -> Result<(), PluginError> {
        if let Event::RenderBegin { output_dir } = event {
            let images_dir = assets::images_dir(output_dir);
            if self.options.location == ImageLocation::Local {
                std::fs::create_dir_all(&images_dir)
                    .map_err(|e| PluginError::io(&images_dir, e))?;
            }
            self.images_dir = Some(images_dir);
        }
        Ok(())
    }

    fn on_page_end(&mut self, event: &mut Event<'_>) -> Result<(), PluginError> {
        if let Event::PageEnd { page } = event {
            let report = self.rewrite_page(page)?;
            if !report.failures.is_empty() || !report.images.is_empty() {
                tracing::debug!(
                    page = %report.page.display(),
                    images = report.images.len(),
                    failures = report.failures.len(),
                    "Page rewritten"
                );
            }
            self.reports.push(report);
        }
        Ok(())
    }

    /// Rewrite the PlantUML images of a page.
    ///
    /// In local mode the images of the page are rendered in parallel first;
    /// only images that were written get a number and a local link. An image
    /// whose rendering failed keeps pointing at the server.
    pub fn rewrite_page(&mut self, page: &mut Page) -> Result<PageReport, PluginError> {
        let mut report = PageReport {
            page: page.filename.clone(),
            images: Vec::new(),
            failures: Vec::new(),
            rewritten: false,
        };

        let contents = match self.options.location {
            ImageLocation::Remote => self.rewriter.rewrite_remote(&page.contents).into_owned(),
            ImageLocation::Local => {
                let images_dir = self
                    .images_dir
                    .clone()
                    .ok_or(PluginError::RenderNotStarted)?;
                let mut sources = self.materialize(page, &images_dir, &mut report)?;
                self.rewriter
                    .rewrite(&page.contents, |image| std::mem::take(&mut sources[image.index]))
                    .into_owned()
            }
        };

        if contents != page.contents {
            self.stats.pages_rewritten += 1;
            report.rewritten = true;
            page.contents = contents;
        }
        Ok(report)
    }

    /// Render the images of a page in parallel, then number and write the
    /// successful ones in document order.
    ///
    /// Returns the final source of every image, indexed like the page.
    fn materialize(
        &mut self,
        page: &Page,
        images_dir: &Path,
        report: &mut PageReport,
    ) -> Result<Vec<String>, PluginError> {
        let renderer = self.renderer.as_ref();
        let format = self.options.format;
        let images = self.rewriter.images(&page.contents);

        let rendered: Vec<_> = images
            .par_iter()
            .map(|image| render_bytes(renderer, image.index, image.encoded, format))
            .collect();

        let mut sources = Vec::with_capacity(images.len());
        for (image, result) in images.iter().zip(rendered) {
            match result {
                Ok(bytes) => {
                    let number = self.image_count + 1;
                    let path = images_dir.join(assets::image_filename(number, format));
                    assets::write_image(&path, &bytes)?;
                    self.image_count = number;
                    self.stats.images_written += 1;
                    tracing::debug!(path = %path.display(), "Wrote image");
                    sources.push(assets::relative_link(&page.filename, &path));
                    report.images.push(path);
                }
                Err(e) => {
                    tracing::warn!(page = %report.page.display(), error = %e, "Failed to render image");
                    self.stats.image_failures += 1;
                    sources.push(self.rewriter.remote_src(image.encoded));
                    report.failures.push(e);
                }
            }
        }
        Ok(sources)
    }

    fn on_render_end(&mut self, event: &mut Event<'_>) -> Result<(), PluginError> {
        if let Event::RenderEnd { output_dir } = event {
            let path = assets::patch_stylesheet(output_dir)?;
            tracing::info!(
                stylesheet = %path.display(),
                images = self.stats.images_written,
                failures = self.stats.image_failures,
                "Render finished"
            );
        }
        Ok(())
    }
}

impl LifecyclePlugin for UmlPlugin {
    fn bindings() -> Vec<Binding<Self>> {
        vec![
            Binding::new(Phase::ResolveBegin, Self::on_resolve_begin),
            Binding::new(Phase::ResolveEnd, Self::on_resolve_end),
            Binding::new(Phase::RenderBegin, Self::on_render_begin),
            Binding::new(Phase::PageEnd, Self::on_page_end),
            Binding::new(Phase::RenderEnd, Self::on_render_end),
        ]
    }
}

/// Resolve half of a run: adopt options and rewrite comments.
pub fn run_resolve(
    lifecycle: &mut Lifecycle<UmlPlugin>,
    options: &UmlOptions,
    project: &mut Project,
) -> Result<(), PluginError> {
    lifecycle.dispatch(Event::ResolveBegin { options })?;
    lifecycle.dispatch(Event::ResolveEnd { project })
}

/// Render half of a run over already rendered pages.
///
/// Each page is rewritten in memory; pages whose contents changed are handed
/// back through `write_page`.
pub fn run_render<I, W>(
    lifecycle: &mut Lifecycle<UmlPlugin>,
    output_dir: &Path,
    pages: I,
    mut write_page: W,
) -> Result<Vec<PageReport>, PluginError>
where
    I: IntoIterator<Item = Page>,
    W: FnMut(&Page) -> Result<(), PluginError>,
{
    lifecycle.dispatch(Event::RenderBegin { output_dir })?;
    for mut page in pages {
        lifecycle.dispatch(Event::PageEnd { page: &mut page })?;
        let rewritten = lifecycle
            .plugin()
            .reports
            .last()
            .is_some_and(|report| report.rewritten);
        if rewritten {
            write_page(&page)?;
        }
    }
    lifecycle.dispatch(Event::RenderEnd { output_dir })?;
    Ok(lifecycle.plugin_mut().take_reports())
}
