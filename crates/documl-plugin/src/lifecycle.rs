//! Documentation lifecycle phases and their dispatch.
//!
//! A run goes through the phases in a fixed order:
//!
//! ```text
//! resolve-begin -> resolve-end -> render-begin -> page-end* -> render-end
//! ```
//!
//! The resolve half and the render half may also run on their own (for
//! example in two separate processes). A plugin declares which handler runs
//! in which phase with an ordered list of [`Binding`]s; [`Lifecycle`] checks
//! the phase order and calls the bound handlers.

use std::fmt;
use std::path::{Path, PathBuf};

use documl_config::UmlOptions;
use documl_model::Project;

use crate::error::PluginError;

/// A lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResolveBegin,
    ResolveEnd,
    RenderBegin,
    PageEnd,
    RenderEnd,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResolveBegin => "resolve-begin",
            Self::ResolveEnd => "resolve-end",
            Self::RenderBegin => "render-begin",
            Self::PageEnd => "page-end",
            Self::RenderEnd => "render-end",
        }
    }

    /// Whether `self` may be dispatched right after `previous`.
    fn may_follow(self, previous: Option<Self>) -> bool {
        matches!(
            (previous, self),
            (None, Self::ResolveBegin | Self::RenderBegin)
                | (Some(Self::ResolveBegin), Self::ResolveEnd)
                | (Some(Self::ResolveEnd), Self::RenderBegin)
                | (
                    Some(Self::RenderBegin | Self::PageEnd),
                    Self::PageEnd | Self::RenderEnd
                )
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered page, just before it is written out.
#[derive(Debug, Clone)]
pub struct Page {
    /// Output file of the page.
    pub filename: PathBuf,
    /// Rendered contents, rewritten in place by page-end handlers.
    pub contents: String,
}

/// Data delivered to the handlers of a phase.
#[derive(Debug)]
pub enum Event<'a> {
    /// Options read from the host for this run.
    ResolveBegin { options: &'a UmlOptions },
    /// All declarations, open for mutation.
    ResolveEnd { project: &'a mut Project },
    /// Root of the output directory.
    RenderBegin { output_dir: &'a Path },
    /// One rendered page.
    PageEnd { page: &'a mut Page },
    /// Root of the output directory, once all pages are written.
    RenderEnd { output_dir: &'a Path },
}

impl Event<'_> {
    pub fn phase(&self) -> Phase {
        match self {
            Self::ResolveBegin { .. } => Phase::ResolveBegin,
            Self::ResolveEnd { .. } => Phase::ResolveEnd,
            Self::RenderBegin { .. } => Phase::RenderBegin,
            Self::PageEnd { .. } => Phase::PageEnd,
            Self::RenderEnd { .. } => Phase::RenderEnd,
        }
    }
}

/// Handler bound to a phase.
pub type Handler<P> = fn(&mut P, &mut Event<'_>) -> Result<(), PluginError>;

/// Registration of one handler for one phase.
pub struct Binding<P> {
    pub phase: Phase,
    pub handler: Handler<P>,
}

impl<P> Binding<P> {
    pub fn new(phase: Phase, handler: Handler<P>) -> Self {
        Self { phase, handler }
    }
}

impl<P> fmt::Debug for Binding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// A plugin attached to the documentation lifecycle.
pub trait LifecyclePlugin: Sized {
    /// Handlers of this plugin, in the order they run within a phase.
    fn bindings() -> Vec<Binding<Self>>;
}

/// Drives a plugin through the lifecycle phases.
#[derive(Debug)]
pub struct Lifecycle<P> {
    plugin: P,
    bindings: Vec<Binding<P>>,
    previous: Option<Phase>,
}

impl<P: LifecyclePlugin> Lifecycle<P> {
    pub fn new(plugin: P) -> Self {
        Self {
            plugin,
            bindings: P::bindings(),
            previous: None,
        }
    }
}

impl<P> Lifecycle<P> {
    /// Run every handler bound to the event's phase.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::OutOfOrder`] without running any handler if the
    /// phase may not follow the previously dispatched one, or the first
    /// error returned by a handler.
    pub fn dispatch(&mut self, mut event: Event<'_>) -> Result<(), PluginError> {
        let phase = event.phase();
        if !phase.may_follow(self.previous) {
            return Err(PluginError::OutOfOrder {
                phase,
                previous: self.previous,
            });
        }
        self.previous = Some(phase);

        for binding in self.bindings.iter().filter(|b| b.phase == phase) {
            (binding.handler)(&mut self.plugin, &mut event)?;
        }
        Ok(())
    }

    /// Last phase dispatched.
    pub fn phase(&self) -> Option<Phase> {
        self.previous
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    pub fn plugin_mut(&mut self) -> &mut P {
        &mut self.plugin
    }

    pub fn into_plugin(self) -> P {
        self.plugin
    }
}
