//! Explicit tracing hook for lowering and rendering.
//!
//! Nothing in the translation path touches global logging state. Callers
//! that want a trace pass a [`Tracer`]; [`LogTracer`] forwards to `tracing`.

use crate::identifiers::Dialect;

/// One step of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    /// A parse-tree node of `kind` is being lowered.
    Lower { kind: &'a str, depth: usize },
    /// An AST node is being rendered.
    Render {
        dialect: Dialect,
        node: &'static str,
        depth: usize,
    },
}

/// Receives trace events.
pub trait Tracer {
    fn trace(&self, event: &TraceEvent<'_>);
}

impl<F> Tracer for F
where
    F: Fn(&TraceEvent<'_>),
{
    fn trace(&self, event: &TraceEvent<'_>) {
        self(event)
    }
}

/// Forwards events to the `tracing` crate at `TRACE` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&self, event: &TraceEvent<'_>) {
        match *event {
            TraceEvent::Lower { kind, depth } => {
                tracing::trace!(kind, depth, "lower");
            }
            TraceEvent::Render {
                dialect,
                node,
                depth,
            } => {
                tracing::trace!(%dialect, node, depth, "render");
            }
        }
    }
}

pub(crate) fn emit(tracer: Option<&dyn Tracer>, event: TraceEvent<'_>) {
    if let Some(tracer) = tracer {
        tracer.trace(&event);
    }
}
