// SPDX-License-Identifier: MIT

//! An `Action` is a named, registerable procedure that drives one
//! interactive UI session (§3).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ActionError;
use crate::io_context::IoContext;

/// The handler-visible context for one action invocation: its slug and the
/// session's cancellation signal.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub slug: String,
    pub cancel: CancellationToken,
}

impl ActionContext {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// The future a handler returns. Boxed because handler bodies are arbitrary
/// async blocks with distinct concrete futures.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send>>;

/// A handler: an async procedure that performs display/input operations
/// through `IoContext` and resolves to `ok` or `error`.
pub type HandlerFn = Arc<dyn Fn(ActionContext, IoContext) -> HandlerFuture + Send + Sync>;

/// A registerable action: display name, optional description, and the
/// handler body that drives one session.
#[derive(Clone)]
pub struct Action {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub handler: HandlerFn,
}

/// Descriptor returned by `Registry::list`/`get` — no handler body, safe to
/// serialize for the HTTP listing surface.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActionDescriptor {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Action {
    pub fn new(name: impl Into<String>, handler: HandlerFn) -> Self {
        let name = name.into();
        Self { slug: name.clone(), name, description: None, handler }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor {
            slug: self.slug.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Wrap an async handler body into a boxed `HandlerFn`.
///
/// ```ignore
/// let handler = handler_fn(|ctx, io| async move {
///     io.display.heading("hi", 1)?;
///     Ok(())
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(ActionContext, IoContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    Arc::new(move |ctx, io| Box::pin(f(ctx, io)))
}
