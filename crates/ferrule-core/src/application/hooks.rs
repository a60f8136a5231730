//! Named hooks with ordered, sequential asynchronous invocation.
//!
//! A hook is a name plus the callbacks registered under it, in registration
//! order. Invoking a hook awaits each callback to completion before starting
//! the next one, so a callback always observes the mutations of the ones
//! before it. The first error stops the invocation.
//!
//! The registry is generic over the context type handed to callbacks; the
//! host uses `HookRegistry<Host>`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use crate::application::error::ApplicationError;
use crate::application::services::pipeline::BuildOptions;
use crate::domain::ConfigChain;

/// Hook names the host itself invokes.
pub mod names {
    /// Once, after all plugins are applied and before command dispatch.
    pub const BEFORE_RUN: &str = "beforeRun";
    /// On every configuration resolution.
    pub const CHAIN_WEBPACK: &str = "chainWebpack";
    pub const AFTER_CREATE: &str = "afterCreate";
    pub const AFTER_ADD_PAGE: &str = "afterAddPage";
    pub const AFTER_ADD_COMPONENT: &str = "afterAddComponent";
}

/// Arguments passed along with the context to every callback of a hook.
pub enum HookArgs<'a> {
    Empty,
    /// `chainWebpack`: the chain under construction and the normalized options.
    ChainWebpack {
        chain: &'a mut ConfigChain,
        options: &'a BuildOptions,
    },
    /// Event payload of the `after*` scaffolding hooks.
    Payload(&'a Value),
}

impl fmt::Debug for HookArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::ChainWebpack { options, .. } => f
                .debug_struct("ChainWebpack")
                .field("options", options)
                .finish_non_exhaustive(),
            Self::Payload(value) => f.debug_tuple("Payload").field(value).finish(),
        }
    }
}

/// A callback registered on a hook.
#[async_trait]
pub trait HookHandler<C: ?Sized>: Send + Sync {
    async fn call(&self, cx: &mut C, args: &mut HookArgs<'_>) -> anyhow::Result<()>;
}

/// Adapter turning a synchronous closure into a [`HookHandler`].
pub struct HookFn<F>(pub F);

#[async_trait]
impl<C, F> HookHandler<C> for HookFn<F>
where
    C: ?Sized + Send,
    F: Fn(&mut C, &mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync,
{
    async fn call(&self, cx: &mut C, args: &mut HookArgs<'_>) -> anyhow::Result<()> {
        (self.0)(cx, args)
    }
}

/// Box a closure as a shareable hook handler.
pub fn hook_fn<C, F>(f: F) -> Arc<dyn HookHandler<C>>
where
    C: ?Sized + Send + 'static,
    F: Fn(&mut C, &mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(HookFn(f))
}

/// Hook name → ordered callbacks.
pub struct HookRegistry<C: ?Sized> {
    hooks: HashMap<String, Vec<Arc<dyn HookHandler<C>>>>,
}

impl<C: ?Sized> Default for HookRegistry<C> {
    fn default() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }
}

impl<C: ?Sized + Send> HookRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback; the hook is created on first registration.
    pub fn register(&mut self, name: &str, handler: Arc<dyn HookHandler<C>>) {
        let list = self.hooks.entry(name.to_string()).or_default();
        list.push(handler);
        trace!(hook = name, count = list.len(), "hook callback registered");
    }

    /// Snapshot of the callbacks currently registered under `name`.
    ///
    /// Callbacks registered after the snapshot is taken are not part of it.
    pub fn handlers(&self, name: &str) -> Vec<Arc<dyn HookHandler<C>>> {
        self.hooks.get(name).cloned().unwrap_or_default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.hooks.get(name).map_or(0, Vec::len)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    /// Invoke every callback of `name` with a context that does not own
    /// this registry.
    pub async fn invoke(
        &self,
        name: &str,
        cx: &mut C,
        args: &mut HookArgs<'_>,
    ) -> Result<(), ApplicationError> {
        run_sequential(name, self.handlers(name), cx, args).await
    }
}

/// Await each handler in order; stop at the first error.
pub async fn run_sequential<C: ?Sized + Send>(
    name: &str,
    handlers: Vec<Arc<dyn HookHandler<C>>>,
    cx: &mut C,
    args: &mut HookArgs<'_>,
) -> Result<(), ApplicationError> {
    debug!(hook = name, callbacks = handlers.len(), "invoking hook");
    for (index, handler) in handlers.iter().enumerate() {
        handler
            .call(cx, args)
            .await
            .map_err(|source| ApplicationError::HookFailed {
                hook: name.to_string(),
                index,
                source: source.into(),
            })?;
    }
    Ok(())
}
