//! Request context - an immutable chain of typed values
//!
//! A [`Context`] is created at a request boundary and derived with
//! [`Context::with_value`] as it travels down the call chain. Values are
//! looked up by type, nearest first. The cache of this crate rides on the
//! chain under a private type, so no caller value can shadow it.
//!
//! Besides explicit passing, a context can be installed as the current one
//! for the duration of a future with [`Context::scope`] and read back with
//! [`Context::current`].

use crate::cache::store::Cache;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT: Context;
}

/// Cheap, cloneable handle onto a chain of request-scoped values
#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<Node>>,
}

struct Node {
    parent: Context,
    value: Box<dyn Any + Send + Sync>,
}

/// Chain entry carrying the bound cache
pub(crate) struct BoundCache(pub(crate) Arc<Cache>);

impl Context {
    /// The empty root context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child context carrying `value`
    pub fn with_value<V: Send + Sync + 'static>(&self, value: V) -> Self {
        Self {
            node: Some(Arc::new(Node {
                parent: self.clone(),
                value: Box::new(value),
            })),
        }
    }

    /// Nearest value of type `V` on the chain
    pub fn value<V: 'static>(&self) -> Option<&V> {
        let mut cursor = self.node.as_deref();
        while let Some(node) = cursor {
            if let Some(value) = node.value.downcast_ref::<V>() {
                return Some(value);
            }
            cursor = node.parent.node.as_deref();
        }
        None
    }

    /// Whether both handles point at the same chain node
    pub fn same_scope(&self, other: &Context) -> bool {
        match (&self.node, &other.node) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of values on the chain
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.node.as_deref();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.parent.node.as_deref();
        }
        depth
    }

    /// Run `fut` with this context installed as the task-local current context
    pub fn scope<F: Future>(self, fut: F) -> impl Future<Output = F::Output> {
        CURRENT.scope(self, fut)
    }

    /// Run `f` with this context installed as the current context
    pub fn scope_sync<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    /// The context installed by the innermost enclosing scope, if any
    pub fn current() -> Option<Context> {
        CURRENT.try_with(Context::clone).ok()
    }

    /// The current context, or the background context outside any scope
    pub fn current_or_background() -> Context {
        Self::current().unwrap_or_default()
    }

    pub(crate) fn cache(&self) -> Option<Arc<Cache>> {
        self.value::<BoundCache>().map(|bound| Arc::clone(&bound.0))
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field("cache", &self.cache().map(|cache| cache.id()))
            .finish()
    }
}
