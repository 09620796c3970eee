//! Request-scoped values.
//!
//! [`Context`] is an immutable, cheaply clonable map keyed by type. Deriving a context
//! with [`Context::with_value`] leaves the parent untouched, so a context can be handed to
//! other threads or tasks while children are derived from it.
//!
//! # Examples
//!
//! ```
//! use ctxlog::context::Context;
//! use ctxlog::value::Attr;
//!
//! let ctx = Context::background()
//!     .with_root_attrs([Attr::string("request_id", "r-42")])
//!     .with_attrs([Attr::string("handler", "checkout")]);
//!
//! assert_eq!(ctx.root_attrs(), &[Attr::string("request_id", "r-42")]);
//! assert_eq!(ctx.attrs(), &[Attr::string("handler", "checkout")]);
//! assert!(Context::background().attrs().is_empty());
//! ```

use crate::value::Attr;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Attributes appended to the current group of every record logged with the context.
#[derive(Debug, Clone, Default)]
struct AppendAttrs(Vec<Attr>);

/// Attributes prepended to the root of every record logged with the context.
#[derive(Debug, Clone, Default)]
struct RootAttrs(Vec<Attr>);

#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Context {
    /// The empty context.
    pub fn background() -> Self {
        Self::default()
    }

    /// A child context that also carries `value`, replacing any value of the same type.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut values = (*self.values).clone();
        values.insert(TypeId::of::<T>(), Arc::new(value));

        Self {
            values: Arc::new(values),
        }
    }

    /// The value of type `T` stored in this context or any parent, if there is one.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).downcast_ref::<T>())
    }

    /// A child context whose records get `attrs` appended to their current group.
    ///
    /// Repeated calls accumulate: the child carries the parent's attributes followed by
    /// the new ones.
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut combined = self.attrs().to_vec();
        combined.extend(attrs);
        self.with_value(AppendAttrs(combined))
    }

    /// A child context whose records get `attrs` placed at the front of the root, no
    /// matter how many groups the logger has entered.
    ///
    /// Repeated calls accumulate like [`Context::with_attrs`].
    pub fn with_root_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut combined = self.root_attrs().to_vec();
        combined.extend(attrs);
        self.with_value(RootAttrs(combined))
    }

    /// Attributes added with [`Context::with_attrs`].
    pub fn attrs(&self) -> &[Attr] {
        self.value::<AppendAttrs>().map(|a| a.0.as_slice()).unwrap_or(&[])
    }

    /// Attributes added with [`Context::with_root_attrs`].
    pub fn root_attrs(&self) -> &[Attr] {
        self.value::<RootAttrs>().map(|a| a.0.as_slice()).unwrap_or(&[])
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values.len())
            .field("attrs", &self.attrs())
            .field("root_attrs", &self.root_attrs())
            .finish()
    }
}
