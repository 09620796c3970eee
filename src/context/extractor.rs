//! Extraction of attributes from a [`Context`].

use super::values::Context;
use crate::value::Attr;

/// Extracts attributes from a [`Context`].
///
/// Implemented for every `Fn(&Context) -> Vec<Attr>` closure, so most extractors are
/// written inline.
///
/// # Examples
///
/// ```
/// use ctxlog::context::{Context, Extractor};
/// use ctxlog::value::Attr;
///
/// struct TenantId(&'static str);
///
/// let tenant = |ctx: &Context| match ctx.value::<TenantId>() {
///     Some(id) => vec![Attr::string("tenant", id.0)],
///     None => Vec::new(),
/// };
///
/// let ctx = Context::background().with_value(TenantId("acme"));
/// assert_eq!(tenant.extract(&ctx), vec![Attr::string("tenant", "acme")]);
/// assert!(tenant.extract(&Context::background()).is_empty());
/// ```
pub trait Extractor: Send + Sync {
    fn extract(&self, ctx: &Context) -> Vec<Attr>;
}

impl<F> Extractor for F
where
    F: Fn(&Context) -> Vec<Attr> + Send + Sync,
{
    fn extract(&self, ctx: &Context) -> Vec<Attr> {
        self(ctx)
    }
}

/// Extracts the attributes added with [`Context::with_attrs`].
pub fn attrs_extractor() -> impl Extractor {
    |ctx: &Context| ctx.attrs().to_vec()
}

/// Extracts the attributes added with [`Context::with_root_attrs`].
pub fn root_attrs_extractor() -> impl Extractor {
    |ctx: &Context| ctx.root_attrs().to_vec()
}
