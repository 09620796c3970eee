//! Attribute group resolution.
//!
//! Handlers keep their persistent attributes in an [`AttrGroupTree`]: every
//! `with_attrs`/`with_group` call produces a new tree that shares its ancestors with the
//! old one. When a record is emitted the handler turns the tree into an
//! [`AttrGroupHistory`] and asks it for the deduplicated attributes.
//!
//! # Architecture
//!
//! - **AttrGroup**: an immutable named bucket of attributes and its qualified path
//! - **AttrGroupTree**: the persistent chain of groups, newest group current
//! - **AttrGroupHistory**: a root-first copy of the chain plus the duplicate-key counters
//!   of a single flattening pass
//!
//! # Usage Example
//!
//! ```
//! use ctxlog::attrs::AttrGroupTree;
//! use ctxlog::value::Attr;
//!
//! let tree = AttrGroupTree::new()
//!     .with_attrs([Attr::string("service", "api")])
//!     .with_group("request")
//!     .with_attrs([Attr::int("status", 200), Attr::int("status", 503)]);
//!
//! let attrs = tree.history().deduplicated_attrs();
//! assert_eq!(
//!     attrs,
//!     vec![
//!         Attr::string("service", "api"),
//!         Attr::group("request", [Attr::int("status", 200), Attr::int("status#01", 503)]),
//!     ]
//! );
//! ```

pub mod group;
pub mod history;
pub mod tree;

pub use group::AttrGroup;
pub use history::AttrGroupHistory;
pub use tree::AttrGroupTree;
