//! Persistent tree of attribute groups.

use super::group::AttrGroup;
use super::history::AttrGroupHistory;
use crate::value::Attr;
use std::sync::Arc;

/// An immutable chain of [`AttrGroup`]s. The newest group is current; every other group
/// is reachable through the shared ancestor pointer.
///
/// Deriving a tree never changes the receiver, so one tree can back any number of
/// handlers on any number of threads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrGroupTree {
    current: AttrGroup,
    ancestor: Option<Arc<AttrGroupTree>>,
}

impl AttrGroupTree {
    /// An empty tree containing only the root group.
    pub fn new() -> Self {
        Self {
            current: AttrGroup::root(),
            ancestor: None,
        }
    }

    /// Returns a tree with `attrs` appended to the current group. An empty list returns
    /// an equal tree.
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut attrs = attrs.into_iter().peekable();
        if attrs.peek().is_none() {
            return self.clone();
        }

        let mut current = self.current.clone();
        current.attrs.extend(attrs);

        Self {
            current,
            ancestor: self.ancestor.clone(),
        }
    }

    /// Returns a tree whose current group is a new, empty group called `name`, with the
    /// receiver as its ancestor. An empty name returns an equal tree.
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }

        Self {
            current: AttrGroup::nested(&self.current, name),
            ancestor: Some(Arc::new(self.clone())),
        }
    }

    /// Materializes the chain root-first into a fresh [`AttrGroupHistory`].
    pub fn history(&self) -> AttrGroupHistory {
        let mut groups = Vec::with_capacity(self.depth());

        let mut node = Some(self);
        while let Some(tree) = node {
            groups.push(tree.current.clone());
            node = tree.ancestor.as_deref();
        }
        groups.reverse();

        AttrGroupHistory::new(groups)
    }

    /// The innermost group, which receives attributes added next.
    pub fn current(&self) -> &AttrGroup {
        &self.current
    }

    /// The tree this one was derived from; `None` at the root.
    pub fn ancestor(&self) -> Option<&AttrGroupTree> {
        self.ancestor.as_deref()
    }

    /// Number of groups in the chain, including the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = Some(self);
        while let Some(tree) = node {
            depth += 1;
            node = tree.ancestor.as_deref();
        }
        depth
    }
}
