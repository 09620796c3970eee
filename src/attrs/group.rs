//! A single named bucket of attributes.

use crate::value::Attr;

/// Separator used when joining group names into a qualified path.
///
/// A literal key such as `"a.b"` must not collide with key `b` nested inside group `a`,
/// so a plain `.` is not used.
pub(crate) const PATH_DELIMITER: &str = "[.]";

/// Replacement for any [`PATH_DELIMITER`] found inside a key.
const DELIMITER_ESCAPE: &str = "___";

/// An immutable collection of attributes that are all qualified by the group name.
///
/// The path tracks the nesting of groups from the root; the root group has an empty
/// name and an empty path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrGroup {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) attrs: Vec<Attr>,
}

impl AttrGroup {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// A new, empty group nested under `parent`.
    pub(crate) fn nested(parent: &AttrGroup, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: qualify(&parent.path, name),
            attrs: Vec::new(),
        }
    }

    /// The group name as given to `with_group`; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualified path from the root, with names joined by [`PATH_DELIMITER`].
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Attributes added directly to this group, in insertion order.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }
}

/// Joins `key` onto `path`. The root path is empty, so keys at the root qualify to
/// themselves.
pub(crate) fn qualify(path: &str, key: &str) -> String {
    let key = key.replace(PATH_DELIMITER, DELIMITER_ESCAPE);

    if path.is_empty() {
        key
    } else {
        format!("{}{}{}", path, PATH_DELIMITER, key)
    }
}
