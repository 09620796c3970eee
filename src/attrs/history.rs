//! Root-to-leaf view of an [`AttrGroupTree`](super::AttrGroupTree) and the resolution pass
//! that flattens it.

use super::group::{qualify, AttrGroup};
use crate::value::{Attr, Value};
use std::collections::HashMap;

/// Groups in historical order, from the root through to the most recent descendant,
/// plus the duplicate-key tracking used while flattening them.
#[derive(Debug, Clone, Default)]
pub struct AttrGroupHistory {
    groups: Vec<AttrGroup>,
    duplicate_keys: DuplicateKeys,
}

impl AttrGroupHistory {
    pub(crate) fn new(groups: Vec<AttrGroup>) -> Self {
        Self {
            groups,
            duplicate_keys: DuplicateKeys::default(),
        }
    }

    /// The groups from the root down to the innermost one.
    pub fn groups(&self) -> &[AttrGroup] {
        &self.groups
    }

    /// Inserts `attrs` ahead of everything else in the root group.
    pub fn push_front(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        let Some(root) = self.groups.first_mut() else {
            return;
        };

        root.attrs.splice(0..0, attrs);
    }

    /// Returns the flattened attributes, nested within their groups.
    ///
    /// Where several attributes at the same group level share a key, the first keeps
    /// its key and each later one is suffixed with `#01`, `#02`, ... in order. Groups
    /// are deduplicated the same way, against plain attributes too. Empty groups and
    /// zero attributes are dropped; unnamed groups are inlined.
    pub fn deduplicated_attrs(&mut self) -> Vec<Attr> {
        self.duplicate_keys.clear();
        resolve(&self.groups, "", &mut self.duplicate_keys)
    }
}

/// Occurrence counters keyed by qualified path, shared by one resolution pass.
#[derive(Debug, Clone, Default)]
struct DuplicateKeys {
    counts: HashMap<String, usize>,
}

impl DuplicateKeys {
    fn clear(&mut self) {
        self.counts.clear();
    }

    /// Records one more occurrence of `path`; the first occurrence counts as zero.
    fn track(&mut self, path: &str) {
        self.counts
            .entry(path.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(0);
    }

    /// `key` for the first occurrence of `path`, `key#NN` for later ones.
    fn deduplicated(&self, key: &str, path: &str) -> String {
        match self.counts.get(path).copied().unwrap_or(0) {
            0 => key.to_string(),
            occurrence => format!("{}#{:02}", key, occurrence),
        }
    }
}

fn resolve(groups: &[AttrGroup], parent_path: &str, keys: &mut DuplicateKeys) -> Vec<Attr> {
    let Some((group, descendants)) = groups.split_first() else {
        return Vec::new();
    };

    let mut resolved = resolve_attrs(&group.path, &group.attrs, keys);

    if !descendants.is_empty() {
        resolved.extend(resolve(descendants, &group.path, keys));
    }

    if group.is_root() {
        return resolved;
    }

    let path_with_key = qualify(parent_path, &group.name);
    keys.track(&path_with_key);

    if resolved.is_empty() {
        return Vec::new();
    }

    vec![Attr::new(
        keys.deduplicated(&group.name, &path_with_key),
        Value::Group(resolved),
    )]
}

fn resolve_attrs(path: &str, attrs: &[Attr], keys: &mut DuplicateKeys) -> Vec<Attr> {
    let mut resolved = Vec::with_capacity(attrs.len());

    for attr in attrs {
        if attr.is_empty() {
            continue;
        }

        match attr.value.clone().resolve() {
            Value::Group(children) if attr.key.is_empty() => {
                resolved.extend(resolve_attrs(path, &children, keys));
            }
            Value::Group(children) => {
                let path_with_key = qualify(path, &attr.key);
                keys.track(&path_with_key);

                if children.is_empty() {
                    continue;
                }

                // Nested counters follow the suffixed path so `g` and `g#01` stay independent.
                let key = keys.deduplicated(&attr.key, &path_with_key);
                let group_path = keys.deduplicated(&path_with_key, &path_with_key);

                let grouped = resolve_attrs(&group_path, &children, keys);
                if grouped.is_empty() {
                    continue;
                }

                resolved.push(Attr::new(key, Value::Group(grouped)));
            }
            value => {
                let path_with_key = qualify(path, &attr.key);
                keys.track(&path_with_key);

                resolved.push(Attr::new(keys.deduplicated(&attr.key, &path_with_key), value));
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::AttrGroupTree;

    fn root_history(attrs: Vec<Attr>) -> AttrGroupHistory {
        AttrGroupTree::new().with_attrs(attrs).history()
    }

    #[test]
    fn test_flat_duplicates_are_suffixed() {
        let mut history = root_history(vec![
            Attr::string("a", "v1"),
            Attr::string("a", "v2"),
            Attr::int("a", 3),
        ]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![
                Attr::string("a", "v1"),
                Attr::string("a#01", "v2"),
                Attr::int("a#02", 3),
            ]
        );
    }

    #[test]
    fn test_duplicate_groups_keep_independent_nested_counters() {
        let mut history = root_history(vec![
            Attr::group("g", [Attr::string("a", "aVal"), Attr::string("a", "aValDup")]),
            Attr::group("g", [Attr::string("a", "aGVal"), Attr::string("a", "aGValDup")]),
        ]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![
                Attr::group("g", [Attr::string("a", "aVal"), Attr::string("a#01", "aValDup")]),
                Attr::group("g#01", [Attr::string("a", "aGVal"), Attr::string("a#01", "aGValDup")]),
            ]
        );
    }

    #[test]
    fn test_attr_and_group_sharing_a_key_are_suffixed() {
        let mut history = root_history(vec![
            Attr::string("a", "1"),
            Attr::group("a", [Attr::string("x", "y")]),
        ]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![
                Attr::string("a", "1"),
                Attr::group("a#01", [Attr::string("x", "y")]),
            ]
        );
    }

    #[test]
    fn test_many_mixed_duplicates_share_one_counter() {
        let batch = || {
            vec![
                Attr::string("a", "v"),
                Attr::int("a", 123),
                Attr::string("a", "v2"),
                Attr::group("a", [Attr::string("a", "v")]),
            ]
        };
        let tree = AttrGroupTree::new().with_attrs(batch()).with_attrs(batch());

        assert_eq!(
            tree.history().deduplicated_attrs(),
            vec![
                Attr::string("a", "v"),
                Attr::int("a#01", 123),
                Attr::string("a#02", "v2"),
                Attr::group("a#03", [Attr::string("a", "v")]),
                Attr::string("a#04", "v"),
                Attr::int("a#05", 123),
                Attr::string("a#06", "v2"),
                Attr::group("a#07", [Attr::string("a", "v")]),
            ]
        );
    }

    #[test]
    fn test_suffix_widens_past_two_digits() {
        let attrs: Vec<Attr> = (0..101).map(|i| Attr::int("k", i)).collect();
        let resolved = root_history(attrs).deduplicated_attrs();

        assert_eq!(resolved[1].key, "k#01");
        assert_eq!(resolved[99].key, "k#99");
        assert_eq!(resolved[100].key, "k#100");
    }

    #[test]
    fn test_zero_attrs_are_skipped() {
        let mut history = root_history(vec![Attr::default(), Attr::int("a", 1), Attr::default()]);
        assert_eq!(history.deduplicated_attrs(), vec![Attr::int("a", 1)]);
    }

    #[test]
    fn test_unnamed_group_is_inlined() {
        let mut history = root_history(vec![
            Attr::string("before", "b"),
            Attr::group("", [Attr::int("x", 1)]),
            Attr::string("after", "a"),
        ]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![
                Attr::string("before", "b"),
                Attr::int("x", 1),
                Attr::string("after", "a"),
            ]
        );
    }

    #[test]
    fn test_inlined_attrs_collide_with_siblings() {
        let mut history = root_history(vec![
            Attr::int("x", 1),
            Attr::group("", [Attr::int("x", 2)]),
        ]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![Attr::int("x", 1), Attr::int("x#01", 2)]
        );
    }

    #[test]
    fn test_empty_nested_groups_are_dropped() {
        let mut history = root_history(vec![
            Attr::group("outer", [Attr::group("inner", Vec::<Attr>::new())]),
            Attr::int("kept", 1),
        ]);

        assert_eq!(history.deduplicated_attrs(), vec![Attr::int("kept", 1)]);
    }

    #[test]
    fn test_lazy_values_are_resolved() {
        let mut history = root_history(vec![
            Attr::new("n", Value::lazy(|| Value::Int(5))),
            Attr::new("g", Value::lazy(|| Value::group([Attr::string("s", "t")]))),
        ]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![Attr::int("n", 5), Attr::group("g", [Attr::string("s", "t")])]
        );
    }

    #[test]
    fn test_entered_group_with_no_attrs_is_dropped() {
        let mut history = AttrGroupTree::new()
            .with_attrs([Attr::int("a", 1)])
            .with_group("g")
            .history();

        assert_eq!(history.deduplicated_attrs(), vec![Attr::int("a", 1)]);
    }

    #[test]
    fn test_history_groups_are_root_first() {
        let history = AttrGroupTree::new()
            .with_group("g1")
            .with_group("g2")
            .history();

        let names: Vec<&str> = history.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["", "g1", "g2"]);
        assert_eq!(history.groups()[2].path(), "g1[.]g2");
    }

    #[test]
    fn test_push_front_with_no_attrs_does_nothing() {
        let mut history = root_history(vec![Attr::string("aK", "aV")]);
        history.push_front(Vec::<Attr>::new());

        assert_eq!(history.deduplicated_attrs(), vec![Attr::string("aK", "aV")]);
    }

    #[test]
    fn test_push_front_on_empty_history_does_nothing() {
        let mut history = AttrGroupHistory::default();
        history.push_front([Attr::string("p", "v")]);

        assert!(history.groups().is_empty());
        assert!(history.deduplicated_attrs().is_empty());
    }

    #[test]
    fn test_push_front_on_new_tree_adds_attrs() {
        let mut history = AttrGroupTree::new().history();
        history.push_front([Attr::string("ak", "aV"), Attr::int("bK", 123)]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![Attr::string("ak", "aV"), Attr::int("bK", 123)]
        );
    }

    #[test]
    fn test_push_front_precedes_existing_root_attrs() {
        let mut history = root_history(vec![Attr::string("e", "w")]);
        history.push_front([Attr::string("p", "v")]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![Attr::string("p", "v"), Attr::string("e", "w")]
        );
    }

    #[test]
    fn test_push_front_lands_on_root_with_nested_groups() {
        let mut history = AttrGroupTree::new()
            .with_attrs([Attr::string("rK", "rV")])
            .with_group("g1")
            .with_attrs([Attr::int("g1K", 123)])
            .history();
        history.push_front([Attr::string("ak", "aV"), Attr::int("bK", 123)]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![
                Attr::string("ak", "aV"),
                Attr::int("bK", 123),
                Attr::string("rK", "rV"),
                Attr::group("g1", [Attr::int("g1K", 123)]),
            ]
        );
    }

    #[test]
    fn test_push_front_does_not_leak_into_tree() {
        let tree = AttrGroupTree::new();
        tree.history().push_front([Attr::string("k", "v")]);

        let mut history = tree.with_attrs([Attr::string("k2", "v2")]).history();
        history.push_front([Attr::string("k3", "v3")]);

        assert_eq!(
            history.deduplicated_attrs(),
            vec![Attr::string("k3", "v3"), Attr::string("k2", "v2")]
        );
    }

    #[test]
    fn test_deduplicated_attrs_is_repeatable() {
        let mut history = root_history(vec![Attr::int("a", 1), Attr::int("a", 2)]);

        let first = history.deduplicated_attrs();
        let second = history.deduplicated_attrs();

        assert_eq!(first, second);
        assert_eq!(second, vec![Attr::int("a", 1), Attr::int("a#01", 2)]);
    }

    #[test]
    fn test_keys_in_different_groups_do_not_collide() {
        let mut history = AttrGroupTree::new()
            .with_attrs([Attr::int("id", 1)])
            .with_group("req")
            .with_attrs([Attr::int("id", 2)])
            .with_group("db")
            .with_attrs([Attr::int("id", 3)])
            .history();

        assert_eq!(
            history.deduplicated_attrs(),
            vec![
                Attr::int("id", 1),
                Attr::group("req", [Attr::int("id", 2), Attr::group("db", [Attr::int("id", 3)])]),
            ]
        );
    }

    #[test]
    fn test_dotted_key_does_not_collide_with_nested_key() {
        let mut history = AttrGroupTree::new()
            .with_attrs([Attr::int("a.b", 1), Attr::group("a", [Attr::int("b", 2)])])
            .history();

        assert_eq!(
            history.deduplicated_attrs(),
            vec![Attr::int("a.b", 1), Attr::group("a", [Attr::int("b", 2)])]
        );
    }
}
