// Author: Dustin Pilgrim
// License: MIT

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::Value;
use crate::tree::ConfigNode;
use crate::ConfigError;

/// One place a leaf key appears in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// Full path of the key, `Sampler/parameter1/min`.
    pub path: String,
    pub value: Value,
}

/// Index from every leaf key name to each place it is defined.
///
/// Built once after evaluation; answers the unique-name shortcut without
/// walking the tree again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    entries: IndexMap<String, Vec<Occurrence>>,
}

impl NameIndex {
    /// Walk the finished tree once, root first, keys before child sections.
    pub fn build(root: &ConfigNode) -> Self {
        let mut index = NameIndex::default();
        index.collect(root);
        debug!(names = index.entries.len(), "Built name index");
        index
    }

    fn collect(&mut self, node: &ConfigNode) {
        for (key, value) in node.values() {
            self.entries.entry(key.clone()).or_default().push(Occurrence {
                path: node.key_path(key),
                value: value.clone(),
            });
        }
        for child in node.children().values() {
            self.collect(child);
        }
    }

    /// Every occurrence of `name`, empty if there is none.
    pub fn occurrences(&self, name: &str) -> &[Occurrence] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The value of `name` if exactly one leaf anywhere carries that name.
    pub fn lookup_unique(&self, name: &str) -> Result<&Value, ConfigError> {
        match self.occurrences(name) {
            [] => Err(ConfigError::NotFound { name: name.to_string() }),
            [only] => Ok(&only.value),
            many => Err(ConfigError::AmbiguousName {
                name: name.to_string(),
                paths: many.iter().map(|o| o.path.clone()).collect(),
            }),
        }
    }

    pub fn is_unique(&self, name: &str) -> bool {
        self.occurrences(name).len() == 1
    }

    /// Number of distinct key names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SectionConfig;

    fn index_of(input: &str) -> NameIndex {
        let config = SectionConfig::from_str(input).expect("Failed to load config");
        NameIndex::build(config.root())
    }

    #[test]
    fn test_unique_and_ambiguous() {
        let index = index_of("[detectors]\nwidth = 2\n[/det1]\nheight = 1.5\n[/det2]\nheight = 2\n");

        assert_eq!(index.lookup_unique("width"), Ok(&Value::Integer(2)));
        assert!(index.is_unique("width"));

        match index.lookup_unique("height") {
            Err(ConfigError::AmbiguousName { name, paths }) => {
                assert_eq!(name, "height");
                assert_eq!(paths, vec!["detectors/det1/height", "detectors/det2/height"]);
            }
            other => panic!("expected AmbiguousName, got {:?}", other),
        }

        assert!(matches!(
            index.lookup_unique("depth"),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_occurrences_in_tree_order() {
        let index = index_of("x = 0\n[a]\nx = 1\n[/b]\nx = 2\n[c]\nx = 3\n");
        let paths: Vec<&str> = index.occurrences("x").iter().map(|o| o.path.as_str()).collect();
        assert_eq!(paths, vec!["x", "a/x", "a/b/x", "c/x"]);
        assert!(index.occurrences("y").is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_section_names_are_not_indexed() {
        let index = index_of("[Sampler]\n[/parameter1]\nmin = 0\n");
        assert!(matches!(
            index.lookup_unique("parameter1"),
            Err(ConfigError::NotFound { .. })
        ));
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["min"]);
    }
}
