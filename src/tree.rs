use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ast::Value;
use crate::parser::{Header, RawEntry, RawSection};
use crate::utils::join_path;
use crate::ConfigError;

/// Unevaluated value text plus the line it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawValue {
    pub text: String,
    pub line: usize,
}

/// One section of the config, the implicit root included.
///
/// A node owns its children outright; there are no parent links once the
/// tree is built, so traversal only goes root-downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<V> {
    name: String,
    depth: usize,
    path: String,
    separator: char,
    values: IndexMap<String, V>,
    children: IndexMap<String, Node<V>>,
}

pub type RawNode = Node<RawValue>;
pub type ConfigNode = Node<Value>;

/// Result of a name or path lookup: either a leaf value or a whole section.
#[derive(Debug, PartialEq)]
pub enum Entry<'a, V = Value> {
    Value(&'a V),
    Section(&'a Node<V>),
}

impl<V> Clone for Entry<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Entry<'_, V> {}

impl<'a, V> Entry<'a, V> {
    pub fn as_value(&self) -> Option<&'a V> {
        match *self {
            Entry::Value(v) => Some(v),
            Entry::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&'a Node<V>> {
        match *self {
            Entry::Section(n) => Some(n),
            Entry::Value(_) => None,
        }
    }

    /// Continue a lookup from this entry. Only sections have anything below them.
    pub fn lookup(&self, path: &str) -> Result<Entry<'a, V>, ConfigError> {
        match *self {
            Entry::Section(n) => n.lookup(path),
            Entry::Value(_) => Err(ConfigError::PathNotFound { path: path.to_string() }),
        }
    }
}

impl<V> Node<V> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nesting level, root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Path from the root, sections joined by the separator. Empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn values(&self) -> &IndexMap<String, V> {
        &self.values
    }

    pub fn children(&self) -> &IndexMap<String, Node<V>> {
        &self.children
    }

    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    pub fn sections(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    pub fn value(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    pub fn section(&self, name: &str) -> Option<&Node<V>> {
        self.children.get(name)
    }

    /// Single-segment access. A local key wins over a child section of the same name.
    pub fn get(&self, name: &str) -> Option<Entry<'_, V>> {
        self.value(name)
            .map(Entry::Value)
            .or_else(|| self.section(name).map(Entry::Section))
    }

    /// Walk `path` relative to this node, one separator-delimited segment at a time.
    pub fn lookup(&self, path: &str) -> Result<Entry<'_, V>, ConfigError> {
        let trimmed = path.trim().trim_end_matches(self.separator);
        if trimmed.is_empty() {
            return Ok(Entry::Section(self));
        }
        let segments: Vec<&str> = trimmed.split(self.separator).map(str::trim).collect();
        self.lookup_segments(&segments)
            .ok_or_else(|| ConfigError::PathNotFound { path: path.to_string() })
    }

    pub(crate) fn lookup_segments(&self, segments: &[&str]) -> Option<Entry<'_, V>> {
        let (last, parents) = segments.split_last()?;
        let mut node = self;
        for seg in parents {
            node = node.section(seg)?;
        }
        node.get(last)
    }

    /// Full path of a local key: `Sampler/parameter1/min`.
    pub fn key_path(&self, key: &str) -> String {
        join_path(self.separator, &[self.path.as_str(), key])
    }

    /// Rebuild the tree with every value passed through `f(node, key, value)`.
    /// The first error aborts and is returned as-is.
    pub(crate) fn try_map<W, E, F>(self, f: &mut F) -> Result<Node<W>, E>
    where
        F: FnMut(&Node<()>, &str, V) -> Result<W, E>,
    {
        let shape = Node {
            name: self.name,
            depth: self.depth,
            path: self.path,
            separator: self.separator,
            values: IndexMap::new(),
            children: IndexMap::new(),
        };

        let mut values = IndexMap::with_capacity(self.values.len());
        for (key, value) in self.values {
            let mapped = f(&shape, &key, value)?;
            values.insert(key, mapped);
        }

        let mut children = IndexMap::with_capacity(self.children.len());
        for (name, child) in self.children {
            children.insert(name, child.try_map(f)?);
        }

        Ok(Node {
            name: shape.name,
            depth: shape.depth,
            path: shape.path,
            separator: shape.separator,
            values,
            children,
        })
    }
}

/// Construction-time slot. `parent` is only used for depth and path bookkeeping
/// and disappears when the tree is assembled. `source` and `key_sources` record
/// which input created the section and each key.
#[derive(Debug, Default)]
struct Slot {
    name: String,
    depth: usize,
    path: String,
    parent: Option<usize>,
    source: usize,
    values: IndexMap<String, RawValue>,
    key_sources: HashMap<String, usize>,
    children: IndexMap<String, usize>,
}

/// Builds the section tree from raw records using a stack of open sections.
/// `open[i]` is the arena index of the open section at depth `i`; `open[0]` is the root.
///
/// Records may come from several inputs. Within one input a repeated section or
/// key is an error; a later input reopens sections from earlier ones and its
/// keys replace theirs.
pub struct TreeBuilder {
    arena: Vec<Slot>,
    open: Vec<usize>,
    separator: char,
    source: usize,
}

impl TreeBuilder {
    pub fn new(root_name: &str, separator: char) -> Self {
        let root = Slot {
            name: root_name.to_string(),
            ..Slot::default()
        };
        Self {
            arena: vec![root],
            open: vec![0],
            separator,
            source: 0,
        }
    }

    /// Start the next input. Only the root is open again.
    pub fn next_source(&mut self) {
        self.source += 1;
        self.open.truncate(1);
    }

    /// Open a section. A header with `n` markers closes everything at depth > n
    /// and attaches under the open section at depth `n`.
    pub fn open_section(&mut self, header: &Header) -> Result<(), ConfigError> {
        if header.depth >= self.open.len() {
            return Err(ConfigError::MalformedHeader {
                header: format!(
                    "[{}{}]",
                    self.separator.to_string().repeat(header.depth),
                    header.name
                ),
                message: format!(
                    "nesting depth {} needs an open section at depth {}, deepest open is {}",
                    header.depth + 1,
                    header.depth,
                    self.open.len() - 1
                ),
                line: header.line,
            });
        }

        self.open.truncate(header.depth + 1);
        let parent = self.open[header.depth];

        let p = &self.arena[parent];
        let depth = p.depth + 1;
        let path = join_path(self.separator, &[p.path.as_str(), header.name.as_str()]);

        if let Some(existing) = p.children.get(&header.name).copied() {
            let slot = &mut self.arena[existing];
            if slot.source == self.source {
                return Err(ConfigError::DuplicateSection { path, line: header.line });
            }
            trace!(%path, source = self.source, "Reopening section");
            slot.source = self.source;
            self.open.push(existing);
            return Ok(());
        }

        trace!(%path, depth, "Opening section");

        let idx = self.arena.len();
        self.arena.push(Slot {
            name: header.name.clone(),
            depth,
            path,
            parent: Some(parent),
            source: self.source,
            ..Slot::default()
        });
        self.arena[parent].children.insert(header.name.clone(), idx);
        self.open.push(idx);
        Ok(())
    }

    /// Store a raw pair on the deepest open section.
    pub fn insert(&mut self, entry: &RawEntry) -> Result<(), ConfigError> {
        let current = self.open.last().copied().unwrap_or(0);
        let source = self.source;
        let slot = &mut self.arena[current];

        if slot.key_sources.get(&entry.key) == Some(&source) {
            return Err(ConfigError::DuplicateKey {
                section: if slot.path.is_empty() { slot.name.clone() } else { slot.path.clone() },
                key: entry.key.clone(),
                line: entry.line,
            });
        }

        slot.key_sources.insert(entry.key.clone(), source);
        // an override from a later input keeps the key's original position
        slot.values.insert(
            entry.key.clone(),
            RawValue {
                text: entry.raw.clone(),
                line: entry.line,
            },
        );
        Ok(())
    }

    /// Fold the arena into an owned tree, dropping parent links.
    pub fn finish(mut self) -> RawNode {
        debug_assert!(self
            .arena
            .iter()
            .skip(1)
            .all(|s| s.parent.is_some_and(|p| self.arena[p].depth + 1 == s.depth)));
        let separator = self.separator;
        assemble(&mut self.arena, 0, separator)
    }
}

fn assemble(arena: &mut [Slot], idx: usize, separator: char) -> RawNode {
    let slot = std::mem::take(&mut arena[idx]);
    let children = slot
        .children
        .into_iter()
        .map(|(name, child)| (name, assemble(arena, child, separator)))
        .collect();
    Node {
        name: slot.name,
        depth: slot.depth,
        path: slot.path,
        separator,
        values: slot.values,
        children,
    }
}

/// Build the raw section tree from a record stream. No value is evaluated here.
pub fn build_tree(records: &[RawSection], root_name: &str, separator: char) -> Result<RawNode, ConfigError> {
    build_tree_from_sources(std::iter::once(records), root_name, separator)
}

/// Build one tree from the record streams of several inputs, in order.
pub fn build_tree_from_sources<'a, I>(sources: I, root_name: &str, separator: char) -> Result<RawNode, ConfigError>
where
    I: IntoIterator<Item = &'a [RawSection]>,
{
    let mut builder = TreeBuilder::new(root_name, separator);
    let mut headers = 0;

    for (i, records) in sources.into_iter().enumerate() {
        if i > 0 {
            builder.next_source();
        }
        for section in records {
            if let Some(header) = &section.header {
                builder.open_section(header)?;
                headers += 1;
            }
            for entry in &section.entries {
                builder.insert(entry)?;
            }
        }
    }

    let root = builder.finish();
    debug!(headers, "Built section tree");
    Ok(root)
}

#[cfg(test)]
mod tests;
