// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::ast::Value;
use crate::namespace::{build_namespace, Namespace};
use crate::parser::read_records;
use crate::resolver::NameIndex;
use crate::tree::{build_tree_from_sources, ConfigNode, Entry};
use crate::ConfigError;

mod access;
mod conversion;
mod helpers;

/// How a config file is read.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Display name of the root section.
    pub name: String,
    /// Section whose pairs become named constants; `None` uses built-ins only.
    pub constants_section: Option<String>,
    /// Nesting marker in headers and path separator in lookups.
    pub separator: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            name: "toplevel".into(),
            constants_section: Some("Constants".into()),
            separator: '/',
        }
    }
}

impl LoadOptions {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn constants_section(mut self, section: Option<&str>) -> Self {
        self.constants_section = section.map(str::to_string);
        self
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}

/// A fully loaded, evaluated and indexed config.
///
/// Immutable after construction; every accessor takes `&self`, so a loaded
/// config can be shared between threads freely.
#[derive(Debug, Clone)]
pub struct SectionConfig {
    root: ConfigNode,
    namespace: Namespace,
    index: NameIndex,
    options: LoadOptions,
}

impl SectionConfig {
    /// Load a config file with default options.
    ///
    /// # Example
    /// ```ignore
    /// let config = SectionConfig::from_file("detector.cfg")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file_with_options(path, LoadOptions::default())
    }

    /// Load a config file and give the root section a display name.
    pub fn from_file_named<P: AsRef<Path>>(path: P, name: Option<&str>) -> Result<Self, ConfigError> {
        let mut options = LoadOptions::default();
        if let Some(name) = name {
            options = options.name(name);
        }
        Self::from_file_with_options(path, options)
    }

    pub fn from_file_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, ConfigError> {
        Self::from_files([path], options)
    }

    /// Load several files into one config, in order.
    ///
    /// A section that appears again in a later file is extended, and a key
    /// repeated there replaces the earlier value. Repeats inside one file are
    /// still errors.
    ///
    /// # Example
    /// ```ignore
    /// let config = SectionConfig::from_files(["base.cfg", "~/.detector.cfg"], LoadOptions::default())?;
    /// ```
    pub fn from_files<I, P>(paths: I, options: LoadOptions) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let contents = paths
            .into_iter()
            .map(|path| read_source(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_sources(&contents, options)
    }

    /// Parse a config from a string (no file I/O).
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_str_with_options(content, LoadOptions::default())
    }

    pub fn from_str_with_options(content: &str, options: LoadOptions) -> Result<Self, ConfigError> {
        Self::from_sources(&[content], options)
    }

    /// Run the whole pipeline over one or more config texts: records, section
    /// tree, constants, evaluation, index. Later texts extend earlier ones as
    /// in [`from_files`](Self::from_files). Any failure aborts the load; a
    /// partial tree is never returned.
    pub fn from_sources<S: AsRef<str>>(sources: &[S], options: LoadOptions) -> Result<Self, ConfigError> {
        let streams = sources
            .iter()
            .map(|text| read_records(text.as_ref(), options.separator))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            sources = streams.len(),
            records = streams.iter().map(Vec::len).sum::<usize>(),
            "Read raw records"
        );

        let raw_root = build_tree_from_sources(streams.iter().map(Vec::as_slice), &options.name, options.separator)?;

        let constants = options
            .constants_section
            .as_deref()
            .and_then(|name| raw_root.section(name));
        let namespace = build_namespace(constants)?;

        let root = helpers::evaluate_tree(raw_root, &namespace, options.constants_section.as_deref())?;
        let index = NameIndex::build(&root);

        Ok(Self {
            root,
            namespace,
            index,
            options,
        })
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// Display name of the root section.
    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Names of the top-level sections, in file order.
    pub fn sections(&self) -> Vec<&str> {
        self.root.sections()
    }
}

fn read_source(path: &Path) -> Result<String, ConfigError> {
    let resolved = helpers::resolve_config_path(path)?;

    let content = fs::read_to_string(&resolved).map_err(|e| ConfigError::FileError {
        message: format!("Failed to read file: {}", e),
        path: resolved.to_string_lossy().to_string(),
    })?;
    debug!(path = %resolved.display(), bytes = content.len(), "Read config file");
    Ok(content)
}

impl fmt::Display for SectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::export::render_tree(&self.root))
    }
}
