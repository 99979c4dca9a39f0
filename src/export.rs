// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::tree::ConfigNode;
use crate::{ConfigError, SectionConfig};

/// Convert a section and everything below it to a JSON object.
///
/// Local keys come first, then child sections as nested objects, both in
/// file order. Values go through their `Serialize` impl: integers and reals
/// become numbers, booleans and strings stay as they are.
pub fn to_json_value(node: &ConfigNode) -> Result<serde_json::Value, serde_json::Error> {
    let mut out = Map::new();
    for (key, value) in node.values() {
        out.insert(key.clone(), serde_json::to_value(value)?);
    }
    for (name, child) in node.children() {
        // a key of the same name already claimed the slot
        if !out.contains_key(name) {
            out.insert(name.clone(), to_json_value(child)?);
        }
    }
    Ok(serde_json::Value::Object(out))
}

/// Export the whole config as pretty-printed JSON.
///
/// # Examples
/// ```no_run
/// use section_cfg::{export, SectionConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SectionConfig::from_file("detector.cfg")?;
/// println!("{}", export::to_json(&config)?);
/// # Ok(())
/// # }
/// ```
pub fn to_json(config: &SectionConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_json_value(config.root())?)
}

/// Write the JSON export of `config` to `path`.
pub fn write_json<P: AsRef<Path>>(config: &SectionConfig, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let file_error = |message: String| ConfigError::FileError {
        path: path.to_string_lossy().to_string(),
        message,
    };

    let json = to_json(config).map_err(|e| file_error(format!("Failed to serialize: {}", e)))?;
    fs::write(path, json).map_err(|e| file_error(format!("Failed to write file: {}", e)))
}

/// Render a section tree for diagnostics.
///
/// ```text
/// toplevel/
///  ├─ Constants/
///  │   └─ c = 300000000
///  └─ Sampler/
///      ├─ parameter1/
///      │   └─ min = 0
///      └─ sampler_name = custom
/// ```
pub fn render_tree(root: &ConfigNode) -> String {
    let mut out = format!("{}/\n", root.name());
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &ConfigNode, prefix: &str, out: &mut String) {
    let total = node.children().len() + node.values().len();
    let mut written = 0;

    for (name, child) in node.children() {
        written += 1;
        let last = written == total;
        out.push_str(&format!("{}{}{}/\n", prefix, branch(last), name));
        render_children(child, &format!("{}{}", prefix, guide(last)), out);
    }

    for (key, value) in node.values() {
        written += 1;
        out.push_str(&format!("{}{}{} = {}\n", prefix, branch(written == total), key, value));
    }
}

fn branch(last: bool) -> &'static str {
    if last { " └─ " } else { " ├─ " }
}

fn guide(last: bool) -> &'static str {
    if last { "    " } else { " │  " }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_tree(self))
    }
}
