use std::path::{Path, PathBuf};

use tracing::debug;

use crate::eval::{infer_value, Scope};
use crate::namespace::Namespace;
use crate::tree::{ConfigNode, RawNode};
use crate::{ConfigError, Value};

/// Expand a leading `~/` to the home directory. Other paths are used as given.
pub(super) fn resolve_config_path(path: &Path) -> Result<PathBuf, ConfigError> {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return Ok(path.to_path_buf());
    };

    dirs::home_dir()
        .map(|home| home.join(rest))
        .ok_or_else(|| ConfigError::FileError {
            path: path.to_string_lossy().to_string(),
            message: "Could not determine home directory".into(),
        })
}

/// Turn every raw value into a typed one.
///
/// Pairs of the top-level constants section already went through the namespace
/// builder, so they are copied from there instead of being evaluated twice.
pub(super) fn evaluate_tree(
    raw_root: RawNode,
    namespace: &Namespace,
    constants_section: Option<&str>,
) -> Result<ConfigNode, ConfigError> {
    let mut evaluated = 0usize;

    let root = raw_root.try_map(&mut |node, key, raw| {
        let is_constants = node.depth() == 1 && Some(node.name()) == constants_section;
        if is_constants {
            if let Some(value) = namespace.constants().get(key) {
                return Ok(value.clone());
            }
        }

        evaluated += 1;
        infer_value(&raw.text, namespace, Scope::Section).map_err(|e| ConfigError::EvaluationError {
            path: node.key_path(key),
            reason: e.to_string(),
            line: raw.line,
        })
    })?;

    debug!(evaluated, "Evaluated section values");
    Ok(root)
}

/// Put the requested path on a conversion error raised without one.
pub(super) fn with_path(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::TypeError { path: p, message } if p.is_empty() => ConfigError::TypeError {
            path: path.to_string(),
            message,
        },
        other => other,
    }
}

pub(super) fn convert<T>(value: &Value, path: &str) -> Result<T, ConfigError>
where
    T: TryFrom<Value, Error = ConfigError>,
{
    T::try_from(value.clone()).map_err(|e| with_path(e, path))
}
