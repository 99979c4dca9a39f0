use thiserror::Error;

/// The main error type for loading and querying a sectioned config.
///
/// Structural and evaluation errors abort a load entirely. Lookup errors
/// (`PathNotFound`, `AmbiguousName`, `NotFound`, `TypeError`) only fail the
/// call that raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A line that is neither a header, a `key = value` pair, a comment nor blank.
    #[error("Syntax error on line {line}: {message}{}", hint_suffix(self))]
    SyntaxError { message: String, line: usize },

    /// A header whose nesting markers jump more than one level, or whose name is unusable.
    #[error("Malformed header '{header}' on line {line}: {message}{}", hint_suffix(self))]
    MalformedHeader {
        header: String,
        message: String,
        line: usize,
    },

    #[error("Duplicate section '{path}' on line {line}{}", hint_suffix(self))]
    DuplicateSection { path: String, line: usize },

    #[error("Duplicate key '{key}' in section '{section}' on line {line}{}", hint_suffix(self))]
    DuplicateKey {
        section: String,
        key: String,
        line: usize,
    },

    /// A constant referenced a name that is not (yet) in the namespace.
    #[error("Unresolved identifier '{name}' in constant '{key}' on line {line}{}", hint_suffix(self))]
    UnresolvedIdentifier {
        name: String,
        key: String,
        line: usize,
    },

    #[error("Failed to evaluate '{path}' on line {line}: {reason}{}", hint_suffix(self))]
    EvaluationError {
        path: String,
        reason: String,
        line: usize,
    },

    #[error("Path '{path}' not found in configuration{}", hint_suffix(self))]
    PathNotFound { path: String },

    #[error("Name '{name}' is ambiguous, found at: {}{}", .paths.join(", "), hint_suffix(self))]
    AmbiguousName { name: String, paths: Vec<String> },

    #[error("No value named '{name}' in configuration{}", hint_suffix(self))]
    NotFound { name: String },

    #[error("Type error for '{path}': {message}{}", hint_suffix(self))]
    TypeError { path: String, message: String },

    #[error("File error '{path}': {message}{}", hint_suffix(self))]
    FileError { path: String, message: String },
}

impl ConfigError {
    /// Stable numeric code, grouped by stage: 1xx raw records, 2xx tree,
    /// 3xx evaluation, 4xx lookup, 5xx I/O.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::SyntaxError { .. } => 101,
            ConfigError::MalformedHeader { .. } => 102,
            ConfigError::DuplicateSection { .. } => 201,
            ConfigError::DuplicateKey { .. } => 202,
            ConfigError::UnresolvedIdentifier { .. } => 301,
            ConfigError::EvaluationError { .. } => 302,
            ConfigError::PathNotFound { .. } => 401,
            ConfigError::AmbiguousName { .. } => 402,
            ConfigError::NotFound { .. } => 403,
            ConfigError::TypeError { .. } => 404,
            ConfigError::FileError { .. } => 501,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConfigError::SyntaxError { .. } => {
                Some("Expected `[Section]`, `key = value` or a `#` comment")
            }
            ConfigError::MalformedHeader { .. } => {
                Some("A nested header needs its parent level open right above it")
            }
            ConfigError::DuplicateSection { .. } => Some("Merge the two sections or rename one"),
            ConfigError::DuplicateKey { .. } => None,
            ConfigError::UnresolvedIdentifier { .. } => {
                Some("Constants may only use built-ins and constants defined above them")
            }
            ConfigError::EvaluationError { .. } => None,
            ConfigError::PathNotFound { .. } => {
                Some("Check that the path exists in your config file")
            }
            ConfigError::AmbiguousName { .. } => Some("Use the full path instead"),
            ConfigError::NotFound { .. } => None,
            ConfigError::TypeError { .. } => None,
            ConfigError::FileError { .. } => Some("Check that the file exists and is readable"),
        }
    }

    /// Line number the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::SyntaxError { line, .. }
            | ConfigError::MalformedHeader { line, .. }
            | ConfigError::DuplicateSection { line, .. }
            | ConfigError::DuplicateKey { line, .. }
            | ConfigError::UnresolvedIdentifier { line, .. }
            | ConfigError::EvaluationError { line, .. } => Some(*line),
            _ => None,
        }
    }
}

fn hint_suffix(err: &ConfigError) -> String {
    err.hint()
        .map_or(String::new(), |h| format!(" Hint: {}", h))
}

/// Failure inside the expression evaluator, before path and key are known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EvalError {
    /// The text is not an arithmetic expression at all.
    Syntax(String),
    /// The text parsed, but names something the namespace does not hold.
    Unresolved(String),
    /// The expression is well formed but cannot be computed.
    Invalid(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Syntax(msg) => write!(f, "syntax error: {}", msg),
            EvalError::Unresolved(name) => write!(f, "unknown name '{}'", name),
            EvalError::Invalid(msg) => f.write_str(msg),
        }
    }
}
