//! Nested-section config files with typed values and safe arithmetic.
//!
//! ```text
//! [Constants]
//! c = 3 * 10 ** 8
//!
//! [Sampler]
//! sampler_name = custom
//! [/parameter1]
//! max = c / 2
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod export;
pub mod lexer;
pub mod namespace;
pub mod parser;
pub mod resolver;
pub mod tree;
pub mod utils;
pub mod config;

pub use ast::Value;
pub use error::ConfigError;
pub use config::{LoadOptions, SectionConfig};
pub use eval::evaluate;
pub use namespace::Namespace;
pub use resolver::{NameIndex, Occurrence};
pub use tree::{ConfigNode, Entry};
