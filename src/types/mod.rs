mod context;
mod diagnostics;
mod error;
pub(crate) mod rule;
mod tree;
mod value;

pub use context::Context;
pub use error::ConfigError;
pub use value::Value;

pub(crate) use diagnostics::Diagnostics;
pub(crate) use tree::ParserTree;
