use thiserror::Error;

use crate::ConfigError;

/// Longest accepted rule line, in bytes.
pub const MAX_RULE_LINE_LEN: usize = 4096;

/// Hard cap on the number of rules one context may hold.
pub const MAX_RULES: usize = 65_536;

/// Errors from the load side: reading, compiling, and appending rules.
///
/// Returned by [`Context::load_file`](crate::Context::load_file),
/// [`Context::load_path`](crate::Context::load_path), and
/// [`Context::load_string`](crate::Context::load_string).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line} exceeds maximum rule length ({len} > {max} bytes)")]
    RuleTooLarge { line: usize, len: usize, max: usize },

    #[error("rulebase exceeds maximum rule count ({max})")]
    TooManyRules { max: usize },

    #[error("context has been closed")]
    ContextClosed,
}

/// Errors from [`Context::normalize`](crate::Context::normalize).
///
/// `NoMatch` is an ordinary domain outcome, not an internal failure;
/// `ParserState` means the context's compiled tree violated an engine
/// invariant and the context should be discarded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no matching parser")]
    NoMatch,

    #[error("invalid parser state: {0}")]
    ParserState(String),

    #[error("context has been closed")]
    ContextClosed,
}
