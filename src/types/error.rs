use thiserror::Error;

/// Malformed rulebase syntax found during compilation.
///
/// Every variant carries the 1-based line number within the rulebase text
/// (or file) being compiled. The rendered message is also recorded in the
/// owning context's diagnostics buffer before the load call returns, so
/// [`Context::last_error`](super::Context::last_error) can report it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line {line}: expected 'rule=<tag>:<pattern>'")]
    MalformedRule { line: usize },

    #[error("line {line}: rule tag may not be empty")]
    EmptyTag { line: usize },

    #[error("line {line}: unknown field type '{kind}'")]
    UnknownFieldType { line: usize, kind: String },

    #[error("line {line}: field type '{kind}' requires a single-character argument")]
    BadFieldArgument { line: usize, kind: String },

    #[error("line {line}: field placeholder has an empty name")]
    EmptyFieldName { line: usize },

    #[error("line {line}: invalid pattern: {detail}")]
    BadPattern { line: usize, detail: String },
}
