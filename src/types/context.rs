use std::fs;
use std::path::Path;

use crate::error::{LoadError, NormalizeError};

use super::diagnostics::Diagnostics;
use super::tree::ParserTree;
use super::value::Value;

/// The unit of lifetime and isolation: one parser tree plus one
/// diagnostics buffer.
///
/// Contexts are fully independent of one another; a single context's load
/// and normalize operations take `&mut self`, so the borrow checker enforces
/// the caller-side serialization the engine requires.
///
/// # Example
///
/// ```
/// use lognorm::{Context, Value};
///
/// let mut ctx = Context::new();
/// ctx.load_string("rule=login_event:user %name:word% logged in")
///     .unwrap();
/// let record = ctx.normalize("user alice logged in", false).unwrap().unwrap();
/// assert_eq!(record.get("tag"), Some(&Value::from("login_event")));
/// assert_eq!(record.get("name"), Some(&Value::from("alice")));
/// ```
#[derive(Debug, Default)]
pub struct Context {
    tree: ParserTree,
    diag: Diagnostics,
    closed: bool,
}

impl Context {
    /// Create an empty context. Normalizing against it fails with
    /// [`NormalizeError::NoMatch`] until a load succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: ParserTree::new(),
            diag: Diagnostics::new(),
            closed: false,
        }
    }

    /// Parse rulebase text held in memory and append its rules.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on malformed syntax, a violated size limit, or
    /// a closed context. Rules compiled before the failing line remain
    /// loaded.
    pub fn load_string(&mut self, text: &str) -> Result<(), LoadError> {
        self.begin_load()?;
        crate::parse::load_rulebase(text, &mut self.tree, &mut self.diag)
    }

    /// Read one rulebase file and append its rules.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the path is unreadable, otherwise as
    /// [`load_string`](Self::load_string).
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.begin_load()?;
        let text = fs::read_to_string(path)?;
        crate::parse::load_rulebase(&text, &mut self.tree, &mut self.diag)
    }

    /// Load a rulebase file, or every regular file directly inside a
    /// directory (no recursion), sorted by file name for determinism.
    ///
    /// Loading stops at the first failing file; rules from files loaded
    /// before it remain applied. Callers needing atomicity should build in
    /// a fresh context and swap.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] as [`load_file`](Self::load_file).
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.begin_load()?;
        let path = path.as_ref();
        if path.is_dir() {
            let mut files = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
            files.sort();
            for file in files {
                self.load_file(&file)?;
            }
            Ok(())
        } else {
            self.load_file(path)
        }
    }

    /// Parse one log line into a structured record.
    ///
    /// A zero-length line (after `strip`, if set) yields `Ok(None)` — the
    /// "no value" outcome, distinct from [`NormalizeError::NoMatch`]. With
    /// `strip` set, trailing `\n`, `\r`, `\t`, and space characters are
    /// removed before matching.
    ///
    /// The returned [`Value`] owns all of its data; nothing aliases back
    /// into the rule storage.
    ///
    /// # Errors
    ///
    /// [`NormalizeError::NoMatch`] if no rule fully consumes the line;
    /// [`NormalizeError::ParserState`] on a violated engine invariant
    /// (discard the context); [`NormalizeError::ContextClosed`] after
    /// [`close`](Self::close).
    pub fn normalize(&mut self, line: &str, strip: bool) -> Result<Option<Value>, NormalizeError> {
        if self.closed {
            return Err(NormalizeError::ContextClosed);
        }
        self.diag.clear();

        let line = if strip {
            line.trim_end_matches(['\n', '\r', '\t', ' '])
        } else {
            line
        };
        if line.is_empty() {
            return Ok(None);
        }
        crate::normalize::normalize(&self.tree, line).map(Some)
    }

    /// The most recent diagnostic recorded by a load or normalize call, or
    /// `None` if the last operation reported nothing.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.diag.last()
    }

    /// Number of rules currently loaded.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.tree.len()
    }

    /// Tear the context down. Every subsequent operation fails with a
    /// `ContextClosed` error; dropping a context does not require this.
    pub fn close(&mut self) {
        self.closed = true;
        self.diag.clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn begin_load(&mut self) -> Result<(), LoadError> {
        if self.closed {
            return Err(LoadError::ContextClosed);
        }
        self.diag.clear();
        Ok(())
    }
}
