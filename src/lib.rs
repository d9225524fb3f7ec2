//! A log normalization engine: compile a declarative rulebase describing
//! expected log-line shapes, then parse arbitrary text lines into structured
//! records.
//!
//! ```
//! use lognorm::{Context, Value};
//!
//! let mut ctx = Context::new();
//! ctx.load_string("rule=login_event:user %name:word% logged in")
//!     .unwrap();
//!
//! let record = ctx.normalize("user alice logged in\n", true).unwrap().unwrap();
//! assert_eq!(record.get("tag"), Some(&Value::from("login_event")));
//! assert_eq!(record.get("name"), Some(&Value::from("alice")));
//! ```

mod error;
mod normalize;
mod parse;
mod types;

pub use error::{LoadError, NormalizeError, MAX_RULES, MAX_RULE_LINE_LEN};
pub use types::{ConfigError, Context, Value};

/// Engine revision string. Pure; no side effects.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
