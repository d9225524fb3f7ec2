/// The typed sub-parser behind a `%name:type%` placeholder.
///
/// Each variant defines its own consumption policy; see the crate docs for
/// the exact span each one claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// One or more bytes up to the next ASCII whitespace.
    Word,
    /// One or more ASCII alphabetic characters.
    Alpha,
    /// One or more ASCII digits.
    Number,
    /// An optionally signed decimal number with at most one point.
    Float,
    /// Everything to the end of the line, possibly empty.
    Rest,
    /// A `"`-delimited span with `\"` and `\\` escapes.
    QuotedString,
    /// A dotted quad, each octet 0-255.
    Ipv4,
    /// One or more characters up to (not including) the given character,
    /// which must be present.
    CharTo(char),
}

impl FieldType {
    /// Resolve a type name (and optional argument) from the rulebase text.
    /// Returns `None` for unknown names; argument validation is the
    /// compiler's job.
    #[must_use]
    pub(crate) fn from_name(name: &str, arg: Option<&str>) -> Option<FieldType> {
        match name {
            "word" => Some(FieldType::Word),
            "alpha" => Some(FieldType::Alpha),
            "number" => Some(FieldType::Number),
            "float" => Some(FieldType::Float),
            "rest" => Some(FieldType::Rest),
            "quoted-string" => Some(FieldType::QuotedString),
            "ipv4" => Some(FieldType::Ipv4),
            "char-to" => {
                let arg = arg?;
                let mut chars = arg.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(FieldType::CharTo(c)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Whether this type takes an argument (`%name:type:arg%`).
    #[must_use]
    pub(crate) fn takes_argument(name: &str) -> bool {
        name == "char-to"
    }
}

/// One element of a compiled rule pattern, in authored order.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text that must match the input exactly.
    Literal(String),
    /// A field extractor. `name` is `None` for match-and-discard
    /// placeholders (`%-:word%`).
    Field {
        name: Option<String>,
        kind: FieldType,
    },
}

/// One compiled pattern: an output tag plus the ordered token sequence.
///
/// `index` is the rule's position in load order; the matcher uses it as the
/// first-match-wins tie-break.
#[derive(Debug, Clone)]
pub struct Rule {
    pub tag: String,
    pub tokens: Vec<Token>,
    pub(crate) index: usize,
}
