use crate::error::NormalizeError;
use crate::types::rule::{FieldType, Rule, Token};
use crate::types::{ParserTree, Value};

/// Match a non-empty, pre-trimmed line against the tree.
///
/// Candidates are tried in load order; the first rule whose token sequence
/// fully consumes the input wins. The returned map is independent of the
/// tree: every captured span is copied out of `line`.
pub(crate) fn normalize(tree: &ParserTree, line: &str) -> Result<Value, NormalizeError> {
    if tree.is_empty() {
        return Err(NormalizeError::NoMatch);
    }
    for index in tree.candidates(line) {
        let rule = tree.rule(index).ok_or_else(|| {
            NormalizeError::ParserState(format!("candidate index {index} out of range"))
        })?;
        if rule.index != index {
            return Err(NormalizeError::ParserState(format!(
                "rule at slot {index} carries load index {}",
                rule.index
            )));
        }
        if let Some(fields) = match_rule(rule, line) {
            let mut record = Value::map();
            record.insert("tag", Value::from(rule.tag.as_str()));
            for (name, value) in fields {
                record.insert(name, value);
            }
            return Ok(record);
        }
    }
    Err(NormalizeError::NoMatch)
}

/// Try one rule against the full line. `Some` only if every token matches
/// and the input is completely consumed.
fn match_rule(rule: &Rule, line: &str) -> Option<Vec<(String, Value)>> {
    let mut fields = Vec::new();
    let mut rest = line;

    for token in &rule.tokens {
        match token {
            Token::Literal(text) => {
                rest = rest.strip_prefix(text.as_str())?;
            }
            Token::Field { name, kind } => {
                let (len, value) = extract(kind, rest)?;
                if let Some(name) = name {
                    fields.push((name.clone(), value));
                }
                rest = &rest[len..];
            }
        }
    }

    if rest.is_empty() {
        Some(fields)
    } else {
        None
    }
}

/// Consume a span from the front of `input` according to the extractor's
/// own policy. Returns the consumed byte length and the captured value.
fn extract(kind: &FieldType, input: &str) -> Option<(usize, Value)> {
    match kind {
        FieldType::Word => {
            let len = span(input, |b| !b.is_ascii_whitespace());
            capture_str(input, len)
        }
        FieldType::Alpha => {
            let len = span(input, |b| b.is_ascii_alphabetic());
            capture_str(input, len)
        }
        FieldType::Number => {
            let len = span(input, |b| b.is_ascii_digit());
            if len == 0 {
                return None;
            }
            let digits = &input[..len];
            // Digit runs beyond i64 stay strings rather than losing data.
            let value = digits
                .parse::<i64>()
                .map_or_else(|_| Value::from(digits), Value::Int);
            Some((len, value))
        }
        FieldType::Float => extract_float(input),
        FieldType::Rest => Some((input.len(), Value::from(input))),
        FieldType::QuotedString => extract_quoted(input),
        FieldType::Ipv4 => extract_ipv4(input),
        FieldType::CharTo(c) => {
            let len = input.find(*c)?;
            capture_str(input, len)
        }
    }
}

/// Length of the leading run of bytes satisfying `pred`. ASCII-only
/// predicates keep the cut on a char boundary.
fn span(input: &str, pred: impl Fn(u8) -> bool) -> usize {
    input
        .bytes()
        .position(|b| !pred(b))
        .unwrap_or(input.len())
}

fn capture_str(input: &str, len: usize) -> Option<(usize, Value)> {
    if len == 0 {
        None
    } else {
        Some((len, Value::from(&input[..len])))
    }
}

fn extract_float(input: &str) -> Option<(usize, Value)> {
    let bytes = input.as_bytes();
    let mut pos = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_digit = false;
    let mut seen_point = false;
    while pos < bytes.len() {
        match bytes[pos] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        pos += 1;
    }
    if !seen_digit {
        return None;
    }
    let text = &input[..pos];
    let parsed: f64 = text.parse().ok()?;
    Some((pos, Value::Float(parsed)))
}

fn extract_quoted(input: &str) -> Option<(usize, Value)> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return None,
    }
    let mut inner = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((i + 1, Value::Str(inner))),
            '\\' => match chars.next() {
                Some((_, '"')) => inner.push('"'),
                Some((_, '\\')) => inner.push('\\'),
                Some((_, other)) => {
                    inner.push('\\');
                    inner.push(other);
                }
                None => return None,
            },
            other => inner.push(other),
        }
    }
    // No closing quote.
    None
}

fn extract_ipv4(input: &str) -> Option<(usize, Value)> {
    let mut pos = 0;
    for i in 0..4 {
        if i > 0 {
            if input.as_bytes().get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
        let len = span(&input[pos..], |b| b.is_ascii_digit()).min(3);
        if len == 0 {
            return None;
        }
        let octet: u16 = input[pos..pos + len].parse().ok()?;
        if octet > 255 {
            return None;
        }
        pos += len;
    }
    capture_str(input, pos)
}
