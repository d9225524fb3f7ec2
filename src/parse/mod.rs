mod grammar;

use winnow::Parser;

use crate::error::{LoadError, MAX_RULES, MAX_RULE_LINE_LEN};
use crate::types::rule::{FieldType, Token};
use crate::types::{ConfigError, Diagnostics, ParserTree};

use grammar::RawToken;

/// Compile rulebase text, appending rules into `tree` in the order
/// encountered.
///
/// Rules compiled before the failing line stay in the tree; loading is not
/// transactional. Every error is recorded in `diag` before this returns.
///
/// # Errors
///
/// Returns [`LoadError`] on malformed rule syntax or a violated size limit.
pub(crate) fn load_rulebase(
    text: &str,
    tree: &mut ParserTree,
    diag: &mut Diagnostics,
) -> Result<(), LoadError> {
    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw_line.len() > MAX_RULE_LINE_LEN {
            return Err(report(
                diag,
                LoadError::RuleTooLarge {
                    line: line_no,
                    len: raw_line.len(),
                    max: MAX_RULE_LINE_LEN,
                },
            ));
        }

        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("version=") {
            // Header accepted for compatibility with rulebases written for
            // the original engine; the value is not interpreted.
            continue;
        }

        let (tag, tokens) = match compile_rule_line(line, line_no) {
            Ok(compiled) => compiled,
            Err(e) => return Err(report(diag, e.into())),
        };
        if tree.len() >= MAX_RULES {
            return Err(report(diag, LoadError::TooManyRules { max: MAX_RULES }));
        }
        tree.add(tag, tokens);
    }
    Ok(())
}

fn report(diag: &mut Diagnostics, err: LoadError) -> LoadError {
    diag.record(&err.to_string());
    err
}

fn compile_rule_line(line: &str, line_no: usize) -> Result<(String, Vec<Token>), ConfigError> {
    let Some(rest) = line.strip_prefix("rule=") else {
        return Err(ConfigError::MalformedRule { line: line_no });
    };
    let Some((tag, pattern)) = rest.split_once(':') else {
        return Err(ConfigError::MalformedRule { line: line_no });
    };
    if tag.is_empty() {
        return Err(ConfigError::EmptyTag { line: line_no });
    }
    if !is_tag(tag) {
        return Err(ConfigError::MalformedRule { line: line_no });
    }

    let raw = grammar::pattern
        .parse(pattern)
        .map_err(|e| ConfigError::BadPattern {
            line: line_no,
            detail: e.to_string(),
        })?;

    let mut tokens = Vec::new();
    for token in raw {
        match token {
            RawToken::Literal(text) => push_literal(&mut tokens, text),
            RawToken::Percent => push_literal(&mut tokens, "%"),
            RawToken::Field { name, kind, arg } => {
                tokens.push(compile_field(name, kind, arg, line_no)?);
            }
        }
    }
    Ok((tag.to_owned(), tokens))
}

fn compile_field(
    name: &str,
    kind: &str,
    arg: Option<&str>,
    line_no: usize,
) -> Result<Token, ConfigError> {
    let resolved = if FieldType::takes_argument(kind) {
        FieldType::from_name(kind, arg).ok_or_else(|| ConfigError::BadFieldArgument {
            line: line_no,
            kind: kind.to_owned(),
        })?
    } else {
        if arg.is_some() {
            return Err(ConfigError::BadFieldArgument {
                line: line_no,
                kind: kind.to_owned(),
            });
        }
        FieldType::from_name(kind, None).ok_or_else(|| ConfigError::UnknownFieldType {
            line: line_no,
            kind: kind.to_owned(),
        })?
    };

    let name = match name {
        "" => return Err(ConfigError::EmptyFieldName { line: line_no }),
        // liblognorm convention: `-` matches but discards the capture.
        "-" => None,
        other => Some(other.to_owned()),
    };
    Ok(Token::Field {
        name,
        kind: resolved,
    })
}

/// Adjacent literal chunks (e.g. around a `%%` escape) collapse into one
/// token so the first-byte index sees the full leading literal.
fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Literal(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_owned()));
    }
}

fn is_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<ParserTree, LoadError> {
        let mut tree = ParserTree::new();
        let mut diag = Diagnostics::new();
        load_rulebase(text, &mut tree, &mut diag)?;
        Ok(tree)
    }

    #[test]
    fn single_rule() {
        let tree = load("rule=login_event:user %name:word% logged in").unwrap();
        assert_eq!(tree.len(), 1);
        let rule = tree.rule(0).unwrap();
        assert_eq!(rule.tag, "login_event");
        assert_eq!(rule.tokens.len(), 3);
    }

    #[test]
    fn comments_blanks_and_version_header_ignored() {
        let text = "# rulebase for sshd\n\nversion=2\nrule=r:pattern\n";
        let tree = load(text).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn rules_kept_in_load_order() {
        let tree = load("rule=first:a\nrule=second:b").unwrap();
        assert_eq!(tree.rule(0).unwrap().tag, "first");
        assert_eq!(tree.rule(1).unwrap().tag, "second");
    }

    #[test]
    fn percent_escape_merges_into_adjacent_literal() {
        let tree = load("rule=r:cpu at 100%% now").unwrap();
        let rule = tree.rule(0).unwrap();
        assert_eq!(
            rule.tokens,
            vec![Token::Literal("cpu at 100% now".to_owned())]
        );
    }

    #[test]
    fn discard_field_has_no_name() {
        let tree = load("rule=r:%-:word% rest").unwrap();
        match &tree.rule(0).unwrap().tokens[0] {
            Token::Field { name, kind } => {
                assert_eq!(*name, None);
                assert_eq!(*kind, FieldType::Word);
            }
            other => panic!("expected Field, got {other:?}"),
        }
    }

    #[test]
    fn char_to_argument_resolves() {
        let tree = load("rule=r:%part:char-to:,%,").unwrap();
        match &tree.rule(0).unwrap().tokens[0] {
            Token::Field { kind, .. } => assert_eq!(*kind, FieldType::CharTo(',')),
            other => panic!("expected Field, got {other:?}"),
        }
    }

    #[test]
    fn missing_rule_prefix_is_malformed() {
        let err = load("this is not a rule").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::MalformedRule { line: 1 })
        ));
    }

    #[test]
    fn missing_tag_separator_is_malformed() {
        let err = load("rule=no_separator_here").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::MalformedRule { line: 1 })
        ));
    }

    #[test]
    fn empty_tag_rejected() {
        let err = load("rule=:pattern").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::EmptyTag { line: 1 })
        ));
    }

    #[test]
    fn unknown_field_type_rejected_with_line_number() {
        let err = load("rule=a:ok\nrule=b:%x:regex%").unwrap_err();
        match err {
            LoadError::Config(ConfigError::UnknownFieldType { line, kind }) => {
                assert_eq!(line, 2);
                assert_eq!(kind, "regex");
            }
            other => panic!("expected UnknownFieldType, got {other:?}"),
        }
    }

    #[test]
    fn empty_field_name_rejected() {
        let err = load("rule=r:%:word%").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::EmptyFieldName { line: 1 })
        ));
    }

    #[test]
    fn char_to_without_argument_rejected() {
        let err = load("rule=r:%x:char-to%").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::BadFieldArgument { .. })
        ));
    }

    #[test]
    fn argument_on_argless_type_rejected() {
        let err = load("rule=r:%x:word:y%").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::BadFieldArgument { .. })
        ));
    }

    #[test]
    fn unterminated_placeholder_rejected() {
        let err = load("rule=r:user %name:word").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::BadPattern { line: 1, .. })
        ));
    }

    #[test]
    fn over_long_line_is_rule_too_large() {
        let text = format!("rule=r:{}", "a".repeat(MAX_RULE_LINE_LEN));
        let err = load(&text).unwrap_err();
        assert!(matches!(err, LoadError::RuleTooLarge { line: 1, .. }));
    }

    #[test]
    fn failure_keeps_earlier_rules_in_tree() {
        let mut tree = ParserTree::new();
        let mut diag = Diagnostics::new();
        let result = load_rulebase("rule=good:ok\nrule=bad:%x:regex%", &mut tree, &mut diag);
        assert!(result.is_err());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.rule(0).unwrap().tag, "good");
    }

    #[test]
    fn errors_are_recorded_in_diagnostics() {
        let mut tree = ParserTree::new();
        let mut diag = Diagnostics::new();
        let _ = load_rulebase("rule=r:%x:regex%", &mut tree, &mut diag);
        let msg = diag.last().unwrap();
        assert!(msg.contains("unknown field type 'regex'"), "got: {msg}");
    }

    #[test]
    fn empty_pattern_is_accepted() {
        let tree = load("rule=r:").unwrap();
        assert!(tree.rule(0).unwrap().tokens.is_empty());
    }
}
