use winnow::combinator::{alt, cut_err, opt, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

/// A pattern element as lexed from the rulebase text, before field names
/// and types are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawToken<'i> {
    Literal(&'i str),
    /// A `%%` escape for a literal percent sign.
    Percent,
    Field {
        name: &'i str,
        kind: &'i str,
        arg: Option<&'i str>,
    },
}

// -- Pattern elements -------------------------------------------------------

fn literal_chunk<'i>(input: &mut &'i str) -> ModalResult<RawToken<'i>> {
    take_while(1.., |c: char| c != '%')
        .map(RawToken::Literal)
        .parse_next(input)
}

fn percent_escape<'i>(input: &mut &'i str) -> ModalResult<RawToken<'i>> {
    "%%".value(RawToken::Percent).parse_next(input)
}

fn field<'i>(input: &mut &'i str) -> ModalResult<RawToken<'i>> {
    '%'.parse_next(input)?;
    let name = take_while(0.., |c: char| c != ':' && c != '%').parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::Description(
            "field placeholder '%name:type%'",
        )))
        .parse_next(input)?;
    let kind = cut_err(take_while(1.., |c: char| c != ':' && c != '%'))
        .context(StrContext::Expected(StrContextValue::Description(
            "field type",
        )))
        .parse_next(input)?;
    let arg = opt(preceded(':', take_while(0.., |c: char| c != '%'))).parse_next(input)?;
    cut_err('%')
        .context(StrContext::Expected(StrContextValue::Description(
            "closing '%'",
        )))
        .parse_next(input)?;
    Ok(RawToken::Field { name, kind, arg })
}

fn token<'i>(input: &mut &'i str) -> ModalResult<RawToken<'i>> {
    // `%%` must be tried before `field`: once `field` consumes the opening
    // `%` its inner errors are cuts and the alternation cannot backtrack.
    alt((percent_escape, field, literal_chunk)).parse_next(input)
}

// -- Top-level pattern parser -----------------------------------------------

pub(crate) fn pattern<'i>(input: &mut &'i str) -> ModalResult<Vec<RawToken<'i>>> {
    repeat(0.., token).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<RawToken<'_>>, String> {
        pattern.parse(input).map_err(|e| e.to_string())
    }

    #[test]
    fn empty_pattern() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn pure_literal() {
        assert_eq!(
            parse("user logged in").unwrap(),
            vec![RawToken::Literal("user logged in")]
        );
    }

    #[test]
    fn single_field() {
        assert_eq!(
            parse("%name:word%").unwrap(),
            vec![RawToken::Field {
                name: "name",
                kind: "word",
                arg: None
            }]
        );
    }

    #[test]
    fn field_with_argument() {
        assert_eq!(
            parse("%csv:char-to:,%").unwrap(),
            vec![RawToken::Field {
                name: "csv",
                kind: "char-to",
                arg: Some(",")
            }]
        );
    }

    #[test]
    fn mixed_literals_and_fields() {
        assert_eq!(
            parse("user %name:word% logged in").unwrap(),
            vec![
                RawToken::Literal("user "),
                RawToken::Field {
                    name: "name",
                    kind: "word",
                    arg: None
                },
                RawToken::Literal(" logged in"),
            ]
        );
    }

    #[test]
    fn percent_escape_is_a_literal_percent() {
        assert_eq!(
            parse("load: 42%%").unwrap(),
            vec![RawToken::Literal("load: 42"), RawToken::Percent]
        );
    }

    #[test]
    fn empty_name_is_lexed_not_rejected_here() {
        // Name validation is the compiler's job.
        assert_eq!(
            parse("%:word%").unwrap(),
            vec![RawToken::Field {
                name: "",
                kind: "word",
                arg: None
            }]
        );
    }

    #[test]
    fn discard_name_lexes() {
        assert_eq!(
            parse("%-:word%").unwrap(),
            vec![RawToken::Field {
                name: "-",
                kind: "word",
                arg: None
            }]
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = parse("user %name:word").unwrap_err();
        assert!(err.contains("closing '%'"), "unexpected error: {err}");
    }

    #[test]
    fn lone_percent_is_an_error() {
        assert!(parse("100% done").is_err());
    }

    #[test]
    fn missing_type_is_an_error() {
        let err = parse("%name%").unwrap_err();
        assert!(
            err.contains("field placeholder '%name:type%'"),
            "unexpected error: {err}"
        );
    }
}
