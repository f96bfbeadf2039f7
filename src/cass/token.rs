//! Record tokenizer for the CASS wire format
//!
//! One CASS record is a single line of tab-separated fields. Tokenization
//! is pure lexing, no semantics: each field becomes either an [`Int`]
//! (the whole field is an optionally negative decimal integer) or a
//! [`Field`] (anything else, first byte being the node tag). Which kind a
//! field is falls out of logos' longest-match rule: the catch-all field
//! pattern always spans the whole field, so the integer pattern only wins
//! the tie when it also spans the whole field.
//!
//! [`Int`]: RecordToken::Int
//! [`Field`]: RecordToken::Field

use crate::cass::error::RecordError;
use logos::Logos;

/// One tab-separated field of a CASS record.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"\t")]
pub enum RecordToken {
    /// A field that is wholly a decimal integer: a node count, a child
    /// arity, or a prev/next-use index.
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok(), priority = 3)]
    Int(i64),

    /// Any other field: a tag byte followed by the label remainder.
    #[regex(r"[^\t]+", |lex| lex.slice().to_owned(), priority = 1)]
    Field(String),
}

/// Tokenize one record line. The caller is expected to have skipped blank
/// lines; surrounding whitespace should already be trimmed.
pub fn tokenize(line: &str) -> Result<Vec<RecordToken>, RecordError> {
    let mut tokens = Vec::new();
    for (result, span) in RecordToken::lexer(line).spanned() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(RecordError::Malformed(format!(
                    "unlexable field starting at {:?}",
                    &line[span]
                )))
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_tagged_fields() {
        let tokens = tokenize("2\tI#func_decl#\t1\tN5").unwrap();
        assert_eq!(
            tokens,
            vec![
                RecordToken::Int(2),
                RecordToken::Field("I#func_decl#".to_string()),
                RecordToken::Int(1),
                RecordToken::Field("N5".to_string()),
            ]
        );
    }

    #[test]
    fn test_negative_use_indices_lex_as_ints() {
        let tokens = tokenize("vx\t-1\t3").unwrap();
        assert_eq!(
            tokens,
            vec![
                RecordToken::Field("vx".to_string()),
                RecordToken::Int(-1),
                RecordToken::Int(3),
            ]
        );
    }

    #[test]
    fn test_digit_leading_labels_stay_fields() {
        // "N5" carries a digit right after the tag; the whole field is
        // still a Field because it is not wholly an integer.
        let tokens = tokenize("N5\tS\"a b\"").unwrap();
        assert_eq!(
            tokens,
            vec![
                RecordToken::Field("N5".to_string()),
                RecordToken::Field("S\"a b\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_fields_may_contain_spaces() {
        let tokens = tokenize("Sint main()").unwrap();
        assert_eq!(tokens, vec![RecordToken::Field("Sint main()".to_string())]);
    }

    #[test]
    fn test_empty_line_yields_no_tokens() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }
}
