//! Shell-style word splitting for a single source line.
//!
//! Words are separated by blanks. Single quotes preserve everything up to the
//! next single quote. Double quotes preserve everything except `\"` and `\\`,
//! which unescape to `"` and `\`. Outside quotes a backslash takes the next
//! character literally. Quoted and unquoted runs that touch form one word, and
//! an empty pair of quotes yields an empty word.

use crate::error::{TokenizeError, TokenizeErrorKind};

/// Characters that separate words.
pub(crate) fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Splits one line into words.
///
/// A blank line yields no words. Unbalanced quotes and a trailing backslash
/// fail with a [`TokenizeError`] carrying the line.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let fail = |kind| TokenizeError {
        line: line.to_string(),
        kind,
    };

    let mut tokens = Vec::new();
    // `Some` once a word has started, even if it is still empty ('' or "").
    let mut word: Option<String> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if is_blank(c) => {
                if let Some(done) = word.take() {
                    tokens.push(done);
                }
            }
            '\'' => {
                let buf = word.get_or_insert_with(String::new);
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => buf.push(c),
                        None => return Err(fail(TokenizeErrorKind::UnterminatedQuote('\''))),
                    }
                }
            }
            '"' => {
                let buf = word.get_or_insert_with(String::new);
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => buf.push(c),
                            Some(c) => {
                                buf.push('\\');
                                buf.push(c);
                            }
                            None => return Err(fail(TokenizeErrorKind::UnterminatedQuote('"'))),
                        },
                        Some(c) => buf.push(c),
                        None => return Err(fail(TokenizeErrorKind::UnterminatedQuote('"'))),
                    }
                }
            }
            '\\' => match chars.next() {
                Some(c) => word.get_or_insert_with(String::new).push(c),
                None => return Err(fail(TokenizeErrorKind::DanglingEscape)),
            },
            c => word.get_or_insert_with(String::new).push(c),
        }
    }

    if let Some(done) = word {
        tokens.push(done);
    }
    Ok(tokens)
}

/// Renders `word` so that [`tokenize`] reads it back as exactly one word.
pub(crate) fn quote(word: &str) -> String {
    let needs_quotes = word.is_empty()
        || word.chars().any(|c| is_blank(c) || matches!(c, '\'' | '"' | '\\'));
    if !needs_quotes {
        return word.to_string();
    }

    let mut out = String::with_capacity(word.len() + 2);
    out.push('\'');
    for c in word.chars() {
        if c == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(words("aaa bbb  !@#$%^&*()"), vec!["aaa", "bbb", "!@#$%^&*()"]);
        assert_eq!(words("\ta\t b \r"), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_line_is_empty() {
        assert!(words("").is_empty());
        assert!(words("   \t ").is_empty());
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(words(r#"echo 'a "b" \c'"#), vec!["echo", r#"a "b" \c"#]);
    }

    #[test]
    fn test_double_quote_escapes() {
        assert_eq!(words(r#""a \"b\" \\ \n""#), vec![r#"a "b" \ \n"#]);
    }

    #[test]
    fn test_backslash_outside_quotes() {
        assert_eq!(words(r"a\ b c\'d"), vec!["a b", "c'd"]);
    }

    #[test]
    fn test_adjacent_runs_join() {
        assert_eq!(words(r#"x"y"'z'w"#), vec!["xyzw"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_word() {
        assert_eq!(words("a '' \"\""), vec!["a", "", ""]);
    }

    #[test]
    fn test_dollar_survives_quotes() {
        assert_eq!(words(r#"a "$$$d""#), vec!["a", "$$$d"]);
    }

    #[test]
    fn test_unterminated_quotes() {
        let err = tokenize("say 'hello").unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::UnterminatedQuote('\''));
        assert_eq!(err.line, "say 'hello");

        let err = tokenize(r#"say "hello\""#).unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::UnterminatedQuote('"'));
    }

    #[test]
    fn test_dangling_escape() {
        let err = tokenize(r"oops \").unwrap_err();
        assert_eq!(err.kind, TokenizeErrorKind::DanglingEscape);
    }

    #[test]
    fn test_quote_round_trips() {
        for word in ["plain", "", "two words", "it's", r#"say "hi""#, r"back\slash", "$x"] {
            assert_eq!(words(&quote(word)), vec![word.to_string()], "word: {word:?}");
        }
    }
}
