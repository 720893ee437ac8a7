//! Lexer for the Otto pipeline DSL.
//!
//! Produces a flat token stream with line/column positions. Lexing never
//! fails: unexpected characters and unterminated strings are recorded in
//! the [`ErrorCollector`] and the scan continues at the next character.

use crate::error::{ErrorCollector, SyntaxError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifiers and block keywords -- distinguished in the parser
    Word(String),
    /// Single-quoted string literal, raw lexeme with its quotes retained.
    /// The DSL defines no escape syntax; unquoting is one character off
    /// each end and happens in the tree builder.
    Str(String),
    Eq,
    LBrace,
    RBrace,
    /// End of input
    Eof,
}

impl Token {
    /// Short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Str(_) => "string literal".to_owned(),
            Token::Eq => "'='".to_owned(),
            Token::LBrace => "'{'".to_owned(),
            Token::RBrace => "'}'".to_owned(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// 0-based column of the token's first character.
    pub column: u32,
}

/// Tokenize the whole source. Always returns a stream ending in
/// [`Token::Eof`]; problems are recorded in `errors`.
pub fn lex(src: &str, errors: &mut ErrorCollector) -> Vec<Spanned> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line: u32 = 1;
    let mut column: u32 = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
            pos += 1;
            continue;
        }

        let tok_line = line;
        let tok_column = column;

        match c {
            '=' => {
                tokens.push(Spanned {
                    token: Token::Eq,
                    line: tok_line,
                    column: tok_column,
                });
                pos += 1;
                column += 1;
            }
            '{' => {
                tokens.push(Spanned {
                    token: Token::LBrace,
                    line: tok_line,
                    column: tok_column,
                });
                pos += 1;
                column += 1;
            }
            '}' => {
                tokens.push(Spanned {
                    token: Token::RBrace,
                    line: tok_line,
                    column: tok_column,
                });
                pos += 1;
                column += 1;
            }
            '\'' => {
                // Scan to the closing quote on the same line, keeping the
                // raw lexeme. No escape sequences are defined.
                let start = pos;
                pos += 1;
                column += 1;
                let mut terminated = false;
                while pos < chars.len() && chars[pos] != '\n' {
                    column += 1;
                    if chars[pos] == '\'' {
                        pos += 1;
                        terminated = true;
                        break;
                    }
                    pos += 1;
                }
                if terminated {
                    let raw: String = chars[start..pos].iter().collect();
                    tokens.push(Spanned {
                        token: Token::Str(raw),
                        line: tok_line,
                        column: tok_column,
                    });
                } else {
                    errors.record(SyntaxError::new(
                        tok_line,
                        tok_column,
                        "unterminated string literal",
                    ));
                }
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                    column += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                tokens.push(Spanned {
                    token: Token::Word(word),
                    line: tok_line,
                    column: tok_column,
                });
            }
            other => {
                errors.record(SyntaxError::new(
                    tok_line,
                    tok_column,
                    format!("unexpected character '{}'", other),
                ));
                pos += 1;
                column += 1;
            }
        }
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
        column,
    });
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ok(src: &str) -> Vec<Token> {
        let mut errors = ErrorCollector::new();
        let tokens = lex(src, &mut errors);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors.errors());
        tokens.into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn lexes_the_minimal_pipeline() {
        let tokens = lex_ok("pipeline { stages { stage { } } }");
        assert_eq!(
            tokens,
            vec![
                Token::Word("pipeline".into()),
                Token::LBrace,
                Token::Word("stages".into()),
                Token::LBrace,
                Token::Word("stage".into()),
                Token::LBrace,
                Token::RBrace,
                Token::RBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keeps_string_lexemes_raw() {
        let tokens = lex_ok("name = 'Build'");
        assert_eq!(
            tokens,
            vec![
                Token::Word("name".into()),
                Token::Eq,
                Token::Str("'Build'".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn empty_input_yields_only_eof() {
        let tokens = lex_ok("");
        assert_eq!(tokens, vec![Token::Eof]);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut errors = ErrorCollector::new();
        let tokens = lex("stage {\n  name = 'x'\n}", &mut errors);
        assert!(errors.is_empty());
        // "name" starts at line 2, column 2
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].column, 2);
        // closing brace at line 3, column 0
        assert_eq!(tokens[5].line, 3);
        assert_eq!(tokens[5].column, 0);
    }

    #[test]
    fn unexpected_character_is_recorded_and_skipped() {
        let mut errors = ErrorCollector::new();
        let tokens = lex("stage @ {", &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].column, 6);
        assert!(errors.errors()[0].message.contains('@'));
        // The scan continued past the bad character.
        let kinds: Vec<Token> = tokens.into_iter().map(|s| s.token).collect();
        assert_eq!(
            kinds,
            vec![Token::Word("stage".into()), Token::LBrace, Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_recorded() {
        let mut errors = ErrorCollector::new();
        let tokens = lex("name = 'oops\n}", &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors.errors()[0].message.contains("unterminated"));
        // The brace on the next line still lexes.
        assert!(tokens.iter().any(|s| s.token == Token::RBrace));
    }
}
