use std::fmt::{self, Display};
use std::str::Chars;

use thiserror::Error;
use tracing::{debug, trace};

const OPEN_PAREN_CHAR: char = '(';
const CLOSE_PAREN_CHAR: char = ')';
const QUOTE_CHAR: char = '"';

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Paren,
    Number,
    String,
    Name,
}

impl Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Paren => "paren",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Name => "name",
        };
        formatter.write_str(name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn is_open_paren(&self) -> bool {
        self.kind == TokenKind::Paren && self.text.starts_with(OPEN_PAREN_CHAR)
    }

    pub fn is_close_paren(&self) -> bool {
        self.kind == TokenKind::Paren && self.text.starts_with(CLOSE_PAREN_CHAR)
    }
}

/// Zero-based line and column of a character in the source text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub line: usize,
    pub position: usize,
}

impl Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "line {} char {}", self.line, self.position)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TokenAndSpan {
    pub token: Token,
    pub from: Position,
    pub to: Position,
}

impl Display for TokenAndSpan {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(
                formatter,
                "{:?}({:?})[{}]",
                self.token.kind, self.token.text, self.from
            )
        } else {
            write!(
                formatter,
                "{:?}({:?})[{} -> {}]",
                self.token.kind, self.token.text, self.from, self.to
            )
        }
    }
}

#[derive(Clone, Copy)]
struct CharAndPosition {
    chr: Option<char>,
    line: usize,
    position: usize,
}

impl CharAndPosition {
    fn at(&self) -> Position {
        Position {
            line: self.line,
            position: self.position,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("unterminated string starting at {from}")]
    UnterminatedString { from: Position },
    #[error("unrecognized character {chr:?} at {at}")]
    UnrecognizedCharacter { chr: char, at: Position },
}

/// Scans source text left to right with a single cursor, producing one token
/// per call to `get_token`.
pub struct GreedyTokenizer<'a> {
    chars: Chars<'a>,
    line: usize,
    position: usize,
    current_char: CharAndPosition,
    failed: bool,
}

impl<'a> GreedyTokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut tok = GreedyTokenizer {
            chars: input.chars(),
            line: 0,
            position: 0,
            current_char: CharAndPosition {
                chr: None,
                line: 0,
                position: 0,
            },
            failed: false,
        };

        // start it off
        tok.step_next_char();

        tok
    }

    fn step_next_char(&mut self) {
        match self.chars.next() {
            Some(chr) => {
                self.current_char = CharAndPosition {
                    chr: Some(chr),
                    line: self.line,
                    position: self.position,
                };

                self.position += 1;
                if chr == '\n' {
                    self.line += 1;
                    self.position = 0;
                }
            }
            None => {
                self.current_char = CharAndPosition {
                    chr: None,
                    line: self.line,
                    position: self.position,
                };
            }
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    pub fn get_token(&mut self) -> Result<Option<TokenAndSpan>, TokenizerError> {
        let mut tok = self.current_char;

        // remove any whitespace
        while matches_class(&tok, char::is_whitespace) {
            self.step_next_char();
            tok = self.current_char;
        }

        let chr = match tok.chr {
            Some(chr) => chr,
            None => return Ok(None),
        };

        // find parens
        if chr == OPEN_PAREN_CHAR || chr == CLOSE_PAREN_CHAR {
            self.step_next_char();
            return Ok(Some(TokenAndSpan {
                token: Token::new(TokenKind::Paren, chr.to_string()),
                from: tok.at(),
                to: tok.at(),
            }));
        }

        // recognizing any numeric things
        if chr.is_ascii_digit() {
            return Ok(Some(self.take_run(TokenKind::Number, |c| c.is_ascii_digit())));
        }

        // string literals, quotes are not part of the text
        if chr == QUOTE_CHAR {
            return self.take_string().map(Some);
        }

        // recognize any names
        if chr.is_ascii_alphabetic() {
            return Ok(Some(
                self.take_run(TokenKind::Name, |c| c.is_ascii_alphabetic()),
            ));
        }

        Err(TokenizerError::UnrecognizedCharacter { chr, at: tok.at() })
    }

    fn take_run(&mut self, kind: TokenKind, class: fn(char) -> bool) -> TokenAndSpan {
        let mut tok = self.current_char;
        let from = tok.at();
        let mut to = from;
        let mut text = String::new();

        while let Some(chr) = tok.chr.filter(|c| class(*c)) {
            text.push(chr);
            to = tok.at();
            self.step_next_char();
            tok = self.current_char;
        }

        TokenAndSpan {
            token: Token::new(kind, text),
            from,
            to,
        }
    }

    fn take_string(&mut self) -> Result<TokenAndSpan, TokenizerError> {
        let from = self.current_char.at();
        let mut text = String::new();

        // step past the opening quote
        self.step_next_char();
        loop {
            let tok = self.current_char;
            match tok.chr {
                Some(QUOTE_CHAR) => {
                    self.step_next_char();
                    return Ok(TokenAndSpan {
                        token: Token::new(TokenKind::String, text),
                        from,
                        to: tok.at(),
                    });
                }
                Some(chr) => {
                    text.push(chr);
                    self.step_next_char();
                }
                None => return Err(TokenizerError::UnterminatedString { from }),
            }
        }
    }
}

impl<'a> Iterator for GreedyTokenizer<'a> {
    type Item = Result<TokenAndSpan, TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.get_token() {
            Ok(Some(token_and_span)) => {
                trace!(token = %token_and_span, "scanned token");
                Some(Ok(token_and_span))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Converts source text into its full token sequence, failing on the first
/// malformed token.
pub fn tokenize(input: &str) -> Result<Vec<TokenAndSpan>, TokenizerError> {
    let tokens = GreedyTokenizer::new(input).collect::<Result<Vec<_>, _>>()?;
    debug!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

fn matches_class(tok: &CharAndPosition, class: fn(char) -> bool) -> bool {
    if let Some(chr) = tok.chr {
        class(chr)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    fn token(kind: TokenKind, text: &str, from: (usize, usize), to: (usize, usize)) -> TokenAndSpan {
        TokenAndSpan {
            token: Token::new(kind, text),
            from: Position {
                line: from.0,
                position: from.1,
            },
            to: Position {
                line: to.0,
                position: to.1,
            },
        }
    }

    #[test]
    fn it_handles_empty_buffer() -> Result<(), TokenizerError> {
        assert_eq!(GreedyTokenizer::new("").get_token()?, None);
        assert_eq!(GreedyTokenizer::new("   \n\t ").get_token()?, None);
        assert_eq!(tokenize("")?, vec![]);

        Ok(())
    }

    #[test]
    fn it_handles_multiple_parens() -> Result<(), TokenizerError> {
        let mut handler = GreedyTokenizer::new("(())");

        // two open parens
        for position in 0..2 {
            assert_eq!(
                handler.get_token()?,
                Some(token(TokenKind::Paren, "(", (0, position), (0, position)))
            );
        }

        // two close parens
        for position in 2..4 {
            assert_eq!(
                handler.get_token()?,
                Some(token(TokenKind::Paren, ")", (0, position), (0, position)))
            );
        }

        // nothing left at the end
        assert_eq!(handler.get_token()?, None);

        Ok(())
    }

    #[rstest]
    #[case("add", TokenKind::Name, "add")]
    #[case("AddThing", TokenKind::Name, "AddThing")]
    #[case("42", TokenKind::Number, "42")]
    #[case("007", TokenKind::Number, "007")]
    #[case("\"hello world\"", TokenKind::String, "hello world")]
    #[case("\"\"", TokenKind::String, "")]
    fn it_scans_single_tokens(#[case] input: &str, #[case] kind: TokenKind, #[case] text: &str) {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, Token::new(kind, text));
    }

    #[test]
    fn it_splits_runs_on_class_changes() -> Result<(), TokenizerError> {
        let mut handler = GreedyTokenizer::new("abc123def");
        assert_eq!(
            handler.get_token()?,
            Some(token(TokenKind::Name, "abc", (0, 0), (0, 2)))
        );
        assert_eq!(
            handler.get_token()?,
            Some(token(TokenKind::Number, "123", (0, 3), (0, 5)))
        );
        assert_eq!(
            handler.get_token()?,
            Some(token(TokenKind::Name, "def", (0, 6), (0, 8)))
        );
        assert_eq!(handler.get_token()?, None);

        Ok(())
    }

    #[test]
    fn it_tokenizes_a_nested_call() -> Result<(), TokenizerError> {
        let tokens = tokenize("(add 2 (subtract 4 2))")?;
        let kinds_and_text: Vec<(TokenKind, &str)> = tokens
            .iter()
            .map(|t| (t.token.kind, t.token.text.as_str()))
            .collect();

        assert_eq!(
            kinds_and_text,
            vec![
                (TokenKind::Paren, "("),
                (TokenKind::Name, "add"),
                (TokenKind::Number, "2"),
                (TokenKind::Paren, "("),
                (TokenKind::Name, "subtract"),
                (TokenKind::Number, "4"),
                (TokenKind::Number, "2"),
                (TokenKind::Paren, ")"),
                (TokenKind::Paren, ")"),
            ]
        );

        Ok(())
    }

    #[test]
    fn it_keeps_string_contents_verbatim() -> Result<(), TokenizerError> {
        let tokens = tokenize("(concat \"a (b) 1\"\n  \"c\")")?;
        assert_eq!(
            tokens[2],
            token(TokenKind::String, "a (b) 1", (0, 8), (0, 16))
        );
        assert_eq!(tokens[3], token(TokenKind::String, "c", (1, 2), (1, 4)));

        Ok(())
    }

    #[test]
    fn it_tracks_lines_across_newlines() -> Result<(), TokenizerError> {
        let tokens = tokenize("(add\n  1\n  2)")?;
        assert_eq!(tokens[2], token(TokenKind::Number, "1", (1, 2), (1, 2)));
        assert_eq!(tokens[4], token(TokenKind::Paren, ")", (2, 3), (2, 3)));

        Ok(())
    }

    #[test]
    fn it_fails_on_unterminated_strings() {
        assert_eq!(
            tokenize("(add \"ab)"),
            Err(TokenizerError::UnterminatedString {
                from: Position {
                    line: 0,
                    position: 5
                }
            })
        );
        assert_eq!(
            tokenize("\""),
            Err(TokenizerError::UnterminatedString {
                from: Position {
                    line: 0,
                    position: 0
                }
            })
        );
    }

    #[rstest]
    #[case("(add 1 +)", '+', 7)]
    #[case("_", '_', 0)]
    #[case("(a 1.5)", '.', 4)]
    #[case("(é)", 'é', 1)]
    fn it_fails_on_unrecognized_characters(
        #[case] input: &str,
        #[case] chr: char,
        #[case] position: usize,
    ) {
        assert_eq!(
            tokenize(input),
            Err(TokenizerError::UnrecognizedCharacter {
                chr,
                at: Position { line: 0, position }
            })
        );
    }

    #[test]
    fn it_stops_iterating_after_an_error() {
        let mut handler = GreedyTokenizer::new("( ? a");
        assert!(matches!(handler.next(), Some(Ok(_))));
        assert!(matches!(handler.next(), Some(Err(_))));
        assert!(handler.next().is_none());
    }

    #[test]
    fn it_displays_tokens_with_their_span() {
        assert_eq!(
            token(TokenKind::Paren, "(", (0, 0), (0, 0)).to_string(),
            "Paren(\"(\")[line 0 char 0]"
        );
        assert_eq!(
            token(TokenKind::Name, "add", (1, 1), (1, 3)).to_string(),
            "Name(\"add\")[line 1 char 1 -> line 1 char 3]"
        );
    }
}
