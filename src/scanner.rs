use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::ScanError;
use crate::literal::Literal;
use crate::token::{Location, Token, TokenKind};

/// Converts source text into a token stream. Accumulates recoverable
/// [`ScanError`]s rather than stopping at the first bad character, so a
/// single run surfaces every lexical problem at once.
pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_location: Location,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_location: Location::new(1, 1),
        }
    }

    /// Scans the whole source, returning the token list (terminated by a
    /// single `EOF`) and any errors accumulated along the way.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_location = Location::new(self.line, self.column);
            self.scan_token();
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            None,
            Location::new(self.line, self.column),
        ));

        (self.tokens, self.errors)
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.chars.peek_nth(1).copied()
    }

    /// Consumes and returns the next character, updating line/column.
    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("advance called at end of source");
        self.current += 1;

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> String {
        self.source.substring(self.start, self.current).to_string()
    }

    fn add_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.start_location));
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ScanError { location: self.start_location, message: message.into() });
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenKind::LeftParen, None),
            ')' => self.add_token(TokenKind::RightParen, None),
            '{' => self.add_token(TokenKind::LeftBrace, None),
            '}' => self.add_token(TokenKind::RightBrace, None),
            ',' => self.add_token(TokenKind::Comma, None),
            '.' => self.add_token(TokenKind::Dot, None),
            '-' => self.add_token(TokenKind::Minus, None),
            '+' => self.add_token(TokenKind::Plus, None),
            ';' => self.add_token(TokenKind::Semicolon, None),
            '*' => self.add_token(TokenKind::Star, None),
            '%' => self.add_token(TokenKind::Percent, None),

            '!' => {
                let kind = if self.match_char('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.add_token(kind, None);
            }
            '=' => {
                let kind = if self.match_char('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.add_token(kind, None);
            }
            '<' => {
                let kind = if self.match_char('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.add_token(kind, None);
            }
            '>' => {
                let kind = if self.match_char('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.add_token(kind, None);
            }
            '/' => {
                if self.match_char('/') {
                    while self.peek() != Some('\n') && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash, None);
                }
            }

            ' ' | '\t' | '\r' | '\n' => {}

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            other => self.error(format!("unexpected character '{other}'")),
        }
    }

    /// Decodes `\n \t \\ \"`; any other `\x` is preserved as the two raw
    /// characters since the language defines no other escapes.
    fn string(&mut self) {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.advance();

            if c == '\\' {
                match self.peek() {
                    Some('n') => {
                        self.advance();
                        value.push('\n');
                    }
                    Some('t') => {
                        self.advance();
                        value.push('\t');
                    }
                    Some('\\') => {
                        self.advance();
                        value.push('\\');
                    }
                    Some('"') => {
                        self.advance();
                        value.push('"');
                    }
                    _ => value.push('\\'),
                }
            } else {
                value.push(c);
            }
        }

        if self.is_at_end() {
            self.error("unterminated string");
            return;
        }

        self.advance(); // closing quote
        self.add_token(TokenKind::String, Some(Literal::Str(value)));
    }

    fn number(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme = self.lexeme();
        let value: f64 = lexeme.parse().expect("scanned digits to parse as a float");
        self.add_token(TokenKind::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = self.lexeme();
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, None);
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    Some(match text {
        "and" => TokenKind::And,
        "class" => TokenKind::Class,
        "else" => TokenKind::Else,
        "false" => TokenKind::False,
        "fn" => TokenKind::Fn,
        "for" => TokenKind::For,
        "if" => TokenKind::If,
        "let" => TokenKind::Let,
        "nil" => TokenKind::Nil,
        "or" => TokenKind::Or,
        "print" => TokenKind::Print,
        "return" => TokenKind::Return,
        "super" => TokenKind::Super,
        "this" => TokenKind::This,
        "true" => TokenKind::True,
        "while" => TokenKind::While,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "unexpected scan errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_punctuation_and_operators() {
        assert_eq!(
            kinds("( ) { } , . - + ; * % ! != = == < <= > >="),
            vec![
                TokenKind::LeftParen, TokenKind::RightParen, TokenKind::LeftBrace, TokenKind::RightBrace,
                TokenKind::Comma, TokenKind::Dot, TokenKind::Minus, TokenKind::Plus, TokenKind::Semicolon,
                TokenKind::Star, TokenKind::Percent, TokenKind::Bang, TokenKind::BangEqual, TokenKind::Equal,
                TokenKind::EqualEqual, TokenKind::Less, TokenKind::LessEqual, TokenKind::Greater,
                TokenKind::GreaterEqual, TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comment_runs_to_newline() {
        let (tokens, errors) = Scanner::new("1 // comment\n2").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].location.line, 2);
    }

    #[test]
    fn decodes_string_escapes() {
        let (tokens, errors) = Scanner::new(r#""a\nb\t\"\\c""#).scan_tokens();
        assert!(errors.is_empty());
        match &tokens[0].literal {
            Some(Literal::Str(s)) => assert_eq!(s, "a\nb\t\"\\c"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn preserves_unknown_escape_literally() {
        let (tokens, errors) = Scanner::new(r#""\x""#).scan_tokens();
        assert!(errors.is_empty());
        match &tokens[0].literal {
            Some(Literal::Str(s)) => assert_eq!(s, "\\x"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_errors_and_emits_no_token() {
        let (tokens, errors) = Scanner::new("\"abc").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.len(), 1); // just EOF
    }

    #[test]
    fn scans_number_with_fraction() {
        let (tokens, errors) = Scanner::new("12.34").scan_tokens();
        assert!(errors.is_empty());
        match &tokens[0].literal {
            Some(Literal::Number(n)) => assert_eq!(*n, 12.34),
            other => panic!("expected number literal, got {other:?}"),
        }
    }

    #[test]
    fn dot_without_trailing_digit_is_not_consumed() {
        let (tokens, errors) = Scanner::new("12.").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("fn let nil print myVar"),
            vec![TokenKind::Fn, TokenKind::Let, TokenKind::Nil, TokenKind::Print, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn accumulates_multiple_errors_without_stopping() {
        let (_, errors) = Scanner::new("@ # $").scan_tokens();
        assert_eq!(errors.len(), 3);
    }
}
