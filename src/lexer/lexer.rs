use std::collections::HashMap;

use log::debug;

use crate::diagnostics::{Diagnostics, LexicalError};

use super::{Token, TokenKind, KEYWORDS, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS};

const MAX_INT: i64 = 32767;
const MAX_REAL: f64 = 117549436.0;

#[derive(Debug)]
pub struct Lexer<'a> {
    chars: Vec<char>,
    tokens: Vec<Token>,
    names: HashMap<String, usize>,
    index: usize,
    line: usize,
    column: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Lexer<'a> {
    fn new(source: &str, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            chars: source.chars().collect(),
            tokens: vec![],
            names: HashMap::new(),
            index: 0,
            line: 1,
            column: 1,
            diagnostics,
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.index + ahead).copied()
    }

    fn bump(&mut self) {
        if self.peek(0) == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.index += 1;
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek(0).filter(|&c| f(c)) {
            s.push(c);
            self.bump();
        }
        s
    }

    fn new_token(&mut self, kind: TokenKind, s: &str) {
        self.tokens.push(Token::new(kind, s, self.line, self.column));
        for _ in s.chars() {
            self.bump();
        }
    }

    fn error(&mut self, line: usize, error: LexicalError) {
        self.diagnostics.lexical(line, error);
    }

    fn parse_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut s = self.take_while(|c| c.is_ascii_digit());
        let is_real = self.peek(0) == Some('.');
        if is_real {
            self.bump();
            s.push('.');
            let fraction = self.take_while(|c| c.is_ascii_digit());
            if fraction.is_empty() {
                return self.error(line, LexicalError::InvalidNumber(s));
            }
            s.push_str(&fraction);
        }

        let kind = if is_real {
            match s.parse::<f64>() {
                Ok(value) if value > MAX_REAL => {
                    return self.error(line, LexicalError::RealTooLarge(s));
                }
                _ => TokenKind::RealLiteral,
            }
        } else {
            match s.parse::<i64>() {
                Ok(value) if value > MAX_INT => {
                    return self.error(line, LexicalError::IntegerTooLarge(s));
                }
                Ok(_) => TokenKind::IntLiteral,
                Err(_) => return self.error(line, LexicalError::IntegerTooLarge(s)),
            }
        };
        self.tokens.push(Token::new(kind, s, line, column));
    }

    fn parse_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let s = self.take_while(|c| c.is_alphanumeric() || c == '_');

        if let Some(kind) = KEYWORDS.get(s.as_str()) {
            self.tokens.push(Token::new(*kind, s, line, column));
        } else {
            let next = self.names.len() + 1;
            let position = *self.names.entry(s.clone()).or_insert(next);
            let mut token = Token::new(TokenKind::Ident, s, line, column);
            token.symbol = Some(position);
            self.tokens.push(token);
        }
    }

    fn parse_string(&mut self) {
        let (line, column) = (self.line, self.column);
        self.bump();
        let s = self.take_while(|c| c != '\'');
        if self.peek(0) == Some('\'') {
            self.bump();
            self.tokens
                .push(Token::new(TokenKind::StringLiteral, s, line, column));
        } else {
            self.error(line, LexicalError::UnterminatedString);
        }
    }

    fn skip_line_comment(&mut self) {
        self.take_while(|c| c != '\n');
    }

    fn skip_block_comment(&mut self) {
        let line = self.line;
        self.bump();
        self.bump();
        while self.index < self.chars.len() {
            if self.peek(0) == Some('*') && self.peek(1) == Some('/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
        self.error(line, LexicalError::UnterminatedComment);
    }

    fn _tokenize(&mut self) {
        while let Some(c) = self.peek(0) {
            let c2: String = self.chars[self.index..].iter().take(2).collect();

            if c.is_whitespace() {
                self.bump();
            } else if c.is_ascii_digit() {
                self.parse_number();
            } else if c.is_alphabetic() || c == '_' {
                self.parse_identifier();
            } else if c == '\'' {
                self.parse_string();
            } else if c2 == "//" {
                self.skip_line_comment();
            } else if c2 == "/*" {
                self.skip_block_comment();
            } else if let Some(kind) = TWO_SYMBOLS_TOKENS.get(c2.as_str()) {
                self.new_token(*kind, &c2);
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(*kind, &c.to_string());
            } else {
                self.error(self.line, LexicalError::UnrecognizedChar(c));
                self.bump();
            }
        }
        self.tokens.push(Token::eof(self.line, self.column));
    }

    /// Scans `source` into a token stream that always ends with `Eof`.
    ///
    /// Lexical errors go to `diagnostics`; the offending characters produce no
    /// token and scanning resumes right after them.
    pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut lexer = Lexer::new(source, diagnostics);
        lexer._tokenize();
        debug!(
            "tokenized {} tokens, {} distinct names",
            lexer.tokens.len(),
            lexer.names.len()
        );

        lexer.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Cause, DiagnosticKind};
    use rstest::rstest;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut diagnostics = Diagnostics::new();
        Lexer::tokenize(source, &mut diagnostics)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[rstest]
    #[case("let int a;", vec![TokenKind::Let, TokenKind::IntType, TokenKind::Ident, TokenKind::SemiColon, TokenKind::Eof])]
    #[case("a /= 2.5;", vec![TokenKind::Ident, TokenKind::SlashEqual, TokenKind::RealLiteral, TokenKind::SemiColon, TokenKind::Eof])]
    #[case("i++", vec![TokenKind::Ident, TokenKind::Increment, TokenKind::Eof])]
    #[case("a == b && c + 1", vec![TokenKind::Ident, TokenKind::DoubleEqual, TokenKind::Ident, TokenKind::DoubleAmpersand, TokenKind::Ident, TokenKind::Plus, TokenKind::IntLiteral, TokenKind::Eof])]
    #[case("write 'hi' // trailing\n", vec![TokenKind::Write, TokenKind::StringLiteral, TokenKind::Eof])]
    #[case("/* a\n b */ true", vec![TokenKind::True, TokenKind::Eof])]
    #[case("", vec![TokenKind::Eof])]
    fn test_kinds(#[case] source: &str, #[case] expected: Vec<TokenKind>) {
        assert_eq!(kinds(source), expected);
    }

    #[test]
    fn identifiers_are_interned_in_order() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::tokenize("b a b", &mut diagnostics);
        let positions: Vec<_> = tokens.iter().map(|t| t.symbol).collect();
        assert_eq!(positions, vec![Some(1), Some(2), Some(1), None]);
    }

    #[test]
    fn lines_are_tracked() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::tokenize("let\n'a\nb'\nx", &mut diagnostics);
        let lines: Vec<_> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 4, 4]);
    }

    #[rstest]
    #[case("let int @a;", LexicalError::UnrecognizedChar('@'))]
    #[case("a & b", LexicalError::UnrecognizedChar('&'))]
    #[case("a / b", LexicalError::UnrecognizedChar('/'))]
    #[case("a = 40000;", LexicalError::IntegerTooLarge("40000".to_string()))]
    #[case("a = 999999999.5;", LexicalError::RealTooLarge("999999999.5".to_string()))]
    #[case("a = 12.;", LexicalError::InvalidNumber("12.".to_string()))]
    #[case("a = 'open", LexicalError::UnterminatedString)]
    #[case("/* never closed", LexicalError::UnterminatedComment)]
    fn test_lexical_errors(#[case] source: &str, #[case] expected: LexicalError) {
        let mut diagnostics = Diagnostics::new();
        Lexer::tokenize(source, &mut diagnostics);
        let errors: Vec<_> = diagnostics.iter().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), DiagnosticKind::Lexical);
        assert_eq!(errors[0].cause, Cause::Lexical(expected));
    }

    #[test]
    fn real_without_fraction_yields_no_token() {
        assert_eq!(
            kinds("a = 12.;"),
            vec![TokenKind::Ident, TokenKind::Equal, TokenKind::SemiColon, TokenKind::Eof]
        );
    }

    #[test]
    fn scanning_resumes_after_an_error() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::tokenize("let int j#;", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens.len(), 5);
    }
}
