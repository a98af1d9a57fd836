use std::fmt;

use phf::phf_map;

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "boolean" => TokenKind::BooleanType,
    "float" => TokenKind::FloatType,
    "for" => TokenKind::For,
    "function" => TokenKind::Function,
    "if" => TokenKind::If,
    "int" => TokenKind::IntType,
    "let" => TokenKind::Let,
    "read" => TokenKind::Read,
    "return" => TokenKind::Return,
    "string" => TokenKind::StringType,
    "void" => TokenKind::VoidType,
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "write" => TokenKind::Write,
};

pub static TWO_SYMBOLS_TOKENS: phf::Map<&'static str, TokenKind> = phf_map! {
    "++" => TokenKind::Increment,
    "==" => TokenKind::DoubleEqual,
    "&&" => TokenKind::DoubleAmpersand,
    "/=" => TokenKind::SlashEqual,
};

pub static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Plus,
    '=' => TokenKind::Equal,
    ',' => TokenKind::Comma,
    ';' => TokenKind::SemiColon,
    '(' => TokenKind::OpenParen,
    ')' => TokenKind::CloseParen,
    '{' => TokenKind::OpenCurlyBrace,
    '}' => TokenKind::CloseCurlyBrace,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    BooleanType,
    FloatType,
    IntType,
    StringType,
    VoidType,
    For,
    Function,
    If,
    Let,
    Read,
    Return,
    Write,
    True,
    False,

    Ident,
    IntLiteral,
    RealLiteral,
    StringLiteral,

    Plus,
    Increment,
    Equal,
    DoubleEqual,
    DoubleAmpersand,
    SlashEqual,

    Comma,
    SemiColon,
    OpenParen,
    CloseParen,
    OpenCurlyBrace,
    CloseCurlyBrace,

    Eof,
}

impl TokenKind {
    /// Tag used in token listings.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::BooleanType => "boolean",
            TokenKind::FloatType => "float",
            TokenKind::IntType => "int",
            TokenKind::StringType => "string",
            TokenKind::VoidType => "void",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Let => "let",
            TokenKind::Read => "read",
            TokenKind::Return => "return",
            TokenKind::Write => "write",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Ident => "id",
            TokenKind::IntLiteral => "ent",
            TokenKind::RealLiteral => "real",
            TokenKind::StringLiteral => "cad",
            TokenKind::Plus => "+",
            TokenKind::Increment => "++",
            TokenKind::Equal => "=",
            TokenKind::DoubleEqual => "==",
            TokenKind::DoubleAmpersand => "&&",
            TokenKind::SlashEqual => "/=",
            TokenKind::Comma => ",",
            TokenKind::SemiColon => ";",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurlyBrace => "{",
            TokenKind::CloseCurlyBrace => "}",
            TokenKind::Eof => "EOF",
        }
    }

    /// Human readable form for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident => "an identifier",
            TokenKind::IntLiteral => "an integer literal",
            TokenKind::RealLiteral => "a real literal",
            TokenKind::StringLiteral => "a string literal",
            TokenKind::Eof => "end of file",
            TokenKind::BooleanType => "'boolean'",
            TokenKind::FloatType => "'float'",
            TokenKind::IntType => "'int'",
            TokenKind::StringType => "'string'",
            TokenKind::VoidType => "'void'",
            TokenKind::For => "'for'",
            TokenKind::Function => "'function'",
            TokenKind::If => "'if'",
            TokenKind::Let => "'let'",
            TokenKind::Read => "'read'",
            TokenKind::Return => "'return'",
            TokenKind::Write => "'write'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Plus => "'+'",
            TokenKind::Increment => "'++'",
            TokenKind::Equal => "'='",
            TokenKind::DoubleEqual => "'=='",
            TokenKind::DoubleAmpersand => "'&&'",
            TokenKind::SlashEqual => "'/='",
            TokenKind::Comma => "','",
            TokenKind::SemiColon => "';'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenCurlyBrace => "'{'",
            TokenKind::CloseCurlyBrace => "'}'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    /// 1-based position in the name table, identifiers only.
    pub symbol: Option<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
            symbol: None,
        }
    }

    pub fn eof(line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, "", line, column)
    }

    /// What a diagnostic should call this token.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident
            | TokenKind::IntLiteral
            | TokenKind::RealLiteral
            | TokenKind::StringLiteral => format!("'{}'", self.lexeme),
            kind => kind.describe().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.symbol) {
            (TokenKind::Ident, Some(position)) => write!(f, "<{},{}>", self.lexeme, position),
            (kind, _) => write!(f, "<{}, {}>", kind, self.lexeme),
        }
    }
}
