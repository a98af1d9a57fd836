use std::fmt;

use thiserror::Error;

use crate::analyzer::Ty;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntactic,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Lexical => "LÉXICO",
            DiagnosticKind::Syntactic => "SINTÁCTICO",
            DiagnosticKind::Semantic => "SEMÁNTICO",
        };
        f.write_str(s)
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum LexicalError {
    #[error("unrecognized character '{0}'")]
    UnrecognizedChar(char),
    #[error("integer literal too large: {0}")]
    IntegerTooLarge(String),
    #[error("real literal too large: {0}")]
    RealTooLarge(String),
    #[error("malformed number: {0}")]
    InvalidNumber(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
    },
    #[error("expected a type, found {0}")]
    InvalidType(String),
    #[error("expected an expression, found {0}")]
    InvalidExpression(String),
    #[error("expected a statement, found {0}")]
    InvalidStatement(String),
    #[error("expected an assignment or a call after '{0}'")]
    ExpectedAssignOrCall(String),
    #[error("unexpected {0}")]
    Unexpected(String),
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SemanticError {
    #[error("'{0}' is already declared in this scope")]
    Redeclaration(String),
    #[error("'{0}' is not declared")]
    Undeclared(String),
    #[error("condition of '{keyword}' must be BOOLEAN, found {found}")]
    BadConditionType { keyword: &'static str, found: Ty },
    #[error("incompatible types in assignment to '{name}': {expected} and {found}")]
    TypeMismatch { name: String, expected: Ty, found: Ty },
    #[error("wrong arguments in call to '{name}': expected ({expected}), found ({found})")]
    ArityOrTypeMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("wrong return in function '{name}': expected {expected}, found {found}")]
    ReturnTypeMismatch { name: String, expected: Ty, found: Ty },
    #[error("'return' outside of a function body")]
    ReturnOutsideFunction,
    #[error("'{0}' is not a function")]
    NotAFunction(String),
    #[error("'{0}' is not a variable")]
    NotAVariable(String),
    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    InvalidOperands {
        op: &'static str,
        left: Ty,
        right: Ty,
    },
    #[error("operator '{op}' cannot be applied to {found}")]
    InvalidOperand { op: &'static str, found: Ty },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cause {
    Lexical(LexicalError),
    Syntactic(SyntaxError),
    Semantic(SemanticError),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Lexical(e) => e.fmt(f),
            Cause::Syntactic(e) => e.fmt(f),
            Cause::Semantic(e) => e.fmt(f),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub cause: Cause,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self.cause {
            Cause::Lexical(_) => DiagnosticKind::Lexical,
            Cause::Syntactic(_) => DiagnosticKind::Syntactic,
            Cause::Semantic(_) => DiagnosticKind::Semantic,
        }
    }

    pub fn message(&self) -> String {
        self.cause.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ERROR {} - Línea {}]: {}",
            self.kind(),
            self.line,
            self.cause
        )
    }
}

/// Append-only log shared by the lexer and the parser of one compilation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: usize, cause: Cause) {
        log::debug!("diagnostic at line {}: {}", line, cause);
        self.items.push(Diagnostic { line, cause });
    }

    pub fn lexical(&mut self, line: usize, error: LexicalError) {
        self.push(line, Cause::Lexical(error));
    }

    pub fn syntactic(&mut self, line: usize, error: SyntaxError) {
        self.push(line, Cause::Syntactic(error));
    }

    pub fn semantic(&mut self, line: usize, error: SemanticError) {
        self.push(line, Cause::Semantic(error));
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind() == kind)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.items {
            writeln!(f, "{}", d)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        Cause::Lexical(LexicalError::UnrecognizedChar('@')),
        "[ERROR LÉXICO - Línea 3]: unrecognized character '@'"
    )]
    #[case(
        Cause::Syntactic(SyntaxError::Expected { expected: "';'", found: "'}'".to_string() }),
        "[ERROR SINTÁCTICO - Línea 3]: expected ';', found '}'"
    )]
    #[case(
        Cause::Semantic(SemanticError::Redeclaration("a".to_string())),
        "[ERROR SEMÁNTICO - Línea 3]: 'a' is already declared in this scope"
    )]
    fn test_render(#[case] cause: Cause, #[case] expected: &str) {
        let d = Diagnostic { line: 3, cause };
        assert_eq!(d.to_string(), expected);
    }

    #[test]
    fn sink_is_append_only() {
        let mut sink = Diagnostics::new();
        assert!(!sink.has_errors());
        sink.lexical(1, LexicalError::UnterminatedString);
        sink.semantic(2, SemanticError::Undeclared("x".to_string()));
        assert!(sink.has_errors());
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.of_kind(DiagnosticKind::Semantic).count(), 1);
        assert_eq!(sink.iter().next().map(|d| d.line), Some(1));
    }
}
