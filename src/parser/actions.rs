//! Semantic actions run by the productions once their children are typed.
//!
//! Every check here stays silent when one of its inputs is already `Error`:
//! that input was diagnosed where it was produced.

use crate::analyzer::{BinOpKind, Symbol, Ty};
use crate::diagnostics::SemanticError;
use crate::lexer::{Token, TokenKind};

use super::Parser;

fn type_list(types: &[Ty]) -> String {
    types
        .iter()
        .map(Ty::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Parser {
    /// Type of a variable reference. Undeclared names are reported here, once.
    pub(super) fn resolve_variable(&mut self, id: &Token) -> Ty {
        match self.symbols.lookup(&id.lexeme).cloned() {
            Some(Symbol::Variable { ty, .. }) => ty,
            Some(Symbol::Function { .. }) => {
                self.semantic_error(id.line, SemanticError::NotAVariable(id.lexeme.clone()));
                Ty::Error
            }
            None => {
                self.semantic_error(id.line, SemanticError::Undeclared(id.lexeme.clone()));
                Ty::Error
            }
        }
    }

    /// `id = value` and `id /= value`.
    pub(super) fn check_assignment(&mut self, id: &Token, op: TokenKind, value: Ty) -> Ty {
        let target = self.resolve_variable(id);
        if target.is_error() || value.is_error() {
            return Ty::Error;
        }

        if op == TokenKind::SlashEqual && !target.is_numeric() {
            self.semantic_error(
                id.line,
                SemanticError::InvalidOperand {
                    op: "/=",
                    found: target,
                },
            );
            return Ty::Error;
        }
        if target != value {
            self.semantic_error(
                id.line,
                SemanticError::TypeMismatch {
                    name: id.lexeme.clone(),
                    expected: target,
                    found: value,
                },
            );
            return Ty::Error;
        }
        Ty::Ok
    }

    pub(super) fn check_increment(&mut self, id: &Token) -> Ty {
        let target = self.resolve_variable(id);
        if target.is_error() {
            return Ty::Error;
        }
        if !target.is_numeric() {
            self.semantic_error(
                id.line,
                SemanticError::InvalidOperand {
                    op: "++",
                    found: target,
                },
            );
            return Ty::Error;
        }
        Ty::Ok
    }

    /// Return type of `id(args)`, or `Error`.
    pub(super) fn check_call(&mut self, id: &Token, args: &[Ty]) -> Ty {
        let (ret, params) = match self.symbols.lookup(&id.lexeme).cloned() {
            Some(Symbol::Function { ret, params }) => (ret, params),
            Some(Symbol::Variable { .. }) => {
                self.semantic_error(id.line, SemanticError::NotAFunction(id.lexeme.clone()));
                return Ty::Error;
            }
            None => {
                self.semantic_error(id.line, SemanticError::Undeclared(id.lexeme.clone()));
                return Ty::Error;
            }
        };

        if args.iter().chain(&params).any(Ty::is_error) {
            return Ty::Error;
        }
        if args != params.as_slice() {
            self.semantic_error(
                id.line,
                SemanticError::ArityOrTypeMismatch {
                    name: id.lexeme.clone(),
                    expected: type_list(&params),
                    found: type_list(args),
                },
            );
            return Ty::Error;
        }
        ret
    }

    /// A `return` statement met inside a body, checked against the enclosing
    /// function.
    pub(super) fn check_return(&mut self, line: usize, value: Ty) -> Ty {
        let Some((name, ret)) = self.function.clone() else {
            self.semantic_error(line, SemanticError::ReturnOutsideFunction);
            return Ty::Error;
        };
        if value.is_error() || ret.is_error() {
            return Ty::Error;
        }
        if value != ret {
            self.semantic_error(
                line,
                SemanticError::ReturnTypeMismatch {
                    name,
                    expected: ret,
                    found: value,
                },
            );
            return Ty::Error;
        }
        Ty::Ok
    }

    pub(super) fn check_condition(&mut self, keyword: &'static str, line: usize, ty: Ty) -> bool {
        match ty {
            Ty::Bool => true,
            Ty::Error => false,
            found => {
                self.semantic_error(line, SemanticError::BadConditionType { keyword, found });
                false
            }
        }
    }

    pub(super) fn binary(&mut self, op: BinOpKind, line: usize, left: Ty, right: Ty) -> Ty {
        match op.result_type(left, right) {
            Ok(ty) => ty,
            Err(()) => {
                self.semantic_error(
                    line,
                    SemanticError::InvalidOperands {
                        op: op.symbol(),
                        left,
                        right,
                    },
                );
                Ty::Error
            }
        }
    }
}
