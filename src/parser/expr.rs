use crate::analyzer::{BinOpKind, Ty};
use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};

use super::parser::{type_of, EXPR_START};
use super::{Label, Node, Parser, Rule};

impl Parser {
    /// expr = equality ("&&" equality)*
    pub(super) fn parse_expr(&mut self) -> Node {
        self.apply(Rule::Expr);
        let mut node = Node::new(Label::Expr);
        let first = self.parse_equality();
        let mut ty = type_of(&first);
        node.push(first);

        while self.check(TokenKind::DoubleAmpersand) {
            self.apply(Rule::AndTail);
            let op = self.advance();
            node.push(Node::terminal(op.kind));
            let rhs = self.parse_equality();
            ty = self.binary(BinOpKind::LogicalAnd, op.line, ty, type_of(&rhs));
            node.push(rhs);
        }
        self.apply(Rule::AndTailEmpty);

        node.typed(ty)
    }

    /// equality = additive ("==" additive)*
    fn parse_equality(&mut self) -> Node {
        self.apply(Rule::Equality);
        let mut node = Node::new(Label::Equality);
        let first = self.parse_additive();
        let mut ty = type_of(&first);
        node.push(first);

        while self.check(TokenKind::DoubleEqual) {
            self.apply(Rule::EqTail);
            let op = self.advance();
            node.push(Node::terminal(op.kind));
            let rhs = self.parse_additive();
            ty = self.binary(BinOpKind::Equal, op.line, ty, type_of(&rhs));
            node.push(rhs);
        }
        self.apply(Rule::EqTailEmpty);

        node.typed(ty)
    }

    /// additive = primary ("+" primary)*
    fn parse_additive(&mut self) -> Node {
        self.apply(Rule::Additive);
        let mut node = Node::new(Label::Additive);
        let first = self.parse_primary();
        let mut ty = type_of(&first);
        node.push(first);

        while self.check(TokenKind::Plus) {
            self.apply(Rule::AddTail);
            let op = self.advance();
            node.push(Node::terminal(op.kind));
            let rhs = self.parse_primary();
            ty = self.binary(BinOpKind::Add, op.line, ty, type_of(&rhs));
            node.push(rhs);
        }
        self.apply(Rule::AddTailEmpty);

        node.typed(ty)
    }

    /// primary = id call-suffix | "(" expr ")" | literal | "true" | "false"
    fn parse_primary(&mut self) -> Node {
        let mut node = Node::new(Label::Primary);
        let ty = match self.peek_kind() {
            TokenKind::Ident => {
                self.apply(Rule::PrimaryIdent);
                let id = self.advance();
                node.push(Node::ident(&id.lexeme));
                let suffix = self.parse_call_suffix(&id);
                let ty = type_of(&suffix);
                node.push(suffix);
                ty
            }
            TokenKind::OpenParen => {
                self.apply(Rule::PrimaryParen);
                self.advance();
                node.push(Node::terminal(TokenKind::OpenParen));
                let expr = self.parse_expr();
                let ty = type_of(&expr);
                node.push(expr);
                self.expect_into(&mut node, TokenKind::CloseParen);
                ty
            }
            TokenKind::IntLiteral => self.literal(&mut node, Rule::PrimaryInt, Ty::Int),
            TokenKind::RealLiteral => self.literal(&mut node, Rule::PrimaryReal, Ty::Real),
            TokenKind::StringLiteral => self.literal(&mut node, Rule::PrimaryString, Ty::Str),
            TokenKind::True | TokenKind::False => {
                let rule = if self.check(TokenKind::True) {
                    Rule::PrimaryTrue
                } else {
                    Rule::PrimaryFalse
                };
                self.apply(rule);
                let kind = self.advance().kind;
                node.push(Node::terminal(kind));
                Ty::Bool
            }
            _ => {
                let found = self.peek().describe();
                self.syntax_error(SyntaxError::InvalidExpression(found));
                Ty::Error
            }
        };
        node.typed(ty)
    }

    fn literal(&mut self, node: &mut Node, rule: Rule, ty: Ty) -> Ty {
        self.apply(rule);
        let token = self.advance();
        node.push(Node::new(Label::Literal(token.kind, token.lexeme)));
        ty
    }

    /// call-suffix = "(" args ")" | ε
    ///
    /// Without a call the identifier is a variable reference.
    fn parse_call_suffix(&mut self, id: &Token) -> Node {
        let mut node = Node::new(Label::CallSuffix);
        let ty = if self.check(TokenKind::OpenParen) {
            self.apply(Rule::CallSuffix);
            let args = self.parse_call_args(&mut node);
            self.check_call(id, &args)
        } else {
            self.apply(Rule::CallSuffixEmpty);
            self.resolve_variable(id)
        };
        node.typed(ty)
    }

    /// "(" args ")", returning the argument types.
    pub(super) fn parse_call_args(&mut self, node: &mut Node) -> Vec<Ty> {
        self.expect_into(node, TokenKind::OpenParen);
        let args = self.parse_args();
        let types = args.types().map(<[Ty]>::to_vec).unwrap_or_default();
        node.push(args);
        self.expect_into(node, TokenKind::CloseParen);
        types
    }

    /// args = (expr ("," expr)*)?
    fn parse_args(&mut self) -> Node {
        let mut node = Node::new(Label::Args);
        let mut types = vec![];

        if self.check_any(EXPR_START) {
            self.apply(Rule::Args);
            loop {
                let expr = self.parse_expr();
                types.push(type_of(&expr));
                node.push(expr);
                if self.check(TokenKind::Comma) {
                    self.apply(Rule::ArgsTail);
                    self.advance();
                    node.push(Node::terminal(TokenKind::Comma));
                } else {
                    self.apply(Rule::ArgsTailEmpty);
                    break;
                }
            }
        } else {
            self.apply(Rule::ArgsEmpty);
        }

        node.with_types(types)
    }
}
