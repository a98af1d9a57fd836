use log::trace;

use crate::analyzer::{SymbolTable, Ty};
use crate::diagnostics::{Diagnostics, SemanticError, SyntaxError};
use crate::lexer::{Token, TokenKind};

use super::{Label, Node, Rule};

/// Tokens that can start a block at program level.
const BLOCK_START: &[TokenKind] = &[
    TokenKind::Let,
    TokenKind::If,
    TokenKind::For,
    TokenKind::Ident,
    TokenKind::Write,
    TokenKind::Read,
    TokenKind::Return,
];

/// A function body leaves `return` to the trailing return of the definition.
const FUNCTION_BODY_START: &[TokenKind] = &[
    TokenKind::Let,
    TokenKind::If,
    TokenKind::For,
    TokenKind::Ident,
    TokenKind::Write,
    TokenKind::Read,
];

pub(super) const TYPE_START: &[TokenKind] = &[
    TokenKind::IntType,
    TokenKind::FloatType,
    TokenKind::BooleanType,
    TokenKind::StringType,
];

pub(super) const EXPR_START: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::OpenParen,
    TokenKind::IntLiteral,
    TokenKind::RealLiteral,
    TokenKind::StringLiteral,
    TokenKind::True,
    TokenKind::False,
];

/// Everything one run of the parser produces.
#[derive(Debug)]
pub struct Analysis {
    pub ast: Node,
    pub diagnostics: Diagnostics,
    pub symbols: SymbolTable,
    pub rules: Vec<Rule>,
}

/// Recursive-descent parser that type-checks while it builds the tree.
///
/// One instance handles exactly one compilation unit and owns its symbol
/// table and diagnostics for the whole run.
#[derive(Debug)]
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) index: usize,
    pub(super) diagnostics: Diagnostics,
    pub(super) symbols: SymbolTable,
    pub(super) rules: Vec<Rule>,
    /// Name and return type of the function whose body is being parsed.
    pub(super) function: Option<(String, Ty)>,
}

pub(super) fn type_of(node: &Node) -> Ty {
    node.ty().unwrap_or(Ty::Error)
}

impl Parser {
    /// `diagnostics` usually already holds what the lexer reported.
    pub fn new(mut tokens: Vec<Token>, diagnostics: Diagnostics) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::eof(line, 0));
        }
        Self {
            tokens,
            index: 0,
            diagnostics,
            symbols: SymbolTable::new(),
            rules: vec![],
            function: None,
        }
    }

    pub fn parse(mut self) -> Analysis {
        self.symbols.reset();
        let ast = self.parse_unit();

        Analysis {
            ast,
            diagnostics: self.diagnostics,
            symbols: self.symbols,
            rules: self.rules,
        }
    }

    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.index]
    }

    pub(super) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.index + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(super) fn is_eof(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        !self.is_eof() && self.peek_kind() == kind
    }

    pub(super) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        !self.is_eof() && kinds.contains(&self.peek_kind())
    }

    /// Moves past the current token. The end marker is never moved past.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if !self.is_eof() {
            self.index += 1;
        }
        token
    }

    fn consume(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Matches `kind` or reports it missing and resynchronizes by one token.
    ///
    /// A missing `;` in front of `}` or the end of input leaves that token for
    /// the rule that closes the block.
    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if let Some(token) = self.consume(kind) {
            return Some(token);
        }

        let found = self.peek().describe();
        self.syntax_error(SyntaxError::Expected {
            expected: kind.describe(),
            found,
        });
        let keep = kind == TokenKind::SemiColon
            && (self.check(TokenKind::CloseCurlyBrace) || self.is_eof());
        if !keep {
            self.advance();
        }
        None
    }

    /// `expect` that also records the terminal (or its absence) under `node`.
    pub(super) fn expect_into(&mut self, node: &mut Node, kind: TokenKind) -> Option<Token> {
        let token = self.expect(kind);
        node.push(match &token {
            Some(t) if kind == TokenKind::Ident => Node::ident(&t.lexeme),
            Some(_) => Node::terminal(kind),
            None => Node::new(Label::Missing(kind)),
        });
        token
    }

    pub(super) fn apply(&mut self, rule: Rule) {
        trace!("rule {} ({:?}) at line {}", rule, rule, self.peek().line);
        self.rules.push(rule);
    }

    pub(super) fn syntax_error(&mut self, error: SyntaxError) {
        let line = self.peek().line;
        self.diagnostics.syntactic(line, error);
    }

    pub(super) fn semantic_error(&mut self, line: usize, error: SemanticError) {
        self.diagnostics.semantic(line, error);
    }

    /// unit = program
    ///
    /// Whatever `program` stops on is reported, skipped, and parsing resumes.
    fn parse_unit(&mut self) -> Node {
        self.apply(Rule::Unit);
        let mut node = Node::new(Label::Unit);
        let mut ty = Ty::Ok;

        loop {
            let program = self.parse_program();
            ty = ty.and(type_of(&program));
            node.push(program);
            if self.is_eof() {
                break;
            }
            let found = self.peek().describe();
            self.syntax_error(SyntaxError::Unexpected(found));
            self.advance();
            ty = Ty::Error;
        }

        node.typed(ty)
    }

    /// program = (block | func-decl)*
    fn parse_program(&mut self) -> Node {
        let mut node = Node::new(Label::Program);
        let mut ty = Ty::Ok;

        loop {
            let child = if self.check(TokenKind::Function) {
                self.apply(Rule::ProgramFunction);
                self.parse_func_decl()
            } else if self.check_any(BLOCK_START) {
                self.apply(Rule::ProgramBlock);
                self.parse_block()
            } else {
                self.apply(Rule::ProgramEmpty);
                break;
            };
            ty = ty.and(type_of(&child));
            node.push(child);
        }

        node.typed(ty)
    }

    /// block = "let" type id ";"
    ///       | "if" "(" expr ")" if-body
    ///       | "for" "(" update ";" expr ";" update ")" "{" body "}"
    ///       | stmt
    fn parse_block(&mut self) -> Node {
        let mut node = Node::new(Label::Block);
        let ty = match self.peek_kind() {
            TokenKind::Let => {
                self.apply(Rule::BlockLet);
                self.parse_let(&mut node)
            }
            TokenKind::If => {
                self.apply(Rule::BlockIf);
                self.parse_if(&mut node)
            }
            TokenKind::For => {
                self.apply(Rule::BlockFor);
                self.parse_for(&mut node)
            }
            _ => {
                self.apply(Rule::BlockStmt);
                let stmt = self.parse_stmt();
                let ty = type_of(&stmt);
                node.push(stmt);
                ty
            }
        };
        node.typed(ty)
    }

    fn parse_let(&mut self, node: &mut Node) -> Ty {
        self.expect_into(node, TokenKind::Let);
        let ty_node = self.parse_type();
        let ty = type_of(&ty_node);
        node.push(ty_node);
        let id = self.expect_into(node, TokenKind::Ident);
        self.expect_into(node, TokenKind::SemiColon);

        let Some(id) = id else {
            return Ty::Error;
        };
        if self.symbols.exists_in_current_scope(&id.lexeme) {
            self.semantic_error(id.line, SemanticError::Redeclaration(id.lexeme));
            return Ty::Error;
        }
        // an unparsable type still declares the name, as ERROR
        self.symbols.declare_variable(&id.lexeme, ty);
        Ty::from_ok(!ty.is_error())
    }

    fn parse_if(&mut self, node: &mut Node) -> Ty {
        let keyword = self.advance();
        node.push(Node::terminal(TokenKind::If));
        self.expect_into(node, TokenKind::OpenParen);
        let expr = self.parse_expr();
        let cond = type_of(&expr);
        node.push(expr);
        self.expect_into(node, TokenKind::CloseParen);
        let body = self.parse_if_body();
        let body_ty = type_of(&body);
        node.push(body);

        let cond_ok = self.check_condition("if", keyword.line, cond);
        Ty::from_ok(cond_ok && body_ty == Ty::Ok)
    }

    /// if-body = "{" body "}" | stmt
    fn parse_if_body(&mut self) -> Node {
        let mut node = Node::new(Label::IfBody);
        let ty = if self.check(TokenKind::OpenCurlyBrace) {
            self.apply(Rule::IfBodyBraced);
            self.parse_braced_body(&mut node)
        } else {
            self.apply(Rule::IfBodyStmt);
            let stmt = self.parse_stmt();
            let ty = type_of(&stmt);
            node.push(stmt);
            ty
        };
        node.typed(ty)
    }

    fn parse_braced_body(&mut self, node: &mut Node) -> Ty {
        self.expect_into(node, TokenKind::OpenCurlyBrace);
        let body = self.parse_body(BLOCK_START);
        let ty = type_of(&body);
        node.push(body);
        self.expect_into(node, TokenKind::CloseCurlyBrace);
        ty
    }

    fn parse_for(&mut self, node: &mut Node) -> Ty {
        let keyword = self.advance();
        node.push(Node::terminal(TokenKind::For));
        self.expect_into(node, TokenKind::OpenParen);
        let init = self.parse_update();
        let init_ty = type_of(&init);
        node.push(init);
        self.expect_into(node, TokenKind::SemiColon);
        let expr = self.parse_expr();
        let cond = type_of(&expr);
        node.push(expr);
        self.expect_into(node, TokenKind::SemiColon);
        let step = self.parse_update();
        let step_ty = type_of(&step);
        node.push(step);
        self.expect_into(node, TokenKind::CloseParen);
        let body_ty = self.parse_braced_body(node);

        let cond_ok = self.check_condition("for", keyword.line, cond);
        Ty::from_ok(cond_ok && init_ty == Ty::Ok && step_ty == Ty::Ok && body_ty == Ty::Ok)
    }

    /// update = id ("=" | "/=") expr | id "++" | ε
    ///
    /// The only place that needs a second token of lookahead: a bare `id` is
    /// not an update clause.
    fn parse_update(&mut self) -> Node {
        let mut node = Node::new(Label::Update);
        let next = self.peek_nth_kind(1);

        let ty = if self.check(TokenKind::Ident)
            && matches!(next, TokenKind::Equal | TokenKind::SlashEqual)
        {
            self.apply(Rule::UpdateAssign);
            let id = self.advance();
            node.push(Node::ident(&id.lexeme));
            let (op, op_node) = self.parse_assign_op();
            node.push(op_node);
            let expr = self.parse_expr();
            let value = type_of(&expr);
            node.push(expr);
            self.check_assignment(&id, op, value)
        } else if self.check(TokenKind::Ident) && next == TokenKind::Increment {
            self.apply(Rule::UpdateIncrement);
            let id = self.advance();
            node.push(Node::ident(&id.lexeme));
            self.advance();
            node.push(Node::terminal(TokenKind::Increment));
            self.check_increment(&id)
        } else {
            self.apply(Rule::UpdateEmpty);
            Ty::Ok
        };
        node.typed(ty)
    }

    /// type = "int" | "float" | "boolean" | "string"
    ///
    /// On anything else the token is left in place for the caller.
    pub(super) fn parse_type(&mut self) -> Node {
        let mut node = Node::new(Label::Type);
        let (rule, ty) = match self.peek_kind() {
            TokenKind::IntType => (Rule::TypeInt, Ty::Int),
            TokenKind::FloatType => (Rule::TypeFloat, Ty::Real),
            TokenKind::BooleanType => (Rule::TypeBoolean, Ty::Bool),
            TokenKind::StringType => (Rule::TypeString, Ty::Str),
            _ => {
                let found = self.peek().describe();
                self.syntax_error(SyntaxError::InvalidType(found));
                return node.typed(Ty::Error);
            }
        };
        self.apply(rule);
        node.push(Node::terminal(self.advance().kind));
        node.typed(ty)
    }

    /// ret-type = "void" | type
    fn parse_ret_type(&mut self) -> Node {
        if !self.check(TokenKind::VoidType) {
            return self.parse_type();
        }
        self.apply(Rule::RetTypeVoid);
        self.advance();
        let mut node = Node::new(Label::Type);
        node.push(Node::terminal(TokenKind::VoidType));
        node.typed(Ty::Void)
    }

    /// func-decl = "function" ret-type id "(" params ")" "{" body func-return "}"
    fn parse_func_decl(&mut self) -> Node {
        self.apply(Rule::FuncDecl);
        let mut node = Node::new(Label::FuncDecl);
        self.expect_into(&mut node, TokenKind::Function);
        let ret_node = self.parse_ret_type();
        let ret = type_of(&ret_node);
        node.push(ret_node);
        let id = self.expect_into(&mut node, TokenKind::Ident);

        let mut declared = false;
        let (name, line) = match &id {
            Some(id) => (id.lexeme.clone(), id.line),
            None => (String::new(), self.peek().line),
        };
        if id.is_some() {
            if self.symbols.exists_in_current_scope(&name) {
                self.semantic_error(line, SemanticError::Redeclaration(name.clone()));
            } else {
                self.symbols.declare_function(&name, ret);
                declared = true;
            }
        }

        self.symbols.enter_scope();
        let outer = self.function.replace((name.clone(), ret));

        self.expect_into(&mut node, TokenKind::OpenParen);
        let params = self.parse_params();
        let types = params.types().map(<[Ty]>::to_vec).unwrap_or_default();
        node.push(params);
        self.expect_into(&mut node, TokenKind::CloseParen);
        if declared {
            self.symbols.bind_parameter_types(&name, types);
        }

        self.expect_into(&mut node, TokenKind::OpenCurlyBrace);
        let body = self.parse_body(FUNCTION_BODY_START);
        let body_ty = type_of(&body);
        node.push(body);
        let tail = self.parse_func_return();
        let value = type_of(&tail);
        node.push(tail);
        self.expect_into(&mut node, TokenKind::CloseCurlyBrace);

        let ret_ok = if value.is_error() || ret.is_error() {
            false
        } else if value != ret {
            self.semantic_error(
                line,
                SemanticError::ReturnTypeMismatch {
                    name,
                    expected: ret,
                    found: value,
                },
            );
            false
        } else {
            true
        };

        self.symbols.exit_scope();
        self.function = outer;
        node.typed(Ty::from_ok(declared && ret_ok && body_ty == Ty::Ok))
    }

    /// func-return = return-stmt ";" | ε
    fn parse_func_return(&mut self) -> Node {
        let mut node = Node::new(Label::FuncReturn);
        let ty = if self.check(TokenKind::Return) {
            self.apply(Rule::FuncReturn);
            let ret = self.parse_return_stmt();
            let ty = type_of(&ret);
            node.push(ret);
            self.expect_into(&mut node, TokenKind::SemiColon);
            ty
        } else {
            self.apply(Rule::FuncReturnEmpty);
            Ty::Void
        };
        node.typed(ty)
    }

    /// params = (type id ("," type id)*)?
    fn parse_params(&mut self) -> Node {
        let mut node = Node::new(Label::Params);
        let mut types = vec![];

        if self.check_any(TYPE_START) {
            self.apply(Rule::Params);
            loop {
                self.parse_param(&mut node, &mut types);
                if self.check(TokenKind::Comma) {
                    self.apply(Rule::ParamsTail);
                    self.advance();
                    node.push(Node::terminal(TokenKind::Comma));
                } else {
                    self.apply(Rule::ParamsTailEmpty);
                    break;
                }
            }
        } else {
            self.apply(Rule::ParamsEmpty);
        }

        node.with_types(types)
    }

    /// Every written parameter counts towards the arity, even a duplicate.
    fn parse_param(&mut self, node: &mut Node, types: &mut Vec<Ty>) {
        let ty_node = self.parse_type();
        let ty = type_of(&ty_node);
        node.push(ty_node);
        let id = self.expect_into(node, TokenKind::Ident);
        types.push(ty);

        let Some(id) = id else {
            return;
        };
        if self.symbols.exists_in_current_scope(&id.lexeme) {
            self.semantic_error(id.line, SemanticError::Redeclaration(id.lexeme));
        } else {
            self.symbols.declare_variable(&id.lexeme, ty);
        }
    }

    /// body = block*
    fn parse_body(&mut self, starts: &[TokenKind]) -> Node {
        let mut node = Node::new(Label::Body);
        let mut ty = Ty::Ok;

        while self.check_any(starts) {
            self.apply(Rule::Body);
            let block = self.parse_block();
            ty = ty.and(type_of(&block));
            node.push(block);
        }
        self.apply(Rule::BodyEmpty);

        node.typed(ty)
    }

    /// stmt = id suffix
    ///      | "write" expr ";"
    ///      | "read" id ";"
    ///      | return-stmt ";"
    fn parse_stmt(&mut self) -> Node {
        let mut node = Node::new(Label::Stmt);
        let ty = match self.peek_kind() {
            TokenKind::Ident => {
                self.apply(Rule::StmtIdent);
                let id = self.advance();
                node.push(Node::ident(&id.lexeme));
                let suffix = self.parse_suffix(&id);
                let ty = type_of(&suffix);
                node.push(suffix);
                ty
            }
            TokenKind::Write => {
                self.apply(Rule::StmtWrite);
                self.advance();
                node.push(Node::terminal(TokenKind::Write));
                let expr = self.parse_expr();
                let ty = type_of(&expr);
                node.push(expr);
                self.expect_into(&mut node, TokenKind::SemiColon);
                Ty::from_ok(!ty.is_error())
            }
            TokenKind::Read => {
                self.apply(Rule::StmtRead);
                self.advance();
                node.push(Node::terminal(TokenKind::Read));
                let id = self.expect_into(&mut node, TokenKind::Ident);
                self.expect_into(&mut node, TokenKind::SemiColon);
                match id {
                    Some(id) => Ty::from_ok(!self.resolve_variable(&id).is_error()),
                    None => Ty::Error,
                }
            }
            TokenKind::Return => {
                self.apply(Rule::StmtReturn);
                let line = self.peek().line;
                let ret = self.parse_return_stmt();
                let value = type_of(&ret);
                node.push(ret);
                self.expect_into(&mut node, TokenKind::SemiColon);
                self.check_return(line, value)
            }
            _ => {
                let found = self.peek().describe();
                self.syntax_error(SyntaxError::InvalidStatement(found));
                Ty::Error
            }
        };
        node.typed(ty)
    }

    /// suffix = ("=" | "/=") expr ";" | "(" args ")" ";"
    fn parse_suffix(&mut self, id: &Token) -> Node {
        let mut node = Node::new(Label::Suffix);
        let ty = if self.check_any(&[TokenKind::Equal, TokenKind::SlashEqual]) {
            self.apply(Rule::SuffixAssign);
            let (op, op_node) = self.parse_assign_op();
            node.push(op_node);
            let expr = self.parse_expr();
            let value = type_of(&expr);
            node.push(expr);
            self.expect_into(&mut node, TokenKind::SemiColon);
            self.check_assignment(id, op, value)
        } else if self.check(TokenKind::OpenParen) {
            self.apply(Rule::SuffixCall);
            let args = self.parse_call_args(&mut node);
            self.expect_into(&mut node, TokenKind::SemiColon);
            Ty::from_ok(!self.check_call(id, &args).is_error())
        } else {
            self.syntax_error(SyntaxError::ExpectedAssignOrCall(id.lexeme.clone()));
            Ty::Error
        };
        node.typed(ty)
    }

    /// assign-op = "=" | "/="
    ///
    /// Only called once the current token is known to be one of the two.
    fn parse_assign_op(&mut self) -> (TokenKind, Node) {
        let mut node = Node::new(Label::AssignOp);
        let rule = if self.check(TokenKind::SlashEqual) {
            Rule::AssignOpDiv
        } else {
            Rule::AssignOpEqual
        };
        self.apply(rule);
        let kind = self.advance().kind;
        node.push(Node::terminal(kind));
        (kind, node)
    }

    /// return-stmt = "return" return-value
    pub(super) fn parse_return_stmt(&mut self) -> Node {
        self.apply(Rule::ReturnStmt);
        let mut node = Node::new(Label::ReturnStmt);
        self.expect_into(&mut node, TokenKind::Return);
        let value = self.parse_return_value();
        let ty = type_of(&value);
        node.push(value);
        node.typed(ty)
    }

    /// return-value = expr | ε
    fn parse_return_value(&mut self) -> Node {
        let mut node = Node::new(Label::ReturnValue);
        let ty = if self.check_any(EXPR_START) {
            self.apply(Rule::ReturnValue);
            let expr = self.parse_expr();
            let ty = type_of(&expr);
            node.push(expr);
            ty
        } else {
            self.apply(Rule::ReturnValueEmpty);
            Ty::Void
        };
        node.typed(ty)
    }
}
