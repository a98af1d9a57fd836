use std::fmt;

use crate::analyzer::Ty;
use crate::lexer::TokenKind;

/// What a node stands for: a nonterminal of the grammar or a matched terminal.
#[derive(Clone, Debug, PartialEq)]
pub enum Label {
    Unit,
    Program,
    Block,
    IfBody,
    Type,
    FuncDecl,
    Update,
    FuncReturn,
    Params,
    Expr,
    Equality,
    Additive,
    Primary,
    CallSuffix,
    Args,
    Stmt,
    ReturnStmt,
    Suffix,
    AssignOp,
    ReturnValue,
    Body,

    Terminal(TokenKind),
    Ident(String),
    Literal(TokenKind, String),
    /// An expected terminal that was absent and recovered from.
    Missing(TokenKind),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Terminal(kind) => write!(f, "{}", kind),
            Label::Ident(name) => write!(f, "id({})", name),
            Label::Literal(kind, lexeme) => write!(f, "{}({})", kind, lexeme),
            Label::Missing(kind) => write!(f, "missing({})", kind),
            nonterminal => write!(f, "{:?}", nonterminal),
        }
    }
}

/// Synthesized attribute of a node.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Attr {
    #[default]
    None,
    Type(Ty),
    /// Parameter and argument lists.
    Types(Vec<Ty>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub label: Label,
    pub children: Vec<Node>,
    pub attr: Attr,
}

impl Node {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            children: vec![],
            attr: Attr::None,
        }
    }

    pub fn terminal(kind: TokenKind) -> Self {
        Self::new(Label::Terminal(kind))
    }

    pub fn ident(name: &str) -> Self {
        Self::new(Label::Ident(name.to_string()))
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Scalar type attribute, if this node carries one.
    pub fn ty(&self) -> Option<Ty> {
        match self.attr {
            Attr::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn types(&self) -> Option<&[Ty]> {
        match &self.attr {
            Attr::Types(types) => Some(types),
            _ => None,
        }
    }

    pub fn typed(mut self, ty: Ty) -> Self {
        self.attr = Attr::Type(ty);
        self
    }

    pub fn with_types(mut self, types: Vec<Ty>) -> Self {
        self.attr = Attr::Types(types);
        self
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn walk(&self) -> Vec<&Node> {
        let mut nodes = vec![];
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }
        nodes
    }

    pub fn find(&self, label: &Label) -> Option<&Node> {
        self.walk().into_iter().find(|n| &n.label == label)
    }
}
