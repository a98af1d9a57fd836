pub mod analyzer;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod report;

use log::info;

use analyzer::SymbolTable;
use diagnostics::Diagnostics;
use lexer::{Lexer, Token};
use parser::{Node, Parser, Rule};

/// Everything produced for one compilation unit.
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub ast: Node,
    pub diagnostics: Diagnostics,
    pub symbols: SymbolTable,
    pub rules: Vec<Rule>,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Runs the lexer and the parser over `source`. Every call starts from a fresh
/// symbol table and diagnostic sink.
pub fn compile(source: &str) -> Compilation {
    let mut diagnostics = Diagnostics::new();
    let tokens = Lexer::tokenize(source, &mut diagnostics);
    info!("lexed {} tokens", tokens.len());

    let analysis = Parser::new(tokens.clone(), diagnostics).parse();
    info!(
        "parsed with {} rules applied, {} diagnostics",
        analysis.rules.len(),
        analysis.diagnostics.len()
    );

    Compilation {
        tokens,
        ast: analysis.ast,
        diagnostics: analysis.diagnostics,
        symbols: analysis.symbols,
        rules: analysis.rules,
    }
}
