mod actions;
mod ast;
mod expr;
mod grammar;
mod parser;

pub use ast::*;
pub use grammar::*;
pub use parser::*;

use crate::diagnostics::Diagnostics;
use crate::lexer::Token;

/// Parses a token stream with an empty diagnostic sink.
pub fn parse(tokens: Vec<Token>) -> Analysis {
    Parser::new(tokens, Diagnostics::new()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Ty;
    use crate::diagnostics::{DiagnosticKind, Diagnostics};
    use crate::lexer::{Lexer, TokenKind};
    use rstest::rstest;

    fn analyze(source: &str) -> Analysis {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::tokenize(source, &mut diagnostics);
        Parser::new(tokens, diagnostics).parse()
    }

    fn trace(analysis: &Analysis) -> Vec<u16> {
        analysis.rules.iter().map(Rule::number).collect()
    }

    #[test]
    fn empty_input() {
        let analysis = analyze("");
        assert_eq!(trace(&analysis), vec![1, 4]);
        assert_eq!(analysis.ast.ty(), Some(Ty::Ok));
    }

    #[test]
    fn let_trace() {
        let analysis = analyze("let int a;");
        assert_eq!(trace(&analysis), vec![1, 2, 5, 9, 4]);
    }

    #[test]
    fn assignment_trace() {
        let analysis = analyze("let int a; a = 1 + 2;");
        assert_eq!(
            trace(&analysis),
            vec![1, 2, 5, 9, 2, 8, 44, 49, 51, 22, 25, 28, 33, 29, 33, 30, 27, 24, 4]
        );
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn for_with_increment() {
        let analysis = analyze("let int i; for (i = 0; i == 3; i++) { write i; }");
        assert!(analysis.diagnostics.is_empty(), "{}", analysis.diagnostics);
        let rules = trace(&analysis);
        assert!(rules.contains(&14));
        assert!(rules.contains(&58));
        assert_eq!(analysis.ast.ty(), Some(Ty::Ok));
    }

    #[test]
    fn for_with_empty_updates() {
        let analysis = analyze("let boolean b; for (; b; ) { }");
        assert!(analysis.diagnostics.is_empty(), "{}", analysis.diagnostics);
        assert_eq!(trace(&analysis).iter().filter(|r| **r == 15).count(), 2);
    }

    #[rstest]
    #[case("if (true) write 1;", 60)]
    #[case("if (true) { write 1; }", 57)]
    fn if_bodies(#[case] source: &str, #[case] rule: u16) {
        let analysis = analyze(source);
        assert!(analysis.diagnostics.is_empty(), "{}", analysis.diagnostics);
        assert!(trace(&analysis).contains(&rule));
    }

    #[test]
    fn missing_semicolon_before_brace_is_not_consumed() {
        let analysis = analyze("if (true) { write 1 }");
        assert_eq!(analysis.diagnostics.len(), 1);
        let d = analysis.diagnostics.iter().next().unwrap();
        assert_eq!(d.kind(), DiagnosticKind::Syntactic);
        assert!(analysis.ast.find(&Label::Missing(TokenKind::SemiColon)).is_some());
        assert!(analysis
            .ast
            .find(&Label::Missing(TokenKind::CloseCurlyBrace))
            .is_none());
    }

    #[test]
    fn stray_token_is_skipped() {
        let analysis = analyze("let int a; ) let int b;");
        assert_eq!(analysis.diagnostics.len(), 1);
        assert!(analysis.symbols.exists_in_current_scope("b"));
        assert_eq!(analysis.ast.ty(), Some(Ty::Error));
    }

    #[test]
    fn terminals_appear_in_the_tree() {
        let analysis = analyze("let string s;");
        let labels: Vec<String> = analysis.ast.walk().iter().map(|n| n.label.to_string()).collect();
        assert!(labels.contains(&"let".to_string()));
        assert!(labels.contains(&"string".to_string()));
        assert!(labels.contains(&"id(s)".to_string()));
    }
}
