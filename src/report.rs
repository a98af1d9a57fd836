//! Text renderings of a compilation and the artifact writer.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parser::{Node, Rule};
use crate::Compilation;

pub const NO_ERRORS: &str = "No errors found.";

/// One token per line. The end marker is left out.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut s = String::new();
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        let _ = writeln!(s, "{}", token);
    }
    s
}

pub fn render_tree(ast: &Node) -> String {
    fn go(node: &Node, depth: usize, s: &mut String) {
        let _ = writeln!(s, "{}{}", "  ".repeat(depth), node.label());
        for child in node.children() {
            go(child, depth + 1, s);
        }
    }

    let mut s = String::new();
    go(ast, 0, &mut s);
    s
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Graphviz rendering. Nodes are numbered in pre-order.
pub fn render_dot(ast: &Node) -> String {
    fn go(node: &Node, next: &mut usize, s: &mut String) -> usize {
        let id = *next;
        *next += 1;
        let _ = writeln!(s, "n{} [label=\"{}\"];", id, escape(&node.label().to_string()));
        for child in node.children() {
            let child_id = go(child, next, s);
            let _ = writeln!(s, "n{} -> n{};", id, child_id);
        }
        id
    }

    let mut s = String::from("digraph AST {\n");
    go(ast, &mut 0, &mut s);
    s.push_str("}\n");
    s
}

pub fn render_rules(rules: &[Rule]) -> String {
    let mut s = String::from("descendente");
    for rule in rules {
        let _ = write!(s, " {}", rule);
    }
    s.push('\n');
    s
}

pub fn render_diagnostics(diagnostics: &Diagnostics) -> String {
    if diagnostics.is_empty() {
        format!("{}\n", NO_ERRORS)
    } else {
        diagnostics.to_string()
    }
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Writes every report of `compilation` into `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, compilation: &Compilation) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let artifacts = [
        ("tokens.txt", render_tokens(&compilation.tokens)),
        ("symbols.txt", compilation.symbols.to_string()),
        ("parse.txt", render_rules(&compilation.rules)),
        ("errors.txt", render_diagnostics(&compilation.diagnostics)),
        ("ast.txt", render_tree(&compilation.ast)),
        ("ast.dot", render_dot(&compilation.ast)),
    ];

    let mut written = vec![];
    for (name, contents) in &artifacts {
        written.push(write_file(dir, name, contents)?);
    }
    info!("wrote {} artifacts to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    #[test]
    fn rules_line() {
        let c = compile("let int a;");
        assert_eq!(render_rules(&c.rules), "descendente 1 2 5 9 4\n");
    }

    #[test]
    fn tree_is_indented_by_depth() {
        let c = compile("let int a;");
        let tree = render_tree(&c.ast);
        let mut lines = tree.lines();
        assert_eq!(lines.next(), Some("Unit"));
        assert_eq!(lines.next(), Some("  Program"));
        assert_eq!(lines.next(), Some("    Block"));
        assert_eq!(lines.next(), Some("      let"));
        assert!(tree.contains("      id(a)\n"));
    }

    #[test]
    fn dot_edges() {
        let c = compile("");
        let dot = render_dot(&c.ast);
        assert_eq!(
            dot,
            "digraph AST {\nn0 [label=\"Unit\"];\nn1 [label=\"Program\"];\nn0 -> n1;\n}\n"
        );
    }

    #[test]
    fn dot_labels_are_escaped() {
        assert_eq!(escape("a\"b"), "a\\\"b");
    }

    #[test]
    fn tokens_skip_the_end_marker() {
        let c = compile("a = 1;");
        assert_eq!(render_tokens(&c.tokens), "<a,1>\n<=, =>\n<ent, 1>\n<;, ;>\n");
    }

    #[test]
    fn clean_run_says_so() {
        let c = compile("let int a;");
        assert_eq!(render_diagnostics(&c.diagnostics), format!("{}\n", NO_ERRORS));
    }
}
