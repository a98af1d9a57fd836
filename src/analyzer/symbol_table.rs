use std::fmt;

use indexmap::IndexMap;
use log::debug;

use super::Ty;

#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Variable { ty: Ty, offset: usize },
    Function { ret: Ty, params: Vec<Ty> },
}

impl Symbol {
    pub fn category(&self) -> Category {
        match self {
            Symbol::Variable { .. } => Category::Variable,
            Symbol::Function { .. } => Category::Function,
        }
    }

    /// Declared type of a variable, return type of a function.
    pub fn ty(&self) -> Ty {
        match self {
            Symbol::Variable { ty, .. } => *ty,
            Symbol::Function { ret, .. } => *ret,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Variable,
    Function,
}

/// Names declared in one lexical region, in declaration order.
pub type Scope = IndexMap<String, Symbol>;

/// Stack of scopes. Index 0 is the global scope and is never popped.
///
/// Every function scope opens a fresh zero-based frame: the running offset is
/// saved when the scope is entered and restored when it is left.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    saved_offsets: Vec<usize>,
    offset: usize,
    closed: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
            saved_offsets: vec![],
            offset: 0,
            closed: vec![],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        self.saved_offsets.push(self.offset);
        self.offset = 0;
        debug!("entered scope at depth {}", self.scopes.len());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() <= 1 {
            return;
        }
        if let Some(scope) = self.scopes.pop() {
            self.closed.push(scope);
        }
        self.offset = self.saved_offsets.pop().unwrap_or(0);
        debug!("left scope, back at depth {}", self.scopes.len());
    }

    fn current(&self) -> &Scope {
        // the global scope is never popped
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.current().contains_key(name)
    }

    pub fn exists_anywhere(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Declares a variable in the current scope and returns its offset.
    pub fn declare_variable(&mut self, name: &str, ty: Ty) -> usize {
        let offset = self.offset;
        self.offset += ty.sizeof();
        debug!("declared variable {} : {} at offset {}", name, ty, offset);
        self.current_mut()
            .insert(name.to_string(), Symbol::Variable { ty, offset });
        offset
    }

    pub fn declare_function(&mut self, name: &str, ret: Ty) {
        debug!("declared function {} -> {}", name, ret);
        self.current_mut().insert(
            name.to_string(),
            Symbol::Function {
                ret,
                params: vec![],
            },
        );
    }

    /// Attaches the parameter list to the innermost function named `name`.
    ///
    /// Variables of the same name are skipped, so a parameter shadowing its
    /// own function does not hide it.
    pub fn bind_parameter_types(&mut self, name: &str, types: Vec<Ty>) {
        let function = self
            .scopes
            .iter_mut()
            .rev()
            .filter_map(|scope| scope.get_mut(name))
            .find_map(|symbol| match symbol {
                Symbol::Function { params, .. } => Some(params),
                Symbol::Variable { .. } => None,
            });
        if let Some(params) = function {
            debug!("bound parameters of {}: {:?}", name, types);
            *params = types;
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_type(&self, name: &str) -> Ty {
        self.lookup(name).map(Symbol::ty).unwrap_or(Ty::Error)
    }

    pub fn lookup_category(&self, name: &str) -> Option<Category> {
        self.lookup(name).map(Symbol::category)
    }

    pub fn lookup_parameter_types(&self, name: &str) -> Option<&[Ty]> {
        match self.lookup(name)? {
            Symbol::Function { params, .. } => Some(params),
            Symbol::Variable { .. } => None,
        }
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Scopes already popped, in the order they were left.
    pub fn closed_scopes(&self) -> &[Scope] {
        &self.closed
    }
}

fn fmt_scope(scope: &Scope, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (name, symbol) in scope {
        writeln!(f, "LEXEME: '{}'", name)?;
        match symbol {
            Symbol::Variable { ty, offset } => {
                writeln!(f, "  TYPE: {}", ty)?;
                writeln!(f, "  OFFSET: {}", offset)?;
            }
            Symbol::Function { ret, params } => {
                let list = params
                    .iter()
                    .map(Ty::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "  TYPE: FUNCTION")?;
                writeln!(f, "  RETURN: {}", ret)?;
                writeln!(f, "  PARAM_COUNT: {}", params.len())?;
                writeln!(f, "  PARAM_TYPES: [{}]", list)?;
            }
        }
        writeln!(f, "------------------------------------------")?;
    }
    Ok(())
}

/// Function locals first (in the order their scopes closed), then globals.
impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scope in &self.closed {
            fmt_scope(scope, f)?;
        }
        fmt_scope(self.global(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_advance_by_type_size() {
        let mut table = SymbolTable::new();
        assert_eq!(table.declare_variable("a", Ty::Int), 0);
        assert_eq!(table.declare_variable("b", Ty::Real), 2);
        assert_eq!(table.declare_variable("c", Ty::Str), 6);
        assert_eq!(table.declare_variable("d", Ty::Bool), 70);
        assert_eq!(table.declare_variable("e", Ty::Int), 71);
    }

    #[test]
    fn function_frames_start_at_zero() {
        let mut table = SymbolTable::new();
        table.declare_variable("g", Ty::Str);
        table.declare_function("f", Ty::Int);
        table.enter_scope();
        assert_eq!(table.declare_variable("n", Ty::Int), 0);
        table.exit_scope();
        assert_eq!(table.declare_variable("h", Ty::Int), 64);
    }

    #[test]
    fn lookup_is_innermost_first() {
        let mut table = SymbolTable::new();
        table.declare_variable("x", Ty::Int);
        table.enter_scope();
        table.declare_variable("x", Ty::Bool);
        assert_eq!(table.lookup_type("x"), Ty::Bool);
        assert!(table.exists_in_current_scope("x"));
        table.exit_scope();
        assert_eq!(table.lookup_type("x"), Ty::Int);
    }

    #[test]
    fn missing_names_are_errors() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup_type("nope"), Ty::Error);
        assert_eq!(table.lookup_category("nope"), None);
        assert_eq!(table.lookup_parameter_types("nope"), None);
        assert!(!table.exists_anywhere("nope"));
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.declare_variable("a", Ty::Int);
        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.depth(), 1);
        assert!(table.exists_in_current_scope("a"));
    }

    #[test]
    fn parameters_are_bound_on_the_function() {
        let mut table = SymbolTable::new();
        table.declare_function("f", Ty::Bool);
        table.enter_scope();
        table.bind_parameter_types("f", vec![Ty::Int, Ty::Str]);
        assert_eq!(
            table.lookup_parameter_types("f"),
            Some(&[Ty::Int, Ty::Str][..])
        );
        assert_eq!(table.lookup_category("f"), Some(Category::Function));
        assert_eq!(table.lookup_type("f"), Ty::Bool);
    }

    #[test]
    fn parameters_skip_a_shadowing_variable() {
        let mut table = SymbolTable::new();
        table.declare_function("f", Ty::Int);
        table.enter_scope();
        table.declare_variable("f", Ty::Int);
        table.bind_parameter_types("f", vec![Ty::Int]);
        table.exit_scope();
        assert_eq!(table.lookup_parameter_types("f"), Some(&[Ty::Int][..]));
    }

    #[test]
    fn dump_lists_locals_then_globals() {
        let mut table = SymbolTable::new();
        table.declare_function("f", Ty::Int);
        table.enter_scope();
        table.declare_variable("n", Ty::Int);
        table.bind_parameter_types("f", vec![Ty::Int]);
        table.exit_scope();

        let dump = table.to_string();
        let n = dump.find("LEXEME: 'n'").unwrap();
        let f = dump.find("LEXEME: 'f'").unwrap();
        assert!(n < f);
        assert!(dump.contains("  PARAM_COUNT: 1\n"));
        assert!(dump.contains("  PARAM_TYPES: [INTEGER]\n"));
        assert!(dump.contains("  OFFSET: 0\n"));
    }
}
