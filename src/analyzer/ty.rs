use std::fmt;

/// Semantic type attached to expressions, declarations and statements.
///
/// `Error` is absorbing: anything computed from it is `Error` again and has
/// already been diagnosed. `Ok` only ever marks a well-formed statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Int,
    Real,
    Bool,
    Str,
    Void,
    Error,
    Ok,
}

impl Ty {
    /// Bytes reserved in a frame for a variable of this type.
    pub fn sizeof(&self) -> usize {
        match self {
            Ty::Int => 2,
            Ty::Real => 4,
            Ty::Bool => 1,
            Ty::Str => 64,
            Ty::Void | Ty::Error | Ty::Ok => 0,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Real)
    }

    pub fn is_error(&self) -> bool {
        *self == Ty::Error
    }

    /// `Ok` when both parts are `Ok`, `Error` otherwise.
    pub fn and(self, other: Ty) -> Ty {
        if self == Ty::Ok && other == Ty::Ok {
            Ty::Ok
        } else {
            Ty::Error
        }
    }

    pub fn from_ok(ok: bool) -> Ty {
        if ok {
            Ty::Ok
        } else {
            Ty::Error
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Ty::Int => "INTEGER",
            Ty::Real => "REAL",
            Ty::Bool => "BOOLEAN",
            Ty::Str => "STRING",
            Ty::Void => "VOID",
            Ty::Error => "ERROR",
            Ty::Ok => "OK",
        };
        f.write_str(s)
    }
}

/// Binary operators of the expression grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Equal,
    LogicalAnd,
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Equal => "==",
            BinOpKind::LogicalAnd => "&&",
        }
    }

    /// Result type of `left op right`.
    ///
    /// `Ok(Ty::Error)` means an operand was already poisoned, so nothing new
    /// needs reporting. `Err(())` means the operand types are wrong for this
    /// operator and the caller must diagnose it.
    pub fn result_type(&self, left: Ty, right: Ty) -> Result<Ty, ()> {
        if left.is_error() || right.is_error() {
            return Ok(Ty::Error);
        }
        match self {
            BinOpKind::Add if left == right && left.is_numeric() => Ok(left),
            BinOpKind::Equal if left == right => Ok(Ty::Bool),
            BinOpKind::LogicalAnd if left == Ty::Bool && right == Ty::Bool => Ok(Ty::Bool),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Ty::Int, 2)]
    #[case(Ty::Real, 4)]
    #[case(Ty::Bool, 1)]
    #[case(Ty::Str, 64)]
    #[case(Ty::Error, 0)]
    fn test_sizeof(#[case] ty: Ty, #[case] expected: usize) {
        assert_eq!(ty.sizeof(), expected);
    }

    #[rstest]
    #[case(BinOpKind::Add, Ty::Int, Ty::Int, Ok(Ty::Int))]
    #[case(BinOpKind::Add, Ty::Real, Ty::Real, Ok(Ty::Real))]
    #[case(BinOpKind::Add, Ty::Int, Ty::Real, Err(()))]
    #[case(BinOpKind::Add, Ty::Str, Ty::Str, Err(()))]
    #[case(BinOpKind::Equal, Ty::Str, Ty::Str, Ok(Ty::Bool))]
    #[case(BinOpKind::Equal, Ty::Int, Ty::Bool, Err(()))]
    #[case(BinOpKind::LogicalAnd, Ty::Bool, Ty::Bool, Ok(Ty::Bool))]
    #[case(BinOpKind::LogicalAnd, Ty::Int, Ty::Bool, Err(()))]
    #[case(BinOpKind::LogicalAnd, Ty::Error, Ty::Int, Ok(Ty::Error))]
    #[case(BinOpKind::Add, Ty::Int, Ty::Error, Ok(Ty::Error))]
    fn test_result_type(
        #[case] op: BinOpKind,
        #[case] left: Ty,
        #[case] right: Ty,
        #[case] expected: Result<Ty, ()>,
    ) {
        assert_eq!(op.result_type(left, right), expected);
    }

    #[test]
    fn ok_only_when_both_ok() {
        assert_eq!(Ty::Ok.and(Ty::Ok), Ty::Ok);
        assert_eq!(Ty::Ok.and(Ty::Error), Ty::Error);
        assert_eq!(Ty::Int.and(Ty::Ok), Ty::Error);
    }
}
