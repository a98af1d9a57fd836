use std::fmt;

/// Productions of the grammar, numbered as they appear in the parse trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum Rule {
    /// unit = program
    Unit = 1,
    /// program = block program
    ProgramBlock = 2,
    /// program = func-decl program
    ProgramFunction = 3,
    /// program = ε
    ProgramEmpty = 4,
    /// block = "let" type id ";"
    BlockLet = 5,
    /// block = "if" "(" expr ")" if-body
    BlockIf = 6,
    /// block = "for" "(" update ";" expr ";" update ")" "{" body "}"
    BlockFor = 7,
    /// block = stmt
    BlockStmt = 8,
    TypeInt = 9,
    TypeFloat = 10,
    TypeBoolean = 11,
    TypeString = 12,
    /// func-decl = "function" ret-type id "(" params ")" "{" body func-return "}"
    FuncDecl = 13,
    /// update = id assign-op expr
    UpdateAssign = 14,
    UpdateEmpty = 15,
    /// func-return = return-stmt ";"
    FuncReturn = 16,
    FuncReturnEmpty = 17,
    /// params = type id params-tail
    Params = 18,
    ParamsEmpty = 19,
    /// params-tail = "," type id params-tail
    ParamsTail = 20,
    ParamsTailEmpty = 21,
    /// expr = equality and-tail
    Expr = 22,
    /// and-tail = "&&" equality and-tail
    AndTail = 23,
    AndTailEmpty = 24,
    /// equality = additive eq-tail
    Equality = 25,
    /// eq-tail = "==" additive eq-tail
    EqTail = 26,
    EqTailEmpty = 27,
    /// additive = primary add-tail
    Additive = 28,
    /// add-tail = "+" primary add-tail
    AddTail = 29,
    AddTailEmpty = 30,
    /// primary = id call-suffix
    PrimaryIdent = 31,
    /// primary = "(" expr ")"
    PrimaryParen = 32,
    PrimaryInt = 33,
    PrimaryReal = 34,
    PrimaryString = 35,
    PrimaryTrue = 36,
    PrimaryFalse = 37,
    /// call-suffix = "(" args ")"
    CallSuffix = 38,
    CallSuffixEmpty = 39,
    /// args = expr args-tail
    Args = 40,
    ArgsEmpty = 41,
    /// args-tail = "," expr args-tail
    ArgsTail = 42,
    ArgsTailEmpty = 43,
    /// stmt = id suffix
    StmtIdent = 44,
    /// stmt = "write" expr ";"
    StmtWrite = 45,
    /// stmt = "read" id ";"
    StmtRead = 46,
    /// stmt = return-stmt ";"
    StmtReturn = 47,
    /// return-stmt = "return" return-value
    ReturnStmt = 48,
    /// suffix = assign-op expr ";"
    SuffixAssign = 49,
    /// suffix = "(" args ")" ";"
    SuffixCall = 50,
    AssignOpEqual = 51,
    AssignOpDiv = 52,
    /// return-value = expr
    ReturnValue = 53,
    ReturnValueEmpty = 54,
    /// body = block body
    Body = 55,
    BodyEmpty = 56,
    /// if-body = "{" body "}"
    IfBodyBraced = 57,
    /// update = id "++"
    UpdateIncrement = 58,
    /// ret-type = "void"
    RetTypeVoid = 59,
    /// if-body = stmt
    IfBodyStmt = 60,
}

impl Rule {
    pub fn number(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
