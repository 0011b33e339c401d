use super::{AstNode, NodeId, Span};
use std::collections::HashSet;
use std::fmt;

// Import Declarations
#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Dotted path segments, e.g. `["java", "util", "List"]`
    pub path: Vec<String>,
    pub span: Span,
}

impl ImportDecl {
    /// Simple name the import brings into scope (last segment)
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Full dotted path
    pub fn qualified_name(&self) -> String {
        self.path.join(".")
    }
}

impl AstNode for ImportDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {};", self.qualified_name())
    }
}

// Class Declaration
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub extends: Option<String>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

impl ClassDecl {
    /// Methods in declaration order, skipping any whose name was already
    /// declared. Later duplicates are reported once and otherwise ignored.
    pub fn unique_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        let mut seen = HashSet::new();
        self.methods.iter().filter(move |m| seen.insert(m.name.as_str()))
    }
}

impl AstNode for ClassDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(sup) = &self.extends {
            write!(f, " extends {}", sup)?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(f, "    {};", field)?;
        }
        for method in &self.methods {
            writeln!(f, "    {}", method)?;
        }
        write!(f, "}}")
    }
}

// Type References
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Boolean,
    String,
    Void,
    Named(String),
}

#[derive(Debug, Clone)]
pub struct TypeRef {
    pub base: BaseType,
    pub is_array: bool,
    pub span: Span,
}

impl AstNode for TypeRef {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            BaseType::Int => write!(f, "int")?,
            BaseType::Boolean => write!(f, "boolean")?,
            BaseType::String => write!(f, "String")?,
            BaseType::Void => write!(f, "void")?,
            BaseType::Named(n) => write!(f, "{}", n)?,
        }
        if self.is_array {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Field, parameter or local variable declaration
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub type_ref: TypeRef,
    pub name: String,
    pub span: Span,
}

impl AstNode for VarDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_ref, self.name)
    }
}

// Methods
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub is_public: bool,
    pub is_static: bool,
    pub return_type: TypeRef,
    pub name: String,
    pub params: Vec<VarDecl>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl MethodDecl {
    pub fn is_main(&self) -> bool {
        self.name == crate::consts::MAIN_METHOD
    }
}

impl AstNode for MethodDecl {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_public {
            write!(f, "public ")?;
        }
        if self.is_static {
            write!(f, "static ")?;
        }
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

// Statements
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    /// Expression evaluated for its side effects
    Expr(Expr),
    /// `name = value;`
    Assign { target: String, value: Expr },
    /// `name[index] = value;`
    ArrayAssign { target: String, index: Expr, value: Expr },
    Return(Option<Expr>),
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, StmtKind::Return(_))
    }
}

impl AstNode for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Block(stmts) => write!(f, "{{ {} statement(s) }}", stmts.len()),
            StmtKind::If { condition, .. } => write!(f, "if ({}) ...", condition),
            StmtKind::While { condition, .. } => write!(f, "while ({}) ...", condition),
            StmtKind::Expr(e) => write!(f, "{};", e),
            StmtKind::Assign { target, value } => write!(f, "{} = {};", target, value),
            StmtKind::ArrayAssign { target, index, value } => {
                write!(f, "{}[{}] = {};", target, index, value)
            }
            StmtKind::Return(Some(e)) => write!(f, "return {};", e),
            StmtKind::Return(None) => write!(f, "return;"),
        }
    }
}

// Expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    pub fn is_relational(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i32),
    BoolLiteral(bool),
    Identifier(String),
    This,
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `array[index]`
    Index { array: Box<Expr>, index: Box<Expr> },
    /// `array.length`
    Length(Box<Expr>),
    /// `receiver.method(args)`
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    /// `new T[size]`
    NewArray { element: TypeRef, size: Box<Expr> },
    /// `new C()`
    NewObject(String),
    /// `[e1, e2, ...]`
    ArrayLiteral(Vec<Expr>),
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind, span: Span) -> Self {
        Self { id, kind, span }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl AstNode for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::IntLiteral(v) => write!(f, "{}", v),
            ExprKind::BoolLiteral(b) => write!(f, "{}", b),
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::This => write!(f, "this"),
            ExprKind::Not(e) => write!(f, "!{}", e),
            ExprKind::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::Index { array, index } => write!(f, "{}[{}]", array, index),
            ExprKind::Length(e) => write!(f, "{}.length", e),
            ExprKind::MethodCall { receiver, method, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}.{}({})", receiver, method, args.join(", "))
            }
            ExprKind::NewArray { element, size } => write!(f, "new {}[{}]", element, size),
            ExprKind::NewObject(name) => write!(f, "new {}()", name),
            ExprKind::ArrayLiteral(items) => {
                let items: Vec<String> = items.iter().map(|a| a.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}
