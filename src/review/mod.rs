//! Semantic review of one Java-- class
//!
//! Each check is an independent pass over the whole tree sharing only the
//! read-only [`SymbolTable`] and AST. Passes never stop at the first problem;
//! everything they find is collected as a [`Diagnostic`]. After the checks,
//! the annotator records the type of every expression in a [`TypeTable`] for
//! IR generation.

use crate::ast::{Program, Span};
use crate::symtab::SymbolTable;
use std::fmt;

mod visit;
mod typing;
mod annotate;
mod imports;
mod class;
mod methods;
mod names;
mod operators;
mod arrays;
mod assign;
mod objects;
mod calls;
mod flow;

pub use annotate::TypeTable;

/// Pipeline stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Semantic => write!(f, "SEMANTIC"),
        }
    }
}

/// Kinds of user errors found by the review passes
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("duplicate import '{0}'")]
    DuplicateImport(String),
    #[error("duplicate field '{0}'")]
    DuplicateField(String),
    #[error("duplicate method '{0}'")]
    DuplicateMethod(String),
    #[error("duplicate parameter '{name}' in method '{method}'")]
    DuplicateParameter { method: String, name: String },
    #[error("duplicate local variable '{name}' in method '{method}'")]
    DuplicateLocal { method: String, name: String },
    #[error("local variable '{name}' redeclares a parameter of method '{method}'")]
    LocalShadowsParameter { method: String, name: String },
    #[error("'{0}' is reserved and cannot name a variable")]
    ReservedName(String),
    #[error("variable '{0}' cannot have type void")]
    VoidVariable(String),
    #[error("superclass '{0}' is not imported")]
    UnknownSuperclass(String),
    #[error("unknown type '{0}'")]
    UnknownType(String),
    #[error("cannot find symbol '{0}'")]
    UndeclaredVariable(String),
    #[error("'{0}' is a class, not a variable")]
    NotAVariable(String),
    #[error("operator '{op}' cannot be applied to '{left}' and '{right}'")]
    InvalidOperands { op: String, left: String, right: String },
    #[error("operator '!' cannot be applied to '{0}'")]
    InvalidNotOperand(String),
    #[error("array index must be int, found '{0}'")]
    IndexNotInteger(String),
    #[error("cannot index a value of type '{0}'")]
    IndexOnNonArray(String),
    #[error("'length' requires an array, found '{0}'")]
    LengthOnNonArray(String),
    #[error("array size must be int, found '{0}'")]
    ArraySizeNotInteger(String),
    #[error("array element of type '{found}' where '{expected}' is required")]
    ArrayElementMismatch { expected: String, found: String },
    #[error("cannot assign '{found}' to '{target}' of type '{expected}'")]
    ArrayValueMismatch { target: String, expected: String, found: String },
    #[error("array '{target}' can only be assigned an array literal, a new array or a call result, found '{found}'")]
    ArraySourceNotAllowed { target: String, found: String },
    #[error("incompatible types: cannot assign '{found}' to '{target}' of type '{expected}'")]
    IncompatibleAssignment { target: String, expected: String, found: String },
    #[error("cannot instantiate '{0}': neither the current class nor an imported class")]
    UnknownClass(String),
    #[error("method '{method}' is not declared in '{class}'")]
    UndeclaredMethod { class: String, method: String },
    #[error("method '{method}' expects {expected} argument(s), found {found}")]
    ArgumentCountMismatch { method: String, expected: usize, found: usize },
    #[error("argument {index} of '{method}' must be '{expected}', found '{found}'")]
    ArgumentTypeMismatch { method: String, index: usize, expected: String, found: String },
    #[error("cannot invoke '{method}' on a value of type '{ty}'")]
    InvokeOnPrimitive { method: String, ty: String },
    #[error("condition must be boolean, found '{0}'")]
    ConditionNotBoolean(String),
    #[error("method '{0}' must end with a return statement")]
    MissingReturn(String),
    #[error("method '{0}' must contain exactly one return statement")]
    MultipleReturns(String),
    #[error("return in method '{0}' must be its last statement")]
    ReturnNotLast(String),
    #[error("method '{method}' returns '{expected}', found '{found}'")]
    ReturnTypeMismatch { method: String, expected: String, found: String },
    #[error("void method '{0}' cannot return a value")]
    ValueReturnInVoid(String),
    #[error("method '{0}' must return a value")]
    MissingReturnValue(String),
    #[error("invalid main method: {0}")]
    InvalidMainSignature(String),
    #[error("'this' cannot be used in static method '{0}'")]
    ThisInStatic(String),
    #[error("field '{field}' cannot be referenced from static method '{method}'")]
    FieldInStatic { method: String, field: String },
}

/// One user error with its best known location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub kind: ReviewError,
    pub cause: Option<String>,
}

impl Diagnostic {
    pub fn new(span: Span, kind: ReviewError) -> Self {
        Self {
            stage: Stage::Semantic,
            line: span.line(),
            column: span.column(),
            message: kind.to_string(),
            kind,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.line, self.column, self.stage, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

/// Output of semantic review
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub types: TypeTable,
}

impl Analysis {
    /// True when no diagnostic was reported and the unit may be lowered
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Run every review pass over `program`, then annotate expression types.
pub fn review(program: &Program, table: &SymbolTable) -> Analysis {
    log::debug!("review start: class={} methods={}", table.class_name(), table.methods().len());

    let passes: [(&str, fn(&Program, &SymbolTable) -> Vec<Diagnostic>); 11] = [
        ("imports", imports::check),
        ("class", class::check),
        ("methods", methods::check),
        ("names", names::check),
        ("operators", operators::check),
        ("arrays", arrays::check),
        ("assign", assign::check),
        ("objects", objects::check),
        ("calls", calls::check),
        ("flow", flow::check),
        ("static-context", methods::check_static_context),
    ];

    let mut diagnostics = Vec::new();
    for (name, pass) in passes {
        let found = pass(program, table);
        log::trace!("review pass '{}': {} diagnostic(s)", name, found.len());
        diagnostics.extend(found);
    }

    let types = annotate::annotate(program, table);
    log::debug!(
        "review end: {} diagnostic(s), {} typed expression(s)",
        diagnostics.len(),
        types.len()
    );
    Analysis { diagnostics, types }
}
