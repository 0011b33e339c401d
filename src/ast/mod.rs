//! Abstract Syntax Tree (AST) representation for Java--
//!
//! The tree is a closed set of node types. Every pass matches exhaustively, so
//! a new node kind does not compile until each stage handles it.

mod nodes;

pub use nodes::*;

use std::fmt;

/// 1-based position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end of a node; diagnostics report the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn line(&self) -> usize {
        self.start.line
    }

    pub fn column(&self) -> usize {
        self.start.column
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column)
    }
}

/// Identity of an expression node, stable for the lifetime of the tree.
/// Keys the analyzer's type side-table.
pub type NodeId = u32;

/// AST node trait that all AST nodes implement
pub trait AstNode {
    /// Get the source span of this node
    fn span(&self) -> Span;
}

/// Main AST root node: imports followed by exactly one class
#[derive(Debug, Clone)]
pub struct Program {
    pub imports: Vec<ImportDecl>,
    pub class: ClassDecl,
    pub span: Span,
}

impl AstNode for Program {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "{}", import)?;
        }
        write!(f, "{}", self.class)
    }
}
