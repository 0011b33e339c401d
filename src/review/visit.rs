//! Traversal shared by the review passes
//!
//! A pass overrides the hooks for the node kinds it checks; every other kind
//! falls through to the `walk_*` functions, which recurse into all children.

use super::typing;
use super::Diagnostic;
use crate::ast::*;
use crate::symtab::{Resolved, SymbolTable};
use crate::types::Type;

/// Traversal context inside one method body
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub table: &'a SymbolTable,
    pub method: &'a MethodDecl,
}

impl<'a> Scope<'a> {
    pub fn new(table: &'a SymbolTable, method: &'a MethodDecl) -> Self {
        Self { table, method }
    }

    pub fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        self.table.resolve(&self.method.name, name)
    }

    /// `main` is static whether or not it says so
    pub fn is_static(&self) -> bool {
        self.method.is_static || self.method.is_main()
    }

    pub fn type_of(&self, expr: &Expr) -> Option<Type> {
        typing::type_of(*self, expr)
    }

    pub fn method_name(&self) -> &'a str {
        &self.method.name
    }
}

pub(crate) trait Pass<'a> {
    fn report(&mut self, diagnostic: Diagnostic);

    fn program(&mut self, table: &'a SymbolTable, program: &'a Program) {
        walk_program(self, table, program)
    }

    fn import(&mut self, _table: &'a SymbolTable, _import: &'a ImportDecl) {}

    fn class(&mut self, table: &'a SymbolTable, class: &'a ClassDecl) {
        walk_class(self, table, class)
    }

    fn method(&mut self, scope: Scope<'a>) {
        walk_method(self, scope)
    }

    fn stmt(&mut self, scope: Scope<'a>, stmt: &'a Stmt) {
        walk_stmt(self, scope, stmt)
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        walk_expr(self, scope, expr)
    }
}

pub(crate) fn walk_program<'a, P: Pass<'a> + ?Sized>(pass: &mut P, table: &'a SymbolTable, program: &'a Program) {
    for import in &program.imports {
        pass.import(table, import);
    }
    pass.class(table, &program.class);
}

pub(crate) fn walk_class<'a, P: Pass<'a> + ?Sized>(pass: &mut P, table: &'a SymbolTable, class: &'a ClassDecl) {
    for method in class.unique_methods() {
        pass.method(Scope::new(table, method));
    }
}

pub(crate) fn walk_method<'a, P: Pass<'a> + ?Sized>(pass: &mut P, scope: Scope<'a>) {
    for stmt in &scope.method.body {
        pass.stmt(scope, stmt);
    }
}

pub(crate) fn walk_stmt<'a, P: Pass<'a> + ?Sized>(pass: &mut P, scope: Scope<'a>, stmt: &'a Stmt) {
    match &stmt.kind {
        StmtKind::Block(stmts) => {
            for s in stmts {
                pass.stmt(scope, s);
            }
        }
        StmtKind::If { condition, then_branch, else_branch } => {
            pass.expr(scope, condition);
            pass.stmt(scope, then_branch);
            pass.stmt(scope, else_branch);
        }
        StmtKind::While { condition, body } => {
            pass.expr(scope, condition);
            pass.stmt(scope, body);
        }
        StmtKind::Expr(expr) => pass.expr(scope, expr),
        StmtKind::Assign { value, .. } => pass.expr(scope, value),
        StmtKind::ArrayAssign { index, value, .. } => {
            pass.expr(scope, index);
            pass.expr(scope, value);
        }
        StmtKind::Return(Some(expr)) => pass.expr(scope, expr),
        StmtKind::Return(None) => {}
    }
}

pub(crate) fn walk_expr<'a, P: Pass<'a> + ?Sized>(pass: &mut P, scope: Scope<'a>, expr: &'a Expr) {
    match &expr.kind {
        ExprKind::IntLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::Identifier(_)
        | ExprKind::This
        | ExprKind::NewObject(_) => {}
        ExprKind::Not(inner) | ExprKind::Length(inner) => pass.expr(scope, inner),
        ExprKind::Binary { left, right, .. } => {
            pass.expr(scope, left);
            pass.expr(scope, right);
        }
        ExprKind::Index { array, index } => {
            pass.expr(scope, array);
            pass.expr(scope, index);
        }
        ExprKind::MethodCall { receiver, args, .. } => {
            pass.expr(scope, receiver);
            for arg in args {
                pass.expr(scope, arg);
            }
        }
        ExprKind::NewArray { size, .. } => pass.expr(scope, size),
        ExprKind::ArrayLiteral(items) => {
            for item in items {
                pass.expr(scope, item);
            }
        }
    }
}

/// Drive `pass` over the whole program and hand it back
pub(crate) fn run<'a, P: Pass<'a>>(mut pass: P, table: &'a SymbolTable, program: &'a Program) -> P {
    pass.program(table, program);
    pass
}
