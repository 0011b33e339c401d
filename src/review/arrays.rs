//! Array indexing, `length`, construction and array-valued assignment

use super::typing;
use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::*;
use crate::symtab::SymbolTable;

#[derive(Default)]
struct ArrayCheck {
    diagnostics: Vec<Diagnostic>,
}

impl ArrayCheck {
    fn index(&mut self, scope: Scope<'_>, index: &Expr) {
        if let Some(ty) = scope.type_of(index).filter(|t| !t.is_int()) {
            self.report(Diagnostic::new(index.span, ReviewError::IndexNotInteger(ty.to_string())));
        }
    }
}

impl<'a> Pass<'a> for ArrayCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn stmt(&mut self, scope: Scope<'a>, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let dest = scope.resolve(target).and_then(|r| r.ty().cloned());
                if let (Some(dest), Some(src)) = (dest, scope.type_of(value)) {
                    if (dest.is_array || src.is_array) && dest != src {
                        self.report(Diagnostic::new(
                            value.span,
                            ReviewError::ArrayValueMismatch {
                                target: target.clone(),
                                expected: dest.to_string(),
                                found: src.to_string(),
                            },
                        ));
                    } else if dest.is_array && !produces_array(value) {
                        self.report(Diagnostic::new(
                            value.span,
                            ReviewError::ArraySourceNotAllowed { target: target.clone(), found: value.to_string() },
                        ));
                    }
                }
            }
            StmtKind::ArrayAssign { target, index, value } => {
                self.index(scope, index);
                match scope.resolve(target).and_then(|r| r.ty().cloned()) {
                    Some(dest) if !dest.is_array => {
                        self.report(Diagnostic::new(stmt.span, ReviewError::IndexOnNonArray(dest.to_string())))
                    }
                    Some(dest) => {
                        let element = dest.element();
                        if let Some(src) = scope.type_of(value) {
                            if !typing::assignable(scope.table, &element, &src) {
                                self.report(Diagnostic::new(
                                    value.span,
                                    ReviewError::ArrayValueMismatch {
                                        target: format!("{}[]", target),
                                        expected: element.to_string(),
                                        found: src.to_string(),
                                    },
                                ));
                            }
                        }
                    }
                    None => {}
                }
            }
            _ => {}
        }
        visit::walk_stmt(self, scope, stmt);
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Index { array, index } => {
                if let Some(ty) = scope.type_of(array).filter(|t| !t.is_array) {
                    self.report(Diagnostic::new(array.span, ReviewError::IndexOnNonArray(ty.to_string())));
                }
                self.index(scope, index);
            }
            ExprKind::Length(array) => {
                if let Some(ty) = scope.type_of(array).filter(|t| !t.is_array) {
                    self.report(Diagnostic::new(expr.span, ReviewError::LengthOnNonArray(ty.to_string())));
                }
            }
            ExprKind::NewArray { size, .. } => {
                if let Some(ty) = scope.type_of(size).filter(|t| !t.is_int()) {
                    self.report(Diagnostic::new(size.span, ReviewError::ArraySizeNotInteger(ty.to_string())));
                }
            }
            ExprKind::ArrayLiteral(items) => {
                let typed: Vec<_> = items.iter().filter_map(|i| scope.type_of(i).map(|t| (i, t))).collect();
                if let Some((_, first)) = typed.first() {
                    let expected = first.element();
                    for (item, ty) in &typed {
                        if *ty != expected {
                            self.report(Diagnostic::new(
                                item.span,
                                ReviewError::ArrayElementMismatch { expected: expected.to_string(), found: ty.to_string() },
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
        visit::walk_expr(self, scope, expr);
    }
}

/// Array variables only take freshly built arrays or call results
fn produces_array(value: &Expr) -> bool {
    matches!(value.kind, ExprKind::ArrayLiteral(_) | ExprKind::NewArray { .. } | ExprKind::MethodCall { .. })
}

pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(ArrayCheck::default(), table, program).diagnostics
}
