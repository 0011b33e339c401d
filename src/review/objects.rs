use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::{Expr, ExprKind, Program};
use crate::symtab::SymbolTable;

#[derive(Default)]
struct ObjectCheck {
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Pass<'a> for ObjectCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        if let ExprKind::NewObject(class) = &expr.kind {
            if class != scope.table.class_name() && !scope.table.is_imported(class) {
                self.report(Diagnostic::new(expr.span, ReviewError::UnknownClass(class.clone())));
            }
        }
        visit::walk_expr(self, scope, expr);
    }
}

/// `new C()` names the current class or an import.
pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(ObjectCheck::default(), table, program).diagnostics
}
