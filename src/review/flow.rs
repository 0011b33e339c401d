use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::{Expr, Program, Stmt, StmtKind};
use crate::symtab::SymbolTable;

#[derive(Default)]
struct ConditionCheck {
    diagnostics: Vec<Diagnostic>,
}

impl ConditionCheck {
    fn condition(&mut self, scope: Scope<'_>, condition: &Expr) {
        if let Some(ty) = scope.type_of(condition).filter(|t| !t.is_boolean()) {
            self.report(Diagnostic::new(condition.span, ReviewError::ConditionNotBoolean(ty.to_string())));
        }
    }
}

impl<'a> Pass<'a> for ConditionCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn stmt(&mut self, scope: Scope<'a>, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::If { condition, .. } | StmtKind::While { condition, .. } => self.condition(scope, condition),
            _ => {}
        }
        visit::walk_stmt(self, scope, stmt);
    }
}

/// `if` and `while` conditions must produce a boolean.
pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(ConditionCheck::default(), table, program).diagnostics
}
