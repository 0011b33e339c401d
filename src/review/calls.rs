//! Method invocations on the current class

use super::typing;
use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::{Expr, ExprKind, Program};
use crate::symtab::{Resolved, SymbolTable};
use crate::types::TypeKind;

#[derive(Default)]
struct CallCheck {
    diagnostics: Vec<Diagnostic>,
}

impl CallCheck {
    fn call(&mut self, scope: Scope<'_>, expr: &Expr, receiver: &Expr, method: &str, args: &[Expr]) {
        // static call on an imported class: its signatures are unknown
        if let Some(Resolved::Import(_)) = receiver.as_identifier().and_then(|n| scope.resolve(n)) {
            return;
        }
        let Some(ty) = scope.type_of(receiver) else { return };
        if ty.is_array || !matches!(ty.kind, TypeKind::Class(_)) {
            self.report(Diagnostic::new(
                expr.span,
                ReviewError::InvokeOnPrimitive { method: method.to_string(), ty: ty.to_string() },
            ));
            return;
        }

        let table = scope.table;
        if ty.class_name() != Some(table.class_name()) {
            return;
        }
        if !table.has_method(method) {
            // an inherited method cannot be checked
            if table.super_class().is_none() {
                self.report(Diagnostic::new(
                    expr.span,
                    ReviewError::UndeclaredMethod { class: table.class_name().to_string(), method: method.to_string() },
                ));
            }
            return;
        }

        let params = table.parameters(method);
        if params.len() != args.len() {
            let declared: Vec<String> = params.iter().map(|p| p.ty.to_string()).collect();
            self.report(
                Diagnostic::new(
                    expr.span,
                    ReviewError::ArgumentCountMismatch { method: method.to_string(), expected: params.len(), found: args.len() },
                )
                .with_cause(format!("declared as {}({})", method, declared.join(", "))),
            );
            return;
        }
        for (i, (param, arg)) in params.iter().zip(args).enumerate() {
            let Some(found) = scope.type_of(arg) else { continue };
            if !typing::assignable(table, &param.ty, &found) {
                self.report(Diagnostic::new(
                    arg.span,
                    ReviewError::ArgumentTypeMismatch {
                        method: method.to_string(),
                        index: i + 1,
                        expected: param.ty.to_string(),
                        found: found.to_string(),
                    },
                ));
            }
        }
    }
}

impl<'a> Pass<'a> for CallCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        if let ExprKind::MethodCall { receiver, method, args } = &expr.kind {
            self.call(scope, expr, receiver, method, args);
        }
        visit::walk_expr(self, scope, expr);
    }
}

pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(CallCheck::default(), table, program).diagnostics
}
