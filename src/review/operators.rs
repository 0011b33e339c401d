use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::{BinaryOp, Expr, ExprKind, Program};
use crate::symtab::SymbolTable;
use crate::types::Type;

#[derive(Default)]
struct OperatorCheck {
    diagnostics: Vec<Diagnostic>,
}

fn operand_ok(op: BinaryOp, ty: &Type) -> bool {
    if op.is_logical() {
        ty.is_boolean()
    } else {
        ty.is_int()
    }
}

impl<'a> Pass<'a> for OperatorCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Binary { op, left, right } => {
                let (l, r) = (scope.type_of(left), scope.type_of(right));
                let bad = |t: &Option<Type>| t.as_ref().is_some_and(|t| !operand_ok(*op, t));
                if bad(&l) || bad(&r) {
                    let show = |t: Option<Type>| t.map(|t| t.to_string()).unwrap_or_else(|| "?".into());
                    self.report(Diagnostic::new(
                        expr.span,
                        ReviewError::InvalidOperands { op: op.symbol().to_string(), left: show(l), right: show(r) },
                    ));
                }
            }
            ExprKind::Not(inner) => {
                if let Some(ty) = scope.type_of(inner).filter(|t| !t.is_boolean()) {
                    self.report(Diagnostic::new(expr.span, ReviewError::InvalidNotOperand(ty.to_string())));
                }
            }
            _ => {}
        }
        visit::walk_expr(self, scope, expr);
    }
}

/// Arithmetic and relational operators take ints, logical ones booleans.
pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(OperatorCheck::default(), table, program).diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    fn kinds(body: &str) -> Vec<ReviewError> {
        let src = format!("import io; class A {{ public boolean f(int a, boolean b, int[] c) {{ {} }} }}", body);
        let program = parse_jmm(&src).unwrap();
        check(&program, &build(&program)).into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn logical_and_on_int() {
        assert_eq!(
            kinds("return a && true;"),
            vec![ReviewError::InvalidOperands { op: "&&".into(), left: "int".into(), right: "boolean".into() }]
        );
    }

    #[test]
    fn mixed_operands() {
        assert_eq!(kinds("return a < b;").len(), 1);
        assert_eq!(kinds("return b + 1 < 2;").len(), 1);
        assert_eq!(kinds("return c + 1 < 2;").len(), 1);
        assert_eq!(kinds("return !a;"), vec![ReviewError::InvalidNotOperand("int".into())]);
    }

    #[test]
    fn unknown_operands_are_trusted() {
        assert!(kinds("return io.x() && b || a * io.y() < 3;").is_empty());
    }
}
