use super::typing;
use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::{Program, Stmt, StmtKind};
use crate::symtab::SymbolTable;

#[derive(Default)]
struct AssignCheck {
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Pass<'a> for AssignCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn stmt(&mut self, scope: Scope<'a>, stmt: &'a Stmt) {
        if let StmtKind::Assign { target, value } = &stmt.kind {
            let dest = scope.resolve(target).and_then(|r| r.ty().cloned());
            if let (Some(dest), Some(src)) = (dest, scope.type_of(value)) {
                // array-valued assignments belong to the array pass
                if !dest.is_array && !src.is_array && !typing::assignable(scope.table, &dest, &src) {
                    self.report(Diagnostic::new(
                        stmt.span,
                        ReviewError::IncompatibleAssignment {
                            target: target.clone(),
                            expected: dest.to_string(),
                            found: src.to_string(),
                        },
                    ));
                }
            }
        }
        visit::walk_stmt(self, scope, stmt);
    }
}

/// Scalar assignments must store a compatible value.
pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(AssignCheck::default(), table, program).diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    fn kinds(body: &str) -> Vec<ReviewError> {
        let src = format!(
            "import a.B; import a.C; class A extends B {{ public int f(int n, boolean b, A self, B base, C other) {{ {} return 0; }} }}",
            body
        );
        let program = parse_jmm(&src).unwrap();
        check(&program, &build(&program)).into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn compatible_assignments() {
        assert!(kinds("n = 1 + n; b = n < 2; self = new A(); base = self; base = other; n = other.x();").is_empty());
    }

    #[test]
    fn incompatible_assignments() {
        assert_eq!(
            kinds("n = b;"),
            vec![ReviewError::IncompatibleAssignment { target: "n".into(), expected: "int".into(), found: "boolean".into() }]
        );
        assert_eq!(kinds("self = base;").len(), 1);
        assert_eq!(kinds("b = self;").len(), 1);
    }
}
