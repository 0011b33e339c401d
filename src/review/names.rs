//! Every name must denote something declared

use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::*;
use crate::symtab::{Resolved, SymbolTable};

#[derive(Default)]
struct NameCheck {
    diagnostics: Vec<Diagnostic>,
}

impl NameCheck {
    fn declared_type(&mut self, table: &SymbolTable, type_ref: &TypeRef) {
        if let BaseType::Named(name) = &type_ref.base {
            if !table.is_known_class(name) {
                self.report(Diagnostic::new(type_ref.span, ReviewError::UnknownType(name.clone())));
            }
        }
    }

    fn variable(&mut self, scope: Scope<'_>, name: &str, span: Span) {
        match scope.resolve(name) {
            None => self.report(Diagnostic::new(span, ReviewError::UndeclaredVariable(name.to_string()))),
            Some(Resolved::Import(_)) => self.report(Diagnostic::new(span, ReviewError::NotAVariable(name.to_string()))),
            Some(_) => {}
        }
    }
}

impl<'a> Pass<'a> for NameCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn class(&mut self, table: &'a SymbolTable, class: &'a ClassDecl) {
        for field in &class.fields {
            self.declared_type(table, &field.type_ref);
        }
        visit::walk_class(self, table, class);
    }

    fn method(&mut self, scope: Scope<'a>) {
        let method = scope.method;
        self.declared_type(scope.table, &method.return_type);
        for decl in method.params.iter().chain(&method.locals) {
            self.declared_type(scope.table, &decl.type_ref);
        }
        visit::walk_method(self, scope);
    }

    fn stmt(&mut self, scope: Scope<'a>, stmt: &'a Stmt) {
        if let StmtKind::Assign { target, .. } | StmtKind::ArrayAssign { target, .. } = &stmt.kind {
            self.variable(scope, target, stmt.span);
        }
        visit::walk_stmt(self, scope, stmt);
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Identifier(name) => self.variable(scope, name, expr.span),
            // `io.println(x)`: the receiver names a class
            ExprKind::MethodCall { receiver, args, .. }
                if matches!(receiver.as_identifier().and_then(|n| scope.resolve(n)), Some(Resolved::Import(_))) =>
            {
                for arg in args {
                    self.expr(scope, arg);
                }
            }
            ExprKind::NewArray { element, .. } => {
                self.declared_type(scope.table, element);
                visit::walk_expr(self, scope, expr);
            }
            _ => visit::walk_expr(self, scope, expr),
        }
    }
}

pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(NameCheck::default(), table, program).diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    fn kinds(src: &str) -> Vec<ReviewError> {
        let program = parse_jmm(src).unwrap();
        check(&program, &build(&program)).into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn resolved_names_pass() {
        assert!(kinds("import io; class A { int f; public int g(int p) { int l; l = p + f; io.print(l); return l; } }").is_empty());
    }

    #[test]
    fn undeclared_names() {
        assert_eq!(
            kinds("class A { public int g() { y = 1; return z; } }"),
            vec![ReviewError::UndeclaredVariable("y".into()), ReviewError::UndeclaredVariable("z".into())]
        );
    }

    #[test]
    fn imports_are_not_values() {
        assert_eq!(
            kinds("import io; class A { public int g() { int x; x = io; return 0; } }"),
            vec![ReviewError::NotAVariable("io".into())]
        );
    }

    #[test]
    fn unknown_declared_types() {
        assert_eq!(
            kinds("class A { Foo f; public Bar g(Baz b) { return b; } }"),
            vec![
                ReviewError::UnknownType("Foo".into()),
                ReviewError::UnknownType("Bar".into()),
                ReviewError::UnknownType("Baz".into()),
            ]
        );
    }
}
