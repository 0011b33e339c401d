//! Method contracts: declarations, returns, `main`, and static context

use super::typing;
use super::visit::{self, Pass, Scope};
use super::{Diagnostic, ReviewError};
use crate::ast::*;
use crate::consts::LENGTH;
use crate::symtab::{type_from_ref, Resolved, SymbolTable};
use crate::types::Type;
use std::collections::HashSet;

#[derive(Default)]
struct MethodCheck {
    diagnostics: Vec<Diagnostic>,
}

impl MethodCheck {
    fn variables(&mut self, method: &MethodDecl) {
        let mut params = HashSet::new();
        for param in &method.params {
            if !params.insert(param.name.as_str()) {
                self.report(Diagnostic::new(
                    param.span,
                    ReviewError::DuplicateParameter { method: method.name.clone(), name: param.name.clone() },
                ));
            }
            self.variable(param);
        }

        let mut locals = HashSet::new();
        for local in &method.locals {
            if !locals.insert(local.name.as_str()) {
                self.report(Diagnostic::new(
                    local.span,
                    ReviewError::DuplicateLocal { method: method.name.clone(), name: local.name.clone() },
                ));
            } else if params.contains(local.name.as_str()) {
                self.report(Diagnostic::new(
                    local.span,
                    ReviewError::LocalShadowsParameter { method: method.name.clone(), name: local.name.clone() },
                ));
            }
            self.variable(local);
        }
    }

    fn variable(&mut self, decl: &VarDecl) {
        if decl.name == LENGTH {
            self.report(Diagnostic::new(decl.span, ReviewError::ReservedName(decl.name.clone())));
        }
        if decl.type_ref.base == BaseType::Void {
            self.report(Diagnostic::new(decl.span, ReviewError::VoidVariable(decl.name.clone())));
        }
    }

    fn main_signature(&mut self, method: &MethodDecl) {
        let single_string_array = method.params.len() == 1
            && method.params[0].type_ref.is_array
            && method.params[0].type_ref.base == BaseType::String;
        if !single_string_array {
            self.report(Diagnostic::new(
                method.span,
                ReviewError::InvalidMainSignature("expected exactly one 'String[]' parameter".into()),
            ));
        }
        if !type_from_ref(&method.return_type).is_void() {
            self.report(Diagnostic::new(
                method.span,
                ReviewError::InvalidMainSignature("return type must be 'void'".into()),
            ));
        }
    }

    fn returns(&mut self, scope: Scope<'_>) {
        let method = scope.method;
        let declared = type_from_ref(&method.return_type);
        let mut found = Vec::new();
        collect_returns(&method.body, &mut found);

        if !declared.is_void() && !method.is_main() {
            let last_is_return = method.body.last().is_some_and(Stmt::is_return);
            match found.len() {
                0 => self.report(Diagnostic::new(method.span, ReviewError::MissingReturn(method.name.clone()))),
                1 if !last_is_return => {
                    self.report(Diagnostic::new(found[0].span, ReviewError::ReturnNotLast(method.name.clone())))
                }
                1 => {}
                _ => {
                    for extra in &found[1..] {
                        self.report(Diagnostic::new(extra.span, ReviewError::MultipleReturns(method.name.clone())));
                    }
                }
            }
        }

        for stmt in found {
            let StmtKind::Return(value) = &stmt.kind else { continue };
            match value {
                Some(_) if declared.is_void() => {
                    self.report(Diagnostic::new(stmt.span, ReviewError::ValueReturnInVoid(method.name.clone())))
                }
                None if !declared.is_void() => {
                    self.report(Diagnostic::new(stmt.span, ReviewError::MissingReturnValue(method.name.clone())))
                }
                Some(expr) => {
                    let Some(found) = scope.type_of(expr) else { continue };
                    if !typing::assignable(scope.table, &declared, &found) {
                        self.report(Diagnostic::new(
                            expr.span,
                            ReviewError::ReturnTypeMismatch {
                                method: method.name.clone(),
                                expected: declared.to_string(),
                                found: found.to_string(),
                            },
                        ));
                    }
                }
                None => {}
            }
        }
    }
}

fn collect_returns<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a Stmt>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Return(_) => out.push(stmt),
            StmtKind::Block(inner) => collect_returns(inner, out),
            StmtKind::If { then_branch, else_branch, .. } => {
                collect_returns(std::slice::from_ref(then_branch.as_ref()), out);
                collect_returns(std::slice::from_ref(else_branch.as_ref()), out);
            }
            StmtKind::While { body, .. } => collect_returns(std::slice::from_ref(body.as_ref()), out),
            StmtKind::Expr(_) | StmtKind::Assign { .. } | StmtKind::ArrayAssign { .. } => {}
        }
    }
}

impl<'a> Pass<'a> for MethodCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn class(&mut self, table: &'a SymbolTable, class: &'a ClassDecl) {
        let mut names = HashSet::new();
        for method in &class.methods {
            if !names.insert(method.name.as_str()) {
                self.report(Diagnostic::new(method.span, ReviewError::DuplicateMethod(method.name.clone())));
            }
        }
        visit::walk_class(self, table, class);
    }

    fn method(&mut self, scope: Scope<'a>) {
        self.variables(scope.method);
        if scope.method.is_main() {
            self.main_signature(scope.method);
        }
        self.returns(scope);
    }
}

/// Declarations, return shape and the `main` signature of every method.
pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(MethodCheck::default(), table, program).diagnostics
}

/// Static methods reach instance state only through locals.
#[derive(Default)]
struct StaticContext {
    diagnostics: Vec<Diagnostic>,
}

impl StaticContext {
    fn field_use(&mut self, scope: Scope<'_>, name: &str, span: Span) {
        if let Some(Resolved::Field(field)) = scope.resolve(name) {
            self.report(Diagnostic::new(
                span,
                ReviewError::FieldInStatic { method: scope.method.name.clone(), field: field.name.clone() },
            ));
        }
    }
}

impl<'a> Pass<'a> for StaticContext {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn method(&mut self, scope: Scope<'a>) {
        if scope.is_static() {
            visit::walk_method(self, scope);
        }
    }

    fn stmt(&mut self, scope: Scope<'a>, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Assign { target, .. } | StmtKind::ArrayAssign { target, .. } => {
                self.field_use(scope, target, stmt.span)
            }
            _ => {}
        }
        visit::walk_stmt(self, scope, stmt);
    }

    fn expr(&mut self, scope: Scope<'a>, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::This => {
                self.report(Diagnostic::new(expr.span, ReviewError::ThisInStatic(scope.method.name.clone())))
            }
            ExprKind::Identifier(name) => self.field_use(scope, name, expr.span),
            _ => {}
        }
        visit::walk_expr(self, scope, expr);
    }
}

pub(crate) fn check_static_context(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(StaticContext::default(), table, program).diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    fn kinds(src: &str, pass: fn(&Program, &SymbolTable) -> Vec<Diagnostic>) -> Vec<ReviewError> {
        let program = parse_jmm(src).unwrap();
        pass(&program, &build(&program)).into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn well_formed_methods_pass() {
        let src = r#"
class A {
    int x;
    public int get() { return x; }
    public void set(int v) { x = v; }
    public A self() { return this; }
    public static void main(String[] args) { }
}"#;
        assert!(kinds(src, check).is_empty());
        assert!(kinds(src, check_static_context).is_empty());
    }

    #[test]
    fn duplicate_declarations() {
        let found = kinds("class A { int f(int a, int a) { int b; int b; int a; return 0; } int f() { return 1; } }", check);
        assert!(found.contains(&ReviewError::DuplicateMethod("f".into())));
        assert!(found.contains(&ReviewError::DuplicateParameter { method: "f".into(), name: "a".into() }));
        assert!(found.contains(&ReviewError::DuplicateLocal { method: "f".into(), name: "b".into() }));
        assert!(found.contains(&ReviewError::LocalShadowsParameter { method: "f".into(), name: "a".into() }));
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn return_shape() {
        assert_eq!(kinds("class A { int f() { } }", check), vec![ReviewError::MissingReturn("f".into())]);
        assert_eq!(
            kinds("class A { int f() { return 1; return 2; } }", check),
            vec![ReviewError::MultipleReturns("f".into())]
        );
        assert_eq!(
            kinds("class A { int f(int a) { if (true) { return 1; } else { } a = 2; } }", check),
            vec![ReviewError::ReturnNotLast("f".into())]
        );
    }

    #[test]
    fn return_types() {
        assert_eq!(
            kinds("class A { int[] f() { return 1; } }", check),
            vec![ReviewError::ReturnTypeMismatch { method: "f".into(), expected: "int[]".into(), found: "int".into() }]
        );
        assert_eq!(kinds("class A { void f() { return 1; } }", check), vec![ReviewError::ValueReturnInVoid("f".into())]);
        assert!(kinds("import io; class A { boolean f() { return io.ok(); } }", check).is_empty());
    }

    #[test]
    fn main_signature() {
        let found = kinds("class A { public static int main(int x) { return 0; } }", check);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|k| matches!(k, ReviewError::InvalidMainSignature(_))));
    }

    #[test]
    fn main_cannot_touch_instance_state() {
        let src = "class A { int x; public void f() { } public static void main(String[] args) { int y; y = x; x = 1; this.f(); } }";
        assert_eq!(
            kinds(src, check_static_context),
            vec![
                ReviewError::FieldInStatic { method: "main".into(), field: "x".into() },
                ReviewError::FieldInStatic { method: "main".into(), field: "x".into() },
                ReviewError::ThisInStatic("main".into()),
            ]
        );
    }
}
