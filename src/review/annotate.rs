//! Side table of expression types consumed by IR generation
//!
//! Types come from [`typing::type_of`] where the symbol table determines
//! them. Elsewhere, typically calls into imported classes, the type the
//! surrounding context expects is recorded instead: an assignment target,
//! a parameter, an operator operand. Expressions with neither get `int`,
//! and calls used as statements get `void`.

use super::typing;
use super::visit::Scope;
use crate::ast::{Expr, ExprKind, NodeId, Program, Stmt, StmtKind};
use crate::symtab::SymbolTable;
use crate::types::Type;
use std::collections::HashMap;

/// Node identity to resolved type, immutable once review is done
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<NodeId, Type>,
}

impl TypeTable {
    pub fn get(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn insert(&mut self, id: NodeId, ty: Type) {
        self.types.insert(id, ty);
    }
}

pub(crate) fn annotate(program: &Program, table: &SymbolTable) -> TypeTable {
    let mut out = TypeTable::default();
    for method in program.class.unique_methods() {
        let scope = Scope::new(table, method);
        for stmt in &method.body {
            stmt_types(scope, stmt, &mut out);
        }
    }
    out
}

fn stmt_types(scope: Scope<'_>, stmt: &Stmt, out: &mut TypeTable) {
    match &stmt.kind {
        StmtKind::Block(stmts) => stmts.iter().for_each(|s| stmt_types(scope, s, out)),
        StmtKind::If { condition, then_branch, else_branch } => {
            expr_types(scope, condition, Some(Type::boolean()), out);
            stmt_types(scope, then_branch, out);
            stmt_types(scope, else_branch, out);
        }
        StmtKind::While { condition, body } => {
            expr_types(scope, condition, Some(Type::boolean()), out);
            stmt_types(scope, body, out);
        }
        StmtKind::Expr(expr) => expr_types(scope, expr, Some(Type::void()), out),
        StmtKind::Assign { target, value } => {
            let expected = scope.resolve(target).and_then(|r| r.ty().cloned());
            expr_types(scope, value, expected, out);
        }
        StmtKind::ArrayAssign { target, index, value } => {
            let element = scope.resolve(target).and_then(|r| r.ty().map(Type::element));
            expr_types(scope, index, Some(Type::int()), out);
            expr_types(scope, value, element, out);
        }
        StmtKind::Return(Some(expr)) => {
            let expected = scope.table.return_type(scope.method_name()).cloned();
            expr_types(scope, expr, expected, out);
        }
        StmtKind::Return(None) => {}
    }
}

fn expr_types(scope: Scope<'_>, expr: &Expr, expected: Option<Type>, out: &mut TypeTable) {
    let own = typing::type_of(scope, expr);
    match &expr.kind {
        ExprKind::IntLiteral(_) | ExprKind::BoolLiteral(_) | ExprKind::This | ExprKind::NewObject(_) => {}
        ExprKind::Identifier(_) => {
            // unresolved names were reported and get no entry
            if let Some(ty) = own {
                out.insert(expr.id, ty);
            }
            return;
        }
        ExprKind::Not(inner) => expr_types(scope, inner, Some(Type::boolean()), out),
        ExprKind::Binary { op, left, right } => {
            let operand = if op.is_logical() { Type::boolean() } else { Type::int() };
            expr_types(scope, left, Some(operand.clone()), out);
            expr_types(scope, right, Some(operand), out);
        }
        ExprKind::Index { array, index } => {
            let array_expected = expected.as_ref().map(Type::array_of).unwrap_or_else(Type::int_array);
            expr_types(scope, array, Some(array_expected), out);
            expr_types(scope, index, Some(Type::int()), out);
        }
        ExprKind::Length(array) => expr_types(scope, array, Some(Type::int_array()), out),
        ExprKind::MethodCall { receiver, method, args } => {
            expr_types(scope, receiver, None, out);
            let local = typing::type_of(scope, receiver)
                .is_some_and(|t| t.class_name() == Some(scope.table.class_name()));
            let params = if local { scope.table.parameters(method) } else { &[] };
            for (i, arg) in args.iter().enumerate() {
                expr_types(scope, arg, params.get(i).map(|p| p.ty.clone()), out);
            }
        }
        ExprKind::NewArray { size, .. } => expr_types(scope, size, Some(Type::int()), out),
        ExprKind::ArrayLiteral(items) => {
            let element = own.as_ref().map(Type::element);
            for item in items {
                expr_types(scope, item, element.clone(), out);
            }
        }
    }
    let ty = own.or(expected).unwrap_or_else(Type::int);
    out.insert(expr.id, ty);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    fn return_expr(program: &Program, method: usize) -> &Expr {
        match &program.class.methods[method].body.last().unwrap().kind {
            StmtKind::Return(Some(e)) => e,
            _ => panic!("expected return"),
        }
    }

    #[test]
    fn external_calls_take_the_expected_type() {
        let src = r#"
import io;
class A {
    public boolean f() { boolean b; b = io.check(); io.print(1); return io.flag(); }
}"#;
        let program = parse_jmm(src).unwrap();
        let types = annotate(&program, &build(&program));
        let body = &program.class.methods[0].body;
        let StmtKind::Assign { value, .. } = &body[0].kind else { panic!() };
        assert_eq!(types.get(value.id), Some(&Type::boolean()));
        let StmtKind::Expr(call) = &body[1].kind else { panic!() };
        assert_eq!(types.get(call.id), Some(&Type::void()));
        assert_eq!(types.get(return_expr(&program, 0).id), Some(&Type::boolean()));
    }

    #[test]
    fn unknown_context_defaults_to_int() {
        let src = "import io; class A { public int f() { return io.a(io.b()) + 1; } }";
        let program = parse_jmm(src).unwrap();
        let types = annotate(&program, &build(&program));
        let ExprKind::Binary { left, .. } = &return_expr(&program, 0).kind else { panic!() };
        let ExprKind::MethodCall { args, .. } = &left.kind else { panic!() };
        assert_eq!(types.get(left.id), Some(&Type::int()));
        assert_eq!(types.get(args[0].id), Some(&Type::int()));
    }

    #[test]
    fn unresolved_identifiers_are_left_out() {
        let program = parse_jmm("class A { public int f() { return nope; } }").unwrap();
        let types = annotate(&program, &build(&program));
        assert!(types.get(return_expr(&program, 0).id).is_none());
    }
}
