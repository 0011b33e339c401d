//! Static types of expressions as far as the symbol table can tell them

use super::visit::Scope;
use crate::ast::{Expr, ExprKind};
use crate::symtab::{type_from_ref, Resolved, SymbolTable};
use crate::types::{Type, TypeKind};

/// Type of `expr`, or `None` when it cannot be known locally (unresolved
/// names, calls into imported or inherited code).
pub(crate) fn type_of(scope: Scope<'_>, expr: &Expr) -> Option<Type> {
    match &expr.kind {
        ExprKind::IntLiteral(_) => Some(Type::int()),
        ExprKind::BoolLiteral(_) => Some(Type::boolean()),
        ExprKind::Identifier(name) => match scope.resolve(name)? {
            Resolved::Import(simple) => Some(Type::class(simple)),
            resolved => resolved.ty().cloned(),
        },
        ExprKind::This => Some(Type::class(scope.table.class_name())),
        ExprKind::Not(_) => Some(Type::boolean()),
        ExprKind::Binary { op, .. } => {
            if op.is_arithmetic() {
                Some(Type::int())
            } else {
                Some(Type::boolean())
            }
        }
        ExprKind::Index { array, .. } => {
            let array = type_of(scope, array)?;
            array.is_array.then(|| array.element())
        }
        ExprKind::Length(_) => Some(Type::int()),
        ExprKind::MethodCall { receiver, method, .. } => {
            let receiver = type_of(scope, receiver)?;
            if receiver.class_name() == Some(scope.table.class_name()) {
                scope.table.return_type(method).cloned()
            } else {
                None
            }
        }
        ExprKind::NewArray { element, .. } => Some(Type::array_of(&type_from_ref(element))),
        ExprKind::NewObject(class) => Some(Type::class(class.as_str())),
        ExprKind::ArrayLiteral(items) => {
            let element = items.iter().find_map(|item| type_of(scope, item));
            Some(element.map(|t| Type::array_of(&t)).unwrap_or_else(Type::int_array))
        }
    }
}

/// Whether a value of type `src` may be stored where `dest` is expected.
///
/// Besides equal types, the current class converts to its superclass and
/// imported classes are interchangeable, since their hierarchy is unknown.
pub(crate) fn assignable(table: &SymbolTable, dest: &Type, src: &Type) -> bool {
    if dest == src {
        return true;
    }
    if dest.is_array || src.is_array {
        return false;
    }
    match (&dest.kind, &src.kind) {
        (TypeKind::Class(d), TypeKind::Class(s)) => {
            let upcast = s == table.class_name() && table.super_class() == Some(d.as_str());
            upcast || (table.is_imported(d) && table.is_imported(s))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    #[test]
    fn assignability_follows_declared_hierarchy() {
        let program = parse_jmm("import a.B; import c.D; class A extends B { }").unwrap();
        let table = build(&program);
        assert!(assignable(&table, &Type::int(), &Type::int()));
        assert!(!assignable(&table, &Type::int(), &Type::boolean()));
        assert!(assignable(&table, &Type::class("B"), &Type::class("A")));
        assert!(!assignable(&table, &Type::class("A"), &Type::class("B")));
        assert!(assignable(&table, &Type::class("D"), &Type::class("B")));
        assert!(!assignable(&table, &Type::int_array(), &Type::int()));
    }

    #[test]
    fn expression_types() {
        let program = parse_jmm(
            "import io; class A { int[] xs; public int f(int n) { return io.read() + this.f(xs[n]) + xs.length; } }",
        )
        .unwrap();
        let table = build(&program);
        let method = &program.class.methods[0];
        let scope = Scope::new(&table, method);
        let crate::ast::StmtKind::Return(Some(expr)) = &method.body[0].kind else { panic!() };
        assert_eq!(type_of(scope, expr), Some(Type::int()));
        let ExprKind::Binary { left, .. } = &expr.kind else { panic!() };
        let ExprKind::Binary { left: io_call, right: self_call, .. } = &left.kind else { panic!() };
        assert_eq!(type_of(scope, io_call), None);
        assert_eq!(type_of(scope, self_call), Some(Type::int()));
    }
}
