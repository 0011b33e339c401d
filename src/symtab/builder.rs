use super::{MethodSignature, SymbolTable};
use crate::ast::{BaseType, MethodDecl, Program, TypeRef, VarDecl};
use crate::types::{Symbol, Type, TypeKind};

/// Type denoted by a declaration's type reference
pub fn type_from_ref(type_ref: &TypeRef) -> Type {
    let kind = match &type_ref.base {
        BaseType::Int => TypeKind::Int,
        BaseType::Boolean => TypeKind::Boolean,
        BaseType::String => TypeKind::String,
        BaseType::Void => TypeKind::Void,
        BaseType::Named(name) => TypeKind::Class(name.clone()),
    };
    Type::new(kind, type_ref.is_array)
}

fn symbol(decl: &VarDecl) -> Symbol {
    Symbol::new(decl.name.clone(), type_from_ref(&decl.type_ref))
}

/// Unique-name symbols, first declaration wins
fn unique_symbols(decls: &[VarDecl]) -> Vec<Symbol> {
    let mut out: Vec<Symbol> = Vec::with_capacity(decls.len());
    for decl in decls {
        if !out.iter().any(|s| s.name == decl.name) {
            out.push(symbol(decl));
        }
    }
    out
}

fn signature(method: &MethodDecl) -> MethodSignature {
    MethodSignature {
        return_type: Some(type_from_ref(&method.return_type)),
        params: unique_symbols(&method.params),
        locals: unique_symbols(&method.locals),
        is_static: method.is_static || method.is_main(),
    }
}

/// Scan one program and collect its declarations.
///
/// Duplicated names keep their first declaration; reporting duplicates is the
/// analyzer's job.
pub fn build(program: &Program) -> SymbolTable {
    let mut table = SymbolTable::default();

    for import in &program.imports {
        let path = import.qualified_name();
        if !table.imports.contains(&path) {
            table.imports.push(path);
        }
    }

    let class = &program.class;
    table.class_name = class.name.clone();
    table.super_class = class.extends.clone();
    table.fields = unique_symbols(&class.fields);

    for method in &class.methods {
        if table.signatures.contains_key(&method.name) {
            continue;
        }
        table.methods.push(method.name.clone());
        table.signatures.insert(method.name.clone(), signature(method));
    }

    log::debug!(
        "symbol table for '{}': {} import(s), {} field(s), {} method(s)",
        table.class_name,
        table.imports.len(),
        table.fields.len(),
        table.methods.len()
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::Resolved;

    fn table(src: &str) -> SymbolTable {
        build(&parse_jmm(src).expect("parse"))
    }

    #[test]
    fn collects_class_shape() {
        let t = table(r#"
import a.b.Util;
import io;
class Foo extends Util {
    int x;
    boolean[] flags;
    public int get(int a, Foo other) { int y; return x; }
    public static void main(String[] args) { }
}"#);
        assert_eq!(t.class_name(), "Foo");
        assert_eq!(t.super_class(), Some("Util"));
        assert_eq!(t.imports(), &["a.b.Util".to_string(), "io".to_string()]);
        assert_eq!(t.fields().len(), 2);
        assert_eq!(t.field("flags").unwrap().ty, Type::new(TypeKind::Boolean, true));
        assert_eq!(t.methods(), &["get".to_string(), "main".to_string()]);
        assert_eq!(t.return_type("get"), Some(&Type::int()));
        assert_eq!(t.parameters("get")[1].ty, Type::class("Foo"));
        assert_eq!(t.local_variables("get")[0].name, "y");
        assert!(t.is_static("main"));
        assert_eq!(t.parameters("main")[0].ty, Type::new(TypeKind::String, true));
    }

    #[test]
    fn unknown_methods_yield_empty_collections() {
        let t = table("class A { }");
        assert!(t.parameters("nope").is_empty());
        assert!(t.local_variables("nope").is_empty());
        assert_eq!(t.return_type("nope"), None);
        assert!(t.super_class().is_none());
    }

    #[test]
    fn duplicates_keep_first_declaration() {
        let t = table("import x.A; import x.A; class C { int n; boolean n; int f() { return 1; } boolean f() { return true; } }");
        assert_eq!(t.imports().len(), 1);
        assert_eq!(t.fields().len(), 1);
        assert_eq!(t.field("n").unwrap().ty, Type::int());
        assert_eq!(t.methods().len(), 1);
        assert_eq!(t.return_type("f"), Some(&Type::int()));
    }

    #[test]
    fn resolution_prefers_local_then_param_then_field_then_import() {
        let t = table(r#"
import java.io;
class C {
    int a; int b; int c; int io;
    public int f(boolean a, boolean b) { int[] a; return 0; }
    public int g() { return 0; }
}"#);
        assert!(matches!(t.resolve("f", "a"), Some(Resolved::Local(s)) if s.ty.is_array));
        assert!(matches!(t.resolve("f", "b"), Some(Resolved::Param(1, _))));
        assert!(matches!(t.resolve("f", "c"), Some(Resolved::Field(_))));
        assert!(matches!(t.resolve("g", "io"), Some(Resolved::Field(_))));
        assert_eq!(t.resolve("g", "zzz"), None);
        let t = table("import java.io; class C { public int g() { return 0; } }");
        assert_eq!(t.resolve("g", "io"), Some(Resolved::Import("io")));
        assert_eq!(t.import_path("io"), Some("java.io"));
    }
}
