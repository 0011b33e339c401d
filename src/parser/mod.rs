//! Parser module for Java--
//!
//! Reference front end producing the AST the back end consumes: lexical
//! analysis with `logos` and a recursive descent parser.

pub mod lexer;
pub mod parser;
pub mod error;

pub use lexer::{Lexer, LexicalToken, Token};
pub use parser::Parser;
pub use error::ParseError;

use crate::ast::Program;
use crate::error::Result;

/// Parse a Java-- source file into a program
pub fn parse_jmm(source: &str) -> Result<Program> {
    parser::parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    #[test]
    fn test_parse_simple_class() {
        let source = r#"
import io;
class Simple {
    int x;
    public int get() { return x; }
    public static void main(String[] args) { }
}
"#;
        let program = parse_jmm(source).expect("Failed to parse");
        assert_eq!(program.imports.len(), 1);
        assert_eq!(program.class.name, "Simple");
        assert_eq!(program.class.fields.len(), 1);
        assert_eq!(program.class.methods.len(), 2);
        let main = &program.class.methods[1];
        assert!(main.is_static && main.is_main());
        assert!(main.params[0].type_ref.is_array);
        assert_eq!(main.params[0].type_ref.base, BaseType::String);
    }

    #[test]
    fn test_parse_precedence() {
        let source = "class A { int f(int a, int b) { return a + b * 2 < a && true; } }";
        let program = parse_jmm(source).expect("Failed to parse");
        let ret = &program.class.methods[0].body[0];
        let StmtKind::Return(Some(expr)) = &ret.kind else { panic!("expected return") };
        assert_eq!(expr.to_string(), "(((a + (b * 2)) < a) && true)");
    }

    #[test]
    fn test_parse_assignments_and_locals() {
        let source = r#"
class A {
    public void f() {
        int[] a;
        A other;
        a = new int[3];
        a[0] = 1;
        other = new A();
        other.f();
    }
}"#;
        let program = parse_jmm(source).expect("Failed to parse");
        let m = &program.class.methods[0];
        assert_eq!(m.locals.len(), 2);
        assert!(matches!(m.body[0].kind, StmtKind::Assign { .. }));
        assert!(matches!(m.body[1].kind, StmtKind::ArrayAssign { .. }));
        assert!(matches!(m.body[3].kind, StmtKind::Expr(_)));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let source = "class A { int f(int[] a) { return a.length + a[0] + this.f(a); } }";
        let program = parse_jmm(source).expect("Failed to parse");
        let StmtKind::Return(Some(expr)) = &program.class.methods[0].body[0].kind else { panic!() };
        let mut ids = Vec::new();
        collect_ids(expr, &mut ids);
        let mut dedup = ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(ids.len(), dedup.len());
    }

    fn collect_ids(e: &Expr, out: &mut Vec<NodeId>) {
        out.push(e.id);
        match &e.kind {
            ExprKind::Binary { left, right, .. } => {
                collect_ids(left, out);
                collect_ids(right, out);
            }
            ExprKind::Index { array, index } => {
                collect_ids(array, out);
                collect_ids(index, out);
            }
            ExprKind::Length(inner) | ExprKind::Not(inner) => collect_ids(inner, out),
            ExprKind::MethodCall { receiver, args, .. } => {
                collect_ids(receiver, out);
                args.iter().for_each(|a| collect_ids(a, out));
            }
            _ => {}
        }
    }

    #[test]
    fn test_parse_errors_carry_location() {
        let err = parse_jmm("class A { int x }").unwrap_err();
        match err {
            crate::error::Error::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 17);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_integer_literal_range() {
        assert!(parse_jmm("class A { int f() { return 2147483647; } }").is_ok());
        assert!(parse_jmm("class A { int f() { return -2147483648; } }").is_ok());
        assert!(parse_jmm("class A { int f() { return 2147483648; } }").is_err());
    }
}
