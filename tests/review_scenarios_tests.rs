mod common;

use common::{analyze_src, assert_no_errors, kinds};
use jmmc::review::{ReviewError, Stage};
use jmmc::symtab::build;

#[test]
fn scenario_field_getter_is_clean() {
    assert_no_errors("class A { int x; public int get() { return x; } }");
}

#[test]
fn scenario_logical_and_on_int() {
    let found = kinds("class A { public boolean check(int a) { return a && true; } }");
    assert_eq!(found.len(), 1, "{found:?}");
    assert!(matches!(&found[0], ReviewError::InvalidOperands { op, .. } if op == "&&"));
}

#[test]
fn scenario_boolean_index() {
    let found = kinds("class A { public int f() { int[] a; a = new int[2]; return a[true]; } }");
    assert_eq!(found, vec![ReviewError::IndexNotInteger("boolean".into())]);
}

#[test]
fn scenario_duplicate_field() {
    let found = kinds("class A { int count; int count; }");
    assert_eq!(found, vec![ReviewError::DuplicateField("count".into())]);
}

#[test]
fn diagnostics_carry_stage_and_location() {
    let (_, _, analysis) = analyze_src("class A {\n  public int f() {\n    return nope;\n  }\n}");
    assert_eq!(analysis.diagnostics.len(), 1);
    let d = &analysis.diagnostics[0];
    assert_eq!(d.stage, Stage::Semantic);
    assert_eq!((d.line, d.column), (3, 12));
    assert_eq!(d.to_string(), "3:12: SEMANTIC: cannot find symbol 'nope'");
}

#[test]
fn one_error_does_not_hide_others() {
    let src = r#"
class A {
    int x;
    public int f(int a) {
        boolean b;
        b = a;
        if (a) { a = 1; } else { a = 2; }
        return a + true;
    }
    public int g() { return this.f(1, 2); }
}"#;
    let found = kinds(src);
    assert!(found.iter().any(|k| matches!(k, ReviewError::IncompatibleAssignment { .. })));
    assert!(found.iter().any(|k| matches!(k, ReviewError::ConditionNotBoolean(_))));
    assert!(found.iter().any(|k| matches!(k, ReviewError::InvalidOperands { .. })));
    assert!(found.iter().any(|k| matches!(k, ReviewError::ArgumentCountMismatch { .. })));
    assert_eq!(found.len(), 4, "{found:?}");
}

#[test]
fn duplicate_detection_is_order_independent() {
    let forward = kinds("class A { int f(int a, boolean a) { return 0; } }");
    let backward = kinds("class A { int f(boolean a, int a) { return 0; } }");
    assert_eq!(forward.len(), 1);
    assert_eq!(forward, backward);
}

#[test]
fn a_complete_program_passes() {
    assert_no_errors(
        r#"
import io;
import java.util.ArrayList;
class Life extends ArrayList {
    int[] field;
    boolean alive;

    public int sum(int[] xs) {
        int i;
        int total;
        i = 0;
        total = 0;
        while (i < xs.length) {
            total = total + xs[i];
            i = i + 1;
        }
        return total;
    }

    public boolean toggle() {
        alive = !alive;
        return alive;
    }

    public static void main(String[] args) {
        Life life;
        int[] data;
        life = new Life();
        data = [1, 2, 3];
        io.println(life.sum(data));
        if (life.toggle() && 1 < 2) { io.println(1); } else { io.println(0); }
        life.add(3);
    }
}"#,
    );
}

#[test]
fn main_rules() {
    let found = kinds("class A { int x; public static void main(String[] args) { x = 1; this.f(); } public void f() { } }");
    assert_eq!(
        found,
        vec![
            ReviewError::FieldInStatic { method: "main".into(), field: "x".into() },
            ReviewError::ThisInStatic("main".into()),
        ]
    );
    let found = kinds("class A { public static void main(int[] args) { } }");
    assert!(matches!(found.as_slice(), [ReviewError::InvalidMainSignature(_)]));
}

#[test]
fn symbol_table_queries_for_unknown_methods_are_empty() {
    let program = jmmc::parser::parse_jmm("class A { }").unwrap();
    let table = build(&program);
    assert!(table.parameters("missing").is_empty());
    assert!(table.local_variables("missing").is_empty());
    assert!(table.return_type("missing").is_none());
}

#[test]
fn arity_diagnostic_names_the_declaration() {
    let (_, _, analysis) = common::analyze_src("class A { public int f(int a, boolean b) { return this.f(a); } }");
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].cause.as_deref(), Some("declared as f(int, boolean)"));
    assert!(analysis.diagnostics[0].to_string().ends_with("(declared as f(int, boolean))"));
}

#[test]
fn duplicate_method_is_reported_once() {
    let found = kinds("class A { public int f(int a) { return a; } public boolean f(boolean b) { return b; } }");
    assert_eq!(found, vec![ReviewError::DuplicateMethod("f".into())]);
}

#[test]
fn array_variable_cannot_take_another_array_variable() {
    let found = kinds("class A { public int f() { int[] a; int[] b; b = [1]; a = b; return 0; } }");
    assert_eq!(found, vec![ReviewError::ArraySourceNotAllowed { target: "a".into(), found: "b".into() }]);
}
