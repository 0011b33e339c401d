mod common;

use common::{jasmin, method_body};
use jmmc::Config;

#[test]
fn getter_ends_with_getfield_ireturn() {
    let out = jasmin("class A { int x; public int get() { return x; } }");
    assert!(out.contains(".field private x I\n"));
    assert_eq!(method_body(&out, "get"), vec!["aload_0", "getfield A/x I", "ireturn"]);
}

#[test]
fn literal_pushes_pick_the_cheapest_form() {
    let cases = [
        (-1, "iconst_m1"),
        (5, "iconst_5"),
        (6, "bipush 6"),
        (-2, "bipush -2"),
        (128, "sipush 128"),
        (-129, "sipush -129"),
        (32768, "ldc 32768"),
        (-32769, "ldc -32769"),
    ];
    for (value, expected) in cases {
        let out = jasmin(&format!("class A {{ public int f() {{ return {}; }} }}", value));
        assert_eq!(method_body(&out, "f"), vec![expected.to_string(), "ireturn".to_string()], "value {value}");
    }
}

#[test]
fn unused_call_result_is_popped() {
    let out = jasmin("class A { public int f() { return 1; } public int g() { this.f(); return 0; } }");
    assert_eq!(method_body(&out, "g"), vec!["aload_0", "invokevirtual A/f()I", "pop", "iconst_0", "ireturn"]);
}

#[test]
fn void_static_call_in_main() {
    let out = jasmin("import io; class Main { public static void main(String[] args) { io.println(1); } }");
    assert!(out.contains(".method public static main([Ljava/lang/String;)V\n"));
    assert_eq!(method_body(&out, "main"), vec!["iconst_1", "invokestatic io/println(I)V", "return"]);
}

#[test]
fn while_loop_with_comparison() {
    let out = jasmin("class C { public int count(int n) { int i; i = 0; while (i < n) { i = i + 1; } return i; } }");
    assert_eq!(
        method_body(&out, "count"),
        vec![
            "iconst_0",
            "istore_2",
            "while_0:",
            "iload_2",
            "iload_1",
            "if_icmplt cmp_true_0",
            "iconst_0",
            "goto cmp_end_1",
            "cmp_true_0:",
            "iconst_1",
            "cmp_end_1:",
            "ifne body_0",
            "goto endwhile_0",
            "body_0:",
            "iload_2",
            "iconst_1",
            "iadd",
            "istore_2",
            "goto while_0",
            "endwhile_0:",
            "iload_2",
            "ireturn",
        ]
    );
}

#[test]
fn object_construction() {
    let out = jasmin("class A { public A make() { A a; a = new A(); return a; } }");
    assert_eq!(
        method_body(&out, "make"),
        vec!["new A", "astore_2", "aload_2", "invokespecial A/<init>()V", "aload_2", "astore_1", "aload_1", "areturn"]
    );
}

#[test]
fn arrays_use_element_specific_opcodes() {
    let out = jasmin(
        "class A { public int f() { int[] a; a = new int[3]; a[0] = 5; return a[0]; } \
         public boolean g() { boolean[] b; b = [true, false]; return b[1]; } }",
    );
    assert_eq!(
        method_body(&out, "f"),
        vec!["iconst_3", "newarray int", "astore_1", "aload_1", "iconst_0", "iconst_5", "iastore", "aload_1", "iconst_0", "iaload", "ireturn"]
    );
    let g = method_body(&out, "g");
    assert!(g.contains(&"newarray boolean".to_string()));
    assert_eq!(g.iter().filter(|l| *l == "bastore").count(), 2);
    assert!(g.contains(&"baload".to_string()));
}

#[test]
fn superclass_and_constructor() {
    let out = jasmin("import a.b.Base; class A extends Base { }");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], ".class public A");
    assert_eq!(lines[1], ".super a/b/Base");
    assert!(out.contains(".method public <init>()V\n    aload_0\n    invokespecial a/b/Base/<init>()V\n    return\n.end method\n"));
}

#[test]
fn output_is_deterministic() {
    let src = "import io; class A { int[] xs; public int f(int n) { if (n < 2) { io.p(n); } else { xs = new int[n]; } return n; } }";
    assert_eq!(jasmin(src), jasmin(src));
}

#[test]
fn locals_limit_grows_with_registers() {
    let config = Config::default().with_limits(10, 2);
    let out = jmmc::compile("class A { public int f(int a, int b) { int c; c = a + b; return c; } }", &config)
        .unwrap()
        .into_jasmin()
        .unwrap();
    assert!(out.contains("    .limit stack 10\n    .limit locals 5\n"));
}

#[test]
fn array_construction_by_element_type() {
    let out = jasmin(
        "import x.Foo; class A { public int f(int n) { int[] a; boolean[] b; Foo[] c; \
         a = new int[n]; b = new boolean[2]; c = new Foo[n + 1]; return a.length; } }",
    );
    assert_eq!(
        method_body(&out, "f"),
        vec![
            "iload_1",
            "newarray int",
            "astore_2",
            "iconst_2",
            "newarray boolean",
            "astore_3",
            "iload_1",
            "iconst_1",
            "iadd",
            "anewarray x/Foo",
            "astore 4",
            "aload_2",
            "arraylength",
            "ireturn",
        ]
    );
}

#[test]
fn static_helper_is_invoked_statically() {
    let out = jasmin("class A { public static int h() { return 1; } public int g() { return this.h(); } }");
    assert!(out.contains(".method public static h()I\n"));
    assert_eq!(method_body(&out, "g"), vec!["invokestatic A/h()I", "ireturn"]);
}

fn sum_of_ones(terms: usize) -> String {
    format!("class A {{ public int f() {{ return {}; }} }}", vec!["1"; terms].join(" + "))
}

#[test]
fn long_expressions_compile_within_the_depth_limit() {
    let out = jasmin(&sum_of_ones(80));
    let body = method_body(&out, "f");
    assert_eq!(body.iter().filter(|l| *l == "iadd").count(), 79);
    assert_eq!(body.last().map(String::as_str), Some("ireturn"));
}

#[test]
fn overly_deep_expressions_are_rejected_not_overflowed() {
    let err = jmmc::compile(&sum_of_ones(1000), &Config::default()).unwrap_err();
    assert!(matches!(err, jmmc::Error::Parse { .. }), "{err:?}");
}
