mod common;

use common::ir;
use jmmc::ir::{CallKind, Instruction, Operand};
use jmmc::types::Type;

#[test]
fn getter_lowers_to_getfield_and_typed_return() {
    let unit = ir("class A { int x; public int get() { return x; } }");
    let get = &unit.methods[0];
    assert_eq!(get.instructions.len(), 2);
    assert!(matches!(get.instructions[0], Instruction::GetField { .. }));
    assert!(matches!(&get.instructions[1], Instruction::Return(Some(op)) if op.ty() == &Type::int()));
}

#[test]
fn every_operand_has_a_register() {
    let unit = ir(r#"
import io;
class A {
    int[] data;
    public int f(int n) {
        int i;
        int[] copy;
        copy = new int[n];
        i = 0;
        while (i < n) { copy[i] = data[i] * 2; i = i + 1; }
        if (!(n < 1) && true) { io.println(copy.length); } else { }
        return copy[0];
    }
}"#);
    for method in &unit.methods {
        for inst in &method.instructions {
            for op in inst.reads().into_iter().chain(inst.dest()) {
                if let Operand::Var { name, .. } = op {
                    assert!(method.var_table.get(name).is_some(), "{name} missing in {}", method.name);
                }
            }
        }
    }
}

#[test]
fn arguments_are_evaluated_left_to_right() {
    let unit = ir("class A { public int f(int a, int b) { return this.f(a + 1, b * 2); } }");
    let code = &unit.methods[0].instructions;
    let ops: Vec<String> = code
        .iter()
        .filter_map(|i| match i {
            Instruction::BinaryOp { op, .. } => Some(op.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(ops, vec!["+", "*"]);
    let Some(Instruction::Call(call)) = code.iter().find(|i| matches!(i, Instruction::Call(_))) else {
        panic!("no call")
    };
    assert_eq!(call.kind, CallKind::Virtual);
    assert_eq!(call.args.len(), 2);
    assert_eq!(call.ret, Type::int());
}

#[test]
fn construction_is_allocation_then_constructor() {
    let unit = ir("import x.Other; class A { public Other make() { Other o; o = new Other(); return o; } }");
    let calls: Vec<(CallKind, &str)> = unit.methods[0]
        .instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::Call(c) => Some((c.kind, c.method.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(calls, vec![(CallKind::New, ""), (CallKind::Special, "<init>")]);
}

#[test]
fn ir_listing_is_readable() {
    let unit = ir("class A { int x; public int get() { return x; } }");
    let text = unit.to_string();
    assert!(text.contains(".field private x.i32;"), "{text}");
    assert!(text.contains("$t0.i32 :=.i32 getfield(this.A, x.i32).i32;"), "{text}");
    assert!(text.contains("ret.i32 $t0.i32;"), "{text}");
}
