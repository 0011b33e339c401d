//! Bytecode generation
//!
//! Transliterates an IR [`ClassUnit`](crate::ir::ClassUnit) into Jasmin
//! assembly text. Output is deterministic: the same unit and config always
//! produce the same text.

pub mod class_writer;
pub mod code;
pub mod descriptor;
pub mod method_writer;
pub mod opcodes;

pub use class_writer::ClassWriter;
pub use descriptor::ClassResolver;

use crate::config::Config;
use crate::error::Result;
use crate::ir::ClassUnit;

/// Jasmin listing for `unit`
pub fn generate(unit: &ClassUnit, config: &Config) -> Result<String> {
    let text = ClassWriter::new(unit, config).write()?;
    log::debug!("jasmin for '{}': {} line(s)", unit.name, text.lines().count());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;
    use super::generate;
    use crate::types::{Symbol, Type};

    fn unit(instructions: Vec<Instruction>, var_table: VarTable) -> ClassUnit {
        ClassUnit {
            name: "A".into(),
            super_class: None,
            imports: vec!["io".into()],
            fields: vec![],
            methods: vec![Method {
                name: "f".into(),
                access: AccessModifier::Public,
                is_static: false,
                is_final: false,
                params: vec![Symbol::new("n", Type::int())],
                return_type: Type::void(),
                instructions,
                var_table,
            }],
        }
    }

    fn call(dest: Option<Operand>, ret: Type) -> Instruction {
        Instruction::Call(Call {
            dest,
            kind: CallKind::Static,
            receiver: None,
            owner: "io".into(),
            method: "read".into(),
            args: vec![Operand::var("n", Type::int())],
            ret,
        })
    }

    #[test]
    fn unused_results_are_popped_once() {
        let mut vars = VarTable::with_receiver("A");
        vars.declare("n", Type::int());
        let unit = unit(vec![call(None, Type::int()), call(None, Type::void()), Instruction::Return(None)], vars);
        let text = generate(&unit, &Config::default()).unwrap();
        assert_eq!(text.matches("invokestatic io/read(I)I").count(), 1);
        assert_eq!(text.matches("invokestatic io/read(I)V").count(), 1);
        assert_eq!(text.lines().filter(|l| l.trim() == "pop").count(), 1);
    }

    #[test]
    fn generation_is_idempotent() {
        let mut vars = VarTable::with_receiver("A");
        vars.declare("n", Type::int());
        let unit = unit(vec![call(None, Type::int()), Instruction::Return(None)], vars);
        let config = Config::default();
        assert_eq!(generate(&unit, &config).unwrap(), generate(&unit, &config).unwrap());
    }

    #[test]
    fn header_and_constructor() {
        let text = generate(&unit(vec![Instruction::Return(None)], VarTable::with_receiver("A")), &Config::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ".class public A");
        assert_eq!(lines[1], ".super java/lang/Object");
        assert!(text.contains("    invokespecial java/lang/Object/<init>()V\n"));
        assert!(text.contains(".method public f(I)V\n    .limit stack 99\n    .limit locals 99\n"));
        assert!(text.ends_with("    return\n.end method\n"));
    }
}
