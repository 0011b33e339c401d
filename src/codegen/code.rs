//! Instruction buffer for one method body
//!
//! Collects Jasmin lines and picks the compact opcode forms: the cheapest
//! integer push for a literal and the `_0`..`_3` load/store shortcuts.

use super::opcodes::*;
use crate::types::Type;
use std::fmt;

#[derive(Debug, Default)]
pub struct Code {
    lines: Vec<String>,
    next_label: u32,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an opcode without operands
    pub fn emitop(&mut self, op: u8) {
        self.lines.push(format!("    {}", mnemonic(op)));
    }

    /// Emit an opcode followed by one textual operand
    pub fn emitop1(&mut self, op: u8, operand: impl fmt::Display) {
        self.lines.push(format!("    {} {}", mnemonic(op), operand));
    }

    pub fn emit_label(&mut self, label: &str) {
        self.lines.push(format!("  {}:", label));
    }

    /// Fresh label private to this buffer
    pub fn new_label(&mut self, prefix: &str) -> String {
        let label = format!("{}_{}", prefix, self.next_label);
        self.next_label += 1;
        label
    }

    /// Push an int constant with the shortest encoding for its range.
    pub fn emit_int_literal(&mut self, value: i32) {
        match value {
            -1 => self.emitop(ICONST_M1),
            v if i8::try_from(v).is_ok() => match u8::try_from(v) {
                Ok(small @ 0..=5) => self.emitop(ICONST_0 + small),
                _ => self.emitop1(BIPUSH, v),
            },
            v if i16::try_from(v).is_ok() => self.emitop1(SIPUSH, v),
            v => self.emitop1(LDC, v),
        }
    }

    pub fn emit_load(&mut self, ty: &Type, register: u16) {
        let (short, long) = if ty.is_primitive() { (ILOAD_0, ILOAD) } else { (ALOAD_0, ALOAD) };
        self.emit_local(short, long, register);
    }

    pub fn emit_store(&mut self, ty: &Type, register: u16) {
        let (short, long) = if ty.is_primitive() { (ISTORE_0, ISTORE) } else { (ASTORE_0, ASTORE) };
        self.emit_local(short, long, register);
    }

    fn emit_local(&mut self, short: u8, long: u8, register: u16) {
        match u8::try_from(register) {
            Ok(r @ 0..=3) => self.emitop(short + r),
            _ => self.emitop1(long, register),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
