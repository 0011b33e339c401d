//! Typed three-address intermediate representation
//!
//! One [`ClassUnit`] per compiled class. Every method owns its instruction
//! list and a [`VarTable`] assigning virtual registers to `this`, parameters,
//! locals and temporaries. `Display` renders an OLLIR-like listing.

mod lower;

pub use lower::generate;

use crate::ast::BinaryOp;
use crate::types::{Symbol, Type, TypeKind};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
    Default,
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessModifier::Public => write!(f, "public"),
            AccessModifier::Private => write!(f, "private"),
            AccessModifier::Protected => write!(f, "protected"),
            AccessModifier::Default => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnit {
    pub name: String,
    pub super_class: Option<String>,
    /// Dotted import paths
    pub imports: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarEntry {
    pub register: u16,
    pub ty: Type,
}

/// Variable name to virtual register, scoped to one method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarTable {
    entries: HashMap<String, VarEntry>,
    next: u16,
}

impl VarTable {
    /// Reserve register 0 for `this`
    pub(crate) fn with_receiver(class: &str) -> Self {
        let mut table = Self::default();
        table.declare(crate::consts::THIS, Type::class(class));
        table
    }

    /// Next free register for `name`; redeclaring returns the existing one
    pub(crate) fn declare(&mut self, name: &str, ty: Type) -> u16 {
        if let Some(entry) = self.entries.get(name) {
            return entry.register;
        }
        let register = self.next;
        self.entries.insert(name.to_string(), VarEntry { register, ty });
        self.next += 1;
        register
    }

    pub fn get(&self, name: &str) -> Option<&VarEntry> {
        self.entries.get(name)
    }

    pub fn register(&self, name: &str) -> Option<u16> {
        self.get(name).map(|e| e.register)
    }

    /// Number of registers in use
    pub fn len(&self) -> u16 {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_final: bool,
    pub params: Vec<Symbol>,
    pub return_type: Type,
    pub instructions: Vec<Instruction>,
    pub var_table: VarTable,
}

/// Leaf value of an instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal { value: i32, ty: Type },
    Var { name: String, ty: Type },
}

impl Operand {
    pub fn int(value: i32) -> Self {
        Operand::Literal { value, ty: Type::int() }
    }

    pub fn boolean(value: bool) -> Self {
        Operand::Literal { value: value as i32, ty: Type::boolean() }
    }

    pub fn var(name: impl Into<String>, ty: Type) -> Self {
        Operand::Var { name: name.into(), ty }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Operand::Literal { ty, .. } | Operand::Var { ty, .. } => ty,
        }
    }

    pub fn var_name(&self) -> Option<&str> {
        match self {
            Operand::Var { name, .. } => Some(name),
            Operand::Literal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub owner: String,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Virtual,
    Static,
    Special,
    /// Allocation; `owner` is the class, or the element kind of an array
    New,
    ArrayLength,
    /// Load of a literal that needs the constant pool
    Ldc,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CallKind::Virtual => "invokevirtual",
            CallKind::Static => "invokestatic",
            CallKind::Special => "invokespecial",
            CallKind::New => "new",
            CallKind::ArrayLength => "arraylength",
            CallKind::Ldc => "ldc",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub dest: Option<Operand>,
    pub kind: CallKind,
    /// Object operand; absent for static calls and `ldc`
    pub receiver: Option<Operand>,
    /// Class owning the method, dotted for imports
    pub owner: String,
    pub method: String,
    pub args: Vec<Operand>,
    pub ret: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Assign { dest: Operand, value: Operand },
    GetField { dest: Operand, object: Operand, field: FieldRef },
    PutField { object: Operand, field: FieldRef, value: Operand },
    Call(Call),
    BinaryOp { dest: Operand, op: BinaryOp, lhs: Operand, rhs: Operand },
    UnaryOp { dest: Operand, op: UnaryOp, operand: Operand },
    ArrayLoad { dest: Operand, array: Operand, index: Operand },
    ArrayStore { array: Operand, index: Operand, value: Operand },
    Label(String),
    Goto(String),
    /// Jump to `target` when `cond` is true
    Branch { cond: Operand, target: String },
    Return(Option<Operand>),
}

impl Instruction {
    /// Operand written by this instruction, if any
    pub fn dest(&self) -> Option<&Operand> {
        match self {
            Instruction::Assign { dest, .. }
            | Instruction::GetField { dest, .. }
            | Instruction::BinaryOp { dest, .. }
            | Instruction::UnaryOp { dest, .. }
            | Instruction::ArrayLoad { dest, .. } => Some(dest),
            Instruction::Call(call) => call.dest.as_ref(),
            Instruction::PutField { .. }
            | Instruction::ArrayStore { .. }
            | Instruction::Label(_)
            | Instruction::Goto(_)
            | Instruction::Branch { .. }
            | Instruction::Return(_) => None,
        }
    }

    /// Operands read, in the order the values are evaluated
    pub fn reads(&self) -> Vec<&Operand> {
        match self {
            Instruction::Assign { value, .. } => vec![value],
            Instruction::GetField { object, .. } => vec![object],
            Instruction::PutField { object, value, .. } => vec![object, value],
            Instruction::Call(call) => call.receiver.iter().chain(&call.args).collect(),
            Instruction::BinaryOp { lhs, rhs, .. } => vec![lhs, rhs],
            Instruction::UnaryOp { operand, .. } => vec![operand],
            Instruction::ArrayLoad { array, index, .. } => vec![array, index],
            Instruction::ArrayStore { array, index, value } => vec![array, index, value],
            Instruction::Branch { cond, .. } => vec![cond],
            Instruction::Return(value) => value.iter().collect(),
            Instruction::Label(_) | Instruction::Goto(_) => Vec::new(),
        }
    }
}

// OLLIR-style type suffix: `.i32`, `.bool`, `.array.i32`, `.V`, `.ClassName`
struct Suffix<'a>(&'a Type);

impl fmt::Display for Suffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_array {
            write!(f, ".array")?;
        }
        match &self.0.kind {
            TypeKind::Int => write!(f, ".i32"),
            TypeKind::Boolean => write!(f, ".bool"),
            TypeKind::String => write!(f, ".String"),
            TypeKind::Void => write!(f, ".V"),
            TypeKind::Class(name) => write!(f, ".{}", name),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal { value, ty } => write!(f, "{}{}", value, Suffix(ty)),
            Operand::Var { name, ty } => write!(f, "{}{}", name, Suffix(ty)),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dest) = &self.dest {
            write!(f, "{} :={} ", dest, Suffix(dest.ty()))?;
        }
        write!(f, "{}(", self.kind)?;
        let mut parts = Vec::new();
        match &self.receiver {
            Some(r) => parts.push(r.to_string()),
            None if self.kind != CallKind::Ldc => parts.push(self.owner.clone()),
            None => {}
        }
        if !self.method.is_empty() {
            parts.push(format!("\"{}\"", self.method));
        }
        parts.extend(self.args.iter().map(|a| a.to_string()));
        write!(f, "{}){}", parts.join(", "), Suffix(&self.ret))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Assign { dest, value } => write!(f, "{} :={} {}", dest, Suffix(dest.ty()), value),
            Instruction::GetField { dest, object, field } => write!(
                f,
                "{} :={} getfield({}, {}{}){}",
                dest,
                Suffix(dest.ty()),
                object,
                field.name,
                Suffix(&field.ty),
                Suffix(&field.ty)
            ),
            Instruction::PutField { object, field, value } => {
                write!(f, "putfield({}, {}{}, {}).V", object, field.name, Suffix(&field.ty), value)
            }
            Instruction::Call(call) => write!(f, "{}", call),
            Instruction::BinaryOp { dest, op, lhs, rhs } => {
                write!(f, "{} :={} {} {}{} {}", dest, Suffix(dest.ty()), lhs, op, Suffix(dest.ty()), rhs)
            }
            Instruction::UnaryOp { dest, operand, .. } => {
                write!(f, "{} :={} !{} {}", dest, Suffix(dest.ty()), Suffix(dest.ty()), operand)
            }
            Instruction::ArrayLoad { dest, array, index } => {
                write!(f, "{} :={} {}[{}]", dest, Suffix(dest.ty()), array, index)
            }
            Instruction::ArrayStore { array, index, value } => {
                write!(f, "{}[{}] :={} {}", array, index, Suffix(value.ty()), value)
            }
            Instruction::Label(label) => write!(f, "{}:", label),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::Branch { cond, target } => write!(f, "if ({}) goto {}", cond, target),
            Instruction::Return(Some(value)) => write!(f, "ret{} {}", Suffix(value.ty()), value),
            Instruction::Return(None) => write!(f, "ret.V"),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".method {} ", self.access)?;
        if self.is_static {
            write!(f, "static ")?;
        }
        if self.is_final {
            write!(f, "final ")?;
        }
        let params: Vec<String> = self.params.iter().map(|p| format!("{}{}", p.name, Suffix(&p.ty))).collect();
        writeln!(f, "{}({}){} {{", self.name, params.join(", "), Suffix(&self.return_type))?;
        for inst in &self.instructions {
            match inst {
                Instruction::Label(_) => writeln!(f, "  {}", inst)?,
                _ => writeln!(f, "    {};", inst)?,
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for ClassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "import {};", import)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(sup) = &self.super_class {
            write!(f, " extends {}", sup)?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(f, "  .field {} {}{};", field.access, field.name, Suffix(&field.ty))?;
        }
        for method in &self.methods {
            writeln!(f)?;
            write!(f, "{}", method)?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_are_dense_and_stable() {
        let mut vars = VarTable::with_receiver("A");
        assert_eq!(vars.declare("a", Type::int()), 1);
        assert_eq!(vars.declare("b", Type::int_array()), 2);
        assert_eq!(vars.declare("a", Type::int()), 1);
        assert_eq!(vars.register("this"), Some(0));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn operands_render_with_type_suffix() {
        assert_eq!(Operand::int(3).to_string(), "3.i32");
        assert_eq!(Operand::var("xs", Type::int_array()).to_string(), "xs.array.i32");
        assert_eq!(Operand::var("o", Type::class("Foo")).to_string(), "o.Foo");
        assert_eq!(
            Instruction::Return(Some(Operand::boolean(true))).to_string(),
            "ret.bool 1.bool"
        );
    }
}
