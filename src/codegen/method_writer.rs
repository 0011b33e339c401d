//! Jasmin text for one IR method

use super::code::Code;
use super::descriptor::ClassResolver;
use super::opcodes::*;
use crate::ast::BinaryOp;
use crate::config::Config;
use crate::consts::TEMP_PREFIX;
use crate::error::{Error, Result};
use crate::ir::{Call, CallKind, ClassUnit, FieldRef, Instruction, Method, Operand, UnaryOp};
use crate::types::{Type, TypeKind};
use std::collections::HashMap;

pub struct MethodWriter<'a> {
    unit: &'a ClassUnit,
    method: &'a Method,
    resolver: &'a ClassResolver,
    code: Code,
    /// Reads per temporary across the whole method
    uses: HashMap<&'a str, usize>,
    /// Temporary whose value was left on the stack for the next instruction
    forwarded: Option<&'a str>,
}

impl<'a> MethodWriter<'a> {
    pub fn new(unit: &'a ClassUnit, method: &'a Method, resolver: &'a ClassResolver) -> Self {
        let mut uses = HashMap::new();
        for inst in &method.instructions {
            for name in inst.reads().into_iter().filter_map(Operand::var_name) {
                *uses.entry(name).or_insert(0) += 1;
            }
        }
        Self { unit, method, resolver, code: Code::new(), uses, forwarded: None }
    }

    pub fn write(mut self, config: &Config) -> Result<Vec<String>> {
        let method = self.method;
        for (i, inst) in method.instructions.iter().enumerate() {
            self.instruction(inst, method.instructions.get(i + 1))?;
        }

        let mut out = Vec::with_capacity(self.code.lines().len() + 4);
        let mut header = String::from(".method ");
        let access = method.access.to_string();
        if !access.is_empty() {
            header.push_str(&access);
            header.push(' ');
        }
        if method.is_static {
            header.push_str("static ");
        }
        if method.is_final {
            header.push_str("final ");
        }
        header.push_str(&method.name);
        header.push_str(&self.resolver.method_descriptor(method.params.iter().map(|p| &p.ty), &method.return_type));
        out.push(header);
        out.push(format!("    .limit stack {}", config.limit_stack));
        out.push(format!("    .limit locals {}", config.limit_locals.max(method.var_table.len())));
        out.extend(self.code.into_lines());
        out.push(".end method".to_string());
        Ok(out)
    }

    /// Temporary defined by `inst` that `next` consumes first and nothing else reads
    fn forwardable(&self, inst: &'a Instruction, next: Option<&'a Instruction>) -> Option<&'a str> {
        let name = inst.dest()?.var_name()?;
        if !name.starts_with(TEMP_PREFIX) || self.uses.get(name) != Some(&1) {
            return None;
        }
        let first = next?.reads().first().copied().and_then(Operand::var_name);
        (first == Some(name)).then_some(name)
    }

    fn register(&self, name: &str) -> Result<u16> {
        self.method
            .var_table
            .register(name)
            .ok_or_else(|| Error::internal(format!("'{}' has no register in '{}'", name, self.method.name)))
    }

    fn load(&mut self, operand: &Operand) -> Result<()> {
        match operand {
            Operand::Literal { value, .. } => self.code.emit_int_literal(*value),
            Operand::Var { name, ty } => {
                if self.forwarded == Some(name.as_str()) {
                    self.forwarded = None;
                    return Ok(());
                }
                let register = self.register(name)?;
                self.code.emit_load(ty, register);
            }
        }
        Ok(())
    }

    fn store(&mut self, dest: &Operand, keep: Option<&'a str>) -> Result<()> {
        match dest {
            Operand::Var { name, .. } if keep == Some(name.as_str()) => {
                self.forwarded = keep;
                Ok(())
            }
            Operand::Var { name, ty } => {
                let register = self.register(name)?;
                self.code.emit_store(ty, register);
                Ok(())
            }
            Operand::Literal { value, .. } => Err(Error::internal(format!("store into literal {}", value))),
        }
    }

    fn instruction(&mut self, inst: &'a Instruction, next: Option<&'a Instruction>) -> Result<()> {
        let keep = self.forwardable(inst, next);
        match inst {
            Instruction::Assign { dest, value } => {
                self.load(value)?;
                self.store(dest, keep)?;
            }
            Instruction::GetField { dest, object, field } => {
                self.load(object)?;
                let spec = self.field_spec(field);
                self.code.emitop1(GETFIELD, spec);
                self.store(dest, keep)?;
            }
            Instruction::PutField { object, field, value } => {
                self.load(object)?;
                self.load(value)?;
                let spec = self.field_spec(field);
                self.code.emitop1(PUTFIELD, spec);
            }
            Instruction::Call(call) => self.call(call, keep)?,
            Instruction::BinaryOp { dest, op, lhs, rhs } => {
                self.load(lhs)?;
                self.load(rhs)?;
                self.binary(*op);
                self.store(dest, keep)?;
            }
            Instruction::UnaryOp { dest, op: UnaryOp::Not, operand } => {
                self.load(operand)?;
                self.code.emitop(ICONST_1);
                self.code.emitop(IXOR);
                self.store(dest, keep)?;
            }
            Instruction::ArrayLoad { dest, array, index } => {
                self.load(array)?;
                self.load(index)?;
                self.code.emitop(array_op(array.ty(), IALOAD, BALOAD, AALOAD));
                self.store(dest, keep)?;
            }
            Instruction::ArrayStore { array, index, value } => {
                self.load(array)?;
                self.load(index)?;
                self.load(value)?;
                self.code.emitop(array_op(array.ty(), IASTORE, BASTORE, AASTORE));
            }
            Instruction::Label(label) => self.code.emit_label(label),
            Instruction::Goto(label) => self.code.emitop1(GOTO, label),
            Instruction::Branch { cond, target } => {
                self.load(cond)?;
                self.code.emitop1(IFNE, target);
            }
            Instruction::Return(None) => self.code.emitop(RETURN),
            Instruction::Return(Some(value)) => {
                self.load(value)?;
                self.code.emitop(if value.ty().is_primitive() { IRETURN } else { ARETURN });
            }
        }
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp) {
        let opcode = match op {
            BinaryOp::Add => IADD,
            BinaryOp::Sub => ISUB,
            BinaryOp::Mul => IMUL,
            BinaryOp::Div => IDIV,
            BinaryOp::And => IAND,
            BinaryOp::Or => IOR,
            BinaryOp::Lt => return self.compare(IF_ICMPLT),
            BinaryOp::Le => return self.compare(IF_ICMPLE),
            BinaryOp::Gt => return self.compare(IF_ICMPGT),
            BinaryOp::Ge => return self.compare(IF_ICMPGE),
        };
        self.code.emitop(opcode);
    }

    /// Turn the two ints on the stack into 0 or 1
    fn compare(&mut self, jump: u8) {
        let (yes, end) = (self.code.new_label("cmp_true"), self.code.new_label("cmp_end"));
        self.code.emitop1(jump, &yes);
        self.code.emitop(ICONST_0);
        self.code.emitop1(GOTO, &end);
        self.code.emit_label(&yes);
        self.code.emitop(ICONST_1);
        self.code.emit_label(&end);
    }

    fn field_spec(&self, field: &FieldRef) -> String {
        format!(
            "{}/{} {}",
            self.resolver.internal_name(&field.owner),
            field.name,
            self.resolver.type_descriptor(&field.ty)
        )
    }

    /// Parameter types of the callee: declared ones for methods of this
    /// class, the argument types otherwise
    fn param_types(&self, call: &'a Call) -> Vec<&'a Type> {
        let declared = (call.owner == self.unit.name)
            .then(|| self.unit.methods.iter().find(|m| m.name == call.method))
            .flatten();
        match declared {
            Some(m) if m.params.len() == call.args.len() => m.params.iter().map(|p| &p.ty).collect(),
            _ => call.args.iter().map(Operand::ty).collect(),
        }
    }

    fn call(&mut self, call: &'a Call, keep: Option<&'a str>) -> Result<()> {
        match call.kind {
            CallKind::Virtual | CallKind::Special | CallKind::Static => {
                if let Some(receiver) = &call.receiver {
                    self.load(receiver)?;
                }
                for arg in &call.args {
                    self.load(arg)?;
                }
                let opcode = match call.kind {
                    CallKind::Virtual => INVOKEVIRTUAL,
                    CallKind::Special => INVOKESPECIAL,
                    _ => INVOKESTATIC,
                };
                let params = self.param_types(call);
                let owner = self.resolver.internal_name(&call.owner);
                let descriptor = self.resolver.method_descriptor(params, &call.ret);
                self.code.emitop1(opcode, format!("{}/{}{}", owner, call.method, descriptor));
            }
            CallKind::New if call.ret.is_array => {
                let size = call.args.first().ok_or_else(|| Error::internal("array allocation without a size"))?;
                self.load(size)?;
                match &call.ret.kind {
                    TypeKind::Int => self.code.emitop1(NEWARRAY, "int"),
                    TypeKind::Boolean => self.code.emitop1(NEWARRAY, "boolean"),
                    TypeKind::String => self.code.emitop1(ANEWARRAY, "java/lang/String"),
                    TypeKind::Class(name) => {
                        let class = self.resolver.internal_name(name);
                        self.code.emitop1(ANEWARRAY, class);
                    }
                    TypeKind::Void => return Err(Error::internal("array of void")),
                }
            }
            CallKind::New => {
                let class = self.resolver.internal_name(&call.owner);
                self.code.emitop1(NEW, class);
            }
            CallKind::ArrayLength => {
                let array = call.receiver.as_ref().ok_or_else(|| Error::internal("arraylength without an array"))?;
                self.load(array)?;
                self.code.emitop(ARRAYLENGTH);
            }
            CallKind::Ldc => match call.args.first() {
                Some(Operand::Literal { value, .. }) => self.code.emitop1(LDC, value),
                _ => return Err(Error::unsupported("ldc of a non-literal operand")),
            },
        }

        match &call.dest {
            Some(dest) => self.store(dest, keep)?,
            // stack balance: an unused result must be dropped
            None if !call.ret.is_void() => self.code.emitop(POP),
            None => {}
        }
        Ok(())
    }
}

fn array_op(array: &Type, int: u8, boolean: u8, reference: u8) -> u8 {
    match array.kind {
        TypeKind::Int => int,
        TypeKind::Boolean => boolean,
        _ => reference,
    }
}
