//! Lowering of a reviewed AST into IR
//!
//! Assumes the unit passed review. Anything contradicting that (an
//! expression without a recorded type, an unresolvable name) is an internal
//! error rather than a diagnostic.

use super::*;
use crate::ast::{Expr, ExprKind, MethodDecl, Program, Stmt, StmtKind};
use crate::consts::{INIT, TEMP_PREFIX, THIS};
use crate::error::{Error, Result};
use crate::review::TypeTable;
use crate::symtab::{type_from_ref, Resolved, SymbolTable};

/// Build the IR unit for `program`.
pub fn generate(program: &Program, table: &SymbolTable, types: &TypeTable) -> Result<ClassUnit> {
    let class = &program.class;
    let fields = table
        .fields()
        .iter()
        .map(|f| Field {
            name: f.name.clone(),
            ty: f.ty.clone(),
            access: AccessModifier::Private,
            is_static: false,
            is_final: false,
        })
        .collect();

    let mut methods = Vec::with_capacity(class.methods.len());
    for method in class.unique_methods() {
        let lowered = MethodLowering::new(table, types, method).lower()?;
        log::debug!(
            "lowered '{}': {} instruction(s), {} register(s)",
            lowered.name,
            lowered.instructions.len(),
            lowered.var_table.len()
        );
        methods.push(lowered);
    }

    Ok(ClassUnit {
        name: table.class_name().to_string(),
        super_class: table.super_class().map(str::to_string),
        imports: table.imports().to_vec(),
        fields,
        methods,
    })
}

struct MethodLowering<'a> {
    table: &'a SymbolTable,
    types: &'a TypeTable,
    method: &'a MethodDecl,
    vars: VarTable,
    code: Vec<Instruction>,
    temps: u32,
    labels: u32,
}

impl<'a> MethodLowering<'a> {
    fn new(table: &'a SymbolTable, types: &'a TypeTable, method: &'a MethodDecl) -> Self {
        let is_static = table.is_static(&method.name);
        let mut vars = if is_static { VarTable::default() } else { VarTable::with_receiver(table.class_name()) };
        for symbol in table.parameters(&method.name).iter().chain(table.local_variables(&method.name)) {
            vars.declare(&symbol.name, symbol.ty.clone());
        }
        Self { table, types, method, vars, code: Vec::new(), temps: 0, labels: 0 }
    }

    fn lower(mut self) -> Result<Method> {
        for stmt in &self.method.body {
            self.stmt(stmt)?;
        }
        let return_type = type_from_ref(&self.method.return_type);
        if return_type.is_void() && !matches!(self.code.last(), Some(Instruction::Return(_))) {
            self.code.push(Instruction::Return(None));
        }

        let name = &self.method.name;
        Ok(Method {
            name: name.clone(),
            access: if self.method.is_public { AccessModifier::Public } else { AccessModifier::Default },
            is_static: self.table.is_static(name),
            is_final: false,
            params: self.table.parameters(name).to_vec(),
            return_type,
            instructions: self.code,
            var_table: self.vars,
        })
    }

    fn emit(&mut self, inst: Instruction) {
        self.code.push(inst);
    }

    fn temp(&mut self, ty: Type) -> Operand {
        let name = format!("{}t{}", TEMP_PREFIX, self.temps);
        self.temps += 1;
        self.vars.declare(&name, ty.clone());
        Operand::var(name, ty)
    }

    /// Fresh label numbering shared by one `if` or `while`
    fn label_id(&mut self) -> u32 {
        let id = self.labels;
        self.labels += 1;
        id
    }

    fn type_of(&self, expr: &Expr) -> Result<Type> {
        self.types
            .get(expr.id)
            .cloned()
            .ok_or_else(|| Error::internal(format!("no type recorded for expression '{}' at {}", expr, expr.span)))
    }

    fn resolve(&self, name: &str) -> Result<Resolved<'a>> {
        self.table
            .resolve(&self.method.name, name)
            .ok_or_else(|| Error::internal(format!("unresolved name '{}' in '{}'", name, self.method.name)))
    }

    fn this(&self) -> Operand {
        Operand::var(THIS, Type::class(self.table.class_name()))
    }

    fn field_ref(&self, name: &str, ty: &Type) -> FieldRef {
        FieldRef { owner: self.table.class_name().to_string(), name: name.to_string(), ty: ty.clone() }
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                for s in stmts {
                    self.stmt(s)?;
                }
            }
            StmtKind::If { condition, then_branch, else_branch } => {
                let id = self.label_id();
                let (then_label, end_label) = (format!("then_{id}"), format!("endif_{id}"));
                let cond = self.expr(condition)?;
                self.emit(Instruction::Branch { cond, target: then_label.clone() });
                self.stmt(else_branch)?;
                self.emit(Instruction::Goto(end_label.clone()));
                self.emit(Instruction::Label(then_label));
                self.stmt(then_branch)?;
                self.emit(Instruction::Label(end_label));
            }
            StmtKind::While { condition, body } => {
                let id = self.label_id();
                let (cond_label, body_label, end_label) =
                    (format!("while_{id}"), format!("body_{id}"), format!("endwhile_{id}"));
                self.emit(Instruction::Label(cond_label.clone()));
                let cond = self.expr(condition)?;
                self.emit(Instruction::Branch { cond, target: body_label.clone() });
                self.emit(Instruction::Goto(end_label.clone()));
                self.emit(Instruction::Label(body_label));
                self.stmt(body)?;
                self.emit(Instruction::Goto(cond_label));
                self.emit(Instruction::Label(end_label));
            }
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::MethodCall { receiver, method, args } => {
                    self.call(expr, receiver, method, args, false)?;
                }
                _ => {
                    self.expr(expr)?;
                }
            },
            StmtKind::Assign { target, value } => match self.resolve(target)? {
                Resolved::Local(symbol) | Resolved::Param(_, symbol) => {
                    let value = self.expr(value)?;
                    self.emit(Instruction::Assign { dest: Operand::var(target.as_str(), symbol.ty.clone()), value });
                }
                Resolved::Field(symbol) => {
                    let value = self.expr(value)?;
                    let field = self.field_ref(&symbol.name, &symbol.ty);
                    self.emit(Instruction::PutField { object: self.this(), field, value });
                }
                Resolved::Import(name) => {
                    return Err(Error::internal(format!("assignment to class name '{}'", name)));
                }
            },
            StmtKind::ArrayAssign { target, index, value } => {
                let array = self.variable(target)?;
                let index = self.expr(index)?;
                let value = self.expr(value)?;
                self.emit(Instruction::ArrayStore { array, index, value });
            }
            StmtKind::Return(value) => {
                let declared = type_from_ref(&self.method.return_type);
                let value = match value {
                    Some(expr) if !declared.is_void() => Some(self.expr(expr)?),
                    Some(_) => return Err(Error::internal(format!("value returned from void method '{}'", self.method.name))),
                    None => None,
                };
                self.emit(Instruction::Return(value));
            }
        }
        Ok(())
    }

    /// Operand holding the current value of a named variable
    fn variable(&mut self, name: &str) -> Result<Operand> {
        match self.resolve(name)? {
            Resolved::Local(symbol) | Resolved::Param(_, symbol) => Ok(Operand::var(name, symbol.ty.clone())),
            Resolved::Field(symbol) => {
                let dest = self.temp(symbol.ty.clone());
                let field = self.field_ref(&symbol.name, &symbol.ty);
                self.emit(Instruction::GetField { dest: dest.clone(), object: self.this(), field });
                Ok(dest)
            }
            Resolved::Import(name) => Err(Error::internal(format!("class name '{}' used as a value", name))),
        }
    }

    fn expr(&mut self, expr: &Expr) -> Result<Operand> {
        match &expr.kind {
            ExprKind::IntLiteral(value) => {
                if i16::try_from(*value).is_ok() {
                    return Ok(Operand::int(*value));
                }
                let dest = self.temp(Type::int());
                self.emit(Instruction::Call(Call {
                    dest: Some(dest.clone()),
                    kind: CallKind::Ldc,
                    receiver: None,
                    owner: String::new(),
                    method: String::new(),
                    args: vec![Operand::int(*value)],
                    ret: Type::int(),
                }));
                Ok(dest)
            }
            ExprKind::BoolLiteral(value) => Ok(Operand::boolean(*value)),
            ExprKind::Identifier(name) => self.variable(name),
            ExprKind::This => Ok(self.this()),
            ExprKind::Not(inner) => {
                let operand = self.expr(inner)?;
                let dest = self.temp(Type::boolean());
                self.emit(Instruction::UnaryOp { dest: dest.clone(), op: UnaryOp::Not, operand });
                Ok(dest)
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.expr(left)?;
                let rhs = self.expr(right)?;
                let ty = if op.is_arithmetic() { Type::int() } else { Type::boolean() };
                let dest = self.temp(ty);
                self.emit(Instruction::BinaryOp { dest: dest.clone(), op: *op, lhs, rhs });
                Ok(dest)
            }
            ExprKind::Index { array, index } => {
                let array = self.expr(array)?;
                let index = self.expr(index)?;
                let dest = self.temp(array.ty().element());
                self.emit(Instruction::ArrayLoad { dest: dest.clone(), array, index });
                Ok(dest)
            }
            ExprKind::Length(array) => {
                let array = self.expr(array)?;
                let dest = self.temp(Type::int());
                self.emit(Instruction::Call(Call {
                    dest: Some(dest.clone()),
                    kind: CallKind::ArrayLength,
                    receiver: Some(array),
                    owner: String::new(),
                    method: String::new(),
                    args: Vec::new(),
                    ret: Type::int(),
                }));
                Ok(dest)
            }
            ExprKind::MethodCall { receiver, method, args } => self
                .call(expr, receiver, method, args, true)?
                .ok_or_else(|| Error::internal(format!("void call '{}' used as a value", method))),
            ExprKind::NewArray { element, size } => {
                let size = self.expr(size)?;
                Ok(self.new_array(&type_from_ref(element), size))
            }
            ExprKind::NewObject(class) => {
                let ty = Type::class(class.as_str());
                let object = self.temp(ty.clone());
                self.emit(Instruction::Call(Call {
                    dest: Some(object.clone()),
                    kind: CallKind::New,
                    receiver: None,
                    owner: class.clone(),
                    method: String::new(),
                    args: Vec::new(),
                    ret: ty,
                }));
                self.emit(Instruction::Call(Call {
                    dest: None,
                    kind: CallKind::Special,
                    receiver: Some(object.clone()),
                    owner: class.clone(),
                    method: INIT.to_string(),
                    args: Vec::new(),
                    ret: Type::void(),
                }));
                Ok(object)
            }
            ExprKind::ArrayLiteral(items) => {
                let element = self.type_of(expr)?.element();
                let count = i32::try_from(items.len())
                    .map_err(|_| Error::unsupported("array literal with more than i32::MAX elements"))?;
                let array = self.new_array(&element, Operand::int(count));
                for (i, item) in (0..).zip(items) {
                    let value = self.expr(item)?;
                    self.emit(Instruction::ArrayStore { array: array.clone(), index: Operand::int(i), value });
                }
                Ok(array)
            }
        }
    }

    fn new_array(&mut self, element: &Type, size: Operand) -> Operand {
        let ty = Type::array_of(element);
        let dest = self.temp(ty.clone());
        self.emit(Instruction::Call(Call {
            dest: Some(dest.clone()),
            kind: CallKind::New,
            receiver: None,
            owner: element.name().to_string(),
            method: String::new(),
            args: vec![size],
            ret: ty,
        }));
        dest
    }

    /// Lower a call; the result lands in a temporary only when `wanted`.
    fn call(&mut self, expr: &Expr, receiver: &Expr, method: &str, args: &[Expr], wanted: bool) -> Result<Option<Operand>> {
        let import = receiver.as_identifier().and_then(|name| match self.table.resolve(&self.method.name, name) {
            Some(Resolved::Import(simple)) => Some(simple),
            _ => None,
        });

        let (kind, receiver, owner) = match import {
            Some(simple) => (CallKind::Static, None, simple.to_string()),
            None => {
                let object = self.expr(receiver)?;
                let owner = object
                    .ty()
                    .class_name()
                    .ok_or_else(|| Error::unsupported(format!("method call on a value of type '{}'", object.ty())))?
                    .to_string();
                // a static method of this class ignores the value it is called on
                if owner == self.table.class_name() && self.table.is_static(method) {
                    (CallKind::Static, None, owner)
                } else {
                    (CallKind::Virtual, Some(object), owner)
                }
            }
        };

        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.expr(arg)?);
        }

        let ret = self.type_of(expr)?;
        let dest = (wanted && !ret.is_void()).then(|| self.temp(ret.clone()));
        self.emit(Instruction::Call(Call {
            dest: dest.clone(),
            kind,
            receiver,
            owner,
            method: method.to_string(),
            args: operands,
            ret,
        }));
        Ok(dest)
    }
}
