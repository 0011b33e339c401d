//! Java-- types shared by the symbol table, the analyzer, the IR and the
//! bytecode generator.

use std::fmt;

/// Element kind of a [`Type`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int,
    Boolean,
    String,
    Void,
    /// The current class, its superclass, or an imported class
    Class(String),
}

/// A kind plus array-ness. Two types are equal iff both match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    pub kind: TypeKind,
    pub is_array: bool,
}

impl Type {
    pub fn new(kind: TypeKind, is_array: bool) -> Self {
        Self { kind, is_array }
    }

    pub fn int() -> Self {
        Self::new(TypeKind::Int, false)
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean, false)
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String, false)
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void, false)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class(name.into()), false)
    }

    pub fn int_array() -> Self {
        Self::new(TypeKind::Int, true)
    }

    pub fn array_of(element: &Type) -> Self {
        Self::new(element.kind.clone(), true)
    }

    /// Element type of an array; identity for non-arrays
    pub fn element(&self) -> Type {
        Self::new(self.kind.clone(), false)
    }

    /// Scalar int (not `int[]`)
    pub fn is_int(&self) -> bool {
        !self.is_array && self.kind == TypeKind::Int
    }

    /// Scalar boolean (not `boolean[]`)
    pub fn is_boolean(&self) -> bool {
        !self.is_array && self.kind == TypeKind::Boolean
    }

    pub fn is_void(&self) -> bool {
        !self.is_array && self.kind == TypeKind::Void
    }

    /// Values of this type live in int-family slots on the target machine.
    pub fn is_primitive(&self) -> bool {
        !self.is_array && matches!(self.kind, TypeKind::Int | TypeKind::Boolean)
    }

    pub fn class_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Class(name) if !self.is_array => Some(name),
            _ => None,
        }
    }

    /// Source-level name of the element kind
    pub fn name(&self) -> &str {
        match &self.kind {
            TypeKind::Int => "int",
            TypeKind::Boolean => "boolean",
            TypeKind::String => "String",
            TypeKind::Void => "void",
            TypeKind::Class(name) => name,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if self.is_array {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A name paired with a type: fields, parameters and locals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}
