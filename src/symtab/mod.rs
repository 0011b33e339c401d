//! Symbol table for one compiled class
//!
//! Built once by [`build`] and never mutated afterwards. Queries for methods
//! the class does not declare return empty collections or `None`.

mod builder;

pub use builder::{build, type_from_ref};

use crate::types::{Symbol, Type};
use std::collections::HashMap;
use std::fmt;

/// Declared signature and locals of one method
#[derive(Debug, Clone, Default)]
pub struct MethodSignature {
    pub return_type: Option<Type>,
    pub params: Vec<Symbol>,
    pub locals: Vec<Symbol>,
    pub is_static: bool,
}

/// What an identifier denotes inside a method body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    Local(&'a Symbol),
    /// Parameter with its zero-based position
    Param(usize, &'a Symbol),
    Field(&'a Symbol),
    /// Simple name of an imported class
    Import(&'a str),
}

impl<'a> Resolved<'a> {
    /// Type of the storage a variable reference denotes; imports have none
    pub fn ty(&self) -> Option<&'a Type> {
        match self {
            Resolved::Local(s) | Resolved::Param(_, s) | Resolved::Field(s) => Some(&s.ty),
            Resolved::Import(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub(crate) class_name: String,
    pub(crate) super_class: Option<String>,
    pub(crate) imports: Vec<String>,
    pub(crate) fields: Vec<Symbol>,
    pub(crate) methods: Vec<String>,
    pub(crate) signatures: HashMap<String, MethodSignature>,
}

impl SymbolTable {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    /// Dotted import paths, in declaration order, without duplicates
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn fields(&self) -> &[Symbol] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared method names, in declaration order, without duplicates
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.signatures.contains_key(name)
    }

    pub fn return_type(&self, method: &str) -> Option<&Type> {
        self.signatures.get(method).and_then(|s| s.return_type.as_ref())
    }

    pub fn parameters(&self, method: &str) -> &[Symbol] {
        self.signatures.get(method).map(|s| s.params.as_slice()).unwrap_or(&[])
    }

    pub fn local_variables(&self, method: &str) -> &[Symbol] {
        self.signatures.get(method).map(|s| s.locals.as_slice()).unwrap_or(&[])
    }

    pub fn is_static(&self, method: &str) -> bool {
        self.signatures.get(method).map(|s| s.is_static).unwrap_or(false)
    }

    /// Dotted path of the import whose simple name is `simple`
    pub fn import_path(&self, simple: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|path| path.rsplit('.').next() == Some(simple))
            .map(String::as_str)
    }

    pub fn is_imported(&self, simple: &str) -> bool {
        self.import_path(simple).is_some()
    }

    /// Whether `name` denotes a class known to this unit: itself, its
    /// superclass, or an import
    pub fn is_known_class(&self, name: &str) -> bool {
        name == self.class_name || self.super_class() == Some(name) || self.is_imported(name)
    }

    /// Resolve an identifier inside `method`: local, then parameter, then
    /// field, then import.
    pub fn resolve(&self, method: &str, name: &str) -> Option<Resolved<'_>> {
        if let Some(local) = self.local_variables(method).iter().find(|s| s.name == name) {
            return Some(Resolved::Local(local));
        }
        if let Some((i, param)) = self.parameters(method).iter().enumerate().find(|(_, s)| s.name == name) {
            return Some(Resolved::Param(i, param));
        }
        if let Some(field) = self.field(name) {
            return Some(Resolved::Field(field));
        }
        self.import_path(name)
            .and_then(|path| path.rsplit('.').next())
            .map(Resolved::Import)
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "import {}", import)?;
        }
        write!(f, "class {}", self.class_name)?;
        if let Some(sup) = &self.super_class {
            write!(f, " extends {}", sup)?;
        }
        writeln!(f)?;
        for field in &self.fields {
            writeln!(f, "  field {}", field)?;
        }
        for method in &self.methods {
            let ret = self.return_type(method).map(|t| t.to_string()).unwrap_or_default();
            let params: Vec<String> = self.parameters(method).iter().map(|p| p.to_string()).collect();
            writeln!(f, "  method {} {}({})", ret, method, params.join(", "))?;
            for local in self.local_variables(method) {
                writeln!(f, "    local {}", local)?;
            }
        }
        Ok(())
    }
}
