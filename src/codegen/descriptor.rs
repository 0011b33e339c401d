//! Utilities to build field and method descriptors

use crate::consts::{JAVA_LANG_SIMPLE_TYPES, THIS};
use crate::ir::ClassUnit;
use crate::types::{Type, TypeKind};
use once_cell::sync::OnceCell;
use std::collections::HashMap;

static JAVA_LANG: OnceCell<HashMap<&'static str, String>> = OnceCell::new();

fn java_lang() -> &'static HashMap<&'static str, String> {
    JAVA_LANG.get_or_init(|| {
        JAVA_LANG_SIMPLE_TYPES
            .iter()
            .map(|simple| (*simple, format!("java/lang/{}", simple)))
            .collect()
    })
}

/// Maps simple class names seen in one unit to internal (slash) names
#[derive(Debug, Clone)]
pub struct ClassResolver {
    class_name: String,
    imports: Vec<String>,
}

impl ClassResolver {
    pub fn new(unit: &ClassUnit) -> Self {
        Self { class_name: unit.name.clone(), imports: unit.imports.clone() }
    }

    /// The enclosing class, then a matching import, then `java.lang`
    pub fn internal_name(&self, simple: &str) -> String {
        if simple == self.class_name || simple == THIS {
            return self.class_name.clone();
        }
        if let Some(path) = self.imports.iter().find(|p| p.rsplit('.').next() == Some(simple)) {
            return path.replace('.', "/");
        }
        match java_lang().get(simple) {
            Some(path) => path.clone(),
            None => simple.replace('.', "/"),
        }
    }

    pub fn type_descriptor(&self, ty: &Type) -> String {
        let mut desc = String::new();
        if ty.is_array {
            desc.push('[');
        }
        match &ty.kind {
            TypeKind::Int => desc.push('I'),
            TypeKind::Boolean => desc.push('Z'),
            TypeKind::Void => desc.push('V'),
            TypeKind::String => desc.push_str("Ljava/lang/String;"),
            TypeKind::Class(name) => {
                desc.push('L');
                desc.push_str(&self.internal_name(name));
                desc.push(';');
            }
        }
        desc
    }

    pub fn method_descriptor<'t>(&self, params: impl IntoIterator<Item = &'t Type>, ret: &Type) -> String {
        let mut d = String::from("(");
        for p in params {
            d.push_str(&self.type_descriptor(p));
        }
        d.push(')');
        d.push_str(&self.type_descriptor(ret));
        d
    }
}
