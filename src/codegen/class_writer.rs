//! Class writer producing one Jasmin listing per IR unit

use super::descriptor::ClassResolver;
use super::method_writer::MethodWriter;
use super::opcodes::*;
use crate::config::Config;
use crate::consts::{INIT, OBJECT_CLASS};
use crate::error::Result;
use crate::ir::ClassUnit;

/// Class writer for Jasmin assembly
pub struct ClassWriter<'a> {
    unit: &'a ClassUnit,
    config: &'a Config,
    resolver: ClassResolver,
}

impl<'a> ClassWriter<'a> {
    pub fn new(unit: &'a ClassUnit, config: &'a Config) -> Self {
        Self { unit, config, resolver: ClassResolver::new(unit) }
    }

    fn super_name(&self) -> String {
        match &self.unit.super_class {
            Some(sup) => self.resolver.internal_name(sup),
            None => OBJECT_CLASS.to_string(),
        }
    }

    /// Render the whole class; the result ends with a newline.
    pub fn write(&self) -> Result<String> {
        let unit = self.unit;
        let mut lines = vec![
            format!(".class {} {}", self.config.class_access, self.resolver.internal_name(&unit.name)),
            format!(".super {}", self.super_name()),
        ];

        if !unit.fields.is_empty() {
            lines.push(String::new());
        }
        for field in &unit.fields {
            let mut decl = String::from(".field ");
            let access = field.access.to_string();
            if !access.is_empty() {
                decl.push_str(&access);
                decl.push(' ');
            }
            if field.is_static {
                decl.push_str("static ");
            }
            if field.is_final {
                decl.push_str("final ");
            }
            decl.push_str(&format!("{} {}", field.name, self.resolver.type_descriptor(&field.ty)));
            lines.push(decl);
        }

        lines.push(String::new());
        lines.extend(self.default_constructor());

        for method in &unit.methods {
            lines.push(String::new());
            lines.extend(MethodWriter::new(unit, method, &self.resolver).write(self.config)?);
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    /// `<init>` delegating to the superclass's no-argument constructor
    fn default_constructor(&self) -> Vec<String> {
        vec![
            format!(".method public {}()V", INIT),
            format!("    {}", mnemonic(ALOAD_0)),
            format!("    {} {}/{}()V", mnemonic(INVOKESPECIAL), self.super_name(), INIT),
            format!("    {}", mnemonic(RETURN)),
            ".end method".to_string(),
        ]
    }
}
