//! Class-level declarations: fields and the superclass

use super::visit::{self, Pass};
use super::{Diagnostic, ReviewError};
use crate::ast::{BaseType, ClassDecl, Program};
use crate::consts::LENGTH;
use crate::symtab::SymbolTable;
use std::collections::HashSet;

#[derive(Default)]
struct ClassCheck {
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Pass<'a> for ClassCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn class(&mut self, table: &'a SymbolTable, class: &'a ClassDecl) {
        let mut names = HashSet::new();
        for field in &class.fields {
            if !names.insert(field.name.as_str()) {
                self.report(Diagnostic::new(field.span, ReviewError::DuplicateField(field.name.clone())));
            }
            if field.name == LENGTH {
                self.report(Diagnostic::new(field.span, ReviewError::ReservedName(field.name.clone())));
            }
            if field.type_ref.base == BaseType::Void {
                self.report(Diagnostic::new(field.span, ReviewError::VoidVariable(field.name.clone())));
            }
        }

        if let Some(sup) = &class.extends {
            if !table.is_imported(sup) {
                self.report(Diagnostic::new(class.span, ReviewError::UnknownSuperclass(sup.clone())));
            }
        }
    }
}

pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(ClassCheck::default(), table, program).diagnostics
}
