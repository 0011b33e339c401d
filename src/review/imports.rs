use super::visit::{self, Pass};
use super::{Diagnostic, ReviewError};
use crate::ast::{ImportDecl, Program};
use crate::symtab::SymbolTable;
use std::collections::HashSet;

#[derive(Default)]
struct ImportCheck {
    seen: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Pass<'a> for ImportCheck {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn import(&mut self, _table: &'a SymbolTable, import: &'a ImportDecl) {
        let path = import.qualified_name();
        if !self.seen.insert(path.clone()) {
            self.report(Diagnostic::new(import.span, ReviewError::DuplicateImport(path)));
        }
    }

    // imports carry everything this pass needs
    fn class(&mut self, _table: &'a SymbolTable, _class: &'a crate::ast::ClassDecl) {}
}

/// Reject import paths declared more than once.
pub(crate) fn check(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    visit::run(ImportCheck::default(), table, program).diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_jmm;
    use crate::symtab::build;

    #[test]
    fn repeated_path_is_reported_once_per_repeat() {
        let program = parse_jmm("import a.B; import a.B; import c.B; import a.B; class A { }").unwrap();
        let found = check(&program, &build(&program));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.kind == ReviewError::DuplicateImport("a.B".into())));
    }
}
